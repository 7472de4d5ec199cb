//! Session-related constants.
//!
//! Everything the storefront remembers about a visitor lives under these
//! keys. Session writes are best-effort: a failed store is logged and
//! otherwise ignored, never surfaced to the visitor.

/// Session keys for visitor state.
pub mod keys {
    /// Key for the serialized cart state.
    pub const CART: &str = "cart";

    /// Key for the saved shipping address.
    pub const SAVED_ADDRESS: &str = "saved_address";

    /// Key for the address gate's finite-state value.
    pub const GATE_STATE: &str = "address_gate_state";

    /// Key for the bounded history of geocoder-resolved addresses.
    pub const ADDRESS_HISTORY: &str = "address_history";

    /// Key for the geolocation denial counter.
    pub const DENY_COUNT: &str = "address_deny_count";

    /// Key for the consent preferences mirror (the cookie is authoritative).
    pub const CONSENT: &str = "consent_prefs";
}
