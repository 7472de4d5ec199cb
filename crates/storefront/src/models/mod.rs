//! Session-stored models and template view types.

pub mod address;
pub mod cart_view;
pub mod consent;
pub mod session;

pub use session::keys as session_keys;
