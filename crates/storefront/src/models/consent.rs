//! Cookie-consent preferences.
//!
//! The `cc_prefs` cookie is the authoritative record (~180 days); the
//! session carries a mirror so templates can read it without re-parsing
//! headers. Essential cookies are always on - there is no representable
//! state with `essential: false`.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// Cookie name holding the serialized preferences.
pub const CONSENT_COOKIE: &str = "cc_prefs";

/// Cookie lifetime in days.
pub const CONSENT_COOKIE_DAYS: i64 = 180;

/// The visitor's per-category consent decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentPrefs {
    pub essential: bool,
    pub analytics: bool,
    pub marketing: bool,
    /// RFC 3339 decision time.
    pub timestamp: String,
}

impl ConsentPrefs {
    fn now(analytics: bool, marketing: bool) -> Self {
        Self {
            essential: true,
            analytics,
            marketing,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Everything on.
    #[must_use]
    pub fn accept_all() -> Self {
        Self::now(true, true)
    }

    /// Only essential cookies.
    #[must_use]
    pub fn reject_non_essential() -> Self {
        Self::now(false, false)
    }

    /// Per-category choice; essential stays forced on.
    #[must_use]
    pub fn custom(analytics: bool, marketing: bool) -> Self {
        Self::now(analytics, marketing)
    }

    /// Parse preferences out of a `Cookie:` request header value.
    ///
    /// Returns `None` when the cookie is absent or unparseable - an
    /// unreadable record is treated as "never asked".
    #[must_use]
    pub fn from_cookie_header(header: &str) -> Option<Self> {
        header
            .split(';')
            .map(str::trim)
            .find_map(|pair| pair.strip_prefix(&format!("{CONSENT_COOKIE}=")))
            .and_then(|value| urlencoding::decode(value).ok())
            .and_then(|decoded| serde_json::from_str(&decoded).ok())
    }

    /// The URL-encoded JSON cookie value.
    #[must_use]
    pub fn to_cookie_value(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        urlencoding::encode(&json).into_owned()
    }

    /// A full `Set-Cookie` header value with the standard expiry.
    #[must_use]
    pub fn set_cookie(&self) -> String {
        let expires = (Utc::now() + Duration::days(CONSENT_COOKIE_DAYS))
            .format("%a, %d %b %Y %H:%M:%S GMT");
        format!(
            "{CONSENT_COOKIE}={}; Expires={expires}; Path=/; SameSite=Lax",
            self.to_cookie_value()
        )
    }
}
