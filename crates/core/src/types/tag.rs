//! Catalog item tags.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The two kinds of item the catalog carries.
///
/// The wire form is the uppercase tag used by the catalog file
/// (`"LIMITED"` / `"UGC"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemTag {
    /// Classic Roblox limited items.
    Limited,
    /// User-generated limited items.
    Ugc,
}

impl ItemTag {
    /// Human-readable section label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Limited => "Roblox Limiteds",
            Self::Ugc => "UGC Limiteds",
        }
    }

    /// The category key used by listing URLs (`?cat=`) and the catalog's
    /// `categories` array.
    #[must_use]
    pub const fn category_key(self) -> &'static str {
        match self {
            Self::Limited => "limited",
            Self::Ugc => "ugc",
        }
    }

    /// Resolve a listing category key back to a tag.
    #[must_use]
    pub fn from_category_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "limited" | "roblox" => Some(Self::Limited),
            "ugc" => Some(Self::Ugc),
            _ => None,
        }
    }
}

impl fmt::Display for ItemTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited => write!(f, "LIMITED"),
            Self::Ugc => write!(f, "UGC"),
        }
    }
}
