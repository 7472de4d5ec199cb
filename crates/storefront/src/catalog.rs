//! The product catalog: schema, validation, and the one-shot repository.
//!
//! The catalog is a static JSON document. It is read and validated exactly
//! once per process; every consumer shares the same cached document through
//! [`CatalogStore`], which is injected via application state rather than
//! living in a hidden global.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::OnceCell;

use pixel_exchange_core::{ItemTag, PriceToken};

/// A listing category shown in the navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
}

/// One catalog entry. Unknown fields in the file are tolerated and ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique id within the catalog (e.g. `rblx-1029025`).
    pub id: String,
    pub title: String,
    /// Seller / creator name.
    pub by: String,
    pub tag: ItemTag,
    /// Price token; `null`, absent, `"-"`, and `"Free"` all mean free.
    /// Bare JSON numbers are coerced to string tokens.
    #[serde(default)]
    pub price: Option<PriceToken>,
    /// Image URL or path.
    pub image: String,
}

impl CatalogItem {
    /// Monetary amount of this item's price token (zero when absent).
    #[must_use]
    pub fn price_amount(&self) -> rust_decimal::Decimal {
        self.price
            .as_ref()
            .map_or(rust_decimal::Decimal::ZERO, PriceToken::amount)
    }

    /// Display form of this item's price (`"Free"` when absent).
    #[must_use]
    pub fn price_display(&self) -> String {
        self.price
            .as_ref()
            .map_or_else(|| "Free".to_owned(), PriceToken::display)
    }
}

/// The validated catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
    #[serde(rename = "robloxLimiteds")]
    pub roblox_limiteds: Vec<CatalogItem>,
    #[serde(rename = "ugcLimiteds")]
    pub ugc_limiteds: Vec<CatalogItem>,
}

/// Filtered views of both item lists.
#[derive(Debug, Clone, Default)]
pub struct FilteredCatalog {
    pub roblox: Vec<CatalogItem>,
    pub ugc: Vec<CatalogItem>,
}

impl Catalog {
    /// Case-insensitive substring filter on item titles.
    ///
    /// An empty or whitespace-only query returns both lists unfiltered.
    #[must_use]
    pub fn filter(&self, query: &str) -> FilteredCatalog {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return FilteredCatalog {
                roblox: self.roblox_limiteds.clone(),
                ugc: self.ugc_limiteds.clone(),
            };
        }

        let matches = |items: &[CatalogItem]| {
            items
                .iter()
                .filter(|i| i.title.to_lowercase().contains(&q))
                .cloned()
                .collect()
        };

        FilteredCatalog {
            roblox: matches(&self.roblox_limiteds),
            ugc: matches(&self.ugc_limiteds),
        }
    }

    /// Look up an item by id across both lists.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&CatalogItem> {
        self.roblox_limiteds
            .iter()
            .chain(self.ugc_limiteds.iter())
            .find(|i| i.id == id)
    }

    /// Items sharing the given item's tag, excluding the item itself.
    #[must_use]
    pub fn related(&self, item: &CatalogItem, limit: usize) -> Vec<CatalogItem> {
        let pool = match item.tag {
            ItemTag::Limited => &self.roblox_limiteds,
            ItemTag::Ugc => &self.ugc_limiteds,
        };
        pool.iter()
            .filter(|i| i.id != item.id)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Every item in the catalog, limiteds first.
    pub fn all_items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.roblox_limiteds.iter().chain(self.ugc_limiteds.iter())
    }

    /// Total number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roblox_limiteds.len() + self.ugc_limiteds.len()
    }

    /// True when the catalog holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roblox_limiteds.is_empty() && self.ugc_limiteds.is_empty()
    }
}

/// Errors raised while loading the catalog.
///
/// The two variants are deliberately distinct user-facing messages: a
/// missing file and a malformed file degrade the UI differently.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The file could not be read at all.
    #[error("Failed to load catalog: {0}")]
    Unreadable(String),

    /// The file was read but does not match the catalog schema.
    #[error("Catalog schema mismatch: {0}")]
    Schema(String),
}

/// One-shot catalog repository.
///
/// Cheaply cloneable; all clones share the same lazily-initialized
/// document. Concurrent first reads collapse into a single file load.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<CatalogStoreInner>,
}

struct CatalogStoreInner {
    path: PathBuf,
    doc: OnceCell<Arc<Catalog>>,
}

impl CatalogStore {
    /// Create a repository reading from the given file path.
    ///
    /// Nothing is read until the first [`get`](Self::get).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(CatalogStoreInner {
                path: path.into(),
                doc: OnceCell::new(),
            }),
        }
    }

    /// The configured catalog path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Get the catalog, loading it on first use.
    ///
    /// On failure the cell stays unset, so a later call retries the load;
    /// on success the document is cached for the process lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unreadable`] when the file cannot be read
    /// and [`CatalogError::Schema`] when it fails validation.
    pub async fn get(&self) -> Result<Arc<Catalog>, CatalogError> {
        self.inner
            .doc
            .get_or_try_init(|| async {
                let doc = load(&self.inner.path).await?;
                tracing::info!(
                    path = %self.inner.path.display(),
                    items = doc.len(),
                    "Catalog loaded"
                );
                Ok(Arc::new(doc))
            })
            .await
            .cloned()
    }
}

/// Read and validate the catalog file.
async fn load(path: &Path) -> Result<Catalog, CatalogError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CatalogError::Unreadable(format!("{}: {e}", path.display())))?;

    serde_json::from_str(&raw).map_err(|e| CatalogError::Schema(e.to_string()))
}
