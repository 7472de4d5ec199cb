//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::CatalogStore;
use crate::config::StorefrontConfig;
use crate::services::geocoder::GeocoderClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog repository, the geocoder client, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogStore,
    geocoder: GeocoderClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The catalog is not read here; the repository loads it lazily on
    /// first access.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = CatalogStore::new(&config.catalog_path);
        let geocoder = GeocoderClient::new(&config.geocoder);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                geocoder,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog repository.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    /// Get a reference to the reverse geocoding client.
    #[must_use]
    pub fn geocoder(&self) -> &GeocoderClient {
        &self.inner.geocoder
    }
}
