//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults run the demo out of the box.
//!
//! - `PX_HOST` - Bind address (default: 127.0.0.1)
//! - `PX_PORT` - Listen port (default: 3000)
//! - `PX_BASE_URL` - Public URL for the storefront (default: http://localhost:3000)
//! - `PX_CATALOG_PATH` - Catalog JSON file (default: crates/storefront/data/items.json)
//! - `PX_STATIC_DIR` - Static asset directory (default: crates/storefront/static)
//! - `PX_DATA_DIR` - Public data directory served at /data (default: crates/storefront/data)
//! - `PX_GEOCODER_ENDPOINT` - Reverse geocoding endpoint (default: Nominatim)
//! - `PX_GEOCODER_USER_AGENT` - User-Agent sent to the geocoder (Nominatim requires one)
//! - `PX_GEOCODER_ACCEPT_LANGUAGE` - Preferred geocoder response language (default: th)
//! - `PX_QR_ENDPOINT` - QR image endpoint (default: api.qrserver.com)
//! - `PX_PROMPTPAY_ID` - Demo PromptPay number shown at checkout
//! - `PX_ACCOUNT_NAME` - Demo account name shown at checkout
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Path to the catalog JSON file
    pub catalog_path: PathBuf,
    /// Directory served at `/static`
    pub static_dir: PathBuf,
    /// Directory served at `/data` (holds the catalog file)
    pub data_dir: PathBuf,
    /// Reverse geocoding configuration
    pub geocoder: GeocoderConfig,
    /// Checkout page configuration
    pub checkout: CheckoutConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Reverse geocoder (Nominatim) configuration.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Reverse geocoding endpoint URL
    pub endpoint: String,
    /// User-Agent header value; Nominatim's usage policy requires one
    pub user_agent: String,
    /// Accept-Language parameter for localized address components
    pub accept_language: String,
}

/// Checkout page configuration (all demo values; nothing here moves money).
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// QR image generation endpoint
    pub qr_endpoint: String,
    /// PromptPay number rendered into the demo payload
    pub promptpay_id: String,
    /// Account holder name shown beside the QR
    pub account_name: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("PX_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("PX_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PX_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PX_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("PX_BASE_URL", "http://localhost:3000");

        let catalog_path =
            PathBuf::from(get_env_or_default("PX_CATALOG_PATH", "crates/storefront/data/items.json"));
        let static_dir = PathBuf::from(get_env_or_default("PX_STATIC_DIR", "crates/storefront/static"));
        let data_dir = PathBuf::from(get_env_or_default("PX_DATA_DIR", "crates/storefront/data"));

        Ok(Self {
            host,
            port,
            base_url,
            catalog_path,
            static_dir,
            data_dir,
            geocoder: GeocoderConfig::from_env(),
            checkout: CheckoutConfig::from_env(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl GeocoderConfig {
    fn from_env() -> Self {
        Self {
            endpoint: get_env_or_default(
                "PX_GEOCODER_ENDPOINT",
                "https://nominatim.openstreetmap.org/reverse",
            ),
            user_agent: get_env_or_default(
                "PX_GEOCODER_USER_AGENT",
                "PixelExchange/0.1 (+https://github.com/pxexchange/pixel-exchange)",
            ),
            accept_language: get_env_or_default("PX_GEOCODER_ACCEPT_LANGUAGE", "th"),
        }
    }
}

impl CheckoutConfig {
    fn from_env() -> Self {
        Self {
            qr_endpoint: get_env_or_default(
                "PX_QR_ENDPOINT",
                "https://api.qrserver.com/v1/create-qr-code/",
            ),
            promptpay_id: get_env_or_default("PX_PROMPTPAY_ID", "0812345678"),
            account_name: get_env_or_default("PX_ACCOUNT_NAME", "Panyakorn P."),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
