//! Reverse geocoding client (Nominatim).
//!
//! Wraps the Nominatim `/reverse` endpoint and maps its loosely-populated
//! address components onto the handful of fields the address gate needs.
//! Responses are cached for five minutes keyed by rounded coordinates, so
//! repeated grabs from the same spot cost one upstream call.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::GeocoderConfig;

/// Cache TTL for resolved addresses.
const CACHE_TTL: Duration = Duration::from_secs(300);


/// Errors raised by the reverse geocoder.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Transport-level failure talking to the geocoder.
    #[error("Geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The geocoder answered with a non-success status.
    #[error("Geocoder returned HTTP {0}")]
    Status(u16),
}

/// An address resolved from coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedAddress {
    /// Street-level line assembled from house number / road / village.
    pub address1: String,
    pub subdistrict: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub postcode: Option<String>,
    /// The geocoder's own one-line rendering, when present.
    pub formatted: Option<String>,
}

/// Client for the Nominatim reverse geocoding API.
///
/// Cheaply cloneable; clones share the HTTP client and the response cache.
#[derive(Clone)]
pub struct GeocoderClient {
    inner: Arc<GeocoderClientInner>,
}

struct GeocoderClientInner {
    client: reqwest::Client,
    config: GeocoderConfig,
    cache: Cache<String, ResolvedAddress>,
}

impl GeocoderClient {
    /// Create a new reverse geocoding client.
    #[must_use]
    pub fn new(config: &GeocoderConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(GeocoderClientInner {
                client: reqwest::Client::new(),
                config: config.clone(),
                cache,
            }),
        }
    }

    /// Resolve coordinates to an address.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] when the upstream call fails or answers
    /// with a non-success status. A successful but empty geocoder answer
    /// is not an error; the resolved address falls back to a generic line.
    #[instrument(skip(self))]
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<ResolvedAddress, GeocodeError> {
        let key = cache_key(lat, lon);
        if let Some(hit) = self.inner.cache.get(&key).await {
            debug!(%key, "Geocode cache hit");
            return Ok(hit);
        }

        let response = self
            .inner
            .client
            .get(&self.inner.config.endpoint)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("format", "jsonv2".to_string()),
                ("addressdetails", "1".to_string()),
                ("zoom", "18".to_string()),
                ("accept-language", self.inner.config.accept_language.clone()),
            ])
            .header("User-Agent", &self.inner.config.user_agent)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body: NominatimResponse = response.json().await?;
        let resolved = convert(body);

        self.inner.cache.insert(key, resolved.clone()).await;
        Ok(resolved)
    }
}

/// Coordinates round to 4 decimal places (~11 m) for cache keys.
fn cache_key(lat: f64, lon: f64) -> String {
    format!("{lat:.4},{lon:.4}")
}

// =============================================================================
// Nominatim wire types
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct NominatimResponse {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: NominatimAddress,
}

/// Nominatim's address object: a grab bag of optional components whose
/// presence depends on the map data at the coordinates.
#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    #[serde(default)]
    house_number: Option<String>,
    #[serde(default)]
    road: Option<String>,
    #[serde(default)]
    residential: Option<String>,
    #[serde(default)]
    pedestrian: Option<String>,
    #[serde(default)]
    village: Option<String>,
    #[serde(default)]
    hamlet: Option<String>,
    #[serde(default)]
    neighbourhood: Option<String>,
    #[serde(default)]
    suburb: Option<String>,
    #[serde(default)]
    subdistrict: Option<String>,
    #[serde(default)]
    county: Option<String>,
    #[serde(default)]
    city_district: Option<String>,
    #[serde(default)]
    district: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    postcode: Option<String>,
}

/// Pick the first non-empty component.
fn first_of(candidates: &[&Option<String>]) -> Option<String> {
    candidates
        .iter()
        .find_map(|c| c.as_deref().filter(|s| !s.is_empty()).map(String::from))
}

fn convert(body: NominatimResponse) -> ResolvedAddress {
    let a = &body.address;

    let house = a.house_number.clone().unwrap_or_default();
    let road = first_of(&[&a.road, &a.residential, &a.pedestrian]).unwrap_or_default();
    let village_like =
        first_of(&[&a.village, &a.hamlet, &a.neighbourhood, &a.suburb]).unwrap_or_default();

    let address1 = [house, road, village_like]
        .iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");

    let address1 = if address1.is_empty() {
        body.display_name
            .clone()
            // "Location reported by the browser"
            .unwrap_or_else(|| "ตำแหน่งที่ระบุโดยเบราว์เซอร์".to_owned())
    } else {
        address1
    };

    ResolvedAddress {
        address1,
        subdistrict: first_of(&[&a.subdistrict, &a.village, &a.suburb]),
        district: first_of(&[&a.county, &a.city_district, &a.district, &a.town, &a.city]),
        province: first_of(&[&a.state, &a.region]),
        postcode: a.postcode.clone().filter(|s| !s.is_empty()),
        formatted: body.display_name,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_rounds_coordinates() {
        assert_eq!(cache_key(13.756_331, 100.501_765), "13.7563,100.5018");
        // Nearby points share a key; distant ones do not.
        assert_eq!(cache_key(13.756_349, 100.501_77), "13.7563,100.5018");
        assert_ne!(cache_key(13.76, 100.50), cache_key(13.75, 100.50));
    }

    fn full_response() -> NominatimResponse {
        NominatimResponse {
            display_name: Some("99 ถนนสุขุมวิท คลองเตย กรุงเทพมหานคร 10110".to_owned()),
            address: NominatimAddress {
                house_number: Some("99".to_owned()),
                road: Some("ถนนสุขุมวิท".to_owned()),
                suburb: Some("คลองเตย".to_owned()),
                city: Some("เขตคลองเตย".to_owned()),
                state: Some("กรุงเทพมหานคร".to_owned()),
                postcode: Some("10110".to_owned()),
                ..NominatimAddress::default()
            },
        }
    }

    #[test]
    fn test_convert_assembles_address1() {
        let resolved = convert(full_response());
        assert_eq!(resolved.address1, "99 ถนนสุขุมวิท คลองเตย");
        assert_eq!(resolved.subdistrict.as_deref(), Some("คลองเตย"));
        assert_eq!(resolved.district.as_deref(), Some("เขตคลองเตย"));
        assert_eq!(resolved.province.as_deref(), Some("กรุงเทพมหานคร"));
        assert_eq!(resolved.postcode.as_deref(), Some("10110"));
    }

    #[test]
    fn test_convert_falls_back_to_display_name() {
        let body = NominatimResponse {
            display_name: Some("somewhere on a road".to_owned()),
            address: NominatimAddress::default(),
        };
        let resolved = convert(body);
        assert_eq!(resolved.address1, "somewhere on a road");
    }

    #[test]
    fn test_convert_empty_answer_uses_generic_line() {
        let resolved = convert(NominatimResponse::default());
        assert_eq!(resolved.address1, "ตำแหน่งที่ระบุโดยเบราว์เซอร์");
        assert!(resolved.postcode.is_none());
        assert!(resolved.formatted.is_none());
    }
}
