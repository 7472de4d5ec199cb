//! Catalog commands: build items.json from the Rolimon's API, validate an
//! existing file.
//!
//! `build` talks to two public endpoints: the Rolimon's item details API
//! (one call, every limited item) and the Roblox thumbnails API (batched,
//! at most 100 asset ids per call, with a polite delay between batches).

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use pixel_exchange_storefront::catalog::CatalogStore;

/// Rolimon's item details endpoint (every limited item in one document).
const ROLIMONS_ITEM_API: &str = "https://www.rolimons.com/itemapi/itemdetails";

/// Roblox thumbnails endpoint.
const RBX_THUMB_API: &str = "https://thumbnails.roblox.com/v1/assets";

/// Thumbnail edge length requested from Roblox.
const RBX_THUMB_SIZE: &str = "420x420";

/// Thumbnail batch size; the API caps batch lookups at 100 ids.
const THUMB_CHUNK: usize = 100;

/// Delay between thumbnail batches.
const THUMB_DELAY: Duration = Duration::from_millis(250);

const USER_AGENT: &str = "PixelExchangeCatalogBuilder/1.0 (+contact: panyakorn@pixelexchange.dev)";

/// Errors raised while building or validating a catalog.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rolimons API replied success=false")]
    ApiRefused,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(String),
}

// =============================================================================
// Wire types
// =============================================================================

/// Rolimon's item details response. Each item maps an asset id to a
/// positional array: `[name, acronym, rap, value, ...]` - only the name
/// matters here.
#[derive(Debug, Deserialize)]
struct RolimonsItemDetails {
    success: bool,
    #[serde(default)]
    items: HashMap<String, Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct ThumbnailBatch {
    #[serde(default)]
    data: Vec<ThumbnailEntry>,
}

#[derive(Debug, Deserialize)]
struct ThumbnailEntry {
    #[serde(rename = "targetId")]
    target_id: Option<u64>,
    #[serde(rename = "imageUrl")]
    image_url: Option<String>,
}

// =============================================================================
// Build
// =============================================================================

/// Build `<out_dir>/items.json` from the Rolimon's item list.
///
/// With downloads enabled, thumbnails land in
/// `<out_dir>/images/rolimons/<assetId>.png` and items reference them via
/// `/data/images/rolimons/...`; with `--no-download` the Roblox CDN URLs
/// are referenced directly.
///
/// # Errors
///
/// Fails on network errors, an unsuccessful Rolimon's reply, or
/// filesystem errors writing the output.
pub async fn build(
    out_dir: &Path,
    by_default: &str,
    limit: Option<usize>,
    no_download: bool,
) -> Result<(), CatalogCommandError> {
    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

    info!("Fetching limited item list from Rolimon's");
    let details: RolimonsItemDetails = client
        .get(ROLIMONS_ITEM_API)
        .header("Accept", "application/json")
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if !details.success {
        return Err(CatalogCommandError::ApiRefused);
    }

    let mut asset_ids: Vec<String> = details.items.keys().cloned().collect();
    asset_ids.sort_unstable();
    if let Some(limit) = limit {
        asset_ids.truncate(limit);
    }
    info!(count = asset_ids.len(), "Items to process");

    info!("Resolving thumbnail URLs from Roblox");
    let thumbs = fetch_thumbnails(&client, &asset_ids).await?;

    let image_dir = out_dir.join("images").join("rolimons");
    if !no_download {
        tokio::fs::create_dir_all(&image_dir).await?;
    }

    let mut records = Vec::with_capacity(asset_ids.len());
    for asset_id in &asset_ids {
        let title = details
            .items
            .get(asset_id)
            .and_then(|fields| fields.first())
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| format!("Item {asset_id}"), ToOwned::to_owned);

        let image = match thumbs.get(asset_id) {
            Some(url) if no_download => Some(url.clone()),
            Some(url) => download_image(&client, url, &image_dir, asset_id)
                .await
                .map_err(|e| warn!(%asset_id, "Image download failed: {e}"))
                .ok(),
            None => None,
        };

        // No price in this endpoint; "-" renders as Free in the storefront.
        records.push(json!({
            "id": format!("rblx-{asset_id}"),
            "title": title,
            "by": by_default,
            "tag": "LIMITED",
            "price": "-",
            "image": image.unwrap_or_else(|| "/static/images/placeholder.svg".to_owned()),
        }));
    }

    let catalog = json!({
        "categories": [
            { "key": "all", "label": "All" },
            { "key": "limited", "label": "Roblox Limiteds" },
            { "key": "ugc", "label": "UGC Limiteds" }
        ],
        "robloxLimiteds": records,
        "ugcLimiteds": [],
    });

    tokio::fs::create_dir_all(out_dir).await?;
    let out_path = out_dir.join("items.json");
    tokio::fs::write(&out_path, serde_json::to_string_pretty(&catalog)?).await?;
    info!(path = %out_path.display(), "Catalog written");

    Ok(())
}

/// Resolve thumbnail URLs in batches of [`THUMB_CHUNK`].
async fn fetch_thumbnails(
    client: &reqwest::Client,
    asset_ids: &[String],
) -> Result<HashMap<String, String>, CatalogCommandError> {
    let mut urls = HashMap::new();

    for chunk in asset_ids.chunks(THUMB_CHUNK) {
        let batch: ThumbnailBatch = client
            .get(RBX_THUMB_API)
            .query(&[
                ("assetIds", chunk.join(",")),
                ("size", RBX_THUMB_SIZE.to_owned()),
                ("format", "Png".to_owned()),
                ("isCircular", "false".to_owned()),
            ])
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        for entry in batch.data {
            if let (Some(id), Some(url)) = (entry.target_id, entry.image_url) {
                urls.insert(id.to_string(), url);
            }
        }

        // Be polite to the API between batches
        tokio::time::sleep(THUMB_DELAY).await;
    }

    Ok(urls)
}

/// Download one thumbnail; returns the public path the storefront serves.
async fn download_image(
    client: &reqwest::Client,
    url: &str,
    image_dir: &Path,
    asset_id: &str,
) -> Result<String, CatalogCommandError> {
    let file_path = image_dir.join(format!("{asset_id}.png"));

    // Skip files that already exist from a previous run
    if tokio::fs::metadata(&file_path)
        .await
        .map(|meta| meta.len() > 0)
        .unwrap_or(false)
    {
        return Ok(format!("/data/images/rolimons/{asset_id}.png"));
    }

    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    tokio::fs::write(&file_path, &bytes).await?;

    Ok(format!("/data/images/rolimons/{asset_id}.png"))
}

// =============================================================================
// Validate
// =============================================================================

/// Load a catalog file through the storefront repository and report counts.
///
/// # Errors
///
/// Fails with the repository's own unreadable/schema-mismatch message.
pub async fn validate(path: &Path) -> Result<(), CatalogCommandError> {
    let store = CatalogStore::new(path);
    let catalog = store
        .get()
        .await
        .map_err(|e| CatalogCommandError::Invalid(e.to_string()))?;

    info!(
        categories = catalog.categories.len(),
        limiteds = catalog.roblox_limiteds.len(),
        ugc = catalog.ugc_limiteds.len(),
        "Catalog is valid"
    );

    Ok(())
}
