//! Item listing and detail route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use pixel_exchange_core::ItemTag;

use crate::catalog::{Catalog, CatalogItem, Category};
use crate::engagement::UrgencySnapshot;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Item card display data for grids.
#[derive(Clone)]
pub struct ItemCardView {
    pub id: String,
    pub title: String,
    pub by: String,
    pub tag: String,
    pub tag_key: String,
    pub price: String,
    pub image: String,
    pub urgency: UrgencySnapshot,
}

impl From<&CatalogItem> for ItemCardView {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            by: item.by.clone(),
            tag: item.tag.to_string(),
            tag_key: item.tag.category_key().to_owned(),
            price: item.price_display(),
            image: item.image.clone(),
            urgency: UrgencySnapshot::for_item(&item.id),
        }
    }
}

/// Listing query parameters: `?cat=limited|ugc&q=search`.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub cat: Option<String>,
    pub q: Option<String>,
}

/// Item listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "items/index.html")]
pub struct ItemsIndexTemplate {
    pub items: Vec<ItemCardView>,
    pub total: usize,
    pub query: String,
    pub cat_key: String,
    pub categories: Vec<Category>,
    pub error: Option<String>,
}

/// Item detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "items/show.html")]
pub struct ItemShowTemplate {
    pub item: ItemCardView,
    pub seller: String,
    pub tag_label: String,
    pub related: Vec<ItemCardView>,
}

/// Collect the listing for a category key (or everything).
fn listing(catalog: &Catalog, cat: Option<&str>, query: &str) -> Vec<ItemCardView> {
    let filtered = catalog.filter(query);
    let items: Vec<CatalogItem> = match cat.and_then(ItemTag::from_category_key) {
        Some(ItemTag::Limited) => filtered.roblox,
        Some(ItemTag::Ugc) => filtered.ugc,
        None => filtered
            .roblox
            .into_iter()
            .chain(filtered.ugc)
            .collect(),
    };
    items.iter().map(ItemCardView::from).collect()
}

/// Display the full listing with category and query filters.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListingQuery>,
) -> impl IntoResponse {
    let query = params.q.unwrap_or_default();
    let cat_key = params.cat.unwrap_or_default();

    match state.catalog().get().await {
        Ok(catalog) => {
            let items = listing(&catalog, Some(cat_key.as_str()).filter(|c| !c.is_empty()), &query);
            ItemsIndexTemplate {
                total: items.len(),
                items,
                query,
                cat_key,
                categories: catalog.categories.clone(),
                error: None,
            }
        }
        Err(e) => {
            tracing::error!("Failed to load catalog for listing: {e}");
            ItemsIndexTemplate {
                items: Vec::new(),
                total: 0,
                query,
                cat_key,
                categories: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

/// Number of related items shown under the detail page.
const RELATED_LIMIT: usize = 12;

/// Display an item detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ItemShowTemplate> {
    let catalog = state.catalog().get().await?;

    let item = catalog
        .find(&id)
        .ok_or_else(|| AppError::NotFound(format!("item {id}")))?;

    let related = catalog
        .related(item, RELATED_LIMIT)
        .iter()
        .map(ItemCardView::from)
        .collect();

    Ok(ItemShowTemplate {
        seller: item.by.clone(),
        tag_label: item.tag.label().to_owned(),
        item: ItemCardView::from(item),
        related,
    })
}
