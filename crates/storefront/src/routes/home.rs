//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::models::session_keys;
use crate::routes::items::ItemCardView;
use crate::state::AppState;

/// Number of items shown per section on the home page.
const ITEMS_PER_SECTION: usize = 8;

/// Home page query parameters.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    /// Set to `1` after the simulated payment redirect.
    pub paid: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Roblox Limiteds section.
    pub limiteds: Vec<ItemCardView>,
    /// UGC Limiteds section.
    pub ugc: Vec<ItemCardView>,
    /// Banner after the simulated payment redirect.
    pub paid: bool,
    /// Open the auto geolocation dialog on first visit.
    pub auto_gate: bool,
    /// Inline catalog load error, if any.
    pub error: Option<String>,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<HomeQuery>,
) -> impl IntoResponse {
    let paid = query.paid.as_deref() == Some("1");

    // The auto address dialog runs until a saved address exists.
    let auto_gate = session
        .get::<crate::models::address::SavedAddress>(session_keys::SAVED_ADDRESS)
        .await
        .ok()
        .flatten()
        .is_none();

    match state.catalog().get().await {
        Ok(catalog) => HomeTemplate {
            limiteds: catalog
                .roblox_limiteds
                .iter()
                .take(ITEMS_PER_SECTION)
                .map(ItemCardView::from)
                .collect(),
            ugc: catalog
                .ugc_limiteds
                .iter()
                .take(ITEMS_PER_SECTION)
                .map(ItemCardView::from)
                .collect(),
            paid,
            auto_gate,
            error: None,
        },
        Err(e) => {
            tracing::error!("Failed to load catalog for home: {e}");
            HomeTemplate {
                limiteds: Vec::new(),
                ugc: Vec::new(),
                paid,
                auto_gate,
                error: Some(e.to_string()),
            }
        }
    }
}
