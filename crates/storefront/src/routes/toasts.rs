//! Live-purchase toast route handler.
//!
//! Polled by HTMX from the base layout; each call invents one purchase
//! from the catalog pool. With no catalog (or an empty one) the endpoint
//! goes quiet instead of erroring.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response};
use tracing::instrument;

use crate::engagement::{PurchasePoolItem, Toast, make_random_toast};
use crate::state::AppState;

/// Single toast fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/toast.html")]
pub struct ToastTemplate {
    pub toast: Toast,
}

/// Produce the next invented purchase toast (HTMX polling).
#[instrument(skip(state))]
pub async fn next(State(state): State<AppState>) -> Response {
    let Ok(catalog) = state.catalog().get().await else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let pool: Vec<PurchasePoolItem> = catalog
        .all_items()
        .map(|item| PurchasePoolItem {
            title: item.title.clone(),
            image: Some(item.image.clone()),
        })
        .collect();

    match make_random_toast(&pool) {
        Some(toast) => ToastTemplate { toast }.into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
