//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (catalog loadable)
//!
//! # Catalog
//! GET  /items                  - Full listing (?cat=limited|ugc&q=search)
//! GET  /item/{id}              - Item detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add item (returns count badge, triggers cart-updated)
//! POST /cart/update            - Set quantity (returns cart body fragment)
//! POST /cart/remove            - Remove item (returns cart body fragment)
//! POST /cart/clear             - Empty the cart (returns cart body fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Simulated QR payment page (?amount=)
//!
//! # Address gate (HTMX fragments)
//! POST /address                - Save a manually entered address
//! POST /address/locate         - Reverse-geocode posted coordinates and save
//! POST /address/deny           - Record a geolocation failure
//! GET  /address/edit           - Reopen the dialog with the saved address
//!
//! # Consent (HTMX fragments)
//! GET  /consent/banner         - Banner (empty once a decision exists)
//! POST /consent                - Save a decision (sets the cc_prefs cookie)
//!
//! # Engagement
//! GET  /toasts/next            - Next invented purchase toast (polling)
//!
//! # Assets
//! GET  /static/*               - CSS, JS, images
//! GET  /data/*                 - The catalog JSON, as the browser sees it
//! ```

pub mod address;
pub mod cart;
pub mod checkout;
pub mod consent;
pub mod home;
pub mod items;
pub mod toasts;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the address gate routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(address::save))
        .route("/locate", post(address::locate))
        .route("/deny", post(address::deny))
        .route("/edit", get(address::edit))
}

/// Create the consent routes router.
pub fn consent_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(consent::save))
        .route("/banner", get(consent::banner))
}

/// Create all page and fragment routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .route("/items", get(items::index))
        .route("/item/{id}", get(items::show))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", get(checkout::show))
        // Address gate
        .nest("/address", address_routes())
        // Consent
        .nest("/consent", consent_routes())
        // Engagement
        .route("/toasts/next", get(toasts::next))
}

/// Build the complete application: routes, static assets, and the
/// middleware stack. Shared between the binary and the integration tests.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());
    let static_dir = state.config().static_dir.clone();
    let data_dir = state.config().data_dir.clone();

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .nest_service("/data", ServeDir::new(data_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(middleware::request_id_middleware))
                .layer(session_layer),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the catalog can be served before returning OK.
/// Returns 503 Service Unavailable while the catalog is unloadable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.catalog().get().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
