//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart state itself lives in the session; every mutation loads the
//! blob, runs the pure reducer, and stores the result back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use pixel_exchange_core::cart::{CartCommand, CartLine, CartState};
use pixel_exchange_core::checkout::CheckoutSummary;

use crate::filters;
use crate::models::address::{AddressForm, AddressGateState, SavedAddress};
use crate::models::cart_view::{CartView, SummaryView};
use crate::models::session_keys;
use crate::state::AppState;

/// Synthetic promo line offered by the home page dialog.
pub const PROMO_ID: &str = "promo-starter";

fn promo_line(qty: u32) -> CartLine {
    CartLine {
        id: PROMO_ID.to_owned(),
        title: "Starter Bundle (โปรโมชัน)".to_owned(),
        image: Some("/static/images/promo-starter.svg".to_owned()),
        price: Decimal::from(129),
        qty,
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Read the cart from the session; storage failures mean an empty cart.
pub(crate) async fn load_cart(session: &Session) -> CartState {
    session
        .get::<CartState>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart back; storage failures are logged and ignored.
pub(crate) async fn store_cart(session: &Session, cart: &CartState) {
    if let Err(e) = session.insert(session_keys::CART, cart).await {
        tracing::warn!("Failed to persist cart to session: {e}");
    }
}

async fn gate_state(session: &Session) -> AddressGateState {
    session
        .get::<AddressGateState>(session_keys::GATE_STATE)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

async fn store_gate_state(session: &Session, gate: AddressGateState) {
    if let Err(e) = session.insert(session_keys::GATE_STATE, gate).await {
        tracing::warn!("Failed to persist gate state to session: {e}");
    }
}

async fn saved_address(session: &Session) -> Option<SavedAddress> {
    session
        .get::<SavedAddress>(session_keys::SAVED_ADDRESS)
        .await
        .ok()
        .flatten()
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
    pub qty: Option<u32>,
}

/// Update cart quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub qty: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub summary: SummaryView,
    pub payment_enabled: bool,
    pub gate_open: bool,
    pub form: AddressForm,
    pub form_errors: Vec<String>,
    pub saved: Option<SavedAddress>,
}

/// Cart body fragment template (items + totals, for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_body.html")]
pub struct CartBodyTemplate {
    pub cart: CartView,
    pub summary: SummaryView,
    pub payment_enabled: bool,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn body_fragment(cart: &CartState, payment_enabled: bool) -> CartBodyTemplate {
    let summary = CheckoutSummary::from_subtotal(cart.subtotal());
    CartBodyTemplate {
        cart: CartView::from(cart),
        summary: SummaryView::from(&summary),
        payment_enabled,
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
///
/// Rendering with a non-empty cart and no saved address forces the address
/// gate dialog open (`NoAddress -> DialogOpen`).
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    let saved = saved_address(&session).await;

    let mut gate = gate_state(&session).await;
    if saved.is_some() {
        gate = AddressGateState::AddressSaved;
    } else if !cart.is_empty() {
        gate = AddressGateState::DialogOpen;
    }
    store_gate_state(&session, gate).await;

    let summary = CheckoutSummary::from_subtotal(cart.subtotal());
    let form = saved
        .as_ref()
        .map_or_else(AddressForm::default, AddressForm::from_saved);

    CartShowTemplate {
        cart: CartView::from(&cart),
        summary: SummaryView::from(&summary),
        payment_enabled: gate.payment_enabled(),
        gate_open: gate.is_dialog_open(),
        form,
        form_errors: Vec::new(),
        saved,
    }
}

/// Add an item to the cart (HTMX).
///
/// Returns the cart count badge plus an HTMX trigger so other fragments
/// can refresh themselves.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let qty = form.qty.unwrap_or(1);

    let line = if form.id == PROMO_ID {
        promo_line(qty)
    } else {
        let catalog = match state.catalog().get().await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!("Failed to load catalog for add-to-cart: {e}");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<span class=\"cart-error\">เพิ่มสินค้าไม่สำเร็จ</span>"),
                )
                    .into_response();
            }
        };

        let Some(item) = catalog.find(&form.id) else {
            return (
                StatusCode::NOT_FOUND,
                Html("<span class=\"cart-error\">ไม่พบสินค้า</span>"),
            )
                .into_response();
        };

        CartLine {
            id: item.id.clone(),
            title: item.title.clone(),
            image: Some(item.image.clone()),
            price: item.price_amount(),
            qty,
        }
    };

    let mut cart = load_cart(&session).await;
    cart.apply(CartCommand::Add(line));
    store_cart(&session, &cart).await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count: cart.count() },
    )
        .into_response()
}

/// Update a line's quantity (HTMX).
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Response {
    let mut cart = load_cart(&session).await;
    cart.apply(CartCommand::SetQty {
        id: form.id,
        qty: form.qty,
    });
    store_cart(&session, &cart).await;

    let payment_enabled = gate_state(&session).await.payment_enabled();
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        body_fragment(&cart, payment_enabled),
    )
        .into_response()
}

/// Remove a line (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Response {
    let mut cart = load_cart(&session).await;
    cart.apply(CartCommand::Remove { id: form.id });
    store_cart(&session, &cart).await;

    let payment_enabled = gate_state(&session).await.payment_enabled();
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        body_fragment(&cart, payment_enabled),
    )
        .into_response()
}

/// Empty the cart (HTMX).
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Response {
    let mut cart = load_cart(&session).await;
    cart.apply(CartCommand::Clear);
    store_cart(&session, &cart).await;

    let payment_enabled = gate_state(&session).await.payment_enabled();
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        body_fragment(&cart, payment_enabled),
    )
        .into_response()
}

/// Get the cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    CartCountTemplate { count: cart.count() }
}
