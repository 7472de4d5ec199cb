//! Checkout route handler: the simulated PromptPay QR page.
//!
//! The amount comes from the `?amount=` parameter, independent of the cart
//! store. The order id is invented per render and nothing on this page
//! moves real money.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use pixel_exchange_core::format_amount_2dp;

use crate::filters;
use crate::models::address::SavedAddress;
use crate::models::session_keys;
use crate::state::AppState;

/// Payment window shown by the countdown, in seconds.
const PAYMENT_WINDOW_SECS: u32 = 15 * 60;

/// QR image edge length requested from the generator.
const QR_SIZE: &str = "280x280";

/// Checkout query parameters.
#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    pub amount: Option<String>,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate {
    /// Amount formatted with two decimal places.
    pub amount: String,
    pub order_id: String,
    pub qr_url: String,
    pub promptpay_id: String,
    pub account_name: String,
    pub countdown_secs: u32,
    pub address: Option<SavedAddress>,
}

/// Display the checkout page.
///
/// Garbage or missing amounts become zero; negative amounts clamp to zero.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CheckoutQuery>,
) -> impl IntoResponse {
    let amount = query
        .amount
        .as_deref()
        .and_then(|raw| Decimal::from_str(raw.trim()).ok())
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO);

    let order_id = generate_order_id();
    let checkout = &state.config().checkout;
    let qr_url = build_qr_url(
        &checkout.qr_endpoint,
        &checkout.promptpay_id,
        amount,
        &order_id,
    );

    let address = session
        .get::<SavedAddress>(session_keys::SAVED_ADDRESS)
        .await
        .ok()
        .flatten();

    CheckoutShowTemplate {
        amount: format_amount_2dp(amount),
        order_id,
        qr_url,
        promptpay_id: checkout.promptpay_id.clone(),
        account_name: checkout.account_name.clone(),
        countdown_secs: PAYMENT_WINDOW_SECS,
        address,
    }
}

// =============================================================================
// Order id & QR payload
// =============================================================================

/// Mock order id: `PX-<unix-ms in base36>-<4 random chars>`, uppercase.
fn generate_order_id() -> String {
    let millis = u128::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let mut rng = rand::rng();
    let suffix: String = (0..4)
        .map(|_| {
            const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
            let idx = rng.random_range(0..CHARSET.len());
            char::from(CHARSET.get(idx).copied().unwrap_or(b'X'))
        })
        .collect();

    format!("PX-{}-{suffix}", to_base36_upper(millis))
}

/// Uppercase base36 rendering of a non-negative integer.
fn to_base36_upper(mut n: u128) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_owned();
    }
    let mut out = Vec::new();
    while n > 0 {
        let digit = usize::try_from(n % 36).unwrap_or(0);
        out.push(DIGITS.get(digit).copied().unwrap_or(b'0'));
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Demo QR image URL: the payload is plain JSON, not an EMVCo PromptPay
/// message, and says so in its note field.
fn build_qr_url(endpoint: &str, promptpay_id: &str, amount: Decimal, order_id: &str) -> String {
    let payload = json!({
        "type": "PROMPTPAY_DEMO",
        "promptpay": promptpay_id,
        "amount": format!("{:.2}", amount.round_dp(2)),
        "orderId": order_id,
        "note": "DEMO ONLY - NOT A REAL PAYMENT",
    });
    let data = urlencoding::encode(&payload.to_string()).into_owned();
    format!("{endpoint}?size={QR_SIZE}&data={data}")
}
