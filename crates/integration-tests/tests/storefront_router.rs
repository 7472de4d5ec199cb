//! Integration tests for the storefront router.
//!
//! Each test builds the full application (router + middleware + session
//! layer) against a temporary catalog file and drives it in-process. The
//! session cookie is carried between requests by hand where a flow spans
//! more than one request.

use std::net::IpAddr;
use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use pixel_exchange_core::checkout::CheckoutSummary;
use pixel_exchange_storefront::config::{
    CheckoutConfig, GeocoderConfig, StorefrontConfig,
};
use rust_decimal::Decimal;
use pixel_exchange_storefront::routes;
use pixel_exchange_storefront::state::AppState;

const TEST_CATALOG: &str = r#"{
    "categories": [
        {"key": "all", "label": "All"},
        {"key": "limited", "label": "Roblox Limiteds"},
        {"key": "ugc", "label": "UGC Limiteds"}
    ],
    "robloxLimiteds": [
        {"id": "rblx-1", "title": "Sword Skin", "by": "ROBLOX", "tag": "LIMITED", "price": "1000", "image": "/static/images/items/rblx-1029025.svg"},
        {"id": "rblx-2", "title": "Classic Fedora", "by": "ROBLOX", "tag": "LIMITED", "price": "1245", "image": "/static/images/items/rblx-1029025.svg"}
    ],
    "ugcLimiteds": [
        {"id": "ugc-1", "title": "Boost x2", "by": "pixelsmith", "tag": "UGC", "price": "Free", "image": "/static/images/items/ugc-9254254338.svg"}
    ]
}"#;

// =============================================================================
// Helpers
// =============================================================================

fn test_config(catalog_path: PathBuf) -> StorefrontConfig {
    let dir = catalog_path
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    StorefrontConfig {
        host: "127.0.0.1".parse::<IpAddr>().expect("valid ip"),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        catalog_path,
        static_dir: dir.clone(),
        data_dir: dir,
        geocoder: GeocoderConfig {
            endpoint: "http://127.0.0.1:9/reverse".to_string(),
            user_agent: "PixelExchangeTests/0.1".to_string(),
            accept_language: "th".to_string(),
        },
        checkout: CheckoutConfig {
            qr_endpoint: "https://api.qrserver.com/v1/create-qr-code/".to_string(),
            promptpay_id: "0812345678".to_string(),
            account_name: "Panyakorn P.".to_string(),
        },
        sentry_dsn: None,
    }
}

/// Build the full app against a fresh temp catalog file.
fn test_app() -> Router {
    let path = std::env::temp_dir().join(format!("px-it-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, TEST_CATALOG).expect("write temp catalog");
    routes::app(AppState::new(test_config(path)))
}

/// Build the app against a missing catalog file.
fn broken_app() -> Router {
    let path = std::env::temp_dir().join(format!("px-it-missing-{}.json", uuid::Uuid::new_v4()));
    routes::app(AppState::new(test_config(path)))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request")
}

fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Extract the session cookie pair (`px_session=...`) from a response.
fn session_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("px_session="))
        .and_then(|value| value.split(';').next())
        .expect("session cookie present")
        .to_string()
}

// =============================================================================
// Health & pages
// =============================================================================

#[tokio::test]
async fn test_health() {
    let response = test_app().oneshot(get("/health")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_reflects_catalog() {
    let response = test_app()
        .oneshot(get("/health/ready"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = broken_app()
        .oneshot(get("/health/ready"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_home_renders_catalog_sections() {
    let response = test_app().oneshot(get("/")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Classic Fedora"));
    assert!(html.contains("Boost x2"));
    assert!(html.contains("฿1,245"));
}

#[tokio::test]
async fn test_home_with_broken_catalog_degrades_inline() {
    let response = broken_app().oneshot(get("/")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Failed to load catalog"));
}

#[tokio::test]
async fn test_listing_query_filter() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(get("/items?q=sword"))
        .await
        .expect("response");
    let html = body_text(response).await;
    assert!(html.contains("Sword Skin"));
    assert!(!html.contains("Boost x2"));

    let response = app.oneshot(get("/items?cat=ugc")).await.expect("response");
    let html = body_text(response).await;
    assert!(html.contains("Boost x2"));
    assert!(!html.contains("Sword Skin"));
}

#[tokio::test]
async fn test_item_detail_and_not_found() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(get("/item/rblx-2"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Classic Fedora"));
    assert!(html.contains("ID: rblx-2"));

    let response = app.oneshot(get("/item/nope")).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Cart flow
// =============================================================================

#[tokio::test]
async fn test_cart_count_starts_empty() {
    let response = test_app()
        .oneshot(get("/cart/count"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await.trim(), "0");
}

#[tokio::test]
async fn test_add_to_cart_and_view_cart() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(form_post("/cart/add", "id=rblx-1&qty=2", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("HX-Trigger")
            .and_then(|v| v.to_str().ok()),
        Some("cart-updated")
    );
    let cookie = session_cookie(&response);
    assert_eq!(body_text(response).await.trim(), "2");

    // The cart page shows the line and forces the address gate open
    let response = app
        .oneshot(get_with_cookie("/cart", &cookie))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Sword Skin"));
    assert!(html.contains("กรอกที่อยู่จัดส่ง"), "gate dialog is open");
    assert!(!html.contains("/checkout?amount="), "payment stays locked");
}

#[tokio::test]
async fn test_add_merges_and_update_clamps() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(form_post("/cart/add", "id=rblx-1&qty=1", None))
        .await
        .expect("response");
    let cookie = session_cookie(&response);

    let response = app
        .clone()
        .oneshot(form_post("/cart/add", "id=rblx-1&qty=1", Some(&cookie)))
        .await
        .expect("response");
    assert_eq!(body_text(response).await.trim(), "2", "same id merges");

    // Negative quantity clamps to zero but keeps the line
    let response = app
        .clone()
        .oneshot(form_post("/cart/update", "id=rblx-1&qty=-5", Some(&cookie)))
        .await
        .expect("response");
    let html = body_text(response).await;
    assert!(html.contains("Sword Skin"));

    let response = app
        .oneshot(get_with_cookie("/cart/count", &cookie))
        .await
        .expect("response");
    assert_eq!(body_text(response).await.trim(), "0");
}

#[tokio::test]
async fn test_unknown_item_add_is_rejected() {
    let response = test_app()
        .oneshot(form_post("/cart/add", "id=missing&qty=1", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_clear_empties_cart() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(form_post("/cart/add", "id=ugc-1&qty=3", None))
        .await
        .expect("response");
    let cookie = session_cookie(&response);

    let response = app
        .clone()
        .oneshot(form_post("/cart/clear", "", Some(&cookie)))
        .await
        .expect("response");
    let html = body_text(response).await;
    assert!(html.contains("ยังไม่มีสินค้าในตะกร้า"));

    let response = app
        .oneshot(get_with_cookie("/cart/count", &cookie))
        .await
        .expect("response");
    assert_eq!(body_text(response).await.trim(), "0");
}

// =============================================================================
// Address gate
// =============================================================================

const VALID_ADDRESS: &str = "full_name=Somchai%20Jaidee&email=somchai%40example.com\
&phone=0812345678&address1=99%2F1%20Sukhumvit&district=Khlong%20Toei\
&province=Bangkok&postcode=10110";

#[tokio::test]
async fn test_valid_address_unlocks_checkout() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(form_post("/cart/add", "id=rblx-1&qty=1", None))
        .await
        .expect("response");
    let cookie = session_cookie(&response);

    let response = app
        .clone()
        .oneshot(form_post("/address", VALID_ADDRESS, Some(&cookie)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("HX-Trigger")
            .and_then(|v| v.to_str().ok()),
        Some("address-saved")
    );

    // Payment link is live now; the linked amount matches the fee schedule
    let expected = CheckoutSummary::from_subtotal(Decimal::from(1000)).total_2dp();
    let response = app
        .oneshot(get_with_cookie("/cart", &cookie))
        .await
        .expect("response");
    let html = body_text(response).await;
    assert!(html.contains(&format!("/checkout?amount={expected}")));
    assert!(html.contains("1,255.49"));
}

#[tokio::test]
async fn test_invalid_address_reopens_dialog_with_errors() {
    let bad = "full_name=Somchai&email=somchai%40example.com&phone=123\
&address1=99&district=Khlong%20Toei&province=Bangkok&postcode=1011";

    let response = test_app()
        .oneshot(form_post("/address", bad, None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("HX-Trigger").is_none());

    let html = body_text(response).await;
    assert!(html.contains("เบอร์โทรศัพท์ไม่ถูกต้อง"));
    assert!(html.contains("รหัสไปรษณีย์ไม่ถูกต้อง"));
    // Submitted values are echoed back into the form
    assert!(html.contains("value=\"Somchai\""));
}

#[tokio::test]
async fn test_deny_messages_are_distinct() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(form_post("/address/deny", "reason=permission_denied", None))
        .await
        .expect("response");
    let denied = body_text(response).await;
    assert!(denied.contains("คุณปฏิเสธการเข้าถึงตำแหน่ง"));

    let response = app
        .clone()
        .oneshot(form_post("/address/deny", "reason=timeout", None))
        .await
        .expect("response");
    let timeout = body_text(response).await;
    assert!(timeout.contains("ขอพิกัดนานเกินกำหนด"));
    assert_ne!(denied, timeout);
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_page_renders_order_and_qr() {
    let response = test_app()
        .oneshot(get("/checkout?amount=1255.49"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("PX-"));
    assert!(html.contains("1,255.49"));
    assert!(html.contains("api.qrserver.com"));
    assert!(html.contains("0812345678"));
}

#[tokio::test]
async fn test_checkout_garbage_amount_is_zero() {
    let response = test_app()
        .oneshot(get("/checkout?amount=banana"))
        .await
        .expect("response");
    let html = body_text(response).await;
    assert!(html.contains("0.00 ฿"));
}

// =============================================================================
// Consent
// =============================================================================

#[tokio::test]
async fn test_consent_banner_then_decision_then_silence() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(get("/consent/banner"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("คุกกี้"));

    let response = app
        .clone()
        .oneshot(form_post("/consent", "decision=accept", None))
        .await
        .expect("response");
    let consent_cookie = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("cc_prefs="))
        .and_then(|value| value.split(';').next())
        .expect("consent cookie set")
        .to_string();

    let response = app
        .oneshot(get_with_cookie("/consent/banner", &consent_cookie))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// =============================================================================
// Engagement
// =============================================================================

#[tokio::test]
async fn test_toast_invents_a_purchase() {
    let response = test_app()
        .oneshot(get("/toasts/next"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("เพิ่งซื้อ"));
}

#[tokio::test]
async fn test_toast_endpoint_is_quiet_without_catalog() {
    let response = broken_app()
        .oneshot(get("/toasts/next"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
