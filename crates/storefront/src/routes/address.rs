//! Address gate route handlers.
//!
//! Two capture paths share the same saved-address slot: the manual dialog
//! (validated form) and the auto geolocation flow (coordinates posted by
//! the browser, reverse-geocoded server-side). Either success moves the
//! gate to `AddressSaved` and unlocks checkout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::models::address::{AddressForm, AddressGateState, AddressHistory, SavedAddress};
use crate::models::session_keys;
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

async fn persist_saved(session: &Session, addr: &SavedAddress) {
    if let Err(e) = session.insert(session_keys::SAVED_ADDRESS, addr).await {
        tracing::warn!("Failed to persist saved address: {e}");
    }
    if let Err(e) = session
        .insert(session_keys::GATE_STATE, AddressGateState::AddressSaved)
        .await
    {
        tracing::warn!("Failed to persist gate state: {e}");
    }
}

async fn push_history(session: &Session, addr: SavedAddress) {
    let mut history = session
        .get::<AddressHistory>(session_keys::ADDRESS_HISTORY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    history.push(addr);
    if let Err(e) = session.insert(session_keys::ADDRESS_HISTORY, &history).await {
        tracing::warn!("Failed to persist address history: {e}");
    }
}

async fn bump_deny_count(session: &Session) -> u32 {
    let count = session
        .get::<u32>(session_keys::DENY_COUNT)
        .await
        .ok()
        .flatten()
        .unwrap_or(0)
        .saturating_add(1);
    if let Err(e) = session.insert(session_keys::DENY_COUNT, count).await {
        tracing::warn!("Failed to persist deny count: {e}");
    }
    count
}

// =============================================================================
// Forms
// =============================================================================

/// Coordinates posted by the browser geolocation script.
#[derive(Debug, Deserialize)]
pub struct LocateForm {
    pub lat: f64,
    pub lon: f64,
    pub accuracy_m: Option<f64>,
}

/// Geolocation failure report from the browser.
#[derive(Debug, Deserialize)]
pub struct DenyForm {
    /// `permission_denied`, `position_unavailable`, `timeout`, or `insecure`.
    pub reason: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// The manual address dialog fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/address_gate.html")]
pub struct AddressGateTemplate {
    pub gate_open: bool,
    pub form: AddressForm,
    pub form_errors: Vec<String>,
}

/// Fragment shown once an address is on file.
#[derive(Template, WebTemplate)]
#[template(path = "partials/address_saved.html")]
pub struct AddressSavedTemplate {
    pub saved: SavedAddress,
    pub payment_enabled: bool,
}

/// Geolocation failure fragment with a retry affordance.
#[derive(Template, WebTemplate)]
#[template(path = "partials/locate_error.html")]
pub struct LocateErrorTemplate {
    pub message: String,
    pub deny_count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Save a manually entered address (HTMX).
///
/// On validation failure the dialog fragment is re-rendered with the
/// submitted values and one message per failed field; the gate stays open.
#[instrument(skip(session, form))]
pub async fn save(session: Session, Form(form): Form<AddressForm>) -> Response {
    match form.validate() {
        Ok(addr) => {
            persist_saved(&session, &addr).await;
            (
                AppendHeaders([("HX-Trigger", "address-saved")]),
                AddressSavedTemplate {
                    saved: addr,
                    payment_enabled: true,
                },
            )
                .into_response()
        }
        Err(errors) => AddressGateTemplate {
            gate_open: true,
            form,
            form_errors: errors,
        }
        .into_response(),
    }
}

/// Resolve browser coordinates to an address and save it (HTMX).
///
/// A successful resolve also lands in the bounded history list.
#[instrument(skip(state, session))]
pub async fn locate(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LocateForm>,
) -> Response {
    match state.geocoder().reverse(form.lat, form.lon).await {
        Ok(resolved) => {
            let addr = SavedAddress::from_resolved(resolved, form.lat, form.lon, form.accuracy_m);
            tracing::info!(
                lat = form.lat,
                lon = form.lon,
                accuracy_m = form.accuracy_m,
                address1 = %addr.address1,
                "Address resolved from coordinates"
            );
            persist_saved(&session, &addr).await;
            push_history(&session, addr.clone()).await;
            (
                AppendHeaders([("HX-Trigger", "address-saved")]),
                AddressSavedTemplate {
                    saved: addr,
                    payment_enabled: true,
                },
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!("Reverse geocode failed: {e}");
            LocateErrorTemplate {
                // "Could not convert the coordinates to an address"
                message: "แปลงพิกัดเป็นที่อยู่ไม่สำเร็จ ลองใหม่อีกครั้ง".to_owned(),
                deny_count: 0,
            }
            .into_response()
        }
    }
}

/// Record a geolocation failure (HTMX).
///
/// Each failure mode gets its own user-facing message; only an outright
/// permission denial bumps the denial counter.
#[instrument(skip(session))]
pub async fn deny(session: Session, Form(form): Form<DenyForm>) -> Response {
    let reason = form.reason.as_deref().unwrap_or("unknown");

    let (message, count) = match reason {
        "permission_denied" => {
            let count = bump_deny_count(&session).await;
            tracing::warn!(deny_count = count, "Visitor denied geolocation access");
            (
                "คุณปฏิเสธการเข้าถึงตำแหน่ง — กรุณาอนุญาตเพื่อใช้ฟีเจอร์จัดส่ง/โปรโมชันพื้นที่",
                count,
            )
        }
        "position_unavailable" => ("ไม่สามารถรับพิกัดได้ (สัญญาณ/บริการไม่พร้อม)", 0),
        "timeout" => ("ขอพิกัดนานเกินกำหนด ลองใหม่อีกครั้ง", 0),
        "insecure" => (
            "จำเป็นต้องเปิดผ่าน HTTPS หรือ localhost เพื่อดึงตำแหน่งอัตโนมัติ",
            0,
        ),
        _ => ("ขอพิกัดล้มเหลว", 0),
    };

    LocateErrorTemplate {
        message: message.to_owned(),
        deny_count: count,
    }
    .into_response()
}

/// Reopen the dialog to edit the saved address (HTMX).
#[instrument(skip(session))]
pub async fn edit(session: Session) -> Response {
    let saved = session
        .get::<SavedAddress>(session_keys::SAVED_ADDRESS)
        .await
        .ok()
        .flatten();

    if let Err(e) = session
        .insert(session_keys::GATE_STATE, AddressGateState::DialogOpen)
        .await
    {
        tracing::warn!("Failed to persist gate state: {e}");
    }

    AddressGateTemplate {
        gate_open: true,
        form: saved
            .as_ref()
            .map_or_else(AddressForm::default, AddressForm::from_saved),
        form_errors: Vec::new(),
    }
    .into_response()
}
