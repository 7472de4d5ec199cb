//! Cookie-consent route handlers.
//!
//! The banner fragment loads on every page via HTMX and renders only when
//! no decision cookie exists. Saving a decision sets the `cc_prefs` cookie
//! and mirrors it into the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::{HeaderMap, StatusCode, header},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::models::consent::ConsentPrefs;
use crate::models::session_keys;

/// Consent decision form data.
///
/// `decision` is `accept`, `reject`, or `custom`; the category checkboxes
/// only matter for `custom`.
#[derive(Debug, Deserialize)]
pub struct ConsentForm {
    pub decision: String,
    pub analytics: Option<String>,
    pub marketing: Option<String>,
}

/// Consent banner fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/consent_banner.html")]
pub struct ConsentBannerTemplate {
    /// Dark pattern: non-essential categories pre-checked in settings.
    pub analytics_default: bool,
    pub marketing_default: bool,
}

/// Empty fragment replacing the banner after a decision.
#[derive(Template, WebTemplate)]
#[template(path = "partials/consent_saved.html")]
pub struct ConsentSavedTemplate;

/// Render the banner, or nothing when a decision already exists (HTMX).
#[instrument(skip(headers))]
pub async fn banner(headers: HeaderMap) -> Response {
    let decided = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(ConsentPrefs::from_cookie_header)
        .is_some();

    if decided {
        StatusCode::NO_CONTENT.into_response()
    } else {
        ConsentBannerTemplate {
            analytics_default: true,
            marketing_default: true,
        }
        .into_response()
    }
}

/// Persist a consent decision (HTMX).
#[instrument(skip(session, form))]
pub async fn save(session: Session, Form(form): Form<ConsentForm>) -> Response {
    let prefs = match form.decision.as_str() {
        "accept" => ConsentPrefs::accept_all(),
        "reject" => ConsentPrefs::reject_non_essential(),
        _ => ConsentPrefs::custom(form.analytics.is_some(), form.marketing.is_some()),
    };

    // Mirror into the session; the cookie stays authoritative.
    if let Err(e) = session.insert(session_keys::CONSENT, &prefs).await {
        tracing::warn!("Failed to mirror consent prefs into session: {e}");
    }

    tracing::info!(
        analytics = prefs.analytics,
        marketing = prefs.marketing,
        "Consent decision recorded"
    );

    (
        AppendHeaders([
            ("set-cookie", prefs.set_cookie()),
            ("hx-trigger", "consent-saved".to_owned()),
        ]),
        ConsentSavedTemplate,
    )
        .into_response()
}
