//! Shipping address models and the address-gate state machine.
//!
//! The gate is an explicit three-state machine rather than a pile of
//! booleans, so "dialog open but address already saved" is unrepresentable.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use pixel_exchange_core::{Email, PostalCode, ThaiPhone};

use crate::services::geocoder::ResolvedAddress;

/// How many resolved addresses the session history keeps.
pub const MAX_ADDRESS_HISTORY: usize = 10;

// =============================================================================
// Gate state machine
// =============================================================================

/// The mandatory-address-before-checkout gate.
///
/// Transitions:
/// - `NoAddress -> DialogOpen` whenever the cart page renders with a
///   non-empty cart and nothing saved.
/// - `DialogOpen -> AddressSaved` only on a fully valid submission (or a
///   successful geolocation resolve).
///
/// There is no dismiss transition; the edit affordance re-enters
/// `DialogOpen` from `AddressSaved`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressGateState {
    /// Nothing collected yet.
    #[default]
    NoAddress,
    /// The dialog is being forced on the visitor.
    DialogOpen,
    /// A valid address is on file; checkout is unlocked.
    AddressSaved,
}

impl AddressGateState {
    /// Payment is enabled only once an address is saved.
    #[must_use]
    pub const fn payment_enabled(self) -> bool {
        matches!(self, Self::AddressSaved)
    }

    /// True while the dialog is forced open.
    #[must_use]
    pub const fn is_dialog_open(self) -> bool {
        matches!(self, Self::DialogOpen)
    }
}

// =============================================================================
// Geolocation metadata
// =============================================================================

/// Where a set of coordinates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoSource {
    BrowserGeolocation,
}

/// Transport class inferred from the reported accuracy radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportClass {
    GpsLike,
    WifiCell,
    Coarse,
}

impl TransportClass {
    /// ≤ 50 m looks like GPS, ≤ 500 m like wifi/cell triangulation,
    /// anything else (or unknown) is coarse.
    #[must_use]
    pub fn infer(accuracy_m: Option<f64>) -> Self {
        match accuracy_m {
            Some(acc) if acc <= 50.0 => Self::GpsLike,
            Some(acc) if acc <= 500.0 => Self::WifiCell,
            _ => Self::Coarse,
        }
    }
}

/// Provenance of a geolocated coordinate pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMeta {
    pub source: GeoSource,
    pub accuracy_m: Option<f64>,
    pub inferred_transport: TransportClass,
    /// RFC 3339 capture time.
    pub ts: String,
}

impl GeoMeta {
    /// Metadata for a browser-geolocation fix captured now.
    #[must_use]
    pub fn browser(accuracy_m: Option<f64>) -> Self {
        Self {
            source: GeoSource::BrowserGeolocation,
            accuracy_m,
            inferred_transport: TransportClass::infer(accuracy_m),
            ts: Utc::now().to_rfc3339(),
        }
    }
}

// =============================================================================
// Saved address
// =============================================================================

/// The shipping address kept in the session.
///
/// Manual submissions fill the contact fields; geolocated captures fill
/// the coordinate and provenance fields instead. Nothing ties the saved
/// address to any particular order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedAddress {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address1: String,
    pub address2: Option<String>,
    pub subdistrict: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub postcode: Option<String>,
    pub note: Option<String>,
    pub formatted: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub geo: Option<GeoMeta>,
    pub geocoder_provider: Option<String>,
}

impl SavedAddress {
    /// Build a saved address from a geocoder resolve.
    #[must_use]
    pub fn from_resolved(
        resolved: ResolvedAddress,
        lat: f64,
        lon: f64,
        accuracy_m: Option<f64>,
    ) -> Self {
        Self {
            address1: resolved.address1,
            subdistrict: resolved.subdistrict,
            district: resolved.district,
            province: resolved.province,
            postcode: resolved.postcode,
            formatted: resolved.formatted,
            lat: Some(lat),
            lon: Some(lon),
            geo: Some(GeoMeta::browser(accuracy_m)),
            geocoder_provider: Some("nominatim".to_owned()),
            ..Self::default()
        }
    }

    /// District / province / postcode as one display line.
    #[must_use]
    pub fn area_line(&self) -> String {
        [&self.subdistrict, &self.district, &self.province, &self.postcode]
            .iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One history entry: when the geocoder resolve happened and what it said.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub ts: String,
    pub addr: SavedAddress,
}

/// Bounded history of successfully resolved addresses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressHistory(Vec<HistoryEntry>);

impl AddressHistory {
    /// Append an entry, dropping the oldest beyond [`MAX_ADDRESS_HISTORY`].
    pub fn push(&mut self, addr: SavedAddress) {
        self.0.push(HistoryEntry {
            ts: Utc::now().to_rfc3339(),
            addr,
        });
        if self.0.len() > MAX_ADDRESS_HISTORY {
            let excess = self.0.len() - MAX_ADDRESS_HISTORY;
            self.0.drain(..excess);
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.0
    }
}

// =============================================================================
// Manual address form
// =============================================================================

/// The manual address dialog's form payload (also echoed back into the
/// template to repopulate fields on validation failure).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address1: String,
    #[serde(default)]
    pub address2: String,
    #[serde(default)]
    pub subdistrict: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub note: String,
}

impl AddressForm {
    /// Prefill the form from a previously saved address.
    #[must_use]
    pub fn from_saved(saved: &SavedAddress) -> Self {
        Self {
            full_name: saved.full_name.clone().unwrap_or_default(),
            email: saved.email.clone().unwrap_or_default(),
            phone: saved.phone.clone().unwrap_or_default(),
            address1: saved.address1.clone(),
            address2: saved.address2.clone().unwrap_or_default(),
            subdistrict: saved.subdistrict.clone().unwrap_or_default(),
            district: saved.district.clone().unwrap_or_default(),
            province: saved.province.clone().unwrap_or_default(),
            postcode: saved.postcode.clone().unwrap_or_default(),
            note: saved.note.clone().unwrap_or_default(),
        }
    }

    /// Validate the submission and produce a saveable address.
    ///
    /// Required: name, email, phone, address line, district, province,
    /// postal code. Subdistrict, second address line, and note stay
    /// optional.
    ///
    /// # Errors
    ///
    /// Returns one message per failed field, in form order.
    pub fn validate(&self) -> Result<SavedAddress, Vec<String>> {
        let mut errors = Vec::new();

        if self.full_name.trim().is_empty() {
            errors.push("กรุณากรอกชื่อ-นามสกุล".to_owned());
        }

        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(e) => {
                errors.push(format!("อีเมลไม่ถูกต้อง ({e})"));
                None
            }
        };

        let phone = match ThaiPhone::parse(&self.phone) {
            Ok(phone) => Some(phone),
            Err(e) => {
                errors.push(format!("เบอร์โทรศัพท์ไม่ถูกต้อง ({e})"));
                None
            }
        };

        if self.address1.trim().is_empty() {
            errors.push("กรุณากรอกที่อยู่".to_owned());
        }
        if self.district.trim().is_empty() {
            errors.push("กรุณากรอกอำเภอ/เขต".to_owned());
        }
        if self.province.trim().is_empty() {
            errors.push("กรุณากรอกจังหวัด".to_owned());
        }

        let postcode = match PostalCode::parse(&self.postcode) {
            Ok(postcode) => Some(postcode),
            Err(e) => {
                errors.push(format!("รหัสไปรษณีย์ไม่ถูกต้อง ({e})"));
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let optional = |s: &str| {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        };

        Ok(SavedAddress {
            full_name: Some(self.full_name.trim().to_owned()),
            email: email.map(|e| e.as_str().to_owned()),
            phone: phone.map(|p| p.as_str().to_owned()),
            address1: self.address1.trim().to_owned(),
            address2: optional(&self.address2),
            subdistrict: optional(&self.subdistrict),
            district: Some(self.district.trim().to_owned()),
            province: Some(self.province.trim().to_owned()),
            postcode: postcode.map(|p| p.as_str().to_owned()),
            note: optional(&self.note),
            ..SavedAddress::default()
        })
    }
}
