//! The checkout fee schedule.
//!
//! Pure arithmetic over [`Decimal`] so the user-facing numbers are exact.
//! The VAT base is subtotal *plus* the two percentage fees; the flat fees
//! are excluded from it.

use rust_decimal::Decimal;
use serde::Serialize;

/// A fully itemized checkout total derived from a cart subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    /// Cart subtotal the summary was derived from.
    pub subtotal: Decimal,
    /// Shipping cost (always zero for digital items).
    pub shipping: Decimal,
    /// 10% website fee on the subtotal.
    pub website_fee: Decimal,
    /// 5% system fee on the subtotal.
    pub system_fee: Decimal,
    /// Flat 15 platform surcharge.
    pub platform_fee: Decimal,
    /// Flat 9.99 processing surcharge.
    pub processing_fee: Decimal,
    /// 7% VAT on (subtotal + website fee + system fee).
    pub vat: Decimal,
    /// Grand total.
    pub total: Decimal,
}

impl CheckoutSummary {
    /// Derive the full fee breakdown from a subtotal.
    ///
    /// Negative subtotals are treated as zero; fees still apply to an
    /// empty cart the same way the checkout page would show them.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let subtotal = subtotal.max(Decimal::ZERO);

        let shipping = Decimal::ZERO;
        let website_fee = subtotal * Decimal::new(10, 2);
        let system_fee = subtotal * Decimal::new(5, 2);
        let platform_fee = Decimal::from(15);
        let processing_fee = Decimal::new(999, 2);
        let vat = (subtotal + website_fee + system_fee) * Decimal::new(7, 2);

        let total =
            subtotal + shipping + website_fee + system_fee + platform_fee + processing_fee + vat;

        Self {
            subtotal,
            shipping,
            website_fee,
            system_fee,
            platform_fee,
            processing_fee,
            vat,
            total,
        }
    }

    /// The grand total rounded to two decimal places, as shown to the user
    /// and passed to the checkout page via the `amount` parameter.
    #[must_use]
    pub fn total_2dp(&self) -> Decimal {
        self.total.round_dp(2)
    }
}
