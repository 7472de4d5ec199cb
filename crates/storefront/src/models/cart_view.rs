//! Cart and checkout-summary display data for templates.

use rust_decimal::Decimal;

use pixel_exchange_core::cart::{CartLine, CartState};
use pixel_exchange_core::checkout::CheckoutSummary;
use pixel_exchange_core::format_amount_2dp;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub qty: u32,
    /// Unit price; rendered with the `baht` filter.
    pub price: Decimal,
    /// Line total; rendered with the `baht` filter.
    pub line_total: Decimal,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: Decimal,
    pub count: u32,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            subtotal: Decimal::ZERO,
            count: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&CartState> for CartView {
    fn from(cart: &CartState) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            subtotal: cart.subtotal(),
            count: cart.count(),
        }
    }
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.clone(),
            title: line.title.clone(),
            image: line.image.clone(),
            qty: line.qty,
            price: line.price,
            line_total: line.line_total(),
        }
    }
}

/// Checkout summary display data: every figure preformatted to two
/// decimal places, the way the checkout page prints money.
#[derive(Clone)]
pub struct SummaryView {
    pub subtotal: String,
    pub shipping: String,
    pub website_fee: String,
    pub system_fee: String,
    pub platform_fee: String,
    pub processing_fee: String,
    pub vat: String,
    pub total: String,
    /// Raw total for the `/checkout?amount=` link.
    pub amount_param: String,
}

impl From<&CheckoutSummary> for SummaryView {
    fn from(summary: &CheckoutSummary) -> Self {
        Self {
            subtotal: format_amount_2dp(summary.subtotal),
            shipping: format_amount_2dp(summary.shipping),
            website_fee: format_amount_2dp(summary.website_fee),
            system_fee: format_amount_2dp(summary.system_fee),
            platform_fee: format_amount_2dp(summary.platform_fee),
            processing_fee: format_amount_2dp(summary.processing_fee),
            vat: format_amount_2dp(summary.vat),
            total: format_amount_2dp(summary.total),
            amount_param: summary.total_2dp().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pixel_exchange_core::cart::CartCommand;

    use super::*;

    #[test]
    fn test_cart_view_mirrors_state() {
        let mut cart = CartState::default();
        cart.apply(CartCommand::Add(CartLine {
            id: "rblx-1".to_owned(),
            title: "Sword Skin".to_owned(),
            image: None,
            price: Decimal::from(1245),
            qty: 2,
        }));

        let view = CartView::from(&cart);
        assert_eq!(view.count, 2);
        assert_eq!(view.subtotal, Decimal::from(2490));
        let line = view.lines.first().expect("one line");
        assert_eq!(line.line_total, Decimal::from(2490));
    }

    #[test]
    fn test_summary_view_formats_reference_values() {
        let summary = CheckoutSummary::from_subtotal(Decimal::from(1000));
        let view = SummaryView::from(&summary);
        assert_eq!(view.website_fee, "100.00");
        assert_eq!(view.vat, "80.50");
        assert_eq!(view.total, "1,255.49");
        assert_eq!(view.amount_param, "1255.49");
    }
}
