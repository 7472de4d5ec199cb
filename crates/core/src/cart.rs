//! The cart state machine.
//!
//! The cart is a pure reducer: a [`CartState`] plus a [`CartCommand`]
//! deterministically yields the next state. Persistence (the visitor's
//! session) is the caller's concern; nothing here performs I/O.
//!
//! Invariants:
//! - At most one line per item id. Adding an existing id merges quantities
//!   instead of duplicating the line.
//! - Line quantity never exceeds [`MAX_LINE_QTY`] and never goes below zero.
//!   A zero-quantity line is kept; removing it is an explicit command.
//! - Insertion order is preserved.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Hard cap on a single line's quantity.
pub const MAX_LINE_QTY: u32 = 99;

/// One cart entry, aggregating quantity for a single item id.
///
/// The id is normally a catalog item id, but synthetic ids (promo bundles)
/// are allowed; the cart does not care where a line came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog item id, or a synthetic promo id.
    pub id: String,
    /// Title snapshot taken when the line was created.
    pub title: String,
    /// Image reference snapshot, if the item had one.
    pub image: Option<String>,
    /// Unit price snapshot.
    pub price: Decimal,
    /// Quantity, `0..=MAX_LINE_QTY`.
    pub qty: u32,
}

impl CartLine {
    /// Line total: unit price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.qty)
    }
}

/// Commands accepted by the cart reducer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    /// Add a line; merges quantities when the id already exists.
    Add(CartLine),
    /// Remove the line with the given id; no-op when absent.
    Remove {
        /// Line id to remove.
        id: String,
    },
    /// Set a line's quantity; clamps below at zero, no-op for unknown ids.
    SetQty {
        /// Line id to update.
        id: String,
        /// Requested quantity; negative values clamp to zero.
        qty: i64,
    },
    /// Drop every line.
    Clear,
}

/// The cart: an ordered list of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    lines: Vec<CartLine>,
}

impl CartState {
    /// Apply one command, producing the next state in place.
    pub fn apply(&mut self, command: CartCommand) {
        match command {
            CartCommand::Add(mut line) => {
                if let Some(existing) = self.lines.iter_mut().find(|l| l.id == line.id) {
                    // Merge: bump quantity, keep the existing snapshot fields.
                    existing.qty = existing.qty.saturating_add(line.qty).min(MAX_LINE_QTY);
                } else {
                    line.qty = line.qty.min(MAX_LINE_QTY);
                    self.lines.push(line);
                }
            }
            CartCommand::Remove { id } => {
                self.lines.retain(|l| l.id != id);
            }
            CartCommand::SetQty { id, qty } => {
                if let Some(line) = self.lines.iter_mut().find(|l| l.id == id) {
                    line.qty = u32::try_from(qty.max(0)).unwrap_or(u32::MAX);
                }
            }
            CartCommand::Clear => {
                self.lines.clear();
            }
        }
    }

    /// The lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up a line by id.
    #[must_use]
    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Sum of price × qty over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|l| l.qty).sum()
    }

    /// True when the cart holds no lines at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: &str, price: i64, qty: u32) -> CartLine {
        CartLine {
            id: id.to_owned(),
            title: format!("Item {id}"),
            image: Some(format!("/images/{id}.png")),
            price: Decimal::from(price),
            qty,
        }
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut cart = CartState::default();
        cart.apply(CartCommand::Add(line("a", 100, 1)));
        cart.apply(CartCommand::Add(line("b", 50, 2)));

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(cart.subtotal(), Decimal::from(200));
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_add_merges_on_existing_id() {
        let mut cart = CartState::default();
        cart.apply(CartCommand::Add(line("a", 100, 1)));

        // Second add with a different snapshot: quantity merges, the
        // original price/title/image win.
        let mut changed = line("a", 999, 2);
        changed.title = "Renamed".to_owned();
        changed.image = None;
        cart.apply(CartCommand::Add(changed));

        assert_eq!(cart.lines().len(), 1);
        let merged = cart.line("a").unwrap();
        assert_eq!(merged.qty, 3);
        assert_eq!(merged.price, Decimal::from(100));
        assert_eq!(merged.title, "Item a");
        assert_eq!(merged.image.as_deref(), Some("/images/a.png"));
    }

    #[test]
    fn test_add_caps_quantity_at_99() {
        let mut cart = CartState::default();
        cart.apply(CartCommand::Add(line("a", 10, 98)));
        cart.apply(CartCommand::Add(line("a", 10, 5)));
        assert_eq!(cart.line("a").unwrap().qty, MAX_LINE_QTY);

        // A fresh line is capped too.
        cart.apply(CartCommand::Add(line("b", 10, 150)));
        assert_eq!(cart.line("b").unwrap().qty, MAX_LINE_QTY);
    }

    #[test]
    fn test_remove_filters_and_ignores_unknown() {
        let mut cart = CartState::default();
        cart.apply(CartCommand::Add(line("a", 100, 1)));
        cart.apply(CartCommand::Add(line("b", 50, 1)));

        cart.apply(CartCommand::Remove { id: "a".to_owned() });
        assert!(cart.line("a").is_none());
        assert_eq!(cart.lines().len(), 1);

        cart.apply(CartCommand::Remove {
            id: "missing".to_owned(),
        });
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_set_qty_clamps_negative_to_zero() {
        let mut cart = CartState::default();
        cart.apply(CartCommand::Add(line("a", 100, 3)));

        cart.apply(CartCommand::SetQty {
            id: "a".to_owned(),
            qty: -5,
        });
        let l = cart.line("a").unwrap();
        assert_eq!(l.qty, 0, "negative quantities clamp to zero");
        assert_eq!(cart.lines().len(), 1, "zero-qty lines are not auto-removed");
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_set_qty_unknown_id_is_noop() {
        let mut cart = CartState::default();
        cart.apply(CartCommand::Add(line("a", 100, 1)));

        let before = cart.clone();
        cart.apply(CartCommand::SetQty {
            id: "missing".to_owned(),
            qty: 7,
        });
        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear_empties_unconditionally() {
        let mut cart = CartState::default();
        cart.apply(CartCommand::Add(line("a", 100, 1)));
        cart.apply(CartCommand::Add(line("b", 50, 4)));

        cart.apply(CartCommand::Clear);
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_merge_invariant_over_command_sequence() {
        let mut cart = CartState::default();
        let commands = vec![
            CartCommand::Add(line("a", 100, 1)),
            CartCommand::Add(line("b", 50, 2)),
            CartCommand::Add(line("a", 100, 1)),
            CartCommand::SetQty {
                id: "b".to_owned(),
                qty: 0,
            },
            CartCommand::Add(line("c", 25, 99)),
            CartCommand::Remove { id: "a".to_owned() },
            CartCommand::Add(line("b", 50, 1)),
        ];

        for command in commands {
            cart.apply(command);

            // Merge invariant: no two lines share an id.
            let mut ids: Vec<&str> = cart.lines().iter().map(|l| l.id.as_str()).collect();
            ids.sort_unstable();
            let len_before = ids.len();
            ids.dedup();
            assert_eq!(ids.len(), len_before);

            // Subtotal always equals the recomputed sum.
            let expected: Decimal = cart
                .lines()
                .iter()
                .map(|l| l.price * Decimal::from(l.qty))
                .sum();
            assert_eq!(cart.subtotal(), expected);
        }
    }

    #[test]
    fn test_session_blob_roundtrip() {
        let mut cart = CartState::default();
        cart.apply(CartCommand::Add(line("a", 100, 2)));

        let blob = serde_json::to_string(&cart).unwrap();
        let restored: CartState = serde_json::from_str(&blob).unwrap();
        assert_eq!(restored, cart);
    }
}
