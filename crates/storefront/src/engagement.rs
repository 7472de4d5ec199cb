//! Engagement widgets: urgency counters and live-purchase toasts.
//!
//! Everything here is cosmetic. The urgency numbers are deterministic per
//! item id (a seeded generator, so a card shows the same "stock" on every
//! render), while toasts are genuinely random per request.

use rand::Rng;
use rand::seq::IndexedRandom;
use uuid::Uuid;

// =============================================================================
// Seeded generator
// =============================================================================

/// A tiny deterministic generator seeded from a string id.
///
/// FNV-1a over the id seeds a mulberry32-style mixer. Not a statistical
/// RNG; it only has to spread item ids across the display ranges and stay
/// stable between renders.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Seed from an item id.
    #[must_use]
    pub fn from_id(id: &str) -> Self {
        let mut hash: u32 = 2_166_136_261;
        for byte in id.bytes() {
            hash ^= u32::from(byte);
            hash = hash.wrapping_mul(16_777_619);
        }
        Self { state: hash }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = (self.state ^ (self.state >> 15)).wrapping_mul(1 | self.state);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }

    /// Next integer in `[0, bound)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn next_below(&mut self, bound: u32) -> u32 {
        (self.next_f64() * f64::from(bound)) as u32
    }
}

// =============================================================================
// Urgency counters
// =============================================================================

/// The fake scarcity numbers shown on an item card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrgencySnapshot {
    /// "X left in stock", 2..=11.
    pub stock_left: u32,
    /// "Y people watching", 5..=34.
    pub watchers: u32,
    /// "Promo ends in mm:ss", 120..=599 seconds.
    pub promo_secs: u32,
}

impl UrgencySnapshot {
    /// Deterministic snapshot for an item id: the same id always produces
    /// the same numbers. Draw order matters for stability across renders.
    #[must_use]
    pub fn for_item(id: &str) -> Self {
        let mut rng = SeededRng::from_id(id);
        let stock_left = (rng.next_below(10) + 2).max(2);
        let watchers = rng.next_below(30) + 5;
        let promo_secs = rng.next_below(8 * 60) + 120;
        Self {
            stock_left,
            watchers,
            promo_secs,
        }
    }

    /// The promo countdown as `mm:ss`.
    #[must_use]
    pub fn promo_clock(&self) -> String {
        format!("{:02}:{:02}", self.promo_secs / 60, self.promo_secs % 60)
    }
}

// =============================================================================
// Live purchase toasts
// =============================================================================

/// Name pool the fake purchases are attributed to.
pub const TOAST_USERS: &[&str] = &[
    "Panyakorn K.",
    "Arthaphan C.",
    "Alisha P.",
    "TK R.",
    "JC W.",
    "Hope T.",
    "Perm S.",
];

/// Toast lifetime before the client fades it out, in milliseconds.
pub const TOAST_LIFETIME_MS: u32 = 5200;

/// A catalog item reduced to what a toast needs.
#[derive(Debug, Clone)]
pub struct PurchasePoolItem {
    pub title: String,
    pub image: Option<String>,
}

/// One invented purchase notification.
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: String,
    pub user_name: String,
    pub item_title: String,
    pub image: Option<String>,
    pub qty: u32,
    pub lifetime_ms: u32,
}

/// Invent a purchase from the pool. Returns `None` for an empty pool.
///
/// Quantity is 1 three times out of four, otherwise 1-3.
#[must_use]
pub fn make_random_toast(pool: &[PurchasePoolItem]) -> Option<Toast> {
    let mut rng = rand::rng();

    let item = pool.choose(&mut rng)?;
    let user_name = TOAST_USERS.choose(&mut rng).copied().unwrap_or("Guest");
    let qty = if rng.random::<f64>() < 0.75 {
        1
    } else {
        rng.random_range(1..=3)
    };

    Some(Toast {
        id: Uuid::new_v4().to_string(),
        user_name: user_name.to_owned(),
        item_title: item.title.clone(),
        image: item.image.clone(),
        qty,
        lifetime_ms: TOAST_LIFETIME_MS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut a = SeededRng::from_id("rblx-1029025");
        let mut b = SeededRng::from_id("rblx-1029025");
        for _ in 0..16 {
            let (va, vb) = (a.next_f64(), b.next_f64());
            assert!((va - vb).abs() < f64::EPSILON);
            assert!((0.0..1.0).contains(&va));
        }
    }

    #[test]
    fn test_snapshot_stable_per_id() {
        let first = UrgencySnapshot::for_item("rblx-1");
        let second = UrgencySnapshot::for_item("rblx-1");
        assert_eq!(first, second);
    }

    #[test]
    fn test_snapshot_ranges() {
        for i in 0..200 {
            let snap = UrgencySnapshot::for_item(&format!("item-{i}"));
            assert!((2..=12).contains(&snap.stock_left), "stock {}", snap.stock_left);
            assert!((5..=35).contains(&snap.watchers), "watchers {}", snap.watchers);
            assert!(
                (120..600).contains(&snap.promo_secs),
                "promo {}",
                snap.promo_secs
            );
        }
    }

    #[test]
    fn test_promo_clock_format() {
        let snap = UrgencySnapshot {
            stock_left: 3,
            watchers: 9,
            promo_secs: 125,
        };
        assert_eq!(snap.promo_clock(), "02:05");
    }

    #[test]
    fn test_toast_from_empty_pool_is_none() {
        assert!(make_random_toast(&[]).is_none());
    }

    #[test]
    fn test_toast_fields() {
        let pool = vec![PurchasePoolItem {
            title: "Classic Fedora".to_owned(),
            image: Some("/images/fedora.png".to_owned()),
        }];
        for _ in 0..50 {
            let toast = make_random_toast(&pool).expect("non-empty pool");
            assert_eq!(toast.item_title, "Classic Fedora");
            assert!((1..=3).contains(&toast.qty));
            assert!(TOAST_USERS.contains(&toast.user_name.as_str()));
            assert!(!toast.id.is_empty());
        }
    }
}
