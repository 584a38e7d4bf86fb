//! # Order Snapshot
//!
//! The immutable order taken from the cart when checkout begins, and the
//! generated receipt number handed back on success.

use crate::money::Rupiah;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One line of a finalized order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product id the line was built from
    pub product_id: String,

    /// Product name (denormalized for the receipt)
    pub name: String,

    /// Quantity
    pub quantity: u32,

    /// Unit price x quantity
    pub line_total: Rupiah,
}

/// Immutable snapshot of the cart taken at the moment checkout begins.
///
/// Created once per payment attempt and discarded when the attempt
/// resolves; nothing mutates it in between, so the total displayed to
/// the user is exactly the total the attempt is evaluated against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutOrder {
    lines: Vec<OrderLine>,
    grand_total: Rupiah,
    created_at: DateTime<Utc>,
}

impl CheckoutOrder {
    /// Build a snapshot; the grand total is computed fresh from the lines
    pub fn new(lines: Vec<OrderLine>) -> Self {
        let grand_total = lines.iter().map(|line| line.line_total).sum();
        Self {
            lines,
            grand_total,
            created_at: Utc::now(),
        }
    }

    /// The order lines, in the order they entered the cart
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Sum of all line totals
    pub fn grand_total(&self) -> Rupiah {
        self.grand_total
    }

    /// When the snapshot was taken
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Check if the order has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total unit count across all lines
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

/// A generated receipt number, e.g. `ORD-483920`.
///
/// Practically unique within a session; this is a simulated receipt
/// number, not a security token, so no cryptographic guarantees apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Receipt number prefix
    pub const PREFIX: &'static str = "ORD";

    /// Generate a fresh receipt number with a uniform 6-digit suffix
    pub fn generate() -> Self {
        let suffix: u32 = rand::thread_rng().gen_range(100_000..=999_999);
        OrderId(format!("{}-{}", Self::PREFIX, suffix))
    }

    /// The full receipt number string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: &str, quantity: u32, line_total: i64) -> OrderLine {
        OrderLine {
            product_id: product_id.to_string(),
            name: product_id.to_uppercase(),
            quantity,
            line_total: Rupiah::new(line_total),
        }
    }

    #[test]
    fn test_grand_total_is_sum_of_lines() {
        let order = CheckoutOrder::new(vec![line("p1", 2, 50_000), line("p2", 1, 5_000)]);

        assert_eq!(order.grand_total(), Rupiah::new(55_000));
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.lines().len(), 2);
    }

    #[test]
    fn test_empty_order() {
        let order = CheckoutOrder::new(Vec::new());
        assert!(order.is_empty());
        assert_eq!(order.grand_total(), Rupiah::ZERO);
    }

    #[test]
    fn test_order_id_format() {
        for _ in 0..100 {
            let id = OrderId::generate();
            let (prefix, suffix) = id.as_str().split_once('-').unwrap();
            assert_eq!(prefix, OrderId::PREFIX);
            let suffix: u32 = suffix.parse().unwrap();
            assert!((100_000..=999_999).contains(&suffix));
        }
    }
}
