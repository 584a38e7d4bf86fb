//! # Cart Aggregator
//!
//! The in-memory shopping cart for one user session: selected products,
//! per-product quantities, and derived totals. Pure data logic with no
//! I/O; the cart never talks to the catalog service or the payment
//! gateway, it only receives `Product` values from the caller.
//!
//! Ownership: one cart per session, explicitly owned and passed by the
//! caller. There is no ambient shared cart.

use crate::error::{OrderError, OrderResult};
use crate::money::Rupiah;
use crate::order::{CheckoutOrder, OrderLine};
use crate::product::Product;
use serde::{Deserialize, Serialize};

/// One product in the cart.
///
/// The unit price is captured when the product is first added and is not
/// refreshed if the catalog price changes later, so an in-progress cart
/// stays stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product id
    pub product_id: String,

    /// Product name (denormalized for display)
    pub name: String,

    /// Unit price at the time the product was added
    pub unit_price: Rupiah,

    /// Quantity, always >= 1 (a line at zero is removed instead)
    pub quantity: u32,

    /// Optional image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartLine {
    /// Unit price x quantity for this line
    pub fn line_total(&self) -> Rupiah {
        self.unit_price * self.quantity
    }
}

/// The cart for a single session. At most one line per product id;
/// first-add order is preserved so snapshots are deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` units of a product.
    ///
    /// An existing line for the same product id has its quantity
    /// increased; otherwise a new line is inserted with the product's
    /// current price. A quantity of zero is rejected with
    /// `OrderError::InvalidQuantity` rather than silently ignored.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> OrderResult<()> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity { quantity });
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity += quantity;
        } else {
            self.lines.push(CartLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                unit_price: product.price,
                quantity,
                image_url: product.image_url.clone(),
            });
        }
        Ok(())
    }

    /// Increase an existing line's quantity by one.
    ///
    /// Unknown product ids are a no-op (there is no price to open a new
    /// line with). Returns whether a line was touched.
    pub fn increment_item(&mut self, product_id: &str) -> bool {
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity += 1;
                true
            }
            None => false,
        }
    }

    /// Decrease a line's quantity by one.
    ///
    /// At quantity 1 the line is removed entirely, so a visible quantity
    /// of zero never exists. Unknown product ids are a no-op. Returns
    /// whether a line was touched.
    pub fn decrement_item(&mut self, product_id: &str) -> bool {
        let Some(index) = self.lines.iter().position(|l| l.product_id == product_id) else {
            return false;
        };

        if self.lines[index].quantity > 1 {
            self.lines[index].quantity -= 1;
        } else {
            self.lines.remove(index);
        }
        true
    }

    /// Delete a line unconditionally, returning it if present
    pub fn remove_item(&mut self, product_id: &str) -> Option<CartLine> {
        let index = self.lines.iter().position(|l| l.product_id == product_id)?;
        Some(self.lines.remove(index))
    }

    /// Empty the cart. Called exactly once per acknowledged order on the
    /// success path, or directly by the user.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Check if the cart has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The current lines, in first-add order
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Find a line by product id
    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Total unit count across all lines, recomputed from the line set
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Total price across all lines, recomputed from the line set
    pub fn total_price(&self) -> Rupiah {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Immutable order snapshot with the grand total computed fresh from
    /// the current lines, so the displayed total and the charged total
    /// cannot drift apart.
    pub fn snapshot(&self) -> CheckoutOrder {
        CheckoutOrder::new(
            self.lines
                .iter()
                .map(|l| OrderLine {
                    product_id: l.product_id.clone(),
                    name: l.name.clone(),
                    quantity: l.quantity,
                    line_total: l.line_total(),
                })
                .collect(),
        )
    }
}
