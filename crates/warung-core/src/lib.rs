//! # warung-core
//!
//! Core types and state machine for the warung-cart ordering engine.
//!
//! This crate provides:
//! - `Cart` and `CartLine` for per-session cart aggregation
//! - `CheckoutOrder` immutable snapshots and `OrderId` receipt numbers
//! - `PaymentMethod`, `Balance`, and `MethodBook` for the payment method set
//! - `CheckoutFlow` for the idle/submitting/succeeded/failed state machine
//! - `PaymentGateway` trait for pluggable payment processing
//! - `Product` and `MenuCatalog` for the menu
//! - `OrderError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use warung_core::{Cart, CheckoutFlow, Product, Rupiah, process_payment};
//!
//! let mut cart = Cart::new();
//! cart.add_item(&nasi_goreng, 2)?;
//!
//! let mut flow = CheckoutFlow::standard();
//! flow.select_method("ovo")?;
//!
//! let state = process_payment(&mut flow, &gateway, cart.snapshot()).await?;
//! if let Some(CheckoutState::Succeeded(receipt)) = state {
//!     // acknowledge, clear the cart, route back to the catalog
//! }
//! ```

pub mod cart;
pub mod checkout;
pub mod error;
pub mod gateway;
pub mod method;
pub mod money;
pub mod order;
pub mod product;

// Re-exports for convenience
pub use cart::{Cart, CartLine};
pub use checkout::{
    AttemptOutcome, CheckoutFlow, CheckoutState, Decline, Destination, PendingAttempt, Receipt,
};
pub use error::{OrderError, OrderResult};
pub use gateway::{process_payment, BoxedPaymentGateway, PaymentGateway};
pub use method::{Balance, MethodBook, PaymentMethod};
pub use money::Rupiah;
pub use order::{CheckoutOrder, OrderId, OrderLine};
pub use product::{MenuCatalog, NewProduct, Product, ProductPatch};
