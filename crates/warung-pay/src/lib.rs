//! # warung-pay
//!
//! Simulated payment gateway for warung-cart-rs.
//!
//! Implements `warung_core::PaymentGateway` with a configurable
//! processing latency and the local balance-sufficiency rule. Real
//! payment gateway integration is out of scope for this storefront;
//! a provider crate would implement the same trait.

pub mod config;
pub mod gateway;

// Re-exports for convenience
pub use config::{GatewayConfig, DEFAULT_LATENCY_MS};
pub use gateway::SimulatedGateway;
