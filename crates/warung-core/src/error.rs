//! # Error Types
//!
//! Typed error handling for the ordering engine. Every fallible core
//! operation returns `Result<T, OrderError>`.
//!
//! An insufficient wallet balance is NOT in this taxonomy: it is an
//! expected business outcome, modeled as the `Failed` checkout state.

use thiserror::Error;

/// Core error type for cart and checkout operations
#[derive(Debug, Error)]
pub enum OrderError {
    /// A cart operation was given a quantity of zero
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity { quantity: u32 },

    /// A product price below zero was submitted to the catalog
    #[error("Invalid price: {message}")]
    InvalidPrice { message: String },

    /// Checkout was requested for an order with no lines
    #[error("Checkout requires at least one line item")]
    EmptyOrder,

    /// Product not found in the catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Payment method id outside the configured set
    #[error("Unknown payment method: {method_id}")]
    UnknownMethod { method_id: String },

    /// A second "pay now" arrived while an attempt was in flight
    #[error("A payment attempt is already in progress")]
    CheckoutInProgress,

    /// A transition was requested from a state that does not allow it
    #[error("Cannot {action} while checkout is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    /// The payment gateway failed to produce an outcome
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Configuration errors (empty method set, bad environment values)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl OrderError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            OrderError::InvalidQuantity { .. } => 400,
            OrderError::InvalidPrice { .. } => 400,
            OrderError::EmptyOrder => 400,
            OrderError::ProductNotFound { .. } => 404,
            OrderError::UnknownMethod { .. } => 404,
            OrderError::CheckoutInProgress => 409,
            OrderError::InvalidTransition { .. } => 409,
            OrderError::Gateway(_) => 502,
            OrderError::Configuration(_) => 500,
        }
    }
}

/// Result type alias for cart and checkout operations
pub type OrderResult<T> = Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(OrderError::InvalidQuantity { quantity: 0 }.status_code(), 400);
        assert_eq!(
            OrderError::ProductNotFound {
                product_id: "x".into()
            }
            .status_code(),
            404
        );
        assert_eq!(OrderError::CheckoutInProgress.status_code(), 409);
        assert_eq!(OrderError::EmptyOrder.status_code(), 400);
    }

    #[test]
    fn test_messages_are_user_facing() {
        let err = OrderError::UnknownMethod {
            method_id: "dana".into(),
        };
        assert_eq!(err.to_string(), "Unknown payment method: dana");
    }
}
