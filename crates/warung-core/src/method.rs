//! # Payment Methods
//!
//! The fixed set of ways to pay. A method either carries a finite wallet
//! balance or is unlimited (cash). Exactly one method is selected at any
//! time; the default selection is the unlimited method.

use crate::error::{OrderError, OrderResult};
use crate::money::Rupiah;
use serde::{Deserialize, Serialize};

/// Spendable balance of a payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Balance {
    /// No spending limit (cash)
    Unlimited,
    /// Fixed wallet balance in whole rupiah
    Fixed(Rupiah),
}

impl Balance {
    /// Whether this balance can cover `total`
    pub fn covers(&self, total: Rupiah) -> bool {
        match self {
            Balance::Unlimited => true,
            Balance::Fixed(balance) => total <= *balance,
        }
    }
}

/// A named way to pay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Stable identifier (e.g. "cash", "ovo")
    pub id: String,

    /// Display label shown on receipts and decline messages
    pub label: String,

    /// Configured balance. Not decremented on success: every attempt is
    /// evaluated against this configured value.
    pub balance: Balance,
}

impl PaymentMethod {
    /// Create an unlimited-balance method
    pub fn cash(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            balance: Balance::Unlimited,
        }
    }

    /// Create a fixed-balance wallet method
    pub fn wallet(id: impl Into<String>, label: impl Into<String>, balance: Rupiah) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            balance: Balance::Fixed(balance),
        }
    }

    /// Check if this method has no spending limit
    pub fn is_unlimited(&self) -> bool {
        matches!(self.balance, Balance::Unlimited)
    }
}

/// One session's method set with its current selection.
///
/// Invariant: the selected id and the default id always name methods in
/// the set, and the set is never empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodBook {
    methods: Vec<PaymentMethod>,
    selected_id: String,
    default_id: String,
}

impl MethodBook {
    /// Build a book from a non-empty method list.
    ///
    /// The default (and initial) selection is the first unlimited method,
    /// falling back to the first method when none is unlimited.
    pub fn new(methods: Vec<PaymentMethod>) -> OrderResult<Self> {
        let default = methods
            .iter()
            .find(|m| m.is_unlimited())
            .or_else(|| methods.first())
            .ok_or_else(|| {
                OrderError::Configuration("payment method set is empty".to_string())
            })?;
        let default_id = default.id.clone();

        Ok(Self {
            selected_id: default_id.clone(),
            default_id,
            methods,
        })
    }

    /// The standard storefront set: cash (unlimited, default) plus the
    /// two fixed-balance wallets.
    pub fn standard() -> Self {
        Self::new(vec![
            PaymentMethod::cash("cash", "Tunai (Cash)"),
            PaymentMethod::wallet("ovo", "OVO", Rupiah::new(25_000)),
            PaymentMethod::wallet("gopay", "GoPay", Rupiah::new(500_000)),
        ])
        .expect("standard method set is non-empty")
    }

    /// All configured methods
    pub fn methods(&self) -> &[PaymentMethod] {
        &self.methods
    }

    /// Find a method by id
    pub fn get(&self, id: &str) -> Option<&PaymentMethod> {
        self.methods.iter().find(|m| m.id == id)
    }

    /// The currently selected method
    pub fn selected(&self) -> &PaymentMethod {
        self.get(&self.selected_id)
            .expect("selected id always names a method in the set")
    }

    /// Id of the currently selected method
    pub fn selected_id(&self) -> &str {
        &self.selected_id
    }

    /// Id of the default (fallback) method
    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// Select a method by id
    pub fn select(&mut self, id: &str) -> OrderResult<&PaymentMethod> {
        if self.get(id).is_none() {
            return Err(OrderError::UnknownMethod {
                method_id: id.to_string(),
            });
        }
        self.selected_id = id.to_string();
        Ok(self.selected())
    }

    /// Reset the selection to the default method
    pub fn reset_default(&mut self) {
        self.selected_id = self.default_id.clone();
    }
}
