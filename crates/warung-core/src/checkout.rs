//! # Checkout State Machine
//!
//! Drives one payment attempt from a finalized cart snapshot to a
//! terminal outcome: `Idle -> Submitting -> Succeeded | Failed`, with
//! `Idle` re-enterable after every terminal state.
//!
//! Reentrancy: a second "pay now" while an attempt is in flight is
//! rejected until the current attempt resolves. Cancellation: `cancel`
//! bumps a generation counter, so a late resolution for the abandoned
//! attempt is discarded instead of applied.

use crate::error::{OrderError, OrderResult};
use crate::method::{Balance, MethodBook, PaymentMethod};
use crate::money::Rupiah;
use crate::order::{CheckoutOrder, OrderId};
use serde::{Deserialize, Serialize};

/// Where the caller should take the user next.
///
/// The core only names the destination; mapping it to actual routing is
/// the host's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Product catalog / home
    Catalog,
    /// Cart review
    Cart,
    /// Payment result presentation
    PaymentResult,
}

impl Destination {
    /// Route name as used by the host
    pub fn as_str(&self) -> &'static str {
        match self {
            Destination::Catalog => "catalog",
            Destination::Cart => "cart",
            Destination::PaymentResult => "payment_result",
        }
    }
}

/// Receipt for a successful payment attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Generated receipt number
    pub order_id: OrderId,

    /// Label of the method that paid
    pub method_label: String,

    /// Charged total
    pub grand_total: Rupiah,
}

/// Stored failure outcome.
///
/// The reason is reconstructible from the method label, its balance, and
/// the grand total alone; the state machine holds no hidden inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decline {
    /// Id of the method that declined
    pub method_id: String,

    /// Human-readable reason shown to the user
    pub reason: String,
}

/// Result of evaluating one payment attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Payment went through; a receipt number was generated
    Approved { order_id: OrderId },
    /// Balance could not cover the order
    Declined { reason: String },
}

impl AttemptOutcome {
    /// The balance-sufficiency rule, evaluated exactly once per attempt.
    ///
    /// A finite balance smaller than the grand total declines; anything
    /// else approves with a fresh receipt number. Balances are never
    /// decremented: each attempt sees the method's configured balance.
    pub fn evaluate(order: &CheckoutOrder, method: &PaymentMethod) -> Self {
        match method.balance {
            Balance::Fixed(balance) if order.grand_total() > balance => {
                AttemptOutcome::Declined {
                    reason: format!(
                        "{} balance is not enough to cover {} (remaining: {})",
                        method.label,
                        order.grand_total(),
                        balance
                    ),
                }
            }
            _ => AttemptOutcome::Approved {
                order_id: OrderId::generate(),
            },
        }
    }
}

/// Current position in the checkout flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum CheckoutState {
    /// No attempt in progress; ready for "pay now"
    Idle,
    /// An attempt is in flight at the gateway
    Submitting,
    /// The attempt was approved
    Succeeded(Receipt),
    /// The attempt was declined
    Failed(Decline),
}

impl CheckoutState {
    /// State name for logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "idle",
            CheckoutState::Submitting => "submitting",
            CheckoutState::Succeeded(_) => "succeeded",
            CheckoutState::Failed(_) => "failed",
        }
    }
}

/// Token for an attempt in flight, captured at `begin` time.
///
/// Holds the immutable order snapshot and a clone of the method that was
/// selected when the attempt started, so a selection change mid-flight
/// cannot affect the outcome.
#[derive(Debug)]
pub struct PendingAttempt {
    order: CheckoutOrder,
    method: PaymentMethod,
    generation: u64,
}

impl PendingAttempt {
    /// The order being paid for
    pub fn order(&self) -> &CheckoutOrder {
        &self.order
    }

    /// The method captured at begin time
    pub fn method(&self) -> &PaymentMethod {
        &self.method
    }
}

/// One session's checkout flow: current state, method selection, and the
/// generation counter that invalidates cancelled attempts.
#[derive(Debug)]
pub struct CheckoutFlow {
    state: CheckoutState,
    methods: MethodBook,
    generation: u64,
}

impl CheckoutFlow {
    /// Create a flow in `Idle` with the given method set
    pub fn new(methods: MethodBook) -> Self {
        Self {
            state: CheckoutState::Idle,
            methods,
            generation: 0,
        }
    }

    /// Create a flow with the standard storefront method set
    pub fn standard() -> Self {
        Self::new(MethodBook::standard())
    }

    /// Current state
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// The method set and selection
    pub fn methods(&self) -> &MethodBook {
        &self.methods
    }

    /// Change the selected method.
    ///
    /// Allowed in any state: an attempt in flight captured its method at
    /// `begin` time and is unaffected.
    pub fn select_method(&mut self, id: &str) -> OrderResult<&PaymentMethod> {
        self.methods.select(id)
    }

    /// `Idle -> Submitting`.
    ///
    /// Rejects reentry while an attempt is already in flight and rejects
    /// an order with no lines (a validation failure, not a silent no-op).
    pub fn begin(&mut self, order: CheckoutOrder) -> OrderResult<PendingAttempt> {
        if matches!(self.state, CheckoutState::Submitting) {
            return Err(OrderError::CheckoutInProgress);
        }
        if order.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        self.state = CheckoutState::Submitting;
        Ok(PendingAttempt {
            method: self.methods.selected().clone(),
            order,
            generation: self.generation,
        })
    }

    /// Apply a resolved outcome.
    ///
    /// Returns `None`, leaving the state untouched, when the attempt was
    /// cancelled after `begin` (its generation is stale). Otherwise
    /// transitions to the terminal state and returns it.
    pub fn resolve(
        &mut self,
        attempt: PendingAttempt,
        outcome: AttemptOutcome,
    ) -> Option<&CheckoutState> {
        if attempt.generation != self.generation {
            return None;
        }

        self.state = match outcome {
            AttemptOutcome::Approved { order_id } => CheckoutState::Succeeded(Receipt {
                order_id,
                method_label: attempt.method.label,
                grand_total: attempt.order.grand_total(),
            }),
            AttemptOutcome::Declined { reason } => CheckoutState::Failed(Decline {
                method_id: attempt.method.id,
                reason,
            }),
        };
        Some(&self.state)
    }

    /// Abandon an in-flight attempt.
    ///
    /// The pending resolution becomes stale and `resolve` will discard
    /// it, so no orphaned success can land after the user has left the
    /// flow. No-op outside `Submitting`.
    pub fn cancel(&mut self) {
        if matches!(self.state, CheckoutState::Submitting) {
            self.generation = self.generation.wrapping_add(1);
            self.state = CheckoutState::Idle;
        }
    }

    /// `Succeeded -> Idle`.
    ///
    /// Hands the receipt to the caller, whose obligations are to clear
    /// the cart exactly once and route to `Destination::Catalog`.
    pub fn acknowledge(&mut self) -> OrderResult<Receipt> {
        match &self.state {
            CheckoutState::Succeeded(receipt) => {
                let receipt = receipt.clone();
                self.state = CheckoutState::Idle;
                Ok(receipt)
            }
            state => Err(OrderError::InvalidTransition {
                action: "acknowledge",
                state: state.name(),
            }),
        }
    }

    /// `Failed -> Idle`, keeping the current method selection
    pub fn retry(&mut self) -> OrderResult<()> {
        match self.state {
            CheckoutState::Failed(_) => {
                self.state = CheckoutState::Idle;
                Ok(())
            }
            ref state => Err(OrderError::InvalidTransition {
                action: "retry",
                state: state.name(),
            }),
        }
    }

    /// `Failed -> Idle`, resetting the selection to the default
    /// unlimited method (the "switch to cash" offer)
    pub fn fall_back(&mut self) -> OrderResult<()> {
        match self.state {
            CheckoutState::Failed(_) => {
                self.state = CheckoutState::Idle;
                self.methods.reset_default();
                Ok(())
            }
            ref state => Err(OrderError::InvalidTransition {
                action: "fall back",
                state: state.name(),
            }),
        }
    }
}
