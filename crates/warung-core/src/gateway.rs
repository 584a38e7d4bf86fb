//! # Payment Gateway Trait
//!
//! Seam between the checkout state machine and whatever processes the
//! payment. The workspace ships a simulated implementation
//! (`warung-pay`); a real provider would slot in behind the same trait
//! without touching the state machine.

use crate::checkout::{AttemptOutcome, CheckoutFlow, CheckoutState};
use crate::error::OrderResult;
use crate::method::PaymentMethod;
use crate::order::CheckoutOrder;
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment processing implementations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Process one attempt and produce its outcome.
    ///
    /// Implementations decide latency. The returned outcome is applied
    /// through `CheckoutFlow::resolve`, so a cancelled attempt is
    /// discarded even if this call eventually returns.
    async fn authorize(
        &self,
        order: &CheckoutOrder,
        method: &PaymentMethod,
    ) -> OrderResult<AttemptOutcome>;

    /// Gateway name for logging
    fn gateway_name(&self) -> &'static str;
}

/// Type alias for a shared gateway handle (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;

/// Drive one full attempt: begin, authorize, resolve.
///
/// Returns the terminal state reached, or `None` when the attempt was
/// cancelled while the gateway was processing. A gateway error rolls the
/// flow back to `Idle` before propagating.
///
/// Callers that need to cancel from another task should use
/// `CheckoutFlow::begin`/`resolve` directly and only hold the flow lock
/// around those two calls, not across the gateway await.
pub async fn process_payment<G>(
    flow: &mut CheckoutFlow,
    gateway: &G,
    order: CheckoutOrder,
) -> OrderResult<Option<CheckoutState>>
where
    G: PaymentGateway + ?Sized,
{
    let attempt = flow.begin(order)?;

    let outcome = match gateway.authorize(attempt.order(), attempt.method()).await {
        Ok(outcome) => outcome,
        Err(err) => {
            flow.cancel();
            return Err(err);
        }
    };

    Ok(flow.resolve(attempt, outcome).cloned())
}
