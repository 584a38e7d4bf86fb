//! # Simulated Gateway
//!
//! The payment processor for the storefront demo. There is no real
//! provider behind it: the attempt resolves deterministically from the
//! order total and the selected method's configured balance, after a
//! simulated processing latency.
//!
//! The latency is a cancellable `tokio::time::sleep`, never a blocking
//! call, so the host stays responsive while an attempt is in flight and
//! a dropped future costs nothing.

use crate::config::GatewayConfig;
use async_trait::async_trait;
use tracing::{debug, info, instrument};
use warung_core::{
    AttemptOutcome, CheckoutOrder, OrderError, OrderResult, PaymentGateway, PaymentMethod,
};

/// Simulated payment gateway with configurable latency
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    config: GatewayConfig,
}

impl SimulatedGateway {
    /// Create a gateway with the given configuration
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    /// Create from environment variables
    pub fn from_env() -> OrderResult<Self> {
        let config = GatewayConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// The configured processing latency
    pub fn latency(&self) -> std::time::Duration {
        self.config.latency
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(GatewayConfig::default())
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    #[instrument(skip(self, order, method), fields(total = %order.grand_total(), method_id = %method.id))]
    async fn authorize(
        &self,
        order: &CheckoutOrder,
        method: &PaymentMethod,
    ) -> OrderResult<AttemptOutcome> {
        if order.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        debug!(
            "Processing payment: {} items, latency {:?}",
            order.item_count(),
            self.config.latency
        );
        tokio::time::sleep(self.config.latency).await;

        let outcome = AttemptOutcome::evaluate(order, method);
        match &outcome {
            AttemptOutcome::Approved { order_id } => {
                info!("Payment approved: {}", order_id);
            }
            AttemptOutcome::Declined { reason } => {
                info!("Payment declined: {}", reason);
            }
        }

        Ok(outcome)
    }

    fn gateway_name(&self) -> &'static str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;
    use warung_core::{OrderLine, Rupiah};

    fn order_of(total: i64) -> CheckoutOrder {
        CheckoutOrder::new(vec![OrderLine {
            product_id: "p1".to_string(),
            name: "Kopi Susu Gula Aren".to_string(),
            quantity: 1,
            line_total: Rupiah::new(total),
        }])
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_honored() {
        let gateway = SimulatedGateway::new(GatewayConfig::with_latency_ms(2_000));
        let method = PaymentMethod::cash("cash", "Tunai (Cash)");

        let started = Instant::now();
        let outcome = gateway.authorize(&order_of(18_000), &method).await.unwrap();

        // The paused clock auto-advances through the sleep.
        assert!(started.elapsed() >= std::time::Duration::from_millis(2_000));
        assert!(matches!(outcome, AttemptOutcome::Approved { .. }));
    }

    #[tokio::test]
    async fn test_instant_config_resolves_immediately() {
        let gateway = SimulatedGateway::new(GatewayConfig::instant());
        let method = PaymentMethod::wallet("gopay", "GoPay", Rupiah::new(500_000));

        let outcome = gateway.authorize(&order_of(18_000), &method).await.unwrap();
        assert!(matches!(outcome, AttemptOutcome::Approved { .. }));
    }

    #[tokio::test]
    async fn test_declines_when_balance_short() {
        let gateway = SimulatedGateway::new(GatewayConfig::instant());
        let method = PaymentMethod::wallet("ovo", "OVO", Rupiah::new(25_000));

        let outcome = gateway.authorize(&order_of(50_000), &method).await.unwrap();
        let AttemptOutcome::Declined { reason } = outcome else {
            panic!("expected decline");
        };
        assert!(reason.contains("OVO"));
        assert!(reason.contains("Rp 25.000"));
    }

    #[tokio::test]
    async fn test_rejects_empty_order() {
        let gateway = SimulatedGateway::new(GatewayConfig::instant());
        let method = PaymentMethod::cash("cash", "Tunai (Cash)");

        let result = gateway
            .authorize(&CheckoutOrder::new(Vec::new()), &method)
            .await;
        assert!(matches!(result, Err(OrderError::EmptyOrder)));
    }
}
