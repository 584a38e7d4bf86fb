//! # Gateway Configuration
//!
//! Configuration for the simulated gateway. The processing latency is a
//! knob rather than a hard-coded constant so tests can run with a zero
//! delay while the demo keeps its observable "processing..." pause.

use std::env;
use std::time::Duration;
use warung_core::OrderError;

/// Default simulated processing latency in milliseconds
pub const DEFAULT_LATENCY_MS: u64 = 2_000;

/// Simulated gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Simulated processing latency
    pub latency: Duration,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `WARUNG_GATEWAY_LATENCY_MS` (default 2000; zero is allowed)
    pub fn from_env() -> Result<Self, OrderError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let latency_ms = match env::var("WARUNG_GATEWAY_LATENCY_MS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                OrderError::Configuration(format!(
                    "WARUNG_GATEWAY_LATENCY_MS must be an integer, got {raw:?}"
                ))
            })?,
            Err(_) => DEFAULT_LATENCY_MS,
        };

        Ok(Self {
            latency: Duration::from_millis(latency_ms),
        })
    }

    /// Create config with an explicit latency
    pub fn with_latency_ms(latency_ms: u64) -> Self {
        Self {
            latency: Duration::from_millis(latency_ms),
        }
    }

    /// Config that resolves immediately (for tests)
    pub fn instant() -> Self {
        Self::with_latency_ms(0)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
        }
    }
}
