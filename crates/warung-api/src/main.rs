//! # Warung Cart RS
//!
//! Food-ordering storefront backend with a simulated payment flow.
//!
//! ## Usage
//!
//! ```bash
//! # Optional environment overrides
//! export WARUNG_ADMIN_EMAIL=admin@warung.dev
//! export WARUNG_ADMIN_PASSWORD=...
//! export WARUNG_GATEWAY_LATENCY_MS=2000
//!
//! # Run the server
//! warung-cart
//! ```

use warung_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Print banner
    print_banner();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Menu items loaded: {}", state.catalog_read().len());
    info!("Accounts configured: {}", state.accounts.len());
    info!("Payment gateway: {}", state.gateway.gateway_name());

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("🍛 Warung-Cart starting on http://{}", addr);

    if !is_prod {
        info!("📝 Health: http://{}/health", addr);
        info!("🛒 Menu: GET http://{}/api/v1/products", addr);
        info!("💳 Checkout: POST http://{}/api/v1/checkout", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  🍛 Warung-Cart RS 🍛
  ━━━━━━━━━━━━━━━━━━━━━
  Storefront ordering engine
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
