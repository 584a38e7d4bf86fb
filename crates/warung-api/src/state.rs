//! # Application State
//!
//! Shared state for the Axum application: the menu catalog, the account
//! registry, the gateway handle, and the live session map.
//!
//! Each session exclusively owns one `Cart` and one `CheckoutFlow`,
//! created at sign-in and dropped at sign-out. There is no ambient
//! shared cart; screens reach their cart through their session entry.

use crate::auth::{AccountRegistry, AuthError, Session};
use dashmap::DashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;
use warung_core::{BoxedPaymentGateway, Cart, CheckoutFlow, MenuCatalog};
use warung_pay::SimulatedGateway;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Per-session mutable shop state: the cart and the checkout flow
#[derive(Debug)]
pub struct ShopperState {
    pub cart: Cart,
    pub flow: CheckoutFlow,
}

impl ShopperState {
    fn new() -> Self {
        Self {
            cart: Cart::new(),
            flow: CheckoutFlow::standard(),
        }
    }
}

/// A live session and its exclusively-owned shop state.
///
/// The shopper mutex is held only around cart and flow mutations, never
/// across the gateway latency, so cancellation and cart reads stay
/// possible while a payment attempt is in flight.
pub struct SessionEntry {
    pub session: Session,
    pub shopper: Mutex<ShopperState>,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Menu catalog (admin panel writes, everyone reads)
    pub catalog: Arc<RwLock<MenuCatalog>>,
    /// Configured accounts
    pub accounts: Arc<AccountRegistry>,
    /// Live sessions keyed by bearer token
    pub sessions: Arc<DashMap<String, Arc<SessionEntry>>>,
    /// Payment gateway
    pub gateway: BoxedPaymentGateway,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create the production state: env config, env-seeded accounts, the
    /// TOML menu seed, and the simulated gateway.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let catalog = load_menu_catalog()?;
        let accounts = AccountRegistry::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to seed accounts: {}", e))?;
        let gateway = SimulatedGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to configure gateway: {}", e))?;

        Ok(Self::with_parts(catalog, accounts, Arc::new(gateway), config))
    }

    /// Assemble state from explicit parts (tests inject an instant
    /// gateway and a known account set here)
    pub fn with_parts(
        catalog: MenuCatalog,
        accounts: AccountRegistry,
        gateway: BoxedPaymentGateway,
        config: AppConfig,
    ) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
            accounts: Arc::new(accounts),
            sessions: Arc::new(DashMap::new()),
            gateway,
            config,
        }
    }

    /// Read access to the catalog
    pub fn catalog_read(&self) -> RwLockReadGuard<'_, MenuCatalog> {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write access to the catalog
    pub fn catalog_write(&self) -> RwLockWriteGuard<'_, MenuCatalog> {
        self.catalog.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Verify credentials and open a session with a fresh cart and flow
    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let account = self.accounts.verify(email, password)?;
        let session = Session::issue(account);

        self.sessions.insert(
            session.token.clone(),
            Arc::new(SessionEntry {
                session: session.clone(),
                shopper: Mutex::new(ShopperState::new()),
            }),
        );
        Ok(session)
    }

    /// Drop a session and everything it owns. Returns whether the token
    /// named a live session.
    pub fn sign_out(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Look up a live session by token
    pub fn session(&self, token: &str) -> Option<Arc<SessionEntry>> {
        self.sessions.get(token).map(|entry| Arc::clone(&entry))
    }
}

/// Load the menu catalog from the config file
fn load_menu_catalog() -> anyhow::Result<MenuCatalog> {
    let config_paths = [
        "config/menu.toml",
        "../config/menu.toml",
        "../../config/menu.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = MenuCatalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} menu items from {}", catalog.len(), path);
            return Ok(catalog);
        }
    }

    tracing::warn!("No menu config found, starting with an empty catalog");
    Ok(MenuCatalog::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Account, Role};
    use warung_pay::GatewayConfig;

    fn test_state() -> AppState {
        let accounts = AccountRegistry::new().with_account(
            Account::new("admin@warung.dev", "rahasia", Role::Admin).unwrap(),
        );
        AppState::with_parts(
            MenuCatalog::new(),
            accounts,
            Arc::new(SimulatedGateway::new(GatewayConfig::instant())),
            AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                environment: "test".to_string(),
            },
        )
    }

    #[test]
    fn test_sign_in_opens_fresh_session() {
        let state = test_state();

        let session = state.sign_in("admin@warung.dev", "rahasia").unwrap();
        let entry = state.session(&session.token).unwrap();

        assert_eq!(entry.session.email, "admin@warung.dev");
        assert!(entry.session.is_admin());
    }

    #[test]
    fn test_sign_in_bad_credentials() {
        let state = test_state();
        let result = state.sign_in("admin@warung.dev", "salah");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_sign_out_drops_session() {
        let state = test_state();
        let session = state.sign_in("admin@warung.dev", "rahasia").unwrap();

        assert!(state.sign_out(&session.token));
        assert!(state.session(&session.token).is_none());
        assert!(!state.sign_out(&session.token));
    }

    #[tokio::test]
    async fn test_each_session_owns_its_own_cart() {
        let state = test_state();
        let first = state.sign_in("admin@warung.dev", "rahasia").unwrap();
        let second = state.sign_in("admin@warung.dev", "rahasia").unwrap();

        let first_entry = state.session(&first.token).unwrap();
        let second_entry = state.session(&second.token).unwrap();

        let nasi = warung_core::Product::new("p1", "Nasi Goreng", warung_core::Rupiah::new(25_000));
        first_entry
            .shopper
            .lock()
            .await
            .cart
            .add_item(&nasi, 2)
            .unwrap();

        assert_eq!(first_entry.shopper.lock().await.cart.total_items(), 2);
        assert!(second_entry.shopper.lock().await.cart.is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
        };
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }
}
