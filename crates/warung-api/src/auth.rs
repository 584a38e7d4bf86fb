//! # Accounts & Sessions
//!
//! Email/password accounts with bcrypt hashes and opaque bearer-token
//! sessions. The role travels on the session object; no handler compares
//! an email literal to decide who is an admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Capability attached to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can manage the menu catalog
    Admin,
    /// Can browse, fill a cart, and pay
    Customer,
}

impl Role {
    /// Role name as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }
}

/// Errors from sign-in and session lookup
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email unknown or password mismatch (indistinguishable on purpose)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Authorization header absent or not `Bearer <token>`
    #[error("Missing or malformed Authorization header")]
    MissingToken,

    /// Token does not name a live session
    #[error("Unknown or expired session")]
    UnknownSession,

    /// Caller's session lacks the admin role
    #[error("This operation requires the admin role")]
    AdminRequired,

    /// Credential store failure (hashing backend)
    #[error("Credential store error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials => 401,
            AuthError::MissingToken => 401,
            AuthError::UnknownSession => 401,
            AuthError::AdminRequired => 403,
            AuthError::Internal(_) => 500,
        }
    }
}

/// A configured account. Only the bcrypt hash is kept in memory.
#[derive(Debug, Clone)]
pub struct Account {
    /// Sign-in email
    pub email: String,

    /// Role granted to sessions of this account
    pub role: Role,

    password_hash: String,
}

impl Account {
    /// Hash the password and build the account
    pub fn new(
        email: impl Into<String>,
        password: &str,
        role: Role,
    ) -> Result<Self, AuthError> {
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(Self {
            email: email.into(),
            role,
            password_hash,
        })
    }

    /// Check a candidate password against the stored hash
    pub fn verify(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}

/// Accounts known to the storefront
#[derive(Debug, Clone, Default)]
pub struct AccountRegistry {
    accounts: Vec<Account>,
}

impl AccountRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            accounts: Vec::new(),
        }
    }

    /// Builder: add an account
    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }

    /// Add an account
    pub fn add(&mut self, account: Account) {
        self.accounts.push(account);
    }

    /// Find an account by email (case-insensitive)
    pub fn find(&self, email: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
    }

    /// Check credentials. Unknown email and wrong password both come
    /// back as `InvalidCredentials`.
    pub fn verify(&self, email: &str, password: &str) -> Result<&Account, AuthError> {
        let account = self.find(email).ok_or(AuthError::InvalidCredentials)?;
        if !account.verify(password) {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(account)
    }

    /// Seed the registry from environment variables.
    ///
    /// Optional env vars (dev-friendly defaults apply):
    /// - `WARUNG_ADMIN_EMAIL` / `WARUNG_ADMIN_PASSWORD`
    /// - `WARUNG_CUSTOMER_EMAIL` / `WARUNG_CUSTOMER_PASSWORD`
    pub fn from_env() -> Result<Self, AuthError> {
        dotenvy::dotenv().ok();

        let admin_email = std::env::var("WARUNG_ADMIN_EMAIL")
            .unwrap_or_else(|_| "admin@warung.dev".to_string());
        let admin_password = std::env::var("WARUNG_ADMIN_PASSWORD")
            .unwrap_or_else(|_| "admin-rahasia".to_string());
        let customer_email = std::env::var("WARUNG_CUSTOMER_EMAIL")
            .unwrap_or_else(|_| "pelanggan@warung.dev".to_string());
        let customer_password = std::env::var("WARUNG_CUSTOMER_PASSWORD")
            .unwrap_or_else(|_| "jajan-enak".to_string());

        Ok(Self::new()
            .with_account(Account::new(admin_email, &admin_password, Role::Admin)?)
            .with_account(Account::new(
                customer_email,
                &customer_password,
                Role::Customer,
            )?))
    }

    /// Number of configured accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// A signed-in session
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Opaque bearer token
    pub token: String,

    /// Account email
    pub email: String,

    /// Capability carried by this session
    pub role: Role,

    /// When the session was issued
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Issue a fresh session for an account
    pub fn issue(account: &Account) -> Self {
        Self {
            token: Uuid::new_v4().to_string(),
            email: account.email.clone(),
            role: account.role,
            created_at: Utc::now(),
        }
    }

    /// Check if this session carries the admin role
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_verify() {
        let account = Account::new("admin@warung.dev", "rahasia", Role::Admin).unwrap();

        assert!(account.verify("rahasia"));
        assert!(!account.verify("salah"));
    }

    #[test]
    fn test_registry_verify_hides_which_part_failed() {
        let registry = AccountRegistry::new().with_account(
            Account::new("admin@warung.dev", "rahasia", Role::Admin).unwrap(),
        );

        let unknown = registry.verify("ghost@warung.dev", "rahasia");
        let wrong = registry.verify("admin@warung.dev", "salah");

        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
        assert!(registry.verify("admin@warung.dev", "rahasia").is_ok());
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let registry = AccountRegistry::new().with_account(
            Account::new("Admin@Warung.dev", "rahasia", Role::Admin).unwrap(),
        );

        assert!(registry.find("admin@warung.dev").is_some());
    }

    #[test]
    fn test_session_carries_role() {
        let account = Account::new("pelanggan@warung.dev", "jajan", Role::Customer).unwrap();
        let session = Session::issue(&account);

        assert!(!session.is_admin());
        assert_eq!(session.email, "pelanggan@warung.dev");
        assert!(!session.token.is_empty());
    }

    #[test]
    fn test_sessions_get_distinct_tokens() {
        let account = Account::new("pelanggan@warung.dev", "jajan", Role::Customer).unwrap();
        assert_ne!(Session::issue(&account).token, Session::issue(&account).token);
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc123"), None);
        assert_eq!(bearer_token("abc123"), None);
    }

    #[test]
    fn test_auth_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::AdminRequired.status_code(), 403);
    }
}
