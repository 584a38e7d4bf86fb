//! # warung-api
//!
//! HTTP API layer for warung-cart-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Email/password sign-in with role-carrying sessions
//! - Menu catalog endpoints (admin CRUD behind the admin role)
//! - Per-session cart and checkout endpoints
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/auth/signin` | Sign in |
//! | GET | `/api/v1/products` | List products |
//! | POST | `/api/v1/products` | Create product (admin) |
//! | GET | `/api/v1/cart` | Cart contents and totals |
//! | POST | `/api/v1/cart/items` | Add to cart |
//! | POST | `/api/v1/checkout` | Pay now |
//! | POST | `/api/v1/checkout/acknowledge` | Confirm success |

pub mod auth;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
