//! # Routes
//!
//! Axum router configuration for the storefront API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Auth:
///   - POST /api/v1/auth/signin - Sign in, open a session
///   - POST /api/v1/auth/signout - Sign out, drop the session
///   - GET  /api/v1/auth/session - Current session info
///
/// - Catalog:
///   - GET    /api/v1/products - List orderable products
///   - GET    /api/v1/products/{id} - Get product by id
///   - POST   /api/v1/products - Create product (admin)
///   - PUT    /api/v1/products/{id} - Update product (admin)
///   - DELETE /api/v1/products/{id} - Delete product (admin)
///
/// - Cart (session-owned):
///   - GET    /api/v1/cart - Contents and totals
///   - POST   /api/v1/cart/items - Add a product
///   - POST   /api/v1/cart/items/{id}/increment - One more unit
///   - POST   /api/v1/cart/items/{id}/decrement - One fewer unit
///   - DELETE /api/v1/cart/items/{id} - Remove a line
///   - DELETE /api/v1/cart - Clear the cart
///
/// - Payment & checkout:
///   - GET  /api/v1/payment/methods - Methods with balances and selection
///   - PUT  /api/v1/payment/method - Select a method
///   - POST /api/v1/checkout - Pay now
///   - POST /api/v1/checkout/acknowledge - Confirm success, clear cart
///   - POST /api/v1/checkout/dismiss - Retry or fall back after failure
///   - POST /api/v1/checkout/cancel - Abandon an in-flight attempt
pub fn create_router(state: AppState) -> Router {
    // The mobile client is served from a different origin in development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/signin", post(handlers::sign_in))
        .route("/signout", post(handlers::sign_out))
        .route("/session", get(handlers::current_session));

    let catalog_routes = Router::new()
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/{product_id}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        );

    let cart_routes = Router::new()
        .route("/cart", get(handlers::get_cart).delete(handlers::clear_cart))
        .route("/cart/items", post(handlers::add_cart_item))
        .route(
            "/cart/items/{product_id}",
            delete(handlers::remove_cart_item),
        )
        .route(
            "/cart/items/{product_id}/increment",
            post(handlers::increment_cart_item),
        )
        .route(
            "/cart/items/{product_id}/decrement",
            post(handlers::decrement_cart_item),
        );

    let payment_routes = Router::new()
        .route("/payment/methods", get(handlers::list_methods))
        .route("/payment/method", put(handlers::select_method))
        .route("/checkout", post(handlers::checkout))
        .route("/checkout/acknowledge", post(handlers::acknowledge_checkout))
        .route("/checkout/dismiss", post(handlers::dismiss_checkout))
        .route("/checkout/cancel", post(handlers::cancel_checkout));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(catalog_routes)
        .merge(cart_routes)
        .merge(payment_routes);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
