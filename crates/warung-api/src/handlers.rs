//! # Request Handlers
//!
//! Axum request handlers for the storefront API: sign-in, the menu
//! catalog (with the admin panel's mutations), the per-session cart, and
//! the checkout flow.

use crate::auth::{bearer_token, AuthError, Role};
use crate::state::{AppState, SessionEntry};
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use warung_core::{
    Balance, Cart, CheckoutState, Destination, NewProduct, OrderError, ProductPatch, Receipt,
    Rupiah,
};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Sign-in request
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Session info returned by sign-in and session lookup
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub email: String,
    pub role: Role,
}

/// Add-to-cart request
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// Product to add
    pub product_id: String,
    /// Units to add
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Payment method selection request
#[derive(Debug, Deserialize)]
pub struct SelectMethodRequest {
    pub method_id: String,
}

/// Dismissal of a failed attempt; `{}` means plain retry
#[derive(Debug, Default, Deserialize)]
pub struct DismissRequest {
    /// Also reset the selection to the unlimited method
    #[serde(default)]
    pub fallback_to_cash: bool,
}

/// Cart contents with derived totals
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub lines: Vec<warung_core::CartLine>,
    pub total_items: u32,
    pub total_price: Rupiah,
    pub total_display: String,
}

impl CartResponse {
    fn from_cart(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
            total_display: cart.total_price().display(),
        }
    }
}

/// One payment method as presented to the user
#[derive(Debug, Serialize)]
pub struct MethodView {
    pub id: String,
    pub label: String,
    /// `null` means unlimited (cash)
    pub balance: Option<Rupiah>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_display: Option<String>,
    pub selected: bool,
}

impl MethodView {
    fn new(method: &warung_core::PaymentMethod, selected: bool) -> Self {
        let balance = match method.balance {
            Balance::Unlimited => None,
            Balance::Fixed(amount) => Some(amount),
        };
        Self {
            id: method.id.clone(),
            label: method.label.clone(),
            balance,
            balance_display: balance.map(|b| b.display()),
            selected,
        }
    }
}

/// Receipt as presented on the success screen
#[derive(Debug, Serialize)]
pub struct ReceiptView {
    pub order_id: String,
    pub method: String,
    pub total: Rupiah,
    pub total_display: String,
}

impl ReceiptView {
    fn from_receipt(receipt: &Receipt) -> Self {
        Self {
            order_id: receipt.order_id.to_string(),
            method: receipt.method_label.clone(),
            total: receipt.grand_total,
            total_display: receipt.grand_total.display(),
        }
    }
}

/// Outcome of a checkout-related request, plus where to go next
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<ReceiptView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub next_route: &'static str,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn order_error_to_response(err: OrderError) -> ApiError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn auth_error_to_response(err: AuthError) -> ApiError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Auth Helpers
// =============================================================================

/// Resolve the caller's session from the Authorization header
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Arc<SessionEntry>, ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| auth_error_to_response(AuthError::MissingToken))?;

    let token =
        bearer_token(header).ok_or_else(|| auth_error_to_response(AuthError::MissingToken))?;

    state
        .session(token)
        .ok_or_else(|| auth_error_to_response(AuthError::UnknownSession))
}

/// Resolve the caller's session and require the admin role
fn authenticate_admin(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Arc<SessionEntry>, ApiError> {
    let entry = authenticate(state, headers)?;
    if !entry.session.is_admin() {
        return Err(auth_error_to_response(AuthError::AdminRequired));
    }
    Ok(entry)
}

// =============================================================================
// Health & Auth Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "warung-cart",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Sign in with email and password
#[instrument(skip(state, request))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state
        .sign_in(&request.email, &request.password)
        .map_err(|e| {
            info!("Sign-in rejected for {}", request.email);
            auth_error_to_response(e)
        })?;

    info!("Signed in: {} ({})", session.email, session.role.as_str());

    Ok(Json(SessionResponse {
        token: session.token,
        email: session.email,
        role: session.role,
    }))
}

/// Sign out, dropping the session and its cart
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let entry = authenticate(&state, &headers)?;
    state.sign_out(&entry.session.token);
    info!("Signed out: {}", entry.session.email);
    Ok(StatusCode::NO_CONTENT)
}

/// Current session info
pub async fn current_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, ApiError> {
    let entry = authenticate(&state, &headers)?;
    Ok(Json(SessionResponse {
        token: entry.session.token.clone(),
        email: entry.session.email.clone(),
        role: entry.session.role,
    }))
}

// =============================================================================
// Catalog Handlers
// =============================================================================

/// List orderable products
pub async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog_read();
    let products: Vec<_> = catalog.available_products().cloned().collect();
    Json(serde_json::json!({
        "products": products,
        "count": products.len()
    }))
}

/// Get a single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let catalog = state.catalog_read();
    let product = catalog.get(&product_id).ok_or_else(|| {
        order_error_to_response(OrderError::ProductNotFound {
            product_id: product_id.clone(),
        })
    })?;
    Ok(Json(product.clone()))
}

/// Create a menu item (admin)
#[instrument(skip(state, headers, request), fields(name = %request.name))]
pub async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<NewProduct>,
) -> Result<impl IntoResponse, ApiError> {
    authenticate_admin(&state, &headers)?;

    let product = state
        .catalog_write()
        .insert(request)
        .map_err(order_error_to_response)?;

    info!("Menu item created: {} ({})", product.name, product.id);
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a menu item (admin)
#[instrument(skip(state, headers, patch))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<ProductPatch>,
) -> Result<impl IntoResponse, ApiError> {
    authenticate_admin(&state, &headers)?;

    let product = state
        .catalog_write()
        .update(&product_id, patch)
        .map_err(order_error_to_response)?;

    info!("Menu item updated: {}", product.id);
    Ok(Json(product))
}

/// Delete a menu item (admin)
#[instrument(skip(state, headers))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    authenticate_admin(&state, &headers)?;

    let product = state
        .catalog_write()
        .remove(&product_id)
        .map_err(order_error_to_response)?;

    info!("Menu item deleted: {}", product.id);
    Ok(Json(product))
}

// =============================================================================
// Cart Handlers
// =============================================================================

/// Current cart contents and totals
pub async fn get_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CartResponse>, ApiError> {
    let entry = authenticate(&state, &headers)?;
    let shopper = entry.shopper.lock().await;
    Ok(Json(CartResponse::from_cart(&shopper.cart)))
}

/// Add a product to the cart
#[instrument(skip(state, headers, request), fields(product_id = %request.product_id, quantity = request.quantity))]
pub async fn add_cart_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let entry = authenticate(&state, &headers)?;

    let product = {
        let catalog = state.catalog_read();
        let product = catalog.get(&request.product_id).ok_or_else(|| {
            order_error_to_response(OrderError::ProductNotFound {
                product_id: request.product_id.clone(),
            })
        })?;
        if !product.available {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    format!("Product is not available: {}", request.product_id),
                    400,
                )),
            ));
        }
        product.clone()
    };

    let mut shopper = entry.shopper.lock().await;
    shopper
        .cart
        .add_item(&product, request.quantity)
        .map_err(order_error_to_response)?;

    Ok(Json(CartResponse::from_cart(&shopper.cart)))
}

/// Increase a line's quantity by one (absent lines are a no-op)
pub async fn increment_cart_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CartResponse>, ApiError> {
    let entry = authenticate(&state, &headers)?;
    let mut shopper = entry.shopper.lock().await;
    shopper.cart.increment_item(&product_id);
    Ok(Json(CartResponse::from_cart(&shopper.cart)))
}

/// Decrease a line's quantity by one; at one unit the line disappears
pub async fn decrement_cart_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CartResponse>, ApiError> {
    let entry = authenticate(&state, &headers)?;
    let mut shopper = entry.shopper.lock().await;
    shopper.cart.decrement_item(&product_id);
    Ok(Json(CartResponse::from_cart(&shopper.cart)))
}

/// Remove a line entirely
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CartResponse>, ApiError> {
    let entry = authenticate(&state, &headers)?;
    let mut shopper = entry.shopper.lock().await;
    shopper.cart.remove_item(&product_id);
    Ok(Json(CartResponse::from_cart(&shopper.cart)))
}

/// Empty the cart on the user's request
pub async fn clear_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CartResponse>, ApiError> {
    let entry = authenticate(&state, &headers)?;
    let mut shopper = entry.shopper.lock().await;
    shopper.cart.clear();
    Ok(Json(CartResponse::from_cart(&shopper.cart)))
}

// =============================================================================
// Payment Method Handlers
// =============================================================================

/// The session's payment methods with balances and selection
pub async fn list_methods(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let entry = authenticate(&state, &headers)?;
    let shopper = entry.shopper.lock().await;

    let book = shopper.flow.methods();
    let methods: Vec<_> = book
        .methods()
        .iter()
        .map(|m| MethodView::new(m, m.id == book.selected_id()))
        .collect();

    Ok(Json(serde_json::json!({ "methods": methods })))
}

/// Select the payment method for the next attempt
#[instrument(skip(state, headers, request), fields(method_id = %request.method_id))]
pub async fn select_method(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SelectMethodRequest>,
) -> Result<Json<MethodView>, ApiError> {
    let entry = authenticate(&state, &headers)?;
    let mut shopper = entry.shopper.lock().await;

    let method = shopper
        .flow
        .select_method(&request.method_id)
        .map_err(order_error_to_response)?;

    Ok(Json(MethodView::new(method, true)))
}

// =============================================================================
// Checkout Handlers
// =============================================================================

/// "Pay now": snapshot the cart, run the attempt through the gateway,
/// and report the terminal state.
#[instrument(skip(state, headers))]
pub async fn checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let entry = authenticate(&state, &headers)?;

    // Snapshot and enter Submitting under the lock, then release it for
    // the gateway latency so the cart stays readable and the attempt
    // stays cancellable while "processing" is on screen.
    let attempt = {
        let mut shopper = entry.shopper.lock().await;
        let order = shopper.cart.snapshot();
        shopper.flow.begin(order).map_err(order_error_to_response)?
    };

    info!(
        "Attempt started: {} items, total {}, method {}",
        attempt.order().item_count(),
        attempt.order().grand_total(),
        attempt.method().id
    );

    let outcome = match state
        .gateway
        .authorize(attempt.order(), attempt.method())
        .await
    {
        Ok(outcome) => outcome,
        Err(err) => {
            error!("Gateway failure: {}", err);
            let mut shopper = entry.shopper.lock().await;
            shopper.flow.cancel();
            return Err(order_error_to_response(err));
        }
    };

    let mut shopper = entry.shopper.lock().await;
    match shopper.flow.resolve(attempt, outcome) {
        Some(CheckoutState::Succeeded(receipt)) => Ok(Json(CheckoutResponse {
            status: "succeeded",
            receipt: Some(ReceiptView::from_receipt(receipt)),
            reason: None,
            next_route: Destination::PaymentResult.as_str(),
        })),
        Some(CheckoutState::Failed(decline)) => Ok(Json(CheckoutResponse {
            status: "failed",
            receipt: None,
            reason: Some(decline.reason.clone()),
            next_route: Destination::PaymentResult.as_str(),
        })),
        Some(other) => {
            error!("Attempt resolved to non-terminal state {}", other.name());
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Checkout resolved inconsistently", 500)),
            ))
        }
        // Cancelled while the gateway was processing: the resolution is
        // discarded and the user is already back at the cart.
        None => Ok(Json(CheckoutResponse {
            status: "cancelled",
            receipt: None,
            reason: None,
            next_route: Destination::Cart.as_str(),
        })),
    }
}

/// Acknowledge a successful attempt: back to idle, cart cleared exactly
/// once, user routed to the catalog.
#[instrument(skip(state, headers))]
pub async fn acknowledge_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let entry = authenticate(&state, &headers)?;
    let mut shopper = entry.shopper.lock().await;

    let receipt = shopper.flow.acknowledge().map_err(order_error_to_response)?;
    shopper.cart.clear();

    info!("Order acknowledged: {}", receipt.order_id);

    Ok(Json(CheckoutResponse {
        status: "acknowledged",
        receipt: Some(ReceiptView::from_receipt(&receipt)),
        reason: None,
        next_route: Destination::Catalog.as_str(),
    }))
}

/// Dismiss a failed attempt: plain retry, or fall back to cash
#[instrument(skip(state, headers, request), fields(fallback = request.fallback_to_cash))]
pub async fn dismiss_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DismissRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let entry = authenticate(&state, &headers)?;
    let mut shopper = entry.shopper.lock().await;

    if request.fallback_to_cash {
        shopper.flow.fall_back().map_err(order_error_to_response)?;
    } else {
        shopper.flow.retry().map_err(order_error_to_response)?;
    }

    Ok(Json(CheckoutResponse {
        status: "idle",
        receipt: None,
        reason: None,
        next_route: Destination::Cart.as_str(),
    }))
}

/// Abandon an in-flight attempt (user navigated away). A late gateway
/// resolution is discarded by the generation check.
pub async fn cancel_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let entry = authenticate(&state, &headers)?;
    let mut shopper = entry.shopper.lock().await;

    shopper.flow.cancel();

    Ok(Json(CheckoutResponse {
        status: "cancelled",
        receipt: None,
        reason: None,
        next_route: Destination::Cart.as_str(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
    }

    #[test]
    fn test_order_error_conversion() {
        let err = OrderError::EmptyOrder;
        let (status, _json) = order_error_to_response(err);
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let err = OrderError::CheckoutInProgress;
        let (status, _json) = order_error_to_response(err);
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_auth_error_conversion() {
        let (status, _json) = auth_error_to_response(AuthError::AdminRequired);
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_method_view_hides_unlimited_balance() {
        let cash = warung_core::PaymentMethod::cash("cash", "Tunai (Cash)");
        let view = MethodView::new(&cash, true);
        assert!(view.balance.is_none());
        assert!(view.selected);

        let ovo = warung_core::PaymentMethod::wallet("ovo", "OVO", Rupiah::new(25_000));
        let view = MethodView::new(&ovo, false);
        assert_eq!(view.balance, Some(Rupiah::new(25_000)));
        assert_eq!(view.balance_display.as_deref(), Some("Rp 25.000"));
    }
}
