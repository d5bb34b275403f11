//! HTTP route handlers for the cart service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//!
//! # Products (read-only catalog views)
//! GET  /products               - Product listing with size options
//! GET  /products/{id}          - Product detail
//!
//! # Cart (JSON, session-scoped)
//! GET  /cart                   - Cart with totals
//! POST /cart/add               - Add one unit of a resolved selection
//! POST /cart/update            - Set a line's quantity (guard-clamped)
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Total unit count badge
//!
//! # Checkout
//! GET  /checkout               - Cart snapshot handed to external checkout
//! ```

pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Build the full application router, session layer included.
pub fn app(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store).with_secure(false);

    Router::new()
        .route("/health", get(health))
        .route("/checkout", get(cart::checkout))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check.
async fn health() -> &'static str {
    "ok"
}
