//! Suplefit Storefront - session-scoped cart service.
//!
//! Serves the cart engine over JSON: product views resolved by the cart
//! engine's resolver, plus one server-held cart per shopper session.
//!
//! # Architecture
//!
//! - Axum web framework, JSON request/response bodies
//! - `tower-sessions` for the session-held cart id
//! - In-memory catalog loaded once at startup from a JSON file
//! - Carts are volatile process state; checkout and payment are external

#![cfg_attr(not(test), forbid(unsafe_code))]

use suplefit_storefront::catalog::Catalog;
use suplefit_storefront::config::StorefrontConfig;
use suplefit_storefront::routes;
use suplefit_storefront::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "suplefit_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    let catalog =
        Catalog::from_path(&config.catalog_path).expect("Failed to load catalog file");
    tracing::info!(products = catalog.len(), "Catalog loaded");

    let addr = config.socket_addr();
    let state = AppState::new(config, catalog);
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
