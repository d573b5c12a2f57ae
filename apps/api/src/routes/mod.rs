//! # HTTP Routes
//!
//! Router assembly and shared state.
//!
//! ## Route Map
//! ```text
//! GET    /                      health probe
//! GET    /products              list catalog
//! POST   /products              create product
//! DELETE /products/:id          delete product (ledger rows survive)
//! GET    /categories            list categories
//! POST   /categories            create category
//! DELETE /categories/:id        delete category (products detach)
//! GET    /clients               list clients
//! POST   /clients               create client
//! DELETE /clients/:id           delete client
//! GET    /clients/:id/account   account history + derived balance
//! GET    /movements             stock ledger, newest first
//! POST   /movements             manual stock entry/exit
//! POST   /sales                 atomic multi-item checkout
//! GET    /sales/:id             sale with its items
//! POST   /payments              record a client payment
//! ```
//!
//! Handlers translate JSON to repository calls and back; every rule about
//! stock, totals and balances is enforced below this layer.

use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use stockpos_db::Database;

pub mod categories;
pub mod clients;
pub mod movements;
pub mod payments;
pub mod products;
pub mod sales;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

/// Builds the full application router.
///
/// CORS is wide open: the SPA is served from a different origin and the
/// API carries no credentials.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/products", get(products::list).post(products::create))
        .route("/products/:id", delete(products::remove))
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route("/categories/:id", delete(categories::remove))
        .route("/clients", get(clients::list).post(clients::create))
        .route("/clients/:id", delete(clients::remove))
        .route("/clients/:id/account", get(clients::account))
        .route("/movements", get(movements::list).post(movements::create))
        .route("/sales", post(sales::create))
        .route("/sales/:id", get(sales::get))
        .route("/payments", post(payments::create))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness probe.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "stockpos-api" }))
}
