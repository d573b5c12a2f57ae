//! Product catalog endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::routes::AppState;
use stockpos_core::Product;

/// Inbound product payload. Keys match what the consuming frontend sends.
#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    #[serde(rename = "nombre")]
    pub name: String,
    pub sku: String,
    /// Price in cents.
    #[serde(rename = "precio")]
    pub price_cents: i64,
    /// Opening stock. Defaults to zero; later changes go through the
    /// stock ledger.
    #[serde(default)]
    pub stock: i64,
    #[serde(rename = "categoriaId", default)]
    pub category_id: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.db.products().list().await?;
    Ok(Json(products))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateProduct>,
) -> ApiResult<Json<Product>> {
    let product = state
        .db
        .products()
        .insert(
            &payload.name,
            &payload.sku,
            payload.price_cents,
            payload.stock,
            payload.category_id.as_deref(),
        )
        .await?;

    Ok(Json(product))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.db.products().delete(&id).await?;
    Ok(Json(json!({})))
}
