//! Sale endpoints. POST /sales is the atomic checkout.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::routes::AppState;
use stockpos_core::{Sale, SaleItem};
use stockpos_db::CheckoutItem;

#[derive(Debug, Deserialize)]
pub struct CreateSale {
    #[serde(rename = "clienteId")]
    pub client_id: String,
    pub items: Vec<SaleLine>,
}

#[derive(Debug, Deserialize)]
pub struct SaleLine {
    #[serde(rename = "productoId")]
    pub product_id: String,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
}

/// A sale together with its line items.
#[derive(Debug, Serialize)]
pub struct SaleResponse {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// Atomic multi-item checkout.
///
/// Either the whole cart commits (sale, stock exits, account debit) or
/// nothing does. Insufficient stock on any line rejects the entire request.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateSale>,
) -> ApiResult<Json<SaleResponse>> {
    let items: Vec<CheckoutItem> = payload
        .items
        .into_iter()
        .map(|line| CheckoutItem {
            product_id: line.product_id,
            quantity: line.quantity,
        })
        .collect();

    let (sale, items) = state.db.sales().checkout(&payload.client_id, &items).await?;

    Ok(Json(SaleResponse { sale, items }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SaleResponse>> {
    let sale = state
        .db
        .sales()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Sale not found: {id}")))?;

    let items = state.db.sales().get_items(&id).await?;

    Ok(Json(SaleResponse { sale, items }))
}
