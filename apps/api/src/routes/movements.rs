//! Stock ledger endpoints.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::routes::AppState;
use stockpos_core::{MovementKind, StockMovement, StockMovementView};

#[derive(Debug, Deserialize)]
pub struct CreateMovement {
    #[serde(rename = "productoId")]
    pub product_id: String,
    /// Units moved; must be positive. Direction comes from `tipo`.
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    /// "ENTRADA" or "SALIDA".
    #[serde(rename = "tipo")]
    pub kind: MovementKind,
}

/// Full movement history, newest first, with display names joined in.
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<StockMovementView>>> {
    let movements = state.db.stock().list().await?;
    Ok(Json(movements))
}

/// Records a manual stock movement (goods received or removed outside a
/// sale). Sale-driven exits are created by checkout, never through here.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateMovement>,
) -> ApiResult<Json<StockMovement>> {
    let movement = state
        .db
        .stock()
        .record(&payload.product_id, payload.quantity, payload.kind)
        .await?;

    Ok(Json(movement))
}
