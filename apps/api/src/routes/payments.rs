//! Payment endpoint: credits a client's current account.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::routes::AppState;
use stockpos_core::AccountMovement;

#[derive(Debug, Deserialize)]
pub struct CreatePayment {
    #[serde(rename = "clienteId")]
    pub client_id: String,
    /// Amount in cents; must be positive.
    #[serde(rename = "monto")]
    pub amount_cents: i64,
    #[serde(rename = "metodoPago")]
    pub payment_method: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
}

/// Records a payment. Identical payments are never deduplicated; paying the
/// same amount twice credits the account twice.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreatePayment>,
) -> ApiResult<Json<AccountMovement>> {
    let movement = state
        .db
        .accounts()
        .record_payment(
            &payload.client_id,
            payload.amount_cents,
            &payload.payment_method,
            payload.description.as_deref(),
        )
        .await?;

    Ok(Json(movement))
}
