//! Client endpoints, including the current-account view.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::routes::AppState;
use stockpos_core::{AccountKind, AccountMovement, Client, SaleItem};

#[derive(Debug, Deserialize)]
pub struct CreateClient {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(rename = "direccion", default)]
    pub address: Option<String>,
}

/// One account entry, with the sale's line items attached for purchases.
///
/// The account endpoint returns a bare array of these, oldest first; the
/// consumer folds the array into a balance itself.
#[derive(Debug, Serialize)]
pub struct AccountEntry {
    #[serde(flatten)]
    pub movement: AccountMovement,
    /// Line items of the originating sale. Empty for payments, and for
    /// purchases whose sale record is gone.
    pub items: Vec<SaleItem>,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Client>>> {
    let clients = state.db.clients().list().await?;
    Ok(Json(clients))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateClient>,
) -> ApiResult<Json<Client>> {
    let client = state
        .db
        .clients()
        .insert(
            &payload.name,
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.address.as_deref(),
        )
        .await?;

    Ok(Json(client))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.db.clients().delete(&id).await?;
    Ok(Json(json!({})))
}

/// Account history, oldest first, as a bare array.
///
/// Unknown clients are a 404 here (an empty history is a valid state for an
/// existing client, so the two cases must not be conflated).
pub async fn account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<AccountEntry>>> {
    if state.db.clients().get_by_id(&id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Client not found: {id}")));
    }

    let history = state.db.accounts().history(&id).await?;

    let mut movements = Vec::with_capacity(history.len());
    for movement in history {
        let items = match (&movement.kind, &movement.sale_id) {
            (AccountKind::Purchase, Some(sale_id)) => {
                state.db.sales().get_items(sale_id).await?
            }
            _ => Vec::new(),
        };
        movements.push(AccountEntry { movement, items });
    }

    Ok(Json(movements))
}
