//! Category endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::routes::AppState;
use stockpos_core::Category;

#[derive(Debug, Deserialize)]
pub struct CreateCategory {
    #[serde(rename = "nombre")]
    pub name: String,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.db.categories().list().await?;
    Ok(Json(categories))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategory>,
) -> ApiResult<Json<Category>> {
    let category = state.db.categories().insert(&payload.name).await?;
    Ok(Json(category))
}

/// Deletes a category. Products in it survive with their category detached.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.db.categories().delete(&id).await?;
    Ok(Json(json!({})))
}
