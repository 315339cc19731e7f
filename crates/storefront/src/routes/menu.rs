//! Menu route handlers.
//!
//! Thin JSON proxies over the cafe API's catalog; responses are cached by
//! the client layer.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use marigold_core::CatalogItemId;

use crate::cafe_api::MenuItem;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// List the full menu.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<MenuItem>>> {
    let menu = state.cafe().list_menu().await?;
    Ok(Json(menu.as_ref().clone()))
}

/// Show a single menu item.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MenuItem>> {
    let id = CatalogItemId::parse(&id)
        .map_err(|e| AppError::BadRequest(format!("invalid menu item id: {e}")))?;
    let item = state.cafe().get_menu_item(&id).await?;
    Ok(Json(item))
}
