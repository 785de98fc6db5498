//! Favorites grid

use axum::{extract::State, Json};

use crate::error::ApiResult;
use crate::services::CardView;
use crate::AppState;

/// GET /api/favorites
///
/// Every card in the favorites grid is marked favorite.
pub async fn list_favorites(State(state): State<AppState>) -> ApiResult<Json<Vec<CardView>>> {
    Ok(Json(state.browser.favorite_cards().await?))
}
