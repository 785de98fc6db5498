//! Recent searches

use axum::{extract::State, http::StatusCode, Json};

use crate::error::ApiResult;
use crate::AppState;

/// GET /api/recent-searches
pub async fn list_recent_searches(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.browser.recent_searches().await?))
}

/// DELETE /api/recent-searches
pub async fn clear_recent_searches(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.browser.clear_recent_searches().await?;
    Ok(StatusCode::NO_CONTENT)
}
