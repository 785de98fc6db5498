//! Recipe listing, detail and favorite toggling

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::services::{CardView, DetailView};
use crate::AppState;

/// Query parameters for the recipe listing
///
/// `q` takes precedence over `cuisine`; neither lists everything.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
}

/// Marks a recipe id as referring to an uploaded recipe
#[derive(Debug, Default, Deserialize)]
pub struct RecipeRef {
    #[serde(default)]
    pub uploaded: bool,
}

#[derive(Debug, Serialize)]
pub struct RecipeListResponse {
    pub recipes: Vec<CardView>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub id: String,
    pub is_favorite: bool,
}

/// GET /api/recipes?q=&cuisine=
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<RecipeListResponse>> {
    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    let cuisine = query.cuisine.as_deref().map(str::trim).unwrap_or_default();

    let recipes = if !q.is_empty() {
        state.browser.search(q).await?
    } else if !cuisine.is_empty() {
        state.browser.filter_by_cuisine(cuisine).await?
    } else {
        state.browser.list_all().await?
    };

    Ok(Json(RecipeListResponse { recipes }))
}

/// GET /api/recipes/:id?uploaded=
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(recipe): Query<RecipeRef>,
) -> ApiResult<Json<DetailView>> {
    let detail = state.browser.recipe_detail(&id, recipe.uploaded).await?;
    Ok(Json(detail))
}

/// POST /api/recipes/:id/favorite?uploaded=
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(recipe): Query<RecipeRef>,
) -> ApiResult<Json<FavoriteResponse>> {
    let is_favorite = state.browser.toggle_favorite(&id, recipe.uploaded).await?;
    Ok(Json(FavoriteResponse { id, is_favorite }))
}
