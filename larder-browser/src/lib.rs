//! larder-browser library - recipe browser service
//!
//! Merges TheMealDB results with locally uploaded recipes and keeps
//! favorites, recent searches and uploads in a local SQLite store.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod error;
pub mod services;

use services::RecipeBrowser;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub browser: Arc<RecipeBrowser>,
}

impl AppState {
    pub fn new(browser: RecipeBrowser) -> Self {
        Self {
            browser: Arc::new(browser),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let recipes = Router::new()
        .route("/api/recipes", get(api::list_recipes))
        .route("/api/recipes/:id", get(api::get_recipe))
        .route("/api/recipes/:id/favorite", post(api::toggle_favorite))
        .route("/api/favorites", get(api::list_favorites))
        .route(
            "/api/recent-searches",
            get(api::list_recent_searches).delete(api::clear_recent_searches),
        );

    let uploads = Router::new()
        .route(
            "/api/uploads",
            get(api::list_uploads).post(api::create_upload),
        )
        .layer(DefaultBodyLimit::max(api::MAX_UPLOAD_BYTES));

    Router::new()
        .merge(recipes)
        .merge(uploads)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
