//! HTTP API handlers for the recipe browser

pub mod favorites;
pub mod health;
pub mod recipes;
pub mod searches;
pub mod uploads;

pub use favorites::list_favorites;
pub use health::health_routes;
pub use recipes::{get_recipe, list_recipes, toggle_favorite};
pub use searches::{clear_recent_searches, list_recent_searches};
pub use uploads::{create_upload, list_uploads, MAX_UPLOAD_BYTES};
