//! Recipe browser services

pub mod aggregator;
pub mod browser;
pub mod image_encoder;
pub mod local_store;
pub mod mealdb_client;
pub mod recipe_source;
pub mod renderer;
pub mod upload_pipeline;

pub use aggregator::{AggregateError, RecipeAggregator, RecipeQuery};
pub use browser::{BrowserError, BrowserResult, RecipeBrowser};
pub use image_encoder::{ImageContent, ImageFile, ImageReadError};
pub use local_store::{Collection, LocalStore};
pub use mealdb_client::MealDbClient;
pub use recipe_source::{MealDbError, RecipeSource};
pub use renderer::{CardView, DetailView};
pub use upload_pipeline::{UploadError, UploadField, UploadForm, UploadPipeline, UploadState};
