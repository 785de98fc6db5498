//! Recipe browser
//!
//! User-facing operations: search, cuisine filter, recipe detail, favorite
//! toggling, the favorites and uploads grids, recent searches and uploads.
//! Composes the aggregator, the local store and the upload pipeline.

use crate::services::aggregator::{AggregateError, RecipeAggregator, RecipeQuery};
use crate::services::local_store::LocalStore;
use crate::services::recipe_source::{MealDbError, RecipeSource};
use crate::services::renderer::{to_card_views, to_detail_view, CardView, DetailView};
use crate::services::upload_pipeline::{UploadError, UploadForm, UploadPipeline, UploadState};
use larder_common::{LocalRecipe, Recipe};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Browser operation errors
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Recipe not found: {0}")]
    NotFound(String),

    #[error("Request {token} superseded by request {latest}")]
    Superseded { token: u64, latest: u64 },

    #[error("Remote recipe API error: {0}")]
    Remote(#[from] MealDbError),

    #[error("Store error: {0}")]
    Store(#[from] larder_common::Error),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl From<AggregateError> for BrowserError {
    fn from(err: AggregateError) -> Self {
        match err {
            AggregateError::Superseded { token, latest } => {
                BrowserError::Superseded { token, latest }
            }
            AggregateError::Store(e) => BrowserError::Store(e),
        }
    }
}

pub type BrowserResult<T> = Result<T, BrowserError>;

/// Entry point for every user action
pub struct RecipeBrowser {
    aggregator: RecipeAggregator,
    store: LocalStore,
    uploads: UploadPipeline,
}

impl RecipeBrowser {
    pub fn new(source: Arc<dyn RecipeSource>, store: LocalStore) -> Self {
        Self {
            aggregator: RecipeAggregator::new(source, store.clone()),
            uploads: UploadPipeline::new(store.clone()),
            store,
        }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn aggregator(&self) -> &RecipeAggregator {
        &self.aggregator
    }

    /// Search by free text
    ///
    /// A non-blank query is remembered as a recent search; a blank one lists
    /// everything.
    pub async fn search(&self, query: &str) -> BrowserResult<Vec<CardView>> {
        let term = query.trim();
        if term.is_empty() {
            return self.list_all().await;
        }

        self.store.add_recent_search(term).await?;
        self.list(&RecipeQuery::search(term)).await
    }

    /// Show one cuisine; a blank cuisine lists everything
    pub async fn filter_by_cuisine(&self, cuisine: &str) -> BrowserResult<Vec<CardView>> {
        let cuisine = cuisine.trim();
        if cuisine.is_empty() {
            return self.list_all().await;
        }

        self.list(&RecipeQuery::cuisine(cuisine)).await
    }

    pub async fn list_all(&self) -> BrowserResult<Vec<CardView>> {
        self.list(&RecipeQuery::all()).await
    }

    async fn list(&self, query: &RecipeQuery) -> BrowserResult<Vec<CardView>> {
        let recipes = self.aggregator.list_recipes(query).await?;
        let favorites = self.store.favorites().await?;
        Ok(to_card_views(&recipes, &favorites))
    }

    /// Resolve a recipe shown on a card
    ///
    /// Uploaded recipes come from the store. Remote recipes come from the
    /// aggregator cache, then the stored favorite copy, and only then from a
    /// remote lookup.
    pub async fn resolve_recipe(&self, id: &str, uploaded: bool) -> BrowserResult<Recipe> {
        if uploaded {
            return self
                .store
                .find_uploaded(id)
                .await?
                .map(Recipe::Local)
                .ok_or_else(|| BrowserError::NotFound(id.to_string()));
        }

        if let Some(recipe) = self.aggregator.cached(id).await {
            return Ok(Recipe::Remote(recipe));
        }

        let favorite = self
            .store
            .favorites()
            .await?
            .into_iter()
            .find(|fav| fav.id() == id);
        if let Some(recipe) = favorite {
            debug!(id = %id, "Recipe resolved from stored favorite");
            return Ok(recipe);
        }

        debug!(id = %id, "Recipe not cached, looking it up");
        self.aggregator
            .source()
            .lookup_by_id(id)
            .await?
            .map(Recipe::Remote)
            .ok_or_else(|| BrowserError::NotFound(id.to_string()))
    }

    pub async fn recipe_detail(&self, id: &str, uploaded: bool) -> BrowserResult<DetailView> {
        let recipe = self.resolve_recipe(id, uploaded).await?;
        Ok(to_detail_view(&recipe))
    }

    /// Flip favorite membership, returning the new membership
    ///
    /// Removing only needs the id, so an existing favorite never goes
    /// through recipe resolution.
    pub async fn toggle_favorite(&self, id: &str, uploaded: bool) -> BrowserResult<bool> {
        if self.store.is_favorite(id).await? {
            self.store.remove_favorite(id).await?;
            info!(id = %id, is_favorite = false, "Favorite toggled");
            return Ok(false);
        }

        let recipe = self.resolve_recipe(id, uploaded).await?;
        let is_favorite = self.store.toggle_favorite(&recipe).await?;
        info!(id = %id, is_favorite, "Favorite toggled");
        Ok(is_favorite)
    }

    pub async fn favorite_cards(&self) -> BrowserResult<Vec<CardView>> {
        let favorites = self.store.favorites().await?;
        Ok(to_card_views(&favorites, &favorites))
    }

    pub async fn uploaded_cards(&self) -> BrowserResult<Vec<CardView>> {
        let uploaded: Vec<Recipe> = self
            .store
            .uploaded_recipes()
            .await?
            .into_iter()
            .map(Recipe::Local)
            .collect();
        let favorites = self.store.favorites().await?;
        Ok(to_card_views(&uploaded, &favorites))
    }

    pub async fn recent_searches(&self) -> BrowserResult<Vec<String>> {
        Ok(self.store.recent_searches().await?)
    }

    pub async fn clear_recent_searches(&self) -> BrowserResult<()> {
        Ok(self.store.clear_recent_searches().await?)
    }

    pub async fn upload(&self, form: UploadForm) -> BrowserResult<LocalRecipe> {
        Ok(self.uploads.submit(form).await?)
    }

    pub fn upload_state(&self) -> UploadState {
        self.uploads.state()
    }
}
