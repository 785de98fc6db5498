//! Recipe aggregation
//!
//! Merges remote recipes with uploaded ones into a single display list:
//!
//! 1. Resolve the remote set (search term → name search; cuisine → cuisine
//!    filter expanded to full recipes; neither → first-letter listing).
//!    A remote failure degrades to an empty remote set.
//! 2. Read every uploaded recipe.
//! 3. Apply the active predicate to the union of both.
//! 4. Replace the remote cache with the full remote set from step 1.
//!
//! Every call takes a request token before going remote. A call whose token
//! is no longer the latest when its remote work resolves is discarded, so the
//! most recent request always determines the cache and the displayed list.

use crate::services::local_store::LocalStore;
use crate::services::recipe_source::{MealDbError, RecipeSource};
use futures::future::try_join_all;
use larder_common::{Recipe, RemoteRecipe};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Maximum cuisine summaries expanded into full recipes per query
pub const CUISINE_EXPANSION_LIMIT: usize = 12;

/// Letter used for the unfiltered listing
pub const DEFAULT_LISTING_LETTER: char = 'a';

/// Aggregation errors
#[derive(Debug, Error)]
pub enum AggregateError {
    /// A newer request was issued while this one was in flight
    #[error("Request {token} superseded by request {latest}")]
    Superseded { token: u64, latest: u64 },

    #[error("Store error: {0}")]
    Store(#[from] larder_common::Error),
}

/// Active search/filter state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeQuery {
    pub search_term: Option<String>,
    pub cuisine: Option<String>,
}

impl RecipeQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: Some(term.into()),
            cuisine: None,
        }
    }

    pub fn cuisine(cuisine: impl Into<String>) -> Self {
        Self {
            search_term: None,
            cuisine: Some(cuisine.into()),
        }
    }

    /// Trimmed search term, `None` when blank
    pub fn term(&self) -> Option<&str> {
        non_blank(self.search_term.as_deref())
    }

    /// Trimmed cuisine, `None` when blank or when a term is active
    pub fn cuisine_filter(&self) -> Option<&str> {
        if self.term().is_some() {
            return None;
        }
        non_blank(self.cuisine.as_deref())
    }

    /// Whether `recipe` passes the active predicate
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let summary = recipe.summary();

        if let Some(term) = self.term() {
            let term = term.to_lowercase();
            return [summary.name, summary.instructions, summary.cuisine]
                .iter()
                .any(|field| field.to_lowercase().contains(&term));
        }

        if let Some(cuisine) = self.cuisine_filter() {
            return summary.cuisine.to_lowercase() == cuisine.to_lowercase();
        }

        true
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Remote recipes of the most recent current query, by id
#[derive(Debug, Default)]
pub struct RecipeCache {
    recipes: HashMap<String, RemoteRecipe>,
}

impl RecipeCache {
    /// Replace the whole cache
    fn replace(&mut self, recipes: &[RemoteRecipe]) {
        self.recipes = recipes
            .iter()
            .map(|r| (r.id.clone(), r.clone()))
            .collect();
    }

    pub fn get(&self, id: &str) -> Option<&RemoteRecipe> {
        self.recipes.get(id)
    }
}

/// Merges remote and uploaded recipes
pub struct RecipeAggregator {
    source: Arc<dyn RecipeSource>,
    store: LocalStore,
    cache: RwLock<RecipeCache>,
    latest_token: AtomicU64,
}

impl RecipeAggregator {
    pub fn new(source: Arc<dyn RecipeSource>, store: LocalStore) -> Self {
        Self {
            source,
            store,
            cache: RwLock::new(RecipeCache::default()),
            latest_token: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &Arc<dyn RecipeSource> {
        &self.source
    }

    /// Token of the most recently issued request (0 before the first)
    pub fn current_token(&self) -> u64 {
        self.latest_token.load(Ordering::SeqCst)
    }

    /// Cached remote recipe from the last current query
    pub async fn cached(&self, id: &str) -> Option<RemoteRecipe> {
        self.cache.read().await.get(id).cloned()
    }

    pub async fn cached_count(&self) -> usize {
        self.cache.read().await.recipes.len()
    }

    /// Build the display list for `query`
    ///
    /// Order: remote recipes in API order, then uploaded recipes most recent
    /// first. Fails only when the store cannot be read or when a newer
    /// request superseded this one.
    pub async fn list_recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, AggregateError> {
        let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(token, ?query, "Listing recipes");

        let remote = match self.fetch_remote(query).await {
            Ok(recipes) => recipes,
            Err(e) => {
                warn!(token, error = %e, "Remote recipe query failed, showing local recipes only");
                Vec::new()
            }
        };

        let uploaded = self.store.uploaded_recipes().await?;

        {
            let mut cache = self.cache.write().await;
            let latest = self.latest_token.load(Ordering::SeqCst);
            if token != latest {
                info!(token, latest, "Discarding superseded recipe query");
                return Err(AggregateError::Superseded { token, latest });
            }
            cache.replace(&remote);
        }

        let recipes: Vec<Recipe> = remote
            .into_iter()
            .map(Recipe::Remote)
            .chain(uploaded.into_iter().map(Recipe::Local))
            .filter(|recipe| query.matches(recipe))
            .collect();

        info!(token, count = recipes.len(), "Recipe list ready");
        Ok(recipes)
    }

    async fn fetch_remote(&self, query: &RecipeQuery) -> Result<Vec<RemoteRecipe>, MealDbError> {
        if let Some(term) = query.term() {
            return self.source.search_by_name(term).await;
        }

        if let Some(cuisine) = query.cuisine_filter() {
            let summaries = self.source.filter_by_cuisine(cuisine).await?;
            if summaries.len() > CUISINE_EXPANSION_LIMIT {
                debug!(
                    cuisine = %cuisine,
                    available = summaries.len(),
                    limit = CUISINE_EXPANSION_LIMIT,
                    "Capping cuisine expansion"
                );
            }

            let lookups = summaries
                .iter()
                .take(CUISINE_EXPANSION_LIMIT)
                .map(|summary| self.source.lookup_by_id(&summary.id));
            let detailed = try_join_all(lookups).await?;

            return Ok(detailed.into_iter().flatten().collect());
        }

        self.source.list_by_first_letter(DEFAULT_LISTING_LETTER).await
    }
}
