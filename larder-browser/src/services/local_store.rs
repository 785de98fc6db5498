//! Local store adapter
//!
//! Three independent collections (favorites, recent searches, uploaded
//! recipes), each persisted as one JSON array under a fixed key of the
//! `local_store` table. Writes always replace the whole array.
//!
//! Unparsable stored data never reaches the caller: it is logged and read as
//! an empty collection. Database failures still propagate.

use larder_common::{LocalRecipe, Recipe, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Maximum number of remembered searches
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Named collections of the local store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Favorites,
    RecentSearches,
    UploadedRecipes,
}

impl Collection {
    /// Storage key of the collection
    pub fn key(self) -> &'static str {
        match self {
            Collection::Favorites => "favorites",
            Collection::RecentSearches => "recentSearches",
            Collection::UploadedRecipes => "uploadedRecipes",
        }
    }
}

/// Typed access to the persisted collections
#[derive(Clone)]
pub struct LocalStore {
    db: SqlitePool,
    /// Serializes read-modify-write cycles across concurrent handlers
    write_lock: Arc<Mutex<()>>,
}

impl LocalStore {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Round-trip a trivial query to check the database answers
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    /// Read a collection; absent or corrupt data reads as empty
    pub async fn read<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM local_store WHERE key = ?")
                .bind(collection.key())
                .fetch_optional(&self.db)
                .await?;

        let Some(value) = value else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Option<Vec<T>>>(&value) {
            Ok(items) => Ok(items.unwrap_or_default()),
            Err(e) => {
                warn!(
                    collection = collection.key(),
                    error = %e,
                    "Stored collection is corrupt, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Replace a collection
    pub async fn write<T: Serialize>(&self, collection: Collection, items: &[T]) -> Result<()> {
        let value = serde_json::to_string(items)?;

        sqlx::query(
            "INSERT INTO local_store (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(collection.key())
        .bind(&value)
        .execute(&self.db)
        .await?;

        debug!(collection = collection.key(), count = items.len(), "Collection written");
        Ok(())
    }

    /// Remove a collection entirely
    pub async fn clear(&self, collection: Collection) -> Result<()> {
        sqlx::query("DELETE FROM local_store WHERE key = ?")
            .bind(collection.key())
            .execute(&self.db)
            .await?;

        debug!(collection = collection.key(), "Collection cleared");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Favorites
    // ------------------------------------------------------------------

    pub async fn favorites(&self) -> Result<Vec<Recipe>> {
        self.read(Collection::Favorites).await
    }

    pub async fn is_favorite(&self, id: &str) -> Result<bool> {
        Ok(self.favorites().await?.iter().any(|fav| fav.id() == id))
    }

    /// Store a copy of `recipe`; no-op when its id is already a favorite
    ///
    /// Returns whether the recipe was added.
    pub async fn add_favorite(&self, recipe: &Recipe) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        self.add_favorite_locked(recipe).await
    }

    pub async fn remove_favorite(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.remove_favorite_locked(id).await
    }

    /// Flip favorite membership of `recipe`, returning the new membership
    pub async fn toggle_favorite(&self, recipe: &Recipe) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        if self.is_favorite(recipe.id()).await? {
            self.remove_favorite_locked(recipe.id()).await?;
            Ok(false)
        } else {
            self.add_favorite_locked(recipe).await?;
            Ok(true)
        }
    }

    async fn add_favorite_locked(&self, recipe: &Recipe) -> Result<bool> {
        let mut favorites = self.favorites().await?;
        if favorites.iter().any(|fav| fav.id() == recipe.id()) {
            return Ok(false);
        }

        favorites.insert(0, recipe.clone());
        self.write(Collection::Favorites, &favorites).await?;
        Ok(true)
    }

    async fn remove_favorite_locked(&self, id: &str) -> Result<()> {
        let mut favorites = self.favorites().await?;
        favorites.retain(|fav| fav.id() != id);
        self.write(Collection::Favorites, &favorites).await
    }

    // ------------------------------------------------------------------
    // Recent searches
    // ------------------------------------------------------------------

    pub async fn recent_searches(&self) -> Result<Vec<String>> {
        self.read(Collection::RecentSearches).await
    }

    /// Remember a search term, most recent first
    ///
    /// Blank terms are ignored. A case-insensitive duplicate is moved to the
    /// front and the list is capped at [`MAX_RECENT_SEARCHES`].
    pub async fn add_recent_search(&self, term: &str) -> Result<Vec<String>> {
        let term = term.trim();
        let _guard = self.write_lock.lock().await;

        let mut searches = self.recent_searches().await?;
        if term.is_empty() {
            return Ok(searches);
        }

        let lowered = term.to_lowercase();
        searches.retain(|s| s.to_lowercase() != lowered);
        searches.insert(0, term.to_string());
        searches.truncate(MAX_RECENT_SEARCHES);

        self.write(Collection::RecentSearches, &searches).await?;
        Ok(searches)
    }

    pub async fn clear_recent_searches(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.clear(Collection::RecentSearches).await
    }

    // ------------------------------------------------------------------
    // Uploaded recipes
    // ------------------------------------------------------------------

    /// Uploaded recipes, most recently uploaded first
    pub async fn uploaded_recipes(&self) -> Result<Vec<LocalRecipe>> {
        self.read(Collection::UploadedRecipes).await
    }

    pub async fn find_uploaded(&self, id: &str) -> Result<Option<LocalRecipe>> {
        Ok(self
            .uploaded_recipes()
            .await?
            .into_iter()
            .find(|r| r.id == id))
    }

    /// Append an uploaded recipe
    ///
    /// `next_id` is consulted while `recipe.id` collides with a stored
    /// upload, so ids stay unique within the collection. Returns the stored
    /// recipe.
    pub async fn add_uploaded_recipe(
        &self,
        mut recipe: LocalRecipe,
        next_id: impl Fn() -> String,
    ) -> Result<LocalRecipe> {
        let _guard = self.write_lock.lock().await;

        let mut recipes = self.uploaded_recipes().await?;
        while recipes.iter().any(|r| r.id == recipe.id) {
            warn!(id = %recipe.id, "Uploaded recipe id collision, drawing a new id");
            recipe.id = next_id();
        }

        recipes.insert(0, recipe.clone());
        self.write(Collection::UploadedRecipes, &recipes).await?;
        Ok(recipe)
    }
}
