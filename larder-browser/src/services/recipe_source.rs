//! Remote recipe source abstraction
//!
//! The aggregator and browser only ever talk to the remote API through this
//! trait, which keeps them testable against in-memory sources.

use async_trait::async_trait;
use larder_common::{RemoteRecipe, RemoteRecipeSummary};
use thiserror::Error;

/// Remote recipe API errors
///
/// Every variant is a "network error" from the caller's point of view: the
/// client performs no fallback and callers decide how to degrade.
#[derive(Debug, Error)]
pub enum MealDbError {
    /// Transport failure (connect, timeout, TLS, ...)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Non-success HTTP status
    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    /// Body was not the expected JSON
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Read-only queries against a recipe catalogue
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Recipes whose name matches `term`
    async fn search_by_name(&self, term: &str) -> Result<Vec<RemoteRecipe>, MealDbError>;

    /// Recipes whose name starts with `letter`
    async fn list_by_first_letter(&self, letter: char) -> Result<Vec<RemoteRecipe>, MealDbError>;

    /// Full recipe by id, `None` when the catalogue has no such recipe
    async fn lookup_by_id(&self, id: &str) -> Result<Option<RemoteRecipe>, MealDbError>;

    /// Abbreviated recipes tagged with `cuisine`
    async fn filter_by_cuisine(
        &self,
        cuisine: &str,
    ) -> Result<Vec<RemoteRecipeSummary>, MealDbError>;
}
