//! TheMealDB API client
//!
//! Four read-only endpoints, all answering `{"meals": [...] | null}`:
//! - `search.php?s=<term>`: search by name
//! - `search.php?f=<letter>`: list by first letter
//! - `lookup.php?i=<id>`: full recipe by id
//! - `filter.php?a=<area>`: summaries by cuisine
//!
//! A `null` or missing `meals` field means "no matches", never an error.

use crate::services::recipe_source::{MealDbError, RecipeSource};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use larder_common::config::RemoteApiConfig;
use larder_common::{RemoteRecipe, RemoteRecipeSummary};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;

const USER_AGENT: &str = concat!("Larder/", env!("CARGO_PKG_VERSION"));

/// Envelope shared by every endpoint
#[derive(Debug, Deserialize)]
struct MealsResponse<T> {
    meals: Option<Vec<T>>,
}

/// TheMealDB API client
pub struct MealDbClient {
    http_client: reqwest::Client,
    base_url: String,
    rate_limiter: DefaultDirectRateLimiter,
}

impl MealDbClient {
    pub fn new(config: &RemoteApiConfig) -> Result<Self, MealDbError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MealDbError::NetworkError(e.to_string()))?;

        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// GET an endpoint and unwrap the `meals` envelope
    async fn get_meals<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, MealDbError> {
        self.rate_limiter.until_ready().await;

        let url = self.endpoint_url(endpoint);
        tracing::debug!(url = %url, params = ?params, "Querying recipe API");

        let response = self
            .http_client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| MealDbError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MealDbError::ApiError(status.as_u16(), error_text));
        }

        let body: MealsResponse<T> = response
            .json()
            .await
            .map_err(|e| MealDbError::ParseError(e.to_string()))?;

        Ok(body.meals.unwrap_or_default())
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    async fn search_by_name(&self, term: &str) -> Result<Vec<RemoteRecipe>, MealDbError> {
        let meals: Vec<RemoteRecipe> = self.get_meals("search.php", &[("s", term)]).await?;
        tracing::info!(term = %term, count = meals.len(), "Recipe search completed");
        Ok(meals)
    }

    async fn list_by_first_letter(&self, letter: char) -> Result<Vec<RemoteRecipe>, MealDbError> {
        let letter = letter.to_string();
        let meals: Vec<RemoteRecipe> = self.get_meals("search.php", &[("f", &letter)]).await?;
        tracing::info!(letter = %letter, count = meals.len(), "Recipe listing completed");
        Ok(meals)
    }

    async fn lookup_by_id(&self, id: &str) -> Result<Option<RemoteRecipe>, MealDbError> {
        let meals: Vec<RemoteRecipe> = self.get_meals("lookup.php", &[("i", id)]).await?;
        let recipe = meals.into_iter().next();
        tracing::debug!(id = %id, found = recipe.is_some(), "Recipe lookup completed");
        Ok(recipe)
    }

    async fn filter_by_cuisine(
        &self,
        cuisine: &str,
    ) -> Result<Vec<RemoteRecipeSummary>, MealDbError> {
        let summaries: Vec<RemoteRecipeSummary> =
            self.get_meals("filter.php", &[("a", cuisine)]).await?;
        tracing::info!(
            cuisine = %cuisine,
            count = summaries.len(),
            "Cuisine filter completed"
        );
        Ok(summaries)
    }
}
