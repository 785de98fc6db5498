//! Card and detail views
//!
//! Views are plain serializable structs; how they are drawn is up to the
//! client. Favorite flags are computed against the favorites passed in at
//! render time and never cached on the recipe.

use larder_common::{Recipe, RecipeSummary};
use serde::Serialize;

/// Characters of instructions shown on a card
pub const SNIPPET_LENGTH: usize = 100;

/// Cuisine tag shown when a recipe carries none
pub const UNKNOWN_CUISINE: &str = "Unknown";

/// Compact recipe card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub image: String,
    pub snippet: String,
    pub cuisine_tag: String,
    pub is_favorite: bool,
    pub is_uploaded: bool,
}

/// Expanded recipe view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub id: String,
    pub title: String,
    pub image: String,
    pub ingredient_lines: Vec<String>,
    pub instructions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
}

/// Project a recipe onto a card
///
/// `favorites` is the current favorites collection.
pub fn to_card_view(recipe: &Recipe, favorites: &[Recipe]) -> CardView {
    let RecipeSummary {
        id,
        name,
        image,
        instructions,
        cuisine,
        is_uploaded,
    } = recipe.summary();

    let cuisine_tag = if cuisine.trim().is_empty() {
        UNKNOWN_CUISINE
    } else {
        cuisine
    };

    CardView {
        id: id.to_string(),
        title: name.to_string(),
        image: image.to_string(),
        snippet: snippet(instructions),
        cuisine_tag: cuisine_tag.to_string(),
        is_favorite: favorites.iter().any(|fav| fav.id() == id),
        is_uploaded,
    }
}

/// Project every recipe onto a card
pub fn to_card_views(recipes: &[Recipe], favorites: &[Recipe]) -> Vec<CardView> {
    recipes
        .iter()
        .map(|recipe| to_card_view(recipe, favorites))
        .collect()
}

/// Project a recipe onto the detail view
pub fn to_detail_view(recipe: &Recipe) -> DetailView {
    let summary = recipe.summary();

    let (ingredient_lines, video) = match recipe {
        Recipe::Remote(remote) => {
            let lines = remote
                .ingredients
                .iter()
                .filter(|slot| !slot.ingredient.trim().is_empty())
                .map(|slot| format!("{} {}", slot.measure, slot.ingredient).trim().to_string())
                .collect();
            (lines, remote.youtube.clone())
        }
        Recipe::Local(local) => {
            let lines = local
                .ingredients
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            (lines, None)
        }
    };

    DetailView {
        id: summary.id.to_string(),
        title: summary.name.to_string(),
        image: summary.image.to_string(),
        ingredient_lines,
        instructions: summary.instructions.to_string(),
        video,
    }
}

fn snippet(instructions: &str) -> String {
    let mut snippet: String = instructions.chars().take(SNIPPET_LENGTH).collect();
    snippet.push_str("...");
    snippet
}
