//! Recipe model
//!
//! A recipe is either fetched from the remote recipe API or authored locally
//! through the upload form. Both variants keep the JSON field names they were
//! born with (`idMeal`/`strMeal`/... for remote, `id`/`name`/... for local), so
//! a stored favorite is a verbatim copy of the recipe it was made from.
//!
//! Everything that displays, filters or keys recipes goes through
//! [`Recipe::summary`] instead of reading variant fields directly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of ingredient/measure slots carried by a remote recipe
pub const MAX_INGREDIENT_SLOTS: usize = 20;

/// One `strIngredientN` / `strMeasureN` pair of a remote recipe
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientSlot {
    pub ingredient: String,
    pub measure: String,
}

impl IngredientSlot {
    fn is_blank(&self) -> bool {
        self.ingredient.trim().is_empty() && self.measure.trim().is_empty()
    }
}

/// Full recipe as returned by the search and lookup endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawMeal", into = "RawMeal")]
pub struct RemoteRecipe {
    /// Server-issued identifier (`idMeal`)
    pub id: String,
    /// Display name (`strMeal`)
    pub name: String,
    /// Thumbnail URL (`strMealThumb`)
    pub thumbnail: String,
    /// Free-text instructions (`strInstructions`)
    pub instructions: String,
    /// Cuisine/area tag (`strArea`)
    pub area: String,
    /// Video reference (`strYoutube`), `None` when blank
    pub youtube: Option<String>,
    /// Ingredient slots in API order; slot `i` is `strIngredient{i+1}`
    pub ingredients: Vec<IngredientSlot>,
}

/// Wire shape of a remote recipe
///
/// The API flattens ingredients into twenty numbered field pairs and sends
/// `null` for anything unset, so the typed [`RemoteRecipe`] is built from this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMeal {
    id_meal: String,
    #[serde(default)]
    str_meal: Option<String>,
    #[serde(default)]
    str_meal_thumb: Option<String>,
    #[serde(default)]
    str_instructions: Option<String>,
    #[serde(default)]
    str_area: Option<String>,
    #[serde(default)]
    str_youtube: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn text_field(extra: &Map<String, Value>, key: &str) -> String {
    extra
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

impl From<RawMeal> for RemoteRecipe {
    fn from(raw: RawMeal) -> Self {
        let mut ingredients: Vec<IngredientSlot> = (1..=MAX_INGREDIENT_SLOTS)
            .map(|i| IngredientSlot {
                ingredient: text_field(&raw.extra, &format!("strIngredient{i}")),
                measure: text_field(&raw.extra, &format!("strMeasure{i}")),
            })
            .collect();
        while ingredients.last().is_some_and(IngredientSlot::is_blank) {
            ingredients.pop();
        }

        Self {
            id: raw.id_meal,
            name: raw.str_meal.unwrap_or_default(),
            thumbnail: raw.str_meal_thumb.unwrap_or_default(),
            instructions: raw.str_instructions.unwrap_or_default(),
            area: raw.str_area.unwrap_or_default(),
            youtube: raw.str_youtube.filter(|url| !url.trim().is_empty()),
            ingredients,
        }
    }
}

impl From<RemoteRecipe> for RawMeal {
    fn from(recipe: RemoteRecipe) -> Self {
        let mut extra = Map::new();
        for (i, slot) in recipe.ingredients.into_iter().enumerate() {
            let n = i + 1;
            extra.insert(format!("strIngredient{n}"), Value::String(slot.ingredient));
            extra.insert(format!("strMeasure{n}"), Value::String(slot.measure));
        }

        Self {
            id_meal: recipe.id,
            str_meal: Some(recipe.name),
            str_meal_thumb: Some(recipe.thumbnail),
            str_instructions: Some(recipe.instructions),
            str_area: Some(recipe.area),
            str_youtube: recipe.youtube,
            extra,
        }
    }
}

/// Abbreviated recipe returned by the filter-by-cuisine endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecipeSummary {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal", default)]
    pub name: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
}

/// Recipe authored through the upload form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalRecipe {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    /// Newline-delimited ingredient text, as typed
    pub ingredients: String,
    pub instructions: String,
    /// Embedded image (`data:` URL)
    pub image: String,
    /// Always `true`; kept in the stored JSON to mark locally authored recipes
    #[serde(default = "default_true")]
    pub is_uploaded: bool,
}

fn default_true() -> bool {
    true
}

/// Either recipe variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipe {
    Remote(RemoteRecipe),
    Local(LocalRecipe),
}

/// Common display projection shared by both recipe variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeSummary<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub image: &'a str,
    pub instructions: &'a str,
    pub cuisine: &'a str,
    pub is_uploaded: bool,
}

impl Recipe {
    /// Project either variant onto the common display shape
    pub fn summary(&self) -> RecipeSummary<'_> {
        match self {
            Recipe::Remote(r) => RecipeSummary {
                id: &r.id,
                name: &r.name,
                image: &r.thumbnail,
                instructions: &r.instructions,
                cuisine: &r.area,
                is_uploaded: false,
            },
            Recipe::Local(r) => RecipeSummary {
                id: &r.id,
                name: &r.name,
                image: &r.image,
                instructions: &r.instructions,
                cuisine: &r.cuisine,
                is_uploaded: true,
            },
        }
    }

    pub fn id(&self) -> &str {
        self.summary().id
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, Recipe::Local(_))
    }
}

impl From<RemoteRecipe> for Recipe {
    fn from(recipe: RemoteRecipe) -> Self {
        Recipe::Remote(recipe)
    }
}

impl From<LocalRecipe> for Recipe {
    fn from(recipe: LocalRecipe) -> Self {
        Recipe::Local(recipe)
    }
}
