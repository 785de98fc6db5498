//! Recipe identifier utilities

use chrono::Utc;
use uuid::Uuid;

/// Prefix carried by every locally generated recipe id
pub const LOCAL_ID_PREFIX: &str = "recipe_";

/// Generate a new identifier for a locally authored recipe
///
/// Format: `recipe_<unix-millis>_<uuid-v4-simple>`. The timestamp keeps ids
/// roughly sortable by creation time; the UUID makes collisions practically
/// impossible. Callers still check the target collection before inserting.
pub fn generate_recipe_id() -> String {
    format!(
        "{}{}_{}",
        LOCAL_ID_PREFIX,
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}
