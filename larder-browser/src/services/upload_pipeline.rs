//! Recipe upload pipeline
//!
//! Two states: *collecting* (waiting for a submit) and *submitted* (image
//! being read and recipe being stored). Validation failures never leave
//! *collecting* and never touch the store. The image read is the only
//! suspension point; it completes or fails before anything is persisted.

use crate::services::image_encoder::{encode_data_url, ImageFile, ImageReadError};
use crate::services::local_store::LocalStore;
use larder_common::ids::generate_recipe_id;
use larder_common::LocalRecipe;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{info, warn};

/// Message shown after a successful upload
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Recipe uploaded successfully!";

/// Upload form as submitted
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub name: String,
    pub cuisine: String,
    /// One ingredient per line
    pub ingredients: String,
    pub instructions: String,
    pub image: Option<ImageFile>,
}

/// Form fields, for field-level error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadField {
    Name,
    Cuisine,
    Ingredients,
    Instructions,
    Image,
}

/// Required fields left empty
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fill in all fields and select an image.")]
pub struct ValidationError {
    pub missing: Vec<UploadField>,
}

/// Upload failures
#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to read image file: {0}")]
    Read(#[from] ImageReadError),

    #[error("Another upload is still being processed")]
    InProgress,

    #[error("Store error: {0}")]
    Store(#[from] larder_common::Error),
}

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Collecting,
    Submitted,
}

impl UploadForm {
    /// Check every required field
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();

        let text_fields = [
            (UploadField::Name, &self.name),
            (UploadField::Cuisine, &self.cuisine),
            (UploadField::Ingredients, &self.ingredients),
            (UploadField::Instructions, &self.instructions),
        ];
        for (field, value) in text_fields {
            if value.trim().is_empty() {
                missing.push(field);
            }
        }
        if self.image.is_none() {
            missing.push(UploadField::Image);
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }
}

/// Turns submitted forms into stored local recipes
pub struct UploadPipeline {
    store: LocalStore,
    submitted: AtomicBool,
}

/// Returns the pipeline to *collecting* however the submission ends
struct SubmissionGuard<'a>(&'a AtomicBool);

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl UploadPipeline {
    pub fn new(store: LocalStore) -> Self {
        Self {
            store,
            submitted: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> UploadState {
        if self.submitted.load(Ordering::SeqCst) {
            UploadState::Submitted
        } else {
            UploadState::Collecting
        }
    }

    /// Validate, embed the image and store the recipe
    pub async fn submit(&self, form: UploadForm) -> Result<LocalRecipe, UploadError> {
        if let Err(e) = form.validate() {
            info!(missing = ?e.missing, "Upload rejected by validation");
            return Err(e.into());
        }

        if self
            .submitted
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Upload submitted while another is in progress");
            return Err(UploadError::InProgress);
        }
        let _guard = SubmissionGuard(&self.submitted);

        let UploadForm {
            name,
            cuisine,
            ingredients,
            instructions,
            image,
        } = form;
        let image = image.ok_or(ValidationError {
            missing: vec![UploadField::Image],
        })?;

        let id = generate_recipe_id();
        let image = match encode_data_url(&image).await {
            Ok(data_url) => data_url,
            Err(e) => {
                warn!(id = %id, error = %e, "Failed to read uploaded image");
                return Err(e.into());
            }
        };

        let recipe = LocalRecipe {
            id,
            name: name.trim().to_string(),
            cuisine: cuisine.trim().to_string(),
            ingredients: ingredients.trim().to_string(),
            instructions: instructions.trim().to_string(),
            image,
            is_uploaded: true,
        };

        let stored = self
            .store
            .add_uploaded_recipe(recipe, generate_recipe_id)
            .await?;
        info!(id = %stored.id, name = %stored.name, "Recipe uploaded");

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::renderer::to_detail_view;
    use larder_common::db::init_memory_database;
    use larder_common::Recipe;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    async fn pipeline() -> (UploadPipeline, LocalStore) {
        let store = LocalStore::new(init_memory_database().await.unwrap());
        (UploadPipeline::new(store.clone()), store)
    }

    fn pancake_form() -> UploadForm {
        UploadForm {
            name: " Pancakes ".to_string(),
            cuisine: "American".to_string(),
            ingredients: "2 eggs\n1 cup flour".to_string(),
            instructions: "Whisk, then fry.".to_string(),
            image: Some(ImageFile::from_bytes("pancakes.png", PNG_HEADER.to_vec())),
        }
    }

    #[test]
    fn test_validation_lists_missing_fields() {
        let form = UploadForm {
            name: "Soup".to_string(),
            ingredients: "   ".to_string(),
            ..UploadForm::default()
        };

        let err = form.validate().unwrap_err();
        assert_eq!(
            err.missing,
            vec![
                UploadField::Cuisine,
                UploadField::Ingredients,
                UploadField::Instructions,
                UploadField::Image
            ]
        );
        assert_eq!(err.to_string(), "Please fill in all fields and select an image.");
    }

    #[tokio::test]
    async fn test_invalid_form_leaves_store_untouched() {
        let (pipeline, store) = pipeline().await;
        let form = UploadForm {
            image: None,
            ..pancake_form()
        };

        let result = pipeline.submit(form).await;

        assert!(matches!(result, Err(UploadError::Validation(_))));
        assert_eq!(pipeline.state(), UploadState::Collecting);
        assert!(store.uploaded_recipes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_successful_upload_is_stored() {
        let (pipeline, store) = pipeline().await;

        let recipe = pipeline.submit(pancake_form()).await.unwrap();

        assert!(recipe.id.starts_with(larder_common::ids::LOCAL_ID_PREFIX));
        assert_eq!(recipe.name, "Pancakes");
        assert_eq!(recipe.image, "data:image/png;base64,iVBORw0KGgo=");
        assert!(recipe.is_uploaded);
        assert_eq!(pipeline.state(), UploadState::Collecting);

        let stored = store.uploaded_recipes().await.unwrap();
        assert_eq!(stored, vec![recipe]);
    }

    #[tokio::test]
    async fn test_uploaded_ingredients_become_detail_lines() {
        let (pipeline, _store) = pipeline().await;

        let recipe = pipeline.submit(pancake_form()).await.unwrap();
        let detail = to_detail_view(&Recipe::Local(recipe));

        assert_eq!(detail.ingredient_lines, vec!["2 eggs", "1 cup flour"]);
        assert!(detail.video.is_none());
    }

    #[tokio::test]
    async fn test_unreadable_image_is_read_error() {
        let (pipeline, store) = pipeline().await;
        let dir = tempfile::tempdir().unwrap();
        let form = UploadForm {
            image: Some(ImageFile::from_path(dir.path().join("missing.png"))),
            ..pancake_form()
        };

        let result = pipeline.submit(form).await;

        assert!(matches!(result, Err(UploadError::Read(_))));
        assert_eq!(pipeline.state(), UploadState::Collecting);
        assert!(store.uploaded_recipes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_ids_are_unique() {
        let (pipeline, store) = pipeline().await;

        for _ in 0..10 {
            pipeline.submit(pancake_form()).await.unwrap();
        }

        let mut ids: Vec<String> = store
            .uploaded_recipes()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[tokio::test]
    async fn test_submit_while_submitted_is_rejected() {
        let (pipeline, _store) = pipeline().await;
        pipeline.submitted.store(true, Ordering::SeqCst);

        let result = pipeline.submit(pancake_form()).await;

        assert!(matches!(result, Err(UploadError::InProgress)));
        assert_eq!(pipeline.state(), UploadState::Submitted);
    }
}
