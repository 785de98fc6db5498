//! Recipe uploads
//!
//! Uploads arrive as `multipart/form-data` with the text fields `name`,
//! `cuisine`, `ingredients`, `instructions` and a file field `image`.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::services::renderer::to_card_view;
use crate::services::upload_pipeline::UPLOAD_SUCCESS_MESSAGE;
use crate::services::{CardView, ImageFile, UploadForm};
use crate::AppState;
use larder_common::Recipe;

/// Request body limit for uploads (images are embedded inline)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub recipe: CardView,
}

/// GET /api/uploads
pub async fn list_uploads(State(state): State<AppState>) -> ApiResult<Json<Vec<CardView>>> {
    Ok(Json(state.browser.uploaded_cards().await?))
}

/// POST /api/uploads
pub async fn create_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let form = read_form(multipart).await?;
    let recipe = state.browser.upload(form).await?;

    let favorites = state.browser.store().favorites().await?;
    let card = to_card_view(&Recipe::Local(recipe), &favorites);

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            recipe: card,
        }),
    ))
}

/// Collect multipart fields into an upload form
///
/// A file field with neither a file name nor content counts as no image
/// selected; unknown fields are ignored.
async fn read_form(mut multipart: Multipart) -> ApiResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                if !(file_name.is_empty() && bytes.is_empty()) {
                    form.image = Some(ImageFile::from_bytes(file_name, bytes.to_vec()));
                }
            }
            "name" | "cuisine" | "ingredients" | "instructions" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                match name.as_str() {
                    "name" => form.name = value,
                    "cuisine" => form.cuisine = value,
                    "ingredients" => form.ingredients = value,
                    _ => form.instructions = value,
                }
            }
            other => debug!(field = %other, "Ignoring unknown upload field"),
        }
    }

    Ok(form)
}
