//! Image embedding for uploaded recipes
//!
//! Uploaded images are stored inline as `data:` URLs so an uploaded recipe is
//! self-contained in the local store.

use base64::{engine::general_purpose, Engine as _};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Image read failures
#[derive(Debug, Error)]
pub enum ImageReadError {
    #[error("Cannot read image {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Image file {0} is empty")]
    Empty(String),
}

/// Where the image bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageContent {
    /// File on disk, read when the upload is submitted
    Path(PathBuf),
    /// Bytes already received (e.g. a multipart field)
    Bytes(Vec<u8>),
}

/// Image attached to an upload form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content: ImageContent,
}

impl ImageFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            file_name,
            content: ImageContent::Path(path),
        }
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content: ImageContent::Bytes(bytes),
        }
    }
}

/// Read `image` and encode it as `data:<mime>;base64,<payload>`
pub async fn encode_data_url(image: &ImageFile) -> Result<String, ImageReadError> {
    let bytes = match &image.content {
        ImageContent::Path(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|source| ImageReadError::Io {
                    file: image.file_name.clone(),
                    source,
                })?
        }
        ImageContent::Bytes(bytes) => bytes.clone(),
    };

    if bytes.is_empty() {
        return Err(ImageReadError::Empty(image.file_name.clone()));
    }

    let mime = detect_mime(&bytes, &image.file_name);
    tracing::debug!(
        file = %image.file_name,
        mime = %mime,
        size = bytes.len(),
        "Encoding uploaded image"
    );

    Ok(format!(
        "data:{};base64,{}",
        mime,
        general_purpose::STANDARD.encode(&bytes)
    ))
}

/// MIME type from magic bytes, then extension, then a generic fallback
fn detect_mime(bytes: &[u8], file_name: &str) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }

    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
    .to_string()
}
