use std::path::Path;

use anyhow::{Context, Result};
use shared::domain::ItemId;
use thiserror::Error;
use tracing::{info, warn};

use crate::CatalogApi;

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read image '{}'", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());
        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }
}

#[derive(Debug, Error)]
pub enum ImageAttachmentError {
    #[error("the item has not been saved yet")]
    MissingItemId,
    #[error("image upload failed: {0:#}")]
    Upload(anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageAttachmentOutcome {
    Saved { file_name: String },
    Failed { reason: String },
}

impl ImageAttachmentOutcome {
    pub fn file_name(&self) -> Option<&str> {
        match self {
            ImageAttachmentOutcome::Saved { file_name } => Some(file_name),
            ImageAttachmentOutcome::Failed { .. } => None,
        }
    }
}

impl From<std::result::Result<String, ImageAttachmentError>> for ImageAttachmentOutcome {
    fn from(value: std::result::Result<String, ImageAttachmentError>) -> Self {
        match value {
            Ok(file_name) => ImageAttachmentOutcome::Saved { file_name },
            Err(err) => ImageAttachmentOutcome::Failed {
                reason: err.to_string(),
            },
        }
    }
}

async fn upload_for_item(
    api: &dyn CatalogApi,
    item_id: Option<&ItemId>,
    upload: ImageUpload,
) -> std::result::Result<String, ImageAttachmentError> {
    let item_id = item_id.ok_or(ImageAttachmentError::MissingItemId)?;
    api.upload_image(item_id, upload)
        .await
        .map_err(ImageAttachmentError::Upload)
}

/// Uploads an image for an already created item. Without an item id nothing
/// is sent.
pub async fn attach_image(
    api: &dyn CatalogApi,
    item_id: Option<&ItemId>,
    upload: ImageUpload,
) -> ImageAttachmentOutcome {
    let outcome = ImageAttachmentOutcome::from(upload_for_item(api, item_id, upload).await);
    match &outcome {
        ImageAttachmentOutcome::Saved { file_name } => info!(%file_name, "image saved"),
        ImageAttachmentOutcome::Failed { reason } => warn!(%reason, "image attachment failed"),
    }
    outcome
}
