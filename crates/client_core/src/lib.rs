use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use shared::{
    domain::ItemId,
    error::ApiError,
    protocol::{thumbnail_url, ImageUploadResponse, Item, Review, SaveItemResponse, TagsPayload},
};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod config;
pub mod image;
pub mod submission;

pub use config::{load_settings, ClientSettings, SettingsError};
pub use image::{attach_image, ImageAttachmentError, ImageAttachmentOutcome, ImageUpload};
pub use submission::{
    FormError, ItemFormFields, ItemSubmitter, StepOutcome, StepResult, SubmissionEvent,
    SubmissionReport,
};

const DEFAULT_UPLOAD_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{method} {url} failed with status {status}{}", describe_api_error(.detail))]
    Status {
        method: &'static str,
        url: String,
        status: StatusCode,
        detail: Option<ApiError>,
    },
    #[error("{method} {url} returned no item id")]
    MissingItemId { method: &'static str, url: String },
}

fn describe_api_error(detail: &Option<ApiError>) -> String {
    match detail {
        Some(err) => format!(" ({:?}: {})", err.code, err.message),
        None => String::new(),
    }
}

impl RequestError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            RequestError::MissingItemId { .. } => None,
        }
    }
}

/// Write operations against the catalog service.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn create_item(&self, item: &Item) -> Result<ItemId>;
    async fn attach_tags(&self, item_id: &ItemId, tags: &TagsPayload) -> Result<()>;
    async fn attach_review(&self, item_id: &ItemId, review: &Review) -> Result<()>;
    /// Returns the stored file name.
    async fn upload_image(&self, item_id: &ItemId, upload: ImageUpload) -> Result<String>;
    async fn fetch_thumbnail(&self, file_name: &str) -> Result<Vec<u8>>;
}

pub struct CatalogClient {
    http: Client,
    items_url: String,
    thumbnail_url: String,
}

impl CatalogClient {
    pub fn new(items_url: impl Into<String>, thumbnail_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            items_url: items_url.into().trim_end_matches('/').to_string(),
            thumbnail_url: thumbnail_url.into(),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(settings.items_url.clone(), settings.thumbnail_url.clone())
    }

    pub fn thumbnail_url_for(&self, file_name: &str) -> String {
        thumbnail_url(&self.thumbnail_url, file_name)
    }

    /// The id is pushed as a single escaped path segment.
    fn item_resource(&self, item_id: &ItemId, resource: &str) -> Result<String> {
        let mut url = Url::parse(&self.items_url)
            .with_context(|| format!("invalid items url {}", self.items_url))?;
        url.path_segments_mut()
            .map_err(|()| anyhow!("items url {} cannot take sub-resources", self.items_url))?
            .pop_if_empty()
            .push(&item_id.0)
            .push(resource);
        Ok(url.into())
    }

    async fn post_json<B>(&self, url: &str, body: &B) -> Result<Response>
    where
        B: Serialize + Sync + ?Sized,
    {
        debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("failed to send POST {url}"))?;
        Ok(check_status("POST", url, response).await?)
    }
}

async fn check_status(
    method: &'static str,
    url: &str,
    response: Response,
) -> std::result::Result<Response, RequestError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response
        .bytes()
        .await
        .ok()
        .and_then(|body| serde_json::from_slice::<ApiError>(&body).ok());
    Err(RequestError::Status {
        method,
        url: url.to_string(),
        status,
        detail,
    })
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn create_item(&self, item: &Item) -> Result<ItemId> {
        let url = self.items_url.clone();
        let body: SaveItemResponse = self
            .post_json(&url, item)
            .await?
            .json()
            .await
            .with_context(|| format!("invalid item creation response from {url}"))?;
        if body.id.0.is_empty() {
            return Err(RequestError::MissingItemId { method: "POST", url }.into());
        }
        Ok(body.id)
    }

    async fn attach_tags(&self, item_id: &ItemId, tags: &TagsPayload) -> Result<()> {
        self.post_json(&self.item_resource(item_id, "tags")?, tags)
            .await?;
        Ok(())
    }

    async fn attach_review(&self, item_id: &ItemId, review: &Review) -> Result<()> {
        self.post_json(&self.item_resource(item_id, "reviews")?, review)
            .await?;
        Ok(())
    }

    async fn upload_image(&self, item_id: &ItemId, upload: ImageUpload) -> Result<String> {
        let url = self.item_resource(item_id, "image")?;
        let mime_type = upload
            .mime_type
            .clone()
            .unwrap_or_else(|| DEFAULT_UPLOAD_MIME_TYPE.to_string());
        debug!(%url, file_name = %upload.file_name, size = upload.bytes.len(), "uploading image");
        let response = self
            .http
            .post(&url)
            .query(&[
                ("filename", upload.file_name.as_str()),
                ("mime_type", mime_type.as_str()),
            ])
            .header(reqwest::header::CONTENT_TYPE, mime_type.as_str())
            .body(upload.bytes)
            .send()
            .await
            .with_context(|| format!("failed to send POST {url}"))?;
        let body: ImageUploadResponse = check_status("POST", &url, response)
            .await?
            .json()
            .await
            .with_context(|| format!("invalid image upload response from {url}"))?;
        if body.file_name.is_empty() {
            return Err(anyhow!("{url} returned an empty file name"));
        }
        Ok(body.file_name)
    }

    async fn fetch_thumbnail(&self, file_name: &str) -> Result<Vec<u8>> {
        let url = self.thumbnail_url_for(file_name);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to send GET {url}"))?;
        let bytes = check_status("GET", &url, response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

pub struct MissingCatalogApi;

#[async_trait]
impl CatalogApi for MissingCatalogApi {
    async fn create_item(&self, _item: &Item) -> Result<ItemId> {
        Err(anyhow!("catalog service is unavailable"))
    }

    async fn attach_tags(&self, item_id: &ItemId, _tags: &TagsPayload) -> Result<()> {
        Err(anyhow!("catalog service is unavailable for item {item_id}"))
    }

    async fn attach_review(&self, item_id: &ItemId, _review: &Review) -> Result<()> {
        Err(anyhow!("catalog service is unavailable for item {item_id}"))
    }

    async fn upload_image(&self, item_id: &ItemId, _upload: ImageUpload) -> Result<String> {
        Err(anyhow!("catalog service is unavailable for item {item_id}"))
    }

    async fn fetch_thumbnail(&self, file_name: &str) -> Result<Vec<u8>> {
        Err(anyhow!("catalog service is unavailable for thumbnail {file_name}"))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
