use serde::{Deserialize, Serialize};

use crate::domain::{ItemId, UserRef};

/// Body of `POST {ITEMS_URL}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub creator: UserRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveItemResponse {
    pub id: ItemId,
}

/// Body of `POST {ITEMS_URL}/{id}/tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagsPayload {
    pub tags: Vec<String>,
}

impl TagsPayload {
    pub fn from_raw(raw: &str) -> Self {
        Self {
            tags: split_tags(raw),
        }
    }
}

/// Body of `POST {ITEMS_URL}/{id}/reviews`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub comment: String,
    pub user: UserRef,
    #[serde(default)]
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUploadResponse {
    #[serde(rename = "fileName", alias = "file_name")]
    pub file_name: String,
}

/// Splits the raw tag field on commas. Segments are kept verbatim, so empty
/// segments from doubled or trailing commas are sent as empty tags.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_string).collect()
}

pub fn thumbnail_url(thumbnail_base: &str, file_name: &str) -> String {
    format!("{thumbnail_base}{file_name}")
}
