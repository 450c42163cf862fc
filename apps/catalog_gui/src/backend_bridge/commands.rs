//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use client_core::ItemFormFields;
use shared::domain::{ItemId, UserRef};

use crate::controller::events::PageId;

#[derive(Debug)]
pub enum BackendCommand {
    SubmitItem {
        page: PageId,
        user: UserRef,
        fields: ItemFormFields,
    },
    UploadImage {
        page: PageId,
        item_id: Option<ItemId>,
        path: PathBuf,
    },
    FetchThumbnail {
        page: PageId,
        file_name: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::SubmitItem { .. } => "submit_item",
            BackendCommand::UploadImage { .. } => "upload_image",
            BackendCommand::FetchThumbnail { .. } => "fetch_thumbnail",
        }
    }
}
