//! UI/backend events and error modeling for the catalog GUI controller.

use client_core::{ImageAttachmentOutcome, SubmissionEvent};

use crate::media::PreviewImage;

/// Identifies one mounted add-item page. Backend results carry the id of the
/// page that asked for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PageId(pub u64);

impl PageId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    Submission {
        page: PageId,
        event: SubmissionEvent,
    },
    ImageAttachment {
        page: PageId,
        outcome: ImageAttachmentOutcome,
    },
    ThumbnailLoaded {
        page: PageId,
        file_name: String,
        image: PreviewImage,
    },
    ThumbnailFailed {
        page: PageId,
        file_name: String,
        reason: String,
    },
}

impl UiEvent {
    /// The page an event belongs to; `None` for app-wide events.
    pub fn page(&self) -> Option<PageId> {
        match self {
            UiEvent::Submission { page, .. }
            | UiEvent::ImageAttachment { page, .. }
            | UiEvent::ThumbnailLoaded { page, .. }
            | UiEvent::ThumbnailFailed { page, .. } => Some(*page),
            UiEvent::Info(_) | UiEvent::Error(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    CommandQueue,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnected")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_text(&self) -> String {
        let label = match self.category {
            UiErrorCategory::Transport => "Nettverksfeil",
            UiErrorCategory::Unknown => "Feil",
        };
        format!("{label}: {}", self.message)
    }
}
