use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(ItemId);
id_newtype!(UserId);

/// Opaque reference to the signed-in user. It is sent as-is as the item's
/// `creator` and the review's `user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl UserRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: UserId(id.into()),
            username: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

/// The three writes of a submission, in the order they are performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStep {
    CreateItem,
    AttachTags,
    AttachReview,
}

impl SubmissionStep {
    pub const ORDER: [SubmissionStep; 3] = [
        SubmissionStep::CreateItem,
        SubmissionStep::AttachTags,
        SubmissionStep::AttachReview,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStep::CreateItem => "create_item",
            SubmissionStep::AttachTags => "attach_tags",
            SubmissionStep::AttachReview => "attach_review",
        }
    }
}

impl fmt::Display for SubmissionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
