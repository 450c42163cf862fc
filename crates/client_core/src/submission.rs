//! Sequential item submission: create the item, then attach tags, then the
//! review. Each step is awaited before the next one starts.

use std::sync::Arc;

use shared::{
    domain::{ItemId, SubmissionStep, UserRef},
    protocol::{Item, Review, TagsPayload},
};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::CatalogApi;

/// Raw values captured by the item form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFormFields {
    pub title: String,
    pub description: Option<String>,
    /// Comma separated, sent verbatim after splitting.
    pub tags: String,
    pub rating: Option<f64>,
    pub review: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("title is required")]
    MissingTitle,
}

impl ItemFormFields {
    pub fn validate(&self) -> Result<(), FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::MissingTitle);
        }
        Ok(())
    }

    pub fn to_item(&self, creator: &UserRef) -> Item {
        Item {
            title: self.title.clone(),
            description: self.description.clone().unwrap_or_default(),
            creator: creator.clone(),
        }
    }

    pub fn to_review(&self, user: &UserRef) -> Review {
        Review {
            comment: self.review.clone().unwrap_or_default(),
            user: user.clone(),
            rating: self.rating.unwrap_or(0.0),
        }
    }

    pub fn to_tags(&self) -> TagsPayload {
        TagsPayload::from_raw(&self.tags)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    Succeeded,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: SubmissionStep,
    pub result: StepResult,
}

impl StepOutcome {
    fn succeeded(step: SubmissionStep) -> Self {
        Self {
            step,
            result: StepResult::Succeeded,
        }
    }

    fn failed(step: SubmissionStep, err: &anyhow::Error) -> Self {
        Self {
            step,
            result: StepResult::Failed {
                reason: format!("{err:#}"),
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.result, StepResult::Failed { .. })
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.result {
            StepResult::Failed { reason } => Some(reason),
            StepResult::Succeeded => None,
        }
    }
}

/// Ordered outcomes of the steps that were attempted. Steps after a failed
/// item creation are absent, not failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    pub item_id: Option<ItemId>,
    pub steps: Vec<StepOutcome>,
}

impl SubmissionReport {
    pub fn save_failed(&self) -> bool {
        self.steps.iter().any(StepOutcome::is_failure)
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|outcome| outcome.is_failure())
    }

    pub fn last_failure(&self) -> Option<&StepOutcome> {
        self.failed_steps().last()
    }

    pub fn attempted(&self, step: SubmissionStep) -> bool {
        self.steps.iter().any(|outcome| outcome.step == step)
    }

    pub fn is_partial(&self) -> bool {
        self.item_id.is_some() && self.save_failed()
    }
}

#[derive(Debug, Clone)]
pub enum SubmissionEvent {
    StepStarted(SubmissionStep),
    StepFinished(StepOutcome),
    Completed(SubmissionReport),
}

pub struct ItemSubmitter {
    api: Arc<dyn CatalogApi>,
    events: broadcast::Sender<SubmissionEvent>,
}

impl ItemSubmitter {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self { api, events }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SubmissionEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: SubmissionEvent) {
        let _ = self.events.send(event);
    }

    fn start(&self, step: SubmissionStep) {
        info!(step = %step, "submission step started");
        self.emit(SubmissionEvent::StepStarted(step));
    }

    fn finish(&self, report: &mut SubmissionReport, outcome: StepOutcome) {
        match outcome.failure_reason() {
            Some(reason) => warn!(step = %outcome.step, %reason, "submission step failed"),
            None => info!(step = %outcome.step, "submission step finished"),
        }
        self.emit(SubmissionEvent::StepFinished(outcome.clone()));
        report.steps.push(outcome);
    }

    /// Runs the three writes in order on behalf of `user`. Tag and review
    /// failures do not roll back earlier steps.
    pub async fn submit(&self, user: &UserRef, fields: &ItemFormFields) -> SubmissionReport {
        let mut report = SubmissionReport::default();

        self.start(SubmissionStep::CreateItem);
        let item_id = match self.api.create_item(&fields.to_item(user)).await {
            Ok(item_id) => {
                self.finish(&mut report, StepOutcome::succeeded(SubmissionStep::CreateItem));
                item_id
            }
            Err(err) => {
                self.finish(
                    &mut report,
                    StepOutcome::failed(SubmissionStep::CreateItem, &err),
                );
                self.emit(SubmissionEvent::Completed(report.clone()));
                return report;
            }
        };

        self.start(SubmissionStep::AttachTags);
        let outcome = match self.api.attach_tags(&item_id, &fields.to_tags()).await {
            Ok(()) => StepOutcome::succeeded(SubmissionStep::AttachTags),
            Err(err) => StepOutcome::failed(SubmissionStep::AttachTags, &err),
        };
        self.finish(&mut report, outcome);

        self.start(SubmissionStep::AttachReview);
        let outcome = match self.api.attach_review(&item_id, &fields.to_review(user)).await {
            Ok(()) => StepOutcome::succeeded(SubmissionStep::AttachReview),
            Err(err) => StepOutcome::failed(SubmissionStep::AttachReview, &err),
        };
        self.finish(&mut report, outcome);

        info!(item_id = %item_id, failed = report.save_failed(), "submission completed");
        report.item_id = Some(item_id);
        self.emit(SubmissionEvent::Completed(report.clone()));
        report
    }
}
