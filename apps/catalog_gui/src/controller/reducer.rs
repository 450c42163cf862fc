//! Page state and its transitions. Rendering reads this state; backend events
//! and user actions are the only writers.

use std::path::PathBuf;

use client_core::{
    FormError, ImageAttachmentOutcome, ItemFormFields, SubmissionEvent, SubmissionReport,
};
use shared::{
    domain::{ItemId, SubmissionStep, UserRef},
    protocol::thumbnail_url,
};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{PageId, UiEvent},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    AddItem,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::AddItem => "/items/new",
        }
    }
}

/// Editable form values, bound directly to the widgets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormDraft {
    pub title: String,
    pub description: String,
    pub tags: String,
    pub rating: f64,
    pub review: String,
}

impl FormDraft {
    pub fn to_fields(&self) -> ItemFormFields {
        ItemFormFields {
            title: self.title.clone(),
            description: Some(self.description.clone()).filter(|d| !d.is_empty()),
            tags: self.tags.clone(),
            rating: Some(self.rating),
            review: Some(self.review.clone()).filter(|r| !r.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStatus {
    Idle,
    Uploading,
    Saved,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailState {
    Loading,
    Ready,
    Failed { reason: String },
}

/// What the image section shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageArea {
    Thumbnail {
        url: String,
        state: ThumbnailState,
    },
    Uploader {
        item_id: Option<ItemId>,
        busy: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddItemPage {
    id: PageId,
    pub draft: FormDraft,
    pub form_error: Option<FormError>,
    pub saving_step: Option<SubmissionStep>,
    pub report: Option<SubmissionReport>,
    pub new_item_id: Option<ItemId>,
    pub image_status: ImageStatus,
    pub image_file_name: Option<String>,
    pub thumbnail: Option<ThumbnailState>,
    in_flight: bool,
}

impl Default for AddItemPage {
    fn default() -> Self {
        Self::new(PageId::default())
    }
}

impl AddItemPage {
    pub fn new(id: PageId) -> Self {
        Self {
            id,
            draft: FormDraft::default(),
            form_error: None,
            saving_step: None,
            report: None,
            new_item_id: None,
            image_status: ImageStatus::Idle,
            image_file_name: None,
            thumbnail: None,
            in_flight: false,
        }
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    /// Once the item exists the base form is frozen.
    pub fn is_form_disabled(&self) -> bool {
        self.new_item_id.is_some()
    }

    pub fn can_submit(&self) -> bool {
        !self.in_flight && !self.is_form_disabled()
    }

    pub fn save_failed(&self) -> bool {
        self.report
            .as_ref()
            .is_some_and(SubmissionReport::save_failed)
    }

    pub fn begin_submit(&mut self, user: &UserRef) -> Option<BackendCommand> {
        if !self.can_submit() {
            return None;
        }
        let fields = self.draft.to_fields();
        if let Err(err) = fields.validate() {
            self.form_error = Some(err);
            return None;
        }
        self.form_error = None;
        self.in_flight = true;
        Some(BackendCommand::SubmitItem {
            page: self.id,
            user: user.clone(),
            fields,
        })
    }

    pub fn begin_image_upload(&mut self, path: PathBuf) -> Option<BackendCommand> {
        if self.new_item_id.is_none()
            || self.image_file_name.is_some()
            || self.image_status == ImageStatus::Uploading
        {
            return None;
        }
        self.image_status = ImageStatus::Uploading;
        Some(BackendCommand::UploadImage {
            page: self.id,
            item_id: self.new_item_id.clone(),
            path,
        })
    }

    pub fn image_area(&self, thumbnail_base: &str) -> ImageArea {
        match &self.image_file_name {
            Some(file_name) => ImageArea::Thumbnail {
                url: thumbnail_url(thumbnail_base, file_name),
                state: self.thumbnail.clone().unwrap_or(ThumbnailState::Loading),
            },
            None => ImageArea::Uploader {
                item_id: self.new_item_id.clone(),
                busy: self.image_status == ImageStatus::Uploading,
            },
        }
    }

    /// Applies a backend event. Returns a follow-up command when the event
    /// needs one. Events addressed to another page are ignored.
    pub fn apply(&mut self, event: &UiEvent) -> Option<BackendCommand> {
        if event.page().is_some_and(|page| page != self.id) {
            return None;
        }
        match event {
            UiEvent::Submission {
                event: SubmissionEvent::StepStarted(step),
                ..
            } => {
                self.saving_step = Some(*step);
                None
            }
            UiEvent::Submission {
                event: SubmissionEvent::StepFinished(_),
                ..
            } => {
                self.saving_step = None;
                None
            }
            UiEvent::Submission {
                event: SubmissionEvent::Completed(report),
                ..
            } => {
                self.saving_step = None;
                self.in_flight = false;
                self.new_item_id = report.item_id.clone();
                self.report = Some(report.clone());
                None
            }
            UiEvent::ImageAttachment {
                outcome: ImageAttachmentOutcome::Saved { file_name },
                ..
            } => {
                self.image_status = ImageStatus::Saved;
                self.image_file_name = Some(file_name.clone());
                self.thumbnail = Some(ThumbnailState::Loading);
                Some(BackendCommand::FetchThumbnail {
                    page: self.id,
                    file_name: file_name.clone(),
                })
            }
            UiEvent::ImageAttachment {
                outcome: ImageAttachmentOutcome::Failed { reason },
                ..
            } => {
                self.image_status = ImageStatus::Failed {
                    reason: reason.clone(),
                };
                None
            }
            UiEvent::ThumbnailLoaded { file_name, .. } => {
                if self.image_file_name.as_ref() == Some(file_name) {
                    self.thumbnail = Some(ThumbnailState::Ready);
                }
                None
            }
            UiEvent::ThumbnailFailed {
                file_name, reason, ..
            } => {
                if self.image_file_name.as_ref() == Some(file_name) {
                    self.thumbnail = Some(ThumbnailState::Failed {
                        reason: reason.clone(),
                    });
                }
                None
            }
            UiEvent::Info(_) | UiEvent::Error(_) => None,
        }
    }
}

/// Route plus the page mounted on it. Every open or close mounts a page with
/// a fresh id, so results for an earlier page never reach the current one.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub route: Route,
    pub page: AddItemPage,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            route: Route::AddItem,
            page: AddItemPage::default(),
        }
    }
}

impl AppState {
    fn remount(&mut self, route: Route) {
        self.route = route;
        self.page = AddItemPage::new(self.page.id.next());
    }

    pub fn open_add_item(&mut self) {
        self.remount(Route::AddItem);
    }

    /// Leaves the page regardless of save state.
    pub fn close(&mut self) {
        self.remount(Route::Root);
    }

    /// Events for a page that is no longer mounted are dropped.
    pub fn apply(&mut self, event: &UiEvent) -> Option<BackendCommand> {
        match self.route {
            Route::AddItem => self.page.apply(event),
            Route::Root => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use client_core::{StepOutcome, StepResult};

    use super::*;

    const THUMBS: &str = "http://host/thumbs/";

    fn user() -> UserRef {
        UserRef::new("u-1")
    }

    fn filled_page() -> AddItemPage {
        let mut page = AddItemPage::default();
        page.draft = FormDraft {
            title: "Radio".to_string(),
            description: String::new(),
            tags: "a,b,,c".to_string(),
            rating: 3.5,
            review: String::new(),
        };
        page
    }

    fn submission(page: &AddItemPage, event: SubmissionEvent) -> UiEvent {
        UiEvent::Submission {
            page: page.id(),
            event,
        }
    }

    fn image_outcome(page: &AddItemPage, outcome: ImageAttachmentOutcome) -> UiEvent {
        UiEvent::ImageAttachment {
            page: page.id(),
            outcome,
        }
    }

    fn completed(page: PageId, item_id: Option<&str>, failed: &[SubmissionStep]) -> UiEvent {
        let steps = match item_id {
            Some(_) => SubmissionStep::ORDER.to_vec(),
            None => vec![SubmissionStep::CreateItem],
        };
        let steps = steps
            .into_iter()
            .map(|step| StepOutcome {
                step,
                result: if failed.contains(&step) {
                    StepResult::Failed {
                        reason: "boom".to_string(),
                    }
                } else {
                    StepResult::Succeeded
                },
            })
            .collect();
        UiEvent::Submission {
            page,
            event: SubmissionEvent::Completed(SubmissionReport {
                item_id: item_id.map(|id| ItemId(id.to_string())),
                steps,
            }),
        }
    }

    #[test]
    fn draft_maps_to_fields_with_verbatim_tags() {
        let fields = filled_page().draft.to_fields();
        assert_eq!(fields.tags, "a,b,,c");
        assert_eq!(fields.to_tags().tags, vec!["a", "b", "", "c"]);
        assert_eq!(fields.description, None);
        assert_eq!(fields.rating, Some(3.5));
    }

    #[test]
    fn submit_requires_title_and_blocks_double_submission() {
        let mut page = AddItemPage::default();
        assert!(page.begin_submit(&user()).is_none());
        assert_eq!(page.form_error, Some(FormError::MissingTitle));

        let mut page = filled_page();
        let cmd = page.begin_submit(&user()).expect("submit command");
        assert!(matches!(cmd, BackendCommand::SubmitItem { ref user, .. } if user.id.0 == "u-1"));
        assert!(page.begin_submit(&user()).is_none());
    }

    #[test]
    fn busy_flag_follows_each_step() {
        let mut page = filled_page();
        page.begin_submit(&user());

        for step in SubmissionStep::ORDER {
            page.apply(&submission(&page, SubmissionEvent::StepStarted(step)));
            assert_eq!(page.saving_step, Some(step));
            page.apply(&submission(
                &page,
                SubmissionEvent::StepFinished(StepOutcome {
                    step,
                    result: StepResult::Succeeded,
                }),
            ));
            assert_eq!(page.saving_step, None);
        }
    }

    #[test]
    fn completed_submission_disables_form_and_enables_uploader() {
        let mut page = filled_page();
        page.begin_submit(&user());

        assert_eq!(
            page.image_area(THUMBS),
            ImageArea::Uploader {
                item_id: None,
                busy: false
            }
        );
        assert!(page.begin_image_upload(PathBuf::from("a.png")).is_none());

        page.apply(&completed(page.id(), Some("item-1"), &[]));
        assert!(page.is_form_disabled());
        assert!(!page.can_submit());
        assert!(!page.save_failed());
        assert_eq!(
            page.image_area(THUMBS),
            ImageArea::Uploader {
                item_id: Some(ItemId("item-1".to_string())),
                busy: false
            }
        );
    }

    #[test]
    fn failed_creation_keeps_form_editable() {
        let mut page = filled_page();
        page.begin_submit(&user());
        page.apply(&completed(page.id(), None, &[SubmissionStep::CreateItem]));

        assert!(page.save_failed());
        assert!(!page.is_form_disabled());
        assert!(page.can_submit());
    }

    #[test]
    fn partial_failure_still_exposes_item_id() {
        let mut page = filled_page();
        page.begin_submit(&user());
        page.apply(&completed(page.id(), Some("item-2"), &[SubmissionStep::AttachTags]));

        assert!(page.save_failed());
        assert_eq!(page.new_item_id, Some(ItemId("item-2".to_string())));
    }

    #[test]
    fn saved_image_switches_to_thumbnail_and_requests_it() {
        let mut page = filled_page();
        page.begin_submit(&user());
        page.apply(&completed(page.id(), Some("item-3"), &[]));
        let upload = page
            .begin_image_upload(PathBuf::from("cat.png"))
            .expect("upload command");
        assert!(matches!(
            upload,
            BackendCommand::UploadImage { item_id: Some(ref id), .. } if id.0 == "item-3"
        ));
        assert!(matches!(
            page.image_area(THUMBS),
            ImageArea::Uploader { busy: true, .. }
        ));

        let follow_up = page.apply(&image_outcome(
            &page,
            ImageAttachmentOutcome::Saved {
                file_name: "cat-1.png".to_string(),
            },
        ));
        assert!(matches!(
            follow_up,
            Some(BackendCommand::FetchThumbnail { ref file_name, .. }) if file_name == "cat-1.png"
        ));
        assert_eq!(
            page.image_area(THUMBS),
            ImageArea::Thumbnail {
                url: "http://host/thumbs/cat-1.png".to_string(),
                state: ThumbnailState::Loading,
            }
        );
        assert!(page.begin_image_upload(PathBuf::from("again.png")).is_none());

        page.apply(&UiEvent::ThumbnailFailed {
            page: page.id(),
            file_name: "cat-1.png".to_string(),
            reason: "404".to_string(),
        });
        assert!(matches!(
            page.image_area(THUMBS),
            ImageArea::Thumbnail {
                state: ThumbnailState::Failed { .. },
                ..
            }
        ));
    }

    #[test]
    fn failed_image_upload_allows_another_attempt() {
        let mut page = filled_page();
        page.begin_submit(&user());
        page.apply(&completed(page.id(), Some("item-4"), &[]));
        page.begin_image_upload(PathBuf::from("cat.png"));

        page.apply(&image_outcome(
            &page,
            ImageAttachmentOutcome::Failed {
                reason: "too large".to_string(),
            },
        ));

        assert_eq!(
            page.image_status,
            ImageStatus::Failed {
                reason: "too large".to_string()
            }
        );
        assert!(page.begin_image_upload(PathBuf::from("small.png")).is_some());
    }

    #[test]
    fn close_returns_to_root_regardless_of_save_state() {
        let mut app = AppState::default();
        app.page = filled_page();
        app.page.begin_submit(&user());
        let closed = app.page.id();
        app.apply(&submission(
            &app.page,
            SubmissionEvent::StepStarted(SubmissionStep::CreateItem),
        ));

        app.close();
        assert_eq!(app.route, Route::Root);
        assert_eq!(app.route.path(), "/");
        assert_eq!(app.page.saving_step, None);

        assert!(app.apply(&completed(closed, Some("late"), &[])).is_none());
        assert_eq!(app.page.new_item_id, None);

        app.open_add_item();
        assert_eq!(app.route, Route::AddItem);
        assert!(app.page.can_submit());
    }

    #[test]
    fn reopened_page_ignores_results_of_the_closed_one() {
        let mut app = AppState::default();
        app.page = filled_page();
        app.page.begin_submit(&user());
        let closed = app.page.id();

        app.close();
        app.open_add_item();
        assert_ne!(app.page.id(), closed);

        app.apply(&UiEvent::Submission {
            page: closed,
            event: SubmissionEvent::StepStarted(SubmissionStep::CreateItem),
        });
        assert_eq!(app.page.saving_step, None);

        assert!(app.apply(&completed(closed, Some("old-item"), &[])).is_none());
        assert_eq!(app.page.new_item_id, None);
        assert!(!app.page.is_form_disabled());
        assert!(app.page.report.is_none());

        app.apply(&UiEvent::ImageAttachment {
            page: closed,
            outcome: ImageAttachmentOutcome::Saved {
                file_name: "old.png".to_string(),
            },
        });
        assert_eq!(app.page.image_file_name, None);

        app.page.draft = filled_page().draft;
        let cmd = app.page.begin_submit(&user()).expect("submit command");
        let current = app.page.id();
        assert!(matches!(cmd, BackendCommand::SubmitItem { page, .. } if page == current));
        app.apply(&completed(current, Some("new-item"), &[]));
        assert_eq!(app.page.new_item_id, Some(ItemId("new-item".to_string())));
    }
}
