//! Alerts derived from page state.

use shared::domain::SubmissionStep;

use crate::controller::reducer::{AddItemPage, ImageStatus};

pub const SAVE_ERROR_TEXT: &str = "Lagring av data gikk gæli!";
pub const IMAGE_ERROR_TEXT: &str = "Kunne ikke lagre bilde";
pub const IMAGE_SUCCESS_TEXT: &str = "Bildet ble lagret";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackAlert {
    pub severity: AlertSeverity,
    pub text: &'static str,
    pub details: Vec<String>,
}

pub fn step_label(step: SubmissionStep) -> &'static str {
    match step {
        SubmissionStep::CreateItem => "Lagre gjenstand",
        SubmissionStep::AttachTags => "Lagre tagger",
        SubmissionStep::AttachReview => "Lagre anmeldelse",
    }
}

/// Generic save failure notice, listing which steps failed.
pub fn save_alert(page: &AddItemPage) -> Option<FeedbackAlert> {
    if !page.save_failed() {
        return None;
    }
    let report = page.report.as_ref()?;
    Some(FeedbackAlert {
        severity: AlertSeverity::Error,
        text: SAVE_ERROR_TEXT,
        details: report
            .failed_steps()
            .map(|outcome| step_label(outcome.step).to_string())
            .collect(),
    })
}

pub fn image_alert(page: &AddItemPage) -> Option<FeedbackAlert> {
    match &page.image_status {
        ImageStatus::Failed { reason } => Some(FeedbackAlert {
            severity: AlertSeverity::Error,
            text: IMAGE_ERROR_TEXT,
            details: vec![reason.clone()],
        }),
        ImageStatus::Saved => Some(FeedbackAlert {
            severity: AlertSeverity::Success,
            text: IMAGE_SUCCESS_TEXT,
            details: Vec::new(),
        }),
        ImageStatus::Idle | ImageStatus::Uploading => None,
    }
}

pub fn show_alert(ui: &mut egui::Ui, alert: &FeedbackAlert) {
    let (fill, stroke) = match alert.severity {
        AlertSeverity::Error => (
            egui::Color32::from_rgb(253, 237, 237),
            egui::Color32::from_rgb(211, 47, 47),
        ),
        AlertSeverity::Success => (
            egui::Color32::from_rgb(237, 247, 237),
            egui::Color32::from_rgb(46, 125, 50),
        ),
    };
    egui::Frame::new()
        .fill(fill)
        .stroke(egui::Stroke::new(1.0, stroke))
        .corner_radius(4.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.colored_label(stroke, alert.text);
            for detail in &alert.details {
                ui.small(format!("• {detail}"));
            }
        });
}

#[cfg(test)]
mod tests {
    use client_core::{ImageAttachmentOutcome, StepOutcome, StepResult, SubmissionReport};
    use shared::domain::ItemId;

    use super::*;
    use crate::controller::events::UiEvent;

    fn page_with_report(failed: &[SubmissionStep]) -> AddItemPage {
        let mut page = AddItemPage::default();
        page.report = Some(SubmissionReport {
            item_id: Some(ItemId("item-1".to_string())),
            steps: SubmissionStep::ORDER
                .into_iter()
                .map(|step| StepOutcome {
                    step,
                    result: if failed.contains(&step) {
                        StepResult::Failed {
                            reason: "status 500".to_string(),
                        }
                    } else {
                        StepResult::Succeeded
                    },
                })
                .collect(),
        });
        page
    }

    #[test]
    fn no_alerts_for_untouched_page() {
        let page = AddItemPage::default();
        assert_eq!(save_alert(&page), None);
        assert_eq!(image_alert(&page), None);
    }

    #[test]
    fn save_alert_names_every_failed_step() {
        assert_eq!(save_alert(&page_with_report(&[])), None);

        let alert = save_alert(&page_with_report(&[
            SubmissionStep::AttachTags,
            SubmissionStep::AttachReview,
        ]))
        .expect("alert");
        assert_eq!(alert.severity, AlertSeverity::Error);
        assert_eq!(alert.text, SAVE_ERROR_TEXT);
        assert_eq!(alert.details, vec!["Lagre tagger", "Lagre anmeldelse"]);
    }

    #[test]
    fn image_alert_follows_latest_outcome() {
        let mut page = page_with_report(&[]);
        page.new_item_id = Some(ItemId("item-1".to_string()));

        page.apply(&UiEvent::ImageAttachment {
            page: page.id(),
            outcome: ImageAttachmentOutcome::Failed {
                reason: "nope".to_string(),
            },
        });
        let alert = image_alert(&page).expect("alert");
        assert_eq!(alert.text, IMAGE_ERROR_TEXT);
        assert_eq!(alert.details, vec!["nope"]);

        page.apply(&UiEvent::ImageAttachment {
            page: page.id(),
            outcome: ImageAttachmentOutcome::Saved {
                file_name: "a.png".to_string(),
            },
        });
        let alert = image_alert(&page).expect("alert");
        assert_eq!(alert.severity, AlertSeverity::Success);
        assert_eq!(alert.text, IMAGE_SUCCESS_TEXT);
    }
}
