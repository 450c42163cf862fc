//! Item form widget. Field binding only; the title is the one required field.

use client_core::FormError;
use shared::domain::SubmissionStep;

use crate::{controller::reducer::FormDraft, ui::feedback::step_label};

pub struct FormView<'a> {
    pub error: Option<&'a FormError>,
    pub saving_step: Option<SubmissionStep>,
    pub disabled: bool,
}

/// Returns `true` when the user pressed save.
pub fn show_item_form(ui: &mut egui::Ui, draft: &mut FormDraft, view: FormView<'_>) -> bool {
    let editable = !view.disabled && view.saving_step.is_none();

    ui.add_enabled_ui(editable, |ui| {
        egui::Grid::new("item_form")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Tittel *");
                ui.add(egui::TextEdit::singleline(&mut draft.title).desired_width(f32::INFINITY));
                ui.end_row();

                ui.label("Beskrivelse");
                ui.add(
                    egui::TextEdit::multiline(&mut draft.description)
                        .desired_rows(3)
                        .desired_width(f32::INFINITY),
                );
                ui.end_row();

                ui.label("Tagger");
                ui.add(
                    egui::TextEdit::singleline(&mut draft.tags)
                        .hint_text("kommaseparert, f.eks. lampe,messing")
                        .desired_width(f32::INFINITY),
                );
                ui.end_row();

                ui.label("Vurdering");
                ui.add(egui::Slider::new(&mut draft.rating, 0.0..=5.0).step_by(0.5));
                ui.end_row();

                ui.label("Anmeldelse");
                ui.add(
                    egui::TextEdit::multiline(&mut draft.review)
                        .desired_rows(2)
                        .desired_width(f32::INFINITY),
                );
                ui.end_row();
            });
    });

    if let Some(FormError::MissingTitle) = view.error {
        ui.colored_label(ui.visuals().error_fg_color, "Tittel må fylles ut");
    }

    ui.horizontal(|ui| {
        let clicked = ui
            .add_enabled(editable, egui::Button::new("Lagre"))
            .clicked();
        if let Some(step) = view.saving_step {
            ui.spinner();
            ui.label(format!("{}…", step_label(step)));
        }
        clicked
    })
    .inner
}
