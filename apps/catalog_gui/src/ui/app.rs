use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;
use shared::domain::UserRef;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::UiEvent,
        orchestration::dispatch_backend_command,
        reducer::{AppState, ImageArea, Route, ThumbnailState},
    },
    media::{placeholder_image, PreviewImage, THUMBNAIL_MAX_WIDTH},
    ui::{
        feedback::{image_alert, save_alert, show_alert},
        form::{show_item_form, FormView},
    },
};

const PAGE_MAX_WIDTH: f32 = 600.0;
const IMAGE_FILE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Values injected at startup instead of looked up from ambient context.
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub user: UserRef,
    pub thumbnail_url: String,
}

pub struct CatalogGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    config: StartupConfig,
    state: AppState,
    status: String,
    thumbnail_texture: Option<TextureHandle>,
    placeholder: Option<PreviewImage>,
    placeholder_texture: Option<TextureHandle>,
}

impl CatalogGuiApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        config: StartupConfig,
    ) -> Self {
        let placeholder = match placeholder_image() {
            Ok(image) => Some(image),
            Err(err) => {
                tracing::warn!("bundled placeholder image is unreadable: {err}");
                None
            }
        };
        Self {
            cmd_tx,
            ui_rx,
            config,
            state: AppState::default(),
            status: "Starter…".to_string(),
            thumbnail_texture: None,
            placeholder,
            placeholder_texture: None,
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, cmd) {
            self.status = err.status_text();
        }
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match &event {
                UiEvent::Info(message) => self.status = message.clone(),
                UiEvent::Error(err) => {
                    tracing::error!(
                        context = ?err.context(),
                        category = ?err.category(),
                        "{}",
                        err.message()
                    );
                    self.status = err.status_text();
                }
                UiEvent::ThumbnailLoaded {
                    page,
                    file_name,
                    image,
                } => {
                    if self.state.route == Route::AddItem
                        && self.state.page.id() == *page
                        && self.state.page.image_file_name.as_ref() == Some(file_name)
                    {
                        self.thumbnail_texture = Some(ctx.load_texture(
                            format!("thumbnail-{file_name}"),
                            image.to_color_image(),
                            egui::TextureOptions::LINEAR,
                        ));
                    }
                }
                _ => {}
            }
            if let Some(cmd) = self.state.apply(&event) {
                self.dispatch(cmd);
            }
        }
    }

    fn close_page(&mut self) {
        self.state.close();
        self.thumbnail_texture = None;
        tracing::info!(route = self.state.route.path(), "navigated");
    }

    fn placeholder_texture(
        &mut self,
        ctx: &egui::Context,
    ) -> Option<(TextureHandle, egui::Vec2)> {
        let image = self.placeholder.as_ref()?;
        let texture = self
            .placeholder_texture
            .get_or_insert_with(|| {
                ctx.load_texture(
                    "placeholder",
                    image.to_color_image(),
                    egui::TextureOptions::LINEAR,
                )
            })
            .clone();
        Some((texture, image.display_size()))
    }

    fn show_root(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Katalog");
            ui.add_space(8.0);
            if ui.button("Legg til ny").clicked() {
                self.state.open_add_item();
                tracing::info!(route = self.state.route.path(), "navigated");
            }
        });
    }

    fn show_add_item_page(&mut self, ctx: &egui::Context) {
        let mut submit_clicked = false;
        let mut pick_image = false;
        let mut close_clicked = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_max_width(PAGE_MAX_WIDTH);

                if let Some(alert) = save_alert(&self.state.page) {
                    show_alert(ui, &alert);
                    ui.add_space(8.0);
                }

                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.heading("Legg til ny: ");
                    ui.add_space(8.0);

                    let page = &mut self.state.page;
                    let view = FormView {
                        error: page.form_error.as_ref(),
                        saving_step: page.saving_step,
                        disabled: page.is_form_disabled(),
                    };
                    submit_clicked = show_item_form(ui, &mut page.draft, view);

                    ui.separator();
                    ui.label(egui::RichText::new("Bilde").strong());
                    pick_image = self.show_image_area(ui);

                    if let Some(alert) = image_alert(&self.state.page) {
                        show_alert(ui, &alert);
                    }

                    ui.add_space(16.0);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        close_clicked = ui.button("Lukk").clicked();
                    });
                });
            });
        });

        if submit_clicked {
            if let Some(cmd) = self.state.page.begin_submit(&self.config.user) {
                self.dispatch(cmd);
            }
        }
        if pick_image {
            let picked = rfd::FileDialog::new()
                .add_filter("Bilder", IMAGE_FILE_EXTENSIONS)
                .pick_file();
            if let Some(path) = picked {
                if let Some(cmd) = self.state.page.begin_image_upload(path) {
                    self.dispatch(cmd);
                }
            }
        }
        if close_clicked {
            self.close_page();
        }
    }

    /// Returns `true` when the user asked to pick an image.
    fn show_image_area(&mut self, ui: &mut egui::Ui) -> bool {
        match self.state.page.image_area(&self.config.thumbnail_url) {
            ImageArea::Thumbnail { url, state } => {
                let thumbnail = match (&state, &self.thumbnail_texture) {
                    (ThumbnailState::Ready, Some(texture)) => {
                        let size = texture.size_vec2();
                        let scale = (THUMBNAIL_MAX_WIDTH / size.x.max(1.0)).min(1.0);
                        Some((texture.clone(), size * scale))
                    }
                    _ => None,
                };
                let shown = thumbnail.or_else(|| self.placeholder_texture(ui.ctx()));
                let hover = match &state {
                    ThumbnailState::Failed { reason } => format!("{url}\n{reason}"),
                    ThumbnailState::Loading | ThumbnailState::Ready => url,
                };
                if let Some((texture, size)) = shown {
                    ui.add(egui::Image::new((texture.id(), size)))
                        .on_hover_text(hover);
                }
                if state == ThumbnailState::Loading {
                    ui.spinner();
                }
                false
            }
            ImageArea::Uploader { item_id, busy } => {
                let mut clicked = false;
                ui.horizontal(|ui| {
                    clicked = ui
                        .add_enabled(item_id.is_some() && !busy, egui::Button::new("Velg bilde…"))
                        .clicked();
                    if busy {
                        ui.spinner();
                    }
                });
                if item_id.is_none() {
                    ui.small("Lagre gjenstanden før du legger til bilde");
                }
                clicked
            }
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.monospace(self.state.route.path());
                ui.separator();
                ui.label(&self.status);
            });
        });
    }
}

impl eframe::App for CatalogGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events(ctx);

        self.show_status_bar(ctx);
        match self.state.route {
            Route::Root => self.show_root(ctx),
            Route::AddItem => self.show_add_item_page(ctx),
        }

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
