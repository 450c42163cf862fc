//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{
    attach_image, CatalogApi, CatalogClient, ClientSettings, ImageAttachmentOutcome, ImageUpload,
    ItemSubmitter, SubmissionEvent,
};
use crossbeam_channel::{Receiver, Sender};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{UiError, UiErrorContext, UiEvent},
    media::decode_preview_image,
};

pub fn launch(settings: &ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let api: Arc<dyn CatalogApi> = Arc::new(CatalogClient::from_settings(settings));
    spawn_backend_thread(api, cmd_rx, ui_tx);
}

fn spawn_backend_thread(
    api: Arc<dyn CatalogApi>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let submitter = ItemSubmitter::new(api.clone());

            let _ = ui_tx.try_send(UiEvent::Info("Klar".to_string()));
            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend received command");
                match cmd {
                    BackendCommand::SubmitItem { page, user, fields } => {
                        // Subscribed per submission so every event is tagged
                        // with the page that started it.
                        let mut events = submitter.subscribe_events();
                        let events_tx = ui_tx.clone();
                        let forward = tokio::spawn(async move {
                            while let Ok(event) = events.recv().await {
                                let done = matches!(event, SubmissionEvent::Completed(_));
                                if events_tx.send(UiEvent::Submission { page, event }).is_err()
                                    || done
                                {
                                    break;
                                }
                            }
                        });
                        submitter.submit(&user, &fields).await;
                        if let Err(err) = forward.await {
                            tracing::warn!("submission event forwarding stopped: {err}");
                        }
                    }
                    BackendCommand::UploadImage {
                        page,
                        item_id,
                        path,
                    } => {
                        let outcome = match ImageUpload::from_path(&path).await {
                            Ok(upload) => attach_image(api.as_ref(), item_id.as_ref(), upload).await,
                            Err(err) => {
                                tracing::warn!("failed to read image {}: {err:#}", path.display());
                                ImageAttachmentOutcome::Failed {
                                    reason: format!("{err:#}"),
                                }
                            }
                        };
                        let _ = ui_tx.send(UiEvent::ImageAttachment { page, outcome });
                    }
                    BackendCommand::FetchThumbnail { page, file_name } => {
                        let evt = match api.fetch_thumbnail(&file_name).await {
                            Ok(bytes) => match decode_preview_image(&bytes) {
                                Ok(image) => UiEvent::ThumbnailLoaded {
                                    page,
                                    file_name,
                                    image,
                                },
                                Err(reason) => UiEvent::ThumbnailFailed {
                                    page,
                                    file_name,
                                    reason,
                                },
                            },
                            Err(err) => UiEvent::ThumbnailFailed {
                                page,
                                file_name,
                                reason: format!("{err:#}"),
                            },
                        };
                        if let UiEvent::ThumbnailFailed { reason, .. } = &evt {
                            tracing::warn!(%reason, "thumbnail unavailable, showing placeholder");
                        }
                        let _ = ui_tx.send(evt);
                    }
                }
            }
            tracing::info!("ui command queue closed, backend worker stopping");
        });
    });
}
