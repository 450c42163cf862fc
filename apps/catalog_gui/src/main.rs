mod backend_bridge;
mod controller;
mod media;
mod ui;

use anyhow::{anyhow, Result};
use clap::Parser;
use client_core::{config::normalize_items_url, load_settings};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::UiEvent,
    ui::{CatalogGuiApp, StartupConfig},
};

#[derive(Parser, Debug)]
struct Args {
    /// Overrides ITEMS_URL.
    #[arg(long)]
    items_url: Option<String>,
    /// Overrides THUMBNAIL_URL.
    #[arg(long)]
    thumbnail_url: Option<String>,
    #[arg(long)]
    user_id: Option<String>,
    #[arg(long)]
    username: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings()?;
    if let Some(items_url) = args.items_url {
        settings.items_url = normalize_items_url(&items_url)?;
    }
    if let Some(thumbnail_url) = args.thumbnail_url {
        settings.thumbnail_url = thumbnail_url;
    }
    if let Some(user_id) = args.user_id {
        settings.user_id = user_id;
    }
    if args.username.is_some() {
        settings.username = args.username;
    }
    tracing::info!(items_url = %settings.items_url, user = %settings.user_id, "starting catalog gui");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(&settings, cmd_rx, ui_tx);

    let config = StartupConfig {
        user: settings.user(),
        thumbnail_url: settings.thumbnail_url.clone(),
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Katalog")
            .with_inner_size([720.0, 820.0])
            .with_min_inner_size([480.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Katalog",
        options,
        Box::new(|_cc| Ok(Box::new(CatalogGuiApp::new(cmd_tx, ui_rx, config)))),
    )
    .map_err(|err| anyhow!("gui exited with error: {err}"))
}
