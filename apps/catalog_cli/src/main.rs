use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::Parser;
use client_core::{
    attach_image, config::normalize_items_url, load_settings, CatalogClient,
    ImageAttachmentOutcome, ImageUpload, ItemFormFields, ItemSubmitter, StepResult,
};
use tracing_subscriber::EnvFilter;

/// Creates a catalog item, attaches its tags and review, then optionally an image.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    items_url: Option<String>,
    #[arg(long)]
    thumbnail_url: Option<String>,
    #[arg(long)]
    user_id: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: Option<String>,
    /// Comma separated; segments are sent verbatim.
    #[arg(long, default_value = "")]
    tags: String,
    #[arg(long)]
    rating: Option<f64>,
    #[arg(long)]
    review: Option<String>,
    #[arg(long)]
    image: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings()?;
    if let Some(items_url) = &args.items_url {
        settings.items_url = normalize_items_url(items_url)?;
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

    let fields = ItemFormFields {
        title: args.title,
        description: args.description,
        tags: args.tags,
        rating: args.rating,
        review: args.review,
    };
    fields.validate()?;

    let client = Arc::new(CatalogClient::from_settings(&settings));
    let submitter = ItemSubmitter::new(client.clone());
    let report = submitter.submit(&settings.user(), &fields).await;

    for outcome in &report.steps {
        match &outcome.result {
            StepResult::Succeeded => println!("{:<14} ok", outcome.step.as_str()),
            StepResult::Failed { reason } => {
                println!("{:<14} FAILED: {reason}", outcome.step.as_str())
            }
        }
    }
    if let Some(item_id) = &report.item_id {
        println!("item id: {item_id}");
    }

    let mut image_failed = false;
    if let Some(path) = args.image {
        if report.item_id.is_none() {
            println!("image          skipped: item was not created");
        } else {
            let outcome = match ImageUpload::from_path(&path).await {
                Ok(upload) => attach_image(client.as_ref(), report.item_id.as_ref(), upload).await,
                Err(err) => ImageAttachmentOutcome::Failed {
                    reason: format!("{err:#}"),
                },
            };
            match outcome {
                ImageAttachmentOutcome::Saved { file_name } => {
                    println!("image          ok: {}", client.thumbnail_url_for(&file_name));
                }
                ImageAttachmentOutcome::Failed { reason } => {
                    image_failed = true;
                    println!("image          FAILED: {reason}");
                }
            }
        }
    }

    if report.save_failed() || image_failed {
        bail!("item was not saved completely");
    }
    Ok(())
}
