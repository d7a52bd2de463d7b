//! Imagine Art
//!
//! AI image generation and editing studio: text-to-image generation,
//! instruction-based edits, text overlays and a before/after comparison.

mod animation;
mod api;
mod app;
mod config;
mod error;
mod i18n;
mod render;
mod utils;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use app::ImagineApp;
use config::AppConfig;
use i18n::Language;

/// Imagine Art
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API key (overrides the config file and GEMINI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Directory downloads are saved into
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// UI language: uz, ru or en
    #[arg(short, long)]
    language: Option<String>,

    /// Image to open in the Edit tab
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.debug { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Imagine Art starting...");

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from: {:?}", path);
            let config = AppConfig::load_from_file(path)?;
            info!("  - generate model: {}", config.generate_model);
            info!("  - edit model: {}", config.edit_model);
            config
        }
        None => AppConfig::default(),
    };

    if let Some(dir) = args.download_dir {
        config.download_dir = dir;
    }
    if let Some(code) = &args.language {
        match Language::from_code(code) {
            Some(language) => config.language = language,
            None => anyhow::bail!("Unknown language '{}', expected uz, ru or en", code),
        }
    }
    info!("Download directory: {:?}", config.download_dir);

    let api_key = config.resolve_api_key(args.api_key.as_deref());
    if api_key.is_none() {
        tracing::warn!("No API key found; set GEMINI_API_KEY or pass --api-key");
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 900.0])
            .with_min_inner_size([640.0, 600.0])
            .with_drag_and_drop(true)
            .with_title("Imagine Art"),
        ..Default::default()
    };

    let initial_image = args.image;
    eframe::run_native(
        "Imagine Art",
        native_options,
        Box::new(move |cc| Ok(Box::new(ImagineApp::new(cc, config, api_key, initial_image)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}
