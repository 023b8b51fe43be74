use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use album_core::{
    load_config, validate_config, AlbumRunner, AlbumSummary, Config, ConsolePrompter, MagickTool,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let sources: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if sources.is_empty() {
        eprintln!("Usage: album <image>...");
        std::process::exit(2);
    }

    match run(sources).await {
        Ok(summary) if summary.is_clean() => {}
        Ok(summary) => {
            error!(
                failed = summary.images_failed,
                completed = summary.images_completed,
                "album finished with failures"
            );
            std::process::exit(1);
        }
        Err(e) => {
            error!("Fatal error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(sources: Vec<PathBuf>) -> Result<AlbumSummary> {
    // Optional config file; everything has a sensible default.
    let config = match std::env::var("ALBUM_CONFIG") {
        Ok(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path.as_ref())
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
        Err(_) => Config::default(),
    };

    validate_config(&config).context("Configuration validation failed")?;

    info!(
        version = VERSION,
        images = sources.len(),
        "album starting"
    );

    let tool = Arc::new(MagickTool::new(config.invoker.clone()));
    let prompter = Arc::new(ConsolePrompter::new());
    let runner = AlbumRunner::new(config.album.clone(), tool, prompter);

    let summary = runner.run(sources).await.context("Album run failed")?;

    println!(
        "Wrote {} entries and {} captions to {}",
        summary.entries_written,
        summary.captions_written,
        config.album.page_path.display()
    );

    Ok(summary)
}
