//! Album run driver.
//!
//! Wires preflight, the page writer, the two turn chains and the
//! admission controller together, spawns one worker per image and
//! waits for the whole run to settle.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::admission::AdmissionController;
use crate::config::AlbumSettings;
use crate::invoker::{ImageTool, InvokerError};
use crate::ordering::TurnChain;
use crate::page::PageWriter;
use crate::preflight::{self, PreflightError};
use crate::prompt::Prompter;
use crate::task::ImageTask;
use crate::worker::{ImageWorker, WorkerError};

/// Errors that stop a run before any worker starts.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// No input images were given.
    #[error("no input images")]
    NoInputs,

    /// The external image tool is unusable.
    #[error("image tool unavailable: {0}")]
    ToolUnavailable(#[source] InvokerError),

    /// An input file failed the preflight check.
    #[error(transparent)]
    Preflight(#[from] PreflightError),

    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a finished run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumSummary {
    /// Number of input images.
    pub images_total: usize,
    /// Workers that ran their lifecycle to the end.
    pub images_completed: usize,
    /// Workers that failed fatally or were aborted.
    pub images_failed: usize,
    /// Gallery entry blocks written to the page.
    pub entries_written: usize,
    /// Caption blocks written to the page.
    pub captions_written: usize,
}

impl AlbumSummary {
    /// A run is clean when every image made it onto the page.
    pub fn is_clean(&self) -> bool {
        self.images_failed == 0
    }
}

/// Drives a full album run over a fixed list of input images.
pub struct AlbumRunner {
    settings: AlbumSettings,
    tool: Arc<dyn ImageTool>,
    prompter: Arc<dyn Prompter>,
}

impl AlbumRunner {
    pub fn new(settings: AlbumSettings, tool: Arc<dyn ImageTool>, prompter: Arc<dyn Prompter>) -> Self {
        Self {
            settings,
            tool,
            prompter,
        }
    }

    /// Runs the album build over `sources`, in the order given.
    pub async fn run(&self, sources: Vec<PathBuf>) -> Result<AlbumSummary, RunnerError> {
        if sources.is_empty() {
            return Err(RunnerError::NoInputs);
        }

        self.tool
            .validate()
            .await
            .map_err(RunnerError::ToolUnavailable)?;

        preflight::check_inputs(&sources).await?;

        tokio::fs::create_dir_all(&self.settings.output_dir)
            .await
            .map_err(|source| RunnerError::OutputDir {
                path: self.settings.output_dir.clone(),
                source,
            })?;

        let tasks: Vec<ImageTask> = sources
            .iter()
            .enumerate()
            .map(|(i, source)| ImageTask::new(source.clone(), i as u64 + 1, &self.settings.output_dir))
            .collect();

        info!(
            images = tasks.len(),
            max_concurrent = self.settings.max_concurrent,
            page = %self.settings.page_path.display(),
            "starting album run"
        );

        let (page, page_join) = PageWriter::spawn(self.settings.page_path.clone());
        let page_turns = TurnChain::new();
        let preview_turns = TurnChain::new();
        let admission = AdmissionController::new(self.settings.max_concurrent);

        let mut workers = Vec::with_capacity(tasks.len());
        for task in tasks {
            // Admission is taken in input order, so the slots always go
            // to the lowest pending indexes.
            let permit = match admission.admit().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let worker = ImageWorker::new(
                task,
                Arc::clone(&self.tool),
                Arc::clone(&self.prompter),
                page.clone(),
                page_turns.clone(),
                preview_turns.clone(),
                self.settings.thumbnail_percent,
                self.settings.medium_percent,
            );
            workers.push(tokio::spawn(async move {
                let _permit = permit;
                worker.run().await
            }));
        }

        let mut summary = AlbumSummary {
            images_total: sources.len(),
            ..AlbumSummary::default()
        };

        for handle in workers {
            match handle.await {
                Ok(Ok(())) => summary.images_completed += 1,
                Ok(Err(WorkerError::Interrupted { index })) => {
                    warn!(index, "worker aborted");
                    summary.images_failed += 1;
                }
                Ok(Err(e)) => {
                    error!("worker failed: {e}");
                    summary.images_failed += 1;
                }
                Err(e) => {
                    error!("worker task panicked: {e}");
                    summary.images_failed += 1;
                }
            }
        }

        // Dropping the last handle closes the page writer's channel
        // and lets it report what it wrote.
        drop(page);
        match page_join.await {
            Ok(page_summary) => {
                summary.entries_written = page_summary.entries;
                summary.captions_written = page_summary.captions;
            }
            Err(e) => error!("page writer task panicked: {e}"),
        }

        info!(
            completed = summary.images_completed,
            failed = summary.images_failed,
            entries = summary.entries_written,
            captions = summary.captions_written,
            "album run finished"
        );

        Ok(summary)
    }
}
