//! Per-image worker lifecycle.
//!
//! One worker drives one image from raw file to finished gallery
//! entry: both resizes start immediately and race other workers; the
//! page turn gates the entry append; the preview turn gates the
//! on-screen display and the two prompts; completing both turns hands
//! the run to the next index.
//!
//! Most failures are best-effort: a failed resize, rotate, preview or
//! prompt is logged and the worker carries on, so one flaky external
//! invocation never takes down the album. The one exception is the
//! caption append: a half-written gallery entry is worse than a
//! missing one, so that failure is fatal to the worker and poisons
//! both turn chains to keep the remaining workers from waiting on a
//! turn that will never come.

use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::invoker::{ImageTool, InvokerError, RotationChoice};
use crate::ordering::TurnChain;
use crate::page::{PageError, PageWriterHandle};
use crate::prompt::Prompter;
use crate::task::ImageTask;

/// Fatal worker outcomes. Everything else is logged and absorbed.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The caption block could not be written.
    #[error("image {index}: failed to append caption: {source}")]
    CaptionAppend {
        index: u64,
        #[source]
        source: PageError,
    },

    /// An earlier worker failed fatally; this worker's turn will
    /// never arrive.
    #[error("image {index}: aborted because an earlier image failed")]
    Interrupted { index: u64 },
}

/// Drives one ImageTask through its full lifecycle.
pub struct ImageWorker {
    task: ImageTask,
    tool: Arc<dyn ImageTool>,
    prompter: Arc<dyn Prompter>,
    page: PageWriterHandle,
    page_turns: TurnChain,
    preview_turns: TurnChain,
    thumbnail_percent: u8,
    medium_percent: u8,
}

impl ImageWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        task: ImageTask,
        tool: Arc<dyn ImageTool>,
        prompter: Arc<dyn Prompter>,
        page: PageWriterHandle,
        page_turns: TurnChain,
        preview_turns: TurnChain,
        thumbnail_percent: u8,
        medium_percent: u8,
    ) -> Self {
        Self {
            task,
            tool,
            prompter,
            page,
            page_turns,
            preview_turns,
            thumbnail_percent,
            medium_percent,
        }
    }

    fn spawn_resize(&self, dest_is_thumbnail: bool) -> JoinHandle<Result<(), InvokerError>> {
        let tool = Arc::clone(&self.tool);
        let task = self.task.clone();
        let percent = if dest_is_thumbnail {
            self.thumbnail_percent
        } else {
            self.medium_percent
        };
        tokio::spawn(async move {
            let dest = if dest_is_thumbnail {
                &task.thumbnail
            } else {
                &task.medium
            };
            tool.resize(&task.source, dest, percent).await
        })
    }

    /// Awaits an external operation, absorbing its failure.
    async fn settle(index: u64, what: &str, handle: JoinHandle<Result<(), InvokerError>>) {
        match handle.await {
            Ok(Ok(())) => debug!(index, "{what} done"),
            Ok(Err(e)) => warn!(index, "{what} failed, continuing: {e}"),
            Err(e) => warn!(index, "{what} task panicked: {e}"),
        }
    }

    /// Runs the lifecycle to completion.
    pub async fn run(self) -> Result<(), WorkerError> {
        let index = self.task.index;
        debug!(index, source = %self.task.source.display(), "worker started");

        // Both resizes start immediately; they race freely against
        // other workers' external operations.
        let thumbnail_resize = self.spawn_resize(true);
        let medium_resize = self.spawn_resize(false);

        // Entry blocks land in input order. Turn 1 is live from the
        // start, so the first worker passes straight through.
        self.page_turns
            .wait(index)
            .await
            .map_err(|_| WorkerError::Interrupted { index })?;

        if let Err(e) = self
            .page
            .append_entry(index, &self.task.thumbnail_name(), &self.task.medium_name())
            .await
        {
            error!(index, "failed to append gallery entry, continuing: {e}");
        }

        // The thumbnail must exist before it goes on screen.
        Self::settle(index, "thumbnail resize", thumbnail_resize).await;

        // Previews run in input order too, and only after the
        // previous worker finished its whole interactive phase.
        self.preview_turns
            .wait(index)
            .await
            .map_err(|_| WorkerError::Interrupted { index })?;

        self.prompter.announce_preview(&self.task).await;
        if let Err(e) = self.tool.preview(&self.task.thumbnail).await {
            warn!(index, "preview failed, continuing: {e}");
        }

        let rotation = match self.prompter.ask_rotation(&self.task).await {
            Ok(choice) => choice,
            Err(e) => {
                warn!(index, "rotation prompt failed, leaving image as is: {e}");
                RotationChoice::NoRotation
            }
        };

        // The medium resize must have landed before rotating in place.
        Self::settle(index, "medium resize", medium_resize).await;

        if rotation.is_rotation() {
            let thumbnail_rotate = {
                let tool = Arc::clone(&self.tool);
                let task = self.task.clone();
                tokio::spawn(
                    async move { tool.rotate(&task.thumbnail, &task.thumbnail, rotation).await },
                )
            };
            let medium_rotate = {
                let tool = Arc::clone(&self.tool);
                let task = self.task.clone();
                tokio::spawn(async move { tool.rotate(&task.medium, &task.medium, rotation).await })
            };
            Self::settle(index, "thumbnail rotate", thumbnail_rotate).await;
            Self::settle(index, "medium rotate", medium_rotate).await;
        }

        let caption = match self.prompter.ask_caption(&self.task).await {
            Ok(caption) => caption,
            Err(e) => {
                warn!(index, "caption prompt failed, using empty caption: {e}");
                String::new()
            }
        };

        if let Err(e) = self.page.append_caption(index, &caption).await {
            error!(index, "failed to append caption, aborting waiting workers: {e}");
            self.page_turns.poison();
            self.preview_turns.poison();
            return Err(WorkerError::CaptionAppend { index, source: e });
        }

        // Hand both turns to the next index.
        self.page_turns.complete(index);
        self.preview_turns.complete(index);

        info!(index, source = %self.task.source.display(), "image finished");
        Ok(())
    }
}
