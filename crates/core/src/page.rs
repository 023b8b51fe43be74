//! Single-writer actor for the gallery page.
//!
//! Every fragment write goes through one task that owns the page file
//! handle. Workers already serialize themselves through the turn
//! chain, so requests arrive in input order; the actor's job is to
//! make the file itself single-owner instead of relying on
//! cooperative appends to a shared handle.

use std::path::PathBuf;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Errors that can occur while writing the page.
#[derive(Debug, Error)]
pub enum PageError {
    /// The page file could not be created.
    #[error("failed to create page file {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fragment write failed.
    #[error("failed to write page fragment: {0}")]
    Write(#[source] std::io::Error),

    /// The writer task has already shut down.
    #[error("page writer is closed")]
    Closed,
}

/// Totals reported by the writer when its channel closes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSummary {
    /// Linked-thumbnail blocks written.
    pub entries: usize,
    /// Caption blocks written.
    pub captions: usize,
}

enum Request {
    Entry {
        index: u64,
        thumbnail: String,
        medium: String,
        ack: oneshot::Sender<Result<(), PageError>>,
    },
    Caption {
        index: u64,
        caption: String,
        ack: oneshot::Sender<Result<(), PageError>>,
    },
}

/// Clonable handle for submitting append requests.
#[derive(Clone)]
pub struct PageWriterHandle {
    tx: mpsc::Sender<Request>,
}

impl PageWriterHandle {
    /// Appends the linked-thumbnail block for one image and waits for
    /// the write to land.
    pub async fn append_entry(
        &self,
        index: u64,
        thumbnail: &str,
        medium: &str,
    ) -> Result<(), PageError> {
        let (ack, ack_rx) = oneshot::channel();
        self.tx
            .send(Request::Entry {
                index,
                thumbnail: thumbnail.to_string(),
                medium: medium.to_string(),
                ack,
            })
            .await
            .map_err(|_| PageError::Closed)?;
        ack_rx.await.map_err(|_| PageError::Closed)?
    }

    /// Appends the caption block for one image.
    pub async fn append_caption(&self, index: u64, caption: &str) -> Result<(), PageError> {
        let (ack, ack_rx) = oneshot::channel();
        self.tx
            .send(Request::Caption {
                index,
                caption: caption.to_string(),
                ack,
            })
            .await
            .map_err(|_| PageError::Closed)?;
        ack_rx.await.map_err(|_| PageError::Closed)?
    }
}

/// The page-writer actor.
pub struct PageWriter {
    path: PathBuf,
    rx: mpsc::Receiver<Request>,
    file: Option<File>,
    summary: PageSummary,
}

impl PageWriter {
    /// Spawns the writer task for the page at `path`.
    ///
    /// The file is created (truncating any previous album) on the
    /// first append, not here. The task runs until every handle is
    /// dropped, then flushes and yields the summary.
    pub fn spawn(path: PathBuf) -> (PageWriterHandle, JoinHandle<PageSummary>) {
        let (tx, rx) = mpsc::channel(32);
        let writer = Self {
            path,
            rx,
            file: None,
            summary: PageSummary::default(),
        };
        let join = tokio::spawn(writer.run());
        (PageWriterHandle { tx }, join)
    }

    async fn run(mut self) -> PageSummary {
        while let Some(request) = self.rx.recv().await {
            match request {
                Request::Entry {
                    index,
                    thumbnail,
                    medium,
                    ack,
                } => {
                    debug!(index, %thumbnail, "appending entry block");
                    let fragment = format!("<a href=\"{medium}\"><img src=\"{thumbnail}\"></a>\n");
                    let result = self.write_fragment(&fragment).await;
                    if result.is_ok() {
                        self.summary.entries += 1;
                    }
                    let _ = ack.send(result);
                }
                Request::Caption { index, caption, ack } => {
                    debug!(index, "appending caption block");
                    let fragment = format!("<h2>{caption}</h2>\n");
                    let result = self.write_fragment(&fragment).await;
                    if result.is_ok() {
                        self.summary.captions += 1;
                    }
                    let _ = ack.send(result);
                }
            }
        }

        if let Some(file) = self.file.as_mut() {
            if let Err(e) = file.flush().await {
                error!("failed to flush page file: {}", e);
            }
        }
        self.summary
    }

    async fn write_fragment(&mut self, fragment: &str) -> Result<(), PageError> {
        if self.file.is_none() {
            let file = File::create(&self.path)
                .await
                .map_err(|e| PageError::Create {
                    path: self.path.clone(),
                    source: e,
                })?;
            self.file = Some(file);
        }

        let file = self.file.as_mut().ok_or(PageError::Closed)?;
        file.write_all(fragment.as_bytes())
            .await
            .map_err(PageError::Write)?;
        file.flush().await.map_err(PageError::Write)?;
        Ok(())
    }
}
