//! Mock image tool for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::invoker::{ImageTool, InvokerError, RotationChoice};

/// One recorded tool invocation, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOp {
    Resize {
        src: PathBuf,
        dest: PathBuf,
        percent: u8,
    },
    Rotate {
        src: PathBuf,
        dest: PathBuf,
        rotation: RotationChoice,
    },
    Preview {
        path: PathBuf,
    },
}

/// Mock implementation of the ImageTool trait.
///
/// Provides controllable behavior for testing:
/// - Records every invocation in call order
/// - Per-source artificial delays, to force adverse schedules
/// - Error injection per operation kind
/// - Optionally materializes output files on resize
pub struct MockImageTool {
    ops: Arc<RwLock<Vec<ToolOp>>>,
    /// Extra latency applied to resizes of a given source file.
    resize_delays: Arc<RwLock<HashMap<PathBuf, Duration>>>,
    /// Extra latency applied to previews of a given file.
    preview_delays: Arc<RwLock<HashMap<PathBuf, Duration>>>,
    /// Sources whose resize should fail.
    failing_resizes: Arc<RwLock<Vec<PathBuf>>>,
    /// In-flight resize count per source.
    active_sources: Arc<RwLock<HashMap<PathBuf, usize>>>,
    /// High-water mark of distinct sources resizing at once.
    max_active_sources: Arc<RwLock<usize>>,
    fail_validation: bool,
    create_outputs: bool,
}

impl Default for MockImageTool {
    fn default() -> Self {
        Self::new()
    }
}

impl MockImageTool {
    pub fn new() -> Self {
        Self {
            ops: Arc::new(RwLock::new(Vec::new())),
            resize_delays: Arc::new(RwLock::new(HashMap::new())),
            preview_delays: Arc::new(RwLock::new(HashMap::new())),
            failing_resizes: Arc::new(RwLock::new(Vec::new())),
            active_sources: Arc::new(RwLock::new(HashMap::new())),
            max_active_sources: Arc::new(RwLock::new(0)),
            fail_validation: false,
            create_outputs: false,
        }
    }

    /// Makes `validate` fail, as if the binary were missing.
    pub fn failing_validation(mut self) -> Self {
        self.fail_validation = true;
        self
    }

    /// Makes `resize` write a small marker file at the destination.
    pub fn creating_outputs(mut self) -> Self {
        self.create_outputs = true;
        self
    }

    /// Adds artificial latency to resizes of `src`.
    pub async fn set_resize_delay(&self, src: impl AsRef<Path>, delay: Duration) {
        self.resize_delays
            .write()
            .await
            .insert(src.as_ref().to_path_buf(), delay);
    }

    /// Adds artificial latency to previews of `path`.
    pub async fn set_preview_delay(&self, path: impl AsRef<Path>, delay: Duration) {
        self.preview_delays
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), delay);
    }

    /// Makes resizes of `src` fail.
    pub async fn fail_resizes_of(&self, src: impl AsRef<Path>) {
        self.failing_resizes
            .write()
            .await
            .push(src.as_ref().to_path_buf());
    }

    /// All invocations, in the order they were made.
    pub async fn recorded_ops(&self) -> Vec<ToolOp> {
        self.ops.read().await.clone()
    }

    /// The previewed paths, in preview order.
    pub async fn preview_order(&self) -> Vec<PathBuf> {
        self.ops
            .read()
            .await
            .iter()
            .filter_map(|op| match op {
                ToolOp::Preview { path } => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    /// The most distinct source files that ever had a resize in
    /// flight at the same time. A proxy for worker concurrency, since
    /// a worker's resizes only run while the worker holds its slot.
    pub async fn max_concurrent_sources(&self) -> usize {
        *self.max_active_sources.read().await
    }

    async fn record(&self, op: ToolOp) {
        self.ops.write().await.push(op);
    }

    async fn enter_resize(&self, src: &Path) {
        let mut active = self.active_sources.write().await;
        *active.entry(src.to_path_buf()).or_insert(0) += 1;
        let mut max = self.max_active_sources.write().await;
        *max = (*max).max(active.len());
    }

    async fn leave_resize(&self, src: &Path) {
        let mut active = self.active_sources.write().await;
        if let Some(count) = active.get_mut(src) {
            *count -= 1;
            if *count == 0 {
                active.remove(src);
            }
        }
    }
}

#[async_trait]
impl ImageTool for MockImageTool {
    fn name(&self) -> &str {
        "mock"
    }

    async fn resize(&self, src: &Path, dest: &Path, percent: u8) -> Result<(), InvokerError> {
        self.enter_resize(src).await;

        let delay = self.resize_delays.read().await.get(src).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.record(ToolOp::Resize {
            src: src.to_path_buf(),
            dest: dest.to_path_buf(),
            percent,
        })
        .await;

        let result = if self.failing_resizes.read().await.iter().any(|p| p == src) {
            Err(InvokerError::command_failed(
                "resize",
                Some(1),
                Some("mock resize failure".to_string()),
            ))
        } else if self.create_outputs {
            let content = format!("resized {}% from {}\n", percent, src.display());
            tokio::fs::write(dest, content).await.map_err(Into::into)
        } else {
            Ok(())
        };

        self.leave_resize(src).await;
        result
    }

    async fn rotate(&self, src: &Path, dest: &Path, rotation: RotationChoice) -> Result<(), InvokerError> {
        self.record(ToolOp::Rotate {
            src: src.to_path_buf(),
            dest: dest.to_path_buf(),
            rotation,
        })
        .await;
        Ok(())
    }

    async fn preview(&self, path: &Path) -> Result<(), InvokerError> {
        let delay = self.preview_delays.read().await.get(path).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.record(ToolOp::Preview {
            path: path.to_path_buf(),
        })
        .await;
        Ok(())
    }

    async fn validate(&self) -> Result<(), InvokerError> {
        if self.fail_validation {
            return Err(InvokerError::MagickNotFound {
                path: PathBuf::from("mock"),
            });
        }
        Ok(())
    }
}
