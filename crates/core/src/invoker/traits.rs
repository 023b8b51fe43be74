//! Trait definitions for the invoker module.

use async_trait::async_trait;
use std::path::Path;

use super::error::InvokerError;
use super::types::RotationChoice;

/// An external tool that performs per-image operations.
///
/// Implementations spawn one subordinate process per operation and
/// resolve when it terminates. Callers that want several operations
/// in flight at once spawn the futures onto the runtime themselves.
#[async_trait]
pub trait ImageTool: Send + Sync {
    /// Returns the name of this tool implementation.
    fn name(&self) -> &str;

    /// Resizes `src` to `percent` of its size, writing `dest`.
    async fn resize(&self, src: &Path, dest: &Path, percent: u8) -> Result<(), InvokerError>;

    /// Rotates `src` by a quarter turn, writing `dest`.
    ///
    /// `src` and `dest` may be the same path for an in-place rotate.
    /// `RotationChoice::NoRotation` still runs the tool with a zero
    /// angle; callers normally skip the call instead.
    async fn rotate(
        &self,
        src: &Path,
        dest: &Path,
        rotation: RotationChoice,
    ) -> Result<(), InvokerError>;

    /// Displays `path` on screen, blocking until the viewer closes.
    async fn preview(&self, path: &Path) -> Result<(), InvokerError>;

    /// Validates that the tool is available and runnable.
    async fn validate(&self) -> Result<(), InvokerError>;
}
