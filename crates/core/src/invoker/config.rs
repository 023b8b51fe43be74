//! Configuration for the invoker module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the ImageMagick-backed invoker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokerConfig {
    /// Path to the magick binary.
    #[serde(default = "default_magick_path")]
    pub magick_path: PathBuf,

    /// Timeout for a single resize/rotate invocation in seconds.
    ///
    /// Previews are exempt: they block until the user closes the
    /// viewer, for however long that takes.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_magick_path() -> PathBuf {
    PathBuf::from("magick")
}

fn default_timeout() -> u64 {
    300
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            magick_path: default_magick_path(),
            timeout_secs: default_timeout(),
        }
    }
}

impl InvokerConfig {
    /// Creates a config with a custom magick path.
    pub fn with_path(magick_path: PathBuf) -> Self {
        Self {
            magick_path,
            ..Default::default()
        }
    }

    /// Sets the per-operation timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
