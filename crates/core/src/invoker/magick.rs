//! ImageMagick-based tool implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStderr, Command};
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::config::InvokerConfig;
use super::error::InvokerError;
use super::traits::ImageTool;
use super::types::RotationChoice;

/// Invoker that shells out to the `magick` binary.
pub struct MagickTool {
    config: InvokerConfig,
}

impl MagickTool {
    /// Creates a new invoker with the given configuration.
    pub fn new(config: InvokerConfig) -> Self {
        Self { config }
    }

    /// Creates an invoker with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(InvokerConfig::default())
    }

    /// Builds magick arguments for a percentage resize.
    fn build_resize_args(src: &Path, dest: &Path, percent: u8) -> Vec<String> {
        vec![
            "convert".to_string(),
            "-resize".to_string(),
            format!("{}%", percent),
            src.to_string_lossy().to_string(),
            dest.to_string_lossy().to_string(),
        ]
    }

    /// Builds magick arguments for a quarter-turn rotate.
    fn build_rotate_args(src: &Path, dest: &Path, rotation: RotationChoice) -> Vec<String> {
        vec![
            "convert".to_string(),
            "-rotate".to_string(),
            rotation.degrees().to_string(),
            src.to_string_lossy().to_string(),
            dest.to_string_lossy().to_string(),
        ]
    }

    fn map_spawn_error(&self, e: std::io::Error) -> InvokerError {
        if e.kind() == std::io::ErrorKind::NotFound {
            InvokerError::MagickNotFound {
                path: self.config.magick_path.clone(),
            }
        } else {
            InvokerError::Io(e)
        }
    }

    async fn collect(
        child: &mut Child,
        stderr: &mut Option<ChildStderr>,
    ) -> std::io::Result<(std::process::ExitStatus, String)> {
        let mut output = String::new();
        if let Some(pipe) = stderr {
            let _ = pipe.read_to_string(&mut output).await;
        }
        let status = child.wait().await?;
        Ok((status, output))
    }

    /// Runs a non-interactive operation, capturing stderr.
    async fn run_captured(&self, operation: &str, args: &[String]) -> Result<(), InvokerError> {
        debug!(operation, ?args, "invoking magick");

        let mut child = Command::new(&self.config.magick_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.map_spawn_error(e))?;

        let mut stderr_pipe = child.stderr.take();
        let timeout_secs = self.config.timeout_secs;

        let result = timeout(
            Duration::from_secs(timeout_secs),
            Self::collect(&mut child, &mut stderr_pipe),
        )
        .await;

        match result {
            Ok(Ok((status, stderr))) => {
                if status.success() {
                    Ok(())
                } else {
                    Err(InvokerError::command_failed(
                        operation,
                        status.code(),
                        if stderr.is_empty() {
                            None
                        } else {
                            Some(stderr)
                        },
                    ))
                }
            }
            Ok(Err(e)) => Err(InvokerError::Io(e)),
            Err(_) => {
                let _ = child.kill().await;
                Err(InvokerError::Timeout {
                    operation: operation.to_string(),
                    timeout_secs,
                })
            }
        }
    }
}

#[async_trait]
impl ImageTool for MagickTool {
    fn name(&self) -> &str {
        "magick"
    }

    async fn resize(&self, src: &Path, dest: &Path, percent: u8) -> Result<(), InvokerError> {
        let args = Self::build_resize_args(src, dest, percent);
        self.run_captured("resize", &args).await
    }

    async fn rotate(
        &self,
        src: &Path,
        dest: &Path,
        rotation: RotationChoice,
    ) -> Result<(), InvokerError> {
        let args = Self::build_rotate_args(src, dest, rotation);
        self.run_captured("rotate", &args).await
    }

    async fn preview(&self, path: &Path) -> Result<(), InvokerError> {
        debug!(?path, "invoking magick display");

        // The viewer is interactive; inherit stdio and wait with no
        // timeout. The run resumes when the user closes the window.
        let status = Command::new(&self.config.magick_path)
            .arg("display")
            .arg(path)
            .status()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if status.success() {
            Ok(())
        } else {
            Err(InvokerError::command_failed(
                "display",
                status.code(),
                None,
            ))
        }
    }

    async fn validate(&self) -> Result<(), InvokerError> {
        let result = Command::new(&self.config.magick_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => Err(self.map_spawn_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_resize_args() {
        let args = MagickTool::build_resize_args(
            Path::new("photo.jpg"),
            Path::new("thumb_photo.jpg"),
            10,
        );
        assert_eq!(
            args,
            vec!["convert", "-resize", "10%", "photo.jpg", "thumb_photo.jpg"]
        );
    }

    #[test]
    fn test_build_rotate_args_clockwise() {
        let args = MagickTool::build_rotate_args(
            Path::new("thumb_photo.jpg"),
            Path::new("thumb_photo.jpg"),
            RotationChoice::Clockwise,
        );
        assert_eq!(
            args,
            vec![
                "convert",
                "-rotate",
                "90",
                "thumb_photo.jpg",
                "thumb_photo.jpg"
            ]
        );
    }

    #[test]
    fn test_build_rotate_args_counter_clockwise() {
        let args = MagickTool::build_rotate_args(
            Path::new("med_photo.png"),
            Path::new("med_photo.png"),
            RotationChoice::CounterClockwise,
        );
        assert!(args.contains(&"-rotate".to_string()));
        assert!(args.contains(&"-90".to_string()));
    }

    #[tokio::test]
    async fn test_missing_binary_maps_to_not_found() {
        let tool = MagickTool::new(InvokerConfig::with_path(
            "/nonexistent/definitely-not-magick".into(),
        ));
        let err = tool
            .resize(Path::new("a.jpg"), Path::new("b.jpg"), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, InvokerError::MagickNotFound { .. }));
    }
}
