//! Interactive prompt seam.
//!
//! The worker asks its two questions (rotation, then caption) at two
//! distinct points of its lifecycle, with page and preview
//! coordination interleaved between them. The trait keeps that
//! request/response shape without tying the worker to a terminal;
//! tests substitute a scripted implementation.

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::warn;

use crate::invoker::RotationChoice;
use crate::task::ImageTask;

/// Answers longer than this are accepted with a warning.
pub const ANSWER_WARN_LEN: usize = 50;

/// Errors raised while collecting user input.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Reading the answer failed.
    #[error("failed to read answer: {0}")]
    Read(#[from] std::io::Error),

    /// The input stream ended before an answer arrived.
    #[error("input stream closed while waiting for an answer")]
    Eof,
}

/// Collects per-image decisions from the user.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Announces that this image's preview is about to open.
    async fn announce_preview(&self, task: &ImageTask);

    /// Asks whether and how to rotate the image.
    async fn ask_rotation(&self, task: &ImageTask) -> Result<RotationChoice, PromptError>;

    /// Asks for the image's caption.
    async fn ask_caption(&self, task: &ImageTask) -> Result<String, PromptError>;
}

/// Line-oriented prompter over the process's stdin/stdout.
pub struct ConsolePrompter {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsolePrompter {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    async fn read_answer(&self) -> Result<String, PromptError> {
        let mut lines = self.lines.lock().await;
        let answer = lines.next_line().await?.ok_or(PromptError::Eof)?;
        if answer.len() > ANSWER_WARN_LEN {
            warn!(
                "answer is {} bytes, longer than the expected {}",
                answer.len(),
                ANSWER_WARN_LEN
            );
        }
        Ok(answer)
    }
}

impl Default for ConsolePrompter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prompter for ConsolePrompter {
    async fn announce_preview(&self, task: &ImageTask) {
        println!("=============== {} ===============", task.source.display());
        println!("Please close the image to continue!");
    }

    async fn ask_rotation(&self, task: &ImageTask) -> Result<RotationChoice, PromptError> {
        println!(
            "Rotate {} clockwise (1), counter-clockwise (2), or not at all (3)?",
            task.source.display()
        );
        let answer = self.read_answer().await?;
        Ok(RotationChoice::from_answer(&answer))
    }

    async fn ask_caption(&self, task: &ImageTask) -> Result<String, PromptError> {
        println!("What's the caption for this photo?");
        self.read_answer().await
    }
}
