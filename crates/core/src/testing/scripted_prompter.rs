//! Scripted prompter for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::invoker::RotationChoice;
use crate::prompt::{PromptError, Prompter};
use crate::task::ImageTask;

/// One recorded prompt interaction, in call order, tagged with the
/// image index it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    Announce(u64),
    Rotation(u64),
    Caption(u64),
}

impl PromptEvent {
    pub fn index(&self) -> u64 {
        match self {
            Self::Announce(i) | Self::Rotation(i) | Self::Caption(i) => *i,
        }
    }
}

/// Prompter that plays back pre-scripted answers.
///
/// Rotation answers and captions are consumed in call order; when a
/// script runs out, the remaining answers are `NoRotation` and the
/// empty caption. Every interaction is recorded, so tests can assert
/// that the interactive phases ran one image at a time and in input
/// order.
pub struct ScriptedPrompter {
    rotations: Arc<RwLock<VecDeque<RotationChoice>>>,
    captions: Arc<RwLock<VecDeque<String>>>,
    events: Arc<RwLock<Vec<PromptEvent>>>,
    answer_delay: Arc<RwLock<Duration>>,
    fail_captions: Arc<RwLock<bool>>,
}

impl ScriptedPrompter {
    pub fn new(rotations: Vec<RotationChoice>, captions: Vec<String>) -> Self {
        Self {
            rotations: Arc::new(RwLock::new(rotations.into())),
            captions: Arc::new(RwLock::new(captions.into())),
            events: Arc::new(RwLock::new(Vec::new())),
            answer_delay: Arc::new(RwLock::new(Duration::ZERO)),
            fail_captions: Arc::new(RwLock::new(false)),
        }
    }

    /// A prompter that answers "no rotation" and captions each image
    /// `caption <index>`.
    pub fn answering_defaults() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Simulates a slow user: every answer takes `delay` to arrive.
    pub async fn set_answer_delay(&self, delay: Duration) {
        *self.answer_delay.write().await = delay;
    }

    /// Makes every caption prompt fail, as if stdin closed.
    pub async fn fail_captions(&self) {
        *self.fail_captions.write().await = true;
    }

    /// Every interaction, in the order it happened.
    pub async fn recorded_events(&self) -> Vec<PromptEvent> {
        self.events.read().await.clone()
    }

    async fn record(&self, event: PromptEvent) {
        self.events.write().await.push(event);
    }

    async fn simulate_thinking(&self) {
        let delay = *self.answer_delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn announce_preview(&self, task: &ImageTask) {
        self.record(PromptEvent::Announce(task.index)).await;
    }

    async fn ask_rotation(&self, task: &ImageTask) -> Result<RotationChoice, PromptError> {
        self.simulate_thinking().await;
        self.record(PromptEvent::Rotation(task.index)).await;
        Ok(self
            .rotations
            .write()
            .await
            .pop_front()
            .unwrap_or(RotationChoice::NoRotation))
    }

    async fn ask_caption(&self, task: &ImageTask) -> Result<String, PromptError> {
        self.simulate_thinking().await;
        self.record(PromptEvent::Caption(task.index)).await;

        if *self.fail_captions.read().await {
            return Err(PromptError::Eof);
        }

        Ok(self
            .captions
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| format!("caption {}", task.index)))
    }
}
