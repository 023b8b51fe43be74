//! Types for the invoker module.

use serde::{Deserialize, Serialize};

/// User-selected rotation for a gallery image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationChoice {
    /// Quarter turn clockwise.
    Clockwise,
    /// Quarter turn counter-clockwise.
    CounterClockwise,
    /// Leave the image as it is.
    NoRotation,
}

impl RotationChoice {
    /// Maps a free-text prompt answer to a choice.
    ///
    /// "1" means clockwise, "2" counter-clockwise, anything else
    /// (including an empty or failed read) means no rotation.
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim() {
            "1" => Self::Clockwise,
            "2" => Self::CounterClockwise,
            _ => Self::NoRotation,
        }
    }

    /// Returns the degree argument passed to the image tool.
    pub fn degrees(&self) -> &'static str {
        match self {
            Self::Clockwise => "90",
            Self::CounterClockwise => "-90",
            Self::NoRotation => "0",
        }
    }

    /// Whether this choice actually changes the image.
    pub fn is_rotation(&self) -> bool {
        !matches!(self, Self::NoRotation)
    }
}
