//! Testing utilities and mock implementations.
//!
//! Mocks for the two interaction seams of an album run, the external
//! image tool and the console prompter, so the full worker lifecycle
//! can be exercised without ImageMagick or a terminal.
//!
//! # Example
//!
//! ```rust,ignore
//! use album_core::testing::{MockImageTool, ScriptedPrompter};
//!
//! let tool = MockImageTool::new().creating_outputs();
//! let prompter = ScriptedPrompter::new(
//!     vec![RotationChoice::Clockwise],
//!     vec!["beach".to_string()],
//! );
//!
//! // Run the album, then assert on what happened:
//! let ops = tool.recorded_ops().await;
//! let events = prompter.recorded_events().await;
//! ```

mod mock_tool;
mod scripted_prompter;

pub use mock_tool::{MockImageTool, ToolOp};
pub use scripted_prompter::{PromptEvent, ScriptedPrompter};
