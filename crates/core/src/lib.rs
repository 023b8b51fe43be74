//! Core library for the interactive album builder.
//!
//! Turns a list of image files into a static gallery page, producing a
//! thumbnail and a medium-size rendition of each image with an
//! external ImageMagick binary, while prompting the user for a
//! rotation and a caption per image. Image processing runs
//! concurrently; everything the user sees (page entries, previews,
//! prompts) happens strictly in input order.

pub mod admission;
pub mod config;
pub mod invoker;
pub mod ordering;
pub mod page;
pub mod preflight;
pub mod prompt;
pub mod runner;
pub mod task;
pub mod testing;
pub mod worker;

pub use config::{load_config, load_config_from_str, validate_config, AlbumSettings, Config, ConfigError};
pub use invoker::{ImageTool, InvokerConfig, InvokerError, MagickTool, RotationChoice};
pub use prompt::{ConsolePrompter, Prompter};
pub use runner::{AlbumRunner, AlbumSummary, RunnerError};
pub use task::ImageTask;
