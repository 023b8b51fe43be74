//! External image-tool boundary.
//!
//! Every pixel operation (resize, rotate, on-screen preview) is
//! delegated to an external utility invoked once per operation. This
//! module owns only the process boundary: building argument vectors,
//! spawning, and collecting exit status.

mod config;
mod error;
mod magick;
mod traits;
mod types;

pub use config::InvokerConfig;
pub use error::InvokerError;
pub use magick::MagickTool;
pub use traits::ImageTool;
pub use types::RotationChoice;
