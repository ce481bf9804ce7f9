//! Error taxonomy, constants, persisted JSON schemas, and small shared
//! utilities (logging progress, canonical time formatting) used by every
//! other crate in the mosaic-selection workspace.

pub mod constants;
pub mod error;
pub mod progress;
pub mod schema;
pub mod time_util;

pub use error::{PipelineError, Result};
