//! pipetrack Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - The async runtime
//!
//! It describes a pipeline run as seen at one point in time and the diff
//! engine that turns two consecutive views into newly-appeared task runs.

pub mod diff;
pub mod error;
pub mod run;
pub mod snapshot;
pub mod status;

// Re-export commonly used types
pub use diff::{diff, Diff, TaskFilter};
pub use error::CoreError;
pub use run::Run;
pub use snapshot::{StatusSnapshot, TaskRunState};
pub use status::Condition;
