//! Core domain errors.

use thiserror::Error;

/// Core domain errors for pipetrack.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A required field was absent from a task-run entry.
    #[error("task run '{task_run}' is missing field '{field}'")]
    MissingField { task_run: String, field: &'static str },

    /// Condition status string outside of True/False/Unknown.
    #[error("Invalid condition status: {0}")]
    InvalidCondition(String),
}
