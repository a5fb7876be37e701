//! Run record reported by the tracker.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One task execution belonging to a pipeline run.
///
/// Runs are values: new information about the same task run is reported by
/// emitting a fresh `Run`, never by mutating one already handed out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Run {
    /// Name of the task-run resource, unique within the pipeline run.
    pub name: String,

    /// Pipeline task this run executes.
    pub task: String,
}

impl Run {
    /// Create a new Run.
    pub fn new(name: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            task: task.into(),
        }
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.task)
    }
}
