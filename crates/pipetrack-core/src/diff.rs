//! Diff engine: which task runs appeared between two snapshots.
//!
//! The engine only detects *appearance* of a task-run entry. Completion or
//! failure of a task run is carried by the snapshot entry and left to the
//! caller to render.

use std::collections::{BTreeSet, HashSet};

use crate::run::Run;
use crate::snapshot::StatusSnapshot;

/// Set of pipeline task names to report. Empty means every task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    tasks: BTreeSet<String>,
}

impl TaskFilter {
    /// A filter that matches every task.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from task names. No names means every task.
    pub fn new<I, S>(tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tasks: tasks.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the filter matches every task.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Check whether runs of `task` should be reported.
    pub fn matches(&self, task: &str) -> bool {
        self.tasks.is_empty() || self.tasks.contains(task)
    }

    /// Task names in the filter.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(String::as_str)
    }
}

/// Result of diffing a snapshot against the previous baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Newly-appeared runs that pass the filter, in snapshot order.
    pub new_runs: Vec<Run>,

    /// Every task-run name in the current snapshot; the next baseline.
    pub task_run_names: HashSet<String>,
}

/// Compute the task runs present in `current` but not in `previous`.
///
/// The baseline returned in [`Diff::task_run_names`] covers all entries,
/// including those filtered out of [`Diff::new_runs`].
pub fn diff(previous: &HashSet<String>, current: &StatusSnapshot, filter: &TaskFilter) -> Diff {
    let new_runs = current
        .task_runs()
        .iter()
        .filter(|(name, _)| !previous.contains(name.as_str()))
        .filter(|(_, state)| filter.matches(&state.task))
        .map(|(name, state)| Run::new(name.clone(), state.task.clone()))
        .collect();

    Diff {
        new_runs,
        task_run_names: current.task_runs().keys().cloned().collect(),
    }
}
