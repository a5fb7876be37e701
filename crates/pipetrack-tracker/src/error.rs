//! Tracker errors.

use thiserror::Error;

use pipetrack_client::ClientError;

/// Errors produced while tracking a pipeline run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerError {
    /// The watch could not be established or was lost before the pipeline
    /// run finished. Ends the run batch stream.
    #[error("watch connection failed: {0}")]
    Connection(String),

    /// A single watch event could not be turned into a snapshot. Skipped by
    /// the watch source, never surfaced to `monitor` consumers.
    #[error("malformed watch event: {0}")]
    MalformedEvent(String),
}

impl From<ClientError> for TrackerError {
    fn from(e: ClientError) -> Self {
        if e.is_malformed() {
            Self::MalformedEvent(e.to_string())
        } else {
            Self::Connection(e.to_string())
        }
    }
}
