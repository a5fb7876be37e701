//! Pipeline run tracker.
//!
//! Watches a single pipeline run on the cluster and reports, as a stream of
//! batches, the task runs that have newly appeared since the previous
//! change event. Tracking ends once the pipeline run reaches a terminal
//! condition.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use futures_util::StreamExt;
//! use pipetrack_client::HttpClient;
//! use pipetrack_tracker::Tracker;
//!
//! async fn follow() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(HttpClient::new("http://127.0.0.1:8001")?);
//!     let mut batches = Tracker::new("build-1", "ci", client, ["test"]).monitor();
//!
//!     while let Some(batch) = batches.next().await {
//!         for run in batch? {
//!             println!("{} started", run.name);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod convert;
pub mod error;
pub mod tracker;
pub mod watch;

#[cfg(test)]
mod fake;

pub use error::TrackerError;
pub use tracker::{ClosedWatch, RunBatches, Tracker, TrackerOptions};
pub use watch::WatchSource;
