//! Cluster client library for pipetrack.
//!
//! Provides the HTTP client and the narrow traits the tracker and the CLI use
//! to watch pipeline runs and list task runs.

pub mod cluster;
pub mod error;
pub mod http;
pub mod resource;

pub use cluster::{PipelineRunWatcher, TaskRunLister};
pub use error::ClientError;
pub use http::{HttpClient, WatchEvents};
pub use resource::{PipelineRun, TaskRun, TaskRunList, WatchEvent, WatchEventType};
