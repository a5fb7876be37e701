//! Track command - report task runs of a pipeline run as they appear.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tracing::info;

use pipetrack_client::HttpClient;
use pipetrack_tracker::{RunBatches, Tracker};

use super::{CommandResult, OutputFormat};
use crate::config::Config;

/// Execute the track command.
pub async fn execute(
    config: &Config,
    name: String,
    tasks: Vec<String>,
    timeout_secs: Option<u64>,
    output: OutputFormat,
) -> CommandResult {
    let client = Arc::new(HttpClient::new(&config.server)?);
    let tracker = Tracker::new(name, config.namespace.as_str(), client, tasks);
    info!(
        pipeline_run = %tracker.name(),
        namespace = %tracker.namespace(),
        "Tracking pipeline run"
    );

    let batches = tracker.monitor();
    let mut stdout = io::stdout();
    let follow = print_batches(batches, output, &mut stdout);

    let count = match timeout_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), follow)
            .await
            .map_err(|_| format!("timed out after {}s", secs))??,
        None => follow.await?,
    };

    info!(task_runs = count, "Pipeline run tracking finished");
    Ok(())
}

/// Print every run of every batch, returning how many runs were printed.
pub async fn print_batches<W: Write>(
    mut batches: RunBatches,
    output: OutputFormat,
    out: &mut W,
) -> CommandResult<usize> {
    let mut count = 0;

    if output == OutputFormat::Table {
        writeln!(out, "{:<40}  {}", "NAME", "TASK")?;
    }

    while let Some(batch) = batches.next().await {
        for run in batch? {
            match output {
                OutputFormat::Table => writeln!(out, "{:<40}  {}", run.name, run.task)?,
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&run)?)?,
            }
            count += 1;
        }
        out.flush()?;
    }

    Ok(count)
}
