//! List command - show task runs in a namespace.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use tracing::debug;

use pipetrack_client::{HttpClient, TaskRunList, TaskRunLister};
use pipetrack_tracker::convert::condition_of;

use super::{CommandResult, OutputFormat};
use crate::config::Config;
use crate::format::{format_age, format_condition, format_duration, write_table};

const HEADER: [&str; 4] = ["NAME", "STARTED", "DURATION", "STATUS"];

/// Execute the list command.
pub async fn execute(config: &Config, task: Option<String>, output: OutputFormat) -> CommandResult {
    let client = HttpClient::new(&config.server)?;
    let list = client
        .list_task_runs(&config.namespace, task.as_deref())
        .await?;
    debug!(count = list.items.len(), namespace = %config.namespace, "Listed task runs");

    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
        OutputFormat::Table => {
            write_task_runs(&mut io::stdout(), &mut io::stderr(), &list, Utc::now())?;
        }
    }

    Ok(())
}

/// Write task runs as a table, or a notice on `err` when there are none.
pub fn write_task_runs<W: Write, E: Write>(
    out: &mut W,
    err: &mut E,
    list: &TaskRunList,
    now: DateTime<Utc>,
) -> io::Result<()> {
    if list.items.is_empty() {
        return writeln!(err, "No taskruns found");
    }

    let rows: Vec<Vec<String>> = list
        .items
        .iter()
        .map(|tr| {
            let (condition, reason) = condition_of(&tr.status.conditions);
            vec![
                tr.metadata.name.clone(),
                format_age(now, tr.status.start_time),
                format_duration(tr.status.start_time, tr.status.completion_time),
                format_condition(condition, reason.as_deref()),
            ]
        })
        .collect();

    write_table(out, &HEADER, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list(value: serde_json::Value) -> TaskRunList {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_list_reports_on_stderr() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        write_task_runs(&mut out, &mut err, &TaskRunList::default(), Utc::now()).unwrap();

        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap(), "No taskruns found\n");
    }

    #[test]
    fn test_table_rows() {
        let now: DateTime<Utc> = "2019-06-01T12:10:00Z".parse().unwrap();
        let list = list(json!({
            "items": [
                {
                    "metadata": { "name": "pr1-build" },
                    "status": {
                        "startTime": "2019-06-01T12:00:00Z",
                        "completionTime": "2019-06-01T12:01:30Z",
                        "conditions": [
                            { "type": "Succeeded", "status": "True", "reason": "Succeeded" }
                        ]
                    }
                },
                {
                    "metadata": { "name": "pr1-test" },
                    "status": {
                        "startTime": "2019-06-01T12:08:00Z",
                        "conditions": [
                            { "type": "Succeeded", "status": "Unknown", "reason": "Running" }
                        ]
                    }
                },
                { "metadata": { "name": "pr1-lint" } }
            ]
        }));

        let mut out = Vec::new();
        let mut err = Vec::new();
        write_task_runs(&mut out, &mut err, &list, now).unwrap();

        assert!(err.is_empty());
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("NAME"));

        let build: Vec<&str> = lines[1].split_whitespace().collect();
        assert_eq!(build, ["pr1-build", "10m", "ago", "1m", "30s", "Succeeded"]);

        let test: Vec<&str> = lines[2].split_whitespace().collect();
        assert_eq!(test, ["pr1-test", "2m", "ago", "---", "Running"]);

        let lint: Vec<&str> = lines[3].split_whitespace().collect();
        assert_eq!(lint, ["pr1-lint", "---", "---", "Running"]);
    }
}
