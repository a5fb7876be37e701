//! Pipetrack CLI - follow pipeline runs and list task runs on a cluster.

mod commands;
mod config;
mod format;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use commands::OutputFormat;
use config::Config;

/// Pipetrack CLI - pipeline run tracking tool
#[derive(Parser)]
#[command(name = "pipetrack")]
#[command(about = "Track pipeline runs and their task runs", long_about = None)]
struct Cli {
    /// Cluster API server address [env: PIPETRACK_SERVER]
    #[arg(short, long, global = true)]
    server: Option<String>,

    /// Namespace of the resources [env: PIPETRACK_NAMESPACE]
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pipeline run commands
    #[command(name = "pipelinerun", visible_alias = "pr")]
    PipelineRun {
        #[command(subcommand)]
        command: PipelineRunCommands,
    },

    /// Task run commands
    #[command(name = "taskrun", visible_alias = "tr")]
    TaskRun {
        #[command(subcommand)]
        command: TaskRunCommands,
    },
}

#[derive(Subcommand)]
enum PipelineRunCommands {
    /// Print task runs of a pipeline run as they start
    Track {
        /// Pipeline run name
        name: String,

        /// Only report runs of this pipeline task (repeatable)
        #[arg(short = 't', long = "task", value_parser = parse_task_name)]
        tasks: Vec<String>,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },
}

#[derive(Subcommand)]
enum TaskRunCommands {
    /// List task runs, newest first
    #[command(visible_alias = "ls")]
    List {
        /// Only list runs of this task
        task: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },
}

fn parse_task_name(value: &str) -> Result<String, String> {
    let name = value.trim();
    if name.is_empty() {
        return Err("task name must not be blank".to_string());
    }
    Ok(name.to_string())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::INFO } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_env().with_overrides(cli.server, cli.namespace);

    match cli.command {
        Commands::PipelineRun {
            command:
                PipelineRunCommands::Track {
                    name,
                    tasks,
                    timeout,
                    output,
                },
        } => {
            commands::track::execute(&config, name, tasks, timeout, output).await?;
        }
        Commands::TaskRun {
            command: TaskRunCommands::List { task, output },
        } => {
            commands::list::execute(&config, task, output).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_track() {
        let cli = Cli::parse_from([
            "pipetrack", "pr", "track", "build-1", "-t", "test", "--task", "lint", "-n", "ci",
        ]);

        assert_eq!(cli.namespace.as_deref(), Some("ci"));
        match cli.command {
            Commands::PipelineRun {
                command: PipelineRunCommands::Track { name, tasks, timeout, output },
            } => {
                assert_eq!(name, "build-1");
                assert_eq!(tasks, ["test", "lint"]);
                assert_eq!(timeout, None);
                assert_eq!(output, OutputFormat::Table);
            }
            _ => panic!("expected track"),
        }
    }

    #[test]
    fn test_blank_task_is_rejected() {
        let result = Cli::try_parse_from(["pipetrack", "pr", "track", "build-1", "-t", ""]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::parse_from(["pipetrack", "taskrun", "ls", "build", "-o", "json"]);

        match cli.command {
            Commands::TaskRun {
                command: TaskRunCommands::List { task, output },
            } => {
                assert_eq!(task.as_deref(), Some("build"));
                assert_eq!(output, OutputFormat::Json);
            }
            _ => panic!("expected list"),
        }
    }
}
