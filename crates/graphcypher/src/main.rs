mod cli;
mod command;
mod command_result;
mod commands;
mod output_utils;
mod schema_files;

use clap::Parser;
pub(crate) use cli::Cli;
pub(crate) use command::RunnableCommand;
pub(crate) use command_result::CommandResult;
use std::process::ExitCode;
use tracing::Level;

const DEFAULT_LOG_LEVEL: Level = Level::INFO;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> ExitCode {
    let mut cli = Cli::parse();
    let (log_level, log_level_warning) = log_level(cli.verbose, std::env::var("LOG_LEVEL").ok());

    // stdout carries command output only.
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();
    log::trace!("Logging level set to `{log_level}`.");
    if let Some(warning) = log_level_warning {
        log::warn!("{warning}");
    }

    let Some(command) = cli.cmd.take() else {
        return match cli.run_default().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{err:#}");
                ExitCode::FAILURE
            },
        };
    };

    let result = command.run(cli).await;
    if let Some(stdout) = result.stdout {
        println!("{stdout}");
    }
    if let Some(stderr) = result.stderr {
        eprintln!("{stderr}");
    }
    result.exit_code
}

/// `--verbose` wins over `LOG_LEVEL`; an unrecognized `LOG_LEVEL` falls back
/// to the default with a warning.
fn log_level(verbose: bool, env_value: Option<String>) -> (Level, Option<String>) {
    if verbose {
        return (Level::DEBUG, None);
    }
    let Some(value) = env_value else {
        return (DEFAULT_LOG_LEVEL, None);
    };
    match value.trim().to_ascii_uppercase().as_str() {
        "DEBUG" | "VERBOSE" => (Level::DEBUG, None),
        "INFO" => (Level::INFO, None),
        "TRACE" => (Level::TRACE, None),
        "WARN" => (Level::WARN, None),
        "ERROR" => (Level::ERROR, None),
        other => (
            DEFAULT_LOG_LEVEL,
            Some(format!("Invalid `LOG_LEVEL` environment variable value: `{other}`")),
        ),
    }
}
