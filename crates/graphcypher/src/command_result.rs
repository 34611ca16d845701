use crate::output_utils::RED_X;
use std::process::ExitCode;

/// What a command prints and the status it exits with.
#[derive(Debug)]
pub(crate) struct CommandResult {
    pub exit_code: ExitCode,
    pub stderr: Option<String>,
    pub stdout: Option<String>,
}

impl CommandResult {
    pub fn success(output: String) -> Self {
        Self {
            exit_code: ExitCode::SUCCESS,
            stderr: None,
            stdout: Some(output),
        }
    }

    /// Reports the whole error chain on stderr.
    pub fn failure(err: anyhow::Error) -> Self {
        Self {
            exit_code: ExitCode::FAILURE,
            stderr: Some(format!("{RED_X} {err:#}")),
            stdout: None,
        }
    }
}

impl From<anyhow::Result<String>> for CommandResult {
    fn from(result: anyhow::Result<String>) -> Self {
        match result {
            Ok(output) => Self::success(output),
            Err(err) => Self::failure(err),
        }
    }
}
