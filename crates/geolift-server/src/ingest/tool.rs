//! Subprocess runner for the external tools the pipeline shells out to
//! (`unzip`, `ogr2ogr`). Captures both output streams and optionally
//! enforces a hard deadline, killing the child when it expires.

use std::ffi::OsStr;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

/// Captured output of a tool run that exited successfully
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Both streams joined for diagnostics; tools like ogr2ogr split
    /// progress and warnings across them.
    pub fn combined(&self) -> String {
        match (self.stdout.trim(), self.stderr.trim()) {
            ("", "") => String::new(),
            (out, "") => out.to_string(),
            ("", err) => err.to_string(),
            (out, err) => format!("{out}\n{err}"),
        }
    }
}

/// Ways a tool invocation can fail
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stdout: String,
        stderr: String,
    },

    #[error("{program} did not finish within {timeout_secs}s")]
    TimedOut { program: String, timeout_secs: u64 },
}

impl ToolError {
    /// Error message with the tool's own output appended when there is any.
    pub fn diagnostics(&self) -> String {
        match self {
            ToolError::Failed { stdout, stderr, .. } => {
                let detail = if stderr.trim().is_empty() {
                    stdout.trim()
                } else {
                    stderr.trim()
                };
                if detail.is_empty() {
                    self.to_string()
                } else {
                    format!("{self}: {detail}")
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Run `program` with `args`, waiting at most `deadline` when one is given.
///
/// The child is spawned with `kill_on_drop`, so when the deadline elapses
/// and the wait future is dropped the process is killed rather than left
/// running against a half-staged upload.
pub async fn run_tool<I, S>(
    program: &str,
    args: I,
    deadline: Option<Duration>,
) -> Result<ToolOutput, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let waited = match deadline {
        Some(limit) => match tokio::time::timeout(limit, command.output()).await {
            Ok(result) => result,
            Err(_) => {
                return Err(ToolError::TimedOut {
                    program: program.to_string(),
                    timeout_secs: limit.as_secs(),
                })
            }
        },
        None => command.output().await,
    };

    let output = waited.map_err(|source| ToolError::Spawn {
        program: program.to_string(),
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if output.status.success() {
        Ok(ToolOutput { stdout, stderr })
    } else {
        Err(ToolError::Failed {
            program: program.to_string(),
            status: output.status,
            stdout,
            stderr,
        })
    }
}
