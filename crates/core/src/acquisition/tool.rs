//! External fetch tool process runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::types::{FetchInvocation, FetchOutput};
use super::FetchError;

/// Runs the external content fetch tool.
#[async_trait]
pub trait FetchTool: Send + Sync {
    /// File name used in user-facing messages.
    fn name(&self) -> String;

    /// Whether the tool binary is present.
    fn exists(&self) -> bool;

    /// Run one attempt, killing the process when `limit` elapses.
    async fn run(
        &self,
        invocation: &FetchInvocation,
        limit: Duration,
    ) -> Result<FetchOutput, FetchError>;
}

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Process-backed `FetchTool` for the depot downloader binary.
#[derive(Debug, Clone)]
pub struct DepotDownloaderTool {
    path: PathBuf,
}

impl DepotDownloaderTool {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn command(&self, invocation: &FetchInvocation) -> Command {
        let mut command = Command::new(&self.path);
        command
            .args(invocation.to_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // The tool looks up its own data files relative to the working dir
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            command.current_dir(dir);
        }

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        command
    }
}

#[async_trait]
impl FetchTool for DepotDownloaderTool {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    async fn run(
        &self,
        invocation: &FetchInvocation,
        limit: Duration,
    ) -> Result<FetchOutput, FetchError> {
        debug!(?invocation, "Starting {}", self.path.display());

        let child = self.command(invocation).spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::ToolNotFound {
                    path: self.path.clone(),
                }
            } else {
                FetchError::Io(e)
            }
        })?;

        // Dropping the child on timeout kills it
        match timeout(limit, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(FetchOutput {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            }),
            Ok(Err(e)) => Err(FetchError::Io(e)),
            Err(_) => Err(FetchError::Timeout {
                timeout_secs: limit.as_secs(),
            }),
        }
    }
}
