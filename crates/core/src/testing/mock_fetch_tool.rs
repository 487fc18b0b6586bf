//! Mock fetch tool for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::acquisition::{FetchInvocation, FetchOutput, FetchTool};
use crate::acquisition::FetchError;

/// Scripted result of one tool run.
#[derive(Debug, Clone)]
pub enum ScriptedRun {
    /// Process ran and exited.
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// Attempt exceeded its time limit.
    Timeout,
    /// Binary disappeared between the existence check and launch.
    NotFound,
    /// Launch failed for another reason.
    LaunchError(String),
}

impl ScriptedRun {
    pub fn exit(code: i32, stdout: &str, stderr: &str) -> Self {
        ScriptedRun::Exit {
            code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }
}

/// Mock implementation of the FetchTool trait.
///
/// Runs pop scripted results in order; once the script is empty every run
/// exits with code 0. Invocations are recorded, and successful runs drop a
/// marker file into the target directory like a real download would.
#[derive(Debug, Clone)]
pub struct MockFetchTool {
    name: String,
    exists: bool,
    script: Arc<RwLock<VecDeque<ScriptedRun>>>,
    invocations: Arc<RwLock<Vec<FetchInvocation>>>,
}

impl Default for MockFetchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetchTool {
    /// A present tool named like the real one.
    pub fn new() -> Self {
        Self {
            name: "DepotDownloaderMod.exe".to_string(),
            exists: true,
            script: Arc::new(RwLock::new(VecDeque::new())),
            invocations: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// A tool whose binary is absent.
    pub fn missing() -> Self {
        Self {
            exists: false,
            ..Self::new()
        }
    }

    /// Queue the result of the next unscripted run.
    pub async fn push(&self, run: ScriptedRun) {
        self.script.write().await.push_back(run);
    }

    /// Every invocation so far, in order.
    pub async fn invocations(&self) -> Vec<FetchInvocation> {
        self.invocations.read().await.clone()
    }
}

#[async_trait]
impl FetchTool for MockFetchTool {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn exists(&self) -> bool {
        self.exists
    }

    async fn run(
        &self,
        invocation: &FetchInvocation,
        limit: Duration,
    ) -> Result<FetchOutput, FetchError> {
        self.invocations.write().await.push(invocation.clone());

        let run = self
            .script
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| ScriptedRun::exit(0, "", ""));

        match run {
            ScriptedRun::Exit {
                code,
                stdout,
                stderr,
            } => {
                if code == 0 {
                    tokio::fs::write(invocation.target_dir.join("project.json"), b"{}").await?;
                }
                Ok(FetchOutput {
                    exit_code: Some(code),
                    stdout,
                    stderr,
                })
            }
            ScriptedRun::Timeout => Err(FetchError::Timeout {
                timeout_secs: limit.as_secs(),
            }),
            ScriptedRun::NotFound => Err(FetchError::ToolNotFound {
                path: self.name.clone().into(),
            }),
            ScriptedRun::LaunchError(message) => Err(FetchError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                message,
            ))),
        }
    }
}
