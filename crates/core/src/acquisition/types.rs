//! Types for acquisition runs.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::credentials::Credential;

/// Result of one `acquire` call, returned to the caller as-is.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AcquisitionOutcome {
    pub success: bool,
    pub message: String,
    pub path: Option<PathBuf>,
}

impl AcquisitionOutcome {
    pub fn completed(path: PathBuf) -> Self {
        Self {
            success: true,
            message: "Download complete".to_string(),
            path: Some(path),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            path: None,
        }
    }
}

/// Arguments for a single fetch tool run.
#[derive(Clone)]
pub struct FetchInvocation {
    pub app_id: String,
    pub item_id: String,
    pub credential: Credential,
    pub verify_all: bool,
    pub target_dir: PathBuf,
}

impl FetchInvocation {
    /// Command line arguments in the order the tool documents them.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "-app".to_string(),
            self.app_id.clone(),
            "-pubfile".to_string(),
            self.item_id.clone(),
            "-username".to_string(),
            self.credential.username().to_string(),
            "-password".to_string(),
            self.credential.secret().to_string(),
        ];

        if self.verify_all {
            args.push("-verify-all".to_string());
        }

        args.extend([
            "-dir".to_string(),
            self.target_dir.to_string_lossy().to_string(),
        ]);

        args
    }
}

impl fmt::Debug for FetchInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchInvocation")
            .field("app_id", &self.app_id)
            .field("item_id", &self.item_id)
            .field("username", &self.credential.username())
            .field("verify_all", &self.verify_all)
            .field("target_dir", &self.target_dir)
            .finish()
    }
}

/// Captured output of a finished tool process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl FetchOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Diagnostic text for a failed run: stderr, else stdout, else a generic
    /// message.
    pub fn failure_message(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        "Download failed".to_string()
    }
}
