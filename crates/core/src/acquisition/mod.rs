//! Item acquisition through the external fetch tool.
//!
//! The orchestrator checks its preconditions, then tries each stored
//! credential in order until the tool reports success. A timed out or failed
//! attempt moves on to the next credential; a missing tool binary aborts the
//! whole run.

mod orchestrator;
mod tool;
mod types;

pub use orchestrator::AcquisitionOrchestrator;
pub use tool::{DepotDownloaderTool, FetchTool};
pub use types::{AcquisitionOutcome, FetchInvocation, FetchOutput};

use std::path::PathBuf;
use thiserror::Error;

/// Message recorded when an attempt exceeds its time limit.
pub const TIMEOUT_MESSAGE: &str = "Download timed out, trying next account";

/// Message returned when every credential failed without diagnostics.
pub const EXHAUSTED_MESSAGE: &str = "All accounts failed";

/// Errors from a single tool run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The tool binary could not be launched because it does not exist.
    #[error("Fetch tool not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// The attempt exceeded its time limit and was killed.
    #[error("Fetch timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Any other launch or wait failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons an acquisition did not complete. `Display` is the user-facing
/// message.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Invalid item id")]
    InvalidItemId,

    #[error("{tool} not found")]
    ToolMissing { tool: String },

    #[error("{product} folder not found")]
    TargetNotFound { product: String },

    #[error("Failed to create {path}: {source}")]
    TargetDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No accounts configured")]
    NoAccounts,

    /// Every credential was tried; carries the last attempt's message.
    #[error("{last_error}")]
    CredentialsExhausted { last_error: String },
}
