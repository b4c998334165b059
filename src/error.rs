//! Error types for Indirector
//!
//! Library code returns `IndirectorError`; the binary wraps it in `anyhow`
//! and maps it back to a process exit code at the top-level boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Indirector operations
pub type IndirectorResult<T> = Result<T, IndirectorError>;

/// Main error type for Indirector operations
#[derive(Error, Debug)]
pub enum IndirectorError {
    /// The host does not provide what the bootstrap needs
    #[error("environment check failed: {reason}")]
    Environment { reason: String },

    /// An external command exited unsuccessfully
    #[error("command `{command}` failed during '{step}' with exit code {code}")]
    CommandFailed {
        step: String,
        command: String,
        code: i32,
        stderr: String,
    },

    /// An external command could not be started at all
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// `/etc/os-release` is missing a value the Docker repository needs
    #[error("{file} does not define {key}")]
    OsRelease { file: PathBuf, key: String },

    /// No Compose file in the project directory
    #[error("no compose file found in {dir}")]
    ComposeFileMissing { dir: PathBuf },

    /// Compose file could not be parsed
    #[error("invalid compose file {file}: {message}")]
    InvalidComposeFile { file: PathBuf, message: String },

    /// Configuration file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Companion call attempted before a socket is open
    #[error("not connected to the Companion WebSocket bridge")]
    NotConnected,

    /// Companion did not answer in time
    #[error("timeout waiting for response to '{method}'")]
    Timeout { method: String },

    /// Companion answered with an error payload
    #[error("companion rejected '{method}': {message}")]
    Remote { method: String, message: String },

    /// WebSocket transport failure
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Invalid `--watch` pattern or handler regex
    #[error("invalid watch pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl IndirectorError {
    /// Process exit code for this error.
    ///
    /// Command failures propagate the child's own exit code; everything else
    /// is a plain `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            IndirectorError::CommandFailed { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }

    /// True for transport-level failures that warrant a growing reconnect delay.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            IndirectorError::WebSocket(_) | IndirectorError::Io(_) | IndirectorError::NotConnected
        )
    }
}
