//! Error types for llmkube operations.
//!
//! This module defines [`LlmkubeError`], the error type returned by CLI
//! commands, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `LlmkubeError` for errors a command reports to the user
//! - Use `anyhow::Error` (via `LlmkubeError::Other`) inside update internals
//! - The pre-command update check never produces an error at all

use thiserror::Error;

/// Core error type for llmkube operations.
#[derive(Debug, Error)]
pub enum LlmkubeError {
    /// The release feed could not be queried.
    #[error("Failed to check for updates: {message}")]
    UpdateCheckFailed { message: String },

    /// Output could not be serialized.
    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for llmkube operations.
pub type Result<T> = std::result::Result<T, LlmkubeError>;
