//! Error types for assembling and running pipelines.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the assembler, runners and configuration loading.
#[derive(Debug, Error)]
pub enum SurroundError {
    /// The validator rejected the input state.
    #[error("validation failed in '{stage}': {reason}")]
    Validation { stage: String, reason: String },

    /// A filter, estimator, visualiser or finaliser failed while running.
    #[error("stage '{stage}' failed: {reason}")]
    Stage { stage: String, reason: String },

    /// A stage failed during `initialise`.
    #[error("failed to initialise stage '{stage}': {reason}")]
    Initialise { stage: String, reason: String },

    /// The assembler was run without an estimator.
    #[error("assembler '{0}' has no estimator")]
    MissingEstimator(String),

    /// No runner is registered under the requested name.
    #[error("unknown runner '{name}' (registered: {})", available.join(", "))]
    UnknownRunner { name: String, available: Vec<String> },

    /// A configuration file could not be read or parsed.
    #[error("invalid config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SurroundError>;

impl SurroundError {
    pub(crate) fn stage(stage: &str, err: anyhow::Error) -> Self {
        SurroundError::Stage {
            stage: stage.to_string(),
            reason: format!("{err:#}"),
        }
    }
}
