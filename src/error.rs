//! Pipeline error types

use thiserror::Error;

/// Errors raised while building or running a pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid name, registration argument or pipeline definition
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The initial state was rejected by its own validation hook
    #[error("Invalid state: {source}")]
    InvalidState {
        #[source]
        source: anyhow::Error,
    },

    /// A step returned an error; the step's error is kept as the source
    #[error("Step '{step_name}' failed at position {index}: {source}")]
    StepFailed {
        step_name: String,
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to read pipeline config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse pipeline config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl PipelineError {
    /// Shorthand for a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        PipelineError::Configuration(message.into())
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, PipelineError::Configuration(_))
    }

    /// The name of the step that failed, if this is a step failure
    pub fn failed_step(&self) -> Option<&str> {
        match self {
            PipelineError::StepFailed { step_name, .. } => Some(step_name),
            _ => None,
        }
    }

    /// The original error raised by a step
    pub fn step_error(&self) -> Option<&anyhow::Error> {
        match self {
            PipelineError::StepFailed { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Take back the original error raised by a step
    pub fn into_step_error(self) -> Option<anyhow::Error> {
        match self {
            PipelineError::StepFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
