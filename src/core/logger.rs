//! Step-scoped logging handle

use std::fmt::Display;
use tracing::{info_span, Span};

/// Logger handed to a step for each call
///
/// Every line is emitted inside a `step` span carrying the step name and the
/// concrete step type, which keeps step output apart from pipeline lines.
#[derive(Debug, Clone)]
pub struct StepLogger {
    span: Span,
}

impl StepLogger {
    pub fn new(step_name: &str, step_type: &'static str) -> Self {
        Self {
            span: info_span!("step", step_name = %step_name, step_type = step_type),
        }
    }

    /// The underlying span, for steps that want structured fields
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn debug(&self, message: impl Display) {
        tracing::debug!(parent: &self.span, "{}", message);
    }

    pub fn info(&self, message: impl Display) {
        tracing::info!(parent: &self.span, "{}", message);
    }

    pub fn warn(&self, message: impl Display) {
        tracing::warn!(parent: &self.span, "{}", message);
    }

    pub fn error(&self, message: impl Display) {
        tracing::error!(parent: &self.span, "{}", message);
    }
}
