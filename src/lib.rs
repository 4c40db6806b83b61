//! tpdp - a sequential step pipeline with structured lifecycle logging

pub mod cli;
pub mod core;
pub mod error;
pub mod execution;
pub mod logging;

// Re-export commonly used types
pub use crate::core::config::PipelineConfig;
pub use crate::core::{
    ExecutionStatus, FnStep, Pipeline, RunContext, SharedStep, State, Step, StepCatalog,
    StepContext, StepLogger, StepName, StepParams,
};
pub use error::PipelineError;
pub use execution::{ExecutionEvent, PipelineResult, StepRecord};
