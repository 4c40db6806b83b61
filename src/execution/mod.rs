//! Pipeline execution engine

pub mod engine;
pub mod result;

pub use engine::{EventHandler, ExecutionEvent};
pub use result::{PipelineResult, StepRecord};
