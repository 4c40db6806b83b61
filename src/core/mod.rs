//! Core domain models for Pipeline
//!
//! This module defines the step contract, the state contract, the run context
//! handed to steps, and the pipeline that owns them.

pub mod catalog;
pub mod config;
pub mod context;
pub mod logger;
pub mod pipeline;
pub mod state;
pub mod step;

pub use catalog::{StepCatalog, StepParams};
pub use context::{RunContext, StepContext};
pub use logger::StepLogger;
pub use pipeline::*;
pub use state::*;
pub use step::*;
