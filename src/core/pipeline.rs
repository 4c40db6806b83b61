//! Pipeline domain model

use crate::core::{
    state::{ExecutionStatus, RunState, State},
    step::{validate_name, SharedStep, Step},
};
use crate::error::PipelineError;
use crate::execution::engine::{emit, EventHandler, ExecutionEvent};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// A named, ordered sequence of steps threading one state value
pub struct Pipeline<S> {
    /// Pipeline name
    pub(crate) name: String,

    /// Registered occurrences, in execution order
    pub(crate) steps: Vec<SharedStep<S>>,

    /// Current state
    pub(crate) state: S,

    /// Bookkeeping for the latest run
    pub(crate) run_state: RunState,

    pub(crate) event_handlers: Vec<EventHandler>,
}

impl<S: fmt::Debug> fmt::Debug for Pipeline<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("steps", &self.step_names())
            .field("state", &self.state)
            .field("status", &self.run_state.status)
            .finish()
    }
}

impl<S: State> Pipeline<S> {
    /// Create a pipeline owning `initial_state`
    pub fn new(name: impl Into<String>, initial_state: S) -> Result<Self, PipelineError> {
        let name = name.into();
        validate_name("pipeline", &name)?;
        initial_state
            .validate()
            .map_err(|source| PipelineError::InvalidState { source })?;

        Ok(Pipeline {
            name,
            steps: Vec::new(),
            state: initial_state,
            run_state: RunState::new(),
            event_handlers: Vec::new(),
        })
    }

    /// Append a step occurrence to the registry
    ///
    /// The same step may be registered any number of times and runs once per
    /// registration.
    pub fn registry(&mut self, step: SharedStep<S>) -> Result<(), PipelineError> {
        validate_name("step", step.name())?;

        info!(pipeline_name = %self.name, step_name = %step.name(), "Step registered");
        emit(
            &self.event_handlers,
            &ExecutionEvent::StepRegistered {
                step_name: step.name().to_string(),
                position: self.steps.len(),
            },
        );

        self.steps.push(step);
        Ok(())
    }

    /// Register a concrete step and hand back its shared handle
    pub fn register<T>(&mut self, step: T) -> Result<SharedStep<S>, PipelineError>
    where
        T: Step<S> + 'static,
    {
        let step: SharedStep<S> = Arc::new(step);
        self.registry(step.clone())?;
        Ok(step)
    }
}

impl<S> Pipeline<S> {
    /// Get the pipeline name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Give the state back to the caller
    pub fn into_state(self) -> S {
        self.state
    }

    /// Registered occurrences, in execution order
    pub fn steps(&self) -> &[SharedStep<S>] {
        &self.steps
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Number of registered occurrences
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn status(&self) -> ExecutionStatus {
        self.run_state.status
    }

    pub fn run_state(&self) -> &RunState {
        &self.run_state
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.run_state.started_at
    }

    /// Finish time of the latest run; `None` while running or after a failure
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.run_state.completed_at
    }

    pub fn failed_at(&self) -> Option<DateTime<Utc>> {
        self.run_state.failed_at
    }
}
