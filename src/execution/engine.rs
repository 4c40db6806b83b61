//! Main execution engine - runs the registered steps in order

use crate::{
    core::{
        context::{RunContext, StepContext},
        logger::StepLogger,
        state::{ExecutionStatus, State},
        Pipeline,
    },
    error::PipelineError,
    execution::result::{PipelineResult, StepRecord},
};
use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

/// Events that can occur while building or running a pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionEvent {
    StepRegistered {
        step_name: String,
        position: usize,
    },
    PipelineStarted {
        execution_id: Uuid,
        pipeline_name: String,
        started_at: DateTime<Utc>,
    },
    StepStarted {
        step_name: String,
        index: usize,
    },
    StepFinished {
        step_name: String,
        index: usize,
        duration: Duration,
    },
    StepFailed {
        step_name: String,
        index: usize,
        error: String,
    },
    PipelineAborted {
        execution_id: Uuid,
        step_name: String,
    },
    PipelineFinished {
        execution_id: Uuid,
        status: ExecutionStatus,
        duration: Duration,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&ExecutionEvent) + Send + Sync>;

/// Emit an event to all handlers
pub(crate) fn emit(handlers: &[EventHandler], event: &ExecutionEvent) {
    for handler in handlers {
        handler(event);
    }
}

impl<S: State> Pipeline<S> {
    /// Add an event handler, called synchronously for every event
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Execute every registered step once, in registration order
    ///
    /// The first step error stops the run and is returned; the state then
    /// holds whatever the steps before it produced.
    pub fn run(&mut self, context: &RunContext) -> Result<(PipelineResult, &S), PipelineError> {
        let execution_id = Uuid::new_v4();
        let span = info_span!("pipeline_run", pipeline_name = %self.name, %execution_id);
        let _entered = span.enter();

        let started_at = Utc::now();
        let pipeline_clock = Instant::now();
        self.run_state.start(execution_id, started_at, self.steps.len());

        info!(pipeline_name = %self.name, %started_at, "Pipeline start");
        emit(
            &self.event_handlers,
            &ExecutionEvent::PipelineStarted {
                execution_id,
                pipeline_name: self.name.clone(),
                started_at,
            },
        );

        if self.steps.is_empty() {
            warn!(pipeline_name = %self.name, "Empty steps sequence");
        }

        let abort = Cell::new(false);
        let mut records = Vec::with_capacity(self.steps.len());
        let mut aborted_by = None;

        for (index, step) in self.steps.iter().enumerate() {
            let step_name = step.name();
            let logger = StepLogger::new(step_name, step.type_name());
            let step_context =
                StepContext::new(&self.name, execution_id, index, context, logger, &abort);

            let step_started_at = Utc::now();
            let step_clock = Instant::now();
            info!(step_name, "Step run");
            emit(
                &self.event_handlers,
                &ExecutionEvent::StepStarted {
                    step_name: step_name.to_string(),
                    index,
                },
            );

            if let Err(source) = step.run(&mut self.state, &step_context) {
                let step_duration = step_clock.elapsed();
                error!(
                    step_name,
                    step_duration = step_duration.as_secs_f64(),
                    error = %source,
                    "Step failed"
                );
                self.run_state.fail(Utc::now());
                emit(
                    &self.event_handlers,
                    &ExecutionEvent::StepFailed {
                        step_name: step_name.to_string(),
                        index,
                        error: format!("{:#}", source),
                    },
                );
                return Err(PipelineError::StepFailed {
                    step_name: step_name.to_string(),
                    index,
                    source,
                });
            }

            let step_duration = step_clock.elapsed();
            info!(
                step_name,
                step_duration = step_duration.as_secs_f64(),
                "Step finish"
            );
            self.run_state.step_completed();
            records.push(StepRecord {
                index,
                name: step_name.to_string(),
                started_at: step_started_at,
                finished_at: Utc::now(),
                duration: step_duration,
            });
            emit(
                &self.event_handlers,
                &ExecutionEvent::StepFinished {
                    step_name: step_name.to_string(),
                    index,
                    duration: step_duration,
                },
            );

            if abort.get() {
                info!(step_name, "Pipeline aborted by step");
                emit(
                    &self.event_handlers,
                    &ExecutionEvent::PipelineAborted {
                        execution_id,
                        step_name: step_name.to_string(),
                    },
                );
                aborted_by = Some(step_name.to_string());
                break;
            }
        }

        let pipeline_duration = pipeline_clock.elapsed();
        let finished_at = Utc::now();
        match &aborted_by {
            Some(step_name) => self.run_state.abort(step_name, finished_at),
            None => self.run_state.complete(finished_at),
        }
        let status = self.run_state.status;

        info!(
            pipeline_name = %self.name,
            %finished_at,
            pipeline_duration = pipeline_duration.as_secs_f64(),
            "Pipeline finish"
        );
        emit(
            &self.event_handlers,
            &ExecutionEvent::PipelineFinished {
                execution_id,
                status,
                duration: pipeline_duration,
            },
        );

        let result = PipelineResult {
            execution_id,
            pipeline_name: self.name.clone(),
            status,
            started_at,
            finished_at,
            duration: pipeline_duration,
            steps: records,
            aborted_by,
        };

        Ok((result, &self.state))
    }
}
