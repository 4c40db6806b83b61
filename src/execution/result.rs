//! Run results

use crate::core::state::ExecutionStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Timing of one finished step occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Position in the registry
    pub index: usize,

    pub name: String,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,

    pub duration: Duration,
}

/// Outcome of a successful pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Unique id of this run
    pub execution_id: Uuid,

    pub pipeline_name: String,

    /// `Completed`, or `Aborted` when a step stopped the run early
    pub status: ExecutionStatus,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,

    /// Total duration
    pub duration: Duration,

    /// Finished occurrences, in execution order
    pub steps: Vec<StepRecord>,

    /// Step that requested the abort
    pub aborted_by: Option<String>,
}

impl PipelineResult {
    /// The run finished without a step error
    pub fn is_success(&self) -> bool {
        self.status.is_correct_finish()
    }

    /// Number of finished occurrences
    pub fn executed_steps(&self) -> usize {
        self.steps.len()
    }

    /// Number of times the named step ran
    pub fn runs_of(&self, step_name: &str) -> usize {
        self.steps.iter().filter(|s| s.name == step_name).count()
    }

    /// Sum of all step durations
    pub fn total_step_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    /// The slowest step occurrence
    pub fn slowest_step(&self) -> Option<&StepRecord> {
        self.steps.iter().max_by_key(|s| s.duration)
    }
}
