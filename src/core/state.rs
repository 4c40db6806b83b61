//! State contract and execution state models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Caller-owned record threaded through every step
///
/// The pipeline never looks inside the state. It only calls `validate` once,
/// when the pipeline is constructed.
pub trait State: fmt::Debug {
    /// Check the initial values before the pipeline accepts them
    fn validate(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Overall pipeline execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Pipeline has not started
    Pending,
    /// Pipeline is currently running
    Running,
    /// Every registered step finished
    Completed,
    /// A step asked the pipeline to stop early
    Aborted,
    /// A step returned an error
    Failed,
}

impl ExecutionStatus {
    /// Finished without a step error
    pub fn is_correct_finish(&self) -> bool {
        matches!(self, ExecutionStatus::Completed | ExecutionStatus::Aborted)
    }
}

/// Bookkeeping for the latest run of a pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Id of the latest run, if any
    pub execution_id: Option<Uuid>,

    /// Current execution status
    pub status: ExecutionStatus,

    /// When the latest run started
    pub started_at: Option<DateTime<Utc>>,

    /// When the latest run finished, left unset when it failed
    pub completed_at: Option<DateTime<Utc>>,

    /// When a step error stopped the latest run
    pub failed_at: Option<DateTime<Utc>>,

    /// Number of registered occurrences at start
    pub total_steps: usize,

    /// Number of occurrences finished so far
    pub completed_steps: usize,

    /// Step that requested the abort
    pub aborted_by: Option<String>,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            execution_id: None,
            status: ExecutionStatus::Pending,
            started_at: None,
            completed_at: None,
            failed_at: None,
            total_steps: 0,
            completed_steps: 0,
            aborted_by: None,
        }
    }

    /// Mark pipeline as started, clearing the previous run
    pub fn start(&mut self, execution_id: Uuid, started_at: DateTime<Utc>, total_steps: usize) {
        *self = Self {
            execution_id: Some(execution_id),
            status: ExecutionStatus::Running,
            started_at: Some(started_at),
            total_steps,
            ..Self::new()
        };
    }

    pub fn step_completed(&mut self) {
        self.completed_steps += 1;
    }

    /// Mark pipeline as completed
    pub fn complete(&mut self, completed_at: DateTime<Utc>) {
        self.status = ExecutionStatus::Completed;
        self.completed_at = Some(completed_at);
    }

    /// Mark pipeline as stopped early by a step
    pub fn abort(&mut self, step_name: &str, completed_at: DateTime<Utc>) {
        self.status = ExecutionStatus::Aborted;
        self.aborted_by = Some(step_name.to_string());
        self.completed_at = Some(completed_at);
    }

    /// Mark pipeline as failed
    pub fn fail(&mut self, failed_at: DateTime<Utc>) {
        self.status = ExecutionStatus::Failed;
        self.failed_at = Some(failed_at);
    }

    /// Calculate progress (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.total_steps == 0 {
            return 0.0;
        }
        self.completed_steps as f64 / self.total_steps as f64
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
