//! CLI output formatting

use crate::core::ExecutionStatus;
use crate::execution::{ExecutionEvent, PipelineResult, StepRecord};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub use console::style;

pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static STOP: Emoji<'_, '_> = Emoji("🛑 ", "# ");

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Create a progress bar sized to the number of registered steps
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let style = ProgressStyle::with_template(BAR_TEMPLATE)
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());

    let progress = ProgressBar::new(total as u64);
    progress.set_style(style);
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Advance a progress bar from pipeline events
pub fn update_progress(progress: &ProgressBar, event: &ExecutionEvent) {
    match event {
        ExecutionEvent::StepStarted { step_name, .. } => {
            progress.set_message(step_name.clone());
        }
        ExecutionEvent::StepFinished { .. } => progress.inc(1),
        ExecutionEvent::StepFailed { step_name, .. } => {
            progress.abandon_with_message(format!("{} failed", step_name));
        }
        ExecutionEvent::PipelineFinished { .. } => progress.finish_and_clear(),
        _ => {}
    }
}

pub fn format_status(status: ExecutionStatus) -> String {
    match status {
        ExecutionStatus::Pending => style("PENDING").dim().to_string(),
        ExecutionStatus::Running => style("RUNNING").yellow().to_string(),
        ExecutionStatus::Completed => style("COMPLETED").green().to_string(),
        ExecutionStatus::Aborted => style("ABORTED").yellow().to_string(),
        ExecutionStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Human-readable duration, millisecond precision below a minute
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{:.3}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

pub fn format_step_record(record: &StepRecord) -> String {
    format!(
        "{} #{} {} ({})",
        CHECK,
        record.index,
        style(&record.name).cyan(),
        style(format_duration(record.duration)).dim()
    )
}

/// Multi-line summary of a finished run
pub fn format_result_summary(result: &PipelineResult) -> String {
    let icon = match result.status {
        ExecutionStatus::Completed => CHECK,
        ExecutionStatus::Aborted => STOP,
        ExecutionStatus::Failed => CROSS,
        _ => INFO,
    };

    let mut lines = vec![format!(
        "{} {} - {} - {} steps in {} ({})",
        icon,
        style(&result.pipeline_name).bold(),
        format_status(result.status),
        result.executed_steps(),
        style(format_duration(result.duration)).cyan(),
        style(&result.execution_id.to_string()[..8]).dim()
    )];

    if let Some(step) = &result.aborted_by {
        lines.push(format!("{} Stopped early by {}", WARN, style(step).yellow()));
    }

    if let Some(slowest) = result.slowest_step() {
        lines.push(format!(
            "{} Slowest step: {} ({})",
            INFO,
            style(&slowest.name).cyan(),
            format_duration(slowest.duration)
        ));
    }

    lines.join("\n")
}
