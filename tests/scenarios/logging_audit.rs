//! Test: Logging Audit - lifecycle lines emitted around every step

use crate::helpers::*;
use tpdp::{FnStep, Pipeline, RunContext, StepContext};

/// Walkthrough pipeline emits one start/finish pair per registered step
#[test]
fn test_walkthrough_log_lines() {
    let (_, logs) = capture_logs(|| {
        let mut pipeline = walkthrough_pipeline();
        pipeline.run(&RunContext::new()).map(|(result, _)| result).unwrap()
    });

    assert_eq!(logs.count("Step registered"), 7);
    assert_eq!(logs.count("Pipeline start"), 1);
    assert_eq!(logs.count("Step run"), 7);
    assert_eq!(logs.count("Step finish"), 7);
    assert_eq!(logs.count("Pipeline finish"), 1);
}

/// Lines carry the step name and appear in lifecycle order
#[test]
fn test_log_lines_are_ordered() {
    let (_, logs) = capture_logs(|| {
        let mut pipeline = Pipeline::new("Ordered", SimpleState::named("Ordered")).unwrap();
        pipeline.registry(Step1::shared("only")).unwrap();
        pipeline.run(&RunContext::new()).map(|(result, _)| result).unwrap()
    });

    let lifecycle: Vec<String> = logs
        .lines()
        .into_iter()
        .filter(|line| {
            ["Pipeline start", "Step run", "Step finish", "Pipeline finish"]
                .iter()
                .any(|marker| line.contains(marker))
        })
        .collect();

    assert_eq!(lifecycle.len(), 4);
    assert!(lifecycle[0].contains("Pipeline start") && lifecycle[0].contains("started_at="));
    assert!(lifecycle[1].contains("Step run") && lifecycle[1].contains("only"));
    assert!(lifecycle[2].contains("Step finish") && lifecycle[2].contains("step_duration"));
    assert!(lifecycle[3].contains("Pipeline finish") && lifecycle[3].contains("pipeline_duration"));
    assert!(lifecycle[3].contains("finished_at="));
}

/// Step loggers are scoped by step name and step type
#[test]
fn test_step_logger_scope() {
    let (_, logs) = capture_logs(|| {
        let mut pipeline = Pipeline::new("Scoped", SimpleState::named("Scoped")).unwrap();
        pipeline.registry(Step1::shared("counting")).unwrap();
        pipeline.run(&RunContext::new()).map(|(result, _)| result).unwrap()
    });

    let line = logs
        .lines()
        .into_iter()
        .find(|line| line.contains("step_1_count is now 1"))
        .unwrap();
    assert!(line.contains("step_name=counting"));
    assert!(line.contains("Step1"));
}

/// Structured events emitted inside the step span keep the step scope
#[test]
fn test_step_span_carries_structured_fields() {
    let (_, logs) = capture_logs(|| {
        let mut pipeline = Pipeline::new("Spans", SimpleState::named("Spans")).unwrap();
        pipeline
            .register(
                FnStep::new("store", |_: &mut SimpleState, ctx: &StepContext<'_>| {
                    ctx.logger()
                        .span()
                        .in_scope(|| tracing::info!(items = 3, "batch stored"));
                    Ok(())
                })
                .unwrap(),
            )
            .unwrap();
        pipeline.run(&RunContext::new()).map(|(result, _)| result).unwrap()
    });

    let line = logs
        .lines()
        .into_iter()
        .find(|line| line.contains("batch stored"))
        .unwrap();
    assert!(line.contains("step_name=store"));
    assert!(line.contains("step_type=") && line.contains("FnStep"));
    assert!(line.contains("items=3"));
}

/// An empty registry still completes, with a warning
#[test]
fn test_empty_pipeline_warns() {
    let (result, logs) = capture_logs(|| {
        let mut pipeline = Pipeline::new("Empty", SimpleState::named("Empty")).unwrap();
        pipeline.run(&RunContext::new()).map(|(result, _)| result).unwrap()
    });

    assert!(result.is_success());
    assert!(result.steps.is_empty());
    assert_eq!(logs.count("Empty steps sequence"), 1);
    assert_eq!(logs.count("Pipeline finish"), 1);
    assert_eq!(logs.count("Step run"), 0);
}
