//! Test: Abort Behavior - a step ends the run early without failing it

use crate::helpers::*;
use tpdp::{ExecutionEvent, ExecutionStatus, FnStep, Pipeline, RunContext, StepContext};

fn gatekeeper(limit: u32) -> FnStep<SimpleState, impl Fn(&mut SimpleState, &StepContext<'_>) -> anyhow::Result<()> + Send + Sync> {
    FnStep::new("gatekeeper", move |state: &mut SimpleState, ctx: &StepContext<'_>| {
        if state.step_1_count >= limit {
            ctx.logger().info("limit reached");
            ctx.abort();
        }
        Ok(())
    })
    .unwrap()
}

/// Steps after the aborting one are skipped
#[test]
fn test_abort_skips_remaining_steps() {
    let mut pipeline = Pipeline::new("Gated", SimpleState::named("Gated")).unwrap();
    let step_1 = Step1::shared("step_1");
    let gate = pipeline.register(gatekeeper(2)).unwrap();
    for _ in 0..3 {
        pipeline.registry(step_1.clone()).unwrap();
        pipeline.registry(gate.clone()).unwrap();
    }

    let ((result, step_1_count), logs) = capture_logs(|| {
        let (result, state) = pipeline.run(&RunContext::new()).unwrap();
        (result, state.step_1_count)
    });

    assert_eq!(step_1_count, 2);
    assert_eq!(result.status, ExecutionStatus::Aborted);
    assert_eq!(result.aborted_by.as_deref(), Some("gatekeeper"));
    assert_eq!(result.executed_steps(), 5);
    assert!(result.is_success());
    assert_eq!(logs.count("Pipeline aborted by step"), 1);
    assert_eq!(logs.count("Pipeline finish"), 1);
    assert_eq!(pipeline.run_state().aborted_by.as_deref(), Some("gatekeeper"));
}

/// Abort emits its own event before the finish event
#[test]
fn test_abort_events() {
    let mut pipeline = Pipeline::new("Gated", SimpleState::named("Gated")).unwrap();
    let events = record_events(&mut pipeline);
    pipeline.register(gatekeeper(0)).unwrap();
    pipeline.registry(Step1::shared("never")).unwrap();

    pipeline.run(&RunContext::new()).unwrap();

    let events = events.lock().unwrap();
    let aborted = events
        .iter()
        .position(|e| matches!(e, ExecutionEvent::PipelineAborted { step_name, .. } if step_name == "gatekeeper"))
        .unwrap();
    let finished = events
        .iter()
        .position(|e| {
            matches!(
                e,
                ExecutionEvent::PipelineFinished {
                    status: ExecutionStatus::Aborted,
                    ..
                }
            )
        })
        .unwrap();
    assert!(aborted < finished);
    assert!(!events
        .iter()
        .any(|e| matches!(e, ExecutionEvent::StepStarted { step_name, .. } if step_name == "never")));
}

/// The abort flag does not leak into the next run
#[test]
fn test_abort_resets_between_runs() {
    let mut pipeline = Pipeline::new("Gated", SimpleState::named("Gated")).unwrap();
    pipeline.registry(Step1::shared("step_1")).unwrap();
    pipeline.register(gatekeeper(2)).unwrap();
    pipeline.registry(Step1::shared("after")).unwrap();

    let (first, _) = pipeline.run(&RunContext::new()).unwrap();
    assert_eq!(first.status, ExecutionStatus::Completed);

    let (second, state) = pipeline.run(&RunContext::new()).unwrap();
    assert_eq!(second.status, ExecutionStatus::Aborted);
    assert_eq!(state.step_1_count, 3);
}
