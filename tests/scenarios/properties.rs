//! Property tests for sequential execution

use crate::helpers::*;
use proptest::prelude::*;
use std::sync::Arc;
use tpdp::{FnStep, Pipeline, RunContext, SharedStep, StepContext};

#[derive(Debug, Default, Clone, PartialEq)]
struct Trail {
    visited: Vec<usize>,
    total: i64,
}

impl tpdp::State for Trail {}

fn marker(id: usize, amount: i64) -> SharedStep<Trail> {
    Arc::new(
        FnStep::new(format!("marker_{}", id), move |state: &mut Trail, _: &StepContext<'_>| {
            state.visited.push(id);
            state.total += amount;
            Ok(())
        })
        .unwrap(),
    )
}

proptest! {
    #[test]
    fn steps_run_once_per_registration_in_order(
        amounts in prop::collection::vec(-100i64..100, 1..5),
        order in prop::collection::vec(0usize..5, 0..40),
    ) {
        let steps: Vec<SharedStep<Trail>> = amounts
            .iter()
            .enumerate()
            .map(|(id, amount)| marker(id, *amount))
            .collect();
        let sequence: Vec<usize> = order.iter().map(|i| i % steps.len()).collect();

        let mut pipeline = Pipeline::new("prop", Trail::default()).unwrap();
        for &i in &sequence {
            pipeline.registry(steps[i].clone()).unwrap();
        }

        let (result, state) = pipeline.run(&RunContext::new()).unwrap();

        let expected_total: i64 = sequence.iter().map(|&i| amounts[i]).sum();
        prop_assert_eq!(&state.visited, &sequence);
        prop_assert_eq!(state.total, expected_total);
        prop_assert_eq!(result.executed_steps(), sequence.len());
        prop_assert!(result.duration >= result.total_step_duration());
    }

    #[test]
    fn failure_position_bounds_executed_steps(
        before in 0usize..10,
        after in 0usize..10,
    ) {
        let mut pipeline = Pipeline::new("prop", SimpleState::named("prop")).unwrap();
        let step_1 = Step1::shared("step_1");
        for _ in 0..before {
            pipeline.registry(step_1.clone()).unwrap();
        }
        pipeline.registry(Explode::shared("explode", "stop here")).unwrap();
        for _ in 0..after {
            pipeline.registry(step_1.clone()).unwrap();
        }

        let err = pipeline.run(&RunContext::new()).unwrap_err();

        prop_assert_eq!(err.failed_step(), Some("explode"));
        prop_assert_eq!(pipeline.state().step_1_count as usize, before);
        prop_assert_eq!(pipeline.run_state().completed_steps, before);
    }
}
