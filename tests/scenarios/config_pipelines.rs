//! Test: Config Pipelines - YAML definitions built against the demo catalog

use std::io::Write;
use tempfile::NamedTempFile;
use tpdp::cli::demo::{self, CounterState};
use tpdp::{ExecutionStatus, PipelineConfig, PipelineError, RunContext};

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

/// The bundled walkthrough file reproduces the 4/3 split
#[test]
fn test_bundled_simple_pipeline() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/pipelines/simple.yaml");
    let config = PipelineConfig::from_file(path).unwrap();
    let mut pipeline = config
        .build_pipeline(&demo::catalog(), CounterState::default())
        .unwrap();

    let (result, state) = pipeline.run(&config.run_context()).unwrap();

    assert_eq!(state.counter("step_1"), 4);
    assert_eq!(state.counter("step_2"), 3);
    assert_eq!(result.executed_steps(), 7);
    assert!(std::sync::Arc::ptr_eq(&pipeline.steps()[0], &pipeline.steps()[6]));
}

/// The bundled early-stop file aborts before its tail
#[test]
fn test_bundled_early_stop_pipeline() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/pipelines/early_stop.yaml");
    let config = PipelineConfig::from_file(path).unwrap();
    let mut pipeline = config
        .build_pipeline(&demo::catalog(), CounterState::default())
        .unwrap();

    let (result, state) = pipeline.run(&config.run_context()).unwrap();

    assert_eq!(state.counter("total"), 11);
    assert_eq!(state.history, vec!["warmup", "boost", "halt"]);
    assert_eq!(result.status, ExecutionStatus::Aborted);
}

/// Overrides replace file context values
#[test]
fn test_context_override_from_file() {
    let file = write_config(
        r#"
name: "Overrides"
context:
  delta: 2
steps:
  bump: { kind: add, params: { counter: total } }
sequence: [bump, bump]
"#,
    );
    let config = PipelineConfig::from_file(file.path()).unwrap();
    let mut pipeline = config
        .build_pipeline(&demo::catalog(), CounterState::default())
        .unwrap();

    let mut context = config.run_context();
    context.extend(RunContext::new().with("delta", 7));
    let (_, state) = pipeline.run(&context).unwrap();

    assert_eq!(state.counter("total"), 14);
}

/// Unknown kinds are reported with the known ones
#[test]
fn test_unknown_kind_is_rejected() {
    let file = write_config(
        r#"
name: "Broken"
steps:
  mystery: { kind: teleport }
sequence: [mystery]
"#,
    );
    let config = PipelineConfig::from_file(file.path()).unwrap();

    let err = config.check_kinds(&demo::catalog()).unwrap_err();

    assert!(err.is_configuration());
    assert!(err.to_string().contains("teleport"));
    assert!(err.to_string().contains("count"));
}

/// Sequence entries must name defined steps
#[test]
fn test_undefined_sequence_entry() {
    let file = write_config(
        r#"
name: "Dangling"
steps:
  real: { kind: count }
sequence: [real, ghost]
"#,
    );

    let err = PipelineConfig::from_file(file.path()).unwrap_err();

    assert!(err.is_configuration());
    assert!(err.to_string().contains("ghost"));
}

/// Missing files surface as I/O errors
#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = PipelineConfig::from_file(dir.path().join("absent.yaml")).unwrap_err();

    assert!(matches!(err, PipelineError::Io(_)));
}
