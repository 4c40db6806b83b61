use anyhow::{Context, Result};
use tpdp::cli::commands::{parse_context_value, RunCommand, ValidateCommand};
use tpdp::cli::demo::{self, CounterState};
use tpdp::cli::output::*;
use tpdp::cli::{Cli, Command};
use tpdp::logging::{init_logging, LoggingConfig};
use tpdp::{PipelineConfig, PipelineError};
use tracing::error;
use tracing::level_filters::LevelFilter;

fn main() -> Result<()> {
    let cli = Cli::from_args();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    init_logging(
        &LoggingConfig::default()
            .with_level(level)
            .with_format(cli.log_format.into())
            .with_ansi(console::colors_enabled_stderr()),
    )?;

    match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd),
        Command::Validate(cmd) => validate_pipeline(cmd),
    }
}

fn run_pipeline(cmd: &RunCommand) -> Result<()> {
    let config = PipelineConfig::from_file(&cmd.file)
        .with_context(|| format!("Failed to load pipeline config from {}", cmd.file))?;

    let catalog = demo::catalog();
    config.check_kinds(&catalog)?;

    let mut context = config.run_context();
    for (key, raw) in &cmd.var {
        context.insert(key.clone(), parse_context_value(raw));
        if !cmd.json {
            println!(
                "{} Context override: {} = {}",
                INFO,
                style(key).cyan(),
                style(raw).dim()
            );
        }
    }

    let mut pipeline = config.build_pipeline(&catalog, CounterState::default())?;

    if cmd.progress {
        let progress = create_progress_bar(pipeline.len());
        pipeline.add_event_handler(move |event| update_progress(&progress, event));
    }

    let outcome = pipeline
        .run(&context)
        .map(|(result, state)| (result, state.clone()));

    match outcome {
        Ok((result, state)) => {
            if cmd.json {
                let report = serde_json::json!({ "result": result, "state": state });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", format_result_summary(&result));
                for record in &result.steps {
                    println!("  {}", format_step_record(record));
                }
                for (name, value) in &state.counters {
                    println!("  {} = {}", style(name).bold(), style(value).cyan());
                }
            }
            Ok(())
        }
        Err(e) => {
            if cmd.json {
                let report = failure_report(&e, pipeline.state());
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{} {} {}",
                    CROSS,
                    style(pipeline.name()).bold(),
                    style("failed").red()
                );
            }
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

/// JSON report of a failed run, with the state left behind
fn failure_report(error: &PipelineError, state: &CounterState) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "message": format!("{:#}", error),
            "step": error.failed_step(),
        },
        "state": state,
    })
}

fn validate_pipeline(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating pipeline...", INFO);

    let checked = PipelineConfig::from_file(&cmd.file).and_then(|config| {
        config.check_kinds(&demo::catalog())?;
        Ok(config)
    });

    match checked {
        Ok(config) => {
            println!("{} Pipeline configuration is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            if let Some(description) = &config.description {
                println!("  Description: {}", style(description).dim());
            }
            println!("  Definitions: {}", style(config.steps.len()).cyan());
            println!("  Sequence: {}", style(config.sequence.len()).cyan());
            println!("  Context keys: {}", style(config.context.len()).cyan());

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}
