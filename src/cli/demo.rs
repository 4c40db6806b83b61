//! Demo state and step kinds used by the command-line runner

use crate::core::{
    SharedStep, State, Step, StepCatalog, StepContext, StepName, StepParams,
};
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Named counters plus the list of steps that touched them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterState {
    pub counters: BTreeMap<String, i64>,
    pub history: Vec<String>,
}

impl State for CounterState {}

impl CounterState {
    pub fn counter(&self, name: &str) -> i64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    fn bump(&mut self, counter: &str, by: i64) -> anyhow::Result<()> {
        let value = self.counters.entry(counter.to_string()).or_insert(0);
        *value = match value.checked_add(by) {
            Some(sum) => sum,
            None => bail!("Counter '{}' overflows when adding {}", counter, by),
        };
        Ok(())
    }
}

/// `count`: add a fixed amount to a counter
pub struct CountStep {
    name: StepName,
    counter: String,
    by: i64,
}

impl CountStep {
    pub fn new(name: StepName, params: &StepParams) -> anyhow::Result<Self> {
        Ok(Self {
            counter: params.get_or("counter", name.to_string())?,
            by: params.get_or("by", 1)?,
            name,
        })
    }
}

impl Step<CounterState> for CountStep {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn run(&self, state: &mut CounterState, _ctx: &StepContext<'_>) -> anyhow::Result<()> {
        state.bump(&self.counter, self.by)?;
        state.history.push(self.name.to_string());
        Ok(())
    }
}

/// `add`: add a context value to a counter
pub struct AddStep {
    name: StepName,
    counter: String,
    key: String,
}

impl AddStep {
    pub fn new(name: StepName, params: &StepParams) -> anyhow::Result<Self> {
        Ok(Self {
            counter: params.get_or("counter", name.to_string())?,
            key: params.get_or("key", "delta".to_string())?,
            name,
        })
    }
}

impl Step<CounterState> for AddStep {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn run(&self, state: &mut CounterState, ctx: &StepContext<'_>) -> anyhow::Result<()> {
        let amount: i64 = ctx.get_or(&self.key, 0)?;
        ctx.logger()
            .debug(format_args!("adding {} to '{}'", amount, self.counter));
        state.bump(&self.counter, amount)?;
        state.history.push(self.name.to_string());
        Ok(())
    }
}

/// `sleep`: block for a while
pub struct SleepStep {
    name: StepName,
    duration: Duration,
}

impl SleepStep {
    pub fn new(name: StepName, params: &StepParams) -> anyhow::Result<Self> {
        Ok(Self {
            duration: Duration::from_millis(params.require("millis")?),
            name,
        })
    }
}

impl Step<CounterState> for SleepStep {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn run(&self, state: &mut CounterState, _ctx: &StepContext<'_>) -> anyhow::Result<()> {
        std::thread::sleep(self.duration);
        state.history.push(self.name.to_string());
        Ok(())
    }
}

/// `fail`: always return an error
pub struct FailStep {
    name: StepName,
    message: String,
}

impl FailStep {
    pub fn new(name: StepName, params: &StepParams) -> anyhow::Result<Self> {
        Ok(Self {
            message: params.get_or("message", "step failed".to_string())?,
            name,
        })
    }
}

impl Step<CounterState> for FailStep {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn run(&self, _state: &mut CounterState, ctx: &StepContext<'_>) -> anyhow::Result<()> {
        ctx.logger().warn(format_args!("failing on purpose: {}", self.message));
        bail!("{}", self.message)
    }
}

/// `stop`: end the run after this step
pub struct StopStep {
    name: StepName,
}

impl Step<CounterState> for StopStep {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn run(&self, state: &mut CounterState, ctx: &StepContext<'_>) -> anyhow::Result<()> {
        ctx.logger().info("stopping the pipeline");
        state.history.push(self.name.to_string());
        ctx.abort();
        Ok(())
    }
}

/// Catalog with every demo kind
pub fn catalog() -> StepCatalog<CounterState> {
    let mut catalog = StepCatalog::new();
    catalog
        .register_kind("count", |name, params| {
            Ok(Arc::new(CountStep::new(name, params)?) as SharedStep<CounterState>)
        })
        .register_kind("add", |name, params| {
            Ok(Arc::new(AddStep::new(name, params)?) as SharedStep<CounterState>)
        })
        .register_kind("sleep", |name, params| {
            Ok(Arc::new(SleepStep::new(name, params)?) as SharedStep<CounterState>)
        })
        .register_kind("fail", |name, params| {
            Ok(Arc::new(FailStep::new(name, params)?) as SharedStep<CounterState>)
        })
        .register_kind("stop", |name, _| {
            Ok(Arc::new(StopStep { name }) as SharedStep<CounterState>)
        });
    catalog
}
