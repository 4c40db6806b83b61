//! Step domain model

use crate::core::context::StepContext;
use crate::error::PipelineError;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Shared handle to a registered step
///
/// The same handle may sit in several registry slots.
pub type SharedStep<S> = Arc<dyn Step<S>>;

/// A single named unit of work transforming the pipeline state
pub trait Step<S>: Send + Sync {
    /// Step name used in logs and results
    fn name(&self) -> &str;

    /// Transform the state
    ///
    /// The step has exclusive access to the state for the duration of the call.
    /// Returning an error aborts the whole run.
    fn run(&self, state: &mut S, context: &StepContext<'_>) -> anyhow::Result<()>;

    /// Identity of the concrete step type, used to scope the step logger
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A validated, non-empty step name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StepName(String);

impl StepName {
    pub fn new(name: impl Into<String>) -> Result<Self, PipelineError> {
        let name = name.into();
        validate_name("step", &name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StepName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Reject empty or whitespace-only names
pub(crate) fn validate_name(what: &str, name: &str) -> Result<(), PipelineError> {
    if name.trim().is_empty() {
        return Err(PipelineError::configuration(format!(
            "{} name must not be empty",
            what
        )));
    }
    Ok(())
}

/// Step backed by a closure
pub struct FnStep<S, F> {
    name: StepName,
    func: F,
    _state: PhantomData<fn(&mut S)>,
}

impl<S, F> FnStep<S, F> {
    pub fn new(name: impl Into<String>, func: F) -> Result<Self, PipelineError>
    where
        F: Fn(&mut S, &StepContext<'_>) -> anyhow::Result<()> + Send + Sync,
    {
        Ok(Self {
            name: StepName::new(name)?,
            func,
            _state: PhantomData,
        })
    }
}

impl<S, F> Step<S> for FnStep<S, F>
where
    F: Fn(&mut S, &StepContext<'_>) -> anyhow::Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn run(&self, state: &mut S, context: &StepContext<'_>) -> anyhow::Result<()> {
        (self.func)(state, context)
    }

    fn type_name(&self) -> &'static str {
        "FnStep"
    }
}

impl<S, F> fmt::Debug for FnStep<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStep").field("name", &self.name).finish()
    }
}
