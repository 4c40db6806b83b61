//! Step catalog - builds steps from their configured kind

use crate::core::step::{SharedStep, StepName};
use crate::error::PipelineError;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Free-form parameters of a step definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepParams(Map<String, Value>);

impl StepParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<T>> {
        match self.0.get(key) {
            Some(value) => T::deserialize(value)
                .map(Some)
                .with_context(|| format!("Parameter '{}' has an unexpected type", key)),
            None => Ok(None),
        }
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> anyhow::Result<T> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Get a parameter that must be present
    pub fn require<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<T> {
        self.get(key)?
            .with_context(|| format!("Missing required parameter '{}'", key))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds a step from its name and parameters
pub type StepFactory<S> =
    Box<dyn Fn(StepName, &StepParams) -> anyhow::Result<SharedStep<S>> + Send + Sync>;

/// Known step kinds for one state type
pub struct StepCatalog<S> {
    factories: HashMap<String, StepFactory<S>>,
}

impl<S> StepCatalog<S> {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory for `kind`, replacing any previous one
    pub fn register_kind<F>(&mut self, kind: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(StepName, &StepParams) -> anyhow::Result<SharedStep<S>> + Send + Sync + 'static,
    {
        self.factories.insert(kind.into(), Box::new(factory));
        self
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Build a step named `name` of the given kind
    pub fn build(
        &self,
        name: &str,
        kind: &str,
        params: &StepParams,
    ) -> Result<SharedStep<S>, PipelineError> {
        let factory = self.factories.get(kind).ok_or_else(|| {
            PipelineError::configuration(format!(
                "Step '{}' uses unknown kind '{}'",
                name, kind
            ))
        })?;

        let step_name = StepName::new(name)?;
        factory(step_name, params).map_err(|e| {
            PipelineError::configuration(format!("Failed to build step '{}': {:#}", name, e))
        })
    }
}

impl<S> Default for StepCatalog<S> {
    fn default() -> Self {
        Self::new()
    }
}
