//! Run context - keyword values shared with every step

use crate::core::logger::StepLogger;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::Cell;
use std::collections::HashMap;
use uuid::Uuid;

/// Keyword context for a pipeline run
///
/// Every step of the run receives the same values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunContext {
    values: HashMap<String, Value>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get the raw value
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Get a value converted to `T`
    ///
    /// Missing keys give `Ok(None)`; a value of the wrong shape is an error.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<T>> {
        match self.values.get(key) {
            Some(value) => T::deserialize(value)
                .map(Some)
                .with_context(|| format!("Context value '{}' has an unexpected type", key)),
            None => Ok(None),
        }
    }

    /// Get a value converted to `T`, falling back to `default` when missing
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> anyhow::Result<T> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Overlay all values from `other`
    pub fn extend(&mut self, other: RunContext) {
        self.values.extend(other.values);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

impl From<HashMap<String, Value>> for RunContext {
    fn from(values: HashMap<String, Value>) -> Self {
        Self { values }
    }
}

/// What a step sees during one call
pub struct StepContext<'a> {
    pipeline_name: &'a str,
    execution_id: Uuid,
    index: usize,
    values: &'a RunContext,
    logger: StepLogger,
    abort: &'a Cell<bool>,
}

impl<'a> StepContext<'a> {
    pub fn new(
        pipeline_name: &'a str,
        execution_id: Uuid,
        index: usize,
        values: &'a RunContext,
        logger: StepLogger,
        abort: &'a Cell<bool>,
    ) -> Self {
        Self {
            pipeline_name,
            execution_id,
            index,
            values,
            logger,
            abort,
        }
    }

    pub fn pipeline_name(&self) -> &str {
        self.pipeline_name
    }

    pub fn execution_id(&self) -> Uuid {
        self.execution_id
    }

    /// Position of this occurrence in the registry
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn values(&self) -> &RunContext {
        self.values
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<T>> {
        self.values.get(key)
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> anyhow::Result<T> {
        self.values.get_or(key, default)
    }

    pub fn logger(&self) -> &StepLogger {
        &self.logger
    }

    /// Ask the pipeline to stop after this step finishes
    pub fn abort(&self) {
        self.abort.set(true);
    }

    pub fn abort_requested(&self) -> bool {
        self.abort.get()
    }
}
