//! Pipeline configuration from YAML

use crate::core::{
    catalog::{StepCatalog, StepParams},
    context::RunContext,
    state::State,
    step::{validate_name, SharedStep},
    Pipeline,
};
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::warn;

/// Top-level pipeline configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Keyword context passed to every step
    #[serde(default)]
    pub context: HashMap<String, Value>,

    /// Step definitions by name; each is built once
    #[serde(default)]
    pub steps: BTreeMap<String, StepDefinition>,

    /// Execution order; a name may appear any number of times
    #[serde(default)]
    pub sequence: Vec<String>,
}

/// Step definition as written in YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDefinition {
    /// Catalog kind used to build the step
    pub kind: String,

    /// Kind-specific parameters
    #[serde(default, skip_serializing_if = "StepParams::is_empty")]
    pub params: StepParams,
}

impl PipelineConfig {
    /// Load pipeline configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse pipeline configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, PipelineError> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the pipeline configuration
    pub fn validate(&self) -> Result<(), PipelineError> {
        validate_name("pipeline", &self.name)?;

        for (name, definition) in &self.steps {
            validate_name("step", name)?;
            if definition.kind.trim().is_empty() {
                return Err(PipelineError::configuration(format!(
                    "Step '{}' has no kind",
                    name
                )));
            }
        }

        for (position, name) in self.sequence.iter().enumerate() {
            if !self.steps.contains_key(name) {
                return Err(PipelineError::configuration(format!(
                    "Sequence entry {} references undefined step '{}'",
                    position, name
                )));
            }
        }

        let used: HashSet<&String> = self.sequence.iter().collect();
        for name in self.steps.keys().filter(|name| !used.contains(name)) {
            warn!(step_name = %name, "Step is defined but never used in the sequence");
        }

        Ok(())
    }

    /// Check that every step kind is known to `catalog`
    pub fn check_kinds<S>(&self, catalog: &StepCatalog<S>) -> Result<(), PipelineError> {
        for (name, definition) in &self.steps {
            if !catalog.contains(&definition.kind) {
                return Err(PipelineError::configuration(format!(
                    "Step '{}' uses unknown kind '{}' (known kinds: {})",
                    name,
                    definition.kind,
                    catalog.kinds().join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Keyword context declared in the file
    pub fn run_context(&self) -> RunContext {
        RunContext::from(self.context.clone())
    }

    /// Build the pipeline: every definition once, then the sequence in order
    ///
    /// Repeated sequence entries share the same step instance.
    pub fn build_pipeline<S: State>(
        &self,
        catalog: &StepCatalog<S>,
        initial_state: S,
    ) -> Result<Pipeline<S>, PipelineError> {
        self.validate()?;

        let mut built: HashMap<&str, SharedStep<S>> = HashMap::new();
        for (name, definition) in &self.steps {
            let step = catalog.build(name, &definition.kind, &definition.params)?;
            built.insert(name.as_str(), step);
        }

        let mut pipeline = Pipeline::new(self.name.clone(), initial_state)?;
        for name in &self.sequence {
            let step = built.get(name.as_str()).ok_or_else(|| {
                PipelineError::configuration(format!("Undefined step '{}'", name))
            })?;
            pipeline.registry(step.clone())?;
        }

        Ok(pipeline)
    }
}
