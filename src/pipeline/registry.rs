//! Central operator registry.
//!
//! One record per operator name holds both the catalog metadata (icon,
//! description, parameter schema) and the factory that builds the
//! executable strategy. Keeping them in a single record makes it
//! impossible for the operator library and the execution path to drift
//! apart on names.
//!
//! The registry is an explicitly constructed value, handed to the pipeline
//! state and the preview coordinator by whoever assembles the session. No
//! process-wide mutable state is involved, which keeps tests hermetic.

use indexmap::IndexMap;
use serde::Serialize;

use super::operator::Operator;
use super::schema::OperatorSchema;
use super::PipelineError;

/// Catalog metadata for one operator, as shown in the operator library.
#[derive(Debug, Clone, Serialize)]
pub struct OperatorMetadata {
    pub icon: String,
    pub description: String,
    pub params: OperatorSchema,
}

type OperatorFactory = Box<dyn Fn() -> Box<dyn Operator> + Send + Sync>;

struct RegistryEntry {
    metadata: OperatorMetadata,
    factory: OperatorFactory,
}

/// Name-keyed operator catalog. Iteration follows registration order.
#[derive(Default)]
pub struct OperatorRegistry {
    entries: IndexMap<String, RegistryEntry>,
}

impl OperatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operator under `name`. Re-registering an existing name
    /// replaces the previous entry; that is deliberate (last write wins)
    /// and only worth a warning.
    pub fn register<F>(&mut self, name: &str, metadata: OperatorMetadata, factory: F)
    where
        F: Fn() -> Box<dyn Operator> + Send + Sync + 'static,
    {
        if self.entries.contains_key(name) {
            tracing::warn!(operator = name, "Operator is already registered, overwriting");
        }
        self.entries.insert(
            name.to_string(),
            RegistryEntry {
                metadata,
                factory: Box::new(factory),
            },
        );
        tracing::debug!(operator = name, "Registered operator");
    }

    /// Instantiate the executable strategy bound to `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn Operator>, PipelineError> {
        match self.entries.get(name) {
            Some(entry) => Ok((entry.factory)()),
            None => Err(self.unknown(name)),
        }
    }

    /// Catalog metadata for one operator.
    pub fn metadata(&self, name: &str) -> Result<&OperatorMetadata, PipelineError> {
        self.entries
            .get(name)
            .map(|entry| &entry.metadata)
            .ok_or_else(|| self.unknown(name))
    }

    /// All registered definitions, in registration order.
    pub fn all_definitions(&self) -> impl Iterator<Item = (&str, &OperatorMetadata)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), &entry.metadata))
    }

    /// All registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The error names every known operator, which is usually the fastest
    /// way to spot a typo or a missing registration call.
    fn unknown(&self, name: &str) -> PipelineError {
        PipelineError::UnknownOperator {
            name: name.to_string(),
            available: self.names().join(", "),
        }
    }
}
