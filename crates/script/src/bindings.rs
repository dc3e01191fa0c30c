//! Values visible to a running script.

use cascade_core::JobIdentity;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Whatever a script returned, before normalization.
pub type RawValue = serde_json::Value;

/// Named values plus the enclosing job's identity, as handed to the runner.
///
/// Values keep insertion order; the job identity is kept apart so a
/// parameter can never shadow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bindings {
    values: IndexMap<String, RawValue>,
    job: JobIdentity,
}

impl Bindings {
    /// Empty bindings for the given job.
    pub fn new(job: JobIdentity) -> Self {
        Self {
            values: IndexMap::new(),
            job,
        }
    }

    /// Add a value.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: RawValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, name: impl Into<String>, value: RawValue) {
        self.values.insert(name.into(), value);
    }

    /// Look up a value.
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.values.get(name)
    }

    /// Whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// All values in insertion order.
    pub fn values(&self) -> &IndexMap<String, RawValue> {
        &self.values
    }

    /// The job identity.
    pub fn job(&self) -> &JobIdentity {
        &self.job
    }

    /// Number of bound values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values are bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Layer catalog arguments over these bindings.
    ///
    /// Precedence, lowest first: the catalog entry's declared defaults, the
    /// values already bound, the reference's own arguments.
    pub(crate) fn layered(
        &self,
        defaults: &IndexMap<String, String>,
        arguments: &IndexMap<String, String>,
    ) -> Self {
        let mut merged = Self::new(self.job.clone());
        for (name, value) in defaults {
            merged.insert(name.clone(), RawValue::String(value.clone()));
        }
        for (name, value) in &self.values {
            merged.insert(name.clone(), value.clone());
        }
        for (name, value) in arguments {
            merged.insert(name.clone(), RawValue::String(value.clone()));
        }
        merged
    }
}
