//! The values and job identity one evaluation sees.

use cascade_core::{JobIdentity, ParameterName};
use cascade_script::Bindings;

use crate::values::ParameterValues;

/// Inputs of a single parameter evaluation.
///
/// Built fresh for every evaluation: the job identity is whatever the
/// resolver reported just before, never a copy kept from an earlier run.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationContext {
    bound_values: ParameterValues,
    job: JobIdentity,
}

impl EvaluationContext {
    /// A context over `bound_values` for `job`.
    #[must_use]
    pub fn new(job: JobIdentity, bound_values: ParameterValues) -> Self {
        Self { bound_values, job }
    }

    /// Keep only the values named in `referenced`, in the order they are
    /// referenced. Names without a value stay absent.
    #[must_use]
    pub fn restricted(&self, referenced: &[ParameterName]) -> Self {
        let bound_values = referenced
            .iter()
            .filter_map(|name| {
                self.bound_values
                    .get(name.as_str())
                    .map(|value| (name.as_str(), value.clone()))
            })
            .collect();
        Self {
            bound_values,
            job: self.job.clone(),
        }
    }

    /// The visible values.
    #[must_use]
    pub fn bound_values(&self) -> &ParameterValues {
        &self.bound_values
    }

    /// The job identity.
    #[must_use]
    pub fn job(&self) -> &JobIdentity {
        &self.job
    }

    /// The bindings handed to the script runner.
    #[must_use]
    pub fn to_bindings(&self) -> Bindings {
        let mut bindings = Bindings::new(self.job.clone());
        for (name, value) in self.bound_values.iter() {
            bindings.insert(name, value.clone());
        }
        bindings
    }
}
