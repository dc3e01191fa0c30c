//! Job handles and the identity a script is allowed to read.

use serde::{Deserialize, Serialize};

use crate::id::JobId;

/// Stable reference to the job that owns a set of parameters.
///
/// The handle never carries the job's name: names change on rename, so the
/// current [`JobIdentity`] is looked up from the handle each time a script
/// runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobHandle(JobId);

impl JobHandle {
    /// A handle for a freshly created job.
    #[must_use]
    pub fn new() -> Self {
        Self(JobId::v4())
    }

    /// Wrap an existing job id.
    #[must_use]
    pub fn from_id(id: JobId) -> Self {
        Self(id)
    }

    /// The underlying job id.
    #[must_use]
    pub fn id(&self) -> JobId {
        self.0
    }
}

impl Default for JobHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "job:{}", self.0)
    }
}

/// Identity-bearing attributes of a job at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobIdentity {
    /// Short name of the job.
    pub name: String,
    /// Name qualified by any enclosing folders (`folder/job`).
    pub full_name: String,
    /// Where the job can be reached, if the host exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl JobIdentity {
    /// An identity for a top-level job, where the full name equals the name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            full_name: name.clone(),
            name,
            url: None,
        }
    }

    /// Set the qualified name.
    #[must_use]
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    /// Set the job URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Placeholder used when the host can no longer resolve a job.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new("")
    }

    /// Whether this is the [`unknown`](Self::unknown) placeholder.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.name.is_empty()
    }
}
