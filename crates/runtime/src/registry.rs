//! In-memory job registry.

use async_trait::async_trait;
use cascade_core::{JobHandle, JobIdentity};
use dashmap::DashMap;

use crate::error::RuntimeError;
use crate::identity::JobIdentityResolver;

/// Thread-safe map from job handle to the job's current identity.
///
/// Renames replace the stored identity in place; handles never change.
/// Backs the command line and the tests, and is a reasonable resolver for
/// any host that keeps its jobs in memory.
///
/// # Examples
///
/// ```rust,ignore
/// let registry = InMemoryJobRegistry::new();
/// let handle = registry.register(JobIdentity::new("MyJob"));
/// registry.rename(&handle, "MyJobRenamed")?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryJobRegistry {
    jobs: DashMap<JobHandle, JobIdentity>,
}

impl InMemoryJobRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job under a fresh handle.
    pub fn register(&self, identity: JobIdentity) -> JobHandle {
        let handle = JobHandle::new();
        self.register_as(handle, identity);
        handle
    }

    /// Register a job under an existing handle, replacing any identity
    /// already stored for it.
    pub fn register_as(&self, handle: JobHandle, identity: JobIdentity) {
        tracing::debug!(job = %handle, name = %identity.name, "registered job");
        self.jobs.insert(handle, identity);
    }

    /// Rename a job and return its previous identity.
    ///
    /// The last segment of the full name follows the rename; enclosing
    /// folders are kept.
    pub fn rename(
        &self,
        handle: &JobHandle,
        new_name: impl Into<String>,
    ) -> Result<JobIdentity, RuntimeError> {
        let mut entry = self
            .jobs
            .get_mut(handle)
            .ok_or(RuntimeError::JobNotRegistered { handle: *handle })?;
        let previous = entry.value().clone();
        let new_name = new_name.into();

        let full_name = match previous.full_name.rsplit_once('/') {
            Some((folder, _)) => format!("{folder}/{new_name}"),
            None => new_name.clone(),
        };
        let identity = entry.value_mut();
        identity.name = new_name;
        identity.full_name = full_name;

        tracing::info!(
            job = %handle,
            from = %previous.name,
            to = %identity.name,
            "renamed job"
        );
        Ok(previous)
    }

    /// The current identity of a job.
    #[must_use]
    pub fn get(&self, handle: &JobHandle) -> Option<JobIdentity> {
        self.jobs.get(handle).map(|entry| entry.value().clone())
    }

    /// Check if a job is registered.
    #[must_use]
    pub fn contains(&self, handle: &JobHandle) -> bool {
        self.jobs.contains_key(handle)
    }

    /// Remove a job. Returns its last identity, if any.
    pub fn remove(&self, handle: &JobHandle) -> Option<JobIdentity> {
        self.jobs.remove(handle).map(|(_, identity)| identity)
    }

    /// Number of registered jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[async_trait]
impl JobIdentityResolver for InMemoryJobRegistry {
    async fn current_identity(&self, job: &JobHandle) -> Option<JobIdentity> {
        self.get(job)
    }
}
