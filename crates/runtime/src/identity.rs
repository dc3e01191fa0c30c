//! Port for looking up a job's current identity.

use async_trait::async_trait;
use cascade_core::{JobHandle, JobIdentity};

/// Resolves a job handle to the job's identity as it is right now.
///
/// The engine asks before every single evaluation, so a rename between two
/// evaluations is visible to the second one. `None` means the job could not
/// be found; the engine then evaluates with [`JobIdentity::unknown`].
#[async_trait]
pub trait JobIdentityResolver: Send + Sync {
    /// The current identity of `job`, if it exists.
    async fn current_identity(&self, job: &JobHandle) -> Option<JobIdentity>;
}
