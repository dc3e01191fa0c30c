//! # Cascade Core
//!
//! Core types shared by every Cascade crate.
//!
//! ## Key Components
//!
//! - **Identifiers**: [`JobId`], the stable handle of a job across renames
//! - **Names**: [`ParameterName`], a validated parameter name unique within a job
//! - **Job identity**: [`JobHandle`] and [`JobIdentity`], the handle a parameter
//!   holds and the identity it re-resolves on every evaluation
//!
//! ## Usage
//!
//! ```rust
//! use cascade_core::{JobHandle, JobIdentity, ParameterName};
//!
//! let handle = JobHandle::new();
//! let identity = JobIdentity::new("MyJob");
//! let name: ParameterName = "param001".parse().unwrap();
//! assert_eq!(identity.name, "MyJob");
//! assert_eq!(name.as_str(), "param001");
//! assert!(!handle.id().is_nil());
//! ```

pub mod id;
pub mod job;
pub mod keys;

pub use id::*;
pub use job::{JobHandle, JobIdentity};
pub use keys::{ParameterName, ParameterNameError};

/// Common prelude for Cascade crates
pub mod prelude {
    pub use super::{JobHandle, JobId, JobIdentity, ParameterName, ParameterNameError};
}
