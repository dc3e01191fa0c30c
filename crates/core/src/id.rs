//! Unique identifiers for Cascade entities.
//!
//! Identifiers are strongly-typed UUID wrappers generated with
//! [`domain-key`](https://crates.io/crates/domain-key). They are `Copy`,
//! serialize as UUID strings, and support `v4()`, `nil()` and parsing.

use domain_key::define_uuid;

pub use domain_key::UuidParseError;

// A job keeps its id across renames; only its display name changes.
define_uuid!(pub JobIdDomain => JobId);
