//! # Cascade Parameter
//!
//! Parameters whose values are computed by scripts.
//!
//! A [`ParameterDef`] owns a [`ScriptRef`](cascade_script::ScriptRef), the
//! names of the parameters it reads and how the host should render it.
//! Evaluating it against an [`EvaluationContext`] runs the script through a
//! [`ScriptExecutor`](cascade_script::ScriptExecutor) and normalizes the
//! output into a [`RenderedResult`]. Failures never escape: the parameter
//! renders empty and the failure is logged.
//!
//! [`ParameterCollection`] is the persisted form. Script text survives a
//! save/load round trip byte-for-byte.

pub mod collection;
pub mod context;
pub mod def;
pub mod error;
pub mod kind;
pub mod metadata;
pub mod option;
pub mod render;
pub mod result;
pub mod types;
pub mod values;

pub use collection::ParameterCollection;
pub use context::EvaluationContext;
pub use def::ParameterDef;
pub use error::ParameterError;
pub use kind::ParameterKind;
pub use result::RenderedResult;
pub use values::{BoundValues, ParameterValues, RawValues};

pub mod prelude {
    pub use crate::collection::ParameterCollection;
    pub use crate::context::EvaluationContext;
    pub use crate::def::ParameterDef;
    pub use crate::error::ParameterError;
    pub use crate::kind::ParameterKind;
    pub use crate::metadata::ParameterMetadata;
    pub use crate::option::{Choice, MappingEntry};
    pub use crate::render::{ChoiceRenderType, DynamicRenderType, RenderType};
    pub use crate::result::RenderedResult;
    pub use crate::values::{BoundValues, ParameterValues, RawValues};

    pub use crate::types::*;
}
