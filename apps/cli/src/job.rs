//! The job file the commands read.

use std::path::Path;

use anyhow::Context;
use cascade_core::JobIdentity;
use cascade_parameter::{ParameterDef, RawValues};
use cascade_script::CatalogEntry;
use indexmap::IndexMap;
use serde::Deserialize;

/// A job's parameters plus everything needed to resolve them offline.
#[derive(Debug, Deserialize)]
pub struct JobFile {
    pub job: JobSection,
    pub parameters: Vec<ParameterDef>,
    /// Values submitted for the pass.
    #[serde(default)]
    pub values: RawValues,
    /// Catalog scripts by id.
    #[serde(default)]
    pub catalog: IndexMap<String, CatalogEntry>,
}

#[derive(Debug, Deserialize)]
pub struct JobSection {
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl JobSection {
    pub fn identity(&self) -> JobIdentity {
        let mut identity = JobIdentity::new(&self.name);
        if let Some(full_name) = &self.full_name {
            identity = identity.with_full_name(full_name);
        }
        if let Some(url) = &self.url {
            identity = identity.with_url(url);
        }
        identity
    }
}

impl JobFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("invalid job file {}", path.display()))
    }
}
