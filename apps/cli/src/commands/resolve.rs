use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use cascade_parameter::ParameterCollection;
use cascade_runtime::{EngineConfig, InMemoryJobRegistry, ResolutionEngine};
use cascade_script::{InMemoryCatalog, InProcessSandbox};
use serde_json::Value;

use crate::job::JobFile;

pub async fn run(
    path: &Path,
    config: Option<&Path>,
    values: Vec<(String, Value)>,
    strict: bool,
) -> anyhow::Result<()> {
    let file = JobFile::load(path)?;
    let collection = ParameterCollection::try_from_defs(file.parameters)
        .with_context(|| format!("invalid parameters in {}", path.display()))?;

    let config = match config {
        Some(config) => EngineConfig::from_file(config)?,
        None => EngineConfig::default(),
    }
    .with_env_overrides()?;

    let registry = Arc::new(InMemoryJobRegistry::new());
    let job = registry.register(file.job.identity());

    let catalog = InMemoryCatalog::new();
    for (id, entry) in file.catalog {
        catalog.insert(id, entry);
    }

    let sandbox = InProcessSandbox::json_literal();
    let sandbox = if strict { sandbox } else { sandbox.approve_all() };

    let engine = ResolutionEngine::from_config(
        &config,
        Arc::new(sandbox),
        Some(Arc::new(catalog)),
        registry,
    )?;

    let mut raw_values = file.values;
    for (name, value) in values {
        raw_values.set(name, value);
    }

    tracing::info!(job = %job, parameters = collection.len(), "resolving job file");
    let snapshot = engine.resolve_pass(&job, collection.as_slice(), &raw_values).await;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
