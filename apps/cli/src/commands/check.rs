use std::path::Path;

use anyhow::bail;
use cascade_graph::validate_parameters;

use crate::job::JobFile;

pub fn run(path: &Path, json: bool) -> anyhow::Result<()> {
    let file = JobFile::load(path)?;
    let issues = validate_parameters(&file.parameters);

    if json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else if issues.is_empty() {
        println!("ok: {} parameters", file.parameters.len());
    } else {
        for issue in &issues {
            println!("{issue}");
        }
    }

    if !issues.is_empty() {
        bail!("{} configuration issue(s) in {}", issues.len(), path.display());
    }
    Ok(())
}
