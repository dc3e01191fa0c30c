use std::path::Path;

use cascade_graph::DependencyGraph;
use serde_json::json;

use crate::job::JobFile;

pub fn run(path: &Path, json: bool) -> anyhow::Result<()> {
    let file = JobFile::load(path)?;
    let plan = DependencyGraph::new(&file.parameters).plan();

    let order: Vec<&str> = plan.order.iter().map(|def| def.name().as_str()).collect();
    let cyclic: Vec<Vec<&str>> = plan
        .cyclic
        .iter()
        .map(|members| members.iter().map(|def| def.name().as_str()).collect())
        .collect();

    if json {
        let out = json!({ "order": order, "cyclic": cyclic });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for name in &order {
        println!("{name}");
    }
    for members in &cyclic {
        println!("cycle: {}", members.join(", "));
    }
    Ok(())
}
