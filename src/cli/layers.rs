//! Layering commands (resolve, check)

use anyhow::Result;

use super::app::InputArgs;
use super::output::Output;
use crate::domain::{resolve_with, Diagnosis};
use crate::storage::Config;

/// Resolve nodes and print the layers
pub fn resolve(output: &Output, config: &Config, input: &InputArgs, flat: bool) -> Result<()> {
    let nodes = input.load()?;
    let policy = input.policy(config);
    tracing::debug!(count = nodes.len(), policy = policy.as_str(), "resolving");

    let solution = resolve_with(&nodes, policy)?;
    tracing::debug!(layers = solution.len(), "resolved");

    if output.is_json() {
        if flat {
            let order: Vec<_> = solution.flatten().into_iter().map(|n| n.name.as_str()).collect();
            output.data(&serde_json::json!({ "order": order }));
        } else {
            output.data(&solution);
        }
    } else if flat {
        for node in solution.flatten() {
            println!("{}", node.name);
        }
    } else {
        print!("{}", solution);
    }

    Ok(())
}

/// Diagnose nodes, then try to resolve them
pub fn check(output: &Output, config: &Config, input: &InputArgs) -> Result<()> {
    let nodes = input.load()?;
    let diagnosis = Diagnosis::of(&nodes);
    let result = resolve_with(&nodes, input.policy(config));

    if output.is_json() {
        output.data(&serde_json::json!({
            "nodes": nodes.len(),
            "clean": diagnosis.is_clean(),
            "duplicates": diagnosis.duplicates,
            "unknown": diagnosis.unknown,
            "cycles": diagnosis.cycles,
            "resolved": result.is_ok(),
            "layers": result.as_ref().ok().map(|s| s.len()),
            "error": result.as_ref().err().map(|e| e.to_string()),
        }));
    } else {
        println!("Checked {} node(s)", nodes.len());
        for name in &diagnosis.duplicates {
            println!("  duplicate: {}", name);
        }
        for unknown in &diagnosis.unknown {
            println!("  unknown:   {} -> {}", unknown.node, unknown.dependency);
        }
        for cycle in &diagnosis.cycles {
            println!("  cycle:     {}", cycle.join(" <-> "));
        }
        if let Ok(solution) = &result {
            println!("OK: {} layer(s)", solution.len());
        }
    }

    result?;
    Ok(())
}
