//! `swarmpilot generate`

use crate::cli::GenerateArgs;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use swarmpilot_core::generator::{preset, presets, to_configmap_yaml, to_scenario_json, ConfigMapMeta};
use tracing::info;

pub fn handle_generate(args: &GenerateArgs) -> Result<()> {
    if args.list {
        for preset in presets() {
            println!(
                "{:<12} {:<7} spawn_rate={}",
                preset.name,
                preset.kind_label(),
                preset.spawn_rate
            );
        }
        return Ok(());
    }

    let name = args
        .preset
        .as_deref()
        .context("A preset name is required (see --list)")?;
    let (json_path, yaml_path) = write_preset(args, name)?;

    println!("{} Scenario written to {}", "✓".green(), json_path.display());
    println!("{} ConfigMap written to {}", "✓".green(), yaml_path.display());
    Ok(())
}

fn write_preset(args: &GenerateArgs, name: &str) -> Result<(PathBuf, PathBuf)> {
    let preset = preset(name)?;
    let values = preset.generate(args.seed)?;
    let phases = to_scenario_json(&values, preset.spawn_rate);
    info!(preset = name, minutes = phases.len(), "Generated scenario");

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output directory {}", args.output_dir.display())
    })?;

    let json_path = args.output_dir.join(format!("{}.json", name));
    fs::write(&json_path, serde_json::to_string_pretty(&phases)?)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    let meta = ConfigMapMeta {
        name: args.configmap_name.clone(),
        namespace: args.namespace.clone(),
    };
    let yaml_path = args.output_dir.join(format!("{}.yaml", name));
    fs::write(&yaml_path, to_configmap_yaml(&phases, &meta)?)
        .with_context(|| format!("Failed to write {}", yaml_path.display()))?;

    Ok((json_path, yaml_path))
}
