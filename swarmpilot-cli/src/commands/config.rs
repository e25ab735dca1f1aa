//! `swarmpilot config ...`

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use swarmpilot_config::{ConfigLoader, SwarmPilotConfig};
use tracing::{error, info};

/// Handle configuration validation
pub fn handle_config_validate(config_file: &Path) -> Result<()> {
    info!("Validating configuration file: {}", config_file.display());

    if !config_file.exists() {
        anyhow::bail!("Configuration file not found: {}", config_file.display());
    }

    match ConfigLoader::new().from_file(config_file) {
        Ok(_) => {
            println!("{} Configuration file is valid", "✓".green());
            Ok(())
        }
        Err(e) => {
            println!("{} Configuration validation failed: {}", "✗".red(), e);
            error!("Configuration validation failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handle configuration generation
pub fn handle_config_generate(output: Option<&Path>, force: bool) -> Result<()> {
    let sample = SwarmPilotConfig::generate_sample();

    let Some(output) = output else {
        print!("{}", sample);
        return Ok(());
    };

    if output.exists() && !force {
        anyhow::bail!(
            "Output file already exists: {}. Use --force to overwrite.",
            output.display()
        );
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    fs::write(output, sample)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("{} Sample configuration written to {}", "✓".green(), output.display());
    Ok(())
}
