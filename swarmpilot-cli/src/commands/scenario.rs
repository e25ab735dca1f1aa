//! `swarmpilot validate` and `swarmpilot plan`

use crate::cli::PlanFormat;
use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::time::Duration;
use swarmpilot_config::SwarmPilotConfig;
use swarmpilot_core::{plan, Scenario, ScheduleEntry, SimulatedClock};
use swarmpilot_runtime::load_scenario;

/// Scenario to use: an explicit argument wins over configuration
pub fn scenario_source(config: &SwarmPilotConfig, explicit: Option<&str>) -> Result<String> {
    explicit
        .map(str::to_string)
        .or_else(|| config.orchestration.scenario_source.clone())
        .context("No scenario given: pass --scenario or set orchestration.scenario_source")
}

async fn load(config: &SwarmPilotConfig, explicit: Option<&str>) -> Result<Scenario> {
    let source = scenario_source(config, explicit)?;
    load_scenario(&source, config.control_api.timeout)
        .await
        .with_context(|| format!("Failed to load scenario from {}", source))
}

pub async fn handle_validate(config: &SwarmPilotConfig, explicit: Option<&str>) -> Result<()> {
    let scenario = load(config, explicit).await?;
    let constrained = scenario.iter().filter(|p| p.is_day_constrained()).count();

    println!(
        "{} Scenario is valid: {} phase(s), {} day-constrained",
        "✓".green(),
        scenario.len(),
        constrained
    );
    Ok(())
}

pub async fn handle_plan(
    config: &SwarmPilotConfig,
    explicit: Option<&str>,
    format: PlanFormat,
) -> Result<()> {
    let scenario = load(config, explicit).await?;
    let clock = SimulatedClock::new(config.orchestration.day_length())
        .context("real_hours_per_simulated_day must be greater than 0")?;
    let entries = plan(&scenario, clock);

    match format {
        PlanFormat::Text => print!("{}", render_text(&scenario, &entries)),
        PlanFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&render_json(&scenario, &entries))?
        ),
    }
    Ok(())
}

fn skipped_phases(scenario: &Scenario, entries: &[ScheduleEntry]) -> Vec<usize> {
    let planned: BTreeSet<usize> = entries.iter().map(|e| e.phase_index).collect();
    (0..scenario.len()).filter(|i| !planned.contains(i)).collect()
}

fn render_text(scenario: &Scenario, entries: &[ScheduleEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:>7}  {:>10}  {:>10}  {:>10}  days",
        "phase", "users", "spawn_rate", "start", "end"
    );

    for entry in entries {
        let days = match &entry.phase.days {
            Some(days) => days.iter().map(u32::to_string).collect::<Vec<_>>().join(","),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{:>5}  {:>7}  {:>10}  {:>10}  {:>10}  {}",
            entry.phase_index,
            entry.phase.n_users,
            entry.phase.spawn_rate,
            clock_time(entry.effective_start),
            clock_time(entry.effective_end),
            days
        );
    }

    for index in skipped_phases(scenario, entries) {
        let _ = writeln!(out, "{:>5}  skipped: none of its days fall in the run", index);
    }

    if let Some(last) = entries.last() {
        let _ = writeln!(out, "total: {}", clock_time(last.effective_end));
    }
    out
}

fn render_json(scenario: &Scenario, entries: &[ScheduleEntry]) -> JsonValue {
    json!({
        "entries": entries
            .iter()
            .map(|entry| json!({
                "phase_index": entry.phase_index,
                "n_users": entry.phase.n_users,
                "spawn_rate": entry.phase.spawn_rate,
                "start_secs": entry.effective_start.as_secs_f64(),
                "end_secs": entry.effective_end.as_secs_f64(),
            }))
            .collect::<Vec<_>>(),
        "skipped": skipped_phases(scenario, entries),
    })
}

/// `H:MM:SS` offset from run start
fn clock_time(offset: Duration) -> String {
    let secs = offset.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
