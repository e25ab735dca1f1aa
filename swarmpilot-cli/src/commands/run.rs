//! `swarmpilot run`

use anyhow::{Context, Result};
use colored::Colorize;
use swarmpilot_config::SwarmPilotConfig;
use swarmpilot_core::SimulatedClock;
use swarmpilot_http::{HttpConfig, LocustClient};
use swarmpilot_resilience::{cancel_on_process_signals, cancellation, RetryExecutor};
use swarmpilot_runtime::{load_scenario, OrchestrationLoop, SwarmController};
use tracing::info;

use super::scenario::scenario_source;

pub async fn handle_run(config: &SwarmPilotConfig) -> Result<()> {
    let source = scenario_source(config, None)?;
    let scenario = load_scenario(&source, config.control_api.timeout)
        .await
        .with_context(|| format!("Failed to load scenario from {}", source))?;

    let clock = SimulatedClock::new(config.orchestration.day_length())
        .context("real_hours_per_simulated_day must be greater than 0")?;

    let client = LocustClient::new(HttpConfig::from(config.control_api.clone()))
        .context("Failed to create control API client")?;
    info!(
        control_url = %client.base_url(),
        target_host = %config.orchestration.target_host,
        "Using load generator"
    );

    let controller = SwarmController::new(
        client,
        config.orchestration.target_host.clone(),
        RetryExecutor::new(config.retry.clone()),
    )
    .with_status_confirmation(config.control_api.confirm_with_status);

    let mut orchestration = OrchestrationLoop::new(controller, clock)
        .with_tick_interval(config.orchestration.tick_interval);

    let (handle, signal) = cancellation();
    let signal_task = cancel_on_process_signals(handle);

    let outcome = orchestration.run(scenario, signal).await;
    signal_task.abort();
    let summary = outcome?;

    println!(
        "{} Scenario completed in {:?}: {} phase(s) completed, {} skipped, {} control call(s)",
        "✓".green(),
        summary.elapsed,
        summary.phases_completed,
        summary.phases_skipped,
        summary.control_calls
    );
    Ok(())
}
