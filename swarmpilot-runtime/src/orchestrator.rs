//! Orchestration loop
//!
//! Ticks a [`PhaseScheduler`] on a fixed interval and hands each transition
//! to the [`SwarmController`]. A tick never starts while a control call from
//! the previous one is outstanding, and cancellation is only observed
//! between ticks.

use crate::controller::SwarmController;
use crate::error::OrchestrationError;
use std::time::Duration;
use swarmpilot_core::{PhaseScheduler, Scenario, ScheduleEntry, SchedulerEvent, SimulatedClock};
use swarmpilot_http::{ControlApi, ControlApiError};
use swarmpilot_resilience::{CancelSignal, RetryError};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub phases_completed: usize,
    pub phases_skipped: usize,
    pub control_calls: u64,
    pub elapsed: Duration,
}

pub struct OrchestrationLoop<C> {
    controller: SwarmController<C>,
    clock: SimulatedClock,
    tick_interval: Duration,
}

impl<C: ControlApi> OrchestrationLoop<C> {
    pub fn new(controller: SwarmController<C>, clock: SimulatedClock) -> Self {
        Self {
            controller,
            clock,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Zero is treated as one millisecond
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval.max(Duration::from_millis(1));
        self
    }

    pub fn controller(&self) -> &SwarmController<C> {
        &self.controller
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Run `scenario` to completion
    ///
    /// Returns once the last phase has ended and the load generator has been
    /// stopped. On a control API failure (including a failed final stop) or
    /// cancellation one best-effort stop is issued before returning the error.
    pub async fn run(
        &mut self,
        scenario: Scenario,
        mut cancel: CancelSignal,
    ) -> Result<RunSummary, OrchestrationError> {
        let phase_count = scenario.len();
        let mut scheduler = PhaseScheduler::new(scenario, self.clock);
        let mut progress = Progress::default();

        info!(
            phases = phase_count,
            tick_interval = ?self.tick_interval,
            day_length = ?self.clock.day_length(),
            "Starting orchestration"
        );

        let origin = Instant::now();
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                _ = ticker.tick() => {}
            }
            if cancel.is_cancelled() {
                return Err(self.abandon_cancelled().await);
            }

            let elapsed = origin.elapsed();
            let events = scheduler.poll(elapsed);

            for event in &events {
                progress.record(event, elapsed)?;
                if let SchedulerEvent::Activated(entry) = event {
                    self.apply(Some(entry)).await?;
                }
            }

            if scheduler.is_completed() {
                if progress.phases_completed + progress.phases_skipped != phase_count {
                    let _ = self.controller.shutdown().await;
                    return Err(OrchestrationError::InvariantViolation(format!(
                        "scenario completed after accounting for {} of {} phases",
                        progress.phases_completed + progress.phases_skipped,
                        phase_count
                    )));
                }

                if let Err(e) = self.controller.finish().await {
                    let failure = control_failure(None, e);
                    error!(error = %failure, "Final stop failed after retries");
                    let _ = self.controller.shutdown().await;
                    return Err(failure);
                }

                let summary = RunSummary {
                    phases_completed: progress.phases_completed,
                    phases_skipped: progress.phases_skipped,
                    control_calls: self.controller.control_calls(),
                    elapsed,
                };
                info!(
                    phases_completed = summary.phases_completed,
                    phases_skipped = summary.phases_skipped,
                    control_calls = summary.control_calls,
                    elapsed = ?summary.elapsed,
                    "Scenario completed"
                );
                return Ok(summary);
            }

            let current = scheduler.current_entry().cloned();
            self.apply(current.as_ref()).await?;

            if let Some(next) = scheduler.next_transition() {
                debug!(next_transition = ?next, "Tick done");
            }
        }
    }

    async fn apply(&mut self, entry: Option<&ScheduleEntry>) -> Result<(), OrchestrationError> {
        match self.controller.apply(entry).await {
            Ok(()) => Ok(()),
            Err(e) => {
                let failure = control_failure(entry.map(|entry| entry.phase_index), e);
                error!(error = %failure, "Aborting run");
                // Best effort; the original failure is what gets reported
                let _ = self.controller.shutdown().await;
                Err(failure)
            }
        }
    }

    async fn abandon_cancelled(&mut self) -> OrchestrationError {
        warn!("Run cancelled, stopping load generator");
        let final_stop_ok = self.controller.shutdown().await.is_ok();
        OrchestrationError::Cancelled { final_stop_ok }
    }
}

fn control_failure(phase_index: Option<usize>, e: RetryError<ControlApiError>) -> OrchestrationError {
    OrchestrationError::ControlApi {
        phase_index,
        attempts: e.attempts(),
        source: e.into_inner(),
    }
}

/// Per-run bookkeeping of scheduler events
#[derive(Debug, Default)]
struct Progress {
    phases_completed: usize,
    phases_skipped: usize,
    last_phase: Option<usize>,
}

impl Progress {
    /// Log `event` and check that phases only ever move forward
    fn record(&mut self, event: &SchedulerEvent, elapsed: Duration) -> Result<(), OrchestrationError> {
        if event.at() > elapsed {
            return Err(OrchestrationError::InvariantViolation(format!(
                "event at {:?} reported before it was due (elapsed {:?})",
                event.at(),
                elapsed
            )));
        }

        if let Some(index) = event.phase_index() {
            if let Some(last) = self.last_phase {
                if index < last {
                    return Err(OrchestrationError::InvariantViolation(format!(
                        "phase {} reported after phase {}",
                        index, last
                    )));
                }
            }
            self.last_phase = Some(index);
        }

        match event {
            SchedulerEvent::Activated(entry) => info!(
                phase = entry.phase_index,
                n_users = entry.phase.n_users,
                spawn_rate = entry.phase.spawn_rate,
                start = ?entry.effective_start,
                end = ?entry.effective_end,
                "Phase active"
            ),
            SchedulerEvent::Waiting {
                phase_index,
                at,
                until,
            } => info!(
                phase = phase_index,
                at = ?at,
                until = ?until,
                "Phase waiting for its next day window"
            ),
            SchedulerEvent::Skipped { phase_index, at } => {
                self.phases_skipped += 1;
                info!(phase = phase_index, at = ?at, "Phase skipped, none of its days remain");
            }
            SchedulerEvent::PhaseCompleted { phase_index, at } => {
                self.phases_completed += 1;
                info!(phase = phase_index, at = ?at, "Phase completed");
            }
            SchedulerEvent::ScenarioCompleted { at } => {
                debug!(at = ?at, "Scheduler reached the end of the scenario");
            }
        }
        Ok(())
    }
}
