//! Swarm controller
//!
//! Translates "this entry should be active" into control API calls. The
//! controller remembers the last command it successfully issued and skips
//! calls that would not change the load generator's target.

use swarmpilot_core::ScheduleEntry;
use swarmpilot_http::{ControlApi, ControlApiError};
use swarmpilot_resilience::{RetryError, RetryExecutor};
use tracing::{debug, info, warn};

/// What the controller believes the load generator is doing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerStatus {
    Idle,
    Driving { target_users: u32, spawn_rate: f64 },
    Stopping,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState {
    pub status: ControllerStatus,
    /// Entry most recently applied, `None` after a stop
    pub last_applied: Option<ScheduleEntry>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            status: ControllerStatus::Idle,
            last_applied: None,
        }
    }
}

/// Resolved command for the load generator
#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Stop,
    Drive { target_users: u32, spawn_rate: f64 },
}

impl Command {
    fn for_entry(entry: Option<&ScheduleEntry>) -> Self {
        match entry {
            Some(entry) if !entry.phase.is_quiet() => Command::Drive {
                target_users: entry.phase.n_users,
                spawn_rate: entry.phase.spawn_rate,
            },
            _ => Command::Stop,
        }
    }
}

/// Drives a [`ControlApi`] from schedule entries
pub struct SwarmController<C> {
    api: C,
    retry: RetryExecutor,
    target_host: String,
    confirm_with_status: bool,
    state: ControllerState,
    issued: Option<Command>,
    control_calls: u64,
}

impl<C: ControlApi> SwarmController<C> {
    pub fn new(api: C, target_host: impl Into<String>, retry: RetryExecutor) -> Self {
        Self {
            api,
            retry,
            target_host: target_host.into(),
            confirm_with_status: false,
            state: ControllerState::default(),
            issued: None,
            control_calls: 0,
        }
    }

    /// Query the swarm status after each command and warn on disagreement
    pub fn with_status_confirmation(mut self, enabled: bool) -> Self {
        self.confirm_with_status = enabled;
        self
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn api(&self) -> &C {
        &self.api
    }

    pub fn target_host(&self) -> &str {
        &self.target_host
    }

    /// Start/update and stop commands issued so far, retries not counted
    pub fn control_calls(&self) -> u64 {
        self.control_calls
    }

    /// Make `entry` the active load, or stop the swarm for `None`
    ///
    /// A quiet entry (`n_users == 0`) is a stop. Nothing is sent when the
    /// resolved command equals the last successful one. State only changes
    /// once the call succeeds.
    pub async fn apply(
        &mut self,
        entry: Option<&ScheduleEntry>,
    ) -> Result<(), RetryError<ControlApiError>> {
        let command = Command::for_entry(entry);

        if self.issued == Some(command) {
            debug!(?command, "Load generator already at target, no call needed");
            self.state.last_applied = entry.cloned();
            return Ok(());
        }

        self.send(command).await?;

        self.issued = Some(command);
        self.state = ControllerState {
            status: match command {
                Command::Stop => ControllerStatus::Idle,
                Command::Drive {
                    target_users,
                    spawn_rate,
                } => ControllerStatus::Driving {
                    target_users,
                    spawn_rate,
                },
            },
            last_applied: entry.cloned(),
        };

        if self.confirm_with_status {
            self.confirm(command).await;
        }
        Ok(())
    }

    /// Leave the load generator stopped at the end of a run
    ///
    /// Retried like any other command; a no-op when the last command was
    /// already a stop.
    pub async fn finish(&mut self) -> Result<(), RetryError<ControlApiError>> {
        self.apply(None).await
    }

    /// Issue exactly one stop, without retries
    ///
    /// Used when a run is abandoned (cancellation or a fatal error), where
    /// the caller reports the outcome rather than waiting out a backoff.
    pub async fn shutdown(&mut self) -> Result<(), ControlApiError> {
        self.state.status = ControllerStatus::Stopping;
        self.control_calls += 1;

        match self.api.stop().await {
            Ok(()) => {
                info!("Load generator stopped");
                self.issued = Some(Command::Stop);
                self.state = ControllerState::default();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Final stop failed");
                Err(e)
            }
        }
    }

    async fn send(&mut self, command: Command) -> Result<(), RetryError<ControlApiError>> {
        self.control_calls += 1;
        let api = &self.api;
        let host = self.target_host.as_str();

        match command {
            Command::Stop => {
                info!("Stopping load generator");
                self.retry.execute("stop", || api.stop()).await
            }
            Command::Drive {
                target_users,
                spawn_rate,
            } => {
                info!(target_users, spawn_rate, host, "Setting swarm target");
                self.retry
                    .execute("swarm", || api.start_or_update(target_users, spawn_rate, host))
                    .await
            }
        }
    }

    async fn confirm(&self, command: Command) {
        match self.api.status().await {
            Ok(status) => {
                let agrees = match command {
                    Command::Stop => !status.active,
                    Command::Drive { .. } => status.active,
                };
                if !agrees {
                    warn!(
                        ?command,
                        active = status.active,
                        current_users = status.current_users,
                        "Load generator status disagrees with the last command"
                    );
                }
            }
            Err(e) => warn!(error = %e, "Could not confirm load generator status"),
        }
    }
}
