#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use swarmpilot_http::{ControlApi, ControlApiError, HttpResult, SwarmStatus};
use tokio::time::Instant;

pub const HOST: &str = "http://frontend:80";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Start { users: u32, spawn_rate: f64, host: String },
    Stop,
}

pub fn start(users: u32, spawn_rate: f64) -> Call {
    Call::Start {
        users,
        spawn_rate,
        host: HOST.to_string(),
    }
}

/// In-memory control API recording every attempted call with its offset
/// from construction
pub struct RecordingApi {
    origin: Instant,
    calls: Mutex<Vec<(Duration, Call)>>,
    start_script: Mutex<VecDeque<HttpResult<()>>>,
    stop_failures: Mutex<VecDeque<ControlApiError>>,
    status_queries: Mutex<u32>,
    running: Mutex<Option<u32>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            calls: Mutex::new(Vec::new()),
            start_script: Mutex::new(VecDeque::new()),
            stop_failures: Mutex::new(VecDeque::new()),
            status_queries: Mutex::new(0),
            running: Mutex::new(None),
        }
    }

    /// Fail the next start/update attempts, one error per attempt
    pub fn fail_starts(self, errors: impl IntoIterator<Item = ControlApiError>) -> Self {
        self.script_starts(errors.into_iter().map(Err))
    }

    /// Outcomes of the next start/update attempts, in order
    pub fn script_starts(self, outcomes: impl IntoIterator<Item = HttpResult<()>>) -> Self {
        self.start_script.lock().unwrap().extend(outcomes);
        self
    }

    pub fn fail_stops(self, errors: impl IntoIterator<Item = ControlApiError>) -> Self {
        self.stop_failures.lock().unwrap().extend(errors);
        self
    }

    pub fn timed_calls(&self) -> Vec<(Duration, Call)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.timed_calls().into_iter().map(|(_, call)| call).collect()
    }

    pub fn status_queries(&self) -> u32 {
        *self.status_queries.lock().unwrap()
    }

    fn record(&self, call: Call) {
        self.calls
            .lock()
            .unwrap()
            .push((self.origin.elapsed(), call));
    }
}

#[async_trait]
impl ControlApi for RecordingApi {
    async fn start_or_update(
        &self,
        target_users: u32,
        spawn_rate: f64,
        target_host: &str,
    ) -> HttpResult<()> {
        self.record(Call::Start {
            users: target_users,
            spawn_rate,
            host: target_host.to_string(),
        });
        if let Some(Err(error)) = self.start_script.lock().unwrap().pop_front() {
            return Err(error);
        }
        *self.running.lock().unwrap() = Some(target_users);
        Ok(())
    }

    async fn stop(&self) -> HttpResult<()> {
        self.record(Call::Stop);
        if let Some(error) = self.stop_failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        *self.running.lock().unwrap() = None;
        Ok(())
    }

    async fn status(&self) -> HttpResult<SwarmStatus> {
        *self.status_queries.lock().unwrap() += 1;
        Ok(match *self.running.lock().unwrap() {
            Some(users) => SwarmStatus {
                active: true,
                current_users: users,
            },
            None => SwarmStatus::idle(),
        })
    }
}

pub fn unavailable() -> ControlApiError {
    ControlApiError::Transient {
        operation: "swarm",
        message: "HTTP 503 Service Unavailable".to_string(),
        retry_after: Some(Duration::from_secs(2)),
    }
}
