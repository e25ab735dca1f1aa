//! Simulated-time compression
//!
//! One simulated day is squeezed into a fixed real-time window. Day `d`
//! (1-indexed) covers `[(d-1)·H, d·H)` after orchestration start, where `H`
//! is the real length of a simulated day. Day indices are absolute: day 8
//! is the eighth window, there is no weekly wrap-around.

use crate::error::InvalidDayError;
use std::time::{Duration, Instant};

/// Real hours standing in for one simulated day unless configured otherwise
pub const DEFAULT_REAL_HOURS_PER_SIMULATED_DAY: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedClock {
    day_length: Duration,
}

impl Default for SimulatedClock {
    fn default() -> Self {
        Self {
            day_length: Duration::from_secs(DEFAULT_REAL_HOURS_PER_SIMULATED_DAY * 3600),
        }
    }
}

impl SimulatedClock {
    /// Returns `None` for a zero-length day.
    pub fn new(day_length: Duration) -> Option<Self> {
        (!day_length.is_zero()).then_some(Self { day_length })
    }

    pub fn day_length(&self) -> Duration {
        self.day_length
    }

    /// Real-time window `(start, end)` of simulated `day`, as offsets from
    /// orchestration start
    pub fn simulated_window(&self, day: u32) -> Result<(Duration, Duration), InvalidDayError> {
        if day < 1 {
            return Err(InvalidDayError { day });
        }

        let start = self.day_length.saturating_mul(day - 1);
        let end = self.day_length.saturating_mul(day);
        Ok((start, end))
    }

    /// Simulated day containing `offset`
    pub fn day_at(&self, offset: Duration) -> u32 {
        let index = offset.as_nanos() / self.day_length.as_nanos();
        u32::try_from(index).map_or(u32::MAX, |i| i.saturating_add(1))
    }
}

/// How far into the run `now` is; zero if `now` precedes `origin`
pub fn elapsed(origin: Instant, now: Instant) -> Duration {
    now.saturating_duration_since(origin)
}
