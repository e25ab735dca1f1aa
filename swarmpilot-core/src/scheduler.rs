//! Phase scheduler
//!
//! [`PhaseScheduler`] walks a [`Scenario`] strictly in document order. It is
//! driven by [`PhaseScheduler::poll`] with the elapsed real time since the
//! run started and returns every transition that became due, in order.
//!
//! Entry times are logical: the phase after `i` starts at phase `i`'s
//! `effective_end`, not at whichever tick noticed the expiry. A late or
//! coarse tick therefore replays the transitions it missed instead of
//! dropping phases, and the timeline never drifts.
//!
//! Phases with `days` are active only inside their simulated-day windows.
//! Consecutive matching days form one window. Between windows the phase
//! waits; once none of its days remain ahead, it is completed (or skipped,
//! if it never got a window) and the next phase is entered.

use crate::clock::SimulatedClock;
use crate::scenario::{Phase, Scenario};
use std::time::Duration;

/// One active window of a phase, as offsets from the run start
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub phase_index: usize,
    pub phase: Phase,
    pub effective_start: Duration,
    pub effective_end: Duration,
}

impl ScheduleEntry {
    pub fn duration(&self) -> Duration {
        self.effective_end.saturating_sub(self.effective_start)
    }

    pub fn contains(&self, offset: Duration) -> bool {
        self.effective_start <= offset && offset < self.effective_end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    NotStarted,
    ActivePhase(usize),
    WaitingForWindow(usize),
    Completed,
}

/// Transition reported by [`PhaseScheduler::poll`]
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerEvent {
    /// A phase window opened
    Activated(ScheduleEntry),

    /// A day-constrained phase is idle until its next matching day
    Waiting {
        phase_index: usize,
        at: Duration,
        until: Duration,
    },

    /// A day-constrained phase had no matching day left when entered
    Skipped { phase_index: usize, at: Duration },

    PhaseCompleted { phase_index: usize, at: Duration },

    ScenarioCompleted { at: Duration },
}

impl SchedulerEvent {
    /// Logical offset at which the transition happened
    pub fn at(&self) -> Duration {
        match self {
            SchedulerEvent::Activated(entry) => entry.effective_start,
            SchedulerEvent::Waiting { at, .. }
            | SchedulerEvent::Skipped { at, .. }
            | SchedulerEvent::PhaseCompleted { at, .. }
            | SchedulerEvent::ScenarioCompleted { at } => *at,
        }
    }

    pub fn phase_index(&self) -> Option<usize> {
        match self {
            SchedulerEvent::Activated(entry) => Some(entry.phase_index),
            SchedulerEvent::Waiting { phase_index, .. }
            | SchedulerEvent::Skipped { phase_index, .. }
            | SchedulerEvent::PhaseCompleted { phase_index, .. } => Some(*phase_index),
            SchedulerEvent::ScenarioCompleted { .. } => None,
        }
    }
}

/// Where a day-constrained phase stands at a given offset
enum DayWindow {
    OpenUntil(Duration),
    OpensAt(Duration),
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct PhaseScheduler {
    scenario: Scenario,
    clock: SimulatedClock,
    state: SchedulerState,
    current: Option<ScheduleEntry>,
    waiting_until: Option<Duration>,
    /// Whether the phase at the current index has had a window yet
    had_window: bool,
    completed_at: Option<Duration>,
}

impl PhaseScheduler {
    pub fn new(scenario: Scenario, clock: SimulatedClock) -> Self {
        Self {
            scenario,
            clock,
            state: SchedulerState::NotStarted,
            current: None,
            waiting_until: None,
            had_window: false,
            completed_at: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn clock(&self) -> &SimulatedClock {
        &self.clock
    }

    /// The window that should be driving load right now, if any
    pub fn current_entry(&self) -> Option<&ScheduleEntry> {
        self.current.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.state == SchedulerState::Completed
    }

    /// Logical offset at which the last phase finished
    pub fn completed_at(&self) -> Option<Duration> {
        self.completed_at
    }

    /// Offset of the next transition, `None` before the first poll and
    /// after completion
    pub fn next_transition(&self) -> Option<Duration> {
        match self.state {
            SchedulerState::ActivePhase(_) => self.current.as_ref().map(|e| e.effective_end),
            SchedulerState::WaitingForWindow(_) => self.waiting_until,
            SchedulerState::NotStarted | SchedulerState::Completed => None,
        }
    }

    /// Advance to `elapsed`, returning every transition due up to it
    pub fn poll(&mut self, elapsed: Duration) -> Vec<SchedulerEvent> {
        let mut events = Vec::new();

        if self.state == SchedulerState::NotStarted {
            self.enter(0, Duration::ZERO, &mut events);
        }

        loop {
            match self.state {
                SchedulerState::ActivePhase(index) => {
                    let Some(end) = self.current.as_ref().map(|e| e.effective_end) else {
                        break;
                    };
                    if elapsed < end {
                        break;
                    }
                    self.current = None;
                    if self.is_day_constrained(index) {
                        self.resume(index, end, &mut events);
                    } else {
                        events.push(SchedulerEvent::PhaseCompleted {
                            phase_index: index,
                            at: end,
                        });
                        self.enter(index + 1, end, &mut events);
                    }
                }
                SchedulerState::WaitingForWindow(index) => {
                    let Some(until) = self.waiting_until else {
                        break;
                    };
                    if elapsed < until {
                        break;
                    }
                    self.waiting_until = None;
                    self.resume(index, until, &mut events);
                }
                SchedulerState::NotStarted | SchedulerState::Completed => break,
            }
        }

        events
    }

    fn is_day_constrained(&self, index: usize) -> bool {
        self.scenario
            .get(index)
            .is_some_and(Phase::is_day_constrained)
    }

    /// Enter phase `index` at `at`, skipping day-constrained phases that
    /// have no window left
    fn enter(&mut self, mut index: usize, at: Duration, events: &mut Vec<SchedulerEvent>) {
        loop {
            let Some(phase) = self.scenario.get(index).cloned() else {
                self.state = SchedulerState::Completed;
                self.completed_at = Some(at);
                events.push(SchedulerEvent::ScenarioCompleted { at });
                return;
            };

            self.had_window = false;

            if !phase.is_day_constrained() {
                let end = at.saturating_add(phase.duration());
                self.activate(index, phase, at, end, events);
                return;
            }

            match self.day_window(&phase, at) {
                DayWindow::OpenUntil(end) => {
                    self.activate(index, phase, at, end, events);
                    return;
                }
                DayWindow::OpensAt(until) => {
                    self.wait(index, at, until, events);
                    return;
                }
                DayWindow::Exhausted => {
                    events.push(SchedulerEvent::Skipped {
                        phase_index: index,
                        at,
                    });
                    index += 1;
                }
            }
        }
    }

    /// Re-evaluate day-constrained phase `index` after a window boundary
    fn resume(&mut self, index: usize, at: Duration, events: &mut Vec<SchedulerEvent>) {
        let Some(phase) = self.scenario.get(index).cloned() else {
            self.enter(index, at, events);
            return;
        };

        match self.day_window(&phase, at) {
            DayWindow::OpenUntil(end) => self.activate(index, phase, at, end, events),
            DayWindow::OpensAt(until) => self.wait(index, at, until, events),
            DayWindow::Exhausted => {
                let event = if self.had_window {
                    SchedulerEvent::PhaseCompleted {
                        phase_index: index,
                        at,
                    }
                } else {
                    SchedulerEvent::Skipped {
                        phase_index: index,
                        at,
                    }
                };
                events.push(event);
                self.enter(index + 1, at, events);
            }
        }
    }

    fn activate(
        &mut self,
        index: usize,
        phase: Phase,
        start: Duration,
        end: Duration,
        events: &mut Vec<SchedulerEvent>,
    ) {
        let entry = ScheduleEntry {
            phase_index: index,
            phase,
            effective_start: start,
            effective_end: end,
        };
        self.state = SchedulerState::ActivePhase(index);
        self.had_window = true;
        self.current = Some(entry.clone());
        events.push(SchedulerEvent::Activated(entry));
    }

    fn wait(&mut self, index: usize, at: Duration, until: Duration, events: &mut Vec<SchedulerEvent>) {
        self.state = SchedulerState::WaitingForWindow(index);
        self.waiting_until = Some(until);
        events.push(SchedulerEvent::Waiting {
            phase_index: index,
            at,
            until,
        });
    }

    fn day_window(&self, phase: &Phase, at: Duration) -> DayWindow {
        let Some(days) = phase.days.as_ref() else {
            return DayWindow::Exhausted;
        };
        let today = self.clock.day_at(at);

        let Some(&next_day) = days.range(today..).next() else {
            return DayWindow::Exhausted;
        };

        if next_day > today {
            // A saturated window start can never be reached
            return match self.clock.simulated_window(next_day) {
                Ok((start, _)) if start > at => DayWindow::OpensAt(start),
                _ => DayWindow::Exhausted,
            };
        }

        let mut last_day = today;
        while days.contains(&(last_day + 1)) {
            last_day += 1;
        }
        match self.clock.simulated_window(last_day) {
            Ok((_, end)) if end > at => DayWindow::OpenUntil(end),
            _ => DayWindow::Exhausted,
        }
    }
}

/// The complete timeline of a scenario: every window that will open, in order
pub fn plan(scenario: &Scenario, clock: SimulatedClock) -> Vec<ScheduleEntry> {
    let mut scheduler = PhaseScheduler::new(scenario.clone(), clock);
    scheduler
        .poll(Duration::MAX)
        .into_iter()
        .filter_map(|event| match event {
            SchedulerEvent::Activated(entry) => Some(entry),
            _ => None,
        })
        .collect()
}
