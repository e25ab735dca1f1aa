//! Scenario documents
//!
//! A scenario is an ordered array of phases:
//!
//! ```json
//! [
//!   { "n_users": 40,  "spawn_rate": 50, "duration": 15 },
//!   { "n_users": 850, "spawn_rate": 50, "duration": 60, "days": [1, 3] }
//! ]
//! ```
//!
//! `duration` is in minutes. The same array may be written as YAML, or be
//! wrapped in a Kubernetes ConfigMap under `data."scenario.json"`, which is
//! how generated scenarios are shipped to the cluster.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;
use std::time::Duration;

/// ConfigMap key holding the scenario array
pub const CONFIGMAP_SCENARIO_KEY: &str = "scenario.json";

/// Lowest and highest simulated day a phase may name
pub const MIN_DAY: u32 = 1;
pub const MAX_DAY: u32 = 7;

/// One stretch of target load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Target concurrent users; 0 is a quiet period
    pub n_users: u32,

    /// Users started (or stopped) per second while ramping
    pub spawn_rate: f64,

    /// Length of the phase in minutes
    pub duration: f64,

    /// Simulated days the phase is eligible to run on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<BTreeSet<u32>>,
}

impl Phase {
    pub fn new(n_users: u32, spawn_rate: f64, duration_minutes: f64) -> Self {
        Self {
            n_users,
            spawn_rate,
            duration: duration_minutes,
            days: None,
        }
    }

    pub fn on_days(mut self, days: impl IntoIterator<Item = u32>) -> Self {
        self.days = Some(days.into_iter().collect());
        self
    }

    /// Real-time length of an unconstrained phase
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration * 60.0).unwrap_or(Duration::MAX)
    }

    pub fn is_quiet(&self) -> bool {
        self.n_users == 0
    }

    pub fn is_day_constrained(&self) -> bool {
        self.days.is_some()
    }

    /// Whether the phase may run on `day`; unconstrained phases run on any day
    pub fn allows_day(&self, day: u32) -> bool {
        self.days.as_ref().map_or(true, |days| days.contains(&day))
    }
}

/// A validated, non-empty, ordered list of phases
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Scenario {
    phases: Vec<Phase>,
}

impl Scenario {
    /// Validate a structured document (an array of phase objects)
    ///
    /// Phases are checked in order and the first violation is reported.
    pub fn load(document: &JsonValue) -> Result<Self, ValidationError> {
        let elements = document
            .as_array()
            .ok_or_else(|| ValidationError::document("scenario must be an array of phases"))?;

        if elements.is_empty() {
            return Err(ValidationError::document(
                "scenario must contain at least one phase",
            ));
        }

        let phases = elements
            .iter()
            .enumerate()
            .map(|(index, element)| parse_phase(index, element))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { phases })
    }

    /// Validate already-typed phases with the same rules as [`Scenario::load`]
    pub fn from_phases(phases: Vec<Phase>) -> Result<Self, ValidationError> {
        let document = serde_json::to_value(&phases)
            .map_err(|e| ValidationError::document(format!("unserializable phases: {}", e)))?;
        Self::load(&document)
    }

    /// Parse scenario text: a JSON array, a YAML array, or a ConfigMap
    /// (JSON or YAML) carrying the array under `data."scenario.json"`.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let document = match serde_json::from_str::<JsonValue>(text) {
            Ok(value) => value,
            Err(json_err) => serde_yaml::from_str::<JsonValue>(text).map_err(|yaml_err| {
                ValidationError::document(format!(
                    "document is neither JSON ({}) nor YAML ({})",
                    json_err, yaml_err
                ))
            })?,
        };

        match unwrap_configmap(&document)? {
            Some(inner) => Self::load(&inner),
            None => Self::load(&document),
        }
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn get(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index)
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Phase> {
        self.phases.iter()
    }

    /// Sum of the durations of phases without a `days` constraint
    pub fn total_unconstrained_duration(&self) -> Duration {
        self.phases
            .iter()
            .filter(|phase| !phase.is_day_constrained())
            .fold(Duration::ZERO, |total, phase| {
                total.saturating_add(phase.duration())
            })
    }
}

impl<'a> IntoIterator for &'a Scenario {
    type Item = &'a Phase;
    type IntoIter = std::slice::Iter<'a, Phase>;

    fn into_iter(self) -> Self::IntoIter {
        self.phases.iter()
    }
}

fn unwrap_configmap(document: &JsonValue) -> Result<Option<JsonValue>, ValidationError> {
    if document.get("kind").and_then(JsonValue::as_str) != Some("ConfigMap") {
        return Ok(None);
    }

    let payload = document
        .get("data")
        .and_then(|data| data.get(CONFIGMAP_SCENARIO_KEY))
        .and_then(JsonValue::as_str)
        .ok_or_else(|| {
            ValidationError::document(format!(
                "ConfigMap has no data.\"{}\" entry",
                CONFIGMAP_SCENARIO_KEY
            ))
        })?;

    serde_json::from_str(payload).map(Some).map_err(|e| {
        ValidationError::document(format!(
            "ConfigMap entry \"{}\" is not valid JSON: {}",
            CONFIGMAP_SCENARIO_KEY, e
        ))
    })
}

fn parse_phase(index: usize, element: &JsonValue) -> Result<Phase, ValidationError> {
    let object = element
        .as_object()
        .ok_or_else(|| ValidationError::phase(index, "phase must be an object"))?;

    let field = |name: &str| {
        object
            .get(name)
            .ok_or_else(|| ValidationError::phase(index, format!("missing field `{}`", name)))
    };

    let n_users = match field("n_users")? {
        JsonValue::Number(n) if n.is_u64() => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| ValidationError::phase(index, format!("n_users {} is too large", n)))?,
        other => {
            return Err(ValidationError::phase(
                index,
                format!("n_users must be a non-negative integer, got {}", other),
            ))
        }
    };

    let spawn_rate = positive_number(index, "spawn_rate", field("spawn_rate")?)?;
    let duration = positive_number(index, "duration", field("duration")?)?;
    if Duration::try_from_secs_f64(duration * 60.0).is_err() {
        return Err(ValidationError::phase(
            index,
            format!("duration {} minutes is too large", duration),
        ));
    }

    let days = match object.get("days") {
        None | Some(JsonValue::Null) => None,
        Some(value) => Some(parse_days(index, value)?),
    };

    Ok(Phase {
        n_users,
        spawn_rate,
        duration,
        days,
    })
}

fn positive_number(index: usize, name: &str, value: &JsonValue) -> Result<f64, ValidationError> {
    let number = value.as_f64().ok_or_else(|| {
        ValidationError::phase(index, format!("{} must be a number, got {}", name, value))
    })?;

    if !number.is_finite() || number <= 0.0 {
        return Err(ValidationError::phase(
            index,
            format!("{} must be greater than 0, got {}", name, number),
        ));
    }

    Ok(number)
}

fn parse_days(index: usize, value: &JsonValue) -> Result<BTreeSet<u32>, ValidationError> {
    let elements = value
        .as_array()
        .ok_or_else(|| ValidationError::phase(index, "days must be an array of integers"))?;

    if elements.is_empty() {
        return Err(ValidationError::phase(index, "days must not be empty"));
    }

    elements
        .iter()
        .map(|day| match day.as_u64() {
            Some(d) if (MIN_DAY as u64..=MAX_DAY as u64).contains(&d) => Ok(d as u32),
            _ => Err(ValidationError::phase(
                index,
                format!(
                    "days must be integers in [{}, {}], got {}",
                    MIN_DAY, MAX_DAY, day
                ),
            )),
        })
        .collect()
}
