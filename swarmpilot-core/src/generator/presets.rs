//! Named generator presets

use super::phases::{build_phase_values, PhaseConcatParams, Segment};
use super::weekly::{generate_weekly, WeeklyParams};
use crate::error::GeneratorError;

pub const PRESET_NAMES: [&str; 6] = [
    "2weeks",
    "7days",
    "hpa_stress",
    "thursday_3h",
    "1h_spike",
    "linear_ramp",
];

/// Monday to Sunday; columns are night, morning, midday, afternoon,
/// evening, late night
const WEEK_AVG_VALUES: [[f64; 6]; 7] = [
    [40.0, 650.0, 470.0, 800.0, 360.0, 40.0],
    [40.0, 610.0, 430.0, 750.0, 320.0, 40.0],
    [40.0, 680.0, 500.0, 820.0, 400.0, 40.0],
    [40.0, 650.0, 470.0, 850.0, 360.0, 40.0],
    [40.0, 610.0, 430.0, 720.0, 320.0, 40.0],
    [40.0, 570.0, 400.0, 680.0, 290.0, 40.0],
    [40.0, 540.0, 360.0, 650.0, 250.0, 40.0],
];

const LOW_WEEK_AVG_VALUES: [[f64; 6]; 7] = [
    [6.0, 400.0, 100.0, 380.0, 200.0, 6.0],
    [6.0, 450.0, 120.0, 400.0, 180.0, 6.0],
    [6.0, 380.0, 200.0, 430.0, 220.0, 6.0],
    [6.0, 500.0, 150.0, 480.0, 230.0, 6.0],
    [6.0, 450.0, 100.0, 300.0, 150.0, 6.0],
    [6.0, 50.0, 30.0, 70.0, 9.0, 6.0],
    [6.0, 10.0, 10.0, 30.0, 50.0, 6.0],
];

const STANDARD_DURATIONS: [u32; 6] = [6, 4, 2, 6, 2, 4];

#[derive(Debug, Clone, PartialEq)]
pub enum PresetKind {
    Weekly(WeeklyParams),
    Phases(PhaseConcatParams),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    /// Spawn rate written into every generated phase
    pub spawn_rate: u32,
    pub kind: PresetKind,
}

impl Preset {
    pub fn generate(&self, seed: Option<u64>) -> Result<Vec<f64>, GeneratorError> {
        match &self.kind {
            PresetKind::Weekly(params) => generate_weekly(params, seed),
            PresetKind::Phases(params) => build_phase_values(params, seed),
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            PresetKind::Weekly(_) => "weekly",
            PresetKind::Phases(_) => "phases",
        }
    }
}

pub fn preset(name: &str) -> Result<Preset, GeneratorError> {
    let preset = match name {
        "2weeks" => Preset {
            name: "2weeks",
            spawn_rate: 1,
            kind: PresetKind::Weekly(WeeklyParams {
                avg_values: table(&LOW_WEEK_AVG_VALUES),
                durations: STANDARD_DURATIONS.to_vec(),
                day_length_hours: 3.0,
                num_days: 14,
                sigma_week: 0.1,
                sigma_low: 10.0,
                sigma_high: 10.0,
                spike_prob: 0.0,
                ..WeeklyParams::default()
            }),
        },
        "7days" | "hpa_stress" => Preset {
            name: if name == "7days" { "7days" } else { "hpa_stress" },
            spawn_rate: 50,
            kind: PresetKind::Weekly(WeeklyParams {
                avg_values: table(&WEEK_AVG_VALUES),
                durations: STANDARD_DURATIONS.to_vec(),
                day_length_hours: 24.0 / 7.0,
                num_days: 7,
                ..WeeklyParams::default()
            }),
        },
        "thursday_3h" => Preset {
            name: "thursday_3h",
            spawn_rate: 50,
            kind: PresetKind::Phases(PhaseConcatParams {
                segments: vec![
                    Segment::flat(40, 40.0, 3.0),
                    Segment::ramp(5, 40.0, 650.0, 80.0),
                    Segment::flat(27, 650.0, 80.0),
                    Segment::flat(13, 470.0, 80.0),
                    Segment::ramp(5, 470.0, 850.0, 80.0),
                    Segment::flat(40, 850.0, 80.0),
                    Segment::ramp(5, 850.0, 360.0, 80.0),
                    Segment::flat(13, 360.0, 80.0),
                    Segment::ramp(5, 360.0, 40.0, 3.0),
                    Segment::flat(27, 40.0, 3.0),
                ],
                spike_prob: 0.03,
                spike_mult: 1.4,
                ..PhaseConcatParams::default()
            }),
        },
        "1h_spike" => Preset {
            name: "1h_spike",
            spawn_rate: 50,
            kind: PresetKind::Phases(PhaseConcatParams {
                segments: vec![
                    Segment::flat(15, 50.0, 3.0),
                    Segment::ramp(5, 50.0, 850.0, 80.0),
                    Segment::flat(20, 850.0, 80.0),
                    Segment::ramp(5, 850.0, 50.0, 80.0),
                    Segment::flat(15, 50.0, 3.0),
                ],
                spike_prob: 0.03,
                spike_mult: 1.4,
                ..PhaseConcatParams::default()
            }),
        },
        "linear_ramp" => Preset {
            name: "linear_ramp",
            spawn_rate: 50,
            kind: PresetKind::Phases(PhaseConcatParams {
                segments: vec![Segment::ramp(60, 10.0, 1500.0, 0.0)],
                ..PhaseConcatParams::default()
            }),
        },
        other => return Err(GeneratorError::UnknownPreset(other.to_string())),
    };
    Ok(preset)
}

/// Every preset, in listing order
pub fn presets() -> Vec<Preset> {
    PRESET_NAMES
        .iter()
        .filter_map(|name| preset(name).ok())
        .collect()
}

fn table<const N: usize>(rows: &[[f64; N]]) -> Vec<Vec<f64>> {
    rows.iter().map(|row| row.to_vec()).collect()
}
