//! Synthetic scenario generation
//!
//! Produces per-minute user counts from a named [`Preset`] and renders them
//! as scenario documents. Two shapes are supported: a weekly profile of
//! per-day, per-step averages compacted into short simulated days
//! ([`weekly`]), and a concatenation of flat and ramp segments
//! ([`phases`]). Both add Gaussian noise and optional load spikes.
//!
//! Generation is reproducible for a given seed.

pub mod output;
pub mod phases;
pub mod presets;
pub mod weekly;

pub use output::{to_configmap_yaml, to_scenario_json, ConfigMapMeta, GeneratedPhase};
pub use phases::{build_phase_values, PhaseConcatParams, Segment};
pub use presets::{preset, presets, Preset, PresetKind, PRESET_NAMES};
pub use weekly::{generate_weekly, WeeklyParams};

use crate::error::GeneratorError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Generate the per-minute user counts of a named preset
pub fn generate(preset_name: &str, seed: Option<u64>) -> Result<Vec<f64>, GeneratorError> {
    preset(preset_name)?.generate(seed)
}

pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Gaussian sample; a non-positive `std_dev` yields `mean` exactly
pub(crate) fn normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return mean;
    }
    let z: f64 = StandardNormal.sample(rng);
    mean + std_dev * z
}

pub(crate) fn clip_min(values: &mut [f64], min_value: f64) {
    for value in values.iter_mut() {
        if *value < min_value {
            *value = min_value;
        }
    }
}

/// Multiply high-load minutes by `multiplier` with probability `probability`
pub(crate) fn inject_spikes<R: Rng + ?Sized>(
    rng: &mut R,
    values: &mut [f64],
    threshold: f64,
    probability: f64,
    multiplier: f64,
    min_value: f64,
) {
    if probability <= 0.0 {
        return;
    }
    for value in values.iter_mut() {
        if *value > threshold && rng.gen::<f64>() < probability {
            *value *= multiplier;
        }
    }
    clip_min(values, min_value);
}
