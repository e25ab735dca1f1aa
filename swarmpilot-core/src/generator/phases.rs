//! Segment-concatenation generator
//!
//! Builds a profile minute by minute from flat plateaus and linear ramps.

use super::{clip_min, inject_spikes, normal, seeded_rng};
use crate::error::GeneratorError;

/// One stretch of a generated profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Noise around a constant level
    Flat {
        minutes: usize,
        target: f64,
        sigma: f64,
    },
    /// Straight line from `start` to `target` (both inclusive) plus noise
    Ramp {
        minutes: usize,
        start: f64,
        target: f64,
        sigma: f64,
    },
}

impl Segment {
    pub fn flat(minutes: usize, target: f64, sigma: f64) -> Self {
        Segment::Flat {
            minutes,
            target,
            sigma,
        }
    }

    pub fn ramp(minutes: usize, start: f64, target: f64, sigma: f64) -> Self {
        Segment::Ramp {
            minutes,
            start,
            target,
            sigma,
        }
    }

    pub fn minutes(&self) -> usize {
        match self {
            Segment::Flat { minutes, .. } | Segment::Ramp { minutes, .. } => *minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseConcatParams {
    pub segments: Vec<Segment>,
    pub spike_prob: f64,
    pub spike_mult: f64,
    pub load_threshold: f64,
    pub min_value: f64,
}

impl Default for PhaseConcatParams {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
            spike_prob: 0.0,
            spike_mult: 1.0,
            load_threshold: 200.0,
            min_value: 1.0,
        }
    }
}

pub fn build_phase_values(
    params: &PhaseConcatParams,
    seed: Option<u64>,
) -> Result<Vec<f64>, GeneratorError> {
    if params.segments.is_empty() {
        return Err(GeneratorError::InvalidParameter(
            "at least one segment is required".to_string(),
        ));
    }

    let mut rng = seeded_rng(seed);
    let total: usize = params.segments.iter().map(Segment::minutes).sum();
    let mut values = Vec::with_capacity(total);

    for segment in &params.segments {
        match *segment {
            Segment::Flat {
                minutes,
                target,
                sigma,
            } => values.extend((0..minutes).map(|_| normal(&mut rng, target, sigma))),
            Segment::Ramp {
                minutes,
                start,
                target,
                sigma,
            } => {
                for i in 0..minutes {
                    let base = linspace_point(start, target, minutes, i);
                    values.push(base + normal(&mut rng, 0.0, sigma));
                }
            }
        }
    }

    clip_min(&mut values, params.min_value);
    inject_spikes(
        &mut rng,
        &mut values,
        params.load_threshold,
        params.spike_prob,
        params.spike_mult,
        params.min_value,
    );

    Ok(values)
}

/// Point `i` of `count` evenly spaced values from `start` to `end` inclusive
fn linspace_point(start: f64, end: f64, count: usize, i: usize) -> f64 {
    if count <= 1 {
        return start;
    }
    start + (end - start) * i as f64 / (count - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_free_ramp_hits_both_ends() {
        let params = PhaseConcatParams {
            segments: vec![Segment::ramp(60, 10.0, 1500.0, 0.0)],
            ..PhaseConcatParams::default()
        };
        let values = build_phase_values(&params, None).unwrap();

        assert_eq!(values.len(), 60);
        assert_eq!(values[0], 10.0);
        assert!((values[59] - 1500.0).abs() < 1e-9);
        assert!(values.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_segments_are_concatenated_in_order() {
        let params = PhaseConcatParams {
            segments: vec![
                Segment::flat(3, 50.0, 0.0),
                Segment::ramp(3, 50.0, 150.0, 0.0),
                Segment::flat(2, 150.0, 0.0),
            ],
            ..PhaseConcatParams::default()
        };
        let values = build_phase_values(&params, None).unwrap();
        assert_eq!(values, vec![50.0, 50.0, 50.0, 50.0, 100.0, 150.0, 150.0, 150.0]);
    }

    #[test]
    fn test_single_point_ramp_is_its_start() {
        assert_eq!(linspace_point(4.0, 9.0, 1, 0), 4.0);
    }

    #[test]
    fn test_floor_applies_to_noise() {
        let params = PhaseConcatParams {
            segments: vec![Segment::flat(500, 2.0, 40.0)],
            ..PhaseConcatParams::default()
        };
        let values = build_phase_values(&params, Some(11)).unwrap();
        assert!(values.iter().all(|v| *v >= 1.0));
    }

    #[test]
    fn test_empty_segment_list_is_rejected() {
        assert!(build_phase_values(&PhaseConcatParams::default(), None).is_err());
    }
}
