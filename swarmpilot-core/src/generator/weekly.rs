//! Weekly profile generator
//!
//! Each simulated day is split into steps whose lengths (in hours) sum to
//! 24. A day's steps are compacted into `day_length_hours` of real time at
//! one sample per minute. Every (day, step) cell gets its own day-to-day
//! jitter around the table average, then per-minute noise whose spread
//! depends on whether the cell is above the load threshold.

use super::{clip_min, inject_spikes, normal, seeded_rng};
use crate::error::GeneratorError;

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyParams {
    /// Average users per (day row, step); rows are cycled over `num_days`
    pub avg_values: Vec<Vec<f64>>,
    /// Step lengths in simulated hours, summing to 24
    pub durations: Vec<u32>,
    /// Real hours one simulated day is compacted into
    pub day_length_hours: f64,
    pub num_days: u32,
    /// Relative day-to-day variance, applied as `sigma_week * avg`
    pub sigma_week: f64,
    pub sigma_low: f64,
    pub sigma_high: f64,
    pub load_threshold: f64,
    pub spike_prob: f64,
    pub spike_mult: f64,
    pub min_value: f64,
}

impl Default for WeeklyParams {
    fn default() -> Self {
        Self {
            avg_values: Vec::new(),
            durations: Vec::new(),
            day_length_hours: 3.0,
            num_days: 7,
            sigma_week: 0.15,
            sigma_low: 3.0,
            sigma_high: 80.0,
            load_threshold: 200.0,
            spike_prob: 0.03,
            spike_mult: 1.4,
            min_value: 1.0,
        }
    }
}

impl WeeklyParams {
    fn validate(&self) -> Result<(), GeneratorError> {
        let total: u32 = self.durations.iter().sum();
        if total != 24 {
            return Err(GeneratorError::DurationsNotOneDay(total));
        }
        if self.avg_values.is_empty() {
            return Err(GeneratorError::InvalidParameter(
                "average table has no rows".to_string(),
            ));
        }
        if let Some(row) = self
            .avg_values
            .iter()
            .find(|row| row.len() != self.durations.len())
        {
            return Err(GeneratorError::ShapeMismatch {
                columns: row.len(),
                steps: self.durations.len(),
            });
        }
        if !(self.day_length_hours > 0.0 && self.day_length_hours <= 24.0) {
            return Err(GeneratorError::InvalidParameter(format!(
                "day_length_hours must be in (0, 24], got {}",
                self.day_length_hours
            )));
        }
        Ok(())
    }

    /// Real minutes per step after compaction, truncated
    pub fn compacted_durations(&self) -> Vec<usize> {
        let compaction_factor = 24.0 / self.day_length_hours;
        let step_length = 60.0 / compaction_factor;
        self.durations
            .iter()
            .map(|hours| (f64::from(*hours) * step_length) as usize)
            .collect()
    }
}

pub fn generate_weekly(params: &WeeklyParams, seed: Option<u64>) -> Result<Vec<f64>, GeneratorError> {
    params.validate()?;

    let mut rng = seeded_rng(seed);
    let steps = params.compacted_durations();
    let minutes_per_day: usize = steps.iter().sum();
    let mut values = Vec::with_capacity(minutes_per_day * params.num_days as usize);

    for day in 0..params.num_days as usize {
        let row = &params.avg_values[day % params.avg_values.len()];
        for (avg, minutes) in row.iter().zip(&steps) {
            let this_avg = normal(&mut rng, *avg, params.sigma_week * avg);
            let sigma = if *avg > params.load_threshold {
                params.sigma_high
            } else {
                params.sigma_low
            };

            let start = values.len();
            values.extend((0..*minutes).map(|_| normal(&mut rng, this_avg, sigma)));
            clip_min(&mut values[start..], params.min_value);
        }
    }

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
