//! Clean reference pulses, either singly from fixed parameters or in
//! batches with parameters drawn uniformly from closed intervals.
use crate::datatype::{Signal, TimeBase};
use pulse_recon_common::{Real, Seed};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum PulseError {
    #[error("Invalid {name} range [{min}, {max}]")]
    MalformedRange {
        name: &'static str,
        min: Real,
        max: Real,
    },
    #[error("Pulse width must be strictly positive, got {0}")]
    NonPositiveWidth(Real),
    #[error("Pulse parameters must be finite")]
    NonFinite,
}

/// Gaussian pulse `amplitude * exp(-(t - center)^2 / (2 * width^2))`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PulseParameters {
    pub amplitude: Real,
    pub center: Real,
    pub width: Real,
}

impl PulseParameters {
    pub fn validate(&self) -> Result<(), PulseError> {
        if !(self.amplitude.is_finite() && self.center.is_finite() && self.width.is_finite()) {
            return Err(PulseError::NonFinite);
        }
        if self.width <= 0.0 {
            return Err(PulseError::NonPositiveWidth(self.width));
        }
        Ok(())
    }

    pub fn value_at(&self, time: Real) -> Real {
        self.amplitude * Real::exp(-(time - self.center).powi(2) / (2.0 * self.width.powi(2)))
    }
}

impl Default for PulseParameters {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            center: 50.0,
            width: 5.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Interval<T>
where
    T: Clone,
{
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Interval<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn range_inclusive(&self) -> RangeInclusive<T> {
        self.min..=self.max
    }
}

impl Interval<Real> {
    fn validate(&self, name: &'static str) -> Result<(), PulseError> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Ok(())
        } else {
            Err(PulseError::MalformedRange {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// The intervals from which each batch pulse draws its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BatchRanges {
    pub amplitude: Interval<Real>,
    pub center: Interval<Real>,
    pub width: Interval<Real>,
}

impl BatchRanges {
    pub fn validate(&self) -> Result<(), PulseError> {
        self.amplitude.validate("amplitude")?;
        self.center.validate("center")?;
        self.width.validate("width")?;
        if self.width.min <= 0.0 {
            return Err(PulseError::NonPositiveWidth(self.width.min));
        }
        Ok(())
    }
}

impl Default for BatchRanges {
    fn default() -> Self {
        Self {
            amplitude: Interval::new(0.8, 1.2),
            center: Interval::new(40.0, 60.0),
            width: Interval::new(3.0, 7.0),
        }
    }
}

/// Evaluates the pulse at every sample time of `time_base`.
pub fn generate_pulse(time_base: &TimeBase, params: &PulseParameters) -> Signal {
    time_base.times().map(|time| params.value_at(time)).collect()
}

/// Owns the generator from which batch parameters are drawn, so that
/// two models built with the same seed produce identical batches.
pub struct PulseModel {
    time_base: TimeBase,
    rng: StdRng,
}

impl PulseModel {
    pub fn new(time_base: TimeBase, seed: Seed) -> Self {
        Self {
            time_base,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Restarts the random sequence from `seed`.
    pub fn reseed(&mut self, seed: Seed) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn time_base(&self) -> &TimeBase {
        &self.time_base
    }

    pub fn generate_pulse(&self, params: &PulseParameters) -> Signal {
        generate_pulse(&self.time_base, params)
    }

    /// Draws the parameters of one batch pulse, in the order amplitude, center, width.
    fn sample_parameters(&mut self, ranges: &BatchRanges) -> PulseParameters {
        PulseParameters {
            amplitude: self.rng.random_range(ranges.amplitude.range_inclusive()),
            center: self.rng.random_range(ranges.center.range_inclusive()),
            width: self.rng.random_range(ranges.width.range_inclusive()),
        }
    }

    pub fn generate_batch(
        &mut self,
        n_events: usize,
        ranges: &BatchRanges,
    ) -> Result<Vec<Signal>, PulseError> {
        ranges.validate()?;
        debug!("Generating batch of {n_events} pulses");
        Ok((0..n_events)
            .map(|_| {
                let params = self.sample_parameters(ranges);
                self.generate_pulse(&params)
            })
            .collect())
    }
}
