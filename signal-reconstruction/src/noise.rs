//! Detector noise processes: white gaussian noise, sinusoidal baseline
//! drift and random spike outliers. Each is additive and independent.
use crate::datatype::{Signal, TimeBase};
use pulse_recon_common::{Real, Seed};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum NoiseError {
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: Real },
    #[error("Spike probability must lie in [0, 1], got {0}")]
    InvalidProbability(Real),
    #[error("Signal has {signal} samples but time base has {time_base}")]
    LengthMismatch { signal: usize, time_base: usize },
    #[error("Invalid Normal Distribution: {0}")]
    NormalDistribution(#[from] rand_distr::NormalError),
}

fn non_negative(name: &'static str, value: Real) -> Result<Real, NoiseError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(NoiseError::Negative { name, value })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct NoiseParameters {
    pub gaussian_sigma: Real,
    pub drift_amplitude: Real,
    pub drift_frequency: Real,
    pub spike_probability: Real,
    pub spike_amplitude: Real,
}

impl NoiseParameters {
    /// Only the white noise process is active.
    pub fn gaussian_only(sigma: Real) -> Self {
        Self {
            gaussian_sigma: sigma,
            drift_amplitude: 0.0,
            drift_frequency: 0.0,
            spike_probability: 0.0,
            spike_amplitude: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), NoiseError> {
        non_negative("Gaussian sigma", self.gaussian_sigma)?;
        non_negative("Drift amplitude", self.drift_amplitude)?;
        non_negative("Drift frequency", self.drift_frequency)?;
        non_negative("Spike amplitude", self.spike_amplitude)?;
        if !(0.0..=1.0).contains(&self.spike_probability) {
            return Err(NoiseError::InvalidProbability(self.spike_probability));
        }
        Ok(())
    }
}

impl Default for NoiseParameters {
    fn default() -> Self {
        Self {
            gaussian_sigma: 0.1,
            drift_amplitude: 0.1,
            drift_frequency: 0.05,
            spike_probability: 0.005,
            spike_amplitude: 1.5,
        }
    }
}

/// Applies noise to clean signals, drawing from its own seeded generator.
pub struct NoiseInjector {
    rng: StdRng,
}

impl NoiseInjector {
    pub fn new(seed: Seed) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Restarts the random sequence from `seed`.
    pub fn reseed(&mut self, seed: Seed) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn add_gaussian_noise(&mut self, signal: &Signal, sigma: Real) -> Result<Signal, NoiseError> {
        let normal = Normal::new(0.0, non_negative("Gaussian sigma", sigma)?)?;
        Ok(signal.displaced_by(normal.sample_iter(&mut self.rng)))
    }

    /// Deterministic `amplitude * sin(2 pi frequency t)` offset, consumes no randomness.
    pub fn add_baseline_drift(
        &self,
        signal: &Signal,
        time_base: &TimeBase,
        amplitude: Real,
        frequency: Real,
    ) -> Result<Signal, NoiseError> {
        let amplitude = non_negative("Drift amplitude", amplitude)?;
        let frequency = non_negative("Drift frequency", frequency)?;
        if signal.len() != time_base.len() {
            return Err(NoiseError::LengthMismatch {
                signal: signal.len(),
                time_base: time_base.len(),
            });
        }
        Ok(signal.displaced_by(
            time_base
                .times()
                .map(|time| amplitude * Real::sin(TAU * frequency * time)),
        ))
    }

    /// Every sample independently receives a spike of `amplitude` with random sign,
    /// with probability `probability`.
    pub fn add_spikes(
        &mut self,
        signal: &Signal,
        probability: Real,
        amplitude: Real,
    ) -> Result<Signal, NoiseError> {
        let amplitude = non_negative("Spike amplitude", amplitude)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(NoiseError::InvalidProbability(probability));
        }
        let rng = &mut self.rng;
        let spikes = std::iter::repeat_with(|| {
            let hit = rng.random::<Real>() < probability;
            let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            if hit { sign * amplitude } else { 0.0 }
        });
        Ok(signal.displaced_by(spikes))
    }

    /// Applies gaussian noise, then drift, then spikes.
    pub fn apply_full_noise_model(
        &mut self,
        signal: &Signal,
        time_base: &TimeBase,
        params: &NoiseParameters,
    ) -> Result<Signal, NoiseError> {
        params.validate()?;
        let noisy = self.add_gaussian_noise(signal, params.gaussian_sigma)?;
        let noisy = self.add_baseline_drift(
            &noisy,
            time_base,
            params.drift_amplitude,
            params.drift_frequency,
        )?;
        self.add_spikes(&noisy, params.spike_probability, params.spike_amplitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn sample_std(signal: &Signal) -> Real {
        let mean = signal.mean().unwrap();
        (signal.iter().map(|v| (v - mean).powi(2)).sum::<Real>() / signal.len() as Real).sqrt()
    }

    #[test]
    fn gaussian_noise_statistics() {
        let mut injector = NoiseInjector::new(42);
        let noisy = injector.add_gaussian_noise(&Signal::zeros(1000), 0.1).unwrap();

        assert_eq!(noisy.len(), 1000);
        assert_approx_eq!(noisy.mean().unwrap(), 0.0, 0.02);
        assert_approx_eq!(sample_std(&noisy), 0.1, 0.01);
    }

    #[test]
    fn zero_sigma_leaves_signal() {
        let mut injector = NoiseInjector::new(42);
        let signal = Signal::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(injector.add_gaussian_noise(&signal, 0.0).unwrap(), signal);
    }

    #[test]
    fn same_seed_same_noise() {
        let signal = Signal::zeros(64);
        let mut first = NoiseInjector::new(3);
        let mut second = NoiseInjector::new(3);
        assert_eq!(
            first.add_gaussian_noise(&signal, 0.5).unwrap(),
            second.add_gaussian_noise(&signal, 0.5).unwrap()
        );

        let consumed = first.add_gaussian_noise(&signal, 0.5).unwrap();
        first.reseed(3);
        assert_ne!(first.add_gaussian_noise(&signal, 0.5).unwrap(), consumed);
    }

    #[test]
    fn drift_is_sinusoidal() {
        let time_base = TimeBase::new(0.0, 40.0, 1.0).unwrap();
        let injector = NoiseInjector::new(42);
        let drifted = injector
            .add_baseline_drift(&Signal::zeros(40), &time_base, 0.2, 0.05)
            .unwrap();

        assert_approx_eq!(drifted.values()[0], 0.0, 1e-12);
        assert_approx_eq!(drifted.values()[5], 0.2, 1e-12);
        assert_approx_eq!(drifted.values()[15], -0.2, 1e-12);
        assert_approx_eq!(drifted.values()[20], 0.0, 1e-12);
    }

    #[test]
    fn drift_length_mismatch() {
        let injector = NoiseInjector::new(42);
        assert_eq!(
            injector.add_baseline_drift(&Signal::zeros(10), &TimeBase::default(), 0.1, 0.05),
            Err(NoiseError::LengthMismatch {
                signal: 10,
                time_base: 1000
            })
        );
    }

    #[test]
    fn spikes_have_fixed_magnitude() {
        let mut injector = NoiseInjector::new(42);
        let spiked = injector.add_spikes(&Signal::zeros(10_000), 0.05, 2.0).unwrap();

        assert!(spiked.iter().all(|v| v == 0.0 || v.abs() == 2.0));
        let count = spiked.iter().filter(|v| *v != 0.0).count();
        assert!((350..=650).contains(&count), "{count} spikes");
        assert!(spiked.iter().any(|v| v > 0.0));
        assert!(spiked.iter().any(|v| v < 0.0));
    }

    #[test]
    fn certain_and_impossible_spikes() {
        let mut injector = NoiseInjector::new(42);
        let signal = Signal::zeros(100);
        let never = injector.add_spikes(&signal, 0.0, 2.0).unwrap();
        assert_eq!(never, signal);
        let always = injector.add_spikes(&signal, 1.0, 2.0).unwrap();
        assert!(always.iter().all(|v| v.abs() == 2.0));
    }

    #[test]
    fn invalid_parameters() {
        let mut injector = NoiseInjector::new(42);
        let signal = Signal::zeros(4);
        assert_eq!(
            injector.add_gaussian_noise(&signal, -0.1),
            Err(NoiseError::Negative {
                name: "Gaussian sigma",
                value: -0.1
            })
        );
        assert_eq!(
            injector.add_spikes(&signal, 1.5, 1.0),
            Err(NoiseError::InvalidProbability(1.5))
        );
        let params = NoiseParameters {
            drift_amplitude: -1.0,
            ..Default::default()
        };
        assert!(
            injector
                .apply_full_noise_model(&signal, &TimeBase::new(0.0, 4.0, 1.0).unwrap(), &params)
                .is_err()
        );
    }

    #[test]
    fn full_model_equals_sum_of_processes() {
        let time_base = TimeBase::default();
        let clean = Signal::zeros(time_base.len());
        let params = NoiseParameters::default();

        let mut composite = NoiseInjector::new(11);
        let full = composite
            .apply_full_noise_model(&clean, &time_base, &params)
            .unwrap();

        let mut stepwise = NoiseInjector::new(11);
        let expected = stepwise
            .add_gaussian_noise(&clean, params.gaussian_sigma)
            .unwrap();
        let expected = stepwise
            .add_baseline_drift(
                &expected,
                &time_base,
                params.drift_amplitude,
                params.drift_frequency,
            )
            .unwrap();
        let expected = stepwise
            .add_spikes(&expected, params.spike_probability, params.spike_amplitude)
            .unwrap();

        assert_eq!(full, expected);
    }
}
