//! Controlled studies of reconstruction quality: a sweep over noise levels
//! and a study of bias convergence as the number of events grows.
mod result;
mod scaling;

use crate::{
    config::ExperimentConfig,
    datatype::Signal,
    error::ReconstructionResult,
    metrics::{MethodReports, reconstruction_bias},
    noise::NoiseInjector,
    pulse::PulseModel,
    reconstruction::{Reconstructions, Reconstructor},
};
use pulse_recon_common::{Real, Seed};
use rayon::prelude::*;
pub use result::{ExperimentResult, count_key, sigma_key};
pub use scaling::EventScalingEntry;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument};

pub const NOISE_SWEEP_FILE: &str = "noise_sweep.json";
pub const EVENT_SCALING_FILE: &str = "event_scaling.json";

/// Events whose noise is drawn before the chunk is reconstructed in parallel.
const EVENT_CHUNK_SIZE: usize = 1024;

pub type NoiseSweepResult = ExperimentResult<MethodReports>;
pub type EventScalingResult = ExperimentResult<EventScalingEntry>;

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("Sweep list is empty")]
    EmptySweep,
    #[error("Noise level must be finite and non-negative, got {0}")]
    InvalidNoiseLevel(Real),
    #[error("Event count must be positive")]
    ZeroEventCount,
    #[error("IO Error: {0}")]
    IO(#[from] std::io::Error),
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The noise injector draws from a stream distinct from the pulse model's.
pub fn noise_seed(seed: Seed) -> Seed {
    seed.wrapping_add(1)
}

pub struct Experiments {
    config: ExperimentConfig,
    pulse_model: PulseModel,
    noise: NoiseInjector,
    results_dir: PathBuf,
}

impl Experiments {
    pub fn new(
        config: ExperimentConfig,
        results_dir: impl Into<PathBuf>,
        seed: Seed,
    ) -> ReconstructionResult<Self> {
        config.validate()?;
        let results_dir = results_dir.into();
        std::fs::create_dir_all(&results_dir).map_err(ExperimentError::from)?;
        Ok(Self {
            pulse_model: PulseModel::new(config.time_base, seed),
            noise: NoiseInjector::new(noise_seed(seed)),
            config,
            results_dir,
        })
    }

    /// Restarts both random streams as though newly constructed with `seed`.
    pub fn reseed(&mut self, seed: Seed) {
        self.pulse_model.reseed(seed);
        self.noise.reseed(noise_seed(seed));
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Scores every reconstructor, and the unfiltered signal, against one
    /// reference pulse at each noise level, then writes [NOISE_SWEEP_FILE].
    #[instrument(skip_all, fields(levels = sigma_levels.len()))]
    pub fn run_noise_sweep(&mut self, sigma_levels: &[Real]) -> ReconstructionResult<NoiseSweepResult> {
        if sigma_levels.is_empty() {
            return Err(ExperimentError::EmptySweep.into());
        }
        if let Some(&sigma) = sigma_levels
            .iter()
            .find(|sigma| !(sigma.is_finite() && **sigma >= 0.0))
        {
            return Err(ExperimentError::InvalidNoiseLevel(sigma).into());
        }

        let clean = self.pulse_model.generate_pulse(&self.config.reference_pulse);
        let noisy_signals = sigma_levels
            .iter()
            .map(|&sigma| self.noise.add_gaussian_noise(&clean, sigma))
            .collect::<Result<Vec<_>, _>>()?;

        let filter = self.config.filter;
        let time_base = self.config.time_base;
        let reports = noisy_signals
            .par_iter()
            .map(|noisy| -> ReconstructionResult<MethodReports> {
                let reconstructions = Reconstructions::new(noisy, &filter, &time_base)?;
                Ok(MethodReports::compute(&clean, noisy, &reconstructions)?)
            })
            .collect::<ReconstructionResult<Vec<_>>>()?;

        let mut results = NoiseSweepResult::default();
        for (&sigma, report) in sigma_levels.iter().zip(reports) {
            info!(
                sigma,
                noisy_mse = report.noisy.mse,
                ma_mse = report.moving_average.mse,
                fourier_mse = report.fourier.mse,
                kalman_mse = report.kalman.mse,
                "Noise level complete"
            );
            debug!("{report:?}");
            results.insert(sigma_key(sigma), report);
        }

        results.save(&self.results_dir.join(NOISE_SWEEP_FILE))?;
        Ok(results)
    }

    /// For each event count, reconstructs a fresh batch of noisy pulses and
    /// aggregates the per-event bias, then writes [EVENT_SCALING_FILE].
    #[instrument(skip_all, fields(counts = ?event_counts))]
    pub fn run_event_scaling_study(
        &mut self,
        event_counts: &[usize],
    ) -> ReconstructionResult<EventScalingResult> {
        if event_counts.is_empty() {
            return Err(ExperimentError::EmptySweep.into());
        }
        if event_counts.contains(&0) {
            return Err(ExperimentError::ZeroEventCount.into());
        }

        let moving_average = Reconstructor::moving_average(&self.config.filter);
        let kalman = Reconstructor::kalman(&self.config.filter);

        let mut results = EventScalingResult::default();
        for &count in event_counts {
            let (ma_biases, kf_biases) = self.event_biases(count, &moving_average, &kalman)?;
            let entry = EventScalingEntry::from_biases(
                &ma_biases,
                &kf_biases,
                self.config.bias_sample_size,
            )
            .ok_or(ExperimentError::ZeroEventCount)?;
            info!(
                count,
                ma_bias_mean = entry.ma_bias_mean,
                ma_bias_std = entry.ma_bias_std,
                kf_bias_mean = entry.kf_bias_mean,
                kf_bias_std = entry.kf_bias_std,
                "Event count complete"
            );
            results.insert(count_key(count), entry);
        }

        results.save(&self.results_dir.join(EVENT_SCALING_FILE))?;
        Ok(results)
    }

    /// Every random draw happens here, in event order, before each chunk is
    /// reconstructed in parallel, so the biases do not depend on scheduling.
    fn event_biases(
        &mut self,
        count: usize,
        moving_average: &Reconstructor,
        kalman: &Reconstructor,
    ) -> ReconstructionResult<(Vec<Real>, Vec<Real>)> {
        let clean_events = self
            .pulse_model
            .generate_batch(count, &self.config.batch_ranges)?;
        let sigma = self.config.scaling_sigma;

        let mut ma_biases = Vec::with_capacity(count);
        let mut kf_biases = Vec::with_capacity(count);
        for chunk in clean_events.chunks(EVENT_CHUNK_SIZE) {
            let noisy_events = chunk
                .iter()
                .map(|clean| self.noise.add_gaussian_noise(clean, sigma))
                .collect::<Result<Vec<Signal>, _>>()?;

            let biases = chunk
                .par_iter()
                .zip(noisy_events.par_iter())
                .map(|(clean, noisy)| -> ReconstructionResult<(Real, Real)> {
                    Ok((
                        reconstruction_bias(clean, &moving_average.reconstruct(noisy)?)?,
                        reconstruction_bias(clean, &kalman.reconstruct(noisy)?)?,
                    ))
                })
                .collect::<ReconstructionResult<Vec<_>>>()?;

            for (ma_bias, kf_bias) in biases {
                ma_biases.push(ma_bias);
                kf_biases.push(kf_bias);
            }
        }
        Ok((ma_biases, kf_biases))
    }
}
