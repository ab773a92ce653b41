use crate::{
    config::ExperimentConfig,
    error::ReconstructionResult,
    experiments::{EventScalingResult, Experiments, NoiseSweepResult},
    reconstruction::Method,
    service::{SimulationRequest, simulate_event},
};
use pulse_recon_common::Seed;
use std::path::PathBuf;
use strum::IntoEnumIterator;
use tracing::{info, info_span};

pub struct PipelineOutput {
    pub noise_sweep: NoiseSweepResult,
    pub event_scaling: EventScalingResult,
}

/// Runs one illustrative event, then the noise sweep over the configured
/// sigma levels, then the event scaling study over the configured counts.
pub fn run_pipeline(
    config: ExperimentConfig,
    results_dir: impl Into<PathBuf>,
    seed: Seed,
) -> ReconstructionResult<PipelineOutput> {
    let sigma_levels = config.sigma_levels.clone();
    let event_counts = config.event_counts.clone();

    info_span!("illustrative_event").in_scope(|| -> ReconstructionResult<()> {
        let request = SimulationRequest {
            time_base: config.time_base,
            pulse: config.reference_pulse,
            noise: config.full_noise,
            filter: config.filter,
            seed,
        };
        let response = simulate_event(&request)?;
        for method in Method::iter() {
            let report = response.metrics.get(method);
            info!(
                %method,
                mse = report.mse,
                snr_db = report.snr_db,
                peak_error = report.peak_amplitude_error,
                bias = report.bias,
                "Illustrative event scored"
            );
        }
        Ok(())
    })?;

    let mut experiments = Experiments::new(config, results_dir, seed)?;
    let noise_sweep = experiments.run_noise_sweep(&sigma_levels)?;
    let event_scaling = experiments.run_event_scaling_study(&event_counts)?;
    info!("Pipeline complete, results in {}", experiments.results_dir().display());

    Ok(PipelineOutput {
        noise_sweep,
        event_scaling,
    })
}
