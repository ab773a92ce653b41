//! A single noisy event, reconstructed by every method, for interactive use.
use crate::{
    datatype::{Signal, TimeBase},
    error::ReconstructionResult,
    metrics::MethodReports,
    noise::{NoiseInjector, NoiseParameters},
    pulse::{PulseParameters, generate_pulse},
    reconstruction::{FilterParameters, Reconstructions},
};
use pulse_recon_common::{DEFAULT_SEED, Real, Seed};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SimulationRequest {
    pub time_base: TimeBase,
    pub pulse: PulseParameters,
    pub noise: NoiseParameters,
    pub filter: FilterParameters,
    pub seed: Seed,
}

impl Default for SimulationRequest {
    fn default() -> Self {
        Self {
            time_base: TimeBase::default(),
            pulse: PulseParameters::default(),
            noise: NoiseParameters::default(),
            filter: FilterParameters::default(),
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SimulationResponse {
    pub time: Vec<Real>,
    pub clean: Signal,
    pub noisy: Signal,
    #[serde(flatten)]
    pub reconstructions: Reconstructions,
    pub metrics: MethodReports,
}

/// Generates the pulse described by `request`, applies the full noise model
/// and runs every reconstructor over the result.
#[instrument(skip_all, fields(seed = request.seed))]
pub fn simulate_event(request: &SimulationRequest) -> ReconstructionResult<SimulationResponse> {
    request.time_base.validate()?;
    request.pulse.validate()?;
    request.filter.validate()?;

    let clean = generate_pulse(&request.time_base, &request.pulse);
    let noisy = NoiseInjector::new(request.seed).apply_full_noise_model(
        &clean,
        &request.time_base,
        &request.noise,
    )?;
    let reconstructions = Reconstructions::new(&noisy, &request.filter, &request.time_base)?;
    let metrics = MethodReports::compute(&clean, &noisy, &reconstructions)?;
    debug!("{metrics:?}");

    Ok(SimulationResponse {
        time: request.time_base.times().collect(),
        clean,
        noisy,
        reconstructions,
        metrics,
    })
}
