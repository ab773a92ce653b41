use crate::{
    datatype::TimeBase,
    error::ReconstructionResult,
    experiments::ExperimentError,
    noise::NoiseParameters,
    pulse::{BatchRanges, PulseParameters},
    reconstruction::FilterParameters,
};
use pulse_recon_common::Real;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

/// Noise levels visited by the noise sweep unless configured otherwise.
pub const DEFAULT_SIGMA_LEVELS: [Real; 4] = [0.05, 0.1, 0.2, 0.5];
/// Event counts visited by the scaling study unless configured otherwise.
pub const DEFAULT_EVENT_COUNTS: [usize; 3] = [100, 1000, 10000];
/// The scaling study holds the noise level fixed so that only the event count varies.
pub const SCALING_NOISE_SIGMA: Real = 0.2;
/// Number of raw per-event biases retained for histogramming.
pub const BIAS_SAMPLE_SIZE: usize = 100;

///
/// This struct is created from the optional configuration JSON file,
/// every field missing from the file takes its default.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ExperimentConfig {
    pub time_base: TimeBase,
    //  The pulse every noise level of the sweep is applied to
    pub reference_pulse: PulseParameters,
    pub batch_ranges: BatchRanges,
    pub filter: FilterParameters,
    //  Noise of the illustrative single event
    pub full_noise: NoiseParameters,
    pub sigma_levels: Vec<Real>,
    pub event_counts: Vec<usize>,
    pub scaling_sigma: Real,
    pub bias_sample_size: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            time_base: TimeBase::default(),
            reference_pulse: PulseParameters::default(),
            batch_ranges: BatchRanges::default(),
            filter: FilterParameters::default(),
            full_noise: NoiseParameters::default(),
            sigma_levels: DEFAULT_SIGMA_LEVELS.to_vec(),
            event_counts: DEFAULT_EVENT_COUNTS.to_vec(),
            scaling_sigma: SCALING_NOISE_SIGMA,
            bias_sample_size: BIAS_SAMPLE_SIZE,
        }
    }
}

impl ExperimentConfig {
    pub fn from_file(path: &Path) -> ReconstructionResult<Self> {
        let reader = BufReader::new(File::open(path).map_err(ExperimentError::from)?);
        let config: Self = serde_json::from_reader(reader).map_err(ExperimentError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every parameter group, sweep lists are checked when a study runs.
    pub fn validate(&self) -> ReconstructionResult<()> {
        self.time_base.validate()?;
        self.reference_pulse.validate()?;
        self.batch_ranges.validate()?;
        self.filter.validate()?;
        self.full_noise.validate()?;
        if !(self.scaling_sigma.is_finite() && self.scaling_sigma >= 0.0) {
            return Err(ExperimentError::InvalidNoiseLevel(self.scaling_sigma).into());
        }
        Ok(())
    }
}
