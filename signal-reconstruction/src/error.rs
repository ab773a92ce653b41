use crate::{
    datatype::TimeBaseError, experiments::ExperimentError, metrics::MetricError, noise::NoiseError,
    pulse::PulseError, reconstruction::FilterError,
};
use thiserror::Error;

pub type ReconstructionResult<T> = Result<T, ReconstructionError>;

#[derive(Debug, Error)]
pub enum ReconstructionError {
    #[error("Time Base Error: {0}")]
    TimeBase(#[from] TimeBaseError),
    #[error("Pulse Error: {0}")]
    Pulse(#[from] PulseError),
    #[error("Noise Error: {0}")]
    Noise(#[from] NoiseError),
    #[error("Filter Error: {0}")]
    Filter(#[from] FilterError),
    #[error("Metric Error: {0}")]
    Metric(#[from] MetricError),
    #[error("Experiment Error: {0}")]
    Experiment(#[from] ExperimentError),
}
