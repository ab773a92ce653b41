pub mod config;
pub mod datatype;
pub mod error;
pub mod experiments;
pub mod metrics;
pub mod noise;
pub mod pipeline;
pub mod pulse;
pub mod reconstruction;
pub mod service;

pub use config::ExperimentConfig;
pub use datatype::{Signal, TimeBase};
pub use error::{ReconstructionError, ReconstructionResult};
pub use experiments::{ExperimentResult, Experiments};
pub use metrics::{MethodReports, MetricReport};
pub use noise::{NoiseInjector, NoiseParameters};
pub use pipeline::run_pipeline;
pub use pulse::{PulseModel, PulseParameters};
pub use reconstruction::{FilterParameters, Method, Reconstructor, Reconstructions};
pub use service::{SimulationRequest, SimulationResponse, simulate_event};
