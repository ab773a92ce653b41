use anyhow::Result;
use clap::{Parser, Subcommand};
use pulse_recon_common::{
    CSVVec, DEFAULT_SEED, Real, Seed, init_tracer, tracer::TracerOptions,
};
use signal_reconstruction::{
    ExperimentConfig, Experiments, FilterParameters, NoiseParameters, PulseParameters,
    SimulationRequest, TimeBase, run_pipeline, simulate_event,
};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};
use tracing::{info, info_span};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Directory the study results are written to
    #[clap(long, env = "RESULTS_DIR", default_value = "results")]
    results_dir: PathBuf,

    /// Seed of the pulse model, the noise injector uses the next value
    #[clap(long, default_value_t = DEFAULT_SEED)]
    seed: Seed,

    /// Optional JSON file overriding the default experiment configuration
    #[clap(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Reconstruct one illustrative event, then run both studies
    Run,

    /// Score every reconstruction method at each noise level
    NoiseSweep(NoiseSweep),

    /// Measure reconstruction bias over growing numbers of events
    EventScaling(EventScaling),

    /// Reconstruct a single event and write it as JSON
    Simulate(Simulate),
}

#[derive(Parser)]
struct NoiseSweep {
    /// Comma separated gaussian noise levels, defaults to the configured list
    #[clap(long)]
    sigma_levels: Option<CSVVec<Real>>,
}

#[derive(Parser)]
struct EventScaling {
    /// Comma separated event counts, defaults to the configured list
    #[clap(long)]
    event_counts: Option<CSVVec<usize>>,
}

#[derive(Parser)]
struct Simulate {
    #[clap(long, default_value = "1.0")]
    amplitude: Real,

    #[clap(long, default_value = "50.0")]
    center: Real,

    #[clap(long, default_value = "5.0")]
    width: Real,

    #[clap(long, default_value = "0.1")]
    noise_sigma: Real,

    #[clap(long, default_value = "0.1")]
    drift_amplitude: Real,

    #[clap(long, default_value = "0.05")]
    drift_frequency: Real,

    #[clap(long, default_value = "0.005")]
    spike_probability: Real,

    #[clap(long, default_value = "1.5")]
    spike_amplitude: Real,

    /// Low-pass cutoff of the Fourier reconstruction
    #[clap(long, default_value = "0.5")]
    cutoff: Real,

    /// Moving-average window in samples
    #[clap(long, default_value = "5")]
    window: usize,

    /// Kalman process noise variance
    #[clap(long, default_value = "1e-4")]
    process_noise: Real,

    /// Kalman measurement noise variance
    #[clap(long, default_value = "1e-2")]
    measurement_noise: Real,

    /// File to write the event to, stdout if omitted
    #[clap(long)]
    output: Option<PathBuf>,
}

impl Simulate {
    fn request(&self, time_base: TimeBase, seed: Seed) -> SimulationRequest {
        SimulationRequest {
            time_base,
            pulse: PulseParameters {
                amplitude: self.amplitude,
                center: self.center,
                width: self.width,
            },
            noise: NoiseParameters {
                gaussian_sigma: self.noise_sigma,
                drift_amplitude: self.drift_amplitude,
                drift_frequency: self.drift_frequency,
                spike_probability: self.spike_probability,
                spike_amplitude: self.spike_amplitude,
            },
            filter: FilterParameters {
                window_size: self.window,
                cutoff_frequency: self.cutoff,
                process_noise_variance: self.process_noise,
                measurement_noise_variance: self.measurement_noise,
            },
            seed,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _tracer = init_tracer!(TracerOptions::default());

    let config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ExperimentConfig::from_file(path)?
        }
        None => ExperimentConfig::default(),
    };

    match cli.mode.unwrap_or(Mode::Run) {
        Mode::Run => {
            info_span!("run").in_scope(|| run_pipeline(config, &cli.results_dir, cli.seed))?;
        }
        Mode::NoiseSweep(sweep) => {
            let sigma_levels = sweep
                .sigma_levels
                .map(CSVVec::into_inner)
                .unwrap_or_else(|| config.sigma_levels.clone());
            Experiments::new(config, &cli.results_dir, cli.seed)?.run_noise_sweep(&sigma_levels)?;
        }
        Mode::EventScaling(scaling) => {
            let event_counts = scaling
                .event_counts
                .map(CSVVec::into_inner)
                .unwrap_or_else(|| config.event_counts.clone());
            Experiments::new(config, &cli.results_dir, cli.seed)?
                .run_event_scaling_study(&event_counts)?;
        }
        Mode::Simulate(simulate) => {
            let response = simulate_event(&simulate.request(config.time_base, cli.seed))?;
            match &simulate.output {
                Some(path) => {
                    let mut writer = BufWriter::new(File::create(path)?);
                    serde_json::to_writer(&mut writer, &response)?;
                    writer.flush()?;
                    info!("Event written to {}", path.display());
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    serde_json::to_writer(&mut stdout, &response)?;
                    writeln!(stdout)?;
                }
            }
        }
    }
    Ok(())
}
