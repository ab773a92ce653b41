//! The three reconstruction algorithms, each mapping a noisy signal to an
//! estimate of the clean one with the same number of samples.
mod fourier;
mod window;

use crate::datatype::{Signal, TimeBase};
pub use fourier::frequency_bins;
use pulse_recon_common::Real;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("Cannot reconstruct an empty signal")]
    EmptySignal,
    #[error("Cutoff frequency must be positive, got {0}")]
    NonPositiveCutoff(Real),
    #[error("Sampling interval must be positive, got {0}")]
    NonPositiveInterval(Real),
    #[error("{name} must be positive, got {value}")]
    NonPositiveVariance { name: &'static str, value: Real },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FilterParameters {
    pub window_size: usize,
    pub cutoff_frequency: Real,
    pub process_noise_variance: Real,
    pub measurement_noise_variance: Real,
}

impl FilterParameters {
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.cutoff_frequency.is_nan() || self.cutoff_frequency <= 0.0 {
            return Err(FilterError::NonPositiveCutoff(self.cutoff_frequency));
        }
        for (name, value) in [
            ("Process noise variance", self.process_noise_variance),
            ("Measurement noise variance", self.measurement_noise_variance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(FilterError::NonPositiveVariance { name, value });
            }
        }
        Ok(())
    }
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self {
            window_size: 5,
            cutoff_frequency: 0.5,
            process_noise_variance: 1e-4,
            measurement_noise_variance: 1e-2,
        }
    }
}

/// Label under which a reconstruction, or the unfiltered baseline, is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum Method {
    #[strum(to_string = "MA")]
    MovingAverage,
    #[strum(to_string = "Fourier")]
    Fourier,
    #[strum(to_string = "Kalman")]
    Kalman,
    #[strum(to_string = "Noisy")]
    Noisy,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reconstructor {
    MovingAverage {
        window_size: usize,
    },
    Fourier {
        dt: Real,
        cutoff_frequency: Real,
    },
    Kalman {
        process_noise_variance: Real,
        measurement_noise_variance: Real,
    },
}

impl Reconstructor {
    pub fn moving_average(params: &FilterParameters) -> Self {
        Self::MovingAverage {
            window_size: params.window_size,
        }
    }

    pub fn fourier(params: &FilterParameters, time_base: &TimeBase) -> Self {
        Self::Fourier {
            dt: time_base.dt(),
            cutoff_frequency: params.cutoff_frequency,
        }
    }

    pub fn kalman(params: &FilterParameters) -> Self {
        Self::Kalman {
            process_noise_variance: params.process_noise_variance,
            measurement_noise_variance: params.measurement_noise_variance,
        }
    }

    /// Moving average, Fourier and Kalman, in that order.
    pub fn all(params: &FilterParameters, time_base: &TimeBase) -> [Self; 3] {
        [
            Self::moving_average(params),
            Self::fourier(params, time_base),
            Self::kalman(params),
        ]
    }

    pub fn method(&self) -> Method {
        match self {
            Self::MovingAverage { .. } => Method::MovingAverage,
            Self::Fourier { .. } => Method::Fourier,
            Self::Kalman { .. } => Method::Kalman,
        }
    }

    pub fn reconstruct(&self, noisy: &Signal) -> Result<Signal, FilterError> {
        match *self {
            Self::MovingAverage { window_size } => {
                window::moving_average::moving_average(noisy, window_size)
            }
            Self::Fourier {
                dt,
                cutoff_frequency,
            } => fourier::fourier_filter(noisy, dt, cutoff_frequency),
            Self::Kalman {
                process_noise_variance,
                measurement_noise_variance,
            } => window::kalman::kalman_filter(
                noisy,
                process_noise_variance,
                measurement_noise_variance,
            ),
        }
    }
}

/// The output of every reconstructor applied to the same noisy signal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Reconstructions {
    pub moving_average: Signal,
    pub fourier: Signal,
    pub kalman: Signal,
}

impl Reconstructions {
    pub fn new(
        noisy: &Signal,
        params: &FilterParameters,
        time_base: &TimeBase,
    ) -> Result<Self, FilterError> {
        let [moving_average, fourier, kalman] = Reconstructor::all(params, time_base);
        Ok(Self {
            moving_average: moving_average.reconstruct(noisy)?,
            fourier: fourier.reconstruct(noisy)?,
            kalman: kalman.reconstruct(noisy)?,
        })
    }

    /// `None` for [Method::Noisy], which is not a reconstruction.
    pub fn get(&self, method: Method) -> Option<&Signal> {
        match method {
            Method::MovingAverage => Some(&self.moving_average),
            Method::Fourier => Some(&self.fourier),
            Method::Kalman => Some(&self.kalman),
            Method::Noisy => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        noise::NoiseInjector,
        pulse::{PulseParameters, generate_pulse},
    };
    use strum::IntoEnumIterator;

    #[test]
    fn method_labels() {
        let labels: Vec<_> = Method::iter().map(|method| method.to_string()).collect();
        assert_eq!(labels, vec!["MA", "Fourier", "Kalman", "Noisy"]);
    }

    #[test]
    fn all_preserve_length() {
        let time_base = TimeBase::default();
        let clean = generate_pulse(&time_base, &PulseParameters::default());
        let noisy = NoiseInjector::new(42)
            .add_gaussian_noise(&clean, 0.1)
            .unwrap();

        let reconstructors = Reconstructor::all(&FilterParameters::default(), &time_base);
        let methods: Vec<_> = reconstructors.iter().map(Reconstructor::method).collect();
        assert_eq!(
            methods,
            vec![Method::MovingAverage, Method::Fourier, Method::Kalman]
        );
        for reconstructor in reconstructors {
            assert_eq!(reconstructor.reconstruct(&noisy).unwrap().len(), noisy.len());
        }
    }

    #[test]
    fn reconstructions_match_individual_calls() {
        let time_base = TimeBase::default();
        let params = FilterParameters::default();
        let noisy = NoiseInjector::new(1)
            .add_gaussian_noise(&Signal::zeros(time_base.len()), 0.3)
            .unwrap();
        let reconstructions = Reconstructions::new(&noisy, &params, &time_base).unwrap();

        for reconstructor in Reconstructor::all(&params, &time_base) {
            assert_eq!(
                reconstructions.get(reconstructor.method()),
                Some(&reconstructor.reconstruct(&noisy).unwrap())
            );
        }
        assert_eq!(reconstructions.get(Method::Noisy), None);
    }

    #[test]
    fn all_reject_empty_signal() {
        for reconstructor in Reconstructor::all(&FilterParameters::default(), &TimeBase::default())
        {
            assert_eq!(
                reconstructor.reconstruct(&Signal::default()),
                Err(FilterError::EmptySignal)
            );
        }
    }

    #[test]
    fn invalid_parameters() {
        let params = FilterParameters {
            measurement_noise_variance: -1.0,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(FilterError::NonPositiveVariance {
                name: "Measurement noise variance",
                value: -1.0
            })
        );
        assert!(FilterParameters::default().validate().is_ok());
    }
}
