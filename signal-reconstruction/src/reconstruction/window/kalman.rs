use super::{Window, WindowFilter};
use crate::{datatype::Signal, reconstruction::FilterError};
use pulse_recon_common::Real;

/// Variance assigned to the first estimate, before any update.
const INITIAL_VARIANCE: Real = 1.0;

#[derive(Clone, Copy, Debug)]
struct KalmanState {
    estimate: Real,
    variance: Real,
}

/// Scalar Kalman filter with an identity state transition.
///
/// The hidden state is assumed locally constant, drifting with variance
/// `process_noise_variance` per sample and observed with additive noise of
/// variance `measurement_noise_variance`.
#[derive(Clone)]
pub(crate) struct KalmanWindow {
    process_noise_variance: Real,
    measurement_noise_variance: Real,
    state: Option<KalmanState>,
    gain: Real,
}

impl KalmanWindow {
    pub(crate) fn new(process_noise_variance: Real, measurement_noise_variance: Real) -> Self {
        KalmanWindow {
            process_noise_variance,
            measurement_noise_variance,
            state: None,
            gain: Real::default(),
        }
    }

    #[cfg(test)]
    fn gain(&self) -> Real {
        self.gain
    }
}

impl Window for KalmanWindow {
    type InputType = Real;
    type OutputType = Real;

    fn push(&mut self, observation: Real) -> bool {
        let state = self.state.get_or_insert(KalmanState {
            estimate: observation,
            variance: INITIAL_VARIANCE,
        });
        // Predict
        let predicted_variance = state.variance + self.process_noise_variance;
        // Update
        self.gain = predicted_variance / (predicted_variance + self.measurement_noise_variance);
        state.estimate += self.gain * (observation - state.estimate);
        state.variance = (1.0 - self.gain) * predicted_variance;
        true
    }

    fn output(&self) -> Option<Real> {
        self.state.map(|state| state.estimate)
    }
}

pub(crate) fn kalman_filter(
    signal: &Signal,
    process_noise_variance: Real,
    measurement_noise_variance: Real,
) -> Result<Signal, FilterError> {
    if signal.is_empty() {
        return Err(FilterError::EmptySignal);
    }
    for (name, value) in [
        ("Process noise variance", process_noise_variance),
        ("Measurement noise variance", measurement_noise_variance),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(FilterError::NonPositiveVariance { name, value });
        }
    }
    Ok(signal
        .iter()
        .window(KalmanWindow::new(
            process_noise_variance,
            measurement_noise_variance,
        ))
        .collect())
}
