use crate::{datatype::Signal, reconstruction::FilterError};
use pulse_recon_common::Real;
use rustfft::{FftPlanner, num_complex::Complex};

/// Frequencies of the DFT bins of an `n` sample signal taken every `dt`.
///
/// Bin `k` holds `k / (n dt)` for the first `(n + 1) / 2` bins and the
/// mirrored negative frequency `(k - n) / (n dt)` for the rest.
pub fn frequency_bins(n: usize, dt: Real) -> impl ExactSizeIterator<Item = Real> {
    let resolution = 1.0 / (n as Real * dt);
    let positive = n.div_ceil(2);
    (0..n).map(move |k| {
        if k < positive {
            k as Real * resolution
        } else {
            -((n - k) as Real) * resolution
        }
    })
}

/// Ideal low-pass filter: discards every frequency component above `cutoff_frequency`.
pub(crate) fn fourier_filter(
    signal: &Signal,
    dt: Real,
    cutoff_frequency: Real,
) -> Result<Signal, FilterError> {
    if signal.is_empty() {
        return Err(FilterError::EmptySignal);
    }
    if !(dt.is_finite() && dt > 0.0) {
        return Err(FilterError::NonPositiveInterval(dt));
    }
    if cutoff_frequency.is_nan() || cutoff_frequency <= 0.0 {
        return Err(FilterError::NonPositiveCutoff(cutoff_frequency));
    }

    let n = signal.len();
    let mut buffer: Vec<Complex<Real>> = signal.iter().map(|v| Complex::new(v, 0.0)).collect();

    let mut planner = FftPlanner::<Real>::new();
    planner.plan_fft_forward(n).process(&mut buffer);

    for (component, frequency) in buffer.iter_mut().zip(frequency_bins(n, dt)) {
        if frequency.abs() > cutoff_frequency {
            *component = Complex::default();
        }
    }

    planner.plan_fft_inverse(n).process(&mut buffer);

    // rustfft leaves the inverse unnormalised
    let scale = 1.0 / n as Real;
    Ok(buffer.into_iter().map(|component| component.re * scale).collect())
}
