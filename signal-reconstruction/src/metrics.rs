//! Scalar quality scores comparing a reference signal to a candidate.
use crate::{
    datatype::Signal,
    reconstruction::{Method, Reconstructions},
};
use pulse_recon_common::Real;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MetricError {
    #[error("Reference has {reference} samples but candidate has {candidate}")]
    LengthMismatch { reference: usize, candidate: usize },
    #[error("Cannot score empty signals")]
    EmptySignal,
}

fn check_lengths(reference: &Signal, candidate: &Signal) -> Result<(), MetricError> {
    if reference.len() != candidate.len() {
        Err(MetricError::LengthMismatch {
            reference: reference.len(),
            candidate: candidate.len(),
        })
    } else if reference.is_empty() {
        Err(MetricError::EmptySignal)
    } else {
        Ok(())
    }
}

fn mean_of<I: Iterator<Item = Real>>(values: I, len: usize) -> Real {
    values.sum::<Real>() / len as Real
}

pub fn mean_squared_error(reference: &Signal, candidate: &Signal) -> Result<Real, MetricError> {
    check_lengths(reference, candidate)?;
    Ok(mean_of(
        reference.iter().zip(candidate.iter()).map(|(r, c)| (r - c).powi(2)),
        reference.len(),
    ))
}

/// Ratio in decibels of the reference power to the residual power.
/// A perfect reconstruction scores `+inf`.
pub fn signal_to_noise_ratio(reference: &Signal, candidate: &Signal) -> Result<Real, MetricError> {
    let noise_power = mean_squared_error(reference, candidate)?;
    if noise_power == 0.0 {
        return Ok(Real::INFINITY);
    }
    let signal_power = mean_of(reference.iter().map(|r| r.powi(2)), reference.len());
    Ok(10.0 * Real::log10(signal_power / noise_power))
}

/// Difference in peak height, regardless of where each peak lies.
pub fn peak_amplitude_error(reference: &Signal, candidate: &Signal) -> Result<Real, MetricError> {
    check_lengths(reference, candidate)?;
    match (reference.max(), candidate.max()) {
        (Some(reference), Some(candidate)) => Ok((reference - candidate).abs()),
        _ => Err(MetricError::EmptySignal),
    }
}

/// Signed mean of `candidate - reference`.
pub fn reconstruction_bias(reference: &Signal, candidate: &Signal) -> Result<Real, MetricError> {
    check_lengths(reference, candidate)?;
    Ok(mean_of(
        reference.iter().zip(candidate.iter()).map(|(r, c)| c - r),
        reference.len(),
    ))
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricReport {
    #[serde(rename = "MSE")]
    pub mse: Real,
    #[serde(rename = "SNR", with = "decibels")]
    pub snr_db: Real,
    #[serde(rename = "Peak Error")]
    pub peak_amplitude_error: Real,
    #[serde(rename = "Bias")]
    pub bias: Real,
}

pub fn compute_all(reference: &Signal, candidate: &Signal) -> Result<MetricReport, MetricError> {
    Ok(MetricReport {
        mse: mean_squared_error(reference, candidate)?,
        snr_db: signal_to_noise_ratio(reference, candidate)?,
        peak_amplitude_error: peak_amplitude_error(reference, candidate)?,
        bias: reconstruction_bias(reference, candidate)?,
    })
}

/// One report for each reconstruction and the unfiltered baseline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodReports {
    #[serde(rename = "MA")]
    pub moving_average: MetricReport,
    #[serde(rename = "Fourier")]
    pub fourier: MetricReport,
    #[serde(rename = "Kalman")]
    pub kalman: MetricReport,
    #[serde(rename = "Noisy")]
    pub noisy: MetricReport,
}

impl MethodReports {
    /// Scores every reconstruction, and the noisy signal itself, against `clean`.
    pub fn compute(
        clean: &Signal,
        noisy: &Signal,
        reconstructions: &Reconstructions,
    ) -> Result<Self, MetricError> {
        Ok(Self {
            moving_average: compute_all(clean, &reconstructions.moving_average)?,
            fourier: compute_all(clean, &reconstructions.fourier)?,
            kalman: compute_all(clean, &reconstructions.kalman)?,
            noisy: compute_all(clean, noisy)?,
        })
    }

    pub fn get(&self, method: Method) -> &MetricReport {
        match method {
            Method::MovingAverage => &self.moving_average,
            Method::Fourier => &self.fourier,
            Method::Kalman => &self.kalman,
            Method::Noisy => &self.noisy,
        }
    }
}

/// JSON has no representation for infinities, so non-finite decibel values
/// are written as the strings `Infinity`, `-Infinity` or `NaN`.
mod decibels {
    use pulse_recon_common::Real;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decibels {
        Finite(Real),
        Token(String),
    }

    pub(super) fn serialize<S: Serializer>(value: &Real, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_str("-Infinity")
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Real, D::Error> {
        match Decibels::deserialize(deserializer)? {
            Decibels::Finite(value) => Ok(value),
            Decibels::Token(token) => match token.as_str() {
                "Infinity" => Ok(Real::INFINITY),
                "-Infinity" => Ok(Real::NEG_INFINITY),
                "NaN" => Ok(Real::NAN),
                other => Err(D::Error::custom(format!("invalid decibel value {other}"))),
            },
        }
    }
}
