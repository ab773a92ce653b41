use pulse_recon_common::Real;
use serde::{Deserialize, Serialize};

/// Population mean and standard deviation, `None` for an empty sample.
pub(crate) fn mean_and_std(values: &[Real]) -> Option<(Real, Real)> {
    if values.is_empty() {
        return None;
    }
    let len = values.len() as Real;
    let mean = values.iter().sum::<Real>() / len;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<Real>() / len;
    Some((mean, variance.sqrt()))
}

/// Bias statistics of one event count in the scaling study.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventScalingEntry {
    #[serde(rename = "MA_bias_mean")]
    pub ma_bias_mean: Real,
    #[serde(rename = "MA_bias_std")]
    pub ma_bias_std: Real,
    #[serde(rename = "KF_bias_mean")]
    pub kf_bias_mean: Real,
    #[serde(rename = "KF_bias_std")]
    pub kf_bias_std: Real,
    /// The first biases, kept for histogramming.
    #[serde(rename = "MA_biases")]
    pub ma_biases: Vec<Real>,
    #[serde(rename = "KF_biases")]
    pub kf_biases: Vec<Real>,
}

impl EventScalingEntry {
    pub(crate) fn from_biases(
        ma_biases: &[Real],
        kf_biases: &[Real],
        sample_size: usize,
    ) -> Option<Self> {
        let (ma_bias_mean, ma_bias_std) = mean_and_std(ma_biases)?;
        let (kf_bias_mean, kf_bias_std) = mean_and_std(kf_biases)?;
        Some(Self {
            ma_bias_mean,
            ma_bias_std,
            kf_bias_mean,
            kf_bias_std,
            ma_biases: ma_biases.iter().take(sample_size).copied().collect(),
            kf_biases: kf_biases.iter().take(sample_size).copied().collect(),
        })
    }
}
