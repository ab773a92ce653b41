use pulse_recon_common::Real;
use serde::{Deserialize, Serialize};

/// A sequence of samples aligned one to one with a [super::TimeBase].
///
/// Signals are never modified in place, every transformation produces a new one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signal(Vec<Real>);

impl Signal {
    pub fn new(values: Vec<Real>) -> Self {
        Self(values)
    }

    pub fn zeros(len: usize) -> Self {
        Self(vec![Real::default(); len])
    }

    pub fn values(&self) -> &[Real] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Real> + '_ {
        self.0.iter().copied()
    }

    pub fn into_inner(self) -> Vec<Real> {
        self.0
    }

    /// Largest sample, or `None` for an empty signal.
    pub fn max(&self) -> Option<Real> {
        self.iter().reduce(Real::max)
    }

    /// Index of the first occurrence of the largest sample.
    pub fn argmax(&self) -> Option<usize> {
        self.iter()
            .enumerate()
            .reduce(|best, next| if next.1 > best.1 { next } else { best })
            .map(|(index, _)| index)
    }

    pub fn mean(&self) -> Option<Real> {
        (!self.is_empty()).then(|| self.iter().sum::<Real>() / self.len() as Real)
    }

    /// Adds `displacement` sample by sample.
    pub(crate) fn displaced_by<I>(&self, displacement: I) -> Self
    where
        I: IntoIterator<Item = Real>,
    {
        self.iter()
            .zip(displacement)
            .map(|(value, offset)| value + offset)
            .collect()
    }
}

impl From<Vec<Real>> for Signal {
    fn from(values: Vec<Real>) -> Self {
        Self(values)
    }
}

impl FromIterator<Real> for Signal {
    fn from_iter<T: IntoIterator<Item = Real>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl AsRef<[Real]> for Signal {
    fn as_ref(&self) -> &[Real] {
        &self.0
    }
}
