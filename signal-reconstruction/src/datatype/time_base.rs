use pulse_recon_common::{Real, SampleIndex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TimeBaseError {
    #[error("Time bounds must be finite, got [{0}, {1})")]
    NonFinite(Real, Real),
    #[error("End time {t_end} must exceed start time {t_start}")]
    EmptyRange { t_start: Real, t_end: Real },
    #[error("Sampling interval must be positive, got {0}")]
    NonPositiveInterval(Real),
}

/// The sample times shared by every signal in a run.
///
/// Samples are taken at `t_start + i * dt` for `i` in `0..len()`, where
/// `len() == ceil((t_end - t_start) / dt)`, so `t_end` itself is excluded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TimeBase {
    t_start: Real,
    t_end: Real,
    dt: Real,
}

impl TimeBase {
    pub fn new(t_start: Real, t_end: Real, dt: Real) -> Result<Self, TimeBaseError> {
        let time_base = Self { t_start, t_end, dt };
        time_base.validate()?;
        Ok(time_base)
    }

    /// Checks the invariants, required for instances obtained by deserialisation.
    pub fn validate(&self) -> Result<(), TimeBaseError> {
        if !self.t_start.is_finite() || !self.t_end.is_finite() {
            return Err(TimeBaseError::NonFinite(self.t_start, self.t_end));
        }
        if self.t_end <= self.t_start {
            return Err(TimeBaseError::EmptyRange {
                t_start: self.t_start,
                t_end: self.t_end,
            });
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(TimeBaseError::NonPositiveInterval(self.dt));
        }
        Ok(())
    }

    pub fn t_start(&self) -> Real {
        self.t_start
    }

    pub fn t_end(&self) -> Real {
        self.t_end
    }

    pub fn dt(&self) -> Real {
        self.dt
    }

    pub fn len(&self) -> usize {
        ((self.t_end - self.t_start) / self.dt).ceil() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn time_at(&self, index: SampleIndex) -> Real {
        self.t_start + index as Real * self.dt
    }

    pub fn times(&self) -> impl Iterator<Item = Real> + use<> {
        let time_base = *self;
        (0..self.len()).map(move |index| time_base.time_at(index))
    }
}

impl Default for TimeBase {
    fn default() -> Self {
        Self {
            t_start: 0.0,
            t_end: 100.0,
            dt: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn default_has_one_thousand_samples() {
        let time_base = TimeBase::default();
        assert_eq!(time_base.len(), 1000);
        assert_approx_eq!(time_base.time_at(500), 50.0, 1e-12);
        assert_approx_eq!(time_base.times().last().unwrap(), 99.9, 1e-9);
    }

    #[test]
    fn partial_step_is_rounded_up() {
        let time_base = TimeBase::new(0.0, 1.05, 0.1).unwrap();
        assert_eq!(time_base.len(), 11);
    }

    #[test]
    fn times_are_strictly_increasing() {
        let time_base = TimeBase::new(-5.0, 5.0, 0.25).unwrap();
        let times: Vec<_> = time_base.times().collect();
        assert_eq!(times.len(), 40);
        assert!(times.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn invalid_bounds() {
        assert_eq!(
            TimeBase::new(0.0, 0.0, 0.1),
            Err(TimeBaseError::EmptyRange {
                t_start: 0.0,
                t_end: 0.0
            })
        );
        assert_eq!(
            TimeBase::new(0.0, 10.0, 0.0),
            Err(TimeBaseError::NonPositiveInterval(0.0))
        );
        assert!(TimeBase::new(Real::NAN, 10.0, 0.1).is_err());
    }
}
