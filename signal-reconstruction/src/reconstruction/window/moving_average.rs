use super::{Window, WindowFilter};
use crate::{datatype::Signal, reconstruction::FilterError};
use pulse_recon_common::Real;
use std::collections::VecDeque;

/// Uniform kernel over the most recent `size` samples.
#[derive(Clone)]
pub(crate) struct MovingAverageWindow {
    size: usize,
    values: VecDeque<Real>,
}

impl MovingAverageWindow {
    pub(crate) fn new(size: usize) -> Self {
        MovingAverageWindow {
            size,
            values: VecDeque::with_capacity(size + 1),
        }
    }
}

impl Window for MovingAverageWindow {
    type InputType = Real;
    type OutputType = Real;

    fn push(&mut self, value: Real) -> bool {
        self.values.push_back(value);
        if self.values.len() > self.size {
            self.values.pop_front();
        }
        self.values.len() == self.size
    }

    fn output(&self) -> Option<Real> {
        (self.values.len() == self.size && self.size > 0)
            .then(|| self.values.iter().sum::<Real>() / self.size as Real)
    }
}

/// Smooths `signal` with a uniform kernel of `window_size` samples.
///
/// The boundary samples are replicated `window_size / 2` times on each side
/// so the output has the same length as the input. A window size of zero
/// is the identity.
pub(crate) fn moving_average(signal: &Signal, window_size: usize) -> Result<Signal, FilterError> {
    let (Some(first), Some(last)) = (signal.values().first(), signal.values().last()) else {
        return Err(FilterError::EmptySignal);
    };
    if window_size < 1 {
        return Ok(signal.clone());
    }
    let padding = window_size / 2;
    Ok(std::iter::repeat_n(*first, padding)
        .chain(signal.iter())
        .chain(std::iter::repeat_n(*last, padding))
        .window(MovingAverageWindow::new(window_size))
        .take(signal.len())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn window_fills_before_output() {
        let mut window = MovingAverageWindow::new(3);
        assert!(!window.push(1.0));
        assert_eq!(window.output(), None);
        assert!(!window.push(2.0));
        assert!(window.push(6.0));
        assert_approx_eq!(window.output().unwrap(), 3.0);
        assert!(window.push(7.0));
        assert_approx_eq!(window.output().unwrap(), 5.0);
    }

    #[test]
    fn unit_window_is_identity() {
        let signal = Signal::new(vec![0.3, -1.2, 4.0, 2.2, 0.0]);
        assert_eq!(moving_average(&signal, 1).unwrap(), signal);
    }

    #[test]
    fn zero_window_is_identity() {
        let signal = Signal::new(vec![0.3, -1.2, 4.0]);
        assert_eq!(moving_average(&signal, 0).unwrap(), signal);
    }

    #[test]
    fn edges_are_replicated() {
        let signal = Signal::new(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let output = moving_average(&signal, 3).unwrap();

        assert_eq!(output.len(), 5);
        assert_approx_eq!(output.values()[0], 4.0 / 3.0);
        assert_approx_eq!(output.values()[1], 2.0);
        assert_approx_eq!(output.values()[2], 3.0);
        assert_approx_eq!(output.values()[3], 4.0);
        assert_approx_eq!(output.values()[4], 14.0 / 3.0);
    }

    #[test]
    fn even_window_keeps_length() {
        let signal = Signal::new(vec![0.0, 0.0, 4.0, 0.0, 0.0]);
        let output = moving_average(&signal, 4).unwrap();

        assert_eq!(output.len(), 5);
        assert_approx_eq!(output.values()[0], 0.0);
        assert_approx_eq!(output.values()[1], 1.0);
        assert_approx_eq!(output.values()[2], 1.0);
        assert_approx_eq!(output.values()[3], 1.0);
        assert_approx_eq!(output.values()[4], 1.0);
    }

    #[test]
    fn single_sample() {
        let signal = Signal::new(vec![2.5]);
        assert_eq!(moving_average(&signal, 5).unwrap(), signal);
    }

    #[test]
    fn constant_signal_is_unchanged() {
        let signal = Signal::new(vec![0.7; 20]);
        let output = moving_average(&signal, 7).unwrap();
        assert!(output.iter().all(|v| (v - 0.7).abs() < 1e-12));
    }

    #[test]
    fn empty_signal() {
        assert_eq!(
            moving_average(&Signal::default(), 5),
            Err(FilterError::EmptySignal)
        );
    }
}
