//! Sequential filters expressed as windows pushed one sample at a time.
//!
//! A window consumes values from a source iterator and, once it has seen
//! enough of them, emits one output per input:
//! ```ignore
//! let smoothed: Vec<_> = samples.into_iter()
//!     .window(MovingAverageWindow::new(5))    // uniform kernel of five samples
//!     .collect();
//! ```
pub(crate) mod kalman;
pub(crate) mod moving_average;

pub(crate) trait Window {
    type InputType: Copy;
    type OutputType;

    /// Returns true once the window holds enough values to produce output.
    fn push(&mut self, value: Self::InputType) -> bool;
    fn output(&self) -> Option<Self::OutputType>;
}

pub(crate) struct WindowIter<I, W>
where
    I: Iterator,
    W: Window,
{
    window_function: W,
    source: I,
}

impl<I, W> WindowIter<I, W>
where
    I: Iterator,
    W: Window,
{
    pub(crate) fn new(source: I, window_function: W) -> Self {
        WindowIter {
            source,
            window_function,
        }
    }

    #[cfg(test)]
    pub(crate) fn get_window(&self) -> &W {
        &self.window_function
    }
}

impl<I, W> Iterator for WindowIter<I, W>
where
    I: Iterator,
    W: Window<InputType = I::Item>,
    I::Item: Copy,
{
    type Item = W::OutputType;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let val = self.source.next()?;
            if self.window_function.push(val) {
                return self.window_function.output();
            }
        }
    }
}

pub(crate) trait WindowFilter<I, W>
where
    I: Iterator,
    W: Window,
{
    fn window(self, window: W) -> WindowIter<I, W>;
}

impl<I, W> WindowFilter<I, W> for I
where
    I: Iterator,
    W: Window,
{
    fn window(self, window: W) -> WindowIter<I, W> {
        WindowIter::<I, W>::new(self, window)
    }
}
