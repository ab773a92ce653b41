mod signal;
mod time_base;

pub use signal::Signal;
pub use time_base::{TimeBase, TimeBaseError};
