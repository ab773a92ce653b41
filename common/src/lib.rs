mod csv_vec;
pub mod tracer;

pub use csv_vec::CSVVec;

pub type Real = f64;
pub type Seed = u64;
pub type SampleIndex = usize;

/// Seed used by every generator unless the caller overrides it.
pub const DEFAULT_SEED: Seed = 42;
