/// Minimum pixel count to use chunk-level Rayon parallelism in `ParallelMode::Auto`.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Number of consecutive pixels handed to one Rayon task.
pub const PARALLEL_CHUNK_SIZE: usize = 4096;

/// Largest fraction of each tail that quantile clipping may discard.
pub const MAX_QUANTILE_FRACTION: f64 = 0.4;

/// Added to `fraction * n` before flooring so products that land just below
/// an integer still count it.
pub const QUANTILE_FLOOR_TOLERANCE: f64 = 1e-9;

/// Default lower rejection threshold for sigma clipping, in standard deviations.
pub const DEFAULT_SIGMA_CLIP_LOW: f64 = 3.0;

/// Default upper rejection threshold for sigma clipping, in standard deviations.
pub const DEFAULT_SIGMA_CLIP_HIGH: f64 = 3.0;

/// Default additive offset applied to every image.
pub const DEFAULT_ZERO: f64 = 0.0;

/// Default multiplicative scale applied to every image.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Default combination weight of every image.
pub const DEFAULT_WEIGHT: f64 = 1.0;
