use serde::{Deserialize, Serialize};

use crate::combine::sample::SampleEntry;
use crate::consts::{MAX_QUANTILE_FRACTION, QUANTILE_FLOOR_TOLERANCE};
use crate::error::{CombineError, Result};

use super::mean::mean_of;
use super::median::sort_by_value;
use super::Reduction;

/// Fraction of the sample trimmed from each tail, in `[0, 0.4]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuantileClipParams")]
pub struct QuantileClipParams {
    fraction: f64,
}

#[derive(Deserialize)]
struct RawQuantileClipParams {
    fraction: f64,
}

impl TryFrom<RawQuantileClipParams> for QuantileClipParams {
    type Error = CombineError;

    fn try_from(raw: RawQuantileClipParams) -> Result<Self> {
        Self::new(raw.fraction)
    }
}

impl QuantileClipParams {
    pub fn new(fraction: f64) -> Result<Self> {
        if !(0.0..=MAX_QUANTILE_FRACTION).contains(&fraction) {
            return Err(CombineError::InvalidParameter(format!(
                "quantile clip fraction {fraction} outside [0, {}]",
                MAX_QUANTILE_FRACTION
            )));
        }
        Ok(Self { fraction })
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Entries dropped from each tail of a sample of `size`.
    pub fn clipped_per_tail(&self, size: usize) -> usize {
        // 0.29 * 100 evaluates to 28.999999999999996
        (self.fraction * size as f64 + QUANTILE_FLOOR_TOLERANCE).floor() as usize
    }
}

/// Drop `floor(fraction * n)` values from each end, then take the mean.
///
/// `2 * floor(0.4 * n) < n`, so a non-empty sample never empties.
pub fn reduce(entries: &mut [SampleEntry], params: &QuantileClipParams) -> Reduction {
    let n = entries.len();
    let k = params.clipped_per_tail(n);
    if k == 0 {
        return mean_of(entries.iter().map(|e| e.value));
    }

    sort_by_value(entries);
    mean_of(entries[k..n - k].iter().map(|e| e.value))
}
