use serde::{Deserialize, Serialize};

use crate::combine::sample::SampleEntry;
use crate::consts::{DEFAULT_SIGMA_CLIP_HIGH, DEFAULT_SIGMA_CLIP_LOW};

use super::mean::mean_of;
use super::median::{median_sorted, sort_by_value};
use super::Reduction;

/// Rejection thresholds for sigma-clipped mean.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SigmaClipParams {
    /// Values more than `low` standard deviations below the centre are rejected.
    pub low: f64,
    /// Values more than `high` standard deviations above the centre are rejected.
    pub high: f64,
}

impl Default for SigmaClipParams {
    fn default() -> Self {
        Self {
            low: DEFAULT_SIGMA_CLIP_LOW,
            high: DEFAULT_SIGMA_CLIP_HIGH,
        }
    }
}

/// Iterative sigma clipping followed by the mean of the survivors.
///
/// Each pass centres the window `[centre - low*std, centre + high*std]` on
/// the median of the retained values, with `std` their population standard
/// deviation. Passes repeat until nothing is rejected or a single value is
/// left. A pass that would reject every remaining value is discarded.
///
/// On sorted data the window always keeps a contiguous run, so the retained
/// set is tracked as an index range.
pub fn reduce(entries: &mut [SampleEntry], params: &SigmaClipParams) -> Reduction {
    if entries.len() < 2 {
        return mean_of(entries.iter().map(|e| e.value));
    }

    sort_by_value(entries);
    let mut start = 0;
    let mut end = entries.len();

    while end - start > 1 {
        let retained = &entries[start..end];
        let centre = median_sorted(retained);
        let std = mean_of(retained.iter().map(|e| e.value)).variance.sqrt();
        let lo = centre - params.low * std;
        let hi = centre + params.high * std;

        let below = retained.iter().take_while(|e| e.value < lo).count();
        let above = retained.iter().rev().take_while(|e| e.value > hi).count();

        if below == 0 && above == 0 {
            break;
        }
        if below + above >= retained.len() {
            break;
        }
        start += below;
        end -= above;
    }

    mean_of(entries[start..end].iter().map(|e| e.value))
}
