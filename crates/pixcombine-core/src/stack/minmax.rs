use serde::{Deserialize, Serialize};

use crate::combine::sample::SampleEntry;

use super::mean::mean_of;
use super::median::sort_by_value;
use super::Reduction;

/// Number of extreme values discarded from each end before averaging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinMaxParams {
    pub nmin: usize,
    pub nmax: usize,
}

/// Drop the `nmin` lowest and `nmax` highest values, then take the mean.
///
/// When `nmin + nmax` would consume the whole sample the pixel is reported
/// as empty (`Reduction::EMPTY`).
pub fn reduce(entries: &mut [SampleEntry], params: &MinMaxParams) -> Reduction {
    let n = entries.len();
    if params.nmin.saturating_add(params.nmax) >= n {
        return Reduction::EMPTY;
    }

    sort_by_value(entries);
    mean_of(entries[params.nmin..n - params.nmax].iter().map(|e| e.value))
}
