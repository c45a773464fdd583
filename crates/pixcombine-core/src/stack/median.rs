use crate::combine::sample::SampleEntry;

use super::mean::mean_of;
use super::Reduction;

/// Median value; variance is the population variance of the whole sample.
/// Nothing is rejected, so `count` equals the sample size.
pub fn reduce(entries: &mut [SampleEntry]) -> Reduction {
    match entries.len() {
        0 => Reduction::EMPTY,
        1 => Reduction {
            value: entries[0].value,
            variance: 0.0,
            count: 1,
        },
        _ => {
            sort_by_value(entries);
            let stats = mean_of(entries.iter().map(|e| e.value));
            Reduction {
                value: median_sorted(entries),
                ..stats
            }
        }
    }
}

/// Ascending order, NaN last.
pub(crate) fn sort_by_value(entries: &mut [SampleEntry]) {
    entries.sort_unstable_by(|a, b| a.value.total_cmp(&b.value));
}

/// Median of entries already sorted by value. Caller guarantees non-empty.
pub(crate) fn median_sorted(entries: &[SampleEntry]) -> f64 {
    let n = entries.len();
    let mid = n / 2;
    if n % 2 == 1 {
        entries[mid].value
    } else {
        (entries[mid - 1].value + entries[mid].value) / 2.0
    }
}
