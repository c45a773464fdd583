use crate::combine::sample::SampleEntry;

use super::Reduction;

/// Unweighted mean with population variance (divisor = sample size).
pub fn reduce(entries: &[SampleEntry]) -> Reduction {
    mean_of(entries.iter().map(|e| e.value))
}

/// Single pass mean and variance from the running sum and sum of squares.
///
/// Zero values give `Reduction::EMPTY`; a single value is returned as-is with
/// zero variance.
pub(crate) fn mean_of<I>(values: I) -> Reduction
where
    I: IntoIterator<Item = f64>,
{
    let mut count = 0usize;
    let mut first = 0.0;
    let mut sum = 0.0;
    let mut sum2 = 0.0;

    for v in values {
        if count == 0 {
            first = v;
        }
        count += 1;
        sum += v;
        sum2 += v * v;
    }

    match count {
        0 => Reduction::EMPTY,
        1 => Reduction {
            value: first,
            variance: 0.0,
            count: 1,
        },
        _ => {
            let n = count as f64;
            // Cancellation can leave a tiny negative residue for near-constant
            // data. NaN passes through.
            let raw = sum2 / n - (sum * sum) / (n * n);
            let variance = if raw < 0.0 { 0.0 } else { raw };
            Reduction {
                value: sum / n,
                variance,
                count,
            }
        }
    }
}
