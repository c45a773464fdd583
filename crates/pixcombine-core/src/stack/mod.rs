pub mod mean;
pub mod median;
pub mod minmax;
pub mod quantile_clip;
pub mod sigma_clip;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::combine::sample::SampleEntry;
use crate::error::{CombineError, Result};

pub use minmax::MinMaxParams;
pub use quantile_clip::QuantileClipParams;
pub use sigma_clip::SigmaClipParams;

/// Outcome of reducing one pixel's sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Reduction {
    pub value: f64,
    pub variance: f64,
    /// Entries that survived rejection and contributed to `value`.
    pub count: usize,
}

impl Reduction {
    /// Result for a pixel with no usable samples.
    pub const EMPTY: Reduction = Reduction {
        value: 0.0,
        variance: 0.0,
        count: 0,
    };
}

/// Statistical reduction applied independently at every pixel.
///
/// Built once per combine call and shared by every pixel (and every worker
/// thread on the parallel path).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CombineMethod {
    #[default]
    Mean,
    Median,
    #[serde(rename = "minmax")]
    MinMax(MinMaxParams),
    SigmaClip(SigmaClipParams),
    QuantileClip(QuantileClipParams),
}

impl CombineMethod {
    pub fn mean() -> Self {
        CombineMethod::Mean
    }

    pub fn median() -> Self {
        CombineMethod::Median
    }

    pub fn minmax(nmin: usize, nmax: usize) -> Self {
        CombineMethod::MinMax(MinMaxParams { nmin, nmax })
    }

    pub fn sigma_clip(low: f64, high: f64) -> Self {
        CombineMethod::SigmaClip(SigmaClipParams { low, high })
    }

    /// Fails with `InvalidParameter` unless `0 <= fraction <= 0.4`.
    pub fn quantile_clip(fraction: f64) -> Result<Self> {
        QuantileClipParams::new(fraction).map(CombineMethod::QuantileClip)
    }

    pub fn name(&self) -> &'static str {
        match self {
            CombineMethod::Mean => "mean",
            CombineMethod::Median => "median",
            CombineMethod::MinMax(_) => "minmax",
            CombineMethod::SigmaClip(_) => "sigmaclip",
            CombineMethod::QuantileClip(_) => "quantileclip",
        }
    }

    /// Reduce one sample. Entries may be reordered in place.
    pub fn reduce(&self, entries: &mut [SampleEntry]) -> Reduction {
        match self {
            CombineMethod::Mean => mean::reduce(entries),
            CombineMethod::Median => median::reduce(entries),
            CombineMethod::MinMax(params) => minmax::reduce(entries, params),
            CombineMethod::SigmaClip(params) => sigma_clip::reduce(entries, params),
            CombineMethod::QuantileClip(params) => quantile_clip::reduce(entries, params),
        }
    }
}

impl fmt::Display for CombineMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombineMethod::Mean | CombineMethod::Median => write!(f, "{}", self.name()),
            CombineMethod::MinMax(p) => write!(f, "minmax:{},{}", p.nmin, p.nmax),
            CombineMethod::SigmaClip(p) => write!(f, "sigmaclip:{},{}", p.low, p.high),
            CombineMethod::QuantileClip(p) => write!(f, "quantileclip:{}", p.fraction()),
        }
    }
}

/// Parses `mean`, `median`, `minmax:NMIN,NMAX`, `sigmaclip:LOW,HIGH` and
/// `quantileclip:FRACTION`. Names are case-insensitive; `sigma-clip` style
/// spellings are accepted too.
impl FromStr for CombineMethod {
    type Err = CombineError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, args) = match s.split_once(':') {
            Some((name, args)) => (name, Some(args)),
            None => (s, None),
        };
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "mean" => no_args(name, args).map(|_| CombineMethod::Mean),
            "median" => no_args(name, args).map(|_| CombineMethod::Median),
            "minmax" => {
                let [nmin, nmax] = parse_args::<usize, 2>(name, args)?;
                Ok(CombineMethod::minmax(nmin, nmax))
            }
            "sigmaclip" => {
                let [low, high] = parse_args::<f64, 2>(name, args)?;
                Ok(CombineMethod::sigma_clip(low, high))
            }
            "quantileclip" => {
                let [fraction] = parse_args::<f64, 1>(name, args)?;
                CombineMethod::quantile_clip(fraction)
            }
            _ => Err(CombineError::UnsupportedMethod(name.trim().to_string())),
        }
    }
}

fn no_args(name: &str, args: Option<&str>) -> Result<()> {
    match args {
        Some(a) if !a.trim().is_empty() => Err(CombineError::InvalidParameter(format!(
            "{} takes no parameters, got '{a}'",
            name.trim()
        ))),
        _ => Ok(()),
    }
}

fn parse_args<T: FromStr, const N: usize>(name: &str, args: Option<&str>) -> Result<[T; N]> {
    let invalid = || {
        CombineError::InvalidParameter(format!(
            "{} expects {} comma-separated parameter(s), got '{}'",
            name.trim(),
            N,
            args.unwrap_or("")
        ))
    };

    let parsed: Vec<T> = args
        .ok_or_else(invalid)?
        .split(',')
        .map(|part| part.trim().parse::<T>().map_err(|_| invalid()))
        .collect::<Result<_>>()?;

    parsed.try_into().map_err(|_| invalid())
}
