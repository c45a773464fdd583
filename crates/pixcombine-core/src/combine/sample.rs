use crate::consts::{DEFAULT_SCALE, DEFAULT_WEIGHT, DEFAULT_ZERO};
use crate::error::{CombineError, Result};
use crate::image::Coefficients;

use super::cursor::PixelColumn;

/// One image's contribution at a pixel, after the zero/scale transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleEntry {
    pub value: f64,
    pub weight: f64,
}

/// Zero offsets, reciprocal scales and weights for every image, always of
/// length N.
#[derive(Clone, Debug)]
pub struct ResolvedCoefficients {
    zero: Vec<f64>,
    inv_scale: Vec<f64>,
    weight: Vec<f64>,
}

impl ResolvedCoefficients {
    /// Fill missing coefficients with their defaults and check the supplied
    /// ones have one entry per image.
    pub fn resolve(coefficients: &Coefficients<'_>, nimages: usize) -> Result<Self> {
        let zero = materialize("zeros", coefficients.zero, nimages, DEFAULT_ZERO)?;
        let scale = materialize("scales", coefficients.scale, nimages, DEFAULT_SCALE)?;
        let weight = materialize("weights", coefficients.weight, nimages, DEFAULT_WEIGHT)?;

        Ok(Self {
            zero,
            inv_scale: scale.iter().map(|s| 1.0 / s).collect(),
            weight,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.zero.len()
    }

    /// `(raw - zero[i]) / scale[i]`
    pub fn transform(&self, index: usize, raw: f64) -> f64 {
        (raw - self.zero[index]) * self.inv_scale[index]
    }

    pub fn weight(&self, index: usize) -> f64 {
        self.weight[index]
    }
}

fn materialize(
    name: &'static str,
    supplied: Option<&[f64]>,
    nimages: usize,
    default: f64,
) -> Result<Vec<f64>> {
    match supplied {
        None => Ok(vec![default; nimages]),
        Some(values) if values.len() == nimages => Ok(values.to_vec()),
        Some(values) => Err(CombineError::CoefficientShape {
            name,
            len: values.len(),
            expected: nimages,
        }),
    }
}

/// Reusable per-pixel sample buffer.
#[derive(Clone, Debug, Default)]
pub struct Sample {
    entries: Vec<SampleEntry>,
}

impl Sample {
    pub fn with_capacity(nimages: usize) -> Self {
        Self {
            entries: Vec::with_capacity(nimages),
        }
    }

    /// Rebuild the sample from one pixel column, skipping masked images.
    pub fn assemble(&mut self, column: &PixelColumn, coefficients: &ResolvedCoefficients) {
        self.entries.clear();
        for (i, &raw) in column.values().iter().enumerate() {
            if column.is_masked(i) {
                continue;
            }
            self.entries.push(SampleEntry {
                value: coefficients.transform(i, raw),
                weight: coefficients.weight(i),
            });
        }
    }

    pub fn entries(&self) -> &[SampleEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [SampleEntry] {
        &mut self.entries
    }
}
