use ndarray::Dimension;

use crate::error::{ArrayRole, CombineError, Result};
use crate::image::{Coefficients, ImageStack, OutputTriple};

use super::sample::ResolvedCoefficients;

/// Check every input against the first image before any pixel is touched.
///
/// Reports the first problem found, in this order: images, outputs, masks,
/// coefficients.
pub fn validate<F, M, D: Dimension>(
    stack: &ImageStack<'_, F, D, M>,
    output: &OutputTriple<'_, F, D>,
    coefficients: &Coefficients<'_>,
) -> Result<()> {
    let first = stack.images().first().ok_or(CombineError::EmptyInput)?;
    let expected = first.shape();

    for (index, image) in stack.images().iter().enumerate() {
        check_shape(ArrayRole::Image, index, expected, image.shape())?;
    }

    let planes = [
        output.value.shape(),
        output.variance.shape(),
        output.count.shape(),
    ];
    for (index, found) in planes.into_iter().enumerate() {
        check_shape(ArrayRole::Output, index, expected, found)?;
    }

    if let Some(masks) = stack.masks() {
        if masks.len() != stack.len() {
            return Err(CombineError::MaskCount {
                images: stack.len(),
                masks: masks.len(),
            });
        }
        for (index, mask) in masks.iter().enumerate() {
            if mask.shape() != expected {
                return Err(CombineError::MaskShape {
                    index,
                    expected: expected.to_vec(),
                    found: mask.shape().to_vec(),
                });
            }
        }
    }

    ResolvedCoefficients::resolve(coefficients, stack.len()).map(|_| ())
}

fn check_shape(role: ArrayRole, index: usize, expected: &[usize], found: &[usize]) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(CombineError::ShapeMismatch {
            role,
            index,
            expected: expected.to_vec(),
            found: found.to_vec(),
        })
    }
}
