#![allow(dead_code)]

use ndarray::{Array, Array2, ArrayView, Dimension};

use pixcombine_core::{Combined, CombineMethod, Coefficients, ImageStack};

/// Constant image.
pub fn make_image(h: usize, w: usize, fill: f64) -> Array2<f64> {
    Array2::from_elem((h, w), fill)
}

/// Ramp image whose values depend on position and `offset`.
pub fn make_ramp(h: usize, w: usize, offset: f64) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(r, c)| offset + (r * w + c) as f64 * 0.001)
}

/// One 1x1 image per value, for testing a single pixel's sample.
pub fn single_pixel_images(values: &[f64]) -> Vec<Array2<f64>> {
    values.iter().map(|&v| make_image(1, 1, v)).collect()
}

pub fn views<A, D: Dimension>(arrays: &[Array<A, D>]) -> Vec<ArrayView<'_, A, D>> {
    arrays.iter().map(|a| a.view()).collect()
}

/// Combine 1x1 images holding `values` and return (value, variance, count).
pub fn reduce_pixel(method: CombineMethod, values: &[f64]) -> (f64, f64, u32) {
    let images = single_pixel_images(values);
    let views = views(&images);
    let result: Combined<f64, _> = pixcombine_core::stack_images(
        &method,
        &ImageStack::new(&views),
        &Coefficients::default(),
    )
    .unwrap();
    (
        result.value[[0, 0]],
        result.variance[[0, 0]],
        result.count[[0, 0]],
    )
}
