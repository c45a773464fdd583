pub mod cursor;
pub mod sample;
pub mod validate;

use ndarray::{ArrayView1, ArrayViewMut1, Dimension};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::CombineConfig;
use crate::consts::PARALLEL_CHUNK_SIZE;
use crate::error::{CombineError, Result};
use crate::image::{Coefficients, Combined, ImageStack, MaskValue, OutputTriple, Pixel};
use crate::stack::{CombineMethod, SigmaClipParams};

use cursor::{PixelColumn, PixelCursor};
use sample::{ResolvedCoefficients, Sample};

pub use validate::validate;

/// Combine a stack of images into caller-supplied value, variance and count
/// planes.
///
/// Inputs are validated first; on error the outputs are left untouched.
/// Large images are split across Rayon workers (see `ParallelMode::Auto`).
pub fn combine<F: Pixel, M: MaskValue, D: Dimension>(
    method: &CombineMethod,
    stack: &ImageStack<'_, F, D, M>,
    output: &mut OutputTriple<'_, F, D>,
    coefficients: &Coefficients<'_>,
) -> Result<()> {
    combine_with_config(&CombineConfig::new(*method), stack, output, coefficients)
}

/// `combine` with an explicit execution policy.
pub fn combine_with_config<F: Pixel, M: MaskValue, D: Dimension>(
    config: &CombineConfig,
    stack: &ImageStack<'_, F, D, M>,
    output: &mut OutputTriple<'_, F, D>,
    coefficients: &Coefficients<'_>,
) -> Result<()> {
    validate(stack, output, coefficients)?;
    let resolved = ResolvedCoefficients::resolve(coefficients, stack.len())?;
    let method = &config.method;
    let npixels = output.value.len();

    info!(
        method = %method,
        images = stack.len(),
        masked = stack.masks().is_some(),
        shape = ?output.value.shape(),
        "Combining images"
    );

    if config.parallel.should_parallelize(npixels) {
        match ContiguousStack::borrow(stack, output) {
            Some(contiguous) => {
                debug!(
                    pixels = npixels,
                    chunks = npixels.div_ceil(PARALLEL_CHUNK_SIZE),
                    "Parallel combine"
                );
                contiguous.run(method, &resolved);
            }
            None => {
                warn!("Arrays are not contiguous, falling back to sequential combine");
                walk(PixelCursor::new(*stack, output.reborrow()), method, &resolved);
            }
        }
    } else {
        debug!(pixels = npixels, "Sequential combine");
        walk(PixelCursor::new(*stack, output.reborrow()), method, &resolved);
    }

    let missing = output.count.iter().filter(|&&c| c == 0).count();
    if missing > 0 {
        info!(
            missing,
            fraction = missing as f64 / npixels as f64,
            "Positions without contributing samples"
        );
    }
    Ok(())
}

/// Allocate an output triple shaped like the images and combine into it.
pub fn stack_images<F: Pixel, M: MaskValue, D: Dimension>(
    method: &CombineMethod,
    stack: &ImageStack<'_, F, D, M>,
    coefficients: &Coefficients<'_>,
) -> Result<Combined<F, D>> {
    let first = stack.images().first().ok_or(CombineError::EmptyInput)?;
    let mut result = Combined::zeros(first.raw_dim());
    combine(method, stack, &mut result.view_mut(), coefficients)?;
    Ok(result)
}

/// Stack images by computing the mean at each pixel.
pub fn mean_stack<F: Pixel, M: MaskValue, D: Dimension>(
    stack: &ImageStack<'_, F, D, M>,
) -> Result<Combined<F, D>> {
    stack_images(&CombineMethod::Mean, stack, &Coefficients::default())
}

/// Stack images by computing the median at each pixel.
pub fn median_stack<F: Pixel, M: MaskValue, D: Dimension>(
    stack: &ImageStack<'_, F, D, M>,
) -> Result<Combined<F, D>> {
    stack_images(&CombineMethod::Median, stack, &Coefficients::default())
}

/// Mean after discarding the `nmin` lowest and `nmax` highest values.
pub fn minmax_stack<F: Pixel, M: MaskValue, D: Dimension>(
    stack: &ImageStack<'_, F, D, M>,
    nmin: usize,
    nmax: usize,
) -> Result<Combined<F, D>> {
    stack_images(
        &CombineMethod::minmax(nmin, nmax),
        stack,
        &Coefficients::default(),
    )
}

/// Stack images using sigma-clipped mean.
pub fn sigma_clip_stack<F: Pixel, M: MaskValue, D: Dimension>(
    stack: &ImageStack<'_, F, D, M>,
    params: &SigmaClipParams,
) -> Result<Combined<F, D>> {
    stack_images(
        &CombineMethod::SigmaClip(*params),
        stack,
        &Coefficients::default(),
    )
}

/// Mean after trimming `fraction` of the sample from each tail.
pub fn quantile_clip_stack<F: Pixel, M: MaskValue, D: Dimension>(
    stack: &ImageStack<'_, F, D, M>,
    fraction: f64,
) -> Result<Combined<F, D>> {
    stack_images(
        &CombineMethod::quantile_clip(fraction)?,
        stack,
        &Coefficients::default(),
    )
}

fn walk<F: Pixel, M: MaskValue, D: Dimension>(
    mut cursor: PixelCursor<'_, F, M, D>,
    method: &CombineMethod,
    coefficients: &ResolvedCoefficients,
) {
    let mut column = PixelColumn::with_capacity(coefficients.len());
    let mut sample = Sample::with_capacity(coefficients.len());

    while let Some(slot) = cursor.advance(&mut column) {
        sample.assemble(&column, coefficients);
        slot.write(method.reduce(sample.entries_mut()));
    }
}

/// Flat row-major slices of every array, available only when all of them are
/// in standard layout.
struct ContiguousStack<'s, F, M> {
    images: Vec<&'s [F]>,
    masks: Option<Vec<&'s [M]>>,
    value: &'s mut [F],
    variance: &'s mut [F],
    count: &'s mut [u32],
}

impl<'s, F: Pixel, M: MaskValue> ContiguousStack<'s, F, M> {
    fn borrow<'i: 's, D: Dimension>(
        stack: &ImageStack<'i, F, D, M>,
        output: &'s mut OutputTriple<'_, F, D>,
    ) -> Option<Self> {
        let images = stack
            .images()
            .iter()
            .map(|array| array.to_slice())
            .collect::<Option<Vec<_>>>()?;
        let masks = match stack.masks() {
            Some(masks) => Some(
                masks
                    .iter()
                    .map(|array| array.to_slice())
                    .collect::<Option<Vec<_>>>()?,
            ),
            None => None,
        };

        Some(Self {
            images,
            masks,
            value: output.value.as_slice_mut()?,
            variance: output.variance.as_slice_mut()?,
            count: output.count.as_slice_mut()?,
        })
    }

    /// Walk disjoint pixel ranges on the Rayon pool. Each range gets its own
    /// one-dimensional cursor over the same positions of every array.
    fn run(self, method: &CombineMethod, coefficients: &ResolvedCoefficients) {
        let ContiguousStack {
            images,
            masks,
            value,
            variance,
            count,
        } = self;

        value
            .par_chunks_mut(PARALLEL_CHUNK_SIZE)
            .zip(variance.par_chunks_mut(PARALLEL_CHUNK_SIZE))
            .zip(count.par_chunks_mut(PARALLEL_CHUNK_SIZE))
            .enumerate()
            .for_each(|(chunk, ((value, variance), count))| {
                let start = chunk * PARALLEL_CHUNK_SIZE;
                let range = start..start + value.len();

                let chunk_images: Vec<ArrayView1<'_, F>> = images
                    .iter()
                    .map(|image| ArrayView1::from(&image[range.clone()]))
                    .collect();
                let chunk_masks: Option<Vec<ArrayView1<'_, M>>> = masks.as_ref().map(|masks| {
                    masks
                        .iter()
                        .map(|mask| ArrayView1::from(&mask[range.clone()]))
                        .collect()
                });

                let stack = ImageStack::from_parts(&chunk_images, chunk_masks.as_deref());
                let output = OutputTriple::new(
                    ArrayViewMut1::from(value),
                    ArrayViewMut1::from(variance),
                    ArrayViewMut1::from(count),
                );
                walk(PixelCursor::new(stack, output), method, coefficients);
            });
    }
}
