use ndarray::iter::{Iter, IterMut};
use ndarray::Dimension;

use crate::image::{ImageStack, MaskValue, OutputTriple, Pixel};
use crate::stack::Reduction;

/// Raw image values and mask flags of every image at one pixel.
#[derive(Clone, Debug, Default)]
pub struct PixelColumn {
    values: Vec<f64>,
    masked: Vec<bool>,
}

impl PixelColumn {
    pub fn with_capacity(nimages: usize) -> Self {
        Self {
            values: Vec::with_capacity(nimages),
            masked: Vec::with_capacity(nimages),
        }
    }

    /// Replace the column contents. An empty `masked` means no masks.
    pub fn fill(
        &mut self,
        values: impl IntoIterator<Item = f64>,
        masked: impl IntoIterator<Item = bool>,
    ) {
        self.values.clear();
        self.values.extend(values);
        self.masked.clear();
        self.masked.extend(masked);
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn is_masked(&self, index: usize) -> bool {
        self.masked.get(index).copied().unwrap_or(false)
    }
}

/// Write handles into the three output planes at one pixel.
#[derive(Debug)]
pub struct PixelSlot<'a, F> {
    pub value: &'a mut F,
    pub variance: &'a mut F,
    pub count: &'a mut u32,
}

impl<F: Pixel> PixelSlot<'_, F> {
    pub fn write(self, reduction: Reduction) {
        *self.value = F::from_sample(reduction.value);
        *self.variance = F::from_sample(reduction.variance);
        *self.count = u32::try_from(reduction.count).unwrap_or(u32::MAX);
    }
}

/// Lock-step walk over N images, their optional masks and the output triple.
///
/// Every array is traversed in logical row-major order (last axis fastest),
/// whatever its memory layout. Shapes must already be validated as equal.
/// The cursor is single-use: once exhausted it stays exhausted.
pub struct PixelCursor<'a, F, M, D: Dimension> {
    images: Vec<Iter<'a, F, D>>,
    masks: Option<Vec<Iter<'a, M, D>>>,
    value: IterMut<'a, F, D>,
    variance: IterMut<'a, F, D>,
    count: IterMut<'a, u32, D>,
    remaining: usize,
}

impl<'a, F: Pixel, M: MaskValue, D: Dimension> PixelCursor<'a, F, M, D> {
    /// The images may outlive the output views; the cursor lives as long as
    /// the shorter of the two.
    pub fn new<'i: 'a>(stack: ImageStack<'i, F, D, M>, output: OutputTriple<'a, F, D>) -> Self {
        let remaining = output.value.len();
        Self {
            images: stack.images().iter().map(|image| image.iter()).collect(),
            masks: stack
                .masks()
                .map(|masks| masks.iter().map(|mask| mask.iter()).collect()),
            value: output.value.into_iter(),
            variance: output.variance.into_iter(),
            count: output.count.into_iter(),
            remaining,
        }
    }

    /// Load the next pixel's values and flags into `column` and hand out its
    /// output slot, or `None` once every pixel has been visited.
    pub fn advance(&mut self, column: &mut PixelColumn) -> Option<PixelSlot<'a, F>> {
        if self.remaining == 0 {
            return None;
        }

        let slot = PixelSlot {
            value: self.value.next()?,
            variance: self.variance.next()?,
            count: self.count.next()?,
        };

        column.values.clear();
        for image in &mut self.images {
            column.values.push(image.next().copied()?.to_sample());
        }
        column.masked.clear();
        if let Some(masks) = &mut self.masks {
            for mask in masks {
                column.masked.push(mask.next().copied()?.is_masked());
            }
        }

        self.remaining -= 1;
        Some(slot)
    }
}
