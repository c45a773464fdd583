use ndarray::{Array, ArrayView, ArrayViewMut, Dimension};
use num_traits::Float;

/// Floating point element type of image, value and variance arrays.
///
/// Reductions always run in `f64`; this trait moves pixels in and out of
/// that working precision.
pub trait Pixel: Float + Send + Sync + 'static {
    fn to_sample(self) -> f64;
    fn from_sample(value: f64) -> Self;
}

impl Pixel for f32 {
    fn to_sample(self) -> f64 {
        self as f64
    }

    fn from_sample(value: f64) -> Self {
        value as f32
    }
}

impl Pixel for f64 {
    fn to_sample(self) -> f64 {
        self
    }

    fn from_sample(value: f64) -> Self {
        value
    }
}

/// Element type of a bad-pixel mask. A `true` / non-zero entry excludes the
/// corresponding image pixel from the sample.
pub trait MaskValue: Copy + Send + Sync + 'static {
    fn is_masked(self) -> bool;
}

impl MaskValue for bool {
    fn is_masked(self) -> bool {
        self
    }
}

macro_rules! impl_integer_mask {
    ($($t:ty),*) => {
        $(
            impl MaskValue for $t {
                fn is_masked(self) -> bool {
                    self != 0
                }
            }
        )*
    };
}

impl_integer_mask!(u8, i8, u16, i16, u32, i32);

/// The images to combine, plus an optional mask per image.
///
/// Both are borrowed from the caller for the duration of one combine call.
#[derive(Debug)]
pub struct ImageStack<'a, F, D: Dimension, M = bool> {
    images: &'a [ArrayView<'a, F, D>],
    masks: Option<&'a [ArrayView<'a, M, D>]>,
}

impl<F, D: Dimension, M> Clone for ImageStack<'_, F, D, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F, D: Dimension, M> Copy for ImageStack<'_, F, D, M> {}

impl<'a, F, D: Dimension> ImageStack<'a, F, D> {
    pub fn new(images: &'a [ArrayView<'a, F, D>]) -> Self {
        Self {
            images,
            masks: None,
        }
    }
}

impl<'a, F, D: Dimension, M> ImageStack<'a, F, D, M> {
    pub fn from_parts(
        images: &'a [ArrayView<'a, F, D>],
        masks: Option<&'a [ArrayView<'a, M, D>]>,
    ) -> Self {
        Self { images, masks }
    }

    /// Attach one mask per image.
    pub fn with_masks<M2>(self, masks: &'a [ArrayView<'a, M2, D>]) -> ImageStack<'a, F, D, M2> {
        ImageStack {
            images: self.images,
            masks: Some(masks),
        }
    }

    pub fn images(&self) -> &'a [ArrayView<'a, F, D>] {
        self.images
    }

    pub fn masks(&self) -> Option<&'a [ArrayView<'a, M, D>]> {
        self.masks
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Per-image zero offsets, scales and weights.
///
/// Any of the three may be left out; missing ones default to
/// 0.0, 1.0 and 1.0 for every image.
#[derive(Clone, Copy, Debug, Default)]
pub struct Coefficients<'a> {
    pub zero: Option<&'a [f64]>,
    pub scale: Option<&'a [f64]>,
    pub weight: Option<&'a [f64]>,
}

impl<'a> Coefficients<'a> {
    pub fn new(
        zero: Option<&'a [f64]>,
        scale: Option<&'a [f64]>,
        weight: Option<&'a [f64]>,
    ) -> Self {
        Self {
            zero,
            scale,
            weight,
        }
    }

    pub fn with_zero(mut self, zero: &'a [f64]) -> Self {
        self.zero = Some(zero);
        self
    }

    pub fn with_scale(mut self, scale: &'a [f64]) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_weight(mut self, weight: &'a [f64]) -> Self {
        self.weight = Some(weight);
        self
    }
}

/// Caller-owned destination of a combine: value, variance and count planes.
#[derive(Debug)]
pub struct OutputTriple<'a, F, D: Dimension> {
    pub value: ArrayViewMut<'a, F, D>,
    pub variance: ArrayViewMut<'a, F, D>,
    pub count: ArrayViewMut<'a, u32, D>,
}

impl<'a, F, D: Dimension> OutputTriple<'a, F, D> {
    pub fn new(
        value: ArrayViewMut<'a, F, D>,
        variance: ArrayViewMut<'a, F, D>,
        count: ArrayViewMut<'a, u32, D>,
    ) -> Self {
        Self {
            value,
            variance,
            count,
        }
    }

    /// Shorter-lived copy of the three views.
    pub fn reborrow(&mut self) -> OutputTriple<'_, F, D> {
        OutputTriple {
            value: self.value.view_mut(),
            variance: self.variance.view_mut(),
            count: self.count.view_mut(),
        }
    }
}

/// Owned result of an allocating combine.
#[derive(Clone, Debug)]
pub struct Combined<F, D: Dimension> {
    pub value: Array<F, D>,
    pub variance: Array<F, D>,
    pub count: Array<u32, D>,
}

impl<F: Pixel, D: Dimension> Combined<F, D> {
    pub fn zeros(shape: D) -> Self {
        Self {
            value: Array::zeros(shape.clone()),
            variance: Array::zeros(shape.clone()),
            count: Array::zeros(shape),
        }
    }

    pub fn view_mut(&mut self) -> OutputTriple<'_, F, D> {
        OutputTriple::new(
            self.value.view_mut(),
            self.variance.view_mut(),
            self.count.view_mut(),
        )
    }

    /// Number of positions where no sample contributed.
    pub fn no_data_count(&self) -> usize {
        self.count.iter().filter(|&&c| c == 0).count()
    }

    /// `no_data_count` as a fraction of all positions.
    pub fn no_data_fraction(&self) -> f64 {
        if self.count.is_empty() {
            0.0
        } else {
            self.no_data_count() as f64 / self.count.len() as f64
        }
    }
}
