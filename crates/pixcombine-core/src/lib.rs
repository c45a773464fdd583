pub mod combine;
pub mod config;
pub mod consts;
pub mod error;
pub mod image;
pub mod stack;

pub use combine::{
    combine, combine_with_config, mean_stack, median_stack, minmax_stack, quantile_clip_stack,
    sigma_clip_stack, stack_images,
};
pub use config::{CombineConfig, ParallelMode};
pub use error::{CombineError, Result};
pub use image::{Coefficients, Combined, ImageStack, MaskValue, OutputTriple, Pixel};
pub use stack::CombineMethod;
