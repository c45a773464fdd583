use std::fmt;

use thiserror::Error;

/// Which group of arrays a shape error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayRole {
    Image,
    Output,
}

impl fmt::Display for ArrayRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayRole::Image => write!(f, "image"),
            ArrayRole::Output => write!(f, "output"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CombineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty image sequence")]
    EmptyInput,

    #[error("{role} at index {index} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        role: ArrayRole,
        index: usize,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("number of images ({images}) and masks ({masks}) is different")]
    MaskCount { images: usize, masks: usize },

    #[error("mask at index {index} has shape {found:?}, expected {expected:?}")]
    MaskShape {
        index: usize,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("{name} size {len} != number of images ({expected})")]
    CoefficientShape {
        name: &'static str,
        len: usize,
        expected: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unsupported combine method: {0}")]
    UnsupportedMethod(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl CombineError {
    /// True for both flavours of mask disagreement (count or shape).
    pub fn is_mask_mismatch(&self) -> bool {
        matches!(
            self,
            CombineError::MaskCount { .. } | CombineError::MaskShape { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CombineError>;
