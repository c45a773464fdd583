use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{CombineError, Result};
use crate::stack::CombineMethod;

/// Whether the pixel loop is split across Rayon workers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParallelMode {
    /// Parallel once the image has at least `PARALLEL_PIXEL_THRESHOLD` pixels.
    #[default]
    Auto,
    Always,
    Never,
}

impl ParallelMode {
    pub fn should_parallelize(&self, npixels: usize) -> bool {
        match self {
            ParallelMode::Auto => npixels >= PARALLEL_PIXEL_THRESHOLD,
            ParallelMode::Always => true,
            ParallelMode::Never => false,
        }
    }
}

impl fmt::Display for ParallelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParallelMode::Auto => write!(f, "Auto"),
            ParallelMode::Always => write!(f, "Always"),
            ParallelMode::Never => write!(f, "Never"),
        }
    }
}

/// Everything a combine needs besides the arrays themselves.
///
/// ```toml
/// parallel = "auto"
///
/// [method]
/// kind = "sigma_clip"
/// low = 3.0
/// high = 3.0
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombineConfig {
    pub parallel: ParallelMode,
    pub method: CombineMethod,
}

impl CombineConfig {
    pub fn new(method: CombineMethod) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn with_parallel(mut self, parallel: ParallelMode) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CombineError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CombineError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
