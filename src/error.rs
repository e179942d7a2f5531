// error.rs - Everything the core can refuse to do

use thiserror::Error;

/// Errors raised while building or feeding a grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LifeError {
    /// Width or height is zero, or the cell count does not fit in memory.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimension { width: usize, height: usize },

    /// Live probability outside [0, 1] (or NaN).
    #[error("live probability {0} must be between 0.0 and 1.0")]
    InvalidProbability(f64),

    /// Pixel buffer does not hold one RGBA quadruple per cell.
    #[error("pixel buffer holds {actual} bytes, grid needs {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("unknown pattern '{0}'")]
    UnknownPattern(String),
}
