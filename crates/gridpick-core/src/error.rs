//! Grid construction errors.

use std::fmt;

/// Largest number of cells a grid may hold (4096 × 4096).
pub const MAX_GRID_CELLS: u64 = 1 << 24;

/// Invalid grid dimensions supplied at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A dimension is zero or negative.
    InvalidSize { width: i32, height: i32 },
    /// The grid would exceed [`MAX_GRID_CELLS`].
    TooLarge { width: i32, height: i32, max: u64 },
}

impl GridError {
    /// Validate `width × height` grid dimensions.
    pub fn check(width: i32, height: i32) -> Result<(), GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidSize { width, height });
        }
        if (width as u64) * (height as u64) > MAX_GRID_CELLS {
            return Err(GridError::TooLarge {
                width,
                height,
                max: MAX_GRID_CELLS,
            });
        }
        Ok(())
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { width, height } => {
                write!(f, "grid size {width}x{height} must be positive on both axes")
            }
            Self::TooLarge { width, height, max } => {
                write!(f, "grid size {width}x{height} exceeds the {max}-cell limit")
            }
        }
    }
}

impl std::error::Error for GridError {}
