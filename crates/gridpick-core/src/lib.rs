//! **gridpick-core** — foundational types for grid target selection.
//!
//! This crate provides the geometry primitives shared by the rest of the
//! *gridpick* workspace, the externally owned layout data (candidate cells)
//! and the construction error for grids.

pub mod error;
pub mod geom;
pub mod layout;

pub use error::{GridError, MAX_GRID_CELLS};
pub use geom::{Point, Range};
pub use layout::{CandidateCell, Layout};
