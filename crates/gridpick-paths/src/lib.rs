//! Grid search for target selection.
//!
//! This crate provides the obstacle-aware grid model, an exact A\*
//! shortest-path engine, a breadth-first distance map and a bounded path
//! cache with spatial invalidation:
//!
//! - [`GridModel`]: bounds plus a mutable obstacle set.
//! - [`AstarPathfinder`]: four-directional uniform-cost A\*.
//! - [`distance_map`]: multi-source BFS distances.
//! - [`PathCache`]: `(start, goal)` → path results under a size bound.
//! - [`Navigator`]: consults the cache before searching and keeps it
//!   consistent with obstacle changes.
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Pather`] | BFS |
//! | [`WeightedPather`] : [`Pather`] | cost accounting |
//! | [`AstarPather`] : [`WeightedPather`] | A* |

mod astar;
mod bfs;
mod cache;
mod distance;
mod grid;
mod navigator;
mod traits;

pub use astar::{AstarPathfinder, path_cost};
pub use bfs::distance_map;
pub use cache::{CacheConfig, CacheEntry, CacheKey, CacheStats, PathCache};
pub use distance::manhattan;
pub use grid::GridModel;
pub use navigator::Navigator;
pub use traits::{AstarPather, Pather, WeightedPather};

/// Sentinel cost meaning "no path exists".
pub const UNREACHABLE: i32 = i32::MAX;
