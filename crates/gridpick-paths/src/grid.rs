//! Grid bounds plus a mutable obstacle set.

use std::collections::HashSet;

use gridpick_core::{GridError, Layout, Point, Range};

use crate::distance::manhattan;
use crate::traits::{AstarPather, Pather, WeightedPather};

/// A bounded `width × height` grid with runtime-mutable obstacles.
///
/// Bounds are fixed at construction. Obstacle changes only affect later
/// queries; keeping cached paths consistent is the caller's job (see
/// [`Navigator`](crate::Navigator)).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "GridData", try_from = "GridData"))]
pub struct GridModel {
    bounds: Range,
    obstacles: HashSet<Point>,
}

/// Serialized form of [`GridModel`]. Deserializing goes through
/// [`GridModel::new`], so sizes are validated the same way.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct GridData {
    width: i32,
    height: i32,
    #[serde(default)]
    obstacles: Vec<Point>,
}

#[cfg(feature = "serde")]
impl From<GridModel> for GridData {
    fn from(grid: GridModel) -> Self {
        let mut obstacles: Vec<Point> = grid.obstacles.into_iter().collect();
        obstacles.sort();
        Self {
            width: grid.bounds.width(),
            height: grid.bounds.height(),
            obstacles,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<GridData> for GridModel {
    type Error = GridError;

    fn try_from(data: GridData) -> Result<Self, GridError> {
        let mut grid = GridModel::new(data.width, data.height)?;
        grid.obstacles.extend(data.obstacles);
        Ok(grid)
    }
}

impl GridModel {
    /// Create an obstacle-free grid covering `[0, width) × [0, height)`.
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        GridError::check(width, height)?;
        Ok(Self {
            bounds: Range::sized(width, height),
            obstacles: HashSet::new(),
        })
    }

    /// Create an obstacle-free grid sized to `layout`.
    pub fn from_layout(layout: &Layout) -> Result<Self, GridError> {
        Self::new(layout.grid_width, layout.grid_height)
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    #[inline]
    pub fn in_bounds(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    #[inline]
    pub fn is_obstacle(&self, p: Point) -> bool {
        self.obstacles.contains(&p)
    }

    /// Inside the bounds and not an obstacle.
    #[inline]
    pub fn is_walkable(&self, p: Point) -> bool {
        self.in_bounds(p) && !self.is_obstacle(p)
    }

    /// Mark `p` as blocked. Returns `true` if the set changed.
    pub fn add_obstacle(&mut self, p: Point) -> bool {
        self.obstacles.insert(p)
    }

    /// Clear the obstacle at `p`. Returns `true` if the set changed.
    pub fn remove_obstacle(&mut self, p: Point) -> bool {
        self.obstacles.remove(&p)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = Point> + '_ {
        self.obstacles.iter().copied()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
    }
}

impl Pather for GridModel {
    fn passable(&self, p: Point) -> bool {
        self.is_walkable(p)
    }

    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        for n in p.neighbors_4() {
            if self.is_walkable(n) {
                buf.push(n);
            }
        }
    }
}

impl WeightedPather for GridModel {
    fn cost(&self, _from: Point, _to: Point) -> i32 {
        1
    }
}

impl AstarPather for GridModel {
    fn estimate(&self, from: Point, to: Point) -> i32 {
        manhattan(from, to)
    }
}
