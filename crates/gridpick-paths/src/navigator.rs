//! Cache-consulting pathfinding over a mutable grid.

use gridpick_core::Point;
use log::debug;

use crate::astar::AstarPathfinder;
use crate::cache::{CacheEntry, CacheStats, PathCache};
use crate::grid::GridModel;

/// Owns a [`GridModel`], an [`AstarPathfinder`] and a [`PathCache`], and
/// keeps the cache consistent with every obstacle change made through it.
///
/// Lookups consult the cache first and populate it after a search, for
/// both found and failed outcomes.
#[derive(Debug, Clone)]
pub struct Navigator {
    grid: GridModel,
    astar: AstarPathfinder,
    cache: PathCache,
    searches: u64,
}

impl Navigator {
    pub fn new(grid: GridModel, astar: AstarPathfinder, cache: PathCache) -> Self {
        Self {
            grid,
            astar,
            cache,
            searches: 0,
        }
    }

    /// A navigator with an unbudgeted pathfinder and a default cache.
    pub fn with_grid(grid: GridModel) -> Self {
        Self::new(grid, AstarPathfinder::new(), PathCache::default())
    }

    /// Shortest path from `start` to `goal`, served from the cache when
    /// possible.
    pub fn find_path(&mut self, start: Point, goal: Point) -> Option<Vec<Point>> {
        if let Some(entry) = self.cache.try_get(start, goal) {
            return entry.success().then(|| entry.path().to_vec());
        }

        self.searches += 1;
        let found = self.astar.find_path(&self.grid, start, goal);
        let entry = match &found {
            Some(path) => CacheEntry::found(path.clone()),
            None => CacheEntry::failed(),
        };
        self.cache.put(start, goal, entry);
        found
    }

    /// Shortest path without touching the cache.
    pub fn find_path_uncached(&self, start: Point, goal: Point) -> Option<Vec<Point>> {
        self.astar.find_path(&self.grid, start, goal)
    }

    /// Block `p`, dropping cached results that involve it.
    pub fn add_obstacle(&mut self, p: Point) -> bool {
        if !self.grid.add_obstacle(p) {
            return false;
        }
        let removed = self.cache.invalidate_region([p]);
        debug!("obstacle added at {p}, {removed} cached paths dropped");
        true
    }

    /// Unblock `p`. A freed cell can shorten any path or repair any failed
    /// search, so every cached entry is dropped; counters are kept.
    pub fn remove_obstacle(&mut self, p: Point) -> bool {
        if !self.grid.remove_obstacle(p) {
            return false;
        }
        self.cache.clear();
        debug!("obstacle removed at {p}, path cache cleared");
        true
    }

    /// Swap in a new layout grid and invalidate the whole cache.
    pub fn replace_grid(&mut self, grid: GridModel) {
        self.grid = grid;
        self.cache.invalidate_all();
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn pathfinder(&self) -> &AstarPathfinder {
        &self.astar
    }

    pub fn cache(&self) -> &PathCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Number of A* searches actually run (cache hits excluded).
    pub fn searches(&self) -> u64 {
        self.searches
    }
}
