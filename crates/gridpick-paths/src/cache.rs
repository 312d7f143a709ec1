//! Bounded cache of `(start, goal)` search results.
//!
//! Entries carry a logical "last touched" stamp. When the cache is full a
//! whole batch of the oldest entries is evicted at once, so eviction cost is
//! amortized over many insertions. Obstacle changes are handled with
//! [`PathCache::invalidate_region`], which drops every entry whose endpoints
//! or stored path touch a changed cell.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use gridpick_core::Point;
use log::{debug, warn};

use crate::UNREACHABLE;
use crate::astar::path_cost;

/// Smallest allowed cache capacity.
pub const MIN_CACHE_SIZE: usize = 100;
/// Allowed range of the eviction batch ratio.
pub const CLEANUP_RATIO_RANGE: (f64, f64) = (0.1, 0.5);

// ---------------------------------------------------------------------------
// Key and entry
// ---------------------------------------------------------------------------

/// Ordered `(start, goal)` pair; `(a, b)` and `(b, a)` are distinct keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheKey {
    pub start: Point,
    pub goal: Point,
}

impl CacheKey {
    pub const fn new(start: Point, goal: Point) -> Self {
        Self { start, goal }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.goal)
    }
}

/// An immutable search outcome. Touching an entry produces a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    path: Arc<[Point]>,
    cost: i32,
    success: bool,
    touched: u64,
}

impl CacheEntry {
    /// A successful search. An empty `path` is recorded as a failure.
    pub fn found(path: Vec<Point>) -> Self {
        let cost = path_cost(&path);
        Self {
            success: !path.is_empty(),
            path: path.into(),
            cost,
            touched: 0,
        }
    }

    /// A search that found no path.
    pub fn failed() -> Self {
        Self {
            path: Arc::from(Vec::new()),
            cost: UNREACHABLE,
            success: false,
            touched: 0,
        }
    }

    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Path cost in steps, or [`UNREACHABLE`] for failures.
    pub fn cost(&self) -> i32 {
        self.cost
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Logical time of the last put or hit.
    pub fn touched(&self) -> u64 {
        self.touched
    }

    fn stamped(&self, tick: u64) -> Self {
        Self {
            path: Arc::clone(&self.path),
            cost: self.cost,
            success: self.success,
            touched: tick,
        }
    }

    fn visits(&self, cells: &HashSet<Point>) -> bool {
        self.path.iter().any(|p| cells.contains(p))
    }
}

// ---------------------------------------------------------------------------
// Configuration and statistics
// ---------------------------------------------------------------------------

/// Capacity settings for a [`PathCache`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CacheConfig {
    /// Maximum number of entries (at least [`MIN_CACHE_SIZE`]).
    pub max_size: usize,
    /// Fraction of `max_size` evicted per batch, within [`CLEANUP_RATIO_RANGE`].
    pub cleanup_ratio: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 5000,
            cleanup_ratio: 0.2,
        }
    }
}

impl CacheConfig {
    /// Clamp out-of-range values, warning about each adjustment.
    pub fn sanitized(self) -> Self {
        let mut cfg = self;
        if cfg.max_size < MIN_CACHE_SIZE {
            warn!(
                "cache max_size {} below minimum, using {MIN_CACHE_SIZE}",
                cfg.max_size
            );
            cfg.max_size = MIN_CACHE_SIZE;
        }
        let (lo, hi) = CLEANUP_RATIO_RANGE;
        if cfg.cleanup_ratio.is_nan() || cfg.cleanup_ratio < lo {
            warn!("cache cleanup_ratio {} below {lo}, clamping", cfg.cleanup_ratio);
            cfg.cleanup_ratio = lo;
        } else if cfg.cleanup_ratio > hi {
            warn!("cache cleanup_ratio {} above {hi}, clamping", cfg.cleanup_ratio);
            cfg.cleanup_ratio = hi;
        }
        cfg
    }
}

/// Counter snapshot for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub total_queries: u64,
    pub size: usize,
    pub max_size: usize,
}

impl CacheStats {
    /// `hits / (hits + misses)`, or 0 before any query.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "size {}/{}, hit rate {:.2}%, queries {} (hits {}, misses {})",
            self.size,
            self.max_size,
            self.hit_rate() * 100.0,
            self.total_queries,
            self.hits,
            self.misses
        )
    }
}

// ---------------------------------------------------------------------------
// PathCache
// ---------------------------------------------------------------------------

/// Bounded `(start, goal)` → [`CacheEntry`] map with batched eviction.
#[derive(Debug, Clone)]
pub struct PathCache {
    entries: HashMap<CacheKey, CacheEntry>,
    max_size: usize,
    cleanup_ratio: f64,
    clock: u64,
    hits: u64,
    misses: u64,
    total_queries: u64,
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl PathCache {
    /// Create an empty cache. Out-of-range settings are clamped.
    pub fn new(config: CacheConfig) -> Self {
        let cfg = config.sanitized();
        debug!(
            "path cache ready: max_size {}, cleanup_ratio {}",
            cfg.max_size, cfg.cleanup_ratio
        );
        Self {
            entries: HashMap::new(),
            max_size: cfg.max_size,
            cleanup_ratio: cfg.cleanup_ratio,
            clock: 0,
            hits: 0,
            misses: 0,
            total_queries: 0,
        }
    }

    /// Look up `(start, goal)`. A hit refreshes the entry's stamp.
    pub fn try_get(&mut self, start: Point, goal: Point) -> Option<&CacheEntry> {
        self.total_queries += 1;
        let key = CacheKey::new(start, goal);

        if !self.entries.contains_key(&key) {
            self.misses += 1;
            debug!("cache miss: {key}");
            return None;
        }

        self.hits += 1;
        self.clock += 1;
        let tick = self.clock;
        let entry = self.entries.get_mut(&key)?;
        *entry = entry.stamped(tick);
        debug!(
            "cache hit: {key} (cost {}, success {})",
            entry.cost, entry.success
        );
        Some(&*entry)
    }

    /// Insert or overwrite `(start, goal)`. Inserting a new key into a full
    /// cache evicts the oldest batch first.
    pub fn put(&mut self, start: Point, goal: Point, entry: CacheEntry) {
        let key = CacheKey::new(start, goal);
        if self.entries.len() >= self.max_size && !self.entries.contains_key(&key) {
            self.evict_oldest();
        }
        self.clock += 1;
        let entry = entry.stamped(self.clock);
        debug!(
            "cached {key} (cost {}, success {})",
            entry.cost, entry.success
        );
        self.entries.insert(key, entry);
    }

    /// Whether `(start, goal)` is cached. Does not count as a query.
    pub fn contains(&self, start: Point, goal: Point) -> bool {
        self.entries.contains_key(&CacheKey::new(start, goal))
    }

    /// Number of entries removed by one eviction batch.
    pub fn eviction_batch(&self) -> usize {
        // The epsilon keeps products like 100 × 0.2 from rounding up.
        ((self.max_size as f64 * self.cleanup_ratio) - 1e-9).ceil().max(1.0) as usize
    }

    fn evict_oldest(&mut self) {
        let before = self.entries.len();
        let mut by_age: Vec<(u64, CacheKey)> = self
            .entries
            .iter()
            .map(|(k, e)| (e.touched, *k))
            .collect();
        by_age.sort_unstable_by_key(|&(t, _)| t);
        for (_, key) in by_age.into_iter().take(self.eviction_batch()) {
            self.entries.remove(&key);
        }
        debug!(
            "evicted {} entries, size now {}",
            before - self.entries.len(),
            self.entries.len()
        );
    }

    /// Drop every entry and reset all counters.
    pub fn invalidate_all(&mut self) {
        let old = self.entries.len();
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
        self.total_queries = 0;
        debug!("invalidated all {old} entries");
    }

    /// Drop every entry whose start, goal, or stored path touches one of
    /// `affected`. Returns how many entries were removed.
    pub fn invalidate_region<I>(&mut self, affected: I) -> usize
    where
        I: IntoIterator<Item = Point>,
    {
        let cells: HashSet<Point> = affected.into_iter().collect();
        if cells.is_empty() {
            return 0;
        }
        let before = self.entries.len();
        self.entries.retain(|key, entry| {
            !(cells.contains(&key.start) || cells.contains(&key.goal) || entry.visits(&cells))
        });
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(
                "region invalidation removed {removed}, size now {}",
                self.entries.len()
            );
        }
        removed
    }

    /// Drop every entry but keep the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn cleanup_ratio(&self) -> f64 {
        self.cleanup_ratio
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn total_queries(&self) -> u64 {
        self.total_queries
    }

    /// `hits / (hits + misses)`, or 0 before any query.
    pub fn hit_rate(&self) -> f64 {
        self.stats().hit_rate()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            total_queries: self.total_queries,
            size: self.entries.len(),
            max_size: self.max_size,
        }
    }
}
