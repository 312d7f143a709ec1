use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use gridpick_core::Point;
use log::{debug, trace, warn};

use crate::UNREACHABLE;
use crate::traits::AstarPather;

// ---------------------------------------------------------------------------
// Per-query arena
// ---------------------------------------------------------------------------

/// Search state for one visited position. Lives in a per-query arena keyed
/// by position; `parent` is a position, never a reference.
#[derive(Clone, Copy, Debug)]
struct SearchNode {
    g: i32,
    h: i32,
    parent: Option<Point>,
    closed: bool,
}

/// Open-set entry, ordered so that `BinaryHeap` (a max-heap) pops the
/// smallest `f`, then the smallest `h`, then the earliest insertion.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct OpenRef {
    pos: Point,
    g: i32,
    f: i32,
    h: i32,
    seq: u64,
}

impl Ord for OpenRef {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// AstarPathfinder
// ---------------------------------------------------------------------------

/// Exact shortest-path search.
///
/// Among open nodes with equal `(f, h)` the one inserted first is expanded
/// first, so repeated queries on the same grid return the same path.
/// An optional step budget bounds the number of expanded nodes; a search
/// that runs out of budget reports no path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AstarPathfinder {
    step_budget: Option<usize>,
}

impl AstarPathfinder {
    /// A pathfinder without a step budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// A pathfinder that gives up after expanding `max_expansions` nodes.
    pub fn with_step_budget(max_expansions: usize) -> Self {
        Self {
            step_budget: Some(max_expansions),
        }
    }

    pub fn step_budget(&self) -> Option<usize> {
        self.step_budget
    }

    /// Compute the shortest path from `start` to `goal` using A*.
    ///
    /// Returns the full path (including both endpoints) or `None` if either
    /// endpoint is not passable, no path exists, or the step budget ran out.
    pub fn find_path<P: AstarPather>(
        &self,
        pather: &P,
        start: Point,
        goal: Point,
    ) -> Option<Vec<Point>> {
        if !pather.passable(start) || !pather.passable(goal) {
            warn!("unwalkable endpoint: start {start} goal {goal}");
            return None;
        }
        if start == goal {
            return Some(vec![start]);
        }

        let mut arena: HashMap<Point, SearchNode> = HashMap::new();
        let mut open: BinaryHeap<OpenRef> = BinaryHeap::new();
        let mut seq: u64 = 0;

        let h0 = pather.estimate(start, goal);
        arena.insert(
            start,
            SearchNode {
                g: 0,
                h: h0,
                parent: None,
                closed: false,
            },
        );
        open.push(OpenRef {
            pos: start,
            g: 0,
            f: h0,
            h: h0,
            seq,
        });

        let mut nbuf: Vec<Point> = Vec::with_capacity(4);
        let mut expanded: usize = 0;

        while let Some(current) = open.pop() {
            let Some(node) = arena.get(&current.pos).copied() else {
                continue;
            };
            // Skip stale entries left behind by a cheaper re-push.
            if node.closed || node.g != current.g {
                continue;
            }

            if current.pos == goal {
                let path = reconstruct(&arena, goal);
                debug!(
                    "path {start} -> {goal}: {} steps, {expanded} nodes expanded",
                    path.len() - 1
                );
                return Some(path);
            }

            if let Some(budget) = self.step_budget {
                if expanded >= budget {
                    warn!("search {start} -> {goal} exceeded step budget of {budget}");
                    return None;
                }
            }
            expanded += 1;

            if let Some(n) = arena.get_mut(&current.pos) {
                n.closed = true;
            }

            nbuf.clear();
            pather.neighbors(current.pos, &mut nbuf);

            for &np in nbuf.iter() {
                let tentative_g = node.g + pather.cost(current.pos, np);
                let h = match arena.get_mut(&np) {
                    Some(n) if n.closed => continue,
                    Some(n) => {
                        if tentative_g >= n.g {
                            continue;
                        }
                        n.g = tentative_g;
                        n.parent = Some(current.pos);
                        n.h
                    }
                    None => {
                        let h = pather.estimate(np, goal);
                        arena.insert(
                            np,
                            SearchNode {
                                g: tentative_g,
                                h,
                                parent: Some(current.pos),
                                closed: false,
                            },
                        );
                        h
                    }
                };
                seq += 1;
                open.push(OpenRef {
                    pos: np,
                    g: tentative_g,
                    f: tentative_g + h,
                    h,
                    seq,
                });
            }
        }

        debug!("no path {start} -> {goal} after {expanded} expansions");
        trace!("arena held {} nodes", arena.len());
        None
    }
}

/// Follow parent links from `goal` back to the start, then reverse.
fn reconstruct(arena: &HashMap<Point, SearchNode>, goal: Point) -> Vec<Point> {
    let mut path = vec![goal];
    let mut cur = goal;
    while let Some(parent) = arena.get(&cur).and_then(|n| n.parent) {
        path.push(parent);
        cur = parent;
    }
    path.reverse();
    path
}

/// Number of steps along `path`, or [`UNREACHABLE`] for an empty path.
pub fn path_cost(path: &[Point]) -> i32 {
    if path.is_empty() {
        UNREACHABLE
    } else {
        (path.len() - 1) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GridModel, distance_map, manhattan};
    use proptest::prelude::*;

    fn assert_valid(grid: &GridModel, path: &[Point], start: Point, goal: Point) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for w in path.windows(2) {
            assert!(w[0].is_adjacent_4(w[1]), "{} -> {} is not a step", w[0], w[1]);
        }
        for p in path {
            assert!(grid.is_walkable(*p), "{p} is not walkable");
        }
    }

    #[test]
    fn open_grid_path_equals_manhattan() {
        let grid = GridModel::new(10, 10).unwrap();
        let (s, g) = (Point::new(0, 0), Point::new(3, 2));
        let path = AstarPathfinder::new().find_path(&grid, s, g).unwrap();
        assert_eq!(path.len(), 6);
        assert_eq!(path_cost(&path), 5);
        assert_eq!(path_cost(&path), manhattan(s, g));
        assert_valid(&grid, &path, s, g);
    }

    #[test]
    fn wall_forces_detour() {
        let mut grid = GridModel::new(10, 10).unwrap();
        // Vertical wall at x = 2 from y = 0 to y = 4.
        for y in 0..5 {
            grid.add_obstacle(Point::new(2, y));
        }
        let (s, g) = (Point::new(0, 0), Point::new(3, 2));
        let path = AstarPathfinder::new().find_path(&grid, s, g).unwrap();
        assert_valid(&grid, &path, s, g);
        assert!(path_cost(&path) > manhattan(s, g));
        assert_eq!(path_cost(&path), 11);
    }

    #[test]
    fn same_start_and_goal() {
        let grid = GridModel::new(5, 5).unwrap();
        let p = Point::new(2, 2);
        assert_eq!(AstarPathfinder::new().find_path(&grid, p, p), Some(vec![p]));
    }

    #[test]
    fn unwalkable_endpoint_fails_fast() {
        let mut grid = GridModel::new(5, 5).unwrap();
        grid.add_obstacle(Point::new(4, 4));
        let astar = AstarPathfinder::new();
        assert!(astar.find_path(&grid, Point::new(0, 0), Point::new(4, 4)).is_none());
        assert!(astar.find_path(&grid, Point::new(4, 4), Point::new(0, 0)).is_none());
        assert!(astar.find_path(&grid, Point::new(4, 4), Point::new(4, 4)).is_none());
        assert!(astar.find_path(&grid, Point::new(-1, 0), Point::new(0, 0)).is_none());
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let mut grid = GridModel::new(7, 7).unwrap();
        let goal = Point::new(3, 3);
        for n in goal.neighbors_4() {
            grid.add_obstacle(n);
        }
        assert!(AstarPathfinder::new().find_path(&grid, Point::new(0, 0), goal).is_none());
    }

    #[test]
    fn repeated_queries_return_same_path() {
        let mut grid = GridModel::new(8, 8).unwrap();
        grid.add_obstacle(Point::new(3, 3));
        let astar = AstarPathfinder::new();
        let a = astar.find_path(&grid, Point::new(0, 0), Point::new(6, 6));
        let b = astar.find_path(&grid, Point::new(0, 0), Point::new(6, 6));
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn step_budget_stops_search() {
        let grid = GridModel::new(30, 30).unwrap();
        let (s, g) = (Point::new(0, 0), Point::new(29, 29));
        assert!(AstarPathfinder::with_step_budget(5).find_path(&grid, s, g).is_none());
        let path = AstarPathfinder::with_step_budget(10_000).find_path(&grid, s, g);
        assert_eq!(path.map(|p| path_cost(&p)), Some(58));
    }

    #[test]
    fn path_cost_of_empty_is_unreachable() {
        assert_eq!(path_cost(&[]), UNREACHABLE);
        assert_eq!(path_cost(&[Point::ZERO]), 0);
    }

    const SIDE: i32 = 8;

    fn grid_from(walls: &[bool]) -> GridModel {
        let mut grid = GridModel::new(SIDE, SIDE).unwrap();
        for (i, &w) in walls.iter().enumerate() {
            if w {
                grid.add_obstacle(Point::new(i as i32 % SIDE, i as i32 / SIDE));
            }
        }
        grid
    }

    proptest! {
        #[test]
        fn astar_is_valid_admissible_and_optimal(
            walls in prop::collection::vec(prop::bool::weighted(0.3), (SIDE * SIDE) as usize),
            sx in 0..SIDE, sy in 0..SIDE,
            gx in 0..SIDE, gy in 0..SIDE,
        ) {
            let grid = grid_from(&walls);
            let (start, goal) = (Point::new(sx, sy), Point::new(gx, gy));
            let found = AstarPathfinder::new().find_path(&grid, start, goal);

            if !grid.is_walkable(start) || !grid.is_walkable(goal) {
                prop_assert!(found.is_none());
                return Ok(());
            }

            let bfs = distance_map(&grid, &[start], i32::MAX);
            match (found, bfs.get(&goal)) {
                (Some(path), Some(&d)) => {
                    prop_assert_eq!(path[0], start);
                    prop_assert_eq!(*path.last().unwrap(), goal);
                    for w in path.windows(2) {
                        prop_assert!(w[0].is_adjacent_4(w[1]));
                    }
                    for p in &path {
                        prop_assert!(!grid.is_obstacle(*p));
                    }
                    let cost = path_cost(&path);
                    prop_assert!(manhattan(start, goal) <= cost);
                    prop_assert_eq!(cost, d);
                }
                (None, None) => {}
                (found, d) => prop_assert!(false, "A* {:?} disagrees with BFS {:?}", found, d),
            }
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn step_budget_round_trip() {
        let budgeted = AstarPathfinder::with_step_budget(500);
        let json = serde_json::to_string(&budgeted).unwrap();
        assert_eq!(json, r#"{"step_budget":500}"#);
        assert_eq!(serde_json::from_str::<AstarPathfinder>(&json).unwrap(), budgeted);

        let open: AstarPathfinder = serde_json::from_str(r#"{"step_budget":null}"#).unwrap();
        assert_eq!(open, AstarPathfinder::new());
    }
}
