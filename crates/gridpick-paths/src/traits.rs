use gridpick_core::Point;

/// A walkable surface: which cells can be entered and how they connect.
pub trait Pather {
    fn passable(&self, p: Point) -> bool;

    /// Push the enterable neighbours of `p` onto `buf`. `buf` arrives empty.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}

/// A surface with per-step costs.
pub trait WeightedPather: Pather {
    /// Cost of one step between adjacent cells, always at least 1.
    fn cost(&self, from: Point, to: Point) -> i32;
}

/// A weighted surface that can estimate remaining cost for A*.
pub trait AstarPather: WeightedPather {
    /// Lower bound on the cost from `from` to `to`. Overestimating breaks
    /// optimality.
    fn estimate(&self, from: Point, to: Point) -> i32;
}
