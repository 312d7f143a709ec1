//! Grid coordinates and rectangles.
//!
//! `y` grows downward. Points order row by row, so sorting a set of points
//! gives the order a reader scans a printed map in.

use std::cmp::Ordering;
use std::fmt;

/// A cell coordinate on the grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The point `dx` columns and `dy` rows away.
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Cardinal neighbours, clockwise from north. Bounds are not checked.
    #[inline]
    pub const fn neighbors_4(self) -> [Point; 4] {
        [
            self.shift(0, -1),
            self.shift(1, 0),
            self.shift(0, 1),
            self.shift(-1, 0),
        ]
    }

    /// True when `other` is one orthogonal move away.
    #[inline]
    pub fn is_adjacent_4(self, other: Point) -> bool {
        matches!(
            (self.x.abs_diff(other.x), self.y.abs_diff(other.y)),
            (1, 0) | (0, 1)
        )
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rectangle of cells with inclusive `min` and exclusive `max` corners.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    /// Rectangle spanned by two corners given in any order.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// `width` × `height` rectangle anchored at the origin.
    pub fn sized(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Saturates at `i32::MAX` for ranges wider than that.
    #[inline]
    pub fn width(self) -> i32 {
        self.max.x.saturating_sub(self.min.x)
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.y.saturating_sub(self.min.y)
    }

    /// Number of cells covered.
    pub fn len(self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width() as usize * self.height() as usize
        }
    }

    pub fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    #[inline]
    pub fn contains(self, p: Point) -> bool {
        (self.min.x..self.max.x).contains(&p.x) && (self.min.y..self.max.y).contains(&p.y)
    }

    /// Every covered cell, row by row.
    pub fn points(self) -> impl Iterator<Item = Point> {
        (self.min.y..self.max.y)
            .flat_map(move |y| (self.min.x..self.max.x).map(move |x| Point::new(x, y)))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} at {}", self.width(), self.height(), self.min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_and_neighbors() {
        let p = Point::new(5, 5);
        assert_eq!(p.shift(-1, 2), Point::new(4, 7));
        let n = p.neighbors_4();
        assert_eq!(n[0], Point::new(5, 4));
        assert_eq!(n[3], Point::new(4, 5));
        assert!(n.iter().all(|&q| p.is_adjacent_4(q)));
        assert!(!p.is_adjacent_4(Point::new(6, 6)));
        assert!(!p.is_adjacent_4(p));
    }

    #[test]
    fn points_sort_row_by_row() {
        let mut pts = vec![Point::new(2, 1), Point::new(0, 1), Point::new(5, 0)];
        pts.sort();
        assert_eq!(pts, vec![Point::new(5, 0), Point::new(0, 1), Point::new(2, 1)]);
        assert_eq!(Point::new(4, 2).to_string(), "(4, 2)");
    }

    #[test]
    fn range_corners_any_order() {
        let r = Range::new(3, 2, 0, 0);
        assert_eq!(r, Range::sized(3, 2));
        assert_eq!((r.width(), r.height(), r.len()), (3, 2, 6));
        assert!(r.contains(Point::new(2, 1)));
        assert!(!r.contains(Point::new(3, 0)));
        assert!(!r.contains(Point::new(0, -1)));
        assert_eq!(r.to_string(), "3x2 at (0, 0)");
    }

    #[test]
    fn range_points_row_major() {
        let pts: Vec<_> = Range::new(1, 1, 3, 3).points().collect();
        assert_eq!(
            pts,
            vec![Point::new(1, 1), Point::new(2, 1), Point::new(1, 2), Point::new(2, 2)]
        );
        assert!(Range::sized(0, 4).is_empty());
        assert_eq!(Range::new(i32::MIN, 0, i32::MAX, 1).width(), i32::MAX);
        assert_eq!(Range::sized(0, 4).points().count(), 0);
    }
}
