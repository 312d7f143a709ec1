use gridpick_core::Point;

/// Manhattan (L1) distance between two points, saturating at `i32::MAX`.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    let d = u64::from(a.x.abs_diff(b.x)) + u64::from(a.y.abs_diff(b.y));
    i32::try_from(d).unwrap_or(i32::MAX)
}
