use std::collections::{HashMap, VecDeque};

use gridpick_core::Point;

use crate::traits::Pather;

/// Compute a multi-source breadth-first search distance map.
///
/// Each step has cost 1. Sources that are not passable are ignored.
/// Expansion stops when the distance exceeds `max_dist`. Positions that
/// were not reached are absent from the returned map.
pub fn distance_map<P: Pather>(
    pather: &P,
    sources: &[Point],
    max_dist: i32,
) -> HashMap<Point, i32> {
    let mut dist: HashMap<Point, i32> = HashMap::new();
    let mut queue: VecDeque<Point> = VecDeque::new();

    for &src in sources {
        if !pather.passable(src) || dist.contains_key(&src) {
            continue;
        }
        dist.insert(src, 0);
        queue.push_back(src);
    }

    let mut nbuf: Vec<Point> = Vec::with_capacity(4);

    while let Some(cp) = queue.pop_front() {
        let current_dist = dist[&cp];
        let nd = current_dist.saturating_add(1);
        if nd > max_dist {
            continue;
        }

        nbuf.clear();
        pather.neighbors(cp, &mut nbuf);

        for &np in nbuf.iter() {
            if dist.contains_key(&np) {
                continue;
            }
            dist.insert(np, nd);
            queue.push_back(np);
        }
    }

    dist
}
