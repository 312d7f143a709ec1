//! Shared warehouse scene used by the demo binaries.
//!
//! A 16×10 floor with a shelving wall in column 6 that leaves a single
//! gap at the bottom. Cells on the far side of the wall are close to the
//! dock by Manhattan distance but need a long detour.

use gridpick_core::{CandidateCell, GridError, Layout, Point};
use gridpick_paths::{AstarPathfinder, CacheConfig, GridModel, Navigator, PathCache};
use gridpick_select::{CandidateRanking, NearestCellSelector};

pub const WIDTH: i32 = 16;
pub const HEIGHT: i32 = 10;

/// Column of the shelving wall.
const WALL_X: i32 = 6;

pub fn warehouse() -> Layout {
    let mut layout = Layout::new(WIDTH, HEIGHT);
    layout.dock = Point::new(4, 2);
    layout.cells = vec![
        CandidateCell::new("A15", 8, 2),
        CandidateCell::new("C10", 4, 6),
        CandidateCell::new("B07", 2, 4),
        CandidateCell::new("D02", 0, 0),
        CandidateCell::new("E11", 8, 4),
        CandidateCell::new("F03", 3, 3).with_blocked(true),
        CandidateCell::new("G01", 14, 8),
    ];
    layout
}

/// The walls of [`warehouse`], as obstacles.
pub fn walls() -> impl Iterator<Item = Point> {
    (0..HEIGHT - 1).map(|y| Point::new(WALL_X, y))
}

pub fn navigator(layout: &Layout) -> Result<Navigator, GridError> {
    let mut grid = GridModel::from_layout(layout)?;
    for w in walls() {
        grid.add_obstacle(w);
    }
    let cache = PathCache::new(CacheConfig {
        max_size: 500,
        cleanup_ratio: 0.2,
    });
    Ok(Navigator::new(grid, AstarPathfinder::with_step_budget(10_000), cache))
}

/// One selection pass: the full ranking and the cell the robot is sent to.
#[derive(Debug)]
pub struct Report {
    pub ranking: Vec<CandidateRanking>,
    pub nearest: Option<CandidateRanking>,
}

/// Rank once and take the nearest from that same ranking, so a random
/// tiebreak is drawn a single time.
pub fn report(selector: &mut NearestCellSelector, robot: Point, cells: &[CandidateCell]) -> Report {
    let ranking = selector.rank(robot, cells);
    let nearest = ranking.iter().find(|c| c.is_reachable()).cloned();
    Report { ranking, nearest }
}

/// Render the floor with the path of `choice` drawn in.
pub fn render(layout: &Layout, nav: &Navigator, choice: Option<&CandidateRanking>) -> String {
    let path = choice.and_then(|c| c.path.as_deref()).unwrap_or(&[]);
    let mut out = String::new();
    for y in 0..layout.grid_height {
        for x in 0..layout.grid_width {
            let p = Point::new(x, y);
            let ch = if p == layout.dock {
                '@'
            } else if nav.grid().is_obstacle(p) {
                '#'
            } else if let Some(cell) = layout.cell_by_position(x, y) {
                if cell.blocked { 'x' } else { 'C' }
            } else if path.contains(&p) {
                '*'
            } else {
                '.'
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridpick_select::{SelectorConfig, TiebreakMode, TiebreakerConfig, TiebreakerService};

    #[test]
    fn wall_pushes_near_cell_to_the_back() {
        let layout = warehouse();
        let mut sel = NearestCellSelector::new(SelectorConfig { top_n: 4 })
            .with_navigator(navigator(&layout).unwrap());
        let ranked = sel.filter_top_n(layout.dock, &layout.available_cells());
        let codes: Vec<&str> = ranked.iter().map(|c| c.code()).collect();
        assert_eq!(codes, vec!["B07", "C10", "D02", "A15"]);
        assert_eq!(ranked[3].actual_cost, 18);
    }

    #[test]
    fn render_marks_dock_wall_and_path() {
        let layout = warehouse();
        let mut sel = NearestCellSelector::new(SelectorConfig { top_n: 4 })
            .with_navigator(navigator(&layout).unwrap());
        let nearest = sel.get_nearest(layout.dock, &layout.available_cells());
        let nav = sel.navigator().unwrap();
        let map = render(&layout, nav, nearest.as_ref());
        let rows: Vec<&str> = map.lines().collect();
        assert_eq!(rows.len(), HEIGHT as usize);
        assert_eq!(rows[2].chars().nth(4), Some('@'));
        assert_eq!(rows[0].chars().nth(6), Some('#'));
        assert_eq!(rows[9].chars().nth(6), Some('.'));
        assert_eq!(rows[3].chars().nth(3), Some('x'));
        assert!(map.contains('*'));
    }

    #[test]
    fn report_nearest_heads_the_printed_ranking() {
        let layout = warehouse();
        let run = || {
            let tb = TiebreakerService::new(TiebreakerConfig {
                mode: TiebreakMode::Random,
                seed: 7,
                enable_logging: false,
            });
            let mut sel = NearestCellSelector::new(SelectorConfig { top_n: 4 })
                .with_navigator(navigator(&layout).unwrap())
                .with_tiebreaker(tb);
            let rep = report(&mut sel, layout.dock, &layout.available_cells());
            assert_eq!(sel.navigator().map(|n| n.searches()), Some(4));
            rep
        };
        let rep = run();
        assert_eq!(rep.nearest.as_ref(), rep.ranking.first());
        let code = rep.nearest.map(|c| c.cell.code);
        assert!(matches!(code.as_deref(), Some("B07") | Some("C10")));
        assert_eq!(run().nearest.map(|c| c.cell.code), code);
    }
}
