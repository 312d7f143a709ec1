//! Per-query ranking record for one candidate cell.

use std::fmt;

use gridpick_core::{CandidateCell, Point};
use gridpick_paths::{UNREACHABLE, manhattan, path_cost};

/// A candidate together with its geometric and actual distance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateRanking {
    pub cell: CandidateCell,
    /// Manhattan distance from the robot.
    pub distance: i32,
    /// Path length in steps, or [`UNREACHABLE`].
    pub actual_cost: i32,
    /// The path found by the re-rank, robot first.
    pub path: Option<Vec<Point>>,
}

impl CandidateRanking {
    /// A ranking with only the Manhattan distance filled in.
    pub fn unevaluated(cell: CandidateCell, robot: Point) -> Self {
        Self {
            distance: manhattan(robot, cell.pos),
            cell,
            actual_cost: UNREACHABLE,
            path: None,
        }
    }

    /// The same candidate with the outcome of a path search attached.
    pub fn with_path(self, path: Option<Vec<Point>>) -> Self {
        let actual_cost = path.as_deref().map_or(UNREACHABLE, path_cost);
        Self {
            actual_cost,
            path,
            ..self
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.actual_cost != UNREACHABLE
    }

    pub fn code(&self) -> &str {
        &self.cell.code
    }
}

impl fmt::Display for CandidateRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {} - distance {}", self.cell.code, self.cell.pos, self.distance)?;
        if self.is_reachable() {
            write!(f, ", path cost {}", self.actual_cost)
        } else {
            write!(f, ", no path")
        }
    }
}
