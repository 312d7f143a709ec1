//! Two-phase nearest-cell selection.
//!
//! Phase 1 keeps the `top_n` candidates closest to the robot by Manhattan
//! distance (ties by code). Phase 2 runs an exact path search for each
//! survivor and re-sorts by actual cost, then distance, then code. Because
//! Manhattan distance is only a lower bound, a candidate with a cheap path
//! but a poor Manhattan rank can be cut in phase 1; the number of searches
//! per selection is bounded by `top_n` in exchange.

use gridpick_core::{CandidateCell, Point};
use gridpick_paths::Navigator;
use log::{debug, trace, warn};

use crate::ranking::CandidateRanking;
use crate::tiebreak::TiebreakerService;

/// Allowed range of [`SelectorConfig::top_n`].
pub const TOP_N_RANGE: (usize, usize) = (1, 10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectorConfig {
    /// How many candidates survive the geometric prefilter.
    pub top_n: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self { top_n: 3 }
    }
}

impl SelectorConfig {
    /// Clamp `top_n` into [`TOP_N_RANGE`], warning if it moved.
    pub fn sanitized(self) -> Self {
        let (lo, hi) = TOP_N_RANGE;
        let top_n = self.top_n.clamp(lo, hi);
        if top_n != self.top_n {
            warn!("top_n {} out of range {lo}..={hi}, using {top_n}", self.top_n);
        }
        Self { top_n }
    }
}

/// Picks the best reachable candidate cells for a robot.
///
/// Without a [`Navigator`] the selector degrades to geometric ranking:
/// phase 2 is skipped and the phase-1 order is returned as is.
#[derive(Debug)]
pub struct NearestCellSelector {
    top_n: usize,
    navigator: Option<Navigator>,
    tiebreaker: Option<TiebreakerService>,
}

impl NearestCellSelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            top_n: config.sanitized().top_n,
            navigator: None,
            tiebreaker: None,
        }
    }

    pub fn with_navigator(mut self, navigator: Navigator) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn with_tiebreaker(mut self, tiebreaker: TiebreakerService) -> Self {
        self.tiebreaker = Some(tiebreaker);
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn set_top_n(&mut self, top_n: usize) {
        self.top_n = SelectorConfig { top_n }.sanitized().top_n;
    }

    pub fn navigator(&self) -> Option<&Navigator> {
        self.navigator.as_ref()
    }

    /// Mutable access, e.g. to change obstacles between selections.
    pub fn navigator_mut(&mut self) -> Option<&mut Navigator> {
        self.navigator.as_mut()
    }

    pub fn tiebreaker(&self) -> Option<&TiebreakerService> {
        self.tiebreaker.as_ref()
    }

    pub fn tiebreaker_mut(&mut self) -> Option<&mut TiebreakerService> {
        self.tiebreaker.as_mut()
    }

    /// Phase 1: the `top_n` candidates nearest to `robot` by Manhattan
    /// distance, ties broken by ascending code.
    pub fn select_top_candidates(
        &self,
        robot: Point,
        cells: &[CandidateCell],
    ) -> Vec<CandidateRanking> {
        let mut ranked: Vec<CandidateRanking> = cells
            .iter()
            .map(|c| CandidateRanking::unevaluated(c.clone(), robot))
            .collect();
        ranked.sort_by(|a, b| {
            a.distance
                .cmp(&b.distance)
                .then_with(|| a.cell.code.cmp(&b.cell.code))
        });
        ranked.truncate(self.top_n);

        debug!("phase 1: kept {} of {} candidates", ranked.len(), cells.len());
        for (i, r) in ranked.iter().enumerate() {
            trace!("  {}. {r}", i + 1);
        }
        ranked
    }

    /// Phase 2: attach a searched path to every candidate and sort by
    /// (actual cost, distance, code).
    fn rerank(&mut self, robot: Point, candidates: Vec<CandidateRanking>) -> Vec<CandidateRanking> {
        let Some(nav) = self.navigator.as_mut() else {
            warn!("no pathfinder configured, skipping path re-rank");
            return candidates;
        };

        let mut reranked: Vec<CandidateRanking> = candidates
            .into_iter()
            .map(|c| {
                let path = nav.find_path(robot, c.cell.pos);
                c.with_path(path)
            })
            .collect();
        reranked.sort_by(|a, b| {
            a.actual_cost
                .cmp(&b.actual_cost)
                .then_with(|| a.distance.cmp(&b.distance))
                .then_with(|| a.cell.code.cmp(&b.cell.code))
        });

        debug!("phase 2: re-ranked {} candidates by path cost", reranked.len());
        for (i, r) in reranked.iter().enumerate() {
            trace!("  {}. {r}", i + 1);
        }
        reranked
    }

    /// Both phases plus tie-breaking, keeping unreachable candidates at the
    /// end of the list for diagnostics.
    pub fn rank(&mut self, robot: Point, cells: &[CandidateCell]) -> Vec<CandidateRanking> {
        debug!("ranking {} candidates for robot at {robot}, top_n {}", cells.len(), self.top_n);
        if cells.is_empty() {
            warn!("candidate list is empty");
            return Vec::new();
        }

        let candidates = self.select_top_candidates(robot, cells);
        if self.navigator.is_none() {
            return self.rerank(robot, candidates);
        }

        let reranked = self.rerank(robot, candidates);
        match self.tiebreaker.as_mut() {
            Some(tb) => tb.apply_tiebreaker(reranked),
            None => reranked,
        }
    }

    /// The ranked candidates that have a path. In geometric-only mode every
    /// phase-1 candidate is returned.
    pub fn filter_top_n(&mut self, robot: Point, cells: &[CandidateCell]) -> Vec<CandidateRanking> {
        let ranked = self.rank(robot, cells);
        if self.navigator.is_none() {
            return ranked;
        }
        let total = ranked.len();
        let valid: Vec<CandidateRanking> =
            ranked.into_iter().filter(|c| c.is_reachable()).collect();
        if valid.len() < total {
            debug!("dropped {} unreachable candidates", total - valid.len());
        }
        valid
    }

    /// The single best candidate, or `None` if nothing qualifies.
    pub fn get_nearest(
        &mut self,
        robot: Point,
        cells: &[CandidateCell],
    ) -> Option<CandidateRanking> {
        self.filter_top_n(robot, cells).into_iter().next()
    }
}
