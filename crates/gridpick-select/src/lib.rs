//! Nearest reachable cell selection.
//!
//! [`NearestCellSelector`] ranks candidate cells for a robot in two phases:
//! a cheap Manhattan prefilter that keeps the `top_n` closest candidates,
//! then an exact A\* re-rank of the survivors (through a cache-consulting
//! [`Navigator`](gridpick_paths::Navigator)). A [`TiebreakerService`]
//! decides the order inside groups of equal path cost, either
//! alphabetically or by a seeded shuffle that is reproducible run to run.

pub mod ranking;
pub mod selector;
pub mod tiebreak;

pub use ranking::CandidateRanking;
pub use selector::{NearestCellSelector, SelectorConfig, TOP_N_RANGE};
pub use tiebreak::{ParseModeError, TiebreakMode, TiebreakerConfig, TiebreakerService};
