//! Deterministic ordering of equal-cost candidates.
//!
//! The service owns its PRNG; it is seeded once at construction and only
//! reseeded through [`TiebreakerService::reseed`]. The same seed and the
//! same input group always produce the same order.

use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, RngExt, SeedableRng};

use crate::ranking::CandidateRanking;

/// How a group of equal-cost candidates is ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TiebreakMode {
    /// Ascending by cell code.
    #[default]
    Alphabetical,
    /// Seeded Fisher–Yates shuffle.
    Random,
}

impl fmt::Display for TiebreakMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alphabetical => f.write_str("alphabetical"),
            Self::Random => f.write_str("random"),
        }
    }
}

/// Unknown tiebreak mode name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(pub String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown tiebreak mode \u{201c}{}\u{201d} (expected alphabetical or random)",
            self.0
        )
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for TiebreakMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alphabetical" => Ok(Self::Alphabetical),
            "random" => Ok(Self::Random),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Tiebreaker settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TiebreakerConfig {
    pub mode: TiebreakMode,
    pub seed: u64,
    /// Log every group decision at debug level.
    pub enable_logging: bool,
}

impl Default for TiebreakerConfig {
    fn default() -> Self {
        Self {
            mode: TiebreakMode::Alphabetical,
            seed: 42,
            enable_logging: true,
        }
    }
}

/// Orders equal-cost groups of ranked candidates.
///
/// Not `Clone`: the PRNG stream belongs to exactly one service.
#[derive(Debug)]
pub struct TiebreakerService {
    config: TiebreakerConfig,
    rng: StdRng,
}

impl TiebreakerService {
    pub fn new(config: TiebreakerConfig) -> Self {
        info!("tiebreak={} seed={}", config.mode, config.seed);
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
        }
    }

    /// Restart the PRNG from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        info!("seed changed from {} to {seed}", self.config.seed);
        self.config.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn mode(&self) -> TiebreakMode {
        self.config.mode
    }

    /// Switch modes. The PRNG state is left untouched.
    pub fn set_mode(&mut self, mode: TiebreakMode) {
        self.config.mode = mode;
    }

    pub fn config(&self) -> &TiebreakerConfig {
        &self.config
    }

    /// Group `candidates` by `actual_cost`, emit the groups in ascending
    /// cost order and decide the order inside each group.
    ///
    /// The result is always a permutation of the input. Unreachable
    /// candidates form the last group.
    pub fn apply_tiebreaker(&mut self, candidates: Vec<CandidateRanking>) -> Vec<CandidateRanking> {
        if candidates.len() < 2 {
            return candidates;
        }

        let mut ranked = candidates;
        // Stable, so each group keeps its input order until decided below.
        ranked.sort_by_key(|c| c.actual_cost);

        let mut start = 0;
        while start < ranked.len() {
            let cost = ranked[start].actual_cost;
            let len = ranked[start..]
                .iter()
                .take_while(|c| c.actual_cost == cost)
                .count();
            let end = start + len;
            if len > 1 {
                self.order_group(&mut ranked[start..end]);
            }
            start = end;
        }
        ranked
    }

    fn order_group(&mut self, group: &mut [CandidateRanking]) {
        match self.config.mode {
            TiebreakMode::Alphabetical => group.sort_by(|a, b| a.cell.code.cmp(&b.cell.code)),
            TiebreakMode::Random => shuffle(&mut self.rng, group),
        }
        if self.config.enable_logging {
            let codes: Vec<&str> = group.iter().map(|c| c.code()).collect();
            debug!(
                "{} tiebreak at cost {}: {}",
                self.config.mode,
                group[0].actual_cost,
                codes.join(", ")
            );
        }
    }
}

/// In-place Fisher–Yates shuffle.
fn shuffle<T>(rng: &mut impl Rng, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use crate::selector::SelectorConfig;

    #[test]
    fn config_reads_lowercase_mode_and_defaults() {
        let cfg: TiebreakerConfig = serde_json::from_str(r#"{"mode":"random"}"#).unwrap();
        assert_eq!(cfg.mode, TiebreakMode::Random);
        assert_eq!(cfg.seed, 42);
        assert!(cfg.enable_logging);
    }

    #[test]
    fn selector_config_round_trip() {
        let cfg = SelectorConfig { top_n: 5 };
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(json, r#"{"top_n":5}"#);
        let back: SelectorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
