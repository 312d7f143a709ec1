//! Layout data: the candidate cells a robot may be sent to.
//!
//! Layouts are owned by the surrounding application (usually loaded from a
//! data file) and are read-only to the selection core.

use std::collections::HashMap;

use crate::geom::{Point, Range};

/// A single target cell of the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CandidateCell {
    /// Unique cell code, e.g. `"A15"`.
    pub code: String,
    pub pos: Point,
    /// Footprint width in tiles.
    pub tile_w: i32,
    /// Footprint height in tiles.
    pub tile_h: i32,
    /// Blocked cells cannot currently be approached.
    pub blocked: bool,
}

impl Default for CandidateCell {
    fn default() -> Self {
        Self {
            code: String::new(),
            pos: Point::ZERO,
            tile_w: 1,
            tile_h: 1,
            blocked: false,
        }
    }
}

impl CandidateCell {
    /// Create an unblocked 1×1 cell.
    pub fn new(code: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            code: code.into(),
            pos: Point::new(x, y),
            ..Self::default()
        }
    }

    /// Builder-style setter for the blocked flag.
    pub fn with_blocked(mut self, blocked: bool) -> Self {
        self.blocked = blocked;
        self
    }

    /// The tiles covered by this cell, anchored at `pos`.
    pub fn footprint(&self) -> Range {
        Range::new(
            self.pos.x,
            self.pos.y,
            self.pos.x.saturating_add(self.tile_w.max(1)),
            self.pos.y.saturating_add(self.tile_h.max(1)),
        )
    }
}

/// A complete cells layout: grid size, robot dock and candidate cells.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    pub grid_width: i32,
    pub grid_height: i32,
    /// Where robots start and return to.
    pub dock: Point,
    pub cells: Vec<CandidateCell>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            grid_width: 50,
            grid_height: 50,
            dock: Point::ZERO,
            cells: Vec::new(),
        }
    }
}

impl Layout {
    /// Create an empty layout of the given size with the dock at the origin.
    pub fn new(grid_width: i32, grid_height: i32) -> Self {
        Self {
            grid_width,
            grid_height,
            ..Self::default()
        }
    }

    /// The grid rectangle of this layout.
    pub fn bounds(&self) -> Range {
        Range::sized(self.grid_width, self.grid_height)
    }

    /// Look up a cell by its code.
    pub fn cell_by_code(&self, code: &str) -> Option<&CandidateCell> {
        self.cells.iter().find(|c| c.code == code)
    }

    /// Look up the cell whose footprint covers `(x, y)`.
    pub fn cell_by_position(&self, x: i32, y: i32) -> Option<&CandidateCell> {
        let p = Point::new(x, y);
        self.cells.iter().find(|c| c.footprint().contains(p))
    }

    /// Cells that are not blocked, in layout order.
    pub fn available_cells(&self) -> Vec<CandidateCell> {
        self.cells.iter().filter(|c| !c.blocked).cloned().collect()
    }

    /// Codes that appear more than once, sorted.
    pub fn duplicate_codes(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for c in &self.cells {
            *counts.entry(c.code.as_str()).or_default() += 1;
        }
        let mut dups: Vec<String> = counts
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|(code, _)| code.to_string())
            .collect();
        dups.sort();
        dups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Layout {
        let mut layout = Layout::new(10, 10);
        layout.cells = vec![
            CandidateCell::new("A01", 1, 1),
            CandidateCell::new("A02", 2, 1).with_blocked(true),
            CandidateCell::new("B01", 5, 7),
        ];
        layout
    }

    #[test]
    fn lookups() {
        let layout = sample();
        assert_eq!(layout.cell_by_code("B01").map(|c| c.pos), Some(Point::new(5, 7)));
        assert!(layout.cell_by_code("Z99").is_none());
        assert_eq!(
            layout.cell_by_position(2, 1).map(|c| c.code.as_str()),
            Some("A02")
        );
        assert!(layout.cell_by_position(0, 0).is_none());
    }

    #[test]
    fn available_cells_skip_blocked() {
        let codes: Vec<_> = sample()
            .available_cells()
            .into_iter()
            .map(|c| c.code)
            .collect();
        assert_eq!(codes, vec!["A01", "B01"]);
    }

    #[test]
    fn duplicate_codes_sorted() {
        let mut layout = sample();
        layout.cells.push(CandidateCell::new("B01", 9, 9));
        layout.cells.push(CandidateCell::new("A01", 8, 8));
        assert_eq!(layout.duplicate_codes(), vec!["A01", "B01"]);
        assert!(sample().duplicate_codes().is_empty());
    }

    #[test]
    fn footprint_defaults_to_single_tile() {
        let c = CandidateCell::new("C10", 3, 4);
        let fp = c.footprint();
        assert_eq!(fp.len(), 1);
        assert!(fp.contains(Point::new(3, 4)));

        let wide = CandidateCell {
            tile_w: 2,
            ..c
        };
        assert_eq!(wide.footprint().len(), 2);

        let mut layout = Layout::new(10, 10);
        layout.cells.push(wide);
        assert_eq!(layout.cell_by_position(4, 4).map(|c| c.code.as_str()), Some("C10"));
        assert!(layout.cell_by_position(5, 4).is_none());
    }

    #[test]
    fn footprint_at_grid_edge_does_not_overflow() {
        let edge = CandidateCell {
            tile_w: 3,
            ..CandidateCell::new("Z", i32::MAX - 1, i32::MAX)
        };
        let fp = edge.footprint();
        assert_eq!(fp.max, Point::new(i32::MAX, i32::MAX));
        assert_eq!(fp.width(), 1);
        assert!(fp.is_empty());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn cell_defaults_fill_missing_fields() {
        let json = r#"{"code":"A15","pos":{"x":4,"y":2}}"#;
        let cell: CandidateCell = serde_json::from_str(json).unwrap();
        assert_eq!(cell, CandidateCell::new("A15", 4, 2));
    }

    #[test]
    fn layout_round_trip() {
        let mut layout = Layout::new(20, 12);
        layout.dock = Point::new(1, 1);
        layout.cells.push(CandidateCell::new("C10", 6, 3).with_blocked(true));
        let json = serde_json::to_string(&layout).unwrap();
        let back: Layout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }
}
