//! Score grid construction.
//!
//! Sequence A runs along the columns and sequence B along the rows. Row 0
//! and column 0 are the local-alignment boundary and stay at zero.

use crate::config::GapPenalties;
use crate::scoring::{Position, ScoringTable};
use crate::Result;

/// Set of recurrence branches that reached a cell's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Provenance(u8);

impl Provenance {
    pub const EMPTY: Provenance = Provenance(0);
    pub const DIAGONAL_MATCH: Provenance = Provenance(1 << 0);
    pub const VERTICAL_GAP_OPEN: Provenance = Provenance(1 << 1);
    pub const VERTICAL_GAP_EXTEND: Provenance = Provenance(1 << 2);
    pub const HORIZONTAL_GAP_OPEN: Provenance = Provenance(1 << 3);
    pub const HORIZONTAL_GAP_EXTEND: Provenance = Provenance(1 << 4);

    const VERTICAL: u8 = Self::VERTICAL_GAP_OPEN.0 | Self::VERTICAL_GAP_EXTEND.0;
    const HORIZONTAL: u8 = Self::HORIZONTAL_GAP_OPEN.0 | Self::HORIZONTAL_GAP_EXTEND.0;

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Provenance) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Provenance) {
        self.0 |= other.0;
    }

    /// True when a vertical gap ends in this cell, so a vertical step
    /// below it extends rather than opens.
    pub fn in_vertical_gap(self) -> bool {
        self.0 & Self::VERTICAL != 0
    }

    pub fn in_horizontal_gap(self) -> bool {
        self.0 & Self::HORIZONTAL != 0
    }
}

impl std::ops::BitOr for Provenance {
    type Output = Provenance;

    fn bitor(self, rhs: Provenance) -> Provenance {
        Provenance(self.0 | rhs.0)
    }
}

/// Highest-scoring cell, first one in build order on ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestCell {
    pub score: i32,
    pub position: Position,
}

/// Score and provenance matrices of size `(len(B) + 1) x (len(A) + 1)`,
/// stored row-major.
#[derive(Debug, Clone)]
pub struct AlignmentGrid {
    rows: usize,
    cols: usize,
    scores: Vec<i32>,
    states: Vec<Provenance>,
    best: BestCell,
}

impl AlignmentGrid {
    /// Fills every interior cell, sweeping columns in the outer loop and
    /// rows in the inner loop.
    pub fn build(
        seq_a: &[u8],
        seq_b: &[u8],
        table: &ScoringTable,
        penalties: GapPenalties,
    ) -> Result<Self> {
        let rows = seq_b.len() + 1;
        let cols = seq_a.len() + 1;
        let mut grid = Self {
            rows,
            cols,
            scores: vec![0; rows * cols],
            states: vec![Provenance::EMPTY; rows * cols],
            best: BestCell::default(),
        };

        for col in 1..cols {
            let a = seq_a[col - 1];
            for row in 1..rows {
                let b = seq_b[row - 1];
                let substitution = table.lookup(a, b)?;
                grid.fill_cell(row, col, substitution, penalties);
            }
        }

        log::debug!(
            "Built {}x{} grid, best score {} at ({}, {})",
            rows,
            cols,
            grid.best.score,
            grid.best.position.row,
            grid.best.position.col
        );
        Ok(grid)
    }

    fn fill_cell(&mut self, row: usize, col: usize, substitution: i32, penalties: GapPenalties) {
        let vertical_cost = penalties.cost(self.provenance(row - 1, col).in_vertical_gap());
        let horizontal_cost = penalties.cost(self.provenance(row, col - 1).in_horizontal_gap());

        // Saturate so extreme table entries or penalties cannot wrap.
        let diagonal = self.score(row - 1, col - 1).saturating_add(substitution);
        let vertical = self.score(row - 1, col).saturating_add(vertical_cost);
        let horizontal = self.score(row, col - 1).saturating_add(horizontal_cost);

        let best_branch = diagonal.max(vertical).max(horizontal);
        let mut state = Provenance::EMPTY;

        // A negative maximum is discarded by the zero floor, the cell
        // starts a fresh local alignment.
        if best_branch >= 0 {
            if horizontal == best_branch {
                state.insert(if horizontal_cost == penalties.extend {
                    Provenance::HORIZONTAL_GAP_EXTEND
                } else {
                    Provenance::HORIZONTAL_GAP_OPEN
                });
            }
            if vertical == best_branch {
                state.insert(if vertical_cost == penalties.extend {
                    Provenance::VERTICAL_GAP_EXTEND
                } else {
                    Provenance::VERTICAL_GAP_OPEN
                });
            }
            if diagonal == best_branch {
                state.insert(Provenance::DIAGONAL_MATCH);
            }
        }

        let score = best_branch.max(0);
        let idx = self.index(row, col);
        self.scores[idx] = score;
        self.states[idx] = state;

        if score > self.best.score {
            self.best = BestCell {
                score,
                position: Position { row, col },
            };
        }
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn score(&self, row: usize, col: usize) -> i32 {
        self.scores[self.index(row, col)]
    }

    pub fn provenance(&self, row: usize, col: usize) -> Provenance {
        self.states[self.index(row, col)]
    }

    pub fn best(&self) -> BestCell {
        self.best
    }

    /// Scores of one grid row, boundary column included.
    pub fn row_scores(&self, row: usize) -> &[i32] {
        let start = row * self.cols;
        &self.scores[start..start + self.cols]
    }
}
