use crate::config::GapPenalties;
use crate::grid::{AlignmentGrid, Provenance};
use crate::scoring::{AlignmentStats, Position};
use crate::{AlignerError, Result, GAP_SYMBOL, MATCH_SYMBOL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracebackOperation {
    Match,
    Mismatch,
    /// Symbol of B against a gap in A (vertical step).
    Insertion,
    /// Symbol of A against a gap in B (horizontal step).
    Deletion,
}

/// Best local alignment. `aligned_a`, `aligned_b` and `match_track` have
/// equal length and cover `A[start.col..end.col]` and
/// `B[start.row..end.row]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentResult {
    pub score: i32,
    pub aligned_a: Vec<u8>,
    pub aligned_b: Vec<u8>,
    pub match_track: Vec<u8>,
    pub operations: Vec<TracebackOperation>,
    pub start: Position,
    pub end: Position,
}

impl AlignmentResult {
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn stats(&self) -> AlignmentStats {
        AlignmentStats::from_operations(&self.operations)
    }
}

/// Walks provenance back from the grid's best cell to the first zero cell.
pub struct Traceback<'a> {
    grid: &'a AlignmentGrid,
    seq_a: &'a [u8],
    seq_b: &'a [u8],
    penalties: GapPenalties,
}

impl<'a> Traceback<'a> {
    pub fn new(
        grid: &'a AlignmentGrid,
        seq_a: &'a [u8],
        seq_b: &'a [u8],
        penalties: GapPenalties,
    ) -> Self {
        Self {
            grid,
            seq_a,
            seq_b,
            penalties,
        }
    }

    /// Follows one branch per cell, preferring a diagonal step, then a
    /// vertical gap, then a horizontal gap. A gap branch is only taken when
    /// the parent's score plus the tagged cost gives the current score.
    pub fn reconstruct_alignment(&self) -> Result<AlignmentResult> {
        let best = self.grid.best();
        let end = best.position;

        let mut aligned_a = Vec::new();
        let mut aligned_b = Vec::new();
        let mut match_track = Vec::new();
        let mut operations = Vec::new();

        let mut current = end;

        loop {
            let Position { row, col } = current;
            let score = self.grid.score(row, col);
            if score == 0 {
                break;
            }
            let state = self.grid.provenance(row, col);

            if state.contains(Provenance::DIAGONAL_MATCH) {
                let (a, b) = (self.seq_a[col - 1], self.seq_b[row - 1]);
                aligned_a.push(a);
                aligned_b.push(b);
                if a == b {
                    match_track.push(MATCH_SYMBOL);
                    operations.push(TracebackOperation::Match);
                } else {
                    match_track.push(b' ');
                    operations.push(TracebackOperation::Mismatch);
                }
                current = Position {
                    row: row - 1,
                    col: col - 1,
                };
            } else if self.gap_step_consistent(
                state,
                Provenance::VERTICAL_GAP_EXTEND,
                Provenance::VERTICAL_GAP_OPEN,
                self.grid.score(row - 1, col),
                score,
            ) {
                aligned_a.push(GAP_SYMBOL);
                aligned_b.push(self.seq_b[row - 1]);
                match_track.push(b' ');
                operations.push(TracebackOperation::Insertion);
                current = Position { row: row - 1, col };
            } else if self.gap_step_consistent(
                state,
                Provenance::HORIZONTAL_GAP_EXTEND,
                Provenance::HORIZONTAL_GAP_OPEN,
                self.grid.score(row, col - 1),
                score,
            ) {
                aligned_a.push(self.seq_a[col - 1]);
                aligned_b.push(GAP_SYMBOL);
                match_track.push(b' ');
                operations.push(TracebackOperation::Deletion);
                current = Position { row, col: col - 1 };
            } else {
                return Err(AlignerError::TracebackError(format!(
                    "no branch of cell ({}, {}) with score {} leads back to its parent",
                    row, col, score
                )));
            }
        }

        // Reverse the sequences and operations since we built them backwards
        aligned_a.reverse();
        aligned_b.reverse();
        match_track.reverse();
        operations.reverse();

        log::debug!(
            "Traceback from ({}, {}) stopped at ({}, {}) after {} columns",
            end.row,
            end.col,
            current.row,
            current.col,
            operations.len()
        );

        Ok(AlignmentResult {
            score: best.score,
            aligned_a,
            aligned_b,
            match_track,
            operations,
            start: current,
            end,
        })
    }

    fn gap_step_consistent(
        &self,
        state: Provenance,
        extend_tag: Provenance,
        open_tag: Provenance,
        parent: i32,
        current: i32,
    ) -> bool {
        (state.contains(extend_tag) && parent.saturating_add(self.penalties.extend) == current)
            || (state.contains(open_tag) && parent.saturating_add(self.penalties.open) == current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoringTable;

    fn run(a: &[u8], b: &[u8], table: &ScoringTable, penalties: GapPenalties) -> AlignmentResult {
        let grid = AlignmentGrid::build(a, b, table, penalties).unwrap();
        Traceback::new(&grid, a, b, penalties)
            .reconstruct_alignment()
            .unwrap()
    }

    #[test]
    fn test_perfect_match() {
        let table = ScoringTable::simple(b"ACGT", 1, -1);
        let result = run(b"ACGTACGT", b"ACGTACGT", &table, GapPenalties::default());

        assert_eq!(result.score, 8);
        assert_eq!(result.aligned_a, b"ACGTACGT");
        assert_eq!(result.aligned_b, b"ACGTACGT");
        assert_eq!(result.match_track, b"||||||||");
        assert_eq!(result.start, Position { row: 0, col: 0 });
        assert_eq!(result.end, Position { row: 8, col: 8 });
        assert_eq!(result.stats().gaps, 0);
    }

    #[test]
    fn test_complete_mismatch_is_empty() {
        let table = ScoringTable::simple(b"ACGT", 1, -1);
        let result = run(b"AAAA", b"TTTT", &table, GapPenalties::default());

        assert_eq!(result.score, 0);
        assert!(result.is_empty());
        assert!(result.aligned_a.is_empty());
        assert!(result.aligned_b.is_empty());
        assert_eq!(result.start, result.end);
    }

    #[test]
    fn test_gap_in_b() {
        let table = ScoringTable::simple(b"ACGT", 3, -3);
        let result = run(b"ACGTTTACGT", b"ACGTACGT", &table, GapPenalties::default());

        assert_eq!(result.score, 21);
        assert_eq!(result.aligned_a, b"ACGTTTACGT");
        assert_eq!(result.aligned_b, b"ACG--TACGT");
        assert_eq!(result.match_track, b"|||  |||||");
        assert_eq!(
            result.operations[3..5],
            [TracebackOperation::Deletion, TracebackOperation::Deletion]
        );
        let stats = result.stats();
        assert_eq!(stats.gaps, 2);
        assert_eq!(stats.gap_opens, 1);
    }

    #[test]
    fn test_gap_in_a() {
        let table = ScoringTable::simple(b"ACGT", 3, -3);
        let result = run(b"ACGTACGT", b"ACGTTTACGT", &table, GapPenalties::default());

        assert_eq!(result.score, 21);
        assert_eq!(result.aligned_a, b"ACG--TACGT");
        assert_eq!(result.aligned_b, b"ACGTTTACGT");
        assert!(result.operations.contains(&TracebackOperation::Insertion));
        assert!(!result.operations.contains(&TracebackOperation::Deletion));
    }

    #[test]
    fn test_costlier_open_lowers_score() {
        let table = ScoringTable::simple(b"ACGT", 3, -3);
        let result = run(b"ACGTTTACGT", b"ACGTACGT", &table, GapPenalties::new(-4, -1));

        assert_eq!(result.score, 19);
        assert_eq!(result.aligned_b, b"ACG--TACGT");
    }

    #[test]
    fn test_local_region_inside_longer_sequence() {
        let table = ScoringTable::simple(b"ACGT", 2, -1);
        let result = run(b"GATTACA", b"TTAC", &table, GapPenalties::default());

        assert_eq!(result.score, 8);
        assert_eq!(result.aligned_a, b"TTAC");
        assert_eq!(result.start, Position { row: 0, col: 2 });
        assert_eq!(result.end, Position { row: 4, col: 6 });
    }

    #[test]
    fn test_vertical_gap_preferred_over_horizontal() {
        let table = ScoringTable::simple(b"AC", 2, -1);
        let penalties = GapPenalties::new(-1, -1);
        let a = b"ACAC";
        let b = b"CAAC";
        let grid = AlignmentGrid::build(a, b, &table, penalties).unwrap();

        // (2, 2) is reachable by a gap from either (1, 2) or (2, 1).
        let state = grid.provenance(2, 2);
        assert!(!state.contains(Provenance::DIAGONAL_MATCH));
        assert!(state.contains(Provenance::VERTICAL_GAP_EXTEND));
        assert!(state.contains(Provenance::HORIZONTAL_GAP_EXTEND));
        assert_eq!(grid.score(1, 2), 2);
        assert_eq!(grid.score(2, 1), 2);
        assert_eq!(grid.score(2, 2), 1);

        let result = Traceback::new(&grid, a, b, penalties)
            .reconstruct_alignment()
            .unwrap();
        assert_eq!(result.score, 5);
        assert_eq!(result.aligned_a, b"C-AC");
        assert_eq!(result.aligned_b, b"CAAC");
        assert_eq!(result.match_track, b"| ||");
        assert_eq!(
            result.operations,
            vec![
                TracebackOperation::Match,
                TracebackOperation::Insertion,
                TracebackOperation::Match,
                TracebackOperation::Match,
            ]
        );
        assert_eq!(result.start, Position { row: 0, col: 1 });
        assert_eq!(result.end, Position { row: 4, col: 4 });
    }

    #[test]
    fn test_traceback_ends_on_zero_cell() {
        let table = ScoringTable::simple(b"ACGT", 1, -1);
        let a = b"TGTTACGG";
        let b = b"GGTTGACTA";
        let grid = AlignmentGrid::build(a, b, &table, GapPenalties::default()).unwrap();
        let result = Traceback::new(&grid, a, b, GapPenalties::default())
            .reconstruct_alignment()
            .unwrap();

        assert_eq!(result.score, 3);
        assert_eq!(grid.score(result.start.row, result.start.col), 0);
        assert_eq!(result.aligned_a, b"GTT");
        assert_eq!(result.aligned_b, b"GTT");
        assert_eq!(result.start, Position { row: 1, col: 1 });
    }
}
