//! Smith-Waterman local alignment with affine gap penalties driven by a
//! substitution table loaded from disk.
//!
//! The grid records, per cell, every branch that reached the cell's score.
//! Gap extension is decided by looking at the neighbour's recorded branches
//! instead of keeping separate gap matrices.

use std::time::Instant;
use thiserror::Error;

pub mod config;
pub mod grid;
pub mod input;
pub mod report;
pub mod scoring;
pub mod traceback;

pub use crate::config::GapPenalties;
pub use crate::grid::{AlignmentGrid, BestCell, Provenance};
pub use crate::input::{parse_sequences, read_sequences};
pub use crate::report::{write_report, RenderedAlignment};
pub use crate::scoring::{AlignmentStats, Position, ScoringTable};
pub use crate::traceback::{AlignmentResult, Traceback, TracebackOperation};

pub const DEFAULT_GAP_OPEN: i32 = -2;
pub const DEFAULT_GAP_EXTEND: i32 = -1;

pub const GAP_SYMBOL: u8 = b'-';
pub const MATCH_SYMBOL: u8 = b'|';

#[derive(Debug, Error)]
pub enum AlignerError {
    #[error("Unknown symbol {symbol:?}: no {axis} entry in scoring table")]
    UnknownSymbol { symbol: char, axis: &'static str },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Malformed scoring table at line {line}: {msg}")]
    MalformedScoringTable { line: usize, msg: String },
    #[error("Traceback error: {0}")]
    TracebackError(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AlignerError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    data: Vec<u8>,
}

impl Sequence {
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.data))
    }
}

/// Pairwise local aligner bound to one scoring table.
#[derive(Debug, Clone)]
pub struct Aligner {
    table: ScoringTable,
    penalties: GapPenalties,
}

impl Aligner {
    pub fn new(table: ScoringTable) -> Self {
        Self {
            table,
            penalties: GapPenalties::default(),
        }
    }

    pub fn with_gap_penalties(mut self, penalties: GapPenalties) -> Self {
        self.penalties = penalties;
        self
    }

    pub fn penalties(&self) -> GapPenalties {
        self.penalties
    }

    pub fn align(&self, seq_a: &Sequence, seq_b: &Sequence) -> Result<AlignmentResult> {
        self.align_with_grid(seq_a, seq_b).map(|(_, result)| result)
    }

    /// Builds the grid, then traces back from its best cell. The grid is
    /// returned as well so callers can print it.
    pub fn align_with_grid(
        &self,
        seq_a: &Sequence,
        seq_b: &Sequence,
    ) -> Result<(AlignmentGrid, AlignmentResult)> {
        let start_time = Instant::now();

        if seq_a.is_empty() || seq_b.is_empty() {
            return Err(AlignerError::InvalidInput(
                "sequences must not be empty".to_string(),
            ));
        }
        self.table.check_sequences(seq_a.as_bytes(), seq_b.as_bytes())?;
        self.penalties.warn_if_unusual();

        let grid = AlignmentGrid::build(
            seq_a.as_bytes(),
            seq_b.as_bytes(),
            &self.table,
            self.penalties,
        )?;

        let result = Traceback::new(&grid, seq_a.as_bytes(), seq_b.as_bytes(), self.penalties)
            .reconstruct_alignment()?;

        log::info!(
            "Aligned {}x{} in {:.3} ms, best score {}",
            seq_a.len(),
            seq_b.len(),
            start_time.elapsed().as_secs_f64() * 1000.0,
            result.score
        );

        Ok((grid, result))
    }
}

/// One-shot local alignment of `seq_a` (columns) against `seq_b` (rows).
pub fn align(
    seq_a: &Sequence,
    seq_b: &Sequence,
    table: &ScoringTable,
    gap_open: i32,
    gap_extend: i32,
) -> Result<AlignmentResult> {
    Aligner::new(table.clone())
        .with_gap_penalties(GapPenalties::new(gap_open, gap_extend))
        .align(seq_a, seq_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dna_table() -> ScoringTable {
        ScoringTable::simple(b"ACGT", 1, -1)
    }

    #[test]
    fn test_single_identical_symbol() {
        let a = Sequence::new(b"A");
        let result = align(&a, &a, &dna_table(), -2, -1).unwrap();

        assert_eq!(result.score, 1);
        assert_eq!(result.aligned_a, b"A");
        assert_eq!(result.aligned_b, b"A");
        assert_eq!(result.match_track, b"|");
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let aligner = Aligner::new(dna_table());
        let err = aligner
            .align(&Sequence::new(b""), &Sequence::new(b"ACGT"))
            .unwrap_err();
        assert!(matches!(err, AlignerError::InvalidInput(_)));

        let err = aligner
            .align(&Sequence::new(b"ACGT"), &Sequence::new(b""))
            .unwrap_err();
        assert!(matches!(err, AlignerError::InvalidInput(_)));
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        let err = Aligner::new(dna_table())
            .align(&Sequence::new(b"ACGN"), &Sequence::new(b"ACGT"))
            .unwrap_err();
        assert!(matches!(
            err,
            AlignerError::UnknownSymbol { symbol: 'N', .. }
        ));
    }

    #[test]
    fn test_default_penalties() {
        let aligner = Aligner::new(dna_table());
        assert_eq!(aligner.penalties().open, DEFAULT_GAP_OPEN);
        assert_eq!(aligner.penalties().extend, DEFAULT_GAP_EXTEND);
    }

    #[test]
    fn test_align_with_grid_returns_matching_grid() {
        let a = Sequence::new(b"GATTACA");
        let b = Sequence::new(b"TTAC");
        let aligner = Aligner::new(ScoringTable::simple(b"ACGT", 2, -1));
        let (grid, result) = aligner.align_with_grid(&a, &b).unwrap();

        assert_eq!(grid.rows(), 5);
        assert_eq!(grid.cols(), 8);
        assert_eq!(grid.best().score, result.score);
        assert_eq!(result.score, 8);
    }

    #[test]
    fn test_sequence_display() {
        assert_eq!(Sequence::new(b"ACGT").to_string(), "ACGT");
    }
}
