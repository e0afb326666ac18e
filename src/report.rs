//! Plain-text report: input sequences, the score grid with symbol headers,
//! and the best local alignment with its surrounding context.

use std::io::Write;

use crate::grid::AlignmentGrid;
use crate::traceback::AlignmentResult;
use crate::{Result, Sequence};

const SEQUENCES_BANNER: [&str; 3] = ["-----------", "|Sequences|", "-----------"];
const MATRIX_BANNER: [&str; 3] = ["--------------", "|Score Matrix|", "--------------"];
const ALIGNMENT_BANNER: [&str; 3] = [
    "----------------------",
    "|Best Local Alignment|",
    "----------------------",
];

/// Three display lines of an alignment. The aligned region is wrapped in
/// `(` and `)` and flanked by the unaligned parts of both inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAlignment {
    pub top: String,
    pub middle: String,
    pub bottom: String,
}

impl RenderedAlignment {
    pub fn new(result: &AlignmentResult, seq_a: &Sequence, seq_b: &Sequence) -> Self {
        let a = seq_a.as_bytes();
        let b = seq_b.as_bytes();

        let lead_a = &a[..result.start.col];
        let lead_b = &b[..result.start.row];
        let trail_a = &a[result.end.col..];
        let trail_b = &b[result.end.row..];

        let lead = lead_a.len().max(lead_b.len());
        let trail = trail_a.len().max(trail_b.len());

        let line = |lead_part: &[u8], core: &[u8], trail_part: &[u8]| -> String {
            let mut out = Vec::with_capacity(lead + core.len() + trail + 2);
            out.resize(lead - lead_part.len(), b' ');
            out.extend_from_slice(lead_part);
            out.push(b'(');
            out.extend_from_slice(core);
            out.push(b')');
            out.extend_from_slice(trail_part);
            out.resize(lead + core.len() + trail + 2, b' ');
            String::from_utf8_lossy(&out).into_owned()
        };

        let blank_lead = vec![b' '; lead];
        let blank_trail = vec![b' '; trail];
        let mut middle = Vec::with_capacity(lead + result.match_track.len() + trail + 2);
        middle.extend_from_slice(&blank_lead);
        middle.push(b' ');
        middle.extend_from_slice(&result.match_track);
        middle.push(b' ');
        middle.extend_from_slice(&blank_trail);

        Self {
            top: line(lead_a, &result.aligned_a, trail_a),
            middle: String::from_utf8_lossy(&middle).into_owned(),
            bottom: line(lead_b, &result.aligned_b, trail_b),
        }
    }
}

impl std::fmt::Display for RenderedAlignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.top)?;
        writeln!(f, "{}", self.middle)?;
        writeln!(f, "{}", self.bottom)
    }
}

pub fn write_report<W: Write>(
    writer: &mut W,
    seq_a: &Sequence,
    seq_b: &Sequence,
    grid: &AlignmentGrid,
    result: &AlignmentResult,
) -> Result<()> {
    for line in SEQUENCES_BANNER {
        writeln!(writer, "{}", line)?;
    }
    writeln!(writer, "sequence1")?;
    writeln!(writer, "{}", seq_a)?;
    writeln!(writer, "sequence2")?;
    writeln!(writer, "{}", seq_b)?;

    for line in MATRIX_BANNER {
        writeln!(writer, "{}", line)?;
    }
    write_grid(writer, seq_a, seq_b, grid)?;

    for line in ALIGNMENT_BANNER {
        writeln!(writer, "{}", line)?;
    }
    writeln!(writer, "Alignment Score:{}", result.score)?;
    writeln!(writer, "Alignment Results:")?;
    write!(writer, "{}", RenderedAlignment::new(result, seq_a, seq_b))?;
    Ok(())
}

// Every cell, headers included, is followed by a tab.
fn write_grid<W: Write>(
    writer: &mut W,
    seq_a: &Sequence,
    seq_b: &Sequence,
    grid: &AlignmentGrid,
) -> Result<()> {
    write!(writer, "\t\t")?;
    for &a in seq_a.as_bytes() {
        write!(writer, "{}\t", a as char)?;
    }
    writeln!(writer)?;

    for row in 0..grid.rows() {
        match row {
            0 => write!(writer, "\t")?,
            _ => write!(writer, "{}\t", seq_b.as_bytes()[row - 1] as char)?,
        }
        for score in grid.row_scores(row) {
            write!(writer, "{}\t", score)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
