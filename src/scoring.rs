use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::traceback::TracebackOperation;
use crate::{AlignerError, Result};

const NO_INDEX: usize = usize::MAX;

/// Substitution scores indexed by (column symbol, row symbol).
///
/// Column symbols come from the header line of a scoring file and are
/// looked up with symbols of sequence A; row symbols lead each following
/// line and are looked up with symbols of sequence B.
#[derive(Debug, Clone)]
pub struct ScoringTable {
    columns: Vec<u8>,
    rows: Vec<u8>,
    column_index: [usize; 256],
    row_index: [usize; 256],
    scores: Vec<i32>,
}

impl ScoringTable {
    fn from_parts(columns: Vec<u8>, rows: Vec<u8>, scores: Vec<i32>) -> Self {
        let mut column_index = [NO_INDEX; 256];
        for (i, &c) in columns.iter().enumerate() {
            column_index[c as usize] = i;
        }
        let mut row_index = [NO_INDEX; 256];
        for (i, &r) in rows.iter().enumerate() {
            row_index[r as usize] = i;
        }
        Self {
            columns,
            rows,
            column_index,
            row_index,
            scores,
        }
    }

    /// Square match/mismatch table over `alphabet`.
    pub fn simple(alphabet: &[u8], match_score: i32, mismatch_score: i32) -> Self {
        let mut scores = Vec::with_capacity(alphabet.len() * alphabet.len());
        for &r in alphabet {
            for &c in alphabet {
                scores.push(if r == c { match_score } else { mismatch_score });
            }
        }
        Self::from_parts(alphabet.to_vec(), alphabet.to_vec(), scores)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parses a whitespace-delimited table: a header of single-character
    /// symbols, then one line per row symbol holding one integer per
    /// header column.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut columns: Option<Vec<u8>> = None;
        let mut rows = Vec::new();
        let mut scores = Vec::new();
        let mut last_line = 0;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            last_line = line_no;

            let mut tokens = line.split_whitespace().peekable();
            if tokens.peek().is_none() {
                continue;
            }

            let Some(header) = columns.as_ref() else {
                columns = Some(parse_header(tokens, line_no)?);
                continue;
            };

            let row_symbol = match tokens.next() {
                Some(token) => parse_symbol(token, line_no)?,
                None => continue,
            };
            if rows.contains(&row_symbol) {
                return Err(malformed(
                    line_no,
                    format!("duplicate row symbol {:?}", row_symbol as char),
                ));
            }

            let values = tokens
                .map(|t| {
                    t.parse::<i32>()
                        .map_err(|_| malformed(line_no, format!("invalid score {:?}", t)))
                })
                .collect::<Result<Vec<_>>>()?;
            if values.len() != header.len() {
                return Err(malformed(
                    line_no,
                    format!(
                        "row {:?} has {} scores, header has {} symbols",
                        row_symbol as char,
                        values.len(),
                        header.len()
                    ),
                ));
            }

            rows.push(row_symbol);
            scores.extend(values);
        }

        let columns = columns.ok_or_else(|| malformed(1, "scoring table is empty".to_string()))?;
        if rows.is_empty() {
            return Err(malformed(last_line, "no score rows after header".to_string()));
        }

        log::debug!(
            "Loaded scoring table: {} columns x {} rows",
            columns.len(),
            rows.len()
        );
        Ok(Self::from_parts(columns, rows, scores))
    }

    pub fn columns(&self) -> &[u8] {
        &self.columns
    }

    pub fn rows(&self) -> &[u8] {
        &self.rows
    }

    /// Score for aligning `a` (a column symbol) against `b` (a row symbol).
    pub fn lookup(&self, a: u8, b: u8) -> Result<i32> {
        let col = self.column_index[a as usize];
        if col == NO_INDEX {
            return Err(unknown(a, "column"));
        }
        let row = self.row_index[b as usize];
        if row == NO_INDEX {
            return Err(unknown(b, "row"));
        }
        Ok(self.scores[row * self.columns.len() + col])
    }

    /// Fails on the first symbol of either sequence the table cannot score.
    pub fn check_sequences(&self, seq_a: &[u8], seq_b: &[u8]) -> Result<()> {
        if let Some(&a) = seq_a
            .iter()
            .find(|&&a| self.column_index[a as usize] == NO_INDEX)
        {
            return Err(unknown(a, "column"));
        }
        if let Some(&b) = seq_b
            .iter()
            .find(|&&b| self.row_index[b as usize] == NO_INDEX)
        {
            return Err(unknown(b, "row"));
        }
        Ok(())
    }
}

impl FromStr for ScoringTable {
    type Err = AlignerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes())
    }
}

fn parse_header<'a>(tokens: impl Iterator<Item = &'a str>, line: usize) -> Result<Vec<u8>> {
    let mut header = Vec::new();
    for token in tokens {
        let symbol = parse_symbol(token, line)?;
        if header.contains(&symbol) {
            return Err(malformed(
                line,
                format!("duplicate header symbol {:?}", symbol as char),
            ));
        }
        header.push(symbol);
    }
    Ok(header)
}

fn parse_symbol(token: &str, line: usize) -> Result<u8> {
    match token.as_bytes() {
        [symbol] if symbol.is_ascii_graphic() => Ok(*symbol),
        _ => Err(malformed(
            line,
            format!("expected a single-character symbol, found {:?}", token),
        )),
    }
}

fn malformed(line: usize, msg: String) -> AlignerError {
    AlignerError::MalformedScoringTable { line, msg }
}

fn unknown(symbol: u8, axis: &'static str) -> AlignerError {
    AlignerError::UnknownSymbol {
        symbol: symbol as char,
        axis,
    }
}

/// Grid coordinates. Row 0 and column 0 are the boundary, so the symbol
/// consumed by a step into `(row, col)` is `B[row - 1]` / `A[col - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignmentStats {
    pub matches: usize,
    pub mismatches: usize,
    pub gaps: usize,
    pub gap_opens: usize,
}

impl AlignmentStats {
    pub fn from_operations(operations: &[TracebackOperation]) -> Self {
        let mut stats = Self::default();
        let mut previous = None;
        for &op in operations {
            match op {
                TracebackOperation::Match => stats.matches += 1,
                TracebackOperation::Mismatch => stats.mismatches += 1,
                TracebackOperation::Insertion | TracebackOperation::Deletion => {
                    stats.gaps += 1;
                    if previous != Some(op) {
                        stats.gap_opens += 1;
                    }
                }
            }
            previous = Some(op);
        }
        stats
    }

    pub fn columns(&self) -> usize {
        self.matches + self.mismatches + self.gaps
    }

    /// Fraction of aligned columns holding identical symbols.
    pub fn identity(&self) -> f64 {
        match self.columns() {
            0 => 0.0,
            n => self.matches as f64 / n as f64,
        }
    }
}
