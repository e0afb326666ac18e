use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::{AlignerError, Result, Sequence};

/// Reads sequence A from the first line and sequence B from the second.
pub fn read_sequences<P: AsRef<Path>>(path: P) -> Result<(Sequence, Sequence)> {
    let file = File::open(path)?;
    parse_sequences(BufReader::new(file))
}

pub fn parse_sequences<R: BufRead>(reader: R) -> Result<(Sequence, Sequence)> {
    let mut sequences: Vec<Sequence> = Vec::with_capacity(2);
    let mut blank_seen = false;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        let line_no = idx + 1;

        if trimmed.is_empty() {
            blank_seen |= !sequences.is_empty();
            continue;
        }
        if blank_seen && sequences.len() == 1 {
            return Err(AlignerError::InvalidInput(format!(
                "line {}: sequences must be on consecutive lines",
                line_no
            )));
        }
        if sequences.len() == 2 {
            return Err(AlignerError::InvalidInput(format!(
                "line {}: expected exactly two sequences",
                line_no
            )));
        }
        if let Some(bad) = trimmed.bytes().find(|b| !b.is_ascii_graphic()) {
            return Err(AlignerError::InvalidInput(format!(
                "line {}: unexpected character {:?} in sequence",
                line_no, bad as char
            )));
        }
        sequences.push(Sequence::new(trimmed.as_bytes()));
    }

    let mut iter = sequences.into_iter();
    match (iter.next(), iter.next()) {
        (Some(a), Some(b)) => {
            log::debug!("Read sequences of length {} and {}", a.len(), b.len());
            Ok((a, b))
        }
        (found, _) => Err(AlignerError::InvalidInput(format!(
            "expected two sequences, found {}",
            found.map_or(0, |_| 1)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_two_lines() {
        let (a, b) = parse_sequences("TGTTACGG\nGGTTGACTA\n".as_bytes()).unwrap();
        assert_eq!(a.as_bytes(), b"TGTTACGG");
        assert_eq!(b.as_bytes(), b"GGTTGACTA");
    }

    #[test]
    fn test_line_endings_trimmed() {
        let (a, b) = parse_sequences("ACGT\r\nTTGA  \r\n\n\n".as_bytes()).unwrap();
        assert_eq!(a.as_bytes(), b"ACGT");
        assert_eq!(b.as_bytes(), b"TTGA");
    }

    #[test]
    fn test_leading_blank_lines_ignored() {
        let (a, b) = parse_sequences("\n\nACGT\nTTGA\n".as_bytes()).unwrap();
        assert_eq!(a.as_bytes(), b"ACGT");
        assert_eq!(b.as_bytes(), b"TTGA");
    }

    #[test]
    fn test_missing_second_sequence() {
        let err = parse_sequences("ACGT\n".as_bytes()).unwrap_err();
        assert!(matches!(err, AlignerError::InvalidInput(_)));
        assert!(parse_sequences("".as_bytes()).is_err());
    }

    #[test]
    fn test_empty_line_between_sequences() {
        assert!(parse_sequences("ACGT\n\nTTGA\n".as_bytes()).is_err());
    }

    #[test]
    fn test_third_sequence_rejected() {
        assert!(parse_sequences("ACGT\nTTGA\nCCCC\n".as_bytes()).is_err());
    }

    #[test]
    fn test_embedded_whitespace_rejected() {
        let err = parse_sequences("AC GT\nTTGA\n".as_bytes()).unwrap_err();
        assert!(matches!(err, AlignerError::InvalidInput(_)));
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"GATTACA\nTTAC\n").unwrap();
        file.flush().unwrap();

        let (a, b) = read_sequences(file.path()).unwrap();
        assert_eq!(a.to_string(), "GATTACA");
        assert_eq!(b.to_string(), "TTAC");
        assert!(matches!(
            read_sequences("/nonexistent/input.txt"),
            Err(AlignerError::Io(_))
        ));
    }
}
