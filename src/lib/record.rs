//! Ranked-abundance record parsing.
//!
//! The upstream count/dedup step emits FASTA records whose identifiers carry
//! the abundance annotation:
//!
//! ```text
//! >rank[(dup-index)]-reads-rpm
//! SEQUENCE
//! ```
//!
//! e.g. `>3(2)-872-1200.55`. The rank (with its optional parenthesized
//! disambiguation suffix) is validated against the grammar but carried
//! opaquely inside the identifier string; only `reads` and `rpm` are parsed
//! into numbers. Records that do not match the grammar are silently skipped,
//! never an error.

use std::io;

use seq_io::fasta::{Reader, Record};

use crate::errors::{AptaclustError, Result};

/// One ranked sequence from the upstream count step.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// The full original ranked identifier, e.g. `12(3)-872-1200.55`.
    pub id: String,
    /// Total read count, parsed from the identifier.
    pub reads: u64,
    /// Reads-per-million, parsed from the identifier.
    pub rpm: f64,
    /// Sequence symbols (letters only, non-empty).
    pub seq: Vec<u8>,
}

/// Counters describing one parse pass over the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseSummary {
    /// FASTA records seen in the input.
    pub records_read: u64,
    /// Records dropped because they did not match the ranked-identifier
    /// grammar or had an invalid sequence.
    pub records_skipped: u64,
    /// Well-formed records dropped by the abundance filter.
    pub records_filtered: u64,
}

/// Returns true if `s` is one or more ASCII digits.
fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Validates the rank field: digits with an optional parenthesized
/// disambiguation suffix, e.g. `3` or `3(2)`.
fn is_rank(s: &str) -> bool {
    match s.split_once('(') {
        None => is_digits(s),
        Some((rank, rest)) => {
            is_digits(rank)
                && rest.ends_with(')')
                && is_digits(&rest[..rest.len() - 1])
                && !rest[..rest.len() - 1].contains(')')
        }
    }
}

/// Validates the rpm field: decimal digits with an optional fractional part.
fn is_decimal(s: &str) -> bool {
    match s.split_once('.') {
        None => is_digits(s),
        Some((whole, frac)) => is_digits(whole) && is_digits(frac),
    }
}

/// Parse a ranked identifier of the form `rank[(dup)]-reads-rpm`.
///
/// Returns `(reads, rpm)` when the identifier matches the grammar, `None`
/// otherwise. The rank field is validated but not returned; callers keep the
/// identifier string intact.
///
/// # Examples
///
/// ```
/// use aptaclust_lib::record::parse_id;
///
/// assert_eq!(parse_id("1-1000-52300.1"), Some((1000, 52300.1)));
/// assert_eq!(parse_id("3(2)-872-1200.55"), Some((872, 1200.55)));
/// assert_eq!(parse_id("sequence_42"), None);
/// ```
#[must_use]
pub fn parse_id(id: &str) -> Option<(u64, f64)> {
    let mut fields = id.splitn(3, '-');
    let rank = fields.next()?;
    let reads = fields.next()?;
    let rpm = fields.next()?;

    if !is_rank(rank) || !is_digits(reads) || !is_decimal(rpm) {
        return None;
    }

    let reads: u64 = reads.parse().ok()?;
    let rpm: f64 = rpm.parse().ok()?;
    Some((reads, rpm))
}

/// Build an [`Entry`] from a FASTA header and sequence, or `None` if either
/// fails the grammar (non-matching identifier, empty or non-alphabetic
/// sequence).
#[must_use]
pub fn parse_entry(head: &str, seq: &[u8]) -> Option<Entry> {
    let (reads, rpm) = parse_id(head)?;
    if seq.is_empty() || !seq.iter().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    Some(Entry { id: head.to_string(), reads, rpm, seq: seq.to_vec() })
}

/// Read ranked FASTA records, applying the abundance filter.
///
/// Entries are returned in input order (upstream guarantees descending-reads
/// order; this function never sorts). An entry is retained only if
/// `reads > filter` — STRICT inequality, so the default filter of 0 passes
/// every positive-read entry and excludes zero-read entries. Records that do
/// not match the grammar are silently skipped and tallied in the summary.
///
/// # Errors
///
/// Returns an error only for I/O failures or input that is not FASTA at all;
/// per-record grammar violations are skips, not errors.
#[allow(clippy::cast_precision_loss)]
pub fn read_entries<R: io::Read>(reader: R, filter: f64) -> Result<(Vec<Entry>, ParseSummary)> {
    let mut fasta = Reader::new(reader);
    let mut entries = Vec::new();
    let mut summary = ParseSummary::default();

    while let Some(result) = fasta.next() {
        let record = result.map_err(|e| match e {
            seq_io::fasta::Error::Io(io_err) => AptaclustError::Io(io_err),
            other => AptaclustError::InvalidFileFormat {
                file_type: "input FASTA".to_string(),
                path: String::new(),
                reason: other.to_string(),
            },
        })?;
        summary.records_read += 1;

        let Ok(head) = std::str::from_utf8(record.head()) else {
            summary.records_skipped += 1;
            continue;
        };

        match parse_entry(head, &record.full_seq()) {
            Some(entry) if entry.reads as f64 > filter => entries.push(entry),
            Some(_) => summary.records_filtered += 1,
            None => summary.records_skipped += 1,
        }
    }

    Ok((entries, summary))
}
