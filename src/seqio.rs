//! Loading named primers from **FASTA / FASTQ(.gz)** or **CSV / TSV** tables.
//!
//! ### Formats
//! - **FASTA/FASTQ** (optionally gzipped) parsed with `needletail`; the record id
//!   (up to the first whitespace) becomes the primer name.
//! - **CSV/TSV** parsed with `csv`; a header row is required and must contain a
//!   `sequence` column. A `name` column is used when present, otherwise rows are
//!   named `row<N>`.
//!
//! Validation is *not* done here: raw strings are returned so the caller can
//! report per-primer errors instead of failing the whole file.
//!
//! ### Errors
//! Parsing/IO errors are bubbled via `anyhow::Result` to the caller.
//!
//! ### Example
//! ```no_run
//! use oprimer::seqio;
//! let primers = seqio::read_primers("primers.fasta").unwrap();
//! println!("loaded {} primers", primers.len());
//! ```
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::debug;
use needletail::parse_fastx_file;

/// Input format detected from path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat { Fastx, Csv, Tsv }

/// A named, not yet validated primer sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSequence {
    pub name: String,
    pub sequence: String,
}

/// Guess the format from the file name.
pub fn detect_format<P: AsRef<Path>>(path: P) -> InputFormat {
    let name = path.as_ref().file_name().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    if name.ends_with(".csv") {
        InputFormat::Csv
    } else if name.ends_with(".tsv") || name.ends_with(".tab") {
        InputFormat::Tsv
    } else {
        InputFormat::Fastx
    }
}

/// Read every primer in `path`.
pub fn read_primers<P: AsRef<Path>>(path: P) -> Result<Vec<NamedSequence>> {
    let p = path.as_ref();
    let fmt = detect_format(p);
    let out = match fmt {
        InputFormat::Fastx => read_fastx(p)?,
        InputFormat::Csv => read_table(p, b',')?,
        InputFormat::Tsv => read_table(p, b'\t')?,
    };
    debug!("{}: {} primers ({:?})", p.display(), out.len(), fmt);
    Ok(out)
}

fn read_fastx(p: &Path) -> Result<Vec<NamedSequence>> {
    let mut reader = parse_fastx_file(p).with_context(|| format!("cannot open {}", p.display()))?;
    let mut out = Vec::new();
    while let Some(record) = reader.next() {
        let rec = record?;
        let id = String::from_utf8_lossy(rec.id()).to_string();
        let name = id.split_whitespace().next().unwrap_or("").to_string();
        let sequence = String::from_utf8_lossy(&rec.seq()).trim().to_string();
        out.push(NamedSequence { name, sequence });
    }
    Ok(out)
}

fn read_table(p: &Path, delimiter: u8) -> Result<Vec<NamedSequence>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(p)
        .with_context(|| format!("cannot open {}", p.display()))?;
    let headers = reader.headers()?.clone();
    let column = |wanted: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(wanted));
    let Some(seq_col) = column("sequence") else {
        bail!("{}: no `sequence` column in header", p.display());
    };
    let name_col = column("name");

    let mut out = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        let sequence = row.get(seq_col).unwrap_or("").to_string();
        let name = name_col
            .and_then(|c| row.get(c))
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("row{}", i + 1));
        out.push(NamedSequence { name, sequence });
    }
    Ok(out)
}
