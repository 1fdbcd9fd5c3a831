//! Error type for primer construction and metric evaluation.
//!
//! Validation failures abort construction: no partially-built [`crate::Primer`]
//! ever exists. Once a sequence is accepted, every formula is total, so the
//! only runtime failure left is asking for an unsupported Tm method.
use thiserror::Error;

use crate::melting::MeltingTemperature;

/// Everything that can go wrong while building or querying a primer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrimerError {
    /// Input was not text (e.g. non-UTF-8 bytes), or an operand had the wrong kind.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("primer sequence is empty")]
    EmptySequence,

    /// A symbol outside `{A, T, C, G}`. Never downgraded to a warning.
    #[error("primer sequence should only contain the nucleotide bases A, T, C and G (found {base:?} at position {position})")]
    InvalidAlphabet { base: char, position: usize },

    #[error("primer length {length} is outside the range {min}..={max}")]
    LengthOutOfRange { length: usize, min: usize, max: usize },

    #[error("primer GC content {gc:.3} is outside the range {min}..={max}")]
    GcContentOutOfRange { gc: f64, min: f64, max: f64 },

    #[error("melting temperature method {0} has not been implemented")]
    UnsupportedOperation(MeltingTemperature),

    #[error("reading frame must be 1, 2 or 3 (got {0})")]
    InvalidFrame(usize),

    /// Sodium concentration must be a finite, strictly positive number of mM.
    #[error("salt concentration must be a positive number of mM (got {0})")]
    InvalidSalt(f64),

    #[error("unknown metric {0:?}")]
    UnknownMetric(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PrimerError>;
