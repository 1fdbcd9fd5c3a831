//! Canonical primer sequences and the validation profile that admits them.
//!
//! A [`Sequence`] is only ever produced by [`Sequence::validate`] (or by a
//! transformation of an already valid sequence), so holding one proves that:
//! - it is non-empty,
//! - every symbol is one of `A`, `T`, `C`, `G` in uppercase.
//!
//! Length and GC content are *quality* checks rather than structural ones. The
//! [`ValidationProfile`] decides whether a violation aborts construction
//! ([`Severity::Fatal`]) or is reported as an [`Advisory`] and logged.
use core::fmt;

use log::warn;
use strum::{EnumIter, IntoEnumIterator};

use crate::error::{PrimerError, Result};

/// One of the four DNA bases.
///
/// Declaration order (`A`, `T`, `C`, `G`) is the order used when metrics are
/// reported per base.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, EnumIter)]
pub enum Base { A, T, C, G }

impl Base {
    /// Parse an uppercase ASCII byte.
    pub fn from_ascii(b: u8) -> Option<Base> {
        match b {
            b'A' => Some(Base::A),
            b'T' => Some(Base::T),
            b'C' => Some(Base::C),
            b'G' => Some(Base::G),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Base::A => 'A',
            Base::T => 'T',
            Base::C => 'C',
            Base::G => 'G',
        }
    }

    /// Watson–Crick partner.
    pub fn complement(self) -> Base {
        match self {
            Base::A => Base::T,
            Base::T => Base::A,
            Base::C => Base::G,
            Base::G => Base::C,
        }
    }

    #[inline]
    pub fn is_strong(self) -> bool { matches!(self, Base::G | Base::C) }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_char()) }
}

/// An ordered pair of bases such as `AT` (used as a key for dinucleotide runs).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Dinucleotide(pub Base, pub Base);

impl Dinucleotide {
    /// The 12 ordered pairs of distinct bases, in [`Base`] order.
    pub fn distinct_pairs() -> impl Iterator<Item = Dinucleotide> {
        Base::iter().flat_map(|x| Base::iter().filter(move |y| *y != x).map(move |y| Dinucleotide(x, y)))
    }
}

impl fmt::Display for Dinucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}{}", self.0, self.1) }
}

/// What happens when a quality check (length, GC content) fails.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Severity {
    /// Log a warning, record an [`Advisory`], keep going.
    #[default]
    Advisory,
    /// Reject the sequence.
    Fatal,
}

/// Bounds applied to a primer at construction time.
///
/// # Examples
/// ```
/// use oprimer::{ValidationProfile, Severity};
/// let p = ValidationProfile::strict();
/// assert_eq!(p.severity, Severity::Fatal);
/// assert_eq!((p.min_gc, p.max_gc), (0.4, 0.6));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidationProfile {
    pub min_length: usize,
    pub max_length: usize,
    pub min_gc: f64,
    pub max_gc: f64,
    pub severity: Severity,
}

/// Recommended primer length range (nt).
pub const PRIMER_LOWER_LENGTH: usize = 18;
pub const PRIMER_HIGHEST_LENGTH: usize = 30;
/// Recommended GC fraction range for the advisory profile.
pub const PRIMER_LOWEST_GC_RANGE: f64 = 0.3;
pub const PRIMER_HIGHEST_GC_RANGE: f64 = 0.8;

impl ValidationProfile {
    /// 18–30 nt, 30–80 % GC, violations are warnings. This is the default.
    pub const fn advisory() -> Self {
        Self {
            min_length: PRIMER_LOWER_LENGTH,
            max_length: PRIMER_HIGHEST_LENGTH,
            min_gc: PRIMER_LOWEST_GC_RANGE,
            max_gc: PRIMER_HIGHEST_GC_RANGE,
            severity: Severity::Advisory,
        }
    }

    /// 18–30 nt, 40–60 % GC, violations reject the sequence.
    pub const fn strict() -> Self {
        Self { min_length: PRIMER_LOWER_LENGTH, max_length: PRIMER_HIGHEST_LENGTH, min_gc: 0.4, max_gc: 0.6, severity: Severity::Fatal }
    }

    pub fn with_length(mut self, min: usize, max: usize) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn with_gc(mut self, min: f64, max: f64) -> Self {
        self.min_gc = min;
        self.max_gc = max;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Default for ValidationProfile {
    fn default() -> Self { Self::advisory() }
}

/// A non-fatal quality finding raised while validating a sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum Advisory {
    Length { length: usize, min: usize, max: usize },
    GcContent { gc: f64, min: f64, max: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::Length { length, min, max } => {
                write!(f, "primer length {length} is outside the recommended range {min}..={max}")
            }
            Advisory::GcContent { gc, min, max } => write!(
                f,
                "GC content {:.1}% is outside the recommended range {:.1}%..={:.1}%",
                gc * 100.0,
                min * 100.0,
                max * 100.0
            ),
        }
    }
}

impl From<Advisory> for PrimerError {
    fn from(a: Advisory) -> Self {
        match a {
            Advisory::Length { length, min, max } => PrimerError::LengthOutOfRange { length, min, max },
            Advisory::GcContent { gc, min, max } => PrimerError::GcContentOutOfRange { gc, min, max },
        }
    }
}

/// Canonical uppercase `ATCG` sequence. Immutable; transformations return a new value.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Sequence(String);

impl Sequence {
    /// Validate `raw` against `profile`.
    ///
    /// Returns the canonical sequence plus any advisories. Alphabet violations
    /// are always fatal; length and GC violations follow `profile.severity`.
    ///
    /// # Examples
    /// ```
    /// use oprimer::{Sequence, ValidationProfile};
    /// let (s, adv) = Sequence::validate("atcg", &ValidationProfile::advisory()).unwrap();
    /// assert_eq!(s.as_str(), "ATCG");
    /// assert_eq!(adv.len(), 1); // too short, but only a warning
    /// assert!(Sequence::validate("ATCG", &ValidationProfile::strict()).is_err());
    /// ```
    pub fn validate(raw: &str, profile: &ValidationProfile) -> Result<(Sequence, Vec<Advisory>)> {
        let canonical = raw.to_ascii_uppercase();
        if canonical.is_empty() {
            return Err(PrimerError::EmptySequence);
        }
        if let Some((position, base)) = canonical.chars().enumerate().find(|(_, c)| !matches!(c, 'A' | 'T' | 'C' | 'G')) {
            return Err(PrimerError::InvalidAlphabet { base, position });
        }
        let seq = Sequence(canonical);

        let mut advisories = Vec::new();
        let length = seq.len();
        if length < profile.min_length || length > profile.max_length {
            advisories.push(Advisory::Length { length, min: profile.min_length, max: profile.max_length });
        }
        let gc = crate::calc::gc_content(&seq);
        if gc < profile.min_gc || gc > profile.max_gc {
            advisories.push(Advisory::GcContent { gc, min: profile.min_gc, max: profile.max_gc });
        }

        match profile.severity {
            Severity::Fatal => {
                if let Some(a) = advisories.into_iter().next() {
                    return Err(a.into());
                }
                Ok((seq, Vec::new()))
            }
            Severity::Advisory => {
                for a in advisories.iter() {
                    warn!("{}: {a}", seq.0);
                }
                Ok((seq, advisories))
            }
        }
    }

    /// Wrap a string already known to be canonical.
    fn from_canonical(s: String) -> Self {
        debug_assert!(!s.is_empty() && s.bytes().all(|b| Base::from_ascii(b).is_some()));
        Sequence(s)
    }

    pub fn as_str(&self) -> &str { &self.0 }

    pub fn as_bytes(&self) -> &[u8] { self.0.as_bytes() }

    pub fn len(&self) -> usize { self.0.len() }

    /// Always `false`: empty sequences are rejected at validation.
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn bases(&self) -> impl DoubleEndedIterator<Item = Base> + '_ {
        self.0.bytes().filter_map(Base::from_ascii)
    }

    pub fn reversed(&self) -> Sequence {
        Sequence::from_canonical(self.0.chars().rev().collect())
    }

    pub fn complemented(&self) -> Sequence {
        Sequence::from_canonical(self.bases().map(|b| b.complement().as_char()).collect())
    }

    pub fn reverse_complemented(&self) -> Sequence {
        Sequence::from_canonical(self.bases().rev().map(|b| b.complement().as_char()).collect())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl AsRef<str> for Sequence {
    fn as_ref(&self) -> &str { &self.0 }
}
