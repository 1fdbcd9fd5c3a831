//! Transcription (DNA → RNA) and translation (DNA → protein).
use crate::data::codons;
use crate::error::PrimerError;
use crate::sequence::Sequence;

/// Which of the three forward reading frames to translate.
///
/// Frames are numbered from 1 as in sequence viewers; frame `n` starts at
/// 0-based offset `n - 1`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ReadingFrame {
    #[default]
    First,
    Second,
    Third,
}

impl ReadingFrame {
    pub fn offset(self) -> usize {
        match self {
            ReadingFrame::First => 0,
            ReadingFrame::Second => 1,
            ReadingFrame::Third => 2,
        }
    }
}

impl TryFrom<usize> for ReadingFrame {
    type Error = PrimerError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(ReadingFrame::First),
            2 => Ok(ReadingFrame::Second),
            3 => Ok(ReadingFrame::Third),
            other => Err(PrimerError::InvalidFrame(other)),
        }
    }
}

/// Output alphabet for translated residues.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Notation {
    /// `IDRS*`
    #[default]
    OneLetter,
    /// `Ile-Asp-Arg-Ser-Stop`
    ThreeLetter,
}

/// `T` → `U`.
pub fn to_rna(seq: &Sequence) -> String {
    seq.as_str().replace('T', "U")
}

/// Translate every complete codon of `frame` with the standard genetic code.
///
/// Stop codons do not end translation; they are rendered as `*` / `Stop`.
/// A trailing partial codon is dropped.
///
/// # Examples
/// ```
/// use oprimer::translate::{to_protein, Notation, ReadingFrame};
/// use oprimer::{Sequence, ValidationProfile};
/// let (s, _) = Sequence::validate("ATCGATCGATCGTAA", &ValidationProfile::advisory()).unwrap();
/// assert_eq!(to_protein(&s, ReadingFrame::First, Notation::OneLetter), "IDRS*");
/// assert_eq!(to_protein(&s, ReadingFrame::Third, Notation::ThreeLetter), "Arg-Ser-Ile-Val");
/// ```
pub fn to_protein(seq: &Sequence, frame: ReadingFrame, notation: Notation) -> String {
    let bytes = seq.as_bytes();
    let start = frame.offset().min(bytes.len());
    let residues = bytes[start..].chunks_exact(3).filter_map(codons::translate_codon);
    match notation {
        Notation::OneLetter => residues.map(char::from).collect(),
        Notation::ThreeLetter => residues.map(codons::three_letter).collect::<Vec<_>>().join("-"),
    }
}
