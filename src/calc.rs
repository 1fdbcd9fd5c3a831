//! Pure metric formulas over a validated [`Sequence`].
//!
//! Every function here is total: the alphabet and non-emptiness were checked
//! when the `Sequence` was built, so nothing can fail. Caching lives in
//! [`crate::cache`]; these functions always recompute.
//!
//! # Examples
//! ```
//! use oprimer::{calc, Sequence, ValidationProfile};
//! let (s, _) = Sequence::validate("ATTCG", &ValidationProfile::advisory()).unwrap();
//! assert_eq!(calc::gc_content(&s), 0.4);
//! assert_eq!(calc::gc_clamp(&s), 2);
//! ```
use core::fmt;
use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use crate::data::constants::{self, Atoms, PHOSPHODIESTER, WATER};
use crate::sequence::{Base, Dinucleotide, Sequence};

/// Terminal window inspected by [`gc_clamp`].
pub const GC_CLAMP_WINDOW: usize = 5;

/// Longest run per base.
pub type BaseRuns = BTreeMap<Base, usize>;
/// Longest back-to-back run per ordered pair of distinct bases.
pub type PairRuns = BTreeMap<Dinucleotide, usize>;

/// Per-base tallies.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BaseCounts {
    pub a: usize,
    pub t: usize,
    pub c: usize,
    pub g: usize,
}

impl BaseCounts {
    pub fn of(seq: &Sequence) -> Self {
        let mut out = Self::default();
        for b in seq.bases() {
            *out.get_mut(b) += 1;
        }
        out
    }

    pub fn get(&self, b: Base) -> usize {
        match b {
            Base::A => self.a,
            Base::T => self.t,
            Base::C => self.c,
            Base::G => self.g,
        }
    }

    fn get_mut(&mut self, b: Base) -> &mut usize {
        match b {
            Base::A => &mut self.a,
            Base::T => &mut self.t,
            Base::C => &mut self.c,
            Base::G => &mut self.g,
        }
    }

    pub fn total(&self) -> usize { self.a + self.t + self.c + self.g }
}

/// Anhydrous molecular weight (g/mol).
pub fn molecular_weight(seq: &Sequence) -> f64 {
    let c = BaseCounts::of(seq);
    Base::iter().map(|b| c.get(b) as f64 * constants::residue_weight(b)).sum::<f64>()
        - constants::ANHYDROUS_MOLECULAR_WEIGHT_CONSTANT
}

/// Fraction of `G`/`C` bases, in `[0, 1]`.
pub fn gc_content(seq: &Sequence) -> f64 {
    let strong = seq.bases().filter(|b| b.is_strong()).count();
    strong as f64 / seq.len() as f64
}

/// Number of `G`/`C` among the last [`GC_CLAMP_WINDOW`] bases; `0` for shorter sequences.
pub fn gc_clamp(seq: &Sequence) -> usize {
    if seq.len() < GC_CLAMP_WINDOW {
        return 0;
    }
    seq.bases().skip(seq.len() - GC_CLAMP_WINDOW).filter(|b| b.is_strong()).count()
}

/// Count occurrences of `needle` in `haystack` (both uppercase).
///
/// - `consecutive == false`: non-overlapping occurrences, scanned left to right
///   (`"AA"` occurs twice in `"AAAAA"`).
/// - `consecutive == true`: the largest number of back-to-back copies of
///   `needle`, starting from any offset (`"ATA"` in `"ATATAATA"` is 2).
///
/// An empty `needle` counts as zero.
pub fn repeats(haystack: &str, needle: &str, consecutive: bool) -> usize {
    if needle.is_empty() {
        return 0;
    }
    if !consecutive {
        return haystack.matches(needle).count();
    }
    let (h, n) = (haystack.as_bytes(), needle.as_bytes());
    (0..=h.len().saturating_sub(n.len()))
        .map(|i| {
            let mut run = 0;
            while h[i + run * n.len()..].starts_with(n) {
                run += 1;
            }
            run
        })
        .max()
        .unwrap_or(0)
}

/// Longest homopolymer run for every base (zero for absent bases).
pub fn single_runs(seq: &Sequence) -> BaseRuns {
    Base::iter().map(|b| (b, repeats(seq.as_str(), &b.to_string(), true))).collect()
}

/// Longest dinucleotide repeat (`ATATAT` → `AT: 3`) for each ordered pair of distinct bases.
pub fn double_runs(seq: &Sequence) -> PairRuns {
    Dinucleotide::distinct_pairs().map(|d| (d, repeats(seq.as_str(), &d.to_string(), true))).collect()
}

/// Nearest-neighbour extinction coefficient at 260 nm (L·mol⁻¹·cm⁻¹).
///
/// Sum of the dinucleotide terms minus the mononucleotide terms of the
/// internal bases. A single base uses its mononucleotide value.
pub fn extinction_coefficient(seq: &Sequence) -> f64 {
    let bases: Vec<Base> = seq.bases().collect();
    if let [only] = bases.as_slice() {
        return constants::e260_single(*only);
    }
    let pairs: f64 = bases.windows(2).map(|w| constants::e260_pair(w[0], w[1])).sum();
    let internal: f64 = bases[1..bases.len() - 1].iter().map(|b| constants::e260_single(*b)).sum();
    pairs - internal
}

/// Elemental composition of a single-stranded oligo (5'-OH, no terminal phosphate).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ChemicalFormula {
    pub atoms: Atoms,
}

impl fmt::Display for ChemicalFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.atoms;
        write!(f, "C{}H{}N{}O{}", a.c, a.h, a.n, a.o)?;
        if a.p > 0 {
            write!(f, "P{}", a.p)?;
        }
        Ok(())
    }
}

pub fn chemical_formula(seq: &Sequence) -> ChemicalFormula {
    let counts = BaseCounts::of(seq);
    let bonds = seq.len() as i64 - 1;
    let atoms = Base::iter()
        .fold(Atoms::default(), |acc, b| acc.add_scaled(constants::nucleoside_atoms(b), counts.get(b) as i64))
        .add_scaled(WATER, -bonds)
        .add_scaled(PHOSPHODIESTER, bonds);
    ChemicalFormula { atoms }
}
