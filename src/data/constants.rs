//! Physical constants used by the metric formulas.
//!
//! Sources:
//! - Anhydrous molecular weights: IDT *OligoAnalyzer* / Thermo *DNA molecular
//!   weight* calculator (monophosphate residues, minus 61.96 for the 5'-OH
//!   terminus without phosphate).
//! - Extinction coefficients: nearest-neighbour model of Cavaluzzi & Borer
//!   (2004) *Nucleic Acids Res.* 32:e13, values in L·mol⁻¹·cm⁻¹ at 260 nm.
//! - Atom counts: deoxynucleoside formulas (dA, dT, dC, dG); each
//!   phosphodiester bond removes one water and adds one `HPO3`.
use crate::sequence::Base;

pub const A_WEIGHT: f64 = 313.21;
pub const T_WEIGHT: f64 = 304.2;
pub const C_WEIGHT: f64 = 289.18;
pub const G_WEIGHT: f64 = 329.21;
/// Subtracted once per oligo for the missing terminal phosphate.
pub const ANHYDROUS_MOLECULAR_WEIGHT_CONSTANT: f64 = 61.96;

/// Anhydrous residue weight (g/mol).
pub const fn residue_weight(b: Base) -> f64 {
    match b {
        Base::A => A_WEIGHT,
        Base::T => T_WEIGHT,
        Base::C => C_WEIGHT,
        Base::G => G_WEIGHT,
    }
}

/// Mononucleotide ε260.
pub const fn e260_single(b: Base) -> f64 {
    match b {
        Base::A => 15_400.0,
        Base::T => 8_700.0,
        Base::C => 7_400.0,
        Base::G => 11_500.0,
    }
}

/// Dinucleotide (5'→3') ε260.
pub const fn e260_pair(x: Base, y: Base) -> f64 {
    use Base::*;
    match (x, y) {
        (A, A) => 27_400.0,
        (A, C) => 21_200.0,
        (A, G) => 25_000.0,
        (A, T) => 22_800.0,
        (C, A) => 21_200.0,
        (C, C) => 14_600.0,
        (C, G) => 18_000.0,
        (C, T) => 15_200.0,
        (G, A) => 25_200.0,
        (G, C) => 17_600.0,
        (G, G) => 21_600.0,
        (G, T) => 20_000.0,
        (T, A) => 23_400.0,
        (T, C) => 16_200.0,
        (T, G) => 19_000.0,
        (T, T) => 16_800.0,
    }
}

/// Element counts used by chemical formulas.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Atoms {
    pub c: i64,
    pub h: i64,
    pub n: i64,
    pub o: i64,
    pub p: i64,
}

impl Atoms {
    pub const fn new(c: i64, h: i64, n: i64, o: i64, p: i64) -> Self { Self { c, h, n, o, p } }

    /// `self + k * other`, element-wise.
    pub const fn add_scaled(self, other: Atoms, k: i64) -> Self {
        Self {
            c: self.c + k * other.c,
            h: self.h + k * other.h,
            n: self.n + k * other.n,
            o: self.o + k * other.o,
            p: self.p + k * other.p,
        }
    }
}

/// Deoxynucleoside atoms.
pub const fn nucleoside_atoms(b: Base) -> Atoms {
    match b {
        Base::A => Atoms::new(10, 13, 5, 3, 0),
        Base::T => Atoms::new(10, 14, 2, 5, 0),
        Base::C => Atoms::new(9, 13, 3, 4, 0),
        Base::G => Atoms::new(10, 13, 5, 4, 0),
    }
}

pub const WATER: Atoms = Atoms::new(0, 2, 0, 1, 0);
pub const PHOSPHODIESTER: Atoms = Atoms::new(0, 1, 0, 3, 1);
