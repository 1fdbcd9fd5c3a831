//! Melting temperature estimation.
//!
//! [`MeltingTemperature`] is a closed set of methods;
//! [`MeltingTemperature::formula`] is the one place that maps a method to
//! its formula. Nearest-neighbour thermodynamics are listed so callers can ask for
//! them, but they are answered with [`PrimerError::UnsupportedOperation`].
//!
//! References:
//! - Basic, ≤ 13 nt: Marmur & Doty (1962) *J Mol Biol* 5:109-118.
//! - Basic, > 13 nt: Wallace et al. (1979) *Nucleic Acids Res* 6:3543-3557.
//! - Salt adjusted: Howley et al. (1979) *J Biol Chem* 254:4876-4883.
use strum::{Display, EnumCount, EnumIter, EnumString};

use crate::calc::BaseCounts;
use crate::error::{PrimerError, Result};
use crate::sequence::Sequence;

/// Tm formula taking the sequence and the sodium concentration in mM.
pub type Formula = fn(&Sequence, f64) -> f64;

/// Default sodium concentration (mM).
pub const DEFAULT_SALT_MM: f64 = 50.0;

/// Tm estimation method.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Display, EnumCount, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MeltingTemperature {
    Basic,
    SaltAdjusted,
    NearestNeighbor,
}

impl MeltingTemperature {
    /// Position of the method in a per-method table.
    pub(crate) const fn index(self) -> usize {
        match self {
            MeltingTemperature::Basic => 0,
            MeltingTemperature::SaltAdjusted => 1,
            MeltingTemperature::NearestNeighbor => 2,
        }
    }

    /// Formula for this method, or `None` if it is not implemented.
    pub fn formula(self) -> Option<Formula> {
        match self {
            MeltingTemperature::Basic => Some(basic_ignoring_salt as Formula),
            MeltingTemperature::SaltAdjusted => Some(salt_adjusted as Formula),
            MeltingTemperature::NearestNeighbor => None,
        }
    }

    pub fn is_supported(self) -> bool {
        self.formula().is_some()
    }
}

fn basic_ignoring_salt(seq: &Sequence, _salt_mm: f64) -> f64 {
    basic(seq)
}

fn short_oligo(c: &BaseCounts) -> f64 {
    2.0 * (c.a + c.t) as f64 + 4.0 * (c.g + c.c) as f64
}

/// Marmur–Doty / Wallace rule (°C).
pub fn basic(seq: &Sequence) -> f64 {
    let c = BaseCounts::of(seq);
    if seq.len() <= 13 {
        short_oligo(&c)
    } else {
        64.9 + 41.0 * ((c.g + c.c) as f64 - 16.4) / c.total() as f64
    }
}

/// Salt-adjusted estimate (°C) for a sodium concentration in mM.
pub fn salt_adjusted(seq: &Sequence, salt_mm: f64) -> f64 {
    let c = BaseCounts::of(seq);
    let salt_term = 16.6 * (salt_mm.log10() - 3.0);
    let len = seq.len() as f64;
    if seq.len() <= 13 {
        short_oligo(&c) + salt_term - 16.6 * 0.05f64.log10()
    } else {
        100.5 + 41.0 * (c.g + c.c) as f64 / len - 820.0 / len + salt_term
    }
}

/// Compute Tm of `seq` with `method`.
///
/// # Examples
/// ```
/// use oprimer::melting::{estimate, MeltingTemperature};
/// use oprimer::{Sequence, ValidationProfile};
/// let (s, _) = Sequence::validate("ATCG", &ValidationProfile::advisory()).unwrap();
/// assert_eq!(estimate(&s, MeltingTemperature::Basic, 50.0).unwrap(), 12.0);
/// assert!(estimate(&s, MeltingTemperature::NearestNeighbor, 50.0).is_err());
/// ```
pub fn estimate(seq: &Sequence, method: MeltingTemperature, salt_mm: f64) -> Result<f64> {
    let formula = method.formula().ok_or(PrimerError::UnsupportedOperation(method))?;
    Ok(formula(seq, salt_mm))
}
