//! The [`Primer`] record: one validated [`Sequence`] plus its [`MetricsCache`].
//!
//! Accessors take `&self` and fill the cache on first use. Operations that
//! change the sequence come in two flavours:
//! - `reverse()` / `complement()` return a new primer with an empty cache;
//! - `reverse_in_place()` / `complement_in_place()` swap the sequence and
//!   reset the cache in one step, so no stale metric can survive.
//!
//! There are no setters. The sequence and every metric are read-only from the
//! outside.
use core::fmt;
use core::ops::{Add, Mul};
use core::str::FromStr;
use std::collections::BTreeMap;

use log::debug;

use crate::cache::{Computed, MetricKey, MetricName, MetricsCache};
use crate::calc::{self, BaseRuns, ChemicalFormula, PairRuns};
use crate::error::{PrimerError, Result};
use crate::melting::{MeltingTemperature, DEFAULT_SALT_MM};
use crate::sequence::{Advisory, Base, Sequence, ValidationProfile};
use crate::translate::{self, Notation, ReadingFrame};

/// Construction settings carried by a primer (and inherited by primers derived from it).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrimerConfig {
    pub profile: ValidationProfile,
    /// Sodium concentration in mM, used by [`MeltingTemperature::SaltAdjusted`].
    pub salt_mm: f64,
}

impl Default for PrimerConfig {
    fn default() -> Self { Self { profile: ValidationProfile::advisory(), salt_mm: DEFAULT_SALT_MM } }
}

impl PrimerConfig {
    pub fn strict() -> Self { Self { profile: ValidationProfile::strict(), ..Self::default() } }

    pub fn with_profile(mut self, profile: ValidationProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_salt(mut self, salt_mm: f64) -> Self {
        self.salt_mm = salt_mm;
        self
    }

    fn check(&self) -> Result<()> {
        if self.salt_mm.is_finite() && self.salt_mm > 0.0 {
            Ok(())
        } else {
            Err(PrimerError::InvalidSalt(self.salt_mm))
        }
    }
}

/// A short DNA oligonucleotide with lazily computed, cached metrics.
///
/// # Examples
/// ```
/// use oprimer::{Primer, MeltingTemperature, MetricKey};
/// let p = Primer::new("ATCGATCGATCGATCGATCG").unwrap();
/// assert!(!p.is_computed(MetricKey::GcContent));
/// assert_eq!(p.gc_content(), 0.5);
/// assert!(p.is_computed(MetricKey::GcContent));
/// let tm = p.melting_temperature(MeltingTemperature::Basic).unwrap();
/// assert!((tm - 51.78).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct Primer {
    sequence: Sequence,
    config: PrimerConfig,
    advisories: Vec<Advisory>,
    cache: MetricsCache,
}

impl Primer {
    /// Validate `sequence` with the default (advisory) profile and 50 mM salt.
    pub fn new(sequence: &str) -> Result<Self> { Self::with_config(sequence, PrimerConfig::default()) }

    pub fn with_salt(sequence: &str, salt_mm: f64) -> Result<Self> {
        Self::with_config(sequence, PrimerConfig::default().with_salt(salt_mm))
    }

    pub fn with_config(sequence: &str, config: PrimerConfig) -> Result<Self> {
        config.check()?;
        let (sequence, advisories) = Sequence::validate(sequence, &config.profile)?;
        Ok(Self { sequence, config, advisories, cache: MetricsCache::new() })
    }

    /// Build from raw bytes; non-UTF-8 input is a [`PrimerError::TypeMismatch`].
    pub fn from_bytes(bytes: &[u8], config: PrimerConfig) -> Result<Self> {
        let s = core::str::from_utf8(bytes)
            .map_err(|e| PrimerError::TypeMismatch(format!("primer sequence must be text: {e}")))?;
        Self::with_config(s, config)
    }

    /// A primer derived from this one: same config and advisories, empty cache.
    fn derived(&self, sequence: Sequence) -> Self {
        Self { sequence, config: self.config, advisories: self.advisories.clone(), cache: MetricsCache::new() }
    }

    fn replace_sequence(&mut self, sequence: Sequence, op: &str) {
        debug!("{op} in place: {} -> {}", self.sequence, sequence);
        self.sequence = sequence;
        self.cache.reset_all();
    }

    pub fn sequence(&self) -> &str { self.sequence.as_str() }

    pub fn as_sequence(&self) -> &Sequence { &self.sequence }

    pub fn config(&self) -> &PrimerConfig { &self.config }

    pub fn salt(&self) -> f64 { self.config.salt_mm }

    /// Quality warnings raised when the sequence was validated.
    pub fn advisories(&self) -> &[Advisory] { &self.advisories }

    pub fn len(&self) -> usize { self.sequence.len() }

    /// Always `false`: a primer holds at least one base.
    pub fn is_empty(&self) -> bool { self.sequence.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = Base> + '_ { self.sequence.bases() }

    // Derived metrics

    pub fn molecular_weight(&self) -> f64 {
        self.cache.molecular_weight(|| calc::molecular_weight(&self.sequence))
    }

    pub fn gc_content(&self) -> f64 {
        self.cache.gc_content(|| calc::gc_content(&self.sequence))
    }

    pub fn gc_clamp(&self) -> usize {
        self.cache.gc_clamp(|| calc::gc_clamp(&self.sequence))
    }

    /// Tm in °C; unsupported methods fail without touching the cache.
    pub fn melting_temperature(&self, method: MeltingTemperature) -> Result<f64> {
        let formula = method.formula().ok_or(PrimerError::UnsupportedOperation(method))?;
        Ok(self.cache.melting_temperature(method, || formula(&self.sequence, self.config.salt_mm)))
    }

    pub fn single_runs(&self) -> &BaseRuns {
        self.cache.single_runs(|| calc::single_runs(&self.sequence))
    }

    pub fn double_runs(&self) -> &PairRuns {
        self.cache.double_runs(|| calc::double_runs(&self.sequence))
    }

    /// ε260 in L·mol⁻¹·cm⁻¹.
    pub fn extinction_coefficient(&self) -> f64 {
        self.cache.extinction_coefficient(|| calc::extinction_coefficient(&self.sequence))
    }

    pub fn chemical_formula(&self) -> ChemicalFormula {
        self.cache.chemical_formula(|| calc::chemical_formula(&self.sequence))
    }

    // Cache introspection

    pub fn is_computed(&self, key: MetricKey) -> bool { self.cache.is_computed(key) }

    /// Presence of a metric looked up by name; `melting_temperature` reports every method.
    ///
    /// ```
    /// use oprimer::{Computed, Primer};
    /// let p = Primer::new("ATCG").unwrap();
    /// assert_eq!(p.is_computed_by_name("gc_clamp").unwrap(), Computed::Single(false));
    /// ```
    pub fn is_computed_by_name(&self, name: &str) -> Result<Computed> {
        Ok(self.cache.computed(name.parse::<MetricName>()?))
    }

    pub fn melting_temperatures_computed(&self) -> BTreeMap<MeltingTemperature, bool> {
        match self.cache.computed(MetricName::MeltingTemperature) {
            Computed::PerMethod(map) => map,
            Computed::Single(_) => BTreeMap::new(),
        }
    }

    /// Forget one cached metric; the next access recomputes it.
    pub fn invalidate(&mut self, key: MetricKey) { self.cache.invalidate(key) }

    // Sequence operations

    pub fn reverse(&self) -> Primer { self.derived(self.sequence.reversed()) }

    pub fn reverse_in_place(&mut self) {
        let s = self.sequence.reversed();
        self.replace_sequence(s, "reverse");
    }

    pub fn complement(&self) -> Primer { self.derived(self.sequence.complemented()) }

    pub fn complement_in_place(&mut self) {
        let s = self.sequence.complemented();
        self.replace_sequence(s, "complement");
    }

    pub fn reverse_complement(&self) -> Primer { self.derived(self.sequence.reverse_complemented()) }

    pub fn reverse_complement_in_place(&mut self) {
        let s = self.sequence.reverse_complemented();
        self.replace_sequence(s, "reverse complement");
    }

    pub fn to_rna(&self) -> String { translate::to_rna(&self.sequence) }

    pub fn to_protein(&self, frame: ReadingFrame, notation: Notation) -> String {
        translate::to_protein(&self.sequence, frame, notation)
    }

    /// Occurrences of `subsequence`; see [`calc::repeats`] for the counting policy.
    pub fn repeats(&self, subsequence: &str, consecutive: bool) -> usize {
        calc::repeats(self.sequence.as_str(), &subsequence.to_ascii_uppercase(), consecutive)
    }

    /// Substring containment; accepts `&str`, `String`, `&Primer`, ... Case-insensitive.
    pub fn contains<Q: AsRef<str>>(&self, query: Q) -> bool {
        self.sequence.as_str().contains(&query.as_ref().to_ascii_uppercase())
    }

    /// Concatenate, validating the result with this primer's config.
    pub fn concat(&self, other: &Primer) -> Result<Primer> {
        let joined = format!("{}{}", self.sequence, other.sequence);
        Primer::with_config(&joined, self.config)
    }

    /// Repeat the sequence `n` times. `n == 0` yields [`PrimerError::EmptySequence`].
    pub fn repeat(&self, n: usize) -> Result<Primer> {
        Primer::with_config(&self.sequence.as_str().repeat(n), self.config)
    }
}

impl PartialEq for Primer {
    fn eq(&self, other: &Self) -> bool { self.sequence == other.sequence }
}

impl Eq for Primer {}

impl core::hash::Hash for Primer {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) { self.sequence.hash(state) }
}

impl fmt::Display for Primer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.sequence) }
}

impl AsRef<str> for Primer {
    fn as_ref(&self) -> &str { self.sequence.as_str() }
}

impl FromStr for Primer {
    type Err = PrimerError;
    fn from_str(s: &str) -> Result<Self> { Primer::new(s) }
}

impl TryFrom<&str> for Primer {
    type Error = PrimerError;
    fn try_from(s: &str) -> Result<Self> { Primer::new(s) }
}

impl TryFrom<&[u8]> for Primer {
    type Error = PrimerError;
    fn try_from(b: &[u8]) -> Result<Self> { Primer::from_bytes(b, PrimerConfig::default()) }
}

impl<'a> IntoIterator for &'a Primer {
    type Item = Base;
    type IntoIter = Box<dyn Iterator<Item = Base> + 'a>;
    fn into_iter(self) -> Self::IntoIter { Box::new(self.sequence.bases()) }
}

impl Add for &Primer {
    type Output = Result<Primer>;
    fn add(self, rhs: &Primer) -> Result<Primer> { self.concat(rhs) }
}

impl Add for Primer {
    type Output = Result<Primer>;
    fn add(self, rhs: Primer) -> Result<Primer> { self.concat(&rhs) }
}

impl Mul<usize> for &Primer {
    type Output = Result<Primer>;
    fn mul(self, n: usize) -> Result<Primer> { self.repeat(n) }
}

impl Mul<usize> for Primer {
    type Output = Result<Primer>;
    fn mul(self, n: usize) -> Result<Primer> { self.repeat(n) }
}

#[cfg(test)]
mod primer_tests {
    use super::*;

    fn p(s: &str) -> Primer { Primer::new(s).unwrap() }

    #[test]
    fn metrics_reference_values() {
        assert!((p("ATCGATCGATCGATCGAT").molecular_weight() - 5498.65).abs() < 1e-6);
        assert_eq!(p("ATCG").gc_content(), 0.5);
        assert_eq!(p("ATTCG").gc_content(), 0.4);
        assert_eq!(p("ATTTTTT").gc_content(), 0.0);
        assert_eq!(p("ATCGATCGATCGATCGGTCG").gc_clamp(), 4);
        assert_eq!(p("ACTTA").gc_clamp(), 1);
        let tm = p("ATCGATCGATCGATCGATCG").melting_temperature(MeltingTemperature::Basic).unwrap();
        assert_eq!((tm * 10.0).round() / 10.0, 51.8);
        assert_eq!(p("ATCG").melting_temperature(MeltingTemperature::Basic).unwrap(), 12.0);
    }

    #[test]
    fn every_metric_is_cached_after_first_access() {
        let primer = p("ATCGATCGATCGATCGATCG");
        let keys = [
            MetricKey::MolecularWeight,
            MetricKey::GcContent,
            MetricKey::GcClamp,
            MetricKey::MeltingTemperature(MeltingTemperature::Basic),
            MetricKey::MeltingTemperature(MeltingTemperature::SaltAdjusted),
            MetricKey::SingleRuns,
            MetricKey::DoubleRuns,
            MetricKey::ExtinctionCoefficient,
            MetricKey::ChemicalFormula,
        ];
        assert!(keys.iter().all(|k| !primer.is_computed(*k)));
        let first = (
            primer.molecular_weight(),
            primer.gc_content(),
            primer.gc_clamp(),
            primer.melting_temperature(MeltingTemperature::Basic).unwrap(),
            primer.melting_temperature(MeltingTemperature::SaltAdjusted).unwrap(),
            primer.single_runs().clone(),
            primer.double_runs().clone(),
            primer.extinction_coefficient(),
            primer.chemical_formula(),
        );
        assert!(keys.iter().all(|k| primer.is_computed(*k)));
        let second = (
            primer.molecular_weight(),
            primer.gc_content(),
            primer.gc_clamp(),
            primer.melting_temperature(MeltingTemperature::Basic).unwrap(),
            primer.melting_temperature(MeltingTemperature::SaltAdjusted).unwrap(),
            primer.single_runs().clone(),
            primer.double_runs().clone(),
            primer.extinction_coefficient(),
            primer.chemical_formula(),
        );
        assert_eq!(first.0.to_bits(), second.0.to_bits());
        assert_eq!(first.3.to_bits(), second.3.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn is_computed_by_name_reports_per_method() {
        let primer = p("ATCGATCGATCGATCGATCG");
        primer.melting_temperature(MeltingTemperature::Basic).unwrap();
        let Computed::PerMethod(map) = primer.is_computed_by_name("melting_temperature").unwrap() else {
            panic!("expected per-method map");
        };
        assert!(map[&MeltingTemperature::Basic]);
        assert!(!map[&MeltingTemperature::SaltAdjusted]);
        assert_eq!(primer.is_computed_by_name("E260").unwrap(), Computed::Single(false));
        assert!(primer.is_computed_by_name("nope").is_err());
        assert_eq!(primer.melting_temperatures_computed(), map);
    }

    #[test]
    fn nearest_neighbor_is_unsupported_and_not_cached() {
        let primer = p("ATCGATCGATCGATCGAT");
        let err = primer.melting_temperature(MeltingTemperature::NearestNeighbor).unwrap_err();
        assert_eq!(err, PrimerError::UnsupportedOperation(MeltingTemperature::NearestNeighbor));
        assert!(!primer.is_computed(MetricKey::MeltingTemperature(MeltingTemperature::NearestNeighbor)));
    }

    #[test]
    fn salt_is_carried_by_the_record() {
        let low = Primer::with_salt("ATCGATCGATCGATCGATCG", 10.0).unwrap();
        let high = Primer::with_salt("ATCGATCGATCGATCGATCG", 500.0).unwrap();
        let tm = |x: &Primer| x.melting_temperature(MeltingTemperature::SaltAdjusted).unwrap();
        assert!(tm(&high) > tm(&low));
        assert_eq!(Primer::with_salt("ATCG", 0.0).unwrap_err(), PrimerError::InvalidSalt(0.0));
        assert!(Primer::with_salt("ATCG", f64::NAN).is_err());
        assert_eq!(low.reverse().salt(), 10.0);
    }

    #[test]
    fn manual_invalidation() {
        let mut primer = p("ATCGATCGATCGATCGAT");
        let mw = primer.molecular_weight();
        primer.invalidate(MetricKey::MolecularWeight);
        assert!(!primer.is_computed(MetricKey::MolecularWeight));
        primer.invalidate(MetricKey::MolecularWeight);
        assert_eq!(primer.molecular_weight(), mw);
    }

    #[test]
    fn reverse_copy_and_in_place() {
        let primer = p("ATCGATCGATCGATCGAT");
        assert_eq!(primer.reverse().sequence(), "TAGCTAGCTAGCTAGCTA");
        assert_eq!(primer.sequence(), "ATCGATCGATCGATCGAT");

        let mut primer = p("ATCGATCGATCGATCGAT");
        primer.reverse_in_place();
        assert_eq!(primer.sequence(), "TAGCTAGCTAGCTAGCTA");
    }

    #[test]
    fn complement_copy_and_in_place() {
        let primer = p("ATCGGCTAAATCGGCTAA");
        assert_eq!(primer.complement().sequence(), "TAGCCGATTTAGCCGATT");

        let mut primer = p("ATCGGCTAAATCGGCTAA");
        primer.complement_in_place();
        assert_eq!(primer.sequence(), "TAGCCGATTTAGCCGATT");
    }

    #[test]
    fn in_place_mutation_resets_the_cache() {
        let mut primer = p("AAAAAAAAAAAAAAAAAC");
        let before = primer.molecular_weight();
        let runs_before = primer.single_runs()[&Base::A];
        primer.complement_in_place();
        assert!(!primer.is_computed(MetricKey::MolecularWeight));
        assert!(!primer.is_computed(MetricKey::SingleRuns));
        let after = primer.molecular_weight();
        assert_ne!(before, after);
        assert!((after - p("TTTTTTTTTTTTTTTTTG").molecular_weight()).abs() < 1e-9);
        assert_eq!(runs_before, 17);
        assert_eq!(primer.single_runs()[&Base::A], 0);
        assert_eq!(primer.single_runs()[&Base::T], 17);
    }

    #[test]
    fn copy_has_fresh_cache_and_original_keeps_its_own() {
        let primer = p("ATCGATCGATCGATCGAT");
        primer.gc_content();
        let rev = primer.reverse();
        assert!(!rev.is_computed(MetricKey::GcContent));
        assert!(primer.is_computed(MetricKey::GcContent));
    }

    #[test]
    fn rna_and_protein() {
        assert_eq!(p("ATCGGCTAAATCGGCTAA").to_rna(), "AUCGGCUAAAUCGGCUAA");
        let primer = p("ATCGATCG");
        assert_eq!(primer.to_protein(ReadingFrame::default(), Notation::default()), "ID");
        assert_eq!(primer.to_protein(ReadingFrame::Second, Notation::ThreeLetter), "Ser-Ile");
    }

    #[test]
    fn operators() {
        let sum = (&p("ATCG") + &p("GATC")).unwrap();
        assert_eq!(sum.sequence(), "ATCGGATC");
        let rep = (p("ATCG") * 4).unwrap();
        assert_eq!(rep.sequence(), "ATCGATCGATCGATCG");
        assert_eq!((&p("ATCG") * 0).unwrap_err(), PrimerError::EmptySequence);
        assert_eq!(format!("{}{}", p("ATCG"), p("ATCGC")), (p("ATCG") + p("ATCGC")).unwrap().sequence());
    }

    #[test]
    fn strict_config_applies_to_derived_records() {
        let cfg = PrimerConfig::strict();
        let a = Primer::with_config("ATCGATCGATCGATCGAT", cfg).unwrap();
        assert!(matches!(a.concat(&a), Err(PrimerError::LengthOutOfRange { length: 36, .. })));
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(p("ATCG"), p("atcg"));
        assert_ne!(p("ATCG"), p("ATCGC"));
        let warm = p("ATCG");
        warm.molecular_weight();
        assert_eq!(warm, p("ATCG"));
    }

    #[test]
    fn length_iteration_containment() {
        let primer = p("ATCGGCTAAATCGGCTAA");
        assert_eq!(primer.len(), 18);
        let rebuilt: String = p("ATCG").iter().map(Base::as_char).collect();
        assert_eq!(rebuilt, "ATCG");
        let via_ref: Vec<Base> = (&p("AT")).into_iter().collect();
        assert_eq!(via_ref, vec![Base::A, Base::T]);

        assert!(p("ATCGAT").contains(&p("ATCG")));
        assert!(p("ATCGAT").contains("ATCG"));
        assert!(p("ATCGAT").contains("tcg"));
        assert!(!p("TCGAT").contains("ATCG"));
    }

    #[test]
    fn bytes_must_be_text() {
        assert!(matches!(Primer::try_from(&[0xffu8, 0xfe][..]), Err(PrimerError::TypeMismatch(_))));
        assert_eq!(Primer::try_from(&b"atcg"[..]).unwrap().sequence(), "ATCG");
    }

    #[test]
    fn advisories_are_visible() {
        assert_eq!(p("ATCG").advisories().len(), 1);
        assert!(p("ATCGATCGATCGATCGAT").advisories().is_empty());
        assert!(matches!(Primer::with_config("ATCG", PrimerConfig::strict()), Err(PrimerError::LengthOutOfRange { .. })));
    }

    #[test]
    fn repeats_on_record() {
        let primer = p("ATATCGAACACACACACA");
        assert_eq!(primer.repeats("ca", true), 5);
        assert_eq!(primer.repeats("CA", false), 5);
        assert_eq!(primer.repeats("AT", false), 2);
        assert_eq!(p("ATATAATA").repeats("ata", true), 2);
    }

    #[test]
    fn record_tm_agrees_with_estimate_for_every_method() {
        use strum::IntoEnumIterator;
        let primer = Primer::with_salt("ATCGATCGATCGATCGATCG", 120.0).unwrap();
        for m in MeltingTemperature::iter() {
            assert_eq!(primer.melting_temperature(m), crate::melting::estimate(&primer.sequence, m, 120.0));
            assert_eq!(primer.is_computed(MetricKey::MeltingTemperature(m)), m.is_supported());
        }
    }

    #[test]
    fn padded_input_is_rejected() {
        assert!(matches!(Primer::new(" ATCGATCGATCGATCGAT\n"), Err(PrimerError::InvalidAlphabet { base: ' ', position: 0 })));
        assert!(matches!("ATCG\t".parse::<Primer>(), Err(PrimerError::InvalidAlphabet { base: '\t', position: 4 })));
    }
}
