//! Memoization of derived primer metrics.
//!
//! [`MetricsCache`] holds one slot per metric (one per method for melting
//! temperature). A slot is filled the first time its value is requested and
//! then returned as-is on every later request. Each slot is a [`OnceLock`],
//! so a record shared between threads still runs each computation at most
//! once: concurrent first readers block until the single initializer is done.
//!
//! Emptying slots needs `&mut self`. A record can only be mutated while nobody
//! else is reading it, so a stale value can never be observed.
use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use log::trace;
use strum::{EnumCount, IntoEnumIterator};

use crate::calc::{BaseRuns, ChemicalFormula, PairRuns};
use crate::error::PrimerError;
use crate::melting::MeltingTemperature;

/// Name of a cached metric.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MetricKey {
    MolecularWeight,
    GcContent,
    GcClamp,
    MeltingTemperature(MeltingTemperature),
    SingleRuns,
    DoubleRuns,
    ExtinctionCoefficient,
    ChemicalFormula,
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKey::MolecularWeight => f.write_str("molecular_weight"),
            MetricKey::GcContent => f.write_str("gc_content"),
            MetricKey::GcClamp => f.write_str("gc_clamp"),
            MetricKey::MeltingTemperature(m) => write!(f, "melting_temperature[{m}]"),
            MetricKey::SingleRuns => f.write_str("single_runs"),
            MetricKey::DoubleRuns => f.write_str("double_runs"),
            MetricKey::ExtinctionCoefficient => f.write_str("E260"),
            MetricKey::ChemicalFormula => f.write_str("chemical_formula"),
        }
    }
}

/// A metric family as named by callers: plain metrics map to one key,
/// `melting_temperature` stands for every method at once.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricName {
    Single(MetricKey),
    MeltingTemperature,
}

impl FromStr for MetricName {
    type Err = PrimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim().to_ascii_lowercase().as_str() {
            "molecular_weight" => MetricKey::MolecularWeight,
            "gc_content" => MetricKey::GcContent,
            "gc_clamp" => MetricKey::GcClamp,
            "melting_temperature" => return Ok(MetricName::MeltingTemperature),
            "single_runs" | "single_base_runs" => MetricKey::SingleRuns,
            "double_runs" | "double_base_runs" => MetricKey::DoubleRuns,
            "e260" | "extinction_coefficient" => MetricKey::ExtinctionCoefficient,
            "chemical_formula" | "formula" => MetricKey::ChemicalFormula,
            _ => return Err(PrimerError::UnknownMetric(s.to_string())),
        };
        Ok(MetricName::Single(key))
    }
}

/// Presence report for a [`MetricName`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Computed {
    Single(bool),
    PerMethod(BTreeMap<MeltingTemperature, bool>),
}

/// Lazily filled metric slots for one sequence.
#[derive(Clone, Debug, Default)]
pub struct MetricsCache {
    molecular_weight: OnceLock<f64>,
    gc_content: OnceLock<f64>,
    gc_clamp: OnceLock<usize>,
    melting_temperature: [OnceLock<f64>; MeltingTemperature::COUNT],
    single_runs: OnceLock<BaseRuns>,
    double_runs: OnceLock<PairRuns>,
    extinction_coefficient: OnceLock<f64>,
    chemical_formula: OnceLock<ChemicalFormula>,
}

fn memo<T>(key: MetricKey, slot: &OnceLock<T>, compute: impl FnOnce() -> T) -> &T {
    slot.get_or_init(|| {
        trace!("cache miss: computing {key}");
        compute()
    })
}

impl MetricsCache {
    pub fn new() -> Self { Self::default() }

    pub fn molecular_weight(&self, compute: impl FnOnce() -> f64) -> f64 {
        *memo(MetricKey::MolecularWeight, &self.molecular_weight, compute)
    }

    pub fn gc_content(&self, compute: impl FnOnce() -> f64) -> f64 {
        *memo(MetricKey::GcContent, &self.gc_content, compute)
    }

    pub fn gc_clamp(&self, compute: impl FnOnce() -> usize) -> usize {
        *memo(MetricKey::GcClamp, &self.gc_clamp, compute)
    }

    /// Only supported methods should reach this; the dispatcher rejects the rest before caching.
    pub fn melting_temperature(&self, method: MeltingTemperature, compute: impl FnOnce() -> f64) -> f64 {
        *memo(MetricKey::MeltingTemperature(method), &self.melting_temperature[method.index()], compute)
    }

    pub fn single_runs(&self, compute: impl FnOnce() -> BaseRuns) -> &BaseRuns {
        memo(MetricKey::SingleRuns, &self.single_runs, compute)
    }

    pub fn double_runs(&self, compute: impl FnOnce() -> PairRuns) -> &PairRuns {
        memo(MetricKey::DoubleRuns, &self.double_runs, compute)
    }

    pub fn extinction_coefficient(&self, compute: impl FnOnce() -> f64) -> f64 {
        *memo(MetricKey::ExtinctionCoefficient, &self.extinction_coefficient, compute)
    }

    pub fn chemical_formula(&self, compute: impl FnOnce() -> ChemicalFormula) -> ChemicalFormula {
        *memo(MetricKey::ChemicalFormula, &self.chemical_formula, compute)
    }

    /// Whether `key` holds a value. Never computes anything.
    pub fn is_computed(&self, key: MetricKey) -> bool {
        match key {
            MetricKey::MolecularWeight => self.molecular_weight.get().is_some(),
            MetricKey::GcContent => self.gc_content.get().is_some(),
            MetricKey::GcClamp => self.gc_clamp.get().is_some(),
            MetricKey::MeltingTemperature(m) => self.melting_temperature[m.index()].get().is_some(),
            MetricKey::SingleRuns => self.single_runs.get().is_some(),
            MetricKey::DoubleRuns => self.double_runs.get().is_some(),
            MetricKey::ExtinctionCoefficient => self.extinction_coefficient.get().is_some(),
            MetricKey::ChemicalFormula => self.chemical_formula.get().is_some(),
        }
    }

    pub fn computed(&self, name: MetricName) -> Computed {
        match name {
            MetricName::Single(key) => Computed::Single(self.is_computed(key)),
            MetricName::MeltingTemperature => Computed::PerMethod(
                MeltingTemperature::iter()
                    .map(|m| (m, self.is_computed(MetricKey::MeltingTemperature(m))))
                    .collect(),
            ),
        }
    }

    /// Drop the stored value for `key`; a no-op when nothing is stored.
    pub fn invalidate(&mut self, key: MetricKey) {
        match key {
            MetricKey::MolecularWeight => self.molecular_weight = OnceLock::new(),
            MetricKey::GcContent => self.gc_content = OnceLock::new(),
            MetricKey::GcClamp => self.gc_clamp = OnceLock::new(),
            MetricKey::MeltingTemperature(m) => self.melting_temperature[m.index()] = OnceLock::new(),
            MetricKey::SingleRuns => self.single_runs = OnceLock::new(),
            MetricKey::DoubleRuns => self.double_runs = OnceLock::new(),
            MetricKey::ExtinctionCoefficient => self.extinction_coefficient = OnceLock::new(),
            MetricKey::ChemicalFormula => self.chemical_formula = OnceLock::new(),
        }
    }

    pub fn reset_all(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod cache_tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn miss_computes_once_then_hits() {
        let cache = MetricsCache::new();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            1234.5
        };
        assert!(!cache.is_computed(MetricKey::MolecularWeight));
        assert_eq!(cache.molecular_weight(compute), 1234.5);
        assert!(cache.is_computed(MetricKey::MolecularWeight));
        assert_eq!(cache.molecular_weight(|| unreachable!("cached value must be reused")), 1234.5);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn zero_is_a_value_not_absence() {
        let cache = MetricsCache::new();
        assert_eq!(cache.gc_content(|| 0.0), 0.0);
        assert!(cache.is_computed(MetricKey::GcContent));
        assert_eq!(cache.gc_content(|| 1.0), 0.0);
        assert_eq!(cache.gc_clamp(|| 0), 0);
        assert!(cache.is_computed(MetricKey::GcClamp));
    }

    #[test]
    fn invalidate_forces_recompute_and_tolerates_empty() {
        let mut cache = MetricsCache::new();
        cache.invalidate(MetricKey::ExtinctionCoefficient);
        assert_eq!(cache.extinction_coefficient(|| 1.0), 1.0);
        cache.invalidate(MetricKey::ExtinctionCoefficient);
        assert!(!cache.is_computed(MetricKey::ExtinctionCoefficient));
        assert_eq!(cache.extinction_coefficient(|| 2.0), 2.0);
    }

    #[test]
    fn melting_temperature_is_keyed_by_method() {
        let cache = MetricsCache::new();
        cache.melting_temperature(MeltingTemperature::Basic, || 51.8);
        let Computed::PerMethod(map) = cache.computed(MetricName::MeltingTemperature) else {
            panic!("expected a per-method report");
        };
        assert_eq!(map.len(), 3);
        assert!(map[&MeltingTemperature::Basic]);
        assert!(!map[&MeltingTemperature::SaltAdjusted]);
        assert!(!map[&MeltingTemperature::NearestNeighbor]);
        assert_eq!(cache.melting_temperature(MeltingTemperature::SaltAdjusted, || 48.0), 48.0);
        assert_eq!(cache.melting_temperature(MeltingTemperature::Basic, || 0.0), 51.8);
    }

    #[test]
    fn reset_all_clears_every_slot() {
        let mut cache = MetricsCache::new();
        cache.molecular_weight(|| 1.0);
        cache.single_runs(BaseRuns::new);
        cache.melting_temperature(MeltingTemperature::Basic, || 1.0);
        cache.reset_all();
        assert!(!cache.is_computed(MetricKey::MolecularWeight));
        assert!(!cache.is_computed(MetricKey::SingleRuns));
        assert!(!cache.is_computed(MetricKey::MeltingTemperature(MeltingTemperature::Basic)));
    }

    #[test]
    fn concurrent_first_access_computes_once() {
        let cache = Arc::new(MetricsCache::new());
        let calls = Arc::new(AtomicUsize::new(0));
        std::thread::scope(|s| {
            for _ in 0..8 {
                let (cache, calls) = (Arc::clone(&cache), Arc::clone(&calls));
                s.spawn(move || {
                    cache.molecular_weight(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        std::thread::sleep(std::time::Duration::from_millis(5));
                        42.0
                    })
                });
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.molecular_weight(|| 0.0), 42.0);
    }

    #[test]
    fn metric_names_parse() {
        assert_eq!("E260".parse::<MetricName>().unwrap(), MetricName::Single(MetricKey::ExtinctionCoefficient));
        assert_eq!("melting_temperature".parse::<MetricName>().unwrap(), MetricName::MeltingTemperature);
        assert!(matches!("colour".parse::<MetricName>(), Err(PrimerError::UnknownMetric(_))));
    }
}
