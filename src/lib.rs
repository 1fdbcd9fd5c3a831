#![forbid(unsafe_code)]
//! # oprimer
//!
//! A strongly-typed **primer** (short DNA oligonucleotide) value with lazily
//! computed, cached molecular metrics and the usual sequence operations.
//!
//! ## Highlights
//! - **Validated on construction**: sequences are canonical uppercase `ATCG`;
//!   length / GC quality checks are warnings or errors depending on the
//!   [`ValidationProfile`].
//! - **Cached metrics**: molecular weight, GC content, GC clamp, melting
//!   temperature (per method), base runs, ε260 and chemical formula are
//!   computed on first access and then reused. In-place mutations reset the
//!   cache.
//! - **No setters**: a [`Primer`] can only change through its own operations.
//!
//! ## Examples
//! ```rust
//! use oprimer::{Primer, MeltingTemperature, MetricKey};
//! let mut p = Primer::new("ATCGATCGATCGATCGAT").unwrap();
//! assert!((p.molecular_weight() - 5498.65).abs() < 1e-6);
//! assert!(p.is_computed(MetricKey::MolecularWeight));
//!
//! p.reverse_in_place();
//! assert_eq!(p.sequence(), "TAGCTAGCTAGCTAGCTA");
//! assert!(!p.is_computed(MetricKey::MolecularWeight));
//!
//! assert!(p.melting_temperature(MeltingTemperature::NearestNeighbor).is_err());
//! assert_eq!((&p + &p).unwrap().len(), 36);
//! ```
//!
//! ## Batch use
//! [`seqio`] reads FASTA/FASTQ/CSV/TSV files of primers and [`report`]
//! analyzes them in parallel; the `oprimer` binary wraps both.

pub mod error;
pub mod sequence;
pub mod calc;
pub mod melting;
pub mod cache;
pub mod translate;
pub mod primer;
pub mod seqio;
pub mod report;
pub mod data { pub mod constants; pub mod codons; }

pub use cache::{Computed, MetricKey, MetricName, MetricsCache};
pub use calc::{BaseRuns, ChemicalFormula, PairRuns};
pub use error::{PrimerError, Result};
pub use melting::MeltingTemperature;
pub use primer::{Primer, PrimerConfig};
pub use sequence::{Advisory, Base, Dinucleotide, Sequence, Severity, ValidationProfile};
pub use translate::{Notation, ReadingFrame};

/// Crate version string (from `CARGO_PKG_VERSION`).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Stable name of a [`Severity`]: `advisory` or `fatal`.
pub fn severity_to_str(s: Severity) -> &'static str {
    match s {
        Severity::Advisory => "advisory",
        Severity::Fatal => "fatal",
    }
}

/// Return `(metric, value)` rows describing every metric of `p`, in a stable order.
///
/// Values are formatted for display; this also fills the primer's cache.
/// Unsupported Tm methods are listed with the error text as their value.
///
/// # Examples
/// ```
/// let p = oprimer::Primer::new("ATCG").unwrap();
/// let rows = oprimer::metric_rows(&p);
/// assert!(rows.iter().any(|(k, v)| k == "gc_content" && v == "0.5000"));
/// ```
pub fn metric_rows(p: &Primer) -> Vec<(String, String)> {
    use strum::IntoEnumIterator;

    let mut rows = vec![
        ("sequence".to_string(), p.sequence().to_string()),
        ("length".to_string(), p.len().to_string()),
        ("salt_mm".to_string(), format!("{}", p.salt())),
        ("molecular_weight".to_string(), format!("{:.2}", p.molecular_weight())),
        ("gc_content".to_string(), format!("{:.4}", p.gc_content())),
        ("gc_clamp".to_string(), p.gc_clamp().to_string()),
    ];
    for m in MeltingTemperature::iter() {
        let v = match p.melting_temperature(m) {
            Ok(t) => format!("{t:.2}"),
            Err(e) => e.to_string(),
        };
        rows.push((format!("tm_{m}"), v));
    }
    rows.push(("E260".to_string(), format!("{:.0}", p.extinction_coefficient())));
    rows.push(("chemical_formula".to_string(), p.chemical_formula().to_string()));
    let singles: Vec<String> = p.single_runs().iter().map(|(b, n)| format!("{b}:{n}")).collect();
    rows.push(("single_runs".to_string(), singles.join(" ")));
    let doubles: Vec<String> = p.double_runs().iter().map(|(d, n)| format!("{d}:{n}")).collect();
    rows.push(("double_runs".to_string(), doubles.join(" ")));
    rows
}

#[cfg(test)]
mod cli_support_tests {
    use super::*;

    #[test]
    fn metric_rows_cover_every_metric() {
        let p = Primer::new("ATCGATCGATCGATCGATCG").unwrap();
        let rows = metric_rows(&p);
        let names: Vec<_> = rows.iter().map(|r| r.0.as_str()).collect();
        for want in ["molecular_weight", "gc_clamp", "tm_basic", "tm_salt_adjusted", "tm_nearest_neighbor", "E260", "double_runs"] {
            assert!(names.contains(&want), "missing {want}");
        }
        let tm = rows.iter().find(|(k, _)| k == "tm_basic").unwrap();
        assert_eq!(tm.1, "51.78");
        let nn = rows.iter().find(|(k, _)| k == "tm_nearest_neighbor").unwrap();
        assert!(nn.1.contains("not been implemented"));
    }

    #[test]
    fn metric_rows_fill_the_cache() {
        let p = Primer::new("ATCGATCGATCGATCGATCG").unwrap();
        metric_rows(&p);
        assert!(p.is_computed(MetricKey::ChemicalFormula));
        assert!(p.is_computed(MetricKey::MeltingTemperature(MeltingTemperature::SaltAdjusted)));
    }

    #[test]
    fn severity_names() {
        assert_eq!(severity_to_str(ValidationProfile::strict().severity), "fatal");
        assert_eq!(severity_to_str(Severity::default()), "advisory");
    }
}
