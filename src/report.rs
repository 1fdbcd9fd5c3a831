//! Batch analysis: one metrics row per primer, computed in parallel.
//!
//! Rows are computed on a local Rayon pool (`threads = None` uses all logical
//! cores) and can be rendered as a Polars [`DataFrame`] for pretty-printing or
//! CSV export.
//!
//! Invalid primers do not abort the batch; they come back as
//! [`BatchOutcome::Rejected`] with the validation error.
use anyhow::Result;
use log::debug;
use polars::prelude::*;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::error::PrimerError;
use crate::melting::MeltingTemperature;
use crate::primer::{Primer, PrimerConfig};
use crate::seqio::NamedSequence;

/// Every metric of one primer, flattened for tabular output.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimerReport {
    pub name: String,
    pub sequence: String,
    pub length: usize,
    pub molecular_weight: f64,
    pub gc_content: f64,
    pub gc_clamp: usize,
    pub tm_basic: f64,
    pub tm_salt_adjusted: f64,
    pub extinction_coefficient: f64,
    pub chemical_formula: String,
    pub longest_homopolymer: usize,
    pub longest_dinucleotide_repeat: usize,
    pub advisories: Vec<String>,
}

impl PrimerReport {
    pub fn from_primer(name: impl Into<String>, p: &Primer) -> Result<Self, PrimerError> {
        Ok(Self {
            name: name.into(),
            sequence: p.sequence().to_string(),
            length: p.len(),
            molecular_weight: p.molecular_weight(),
            gc_content: p.gc_content(),
            gc_clamp: p.gc_clamp(),
            tm_basic: p.melting_temperature(MeltingTemperature::Basic)?,
            tm_salt_adjusted: p.melting_temperature(MeltingTemperature::SaltAdjusted)?,
            extinction_coefficient: p.extinction_coefficient(),
            chemical_formula: p.chemical_formula().to_string(),
            longest_homopolymer: p.single_runs().values().copied().max().unwrap_or(0),
            longest_dinucleotide_repeat: p.double_runs().values().copied().max().unwrap_or(0),
            advisories: p.advisories().iter().map(|a| a.to_string()).collect(),
        })
    }
}

/// Result for one input record.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchOutcome {
    Analyzed(PrimerReport),
    Rejected { name: String, error: PrimerError },
}

fn analyze_one(rec: &NamedSequence, config: PrimerConfig) -> BatchOutcome {
    match Primer::with_config(&rec.sequence, config).and_then(|p| PrimerReport::from_primer(rec.name.clone(), &p)) {
        Ok(r) => BatchOutcome::Analyzed(r),
        Err(error) => BatchOutcome::Rejected { name: rec.name.clone(), error },
    }
}

/// Analyze `records` in input order using a pool of `threads` workers.
pub fn analyze_batch(records: &[NamedSequence], config: PrimerConfig, threads: Option<usize>) -> Result<Vec<BatchOutcome>> {
    let n = threads.filter(|t| *t > 0).unwrap_or_else(num_cpus::get).max(1);
    let pool = ThreadPoolBuilder::new().num_threads(n).build()?;
    debug!("analyzing {} primers on {n} threads", records.len());
    Ok(pool.install(|| records.par_iter().map(|r| analyze_one(r, config)).collect()))
}

/// Tabulate analyzed rows (rejected rows are skipped).
pub fn reports_dataframe(rows: &[PrimerReport]) -> PolarsResult<DataFrame> {
    df!(
        "name"          => rows.iter().map(|r| r.name.clone()).collect::<Vec<_>>(),
        "sequence"      => rows.iter().map(|r| r.sequence.clone()).collect::<Vec<_>>(),
        "length"        => rows.iter().map(|r| r.length as u64).collect::<Vec<_>>(),
        "mw"            => rows.iter().map(|r| r.molecular_weight).collect::<Vec<_>>(),
        "gc"            => rows.iter().map(|r| r.gc_content).collect::<Vec<_>>(),
        "gc_clamp"      => rows.iter().map(|r| r.gc_clamp as u64).collect::<Vec<_>>(),
        "tm_basic"      => rows.iter().map(|r| r.tm_basic).collect::<Vec<_>>(),
        "tm_salt"       => rows.iter().map(|r| r.tm_salt_adjusted).collect::<Vec<_>>(),
        "e260"          => rows.iter().map(|r| r.extinction_coefficient).collect::<Vec<_>>(),
        "formula"       => rows.iter().map(|r| r.chemical_formula.clone()).collect::<Vec<_>>(),
        "max_run"       => rows.iter().map(|r| r.longest_homopolymer as u64).collect::<Vec<_>>(),
        "max_dinuc_run" => rows.iter().map(|r| r.longest_dinucleotide_repeat as u64).collect::<Vec<_>>(),
        "advisories"    => rows.iter().map(|r| r.advisories.join("; ")).collect::<Vec<_>>(),
    )
}
