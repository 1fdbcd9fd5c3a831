use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use polars::prelude::*;

use oprimer::report::{self, BatchOutcome};
use oprimer::{Notation, Primer, PrimerConfig, ReadingFrame};

/// oprimer CLI
#[derive(Parser)]
#[command(name = "oprimer")]
#[command(version)]
#[command(about = "Primer metrics: weight, GC, Tm, E260, runs; sequence transforms", long_about = None)]
struct Cli {
    /// Reject primers outside 18-30 nt / 40-60 % GC instead of warning
    #[arg(long, global = true)]
    strict: bool,
    /// Sodium concentration in mM for the salt-adjusted Tm
    #[arg(long, global = true, default_value_t = oprimer::melting::DEFAULT_SALT_MM)]
    salt: f64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Op {
    Reverse,
    Complement,
    ReverseComplement,
    Rna,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every metric of one primer
    Analyze {
        /// Primer sequence (A/T/C/G, case-insensitive)
        sequence: String,
    },

    /// Analyze all primers in FASTA/FASTQ/CSV/TSV files
    Batch {
        /// Input files (FASTA/FASTQ/.gz, or CSV/TSV with a `sequence` column)
        #[arg(required = true)]
        files: Vec<String>,
        /// Threads (0/None = all)
        #[arg(long)]
        threads: Option<usize>,
        /// Emit CSV to stdout
        #[arg(long)]
        csv: bool,
    },

    /// Translate a primer with the standard genetic code
    Translate {
        sequence: String,
        /// Reading frame (1, 2 or 3)
        #[arg(long, default_value_t = 1)]
        frame: usize,
        /// Three-letter residue names joined with '-'
        #[arg(long)]
        three_letter: bool,
    },

    /// Reverse, complement or transcribe a primer
    Transform {
        sequence: String,
        #[arg(long, value_enum)]
        op: Op,
    },

    /// Count occurrences of a subsequence
    Repeats {
        sequence: String,
        subsequence: String,
        /// Longest back-to-back run instead of total occurrences
        #[arg(long)]
        consecutive: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let base = if cli.strict { PrimerConfig::strict() } else { PrimerConfig::default() };
    let config = base.with_salt(cli.salt);

    match cli.command {
        Commands::Analyze { sequence } => cmd_analyze(&sequence, config)?,

        Commands::Batch { files, threads, csv } => cmd_batch(files, threads, csv, config)?,

        Commands::Translate { sequence, frame, three_letter } => {
            let p = load(&sequence, config)?;
            let frame = ReadingFrame::try_from(frame)?;
            let notation = if three_letter { Notation::ThreeLetter } else { Notation::OneLetter };
            println!("{}", p.to_protein(frame, notation));
        }

        Commands::Transform { sequence, op } => {
            let p = load(&sequence, config)?;
            let out = match op {
                Op::Reverse => p.reverse().to_string(),
                Op::Complement => p.complement().to_string(),
                Op::ReverseComplement => p.reverse_complement().to_string(),
                Op::Rna => p.to_rna(),
            };
            println!("{out}");
        }

        Commands::Repeats { sequence, subsequence, consecutive } => {
            let p = load(&sequence, config)?;
            println!("{}", p.repeats(&subsequence, consecutive));
        }
    }

    Ok(())
}

/// Build a primer and report its advisories on stderr.
fn load(sequence: &str, config: PrimerConfig) -> Result<Primer> {
    let p = Primer::with_config(sequence, config)?;
    for a in p.advisories() {
        eprintln!("warning: {a}");
    }
    Ok(p)
}

fn cmd_analyze(sequence: &str, config: PrimerConfig) -> Result<()> {
    let p = load(sequence, config)?;
    println!("profile: {}", oprimer::severity_to_str(config.profile.severity));
    for (k, v) in oprimer::metric_rows(&p) {
        println!("{k}: {v}");
    }
    Ok(())
}

fn cmd_batch(files: Vec<String>, threads: Option<usize>, csv: bool, config: PrimerConfig) -> Result<()> {
    let mut records = Vec::new();
    for file in files {
        records.extend(oprimer::seqio::read_primers(&file)?);
    }
    if records.is_empty() {
        bail!("no primers found in input");
    }

    let mut rows = Vec::new();
    for outcome in report::analyze_batch(&records, config, threads)? {
        match outcome {
            BatchOutcome::Analyzed(r) => rows.push(r),
            BatchOutcome::Rejected { name, error } => eprintln!("skipping {name}: {error}"),
        }
    }

    let mut df = report::reports_dataframe(&rows)?;
    if csv {
        let w = CsvWriter::new(std::io::stdout());
        w.include_header(true).finish(&mut df)?;
    } else {
        // Show all columns and rows without truncation.
        std::env::set_var("POLARS_FMT_TABLE_FORMATTING", "UTF8_FULL");
        std::env::set_var("POLARS_FMT_MAX_COLS", "100000");
        std::env::set_var("POLARS_FMT_MAX_ROWS", "1000000");
        std::env::set_var("POLARS_FMT_STR_LEN", "100000");
        std::env::set_var("POLARS_TABLE_WIDTH", "65535");
        println!("{}", df);
    }
    Ok(())
}
