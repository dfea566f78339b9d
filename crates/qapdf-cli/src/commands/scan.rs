use qapdf_core::batch::{self, Progress};
use qapdf_core::config::{BatchOptions, RulesetConfig, ScanOptions};
use qapdf_core::error::QaPdfError;
use qapdf_core::extract::FileOutcome;
use qapdf_core::extraction::pdftotext::PdftotextDecoder;
use std::io::Write;
use std::path::PathBuf;

use crate::output;

pub struct ScanArgs {
    pub dir: PathBuf,
    pub output_file: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub scan: ScanOptions,
    pub batch: BatchOptions,
    pub rules: RulesetConfig,
}

#[derive(Debug, Default, PartialEq)]
struct Summary {
    extracted: usize,
    unclassified: usize,
    failed: usize,
}

impl Summary {
    fn of(outcomes: &[FileOutcome]) -> Self {
        outcomes.iter().fold(Summary::default(), |mut s, outcome| {
            match outcome {
                FileOutcome::Extracted(_) => s.extracted += 1,
                FileOutcome::Unclassified { .. } => s.unclassified += 1,
                FileOutcome::Failed { .. } => s.failed += 1,
            }
            s
        })
    }
}

pub fn run(args: ScanArgs) -> Result<(), QaPdfError> {
    let registry = args.rules.build_registry()?;
    if !PdftotextDecoder::is_available() {
        return Err(QaPdfError::PdftotextNotFound);
    }

    let files = batch::collect_files(&args.dir, &args.scan)?;
    if files.is_empty() {
        eprintln!("No matching files found in {}", args.dir.display());
        return Ok(());
    }

    let decoder = PdftotextDecoder::new();
    let report_progress = |p: Progress<'_>| {
        eprint!(
            "\rProcessing ({} of {}) {:>3.0}%",
            p.completed,
            p.total,
            p.fraction() * 100.0
        );
        let _ = std::io::stderr().flush();
    };
    let outcomes = batch::process_files(
        &files,
        &decoder,
        &registry,
        &args.batch,
        Some(&report_progress),
    );
    eprintln!();
    let outcomes = outcomes?;

    let summary = Summary::of(&outcomes);
    let rows: Vec<_> = outcomes
        .into_iter()
        .filter_map(FileOutcome::into_row)
        .collect();

    let output_file = args
        .output_file
        .unwrap_or_else(output::csv::default_output_name);
    let output_dir = args.output_dir.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir)?;
    let written = output::csv::write_reports(&rows, &output_dir, &output_file)?;

    eprintln!(
        "Processed {} file(s): {} extracted, {} unrecognised, {} failed",
        files.len(),
        summary.extracted,
        summary.unclassified,
        summary.failed
    );
    for w in &written {
        eprintln!(
            "  {}: {} row(s) written to {}",
            w.report_type,
            w.rows,
            w.path.display()
        );
    }

    Ok(())
}
