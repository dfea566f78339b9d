use qapdf_core::config::RulesetConfig;
use qapdf_core::error::QaPdfError;
use qapdf_core::extraction::pdftotext::PdftotextDecoder;
use std::path::Path;

use crate::output;

pub fn run(pdf_file: &Path, rules: RulesetConfig, output_format: &str) -> Result<(), QaPdfError> {
    let registry = rules.build_registry()?;
    let pdf_bytes = std::fs::read(pdf_file)?;
    let decoder = PdftotextDecoder::new();

    let Some(row) = qapdf_core::extract_pdf(&pdf_bytes, pdf_file, &decoder, &registry)? else {
        eprintln!(
            "{}: not a recognised report (known types: {})",
            pdf_file.display(),
            registry.report_types().join(", ")
        );
        return Ok(());
    };

    match output_format {
        "json" => output::json::print(&row)?,
        _ => print!("{}", output::table::format_row(&row)),
    }

    Ok(())
}
