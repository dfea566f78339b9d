use qapdf_core::error::QaPdfError;
use qapdf_core::extraction::pdftotext::PdftotextDecoder;
use qapdf_core::extraction::PdfDecoder;
use std::path::Path;

use crate::output;

/// Print every indexed block, or only those containing `find`. Useful for
/// reading off `pos` values when writing a ruleset.
pub fn run(pdf_file: &Path, find: Option<&str>) -> Result<(), QaPdfError> {
    let pdf_bytes = std::fs::read(pdf_file)?;
    let decoder = PdftotextDecoder::new();
    let document = qapdf_core::load_document(&pdf_bytes, pdf_file, &decoder)?;

    match find {
        Some(needle) => {
            let anchors = document.find_anchors(needle);
            if anchors.is_empty() {
                eprintln!("'{}' not found in {}", needle, pdf_file.display());
            } else {
                print!("{}", output::table::format_anchors(&anchors));
            }
        }
        None => {
            println!(
                "{} ({} page(s), backend: {})\n",
                pdf_file.display(),
                document.page_count(),
                decoder.backend_name()
            );
            println!("{document}");
        }
    }

    Ok(())
}
