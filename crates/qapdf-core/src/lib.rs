pub mod batch;
pub mod config;
pub mod error;
pub mod extract;
pub mod extraction;
pub mod geometry;
pub mod index;
pub mod model;
pub mod rules;

use error::QaPdfError;
use extract::{FileOutcome, ReportRegistry, ReportRow};
use extraction::PdfDecoder;
use index::Document;
use std::path::Path;

/// Main API entry point: identify a PDF report and extract its fields.
///
/// Returns `Ok(None)` when no registered report type matches the document.
/// The positioned layout is only decoded once a report type is identified.
pub fn extract_pdf(
    pdf_bytes: &[u8],
    file_path: &Path,
    decoder: &dyn PdfDecoder,
    registry: &ReportRegistry,
) -> Result<Option<ReportRow>, QaPdfError> {
    let text = decoder.extract_text(pdf_bytes)?;

    let Some(extractor) = registry.identify(&text) else {
        return Ok(None);
    };

    let pages = decoder.decode(pdf_bytes)?;
    let document = Document::from_raw_pages(file_path, pages);
    let result = extractor.extract(&document);

    Ok(Some(ReportRow {
        report_type: extractor.report_type().to_string(),
        file_path: file_path.to_path_buf(),
        result,
    }))
}

/// Decode and index a PDF without extracting anything.
pub fn load_document(
    pdf_bytes: &[u8],
    file_path: &Path,
    decoder: &dyn PdfDecoder,
) -> Result<Document, QaPdfError> {
    let pages = decoder.decode(pdf_bytes)?;
    Ok(Document::from_raw_pages(file_path, pages))
}

/// Read and process one file. Never fails; failures become
/// [`FileOutcome::Failed`].
pub fn process_file(
    path: &Path,
    decoder: &dyn PdfDecoder,
    registry: &ReportRegistry,
) -> FileOutcome {
    let result = std::fs::read(path)
        .map_err(QaPdfError::from)
        .and_then(|bytes| extract_pdf(&bytes, path, decoder, registry));

    match result {
        Ok(Some(row)) => {
            tracing::info!(
                file = %path.display(),
                report_type = %row.report_type,
                missing = row.result.missing_columns().len(),
                "extracted"
            );
            FileOutcome::Extracted(row)
        }
        Ok(None) => {
            tracing::warn!(file = %path.display(), "skipping: unrecognised report");
            FileOutcome::Unclassified {
                file_path: path.to_path_buf(),
            }
        }
        Err(error) => {
            tracing::warn!(file = %path.display(), %error, "skipping: failed to read report");
            FileOutcome::Failed {
                file_path: path.to_path_buf(),
                error,
            }
        }
    }
}
