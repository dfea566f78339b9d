pub mod pdftotext;

use crate::error::QaPdfError;
use crate::index::Document;
use crate::model::TextRun;

/// Text runs decoded from a single page of a PDF, in decoder order.
#[derive(Debug, Clone, Default)]
pub struct RawPage {
    pub page_index: usize,
    /// Page height in points; decoders with a top-left origin flip y with it.
    pub height: f64,
    pub runs: Vec<TextRun>,
}

/// Trait for PDF decoding backends.
pub trait PdfDecoder: Send + Sync {
    /// Decode PDF bytes into positioned text runs, one `RawPage` per page.
    fn decode(&self, pdf_bytes: &[u8]) -> Result<Vec<RawPage>, QaPdfError>;

    /// Full text of the document, used for report identification.
    ///
    /// The default indexes the decoded runs and joins them in reading order;
    /// backends with a cheaper or more faithful plain-text mode override this.
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, QaPdfError> {
        let pages = self.decode(pdf_bytes)?;
        Ok(Document::from_raw_pages("", pages).text())
    }

    /// Name of this decoding backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
