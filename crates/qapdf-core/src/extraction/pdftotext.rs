use crate::error::QaPdfError;
use crate::extraction::{PdfDecoder, RawPage};
use crate::model::{BBox, TextRun};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// PDF decoding backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -bbox-layout`, which groups words into lines and lines
/// into blocks. Each block becomes one [`TextRun`], its lines joined with
/// newlines, so a run corresponds to one text box of the rendered report.
pub struct PdftotextDecoder;

impl PdftotextDecoder {
    pub fn new() -> Self {
        PdftotextDecoder
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDecoder for PdftotextDecoder {
    fn decode(&self, pdf_bytes: &[u8]) -> Result<Vec<RawPage>, QaPdfError> {
        let tmpfile = write_temp_pdf(pdf_bytes)?;
        let stdout = run_pdftotext(&["-bbox-layout"], tmpfile.path())?;
        let xml = String::from_utf8_lossy(&stdout);
        let pages = parse_bbox_layout(&xml)?;
        tracing::debug!(
            pages = pages.len(),
            runs = pages.iter().map(|p| p.runs.len()).sum::<usize>(),
            "decoded PDF with pdftotext"
        );
        Ok(pages)
    }

    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, QaPdfError> {
        let tmpfile = write_temp_pdf(pdf_bytes)?;
        let stdout = run_pdftotext(&["-raw"], tmpfile.path())?;
        Ok(String::from_utf8_lossy(&stdout).to_string())
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

fn write_temp_pdf(pdf_bytes: &[u8]) -> Result<tempfile::NamedTempFile, QaPdfError> {
    let mut tmpfile =
        tempfile::NamedTempFile::new().map_err(|e| QaPdfError::Decode(e.to_string()))?;
    tmpfile
        .write_all(pdf_bytes)
        .map_err(|e| QaPdfError::Decode(e.to_string()))?;
    Ok(tmpfile)
}

fn run_pdftotext(args: &[&str], pdf_path: &Path) -> Result<Vec<u8>, QaPdfError> {
    let output = Command::new("pdftotext")
        .args(args)
        .arg(pdf_path)
        .arg("-") // output to stdout
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                QaPdfError::PdftotextNotFound
            } else {
                QaPdfError::Decode(format!("pdftotext failed: {}", e))
            }
        })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(QaPdfError::PdftotextFailed { code, stderr });
    }

    Ok(output.stdout)
}

/// Block under construction while walking the XML.
struct OpenBlock {
    bbox: BBox,
    lines: Vec<String>,
}

/// Parse `pdftotext -bbox-layout` XHTML into pages of block-level runs.
///
/// pdftotext reports coordinates with the origin at the top-left corner;
/// they are flipped here so y increases upward like PDF user space.
fn parse_bbox_layout(xml: &str) -> Result<Vec<RawPage>, QaPdfError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<RawPage> = Vec::new();
    let mut block: Option<OpenBlock> = None;
    let mut line_words: Vec<String> = Vec::new();
    let mut in_word = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| QaPdfError::Decode(format!("malformed pdftotext XML: {e}")))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let empty = matches!(event, Event::Empty(_));
                match e.name().as_ref() {
                    b"page" => {
                        pages.push(RawPage {
                            page_index: pages.len(),
                            height: attr_f64(e, "height")?.unwrap_or_default(),
                            runs: Vec::new(),
                        });
                    }
                    b"block" if !empty => {
                        let height = pages.last().map(|p| p.height).unwrap_or_default();
                        block = Some(OpenBlock {
                            bbox: flipped_bbox(e, height)?,
                            lines: Vec::new(),
                        });
                    }
                    b"line" => line_words.clear(),
                    b"word" => in_word = !empty,
                    _ => {}
                }
            }
            Event::Text(t) if in_word => {
                let word = t
                    .unescape()
                    .map_err(|e| QaPdfError::Decode(format!("malformed pdftotext XML: {e}")))?;
                let word = word.trim();
                if !word.is_empty() {
                    line_words.push(word.to_string());
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"word" => in_word = false,
                b"line" => {
                    if let Some(open) = block.as_mut() {
                        if !line_words.is_empty() {
                            open.lines.push(line_words.join(" "));
                        }
                    }
                    line_words.clear();
                }
                b"block" => {
                    if let (Some(open), Some(page)) = (block.take(), pages.last_mut()) {
                        if !open.lines.is_empty() {
                            let text: String =
                                open.lines.iter().map(|l| format!("{l}\n")).collect();
                            page.runs.push(TextRun::new(page.page_index, open.bbox, text));
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(pages)
}

fn flipped_bbox(tag: &BytesStart<'_>, page_height: f64) -> Result<BBox, QaPdfError> {
    let get = |name: &str| -> Result<f64, QaPdfError> {
        attr_f64(tag, name)?
            .ok_or_else(|| QaPdfError::Decode(format!("block without '{name}' attribute")))
    };
    let (x_min, y_min, x_max, y_max) = (get("xMin")?, get("yMin")?, get("xMax")?, get("yMax")?);
    Ok(BBox::new(x_min, page_height - y_max, x_max, page_height - y_min))
}

fn attr_f64(tag: &BytesStart<'_>, name: &str) -> Result<Option<f64>, QaPdfError> {
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| QaPdfError::Decode(format!("bad XML attribute: {e}")))?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| QaPdfError::Decode(format!("bad XML attribute: {e}")))?;
            return value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| QaPdfError::Decode(format!("non-numeric '{name}': {value}")));
        }
    }
    Ok(None)
}
