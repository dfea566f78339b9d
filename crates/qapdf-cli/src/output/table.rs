use qapdf_core::extract::ReportRow;
use qapdf_core::index::Anchor;

/// Render an extracted report as an aligned column/value listing.
pub fn format_row(row: &ReportRow) -> String {
    let mut out = format!(
        "=== {} ===\n  File: {}\n\n",
        row.report_type,
        row.file_path.display()
    );

    let width = row.result.columns().map(str::len).max().unwrap_or(0);
    for field in &row.result.fields {
        let value = if field.value.is_empty() {
            "-"
        } else {
            field.value.as_str()
        };
        out.push_str(&format!(
            "  {:<width$}  {}\n",
            field.column,
            value.replace('\n', " | "),
            width = width
        ));
    }

    let missing = row.result.missing_columns();
    if !missing.is_empty() {
        out.push_str(&format!(
            "\n  {} of {} column(s) not found\n",
            missing.len(),
            row.result.len()
        ));
    }
    out
}

/// One line per anchor: page, bottom-left corner, full bbox and text.
pub fn format_anchors(anchors: &[Anchor]) -> String {
    let mut out = String::new();
    for anchor in anchors {
        out.push_str(&format!(
            "  page {:<3} ({:>7.2}, {:>7.2})  {}  {}\n",
            anchor.page,
            anchor.bbox.x0,
            anchor.bbox.y0,
            anchor.bbox,
            anchor.text.trim_end().replace('\n', " | ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use qapdf_core::extract::ExtractionResult;
    use qapdf_core::model::BBox;
    use std::path::PathBuf;

    #[test]
    fn test_format_row_marks_missing() {
        let columns = vec!["Patient Name".to_string(), "Pass".to_string()];
        let row = ReportRow {
            report_type: "SNCPatient2020".into(),
            file_path: PathBuf::from("qa.pdf"),
            result: ExtractionResult::from_resolved(&columns, vec![Some("Doe".into()), None]),
        };
        let text = format_row(&row);
        assert!(text.contains("=== SNCPatient2020 ==="));
        assert!(text.contains("  Patient Name  Doe\n"));
        assert!(text.contains("  Pass          -\n"));
        assert!(text.contains("1 of 2 column(s) not found"));
    }

    #[test]
    fn test_format_anchors() {
        let anchors = vec![Anchor {
            page: 1,
            bbox: BBox::new(72.0, 600.5, 200.0, 612.0),
            text: "Summary\nResults\n".into(),
        }];
        let text = format_anchors(&anchors);
        assert!(text.contains("page 1"));
        assert!(text.contains("Summary | Results"));
        assert!(text.contains("600.50"));
    }
}
