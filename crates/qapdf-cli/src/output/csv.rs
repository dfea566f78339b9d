use qapdf_core::extract::ReportRow;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const DELIMITER: char = ',';
pub const FILE_PATH_COLUMN: &str = "File Path";

/// `results_<local timestamp>.csv`, safe for file names.
pub fn default_output_name() -> String {
    let stamp = chrono::Local::now().format("%Y-%m-%d %H-%M-%S-%6f");
    format!("results_{stamp}.csv")
}

/// Join values into one CSV line (no newline).
///
/// A value containing the delimiter, a quote or a line break is wrapped in
/// double quotes with inner quotes doubled.
pub fn csv_row<'a>(values: impl IntoIterator<Item = &'a str>, delimiter: char) -> String {
    values
        .into_iter()
        .map(|v| {
            if v.contains(delimiter) || v.contains(['"', '\n', '\r']) {
                format!("\"{}\"", v.replace('"', "\"\""))
            } else {
                v.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(&delimiter.to_string())
}

/// One CSV file written by [`write_reports`].
#[derive(Debug, PartialEq)]
pub struct WrittenFile {
    pub report_type: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// Append rows to one CSV per report type, `<report_type>_<output_file>` in
/// `output_dir`. Rows are sorted by file path. The header is only written
/// when the file is created.
pub fn write_reports(
    rows: &[ReportRow],
    output_dir: &Path,
    output_file: &str,
) -> io::Result<Vec<WrittenFile>> {
    let mut by_type: BTreeMap<&str, Vec<&ReportRow>> = BTreeMap::new();
    for row in rows {
        by_type.entry(&row.report_type).or_default().push(row);
    }

    let mut written = Vec::new();
    for (report_type, mut group) in by_type {
        group.sort_by(|a, b| a.file_path.cmp(&b.file_path));

        let path = output_dir.join(format!("{report_type}_{output_file}"));
        let is_new = !path.exists();
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

        if is_new {
            let header = group[0]
                .result
                .columns()
                .chain(std::iter::once(FILE_PATH_COLUMN));
            writeln!(file, "{}", csv_row(header, DELIMITER))?;
        }
        for row in &group {
            let file_path = row.file_path.display().to_string();
            let values = row.result.values().chain(std::iter::once(file_path.as_str()));
            writeln!(file, "{}", csv_row(values, DELIMITER))?;
        }

        tracing::info!(report_type, rows = group.len(), file = %path.display(), "wrote CSV");
        written.push(WrittenFile {
            report_type: report_type.to_string(),
            path,
            rows: group.len(),
        });
    }

    Ok(written)
}
