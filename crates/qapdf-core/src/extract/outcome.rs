use crate::error::QaPdfError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One resolved column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub column: String,
    /// Extracted text, or an empty string when nothing was found.
    pub value: String,
}

/// Values for every column of a ruleset, in column order.
///
/// Always has exactly the ruleset's columns; a field absent from a given
/// report layout is an empty string, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub fields: Vec<FieldValue>,
}

impl ExtractionResult {
    /// Pair `columns` with resolved values; `None` becomes "".
    pub fn from_resolved(columns: &[String], values: Vec<Option<String>>) -> Self {
        let fields = columns
            .iter()
            .zip(values.into_iter().chain(std::iter::repeat(None)))
            .map(|(column, value)| FieldValue {
                column: column.clone(),
                value: value.unwrap_or_default(),
            })
            .collect();
        ExtractionResult { fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.column == column)
            .map(|f| f.value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.column.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.value.as_str())
    }

    /// Columns that resolved to neither a primary nor an alternate value.
    pub fn missing_columns(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.value.is_empty())
            .map(|f| f.column.as_str())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.fields.iter().all(|f| !f.value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An extracted record together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub report_type: String,
    pub file_path: PathBuf,
    pub result: ExtractionResult,
}

/// Result of processing a single file.
#[derive(Debug)]
pub enum FileOutcome {
    Extracted(ReportRow),
    /// No ruleset's identifiers matched the document.
    Unclassified { file_path: PathBuf },
    Failed { file_path: PathBuf, error: QaPdfError },
}

impl FileOutcome {
    pub fn file_path(&self) -> &Path {
        match self {
            FileOutcome::Extracted(row) => &row.file_path,
            FileOutcome::Unclassified { file_path } => file_path,
            FileOutcome::Failed { file_path, .. } => file_path,
        }
    }

    pub fn row(&self) -> Option<&ReportRow> {
        match self {
            FileOutcome::Extracted(row) => Some(row),
            _ => None,
        }
    }

    pub fn into_row(self) -> Option<ReportRow> {
        match self {
            FileOutcome::Extracted(row) => Some(row),
            _ => None,
        }
    }
}
