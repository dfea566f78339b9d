use crate::geometry::{Alignment, Tolerance};
use serde::{Deserialize, Serialize};

/// A ruleset as written in JSON, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesetDef {
    /// Report type label; also prefixes the CSV output file name.
    pub report_type: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Substrings that must all appear in a document's text for this ruleset
    /// to apply.
    pub identifiers: Vec<String>,
    /// One field per output column, in column order.
    pub data: Vec<FieldDef>,
    /// Fallback fields tried in order for columns the primary field left
    /// empty. A column may appear more than once.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<FieldDef>,
}

/// A single positional field within a ruleset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub column: String,
    /// 0-based page index.
    pub page: usize,
    /// Query position `[x, y]` in PDF page space.
    pub pos: [f64; 2],
    #[serde(default, alias = "tol")]
    pub tolerance: Tolerance,
    #[serde(default, alias = "mode")]
    pub alignment_mode: Alignment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
}
