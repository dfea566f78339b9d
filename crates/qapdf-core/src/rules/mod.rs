pub mod builtin;
pub mod ruleset;
pub mod schema;

use crate::error::QaPdfError;
use ruleset::Ruleset;
use schema::{FieldDef, RulesetDef};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Load a ruleset from a JSON file.
pub fn load_ruleset(path: &Path) -> Result<Ruleset, QaPdfError> {
    let content = std::fs::read_to_string(path).map_err(|e| QaPdfError::RulesetLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_ruleset(&content, path)
}

/// Load every `*.json` ruleset in `dir`, ordered by file name.
pub fn load_ruleset_dir(dir: &Path) -> Result<Vec<Ruleset>, QaPdfError> {
    let entries = std::fs::read_dir(dir).map_err(|e| QaPdfError::RulesetLoad {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| QaPdfError::RulesetLoad {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })?
            .path();
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if path.is_file() && is_json {
            paths.push(path);
        }
    }
    paths.sort();

    paths.iter().map(|p| load_ruleset(p)).collect()
}

/// Parse a ruleset from a JSON string.
pub fn parse_ruleset(json: &str, source: &Path) -> Result<Ruleset, QaPdfError> {
    let def: RulesetDef = serde_json::from_str(json).map_err(|e| QaPdfError::RulesetLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_ruleset(&def)?;
    Ok(Ruleset::from_def(&def))
}

/// Parse a ruleset from a JSON string (no file path context).
pub fn parse_ruleset_str(json: &str) -> Result<Ruleset, QaPdfError> {
    let def: RulesetDef = serde_json::from_str(json)
        .map_err(|e| QaPdfError::RulesetInvalid(format!("malformed ruleset JSON: {e}")))?;
    validate_ruleset(&def)?;
    Ok(Ruleset::from_def(&def))
}

/// Validate that a ruleset is well-formed.
pub fn validate_ruleset(def: &RulesetDef) -> Result<(), QaPdfError> {
    if def.report_type.trim().is_empty() {
        return Err(QaPdfError::RulesetInvalid(
            "report_type must not be empty".into(),
        ));
    }

    if def.identifiers.is_empty() {
        return Err(QaPdfError::RulesetInvalid(format!(
            "'{}': identifiers must not be empty",
            def.report_type
        )));
    }

    if def.identifiers.iter().any(|i| i.is_empty()) {
        return Err(QaPdfError::RulesetInvalid(format!(
            "'{}': identifiers must not contain empty strings",
            def.report_type
        )));
    }

    if def.data.is_empty() {
        return Err(QaPdfError::RulesetInvalid(format!(
            "'{}': data must not be empty",
            def.report_type
        )));
    }

    let mut columns = HashSet::new();
    for field in &def.data {
        validate_field(&def.report_type, field)?;
        if !columns.insert(field.column.as_str()) {
            return Err(QaPdfError::RulesetInvalid(format!(
                "'{}': duplicate column '{}' in data",
                def.report_type, field.column
            )));
        }
    }

    for alt in &def.alternates {
        validate_field(&def.report_type, alt)?;
        if !columns.contains(alt.column.as_str()) {
            return Err(QaPdfError::RulesetInvalid(format!(
                "'{}': alternate references unknown column '{}'",
                def.report_type, alt.column
            )));
        }
    }

    Ok(())
}

fn validate_field(report_type: &str, field: &FieldDef) -> Result<(), QaPdfError> {
    if field.column.trim().is_empty() {
        return Err(QaPdfError::RulesetInvalid(format!(
            "'{}': column name must not be empty",
            report_type
        )));
    }

    if !field.pos.iter().all(|v| v.is_finite()) {
        return Err(QaPdfError::RulesetInvalid(format!(
            "'{}': column '{}' has a non-finite position",
            report_type, field.column
        )));
    }

    if !field.tolerance.is_valid() {
        return Err(QaPdfError::RulesetInvalid(format!(
            "'{}': column '{}' has a negative or non-finite tolerance",
            report_type, field.column
        )));
    }

    Ok(())
}
