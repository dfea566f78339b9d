use crate::extract::outcome::ExtractionResult;
use crate::index::{Document, TextCleaner};
use crate::rules::ruleset::Ruleset;

/// Resolve every column of `ruleset` against `document`.
///
/// Primary fields are resolved first. Alternates are then tried in
/// declaration order, only for columns still missing; the first alternate to
/// produce a value wins. Alternates never re-match text their primary field
/// ignores.
pub fn extract(
    document: &Document,
    ruleset: &Ruleset,
    cleaner: Option<&TextCleaner>,
) -> ExtractionResult {
    let primary = resolve_primary(document, ruleset, cleaner);
    let resolved = apply_alternates(document, ruleset, cleaner, primary);
    let result = ExtractionResult::from_resolved(&ruleset.columns, resolved);

    let missing = result.missing_columns();
    if !missing.is_empty() {
        tracing::debug!(
            report_type = %ruleset.report_type,
            file = %document.file_path().display(),
            ?missing,
            "columns left empty"
        );
    }

    result
}

fn resolve_primary(
    document: &Document,
    ruleset: &Ruleset,
    cleaner: Option<&TextCleaner>,
) -> Vec<Option<String>> {
    ruleset
        .fields
        .iter()
        .map(|field| first_value(&field.column, field.query(document, cleaner, None)))
        .collect()
}

fn apply_alternates(
    document: &Document,
    ruleset: &Ruleset,
    cleaner: Option<&TextCleaner>,
    primary: Vec<Option<String>>,
) -> Vec<Option<String>> {
    ruleset
        .alternates
        .iter()
        .fold(primary, |mut resolved, alt| {
            let Some(i) = ruleset.column_index(&alt.column) else {
                return resolved;
            };
            if resolved[i].is_none() {
                let primary_ignored = &ruleset.fields[i].ignored;
                resolved[i] = first_value(
                    &alt.column,
                    alt.query(document, cleaner, Some(primary_ignored)),
                );
                if resolved[i].is_some() {
                    tracing::trace!(column = %alt.column, "resolved by alternate");
                }
            }
            resolved
        })
}

/// The first hit, unless it is empty or just the column's own label.
fn first_value(column: &str, hits: Vec<String>) -> Option<String> {
    hits.into_iter()
        .next()
        .filter(|value| !value.is_empty() && value != column)
}
