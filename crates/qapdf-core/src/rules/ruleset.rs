use crate::geometry::{Alignment, Tolerance};
use crate::index::{BlockQuery, Document, TextCleaner};
use crate::model::Point;
use crate::rules::schema::{FieldDef, RulesetDef};
use std::collections::BTreeSet;

/// How one output column is located on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub column: String,
    pub page: usize,
    pub pos: Point,
    pub tolerance: Tolerance,
    pub alignment: Alignment,
    pub numeric: Option<bool>,
    /// Always contains `column`, so a field never resolves to its own label.
    pub ignored: BTreeSet<String>,
}

impl FieldSpec {
    pub fn new(column: impl Into<String>, page: usize, pos: impl Into<Point>) -> Self {
        let column = column.into();
        let ignored = BTreeSet::from([column.clone()]);
        FieldSpec {
            column,
            page,
            pos: pos.into(),
            tolerance: Tolerance::default(),
            alignment: Alignment::default(),
            numeric: None,
            ignored,
        }
    }

    pub fn with_tolerance(mut self, tolerance: impl Into<Tolerance>) -> Self {
        self.tolerance = tolerance.into();
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_numeric(mut self, numeric: bool) -> Self {
        self.numeric = Some(numeric);
        self
    }

    pub fn with_ignored<I, S>(mut self, ignored: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored.extend(ignored.into_iter().map(Into::into));
        self
    }

    /// Run this field's query against `document`.
    ///
    /// `extra_ignored` is merged into the field's own ignore set; alternates
    /// pass their primary field's set here.
    pub fn query(
        &self,
        document: &Document,
        cleaner: Option<&TextCleaner>,
        extra_ignored: Option<&BTreeSet<String>>,
    ) -> Vec<String> {
        let merged;
        let ignored = match extra_ignored {
            Some(extra) => {
                merged = self.ignored.union(extra).cloned().collect::<BTreeSet<_>>();
                &merged
            }
            None => &self.ignored,
        };

        let query = BlockQuery::new(self.pos)
            .tolerance(self.tolerance)
            .alignment(self.alignment)
            .cleaner(cleaner)
            .numeric(self.numeric)
            .ignored(ignored);

        document.query(self.page, &query)
    }
}

impl From<&FieldDef> for FieldSpec {
    fn from(def: &FieldDef) -> Self {
        let mut spec = FieldSpec::new(def.column.clone(), def.page, def.pos)
            .with_tolerance(def.tolerance)
            .with_alignment(def.alignment_mode)
            .with_ignored(def.ignored.iter().cloned());
        spec.numeric = def.numeric;
        spec
    }
}

/// A validated ruleset: the extraction recipe for one report type.
#[derive(Debug, Clone, PartialEq)]
pub struct Ruleset {
    pub report_type: String,
    pub description: Option<String>,
    pub identifiers: Vec<String>,
    /// Output columns, in order. `fields[i]` resolves `columns[i]`.
    pub columns: Vec<String>,
    pub fields: Vec<FieldSpec>,
    pub alternates: Vec<FieldSpec>,
}

impl Ruleset {
    /// Build from already-validated parts. Use [`crate::rules::parse_ruleset_str`]
    /// or [`crate::rules::load_ruleset`] for JSON input.
    pub(crate) fn from_def(def: &RulesetDef) -> Self {
        Ruleset {
            report_type: def.report_type.clone(),
            description: def.description.clone(),
            identifiers: def.identifiers.clone(),
            columns: def.data.iter().map(|f| f.column.clone()).collect(),
            fields: def.data.iter().map(FieldSpec::from).collect(),
            alternates: def.alternates.iter().map(FieldSpec::from).collect(),
        }
    }

    pub fn field(&self, column: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.column == column)
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_is_always_ignored() {
        let spec = FieldSpec::new("Patient Name", 0, (135.72, 649.46));
        assert!(spec.ignored.contains("Patient Name"));
    }

    #[test]
    fn test_column_appended_to_existing_ignored() {
        let def = FieldDef {
            column: "Patient Name".into(),
            page: 0,
            pos: [135.72, 649.46],
            tolerance: Tolerance::default(),
            alignment_mode: Alignment::default(),
            numeric: None,
            ignored: vec!["Name:".into()],
        };
        let spec = FieldSpec::from(&def);
        let expected: BTreeSet<String> = ["Name:".to_string(), "Patient Name".to_string()]
            .into_iter()
            .collect();
        assert_eq!(spec.ignored, expected);
    }

    #[test]
    fn test_column_not_duplicated_in_ignored() {
        let spec = FieldSpec::new("Fail", 0, (0.0, 0.0)).with_ignored(["Fail"]);
        assert_eq!(spec.ignored.len(), 1);
    }
}
