use crate::extract::engine;
use crate::extract::outcome::ExtractionResult;
use crate::index::{Document, TextCleaner};
use crate::rules::ruleset::Ruleset;

/// A report type that can recognise its own documents and extract them.
pub trait ReportExtractor: Send + Sync {
    fn report_type(&self) -> &str;

    /// Substrings that must all be present in the document text.
    fn identifiers(&self) -> &[String];

    /// Output columns, in order.
    fn columns(&self) -> &[String];

    fn extract(&self, document: &Document) -> ExtractionResult;

    /// True if every identifier occurs in `text` (case-sensitive).
    fn matches(&self, text: &str) -> bool {
        contains_all(text, self.identifiers())
    }
}

/// True if every string in `needles` is a substring of `text`.
pub fn contains_all(text: &str, needles: &[String]) -> bool {
    needles.iter().all(|needle| text.contains(needle.as_str()))
}

/// Extractor driven entirely by a declarative [`Ruleset`].
pub struct RulesetExtractor {
    ruleset: Ruleset,
    cleaner: Option<Box<TextCleaner>>,
}

impl RulesetExtractor {
    pub fn new(ruleset: Ruleset) -> Self {
        RulesetExtractor {
            ruleset,
            cleaner: None,
        }
    }

    /// Apply `cleaner` to every block text this ruleset looks at.
    pub fn with_cleaner<F>(mut self, cleaner: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.cleaner = Some(Box::new(cleaner));
        self
    }
}

impl From<Ruleset> for RulesetExtractor {
    fn from(ruleset: Ruleset) -> Self {
        RulesetExtractor::new(ruleset)
    }
}

impl ReportExtractor for RulesetExtractor {
    fn report_type(&self) -> &str {
        &self.ruleset.report_type
    }

    fn identifiers(&self) -> &[String] {
        &self.ruleset.identifiers
    }

    fn columns(&self) -> &[String] {
        &self.ruleset.columns
    }

    fn extract(&self, document: &Document) -> ExtractionResult {
        engine::extract(document, &self.ruleset, self.cleaner.as_deref())
    }
}

/// First candidate, in priority order, whose identifiers all occur in `text`.
pub fn identify<'a>(
    text: &str,
    candidates: &'a [Box<dyn ReportExtractor>],
) -> Option<&'a dyn ReportExtractor> {
    candidates
        .iter()
        .map(|c| c.as_ref())
        .find(|c| c.matches(text))
}

/// Identify the report type of a document and extract it.
///
/// Returns `None` when no candidate matches; the document is unclassified.
pub fn identify_and_extract(
    text: &str,
    document: &Document,
    candidates: &[Box<dyn ReportExtractor>],
) -> Option<(String, ExtractionResult)> {
    let extractor = identify(text, candidates)?;
    tracing::debug!(
        report_type = extractor.report_type(),
        file = %document.file_path().display(),
        "identified report"
    );
    Some((
        extractor.report_type().to_string(),
        extractor.extract(document),
    ))
}

/// Extractors in dispatch priority order.
///
/// When two extractors could both match a document, the one registered first
/// wins, so identifier sets must be distinctive enough not to overlap.
#[derive(Default)]
pub struct ReportRegistry {
    extractors: Vec<Box<dyn ReportExtractor>>,
}

impl ReportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rulesets(rulesets: impl IntoIterator<Item = Ruleset>) -> Self {
        let mut registry = ReportRegistry::new();
        for ruleset in rulesets {
            registry.register(RulesetExtractor::new(ruleset));
        }
        registry
    }

    /// Append an extractor at the lowest priority.
    pub fn register(&mut self, extractor: impl ReportExtractor + 'static) {
        self.extractors.push(Box::new(extractor));
    }

    pub fn report_types(&self) -> Vec<&str> {
        self.extractors.iter().map(|e| e.report_type()).collect()
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    pub fn identify(&self, text: &str) -> Option<&dyn ReportExtractor> {
        identify(text, &self.extractors)
    }

    pub fn identify_and_extract(
        &self,
        text: &str,
        document: &Document,
    ) -> Option<(String, ExtractionResult)> {
        identify_and_extract(text, document, &self.extractors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::PageIndex;
    use crate::model::{BBox, TextRun};
    use crate::rules::parse_ruleset_str;

    fn ruleset(report_type: &str, identifiers: &[&str]) -> Ruleset {
        let ids: Vec<String> = identifiers.iter().map(|s| format!("\"{s}\"")).collect();
        parse_ruleset_str(&format!(
            r#"{{"report_type": "{report_type}", "identifiers": [{}],
                "data": [{{"column": "Value", "page": 0, "pos": [10, 10]}}]}}"#,
            ids.join(", ")
        ))
        .unwrap()
    }

    fn document() -> Document {
        Document::new(
            "x.pdf",
            vec![PageIndex::new(
                0,
                vec![TextRun::new(0, BBox::new(10.0, 10.0, 50.0, 20.0), "QA: 5\n")],
            )],
        )
    }

    #[test]
    fn test_contains_all() {
        let ids = vec!["Hello".to_string(), "World".to_string()];
        assert!(contains_all("Hello World! This is a unit test!", &ids));
        let ids = vec!["Hello".to_string(), "FAIL".to_string()];
        assert!(!contains_all("Hello World! This is a unit test!", &ids));
        assert!(!contains_all("hello world", &["Hello".to_string()]));
    }

    #[test]
    fn test_first_match_wins() {
        let registry =
            ReportRegistry::from_rulesets([ruleset("R1", &["M"]), ruleset("R2", &["M", "S"])]);
        let (report_type, _) = registry.identify_and_extract("M and S", &document()).unwrap();
        assert_eq!(report_type, "R1");

        let registry =
            ReportRegistry::from_rulesets([ruleset("R2", &["M", "S"]), ruleset("R1", &["M"])]);
        let (report_type, _) = registry.identify_and_extract("M and S", &document()).unwrap();
        assert_eq!(report_type, "R2");
    }

    #[test]
    fn test_identifier_order_is_irrelevant() {
        let registry = ReportRegistry::from_rulesets([ruleset("R", &["S", "M"])]);
        assert!(registry.identify("M ... S").is_some());
    }

    #[test]
    fn test_unclassified_returns_none() {
        let registry = ReportRegistry::from_rulesets([ruleset("R", &["Delta4"])]);
        assert!(registry.identify_and_extract("VeriSoft", &document()).is_none());
        assert!(ReportRegistry::new()
            .identify_and_extract("anything", &document())
            .is_none());
    }

    #[test]
    fn test_cleaner_applies_to_extraction() {
        let mut registry = ReportRegistry::new();
        registry.register(
            RulesetExtractor::new(ruleset("R", &["QA"]))
                .with_cleaner(|s: &str| s.trim().trim_start_matches("QA: ").to_string()),
        );
        let (_, result) = registry.identify_and_extract("QA", &document()).unwrap();
        assert_eq!(result.get("Value"), Some("5"));
        assert_eq!(registry.report_types(), vec!["R"]);
    }
}
