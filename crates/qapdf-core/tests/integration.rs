//! Integration tests for the extract_pdf() / process_files() pipeline.
//!
//! Uses a MockDecoder that returns pre-built pages keyed on the file bytes,
//! so these tests run without poppler-utils.

use qapdf_core::batch::{collect_files, process_files, Progress};
use qapdf_core::config::{BatchOptions, RulesetConfig, ScanOptions};
use qapdf_core::error::QaPdfError;
use qapdf_core::extract::{FileOutcome, ReportRegistry};
use qapdf_core::extraction::{PdfDecoder, RawPage};
use qapdf_core::model::{BBox, TextRun};
use qapdf_core::rules::builtin::load_preset;
use qapdf_core::rules::parse_ruleset_str;
use qapdf_core::{extract_pdf, load_document};
use std::path::Path;
use std::sync::Mutex;

/// Decodes by looking the file bytes up in a fixed table. Bytes starting with
/// "broken" fail to decode.
struct MockDecoder {
    documents: Vec<(&'static str, Vec<RawPage>)>,
}

impl PdfDecoder for MockDecoder {
    fn decode(&self, pdf_bytes: &[u8]) -> Result<Vec<RawPage>, QaPdfError> {
        if pdf_bytes.starts_with(b"broken") {
            return Err(QaPdfError::Decode("not a PDF".into()));
        }
        Ok(self
            .documents
            .iter()
            .find(|(key, _)| key.as_bytes() == pdf_bytes)
            .map(|(_, pages)| pages.clone())
            .unwrap_or_default())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn page(index: usize, runs: &[(f64, f64, &str)]) -> RawPage {
    RawPage {
        page_index: index,
        height: 792.0,
        runs: runs
            .iter()
            .map(|&(x, y, text)| TextRun::new(index, BBox::new(x, y, x + 60.0, y + 10.0), text))
            .collect(),
    }
}

fn qa_registry() -> ReportRegistry {
    let ruleset = parse_ruleset_str(
        r#"{
            "report_type": "QA",
            "identifiers": ["QA Report"],
            "data": [
                {"column": "QA", "page": 0, "pos": [10, 20], "tolerance": 1,
                 "alignment_mode": "top-left"},
                {"column": "Pass", "page": 0, "pos": [100, 500], "numeric": true}
            ],
            "alternates": [
                {"column": "Pass", "page": 1, "pos": [100, 500], "numeric": true}
            ]
        }"#,
    )
    .unwrap();
    ReportRegistry::from_rulesets([ruleset])
}

// ---------------------------------------------------------------------------
// Test 1: Identified report, values resolved on page 0
// ---------------------------------------------------------------------------
#[test]
fn identified_report_resolves_fields() {
    let decoder = MockDecoder {
        documents: vec![(
            "qa",
            vec![page(
                0,
                &[
                    (200.0, 700.0, "QA Report\n"),
                    (10.0, 10.0, "5\n"),
                    (100.0, 500.0, "97.5\n"),
                ],
            )],
        )],
    };

    let row = extract_pdf(b"qa", Path::new("qa.pdf"), &decoder, &qa_registry())
        .unwrap()
        .expect("report should be identified");

    assert_eq!(row.report_type, "QA");
    assert_eq!(row.file_path, Path::new("qa.pdf"));
    assert_eq!(row.result.get("QA"), Some("5"));
    assert_eq!(row.result.get("Pass"), Some("97.5"));
    assert!(row.result.is_complete());
}

// ---------------------------------------------------------------------------
// Test 2: Primary misses, alternate on page 1 fills the column
// ---------------------------------------------------------------------------
#[test]
fn alternate_fills_missing_column() {
    let decoder = MockDecoder {
        documents: vec![(
            "alt",
            vec![
                page(0, &[(200.0, 700.0, "QA Report\n"), (10.0, 10.0, "5\n")]),
                page(1, &[(100.0, 500.0, "Pass\n"), (104.0, 498.0, "88\n")]),
            ],
        )],
    };

    let row = extract_pdf(b"alt", Path::new("alt.pdf"), &decoder, &qa_registry())
        .unwrap()
        .unwrap();

    // The label block sorts first but is ignored; the numeric value wins.
    assert_eq!(row.result.get("Pass"), Some("88"));
}

// ---------------------------------------------------------------------------
// Test 3: Non-numeric text at a numeric field position leaves it empty
// ---------------------------------------------------------------------------
#[test]
fn numeric_field_rejects_text() {
    let decoder = MockDecoder {
        documents: vec![(
            "text",
            vec![page(
                0,
                &[(200.0, 700.0, "QA Report\n"), (100.0, 500.0, "N/A\n")],
            )],
        )],
    };

    let row = extract_pdf(b"text", Path::new("t.pdf"), &decoder, &qa_registry())
        .unwrap()
        .unwrap();

    assert_eq!(row.result.get("Pass"), Some(""));
    assert_eq!(row.result.missing_columns(), vec!["QA", "Pass"]);
}

// ---------------------------------------------------------------------------
// Test 4: Unknown report is unclassified, not an error
// ---------------------------------------------------------------------------
#[test]
fn unknown_report_is_unclassified() {
    let decoder = MockDecoder {
        documents: vec![("other", vec![page(0, &[(10.0, 10.0, "Delta4 Phantom\n")])])],
    };

    let result = extract_pdf(b"other", Path::new("o.pdf"), &decoder, &qa_registry()).unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Test 5: Decode failure propagates from extract_pdf
// ---------------------------------------------------------------------------
#[test]
fn decode_failure_is_an_error() {
    let decoder = MockDecoder { documents: vec![] };
    let err = extract_pdf(b"broken", Path::new("b.pdf"), &decoder, &qa_registry()).unwrap_err();
    assert!(matches!(err, QaPdfError::Decode(_)));
}

// ---------------------------------------------------------------------------
// Test 6: Built-in SNC Patient preset against a synthetic page
// ---------------------------------------------------------------------------
#[test]
fn sncpatient2020_preset_end_to_end() {
    let snc = load_preset("sncpatient2020").unwrap();
    let name_pos = snc.field("Patient Name").unwrap().pos;
    let points_pos = snc.field("Total Points").unwrap().pos;

    let header: Vec<(f64, f64, &str)> = vec![
        (200.0, 760.0, "SNC Patient QA of Dose Distribution\n"),
        (40.0, 740.0, "Hospital\n"),
        (40.0, 720.0, "QA Date\n"),
        (40.0, 300.0, "QA Parameters\n"),
        (40.0, 200.0, "Summary\n"),
        (40.0, 590.0, "Plan ID\n"),
        (40.0, 540.0, "Verified Plan UID\n"),
        (name_pos.x, name_pos.y, "Doe, Jane\n"),
        (points_pos.x, points_pos.y, "1234\n"),
    ];
    let decoder = MockDecoder {
        documents: vec![("snc", vec![page(0, &header)])],
    };
    let registry = ReportRegistry::from_rulesets([snc]);

    let row = extract_pdf(b"snc", Path::new("snc.pdf"), &decoder, &registry)
        .unwrap()
        .unwrap();

    assert_eq!(row.report_type, "SNCPatient2020");
    assert_eq!(row.result.len(), 20);
    assert_eq!(row.result.get("Patient Name"), Some("Doe, Jane"));
    assert_eq!(row.result.get("Total Points"), Some("1234"));
}

// ---------------------------------------------------------------------------
// Test 7: Anchor search on a loaded document
// ---------------------------------------------------------------------------
#[test]
fn load_document_and_find_anchor() {
    let decoder = MockDecoder {
        documents: vec![(
            "doc",
            vec![
                page(0, &[(10.0, 700.0, "Summary\n")]),
                page(1, &[(20.0, 600.0, "Summary of results\n")]),
            ],
        )],
    };

    let doc = load_document(b"doc", Path::new("doc.pdf"), &decoder).unwrap();
    assert_eq!(doc.page_count(), 2);
    let anchors = doc.find_anchors("Summary");
    assert_eq!(anchors.len(), 2);
    assert_eq!(anchors[1].page, 1);
    assert!(doc.find_anchor("Missing").is_none());
}

// ---------------------------------------------------------------------------
// Test 8: Batch over a directory with skip-on-error
// ---------------------------------------------------------------------------
fn write_batch_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.pdf"), b"qa").unwrap();
    std::fs::write(dir.path().join("b.pdf"), b"broken").unwrap();
    std::fs::write(dir.path().join("c.pdf"), b"other").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"qa").unwrap();
    dir
}

fn batch_decoder() -> MockDecoder {
    MockDecoder {
        documents: vec![
            (
                "qa",
                vec![page(
                    0,
                    &[(200.0, 700.0, "QA Report\n"), (10.0, 10.0, "5\n")],
                )],
            ),
            ("other", vec![page(0, &[(10.0, 10.0, "Unrelated\n")])]),
        ],
    }
}

#[test]
fn batch_skips_failures_by_default() {
    let dir = write_batch_dir();
    let files = collect_files(dir.path(), &ScanOptions::default()).unwrap();
    assert_eq!(files.len(), 3);

    let outcomes = process_files(
        &files,
        &batch_decoder(),
        &qa_registry(),
        &BatchOptions {
            workers: Some(2),
            raise_errors: false,
        },
        None,
    )
    .unwrap();

    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[0], FileOutcome::Extracted(_)));
    assert!(matches!(outcomes[1], FileOutcome::Failed { .. }));
    assert!(matches!(outcomes[2], FileOutcome::Unclassified { .. }));
    assert_eq!(outcomes[0].row().unwrap().result.get("QA"), Some("5"));
}

#[test]
fn batch_raise_errors_stops_on_failure() {
    let dir = write_batch_dir();
    let files = collect_files(dir.path(), &ScanOptions::default()).unwrap();

    let err = process_files(
        &files,
        &batch_decoder(),
        &qa_registry(),
        &BatchOptions {
            workers: Some(1),
            raise_errors: true,
        },
        None,
    )
    .unwrap_err();

    match err {
        QaPdfError::InFile { path, source } => {
            assert!(path.ends_with("b.pdf"));
            assert!(matches!(*source, QaPdfError::Decode(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn batch_unclassified_never_raises() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("c.pdf"), b"other").unwrap();
    let files = collect_files(dir.path(), &ScanOptions::default()).unwrap();

    let outcomes = process_files(
        &files,
        &batch_decoder(),
        &qa_registry(),
        &BatchOptions {
            workers: Some(1),
            raise_errors: true,
        },
        None,
    )
    .unwrap();
    assert!(matches!(outcomes[0], FileOutcome::Unclassified { .. }));
}

// ---------------------------------------------------------------------------
// Test 9: Progress callback fires once per file
// ---------------------------------------------------------------------------
#[test]
fn batch_reports_progress() {
    let dir = write_batch_dir();
    let files = collect_files(dir.path(), &ScanOptions::default()).unwrap();
    let seen = Mutex::new(Vec::new());
    let callback = |p: Progress<'_>| seen.lock().unwrap().push((p.completed, p.total));

    process_files(
        &files,
        &batch_decoder(),
        &qa_registry(),
        &BatchOptions::default(),
        Some(&callback),
    )
    .unwrap();

    let mut seen = seen.into_inner().unwrap();
    seen.sort();
    assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
}

// ---------------------------------------------------------------------------
// Test 10: Default ruleset config registers the built-in presets
// ---------------------------------------------------------------------------
#[test]
fn default_config_registers_presets() {
    let registry = RulesetConfig::default().build_registry().unwrap();
    assert_eq!(registry.report_types(), vec!["SNCPatient2020"]);
}
