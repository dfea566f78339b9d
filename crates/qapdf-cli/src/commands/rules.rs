use qapdf_core::error::QaPdfError;
use qapdf_core::rules::builtin;
use qapdf_core::rules::ruleset::Ruleset;
use std::path::Path;

pub fn list() -> Result<(), QaPdfError> {
    println!("Available predefined rulesets:\n");
    for name in builtin::PRESETS {
        let rs = builtin::load_preset(name)?;
        println!(
            "  {:<16} {} ({} columns, {} alternates)",
            name,
            rs.report_type,
            rs.columns.len(),
            rs.alternates.len()
        );
        if let Some(ref desc) = rs.description {
            println!("                   {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn schema() -> Result<(), QaPdfError> {
    print!(
        r#"JSON Ruleset Schema
===================

A ruleset tells qapdf how to recognise one type of QA report and where on
the page each value sits. When you run `qapdf scan`, every PDF is matched
against the rulesets in priority order; the first ruleset whose identifiers
all occur in the document text is used to extract it.

Top-level fields:
  report_type   (string, required)  Name of the report type. Also prefixes
                                    the CSV file: <report_type>_<output_file>
  description   (string, optional)  What this ruleset is for
  identifiers   (array, required)   Strings that must ALL appear in the
                                    document text (case-sensitive)
  data          (array, required)   One field per output column, in column
                                    order (see below)
  alternates    (array, optional)   Fallback fields, same shape as data.
                                    Tried in order for columns the primary
                                    field left empty. A column may repeat.

Each field in "data" / "alternates":
  column        (string, required)  Output column name. Text equal to the
                                    column name is never returned.
  page          (integer, required) 0-based page index
  pos           ([x, y], required)  Position in PDF points, origin at the
                                    bottom-left of the page
  tolerance     (number or [x, y])  Maximum distance from pos, exclusive.
                                    Alias: "tol". Default: 10
  alignment_mode (string)           Which corner or edge of a text block is
                                    compared with pos: "<v>-<h>" with v in
                                    bottom/center/top and h in left/center/
                                    right, or "center". Alias: "mode".
                                    Default: "bottom-left"
  numeric       (boolean, optional) true keeps only values that parse as a
                                    number, false only values that do not
  ignored       (array, optional)   Block texts to skip (e.g. labels)

Example:
{{
  "report_type": "MyReport",
  "identifiers": ["Patient QA Report", "Gamma Analysis"],
  "data": [
    {{ "column": "Patient Name", "page": 0, "pos": [135.7, 649.5] }},
    {{ "column": "Pass (%)", "page": 0, "pos": [310, 240], "numeric": true,
      "tolerance": [20, 5], "alignment_mode": "top-right" }}
  ],
  "alternates": [
    {{ "column": "Pass (%)", "page": 1, "pos": [310, 700], "numeric": true }}
  ]
}}

Use `qapdf inspect <PDF>` to read block positions off a sample report.
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), QaPdfError> {
    let rs = qapdf_core::rules::load_ruleset(file)?;

    println!("Ruleset '{}' is valid.", rs.report_type);
    println!("  Identifiers: {}", rs.identifiers.join(", "));
    println!(
        "  Columns: {} ({} alternates)",
        rs.columns.len(),
        rs.alternates.len()
    );

    let warnings = lint(&rs);
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

/// Problems that are legal but almost certainly mistakes.
fn lint(rs: &Ruleset) -> Vec<String> {
    let mut warnings = Vec::new();

    for field in rs.fields.iter().chain(&rs.alternates) {
        if field.tolerance.x() == 0.0 || field.tolerance.y() == 0.0 {
            warnings.push(format!(
                "column '{}' has a zero tolerance and can never match",
                field.column
            ));
        }
    }

    for (i, a) in rs.fields.iter().enumerate() {
        for b in &rs.fields[i + 1..] {
            if a.page == b.page && a.pos == b.pos && a.alignment == b.alignment {
                warnings.push(format!(
                    "columns '{}' and '{}' query the same position",
                    a.column, b.column
                ));
            }
        }
    }

    warnings
}
