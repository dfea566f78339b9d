pub mod dispatch;
pub mod engine;
pub mod outcome;

pub use dispatch::{identify, identify_and_extract, ReportExtractor, ReportRegistry, RulesetExtractor};
pub use engine::extract;
pub use outcome::{ExtractionResult, FieldValue, FileOutcome, ReportRow};
