use crate::error::QaPdfError;
use crate::rules::parse_ruleset_str;
use crate::rules::ruleset::Ruleset;

const SNC_PATIENT_2020_JSON: &str = include_str!("../../../../rules/sncpatient2020.json");

/// Available predefined rulesets, in dispatch priority order.
pub const PRESETS: &[&str] = &["sncpatient2020"];

/// Load a predefined ruleset by name.
pub fn load_preset(name: &str) -> Result<Ruleset, QaPdfError> {
    match name {
        "sncpatient2020" => parse_ruleset_str(SNC_PATIENT_2020_JSON),
        _ => Err(QaPdfError::RulesetInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

/// Load every preset, in priority order.
pub fn load_all_presets() -> Result<Vec<Ruleset>, QaPdfError> {
    PRESETS.iter().map(|name| load_preset(name)).collect()
}
