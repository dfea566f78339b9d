use crate::error::QaPdfError;
use crate::extract::ReportRegistry;
use crate::rules::builtin;
use crate::rules::ruleset::Ruleset;
use std::path::PathBuf;

/// Where rulesets come from.
///
/// Rulesets are registered in this order: presets, then every `*.json` in
/// `rules_dir` (by file name), then `rule_files`. When nothing is specified
/// all built-in presets are used.
#[derive(Debug, Clone, Default)]
pub struct RulesetConfig {
    pub presets: Vec<String>,
    pub rules_dir: Option<PathBuf>,
    pub rule_files: Vec<PathBuf>,
}

impl RulesetConfig {
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty() && self.rules_dir.is_none() && self.rule_files.is_empty()
    }

    /// Load and validate every configured ruleset. Any invalid ruleset fails
    /// the whole load.
    pub fn load_rulesets(&self) -> Result<Vec<Ruleset>, QaPdfError> {
        if self.is_empty() {
            return builtin::load_all_presets();
        }

        let mut rulesets = Vec::new();
        for preset in &self.presets {
            rulesets.push(builtin::load_preset(preset)?);
        }
        if let Some(dir) = &self.rules_dir {
            rulesets.extend(crate::rules::load_ruleset_dir(dir)?);
        }
        for path in &self.rule_files {
            rulesets.push(crate::rules::load_ruleset(path)?);
        }

        if rulesets.is_empty() {
            return Err(QaPdfError::RulesetInvalid("no rulesets specified".into()));
        }

        Ok(rulesets)
    }

    pub fn build_registry(&self) -> Result<ReportRegistry, QaPdfError> {
        let rulesets = self.load_rulesets()?;
        tracing::debug!(
            report_types = ?rulesets.iter().map(|r| r.report_type.as_str()).collect::<Vec<_>>(),
            "loaded rulesets"
        );
        Ok(ReportRegistry::from_rulesets(rulesets))
    }
}

/// Which files a directory scan picks up.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub recursive: bool,
    /// Case-insensitive extension filter without the dot; `None` accepts
    /// every file.
    pub extension: Option<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            recursive: true,
            extension: Some("pdf".into()),
        }
    }
}

/// How a batch of files is processed.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Worker threads; `None` uses one per available core.
    pub workers: Option<usize>,
    /// Stop at the first file that fails to decode instead of skipping it.
    pub raise_errors: bool,
}
