use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum QaPdfError {
    #[error("PDF decoding failed: {0}")]
    Decode(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to load ruleset from {path}: {reason}")]
    RulesetLoad { path: PathBuf, reason: String },

    #[error("invalid ruleset: {0}")]
    RulesetInvalid(String),

    #[error("invalid alignment mode '{0}' (expected e.g. 'bottom-left', 'top-right' or 'center')")]
    InvalidAlignment(String),

    #[error("{path}: {source}")]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<QaPdfError>,
    },

    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QaPdfError {
    /// True for errors raised while loading or validating rulesets.
    ///
    /// These are fatal to a run; everything else is scoped to a single file.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            QaPdfError::RulesetLoad { .. }
                | QaPdfError::RulesetInvalid(_)
                | QaPdfError::InvalidAlignment(_)
        )
    }
}
