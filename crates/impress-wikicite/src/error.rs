//! Error types for citation key processing

/// Error type for record processing failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum WikiCiteError {
    /// A recognized field label was found but its value could not be isolated.
    ///
    /// `surname` and `year` hold whatever was extracted before the failure,
    /// for diagnostics.
    #[error("Malformed record: field `{label}` has no `=` in: {record}")]
    MalformedRecord {
        label: String,
        record: String,
        surname: Option<String>,
        year: Option<String>,
    },

    /// Every disambiguation letter for a base key is taken by a different title.
    #[error("Suffix pool exhausted for key {base_key} (title: {title:?})")]
    SuffixPoolExhausted { base_key: String, title: String },
}

impl WikiCiteError {
    /// The record text that triggered the error, when there is one
    pub fn record(&self) -> Option<&str> {
        match self {
            Self::MalformedRecord { record, .. } => Some(record),
            Self::SuffixPoolExhausted { .. } => None,
        }
    }
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum ConfigError {
    #[error("Invalid suffix letters: {0}")]
    InvalidSuffixLetters(String),

    #[error("JSON parse error: {0}")]
    Json(String),

    #[error("TOML parse error: {0}")]
    Toml(String),
}
