//! Configuration for impress-wikicite
//!
//! Controls how a run reacts to bad records, which letters disambiguate
//! same-author same-year works, and what gets reported.

use serde::{Deserialize, Serialize};

use crate::cite_key::SUFFIX_LETTERS;
use crate::error::ConfigError;

/// What to do with a record that cannot be keyed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop at the first bad record; earlier output is kept
    #[default]
    Strict,
    /// Skip the bad record with a warning and keep going
    Lenient,
}

/// Run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiCiteConfig {
    /// Reaction to malformed records and exhausted suffix pools
    pub error_policy: ErrorPolicy,
    /// Disambiguation letters, in probing order
    pub suffix_letters: String,
    /// Report each suppressed duplicate on stderr
    pub report_duplicates: bool,
    /// Ignore lines that are empty once braces and whitespace are removed
    pub skip_blank_lines: bool,
}

impl Default for WikiCiteConfig {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::Strict,
            suffix_letters: SUFFIX_LETTERS.iter().collect(),
            report_duplicates: false,
            skip_blank_lines: true,
        }
    }
}

impl WikiCiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    #[cfg(feature = "toml-config")]
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Toml(e.to_string()))
    }

    /// Serialize configuration to TOML
    #[cfg(feature = "toml-config")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The suffix pool as letters
    pub fn suffixes(&self) -> Vec<char> {
        self.suffix_letters.chars().collect()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let letters = self.suffixes();

        if letters.is_empty() {
            return Err(ConfigError::InvalidSuffixLetters(
                "at least one letter is required".to_string(),
            ));
        }

        if let Some(bad) = letters.iter().find(|c| !c.is_ascii_lowercase()) {
            return Err(ConfigError::InvalidSuffixLetters(format!(
                "'{}' is not a lowercase ASCII letter",
                bad
            )));
        }

        // The bare key already stands for the first work
        if letters.contains(&'a') {
            return Err(ConfigError::InvalidSuffixLetters(
                "'a' cannot be used as a suffix".to_string(),
            ));
        }

        for (i, letter) in letters.iter().enumerate() {
            if letters[..i].contains(letter) {
                return Err(ConfigError::InvalidSuffixLetters(format!(
                    "'{}' appears more than once",
                    letter
                )));
            }
        }

        Ok(())
    }
}
