//! Author-year citation keys for wiki reference lists
//!
//! Turns citation templates exported from a reference manager, one per line,
//! into a deduplicated `<references>` list where every entry carries a
//! readable `Surname_Year` name:
//! - Surname, year and title extraction from `|`-delimited templates
//! - Unique key assignment with `b`..`m` suffixes for same-author same-year works
//! - Duplicate suppression on equal surname, year and title
//! - Strict (stop at first bad record) or lenient processing

pub mod cite_key;
pub mod config;
pub mod error;
pub mod extractor;
pub mod formatter;
pub mod parser;
pub mod processor;
pub mod record;

pub use cite_key::{base_key, CitationKey, KeyRegistry, Registration, SUFFIX_LETTERS};
pub use config::{ErrorPolicy, WikiCiteConfig};
pub use error::{ConfigError, WikiCiteError};
pub use extractor::{extract, ExtractedFields, UnknownSurnames};
pub use formatter::{format_reference, format_references, REFERENCES_CLOSE, REFERENCES_OPEN};
pub use processor::{
    process_lines, process_text, CitationProcessor, DuplicateRecord, FailedRecord, ProcessReport,
    RecordOutcome, ReferenceEntry,
};
pub use record::{line_number_of, normalize_record, Record};

/// Process a list of lines and return the rendered reference list
#[cfg(feature = "uniffi")]
#[uniffi::export]
pub fn process_references_ffi(
    lines: Vec<String>,
    lenient: bool,
) -> Result<String, ConfigError> {
    let config = WikiCiteConfig {
        error_policy: if lenient {
            ErrorPolicy::Lenient
        } else {
            ErrorPolicy::Strict
        },
        ..WikiCiteConfig::default()
    };
    Ok(process_lines(lines, &config)?.render())
}

/// Extract the keying fields of one record
#[cfg(feature = "uniffi")]
#[uniffi::export]
pub fn extract_fields_ffi(record: String) -> Result<ExtractedFields, WikiCiteError> {
    let mut unknown = UnknownSurnames::new();
    extract(&normalize_record(&record), &mut unknown)
}

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
