//! Record processing pipeline
//!
//! Drives each input line through extraction and key registration, in input
//! order, and collects what was emitted, suppressed, skipped, or where the
//! run stopped.

use crate::cite_key::{CitationKey, KeyRegistry, Registration};
use crate::config::{ErrorPolicy, WikiCiteConfig};
use crate::error::{ConfigError, WikiCiteError};
use crate::extractor::{extract, ExtractedFields};
use crate::formatter::format_references;
use crate::record::{line_number_of, Record};

/// A record that received a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub line_number: u32,
    pub key: CitationKey,
    pub raw: String,
}

/// A record suppressed as a duplicate of an earlier one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRecord {
    pub line_number: u32,
    pub existing: CitationKey,
    pub fields: ExtractedFields,
}

/// A record that failed and was either skipped or stopped the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRecord {
    pub line_number: u32,
    pub raw: String,
    pub error: WikiCiteError,
}

/// What happened to one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Emitted(ReferenceEntry),
    Duplicate(DuplicateRecord),
    Blank,
}

/// Result of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessReport {
    pub entries: Vec<ReferenceEntry>,
    pub duplicates: Vec<DuplicateRecord>,
    /// Failures passed over under [`ErrorPolicy::Lenient`]
    pub skipped: Vec<FailedRecord>,
    /// The failure that stopped a strict run
    pub halted: Option<FailedRecord>,
    pub blank_lines: u32,
}

impl ProcessReport {
    /// Whether every input line was processed
    pub fn is_complete(&self) -> bool {
        self.halted.is_none()
    }

    /// Emitted keys, in output order
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.key.as_str()).collect()
    }

    /// The full `<references>` document. The closing tag is written even
    /// when the run halted.
    pub fn render(&self) -> String {
        format_references(
            self.entries
                .iter()
                .map(|entry| (&entry.key, entry.raw.as_str())),
        )
    }
}

/// Stateful processor for one run
#[derive(Debug)]
pub struct CitationProcessor {
    registry: KeyRegistry,
    policy: ErrorPolicy,
    skip_blank_lines: bool,
    report: ProcessReport,
}

impl CitationProcessor {
    /// Create a processor for one run. Fails if the config does not validate.
    pub fn new(config: &WikiCiteConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            registry: KeyRegistry::with_suffixes(config.suffixes()),
            policy: config.error_policy,
            skip_blank_lines: config.skip_blank_lines,
            report: ProcessReport::default(),
        })
    }

    /// Extract and register one record without applying the error policy
    pub fn process_record(&mut self, record: &Record) -> Result<RecordOutcome, WikiCiteError> {
        if self.skip_blank_lines && record.is_blank() {
            return Ok(RecordOutcome::Blank);
        }

        let fields = extract(&record.text, self.registry.unknown_surnames())?;

        match self.registry.register_fields(&fields)? {
            Registration::Assigned(key) => Ok(RecordOutcome::Emitted(ReferenceEntry {
                line_number: record.line_number,
                key,
                raw: record.raw.clone(),
            })),
            Registration::Duplicate { existing } => Ok(RecordOutcome::Duplicate(DuplicateRecord {
                line_number: record.line_number,
                existing,
                fields,
            })),
        }
    }

    /// Feed the next input line. Returns `false` once the run has halted;
    /// later lines are ignored.
    pub fn push_line(&mut self, line_number: u32, raw: &str) -> bool {
        if self.report.halted.is_some() {
            return false;
        }

        let record = Record::new(line_number, raw);
        match self.process_record(&record) {
            Ok(RecordOutcome::Emitted(entry)) => self.report.entries.push(entry),
            Ok(RecordOutcome::Duplicate(duplicate)) => self.report.duplicates.push(duplicate),
            Ok(RecordOutcome::Blank) => self.report.blank_lines += 1,
            Err(error) => {
                let failed = FailedRecord {
                    line_number,
                    raw: record.raw,
                    error,
                };
                match self.policy {
                    ErrorPolicy::Strict => {
                        tracing::error!(
                            line = line_number,
                            error = %failed.error,
                            "stopping at bad record"
                        );
                        self.report.halted = Some(failed);
                        return false;
                    }
                    ErrorPolicy::Lenient => {
                        tracing::warn!(
                            line = line_number,
                            error = %failed.error,
                            "skipping bad record"
                        );
                        self.report.skipped.push(failed);
                    }
                }
            }
        }

        true
    }

    /// Keys registered so far
    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    /// Finish the run and return its report
    pub fn finish(self) -> ProcessReport {
        let report = self.report;
        tracing::info!(
            emitted = report.entries.len(),
            duplicates = report.duplicates.len(),
            skipped = report.skipped.len(),
            halted = report.halted.is_some(),
            "reference list processed"
        );
        report
    }
}

/// Process every line with fresh state
pub fn process_lines<I, S>(
    lines: I,
    config: &WikiCiteConfig,
) -> Result<ProcessReport, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut processor = CitationProcessor::new(config)?;
    for (index, line) in lines.into_iter().enumerate() {
        if !processor.push_line(line_number_of(index), line.as_ref()) {
            break;
        }
    }
    Ok(processor.finish())
}

/// Process a whole input text and render the reference list
pub fn process_text(
    input: &str,
    config: &WikiCiteConfig,
) -> Result<(String, ProcessReport), ConfigError> {
    let report = process_lines(input.lines(), config)?;
    Ok((report.render(), report))
}
