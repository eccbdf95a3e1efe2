//! Surname, year and title extraction
//!
//! Reads the three fields that make up a citation key from one normalized
//! record. Absent fields degrade to placeholders; only a label without a
//! value is an error.

use crate::error::WikiCiteError;
use crate::parser::find_field;

/// First-author surname label, preferred over [`SURNAME_LABEL`]
pub const FIRST_AUTHOR_LABEL: &str = "last1";
/// Generic surname label
pub const SURNAME_LABEL: &str = "last";
/// Publication date label
pub const DATE_LABEL: &str = "date";
/// Title label
pub const TITLE_LABEL: &str = "title";

/// The fields a citation key is derived from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct ExtractedFields {
    pub surname: String,
    pub year: String,
    pub title: String,
}

/// Hands out `Unknown<N>` placeholders for records without a surname
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownSurnames {
    issued: u32,
}

impl UnknownSurnames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the counter and return the next placeholder
    pub fn next_placeholder(&mut self) -> String {
        self.issued += 1;
        format!("Unknown{}", self.issued)
    }

    /// How many placeholders have been issued so far
    pub fn issued(&self) -> u32 {
        self.issued
    }
}

/// Extract surname, year and title from a normalized record.
///
/// The surname comes from `last1`, falling back to `last`, falling back to
/// a fresh `Unknown<N>` placeholder. The year is the part of `date` before
/// the first `-`. A missing date or title yields an empty string.
pub fn extract(
    text: &str,
    unknown: &mut UnknownSurnames,
) -> Result<ExtractedFields, WikiCiteError> {
    let malformed = |label: &str, surname: Option<&str>, year: Option<&str>| {
        WikiCiteError::MalformedRecord {
            label: label.to_string(),
            record: text.to_string(),
            surname: surname.map(str::to_string),
            year: year.map(str::to_string),
        }
    };

    let surname = match find_field(text, FIRST_AUTHOR_LABEL)
        .map_err(|_| malformed(FIRST_AUTHOR_LABEL, None, None))?
    {
        Some(value) => value.to_string(),
        None => match find_field(text, SURNAME_LABEL)
            .map_err(|_| malformed(SURNAME_LABEL, None, None))?
        {
            Some(value) => value.to_string(),
            None => unknown.next_placeholder(),
        },
    };

    let year = find_field(text, DATE_LABEL)
        .map_err(|_| malformed(DATE_LABEL, Some(surname.as_str()), None))?
        .map(year_of)
        .unwrap_or_default();

    let title = find_field(text, TITLE_LABEL)
        .map_err(|_| malformed(TITLE_LABEL, Some(surname.as_str()), Some(year.as_str())))?
        .map(str::to_string)
        .unwrap_or_default();

    Ok(ExtractedFields {
        surname,
        year,
        title,
    })
}

/// The year portion of a date value: everything before the first `-`
pub fn year_of(date: &str) -> String {
    date.split('-').next().unwrap_or_default().to_string()
}
