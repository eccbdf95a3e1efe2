//! Cite key registry
//!
//! Assigns `Surname_Year` keys, detects duplicate works, and disambiguates
//! several works by the same author in the same year with a letter suffix.

use std::collections::HashMap;
use std::fmt;

use crate::error::WikiCiteError;
use crate::extractor::{ExtractedFields, UnknownSurnames};

/// Disambiguation letters, in probing order. `a` is never used: the first
/// work for a surname/year pair keeps the bare key.
pub const SUFFIX_LETTERS: [char; 12] = ['b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm'];

/// A registered citation key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CitationKey(String);

impl CitationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CitationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CitationKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of registering one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// A new key was assigned
    Assigned(CitationKey),
    /// Same surname, year and title as the record that owns `existing`
    Duplicate { existing: CitationKey },
}

impl Registration {
    /// The newly assigned key, or `None` for a duplicate
    pub fn key(&self) -> Option<&CitationKey> {
        match self {
            Self::Assigned(key) => Some(key),
            Self::Duplicate { .. } => None,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Per-run key state: the key -> title mapping and the `Unknown<N>` counter.
///
/// Entries are append-only; a key is never removed or re-pointed at a
/// different title. Registration order decides which record gets the bare
/// key, so records must be registered in input order.
#[derive(Debug, Clone)]
pub struct KeyRegistry {
    titles: HashMap<String, String>,
    order: Vec<CitationKey>,
    suffixes: Vec<char>,
    unknown: UnknownSurnames,
}

impl Default for KeyRegistry {
    fn default() -> Self {
        Self::with_suffixes(SUFFIX_LETTERS.to_vec())
    }
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with a custom disambiguation pool
    pub fn with_suffixes(suffixes: Vec<char>) -> Self {
        Self {
            titles: HashMap::new(),
            order: Vec::new(),
            suffixes,
            unknown: UnknownSurnames::new(),
        }
    }

    /// The placeholder counter threaded through extraction
    pub fn unknown_surnames(&mut self) -> &mut UnknownSurnames {
        &mut self.unknown
    }

    /// Register a work and return its key, or flag it as a duplicate.
    ///
    /// Probes `Surname_Year`, then `Surname_Yearb`, `Surname_Yearc`, ... and
    /// stops at the first free key (assigned) or the first key already
    /// holding the same title (duplicate).
    pub fn register(
        &mut self,
        surname: &str,
        year: &str,
        title: &str,
    ) -> Result<Registration, WikiCiteError> {
        let base = base_key(surname, year);

        let candidates = std::iter::once(base.clone())
            .chain(self.suffixes.iter().map(|letter| format!("{}{}", base, letter)));

        for candidate in candidates {
            match self.titles.get(&candidate) {
                None => {
                    tracing::debug!(key = %candidate, title, "assigned cite key");
                    self.titles.insert(candidate.clone(), title.to_string());
                    let key = CitationKey(candidate);
                    self.order.push(key.clone());
                    return Ok(Registration::Assigned(key));
                }
                Some(existing_title) if existing_title == title => {
                    tracing::debug!(key = %candidate, title, "duplicate reference");
                    return Ok(Registration::Duplicate {
                        existing: CitationKey(candidate),
                    });
                }
                Some(_) => continue,
            }
        }

        Err(WikiCiteError::SuffixPoolExhausted {
            base_key: base,
            title: title.to_string(),
        })
    }

    /// Register previously extracted fields
    pub fn register_fields(
        &mut self,
        fields: &ExtractedFields,
    ) -> Result<Registration, WikiCiteError> {
        self.register(&fields.surname, &fields.year, &fields.title)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.titles.contains_key(key)
    }

    /// The title stored under a key
    pub fn title_of(&self, key: &str) -> Option<&str> {
        self.titles.get(key).map(String::as_str)
    }

    /// Registered keys and titles in registration order
    pub fn entries(&self) -> impl Iterator<Item = (&CitationKey, &str)> + '_ {
        self.order
            .iter()
            .map(move |key| (key, self.titles[key.as_str()].as_str()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// The unsuffixed key for a surname and year
pub fn base_key(surname: &str, year: &str) -> String {
    format!("{}_{}", surname, year)
}
