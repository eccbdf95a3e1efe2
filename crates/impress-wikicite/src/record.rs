//! Reference record data structures

/// One input line of citation markup
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct Record {
    /// 1-based position in the input
    pub line_number: u32,
    /// The line exactly as read, without its line terminator
    pub raw: String,
    /// Braces stripped, surrounding whitespace trimmed
    pub text: String,
}

impl Record {
    /// Create a record from a raw input line
    pub fn new(line_number: u32, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let text = normalize_record(&raw);
        Self {
            line_number,
            raw,
            text,
        }
    }

    /// Whether nothing is left once braces and whitespace are removed
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// 1-based line number for a 0-based input index, saturating at `u32::MAX`
pub fn line_number_of(index: usize) -> u32 {
    u32::try_from(index.saturating_add(1)).unwrap_or(u32::MAX)
}

/// Strip template braces and surrounding whitespace from a raw line
pub fn normalize_record(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '{' && *c != '}')
        .collect::<String>()
        .trim()
        .to_string()
}
