//! Wiki markup output
//!
//! Wraps each kept record in a named `<ref>` tag so it can be cited from
//! wiki text with `<ref name=Smith_2020 />`.

use crate::cite_key::CitationKey;

/// Opening line of the generated reference list
pub const REFERENCES_OPEN: &str = "<references>";
/// Closing line of the generated reference list
pub const REFERENCES_CLOSE: &str = "</references>";

/// Format one record as a named reference
pub fn format_reference(key: &CitationKey, raw_line: &str) -> String {
    format!("<ref name={}>{}</ref>", key, raw_line)
}

/// Format a complete reference list, one record per line
pub fn format_references<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a CitationKey, &'a str)>,
{
    let mut result = String::new();
    result.push_str(REFERENCES_OPEN);
    result.push('\n');

    for (key, raw_line) in entries {
        result.push_str(&format_reference(key, raw_line));
        result.push('\n');
    }

    result.push_str(REFERENCES_CLOSE);
    result.push('\n');
    result
}
