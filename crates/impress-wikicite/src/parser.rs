//! Field tokenizer for wiki citation templates
//!
//! A record such as `cite journal | last1 = Smith | date = 2020 | title = X`
//! is split on `|` into segments, and each segment is read as `key=value`.
//! Only segments carrying a requested label are parsed, so unrelated
//! segments (the template name, `first1`, `url`, ...) are never inspected.

use nom::{bytes::complete::take_till, character::complete::char, combinator::rest, IResult};

/// Field separator inside a citation template
pub const FIELD_SEPARATOR: char = '|';

/// A label was found but its segment has no `=`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingValue<'a> {
    pub segment: &'a str,
}

/// Find the value of the first field carrying `label`.
///
/// Returns `Ok(None)` when no segment carries the label, and `Err` when the
/// first matching segment cannot be split into `key=value`.
pub fn find_field<'a>(
    text: &'a str,
    label: &str,
) -> Result<Option<&'a str>, MissingValue<'a>> {
    let Some(segment) = text
        .split(FIELD_SEPARATOR)
        .find(|segment| carries_label(segment, label))
    else {
        return Ok(None);
    };

    match key_value(segment) {
        Ok((_, (_, value))) => Ok(Some(value)),
        Err(_) => Err(MissingValue { segment }),
    }
}

/// Whether a segment starts with `label` as a whole word.
///
/// `last` does not match `last1 = X`, but matches `last=X`, `last = X`
/// and a bare `last`.
pub fn carries_label(segment: &str, label: &str) -> bool {
    match segment.trim_start().strip_prefix(label) {
        Some(tail) => match tail.chars().next() {
            None => true,
            Some(next) => next == '=' || next.is_whitespace(),
        },
        None => false,
    }
}

/// Split a segment at its first `=`, trimming both sides
fn key_value(input: &str) -> IResult<&str, (&str, &str)> {
    let (remaining, key) = take_till(|c: char| c == '=')(input)?;
    let (remaining, _) = char('=')(remaining)?;
    let (remaining, value) = rest(remaining)?;

    Ok((remaining, (key.trim(), value.trim())))
}
