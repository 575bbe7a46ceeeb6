//! Scalar value helpers: template quoting, block indicators, plain-safe output.

use std::borrow::Cow;

/// Opening delimiter of a template expression.
pub const TEMPLATE_OPEN: &str = "{{";

/// Returns true for a literal (`|`) or folded (`>`) block-scalar header value,
/// including chomping/indentation indicators and a trailing comment.
pub fn is_block_indicator(value: &str) -> bool {
    let head = value.split(" #").next().unwrap_or(value).trim_end();
    let mut chars = head.chars();
    matches!(chars.next(), Some('|' | '>'))
        && chars.all(|c| matches!(c, '+' | '-') || c.is_ascii_digit())
}

/// A key with this value owns the lines that follow it.
pub fn value_opens_block(value: &str) -> bool {
    value.is_empty() || value.starts_with('#') || is_block_indicator(value)
}

/// Double-quotes a value that starts with an unquoted template expression.
///
/// `{{ x }}` at the start of a plain value is read as a flow mapping, so the
/// whole value is wrapped; anything else is returned untouched.
pub fn quote_template_value(value: &str) -> Cow<'_, str> {
    if value.starts_with(TEMPLATE_OPEN) {
        Cow::Owned(double_quoted(value))
    } else {
        Cow::Borrowed(value)
    }
}

/// Makes an inline mapping value safe to emit after `key: `.
///
/// A plain value holding `": "`, or ending in `:`, would read as a nested
/// mapping, so it is double-quoted. Quoted and flow values are left alone.
pub fn quote_mapping_value(value: &str) -> Cow<'_, str> {
    let structured = value.starts_with(['"', '\'', '[', '{']);
    let content = value.split(" #").next().unwrap_or(value).trim_end();
    if !structured && (content.contains(": ") || content.ends_with(':')) {
        Cow::Owned(double_quoted(value))
    } else {
        quote_template_value(value)
    }
}

/// Removes one pair of matching outer quotes when the inside holds no quote of the same kind.
pub fn strip_matching_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
            && !inner.contains(quote)
        {
            return inner;
        }
    }
    value
}

pub fn double_quoted(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Renders a string as a plain scalar when that reads back as the same string,
/// otherwise double-quoted.
pub fn plain_or_quoted(value: &str) -> String {
    if needs_quotes(value) {
        double_quoted(value)
    } else {
        value.to_string()
    }
}

fn needs_quotes(value: &str) -> bool {
    const RESERVED: &[&str] = &["true", "false", "yes", "no", "on", "off", "null", "~"];
    const INDICATORS: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
        '`',
    ];

    value.is_empty()
        || value.trim() != value
        || value.starts_with(INDICATORS)
        || value.contains(": ")
        || value.contains(" #")
        || value.ends_with(':')
        || RESERVED.contains(&value.to_ascii_lowercase().as_str())
        || value.parse::<f64>().is_ok()
}
