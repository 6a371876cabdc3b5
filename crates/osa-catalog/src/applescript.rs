//! AppleScript string literal encoding.
//!
//! AppleScript string literals are delimited by double quotes and recognise
//! backslash escapes. Every producer that splices caller-supplied text into a
//! script goes through these helpers.

/// Escapes `text` for inclusion between double quotes in AppleScript source.
///
/// Backslashes are doubled and double quotes are backslash-escaped. Other
/// characters, including newlines, are legal inside a literal and pass
/// through untouched.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Returns `text` as a complete, quoted AppleScript string literal.
#[must_use]
pub fn quoted(text: &str) -> String {
    format!("\"{}\"", escape(text))
}

/// Renders a Rust boolean as an AppleScript boolean literal.
#[must_use]
pub const fn boolean(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
