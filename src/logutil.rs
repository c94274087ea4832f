//! Helpers that keep catalog- and player-supplied strings on one log line.

use std::fmt::Write;

/// Longest preview (in chars) written for a single value.
const MAX_PREVIEW: usize = 120;

/// Escape a string for single-line logging: backslash, `\n`, `\r` and `\t`
/// become two-character escapes, other control characters `\xNN`. Values longer
/// than [`MAX_PREVIEW`] chars are cut with an ellipsis.
pub fn escape_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 4);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Escape each item and join them as `[a, b, c]`.
pub fn escape_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parts: Vec<String> = items.into_iter().map(|s| escape_log(s.as_ref())).collect();
    format!("[{}]", parts.join(", "))
}
