//! Locate a JSON payload inside free-form model output.
//!
//! This is a span finder, not a parser: it does not check nesting or
//! balance. When the slice it returns is not valid JSON, the parse step that
//! consumes it reports the error.

/// Return the span from the first `{` or `[` to the last matching closer.
///
/// The opener is whichever of `{` and `[` appears first; the closer is the
/// last `}` (respectively `]`) in the text. The input is returned unchanged
/// when there is no opener, no closer, or the closer precedes the opener.
pub fn extract_payload(text: &str) -> &str {
    let Some((start, opener)) = text.char_indices().find(|(_, c)| matches!(c, '{' | '[')) else {
        return text;
    };

    let closer = if opener == '{' { '}' } else { ']' };

    match text.rfind(closer) {
        Some(end) if end > start => &text[start..=end],
        _ => text,
    }
}
