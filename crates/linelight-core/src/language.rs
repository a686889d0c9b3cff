use crate::tree::Element;

/// How a code block's declared language resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Language {
    /// No `language-*` class on the element; the block is segmented and
    /// annotated without tokenization.
    Plain,
    /// Canonical engine identifier after alias lookup.
    Resolved(String),
    /// Unknown token kept verbatim because missing languages are ignored;
    /// tokenization is skipped.
    Suppressed(String),
}

const LANGUAGE_PREFIX: &str = "language-";

/// Extracts the declared language token from a code element's class list.
///
/// The `language-` prefix matches case-insensitively; the token itself
/// keeps its case for the engine's alias lookup.
pub fn language_token(element: &Element) -> Option<&str> {
    for class in &element.classes {
        if let Some(prefix) = class.get(..LANGUAGE_PREFIX.len())
            && prefix.eq_ignore_ascii_case(LANGUAGE_PREFIX)
        {
            let token = &class[LANGUAGE_PREFIX.len()..];
            if !token.is_empty() {
                return Some(token);
            }
        }
    }
    None
}

/// Splits a declared token into the grammar to tokenize with and whether
/// the block is in diff mode (`diff` itself, or `diff-<inner>` which
/// tokenizes with `<inner>`'s grammar).
pub(crate) fn tokenization_target(token: &str) -> (&str, bool) {
    match token.strip_prefix("diff-") {
        Some(inner) if !inner.is_empty() => (inner, true),
        _ if token == "diff" => (token, true),
        _ => (token, false),
    }
}
