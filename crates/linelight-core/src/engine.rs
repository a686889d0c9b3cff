use crate::tree::Node;

/// Boundary to the external tokenizer.
///
/// Implementations must return a tree whose concatenated text content
/// reproduces `text` byte-for-byte, newlines included; the segmenter
/// relies on that to keep line counts stable.
pub trait HighlightEngine {
    /// Resolves a language token or alias to the engine's canonical
    /// identifier, or `None` when the engine does not know the token.
    fn resolve_language(&self, token: &str) -> Option<String>;

    /// Tokenizes `text` as `language` into nested token spans.
    fn highlight(&self, text: &str, language: &str) -> Vec<Node>;
}
