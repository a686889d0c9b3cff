use linelight_core::{Element, HighlightEngine, Node};
use once_cell::sync::Lazy;
use syntect::easy::ScopeRegionIterator;
use syntect::parsing::{ParseState, Scope, ScopeStack, SyntaxSet};
use syntect::util::LinesWithEndings;

// Syntax definitions are expensive to load, so the extended set is built
// once per process and shared by every engine instance.
static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(two_face::syntax::extra_newlines);

/// `HighlightEngine` backed by syntect's TextMate grammars.
///
/// Canonical language identifiers are syntax definition names (`py`
/// resolves to `Python`); lookup goes through syntect's token matching,
/// which covers names, aliases, and file extensions case-insensitively.
/// Output is class-annotated token spans; styling is left to a stylesheet.
#[derive(Clone, Copy, Debug)]
pub struct SyntectEngine {
    syntaxes: &'static SyntaxSet,
}

impl SyntectEngine {
    pub fn new() -> Self {
        Self {
            syntaxes: &SYNTAXES,
        }
    }
}

impl Default for SyntectEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HighlightEngine for SyntectEngine {
    fn resolve_language(&self, token: &str) -> Option<String> {
        self.syntaxes
            .find_syntax_by_token(token)
            .map(|syntax| syntax.name.clone())
    }

    fn highlight(&self, text: &str, language: &str) -> Vec<Node> {
        let Some(syntax) = self.syntaxes.find_syntax_by_name(language) else {
            return plain(text);
        };
        let mut state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut nodes = Vec::new();
        for line in LinesWithEndings::from(text) {
            let Ok(ops) = state.parse_line(line, self.syntaxes) else {
                // The grammar gave up mid-block; keep the line verbatim so
                // the segmenter still sees every character.
                push_text(&mut nodes, line);
                continue;
            };
            for (piece, op) in ScopeRegionIterator::new(&ops, line) {
                if stack.apply(op).is_err() {
                    push_text(&mut nodes, piece);
                    continue;
                }
                if piece.is_empty() {
                    continue;
                }
                match token_class(&stack) {
                    Some(kind) => nodes.push(token_span(kind, piece)),
                    None => push_text(&mut nodes, piece),
                }
            }
        }
        nodes
    }
}

// TextMate scope prefix -> emitted token class. First match wins, so the
// more specific prefixes sit above the ones they refine.
const SCOPE_CLASSES: &[(&str, &str)] = &[
    ("comment", "comment"),
    ("string", "string"),
    ("constant.numeric", "number"),
    ("constant.character", "string"),
    ("constant", "constant"),
    ("entity.name.function", "function"),
    ("entity.name.type", "class-name"),
    ("entity.name.tag", "tag"),
    ("entity.other.attribute-name", "attr-name"),
    ("support.function", "function"),
    ("support.type", "class-name"),
    ("support.class", "class-name"),
    ("storage.type", "keyword"),
    ("storage.modifier", "keyword"),
    ("keyword.operator", "operator"),
    ("keyword", "keyword"),
    ("variable.parameter", "parameter"),
    ("variable", "variable"),
    ("punctuation", "punctuation"),
    ("markup.inserted", "inserted"),
    ("markup.deleted", "deleted"),
];

/// Innermost scope wins, mirroring how editors pick the most specific
/// TextMate scope when styling.
fn token_class(stack: &ScopeStack) -> Option<&'static str> {
    stack.as_slice().iter().rev().find_map(class_for_scope)
}

fn class_for_scope(scope: &Scope) -> Option<&'static str> {
    let name = scope.build_string();
    SCOPE_CLASSES
        .iter()
        .find_map(|(prefix, class)| name.starts_with(prefix).then_some(*class))
}

fn token_span(kind: &str, piece: &str) -> Node {
    let mut span = Element::new("span").with_class("token");
    span.add_class(kind);
    span.children.push(Node::Text(piece.to_string()));
    Node::Element(span)
}

fn push_text(nodes: &mut Vec<Node>, piece: &str) {
    if piece.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = nodes.last_mut() {
        last.push_str(piece);
    } else {
        nodes.push(Node::Text(piece.to_string()));
    }
}

fn plain(text: &str) -> Vec<Node> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Node::Text(text.to_string())]
    }
}

#[cfg(test)]
mod tests {
    use super::SyntectEngine;
    use linelight_core::{HighlightEngine, Node, text_content};

    #[test]
    fn unknown_canonical_name_degrades_to_plain_text() {
        let engine = SyntectEngine::new();
        let nodes = engine.highlight("x\n", "No Such Grammar");
        assert_eq!(nodes, vec![Node::text("x\n")]);
    }

    #[test]
    fn adjacent_plain_pieces_are_merged() {
        let engine = SyntectEngine::new();
        let nodes = engine.highlight("x y z\n", "Plain Text");
        assert_eq!(text_content(&nodes), "x y z\n");
        let text_runs = nodes
            .iter()
            .filter(|node| matches!(node, Node::Text(_)))
            .count();
        assert_eq!(text_runs, 1);
    }
}
