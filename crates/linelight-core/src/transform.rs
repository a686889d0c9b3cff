use thiserror::Error;
use tracing::{debug, trace};

use crate::annotate::annotate_lines;
use crate::engine::HighlightEngine;
use crate::language::{Language, language_token, tokenization_target};
use crate::meta::parse_meta;
use crate::segment::split_lines;
use crate::tree::{Element, Node, text_content};

/// Marker class appended to every processed code element.
pub const CODE_HIGHLIGHT_CLASS: &str = "code-highlight";

// The fence processor hands the meta string over out-of-band, as an
// attribute on the code element; it is consumed and removed here.
const META_ATTR: &str = "data-meta";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// Treat unknown languages as plain text instead of failing.
    pub ignore_missing: bool,
    /// Force line-number attributes on for every block, meta string or not.
    pub show_line_numbers: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HighlightError {
    #[error("unknown language `{0}`")]
    UnknownLanguage(String),
}

/// Decorates every `<pre><code>` pair found in `nodes`, in place: token
/// spans from the engine, one `code-line` wrapper per physical source
/// line, and highlight/line-number markers from each block's meta string.
///
/// The first unknown language aborts the whole transformation unless
/// `ignore_missing` is set; everything processed so far keeps its result.
pub fn highlight_tree(
    nodes: &mut [Node],
    engine: &dyn HighlightEngine,
    options: &Options,
) -> Result<(), HighlightError> {
    for node in nodes.iter_mut() {
        let Node::Element(element) = node else {
            continue;
        };
        if element.tag == "pre" {
            for child in element.children.iter_mut() {
                if let Node::Element(code) = child
                    && code.tag == "code"
                {
                    highlight_code_element(code, engine, options)?;
                }
            }
        } else {
            highlight_tree(&mut element.children, engine, options)?;
        }
    }
    Ok(())
}

/// Runs the full pipeline on a single code element.
pub fn highlight_code_element(
    code: &mut Element,
    engine: &dyn HighlightEngine,
    options: &Options,
) -> Result<(), HighlightError> {
    let meta = code.remove_attr(META_ATTR);
    let mut spec = parse_meta(meta.as_deref());
    if options.show_line_numbers {
        spec.show_line_numbers = true;
    }

    let (language, diff) = resolve_language(code, engine, options)?;
    let raw_text = text_content(&code.children);

    let highlighted = match &language {
        Language::Resolved(canonical) => engine.highlight(&raw_text, canonical),
        Language::Plain | Language::Suppressed(_) => {
            if raw_text.is_empty() {
                Vec::new()
            } else {
                vec![Node::Text(raw_text.clone())]
            }
        }
    };

    let fragments = split_lines(highlighted);
    debug_assert_eq!(
        fragments.len(),
        expected_line_count(&raw_text),
        "engine altered the text it was given"
    );
    trace!(lines = fragments.len(), language = ?language, "segmented code block");

    // The new children are built fully before the swap, so a failure above
    // leaves the original tree untouched.
    code.add_class(CODE_HIGHLIGHT_CLASS);
    code.children = annotate_lines(fragments, &spec, diff);
    Ok(())
}

fn resolve_language(
    code: &Element,
    engine: &dyn HighlightEngine,
    options: &Options,
) -> Result<(Language, bool), HighlightError> {
    let Some(token) = language_token(code) else {
        return Ok((Language::Plain, false));
    };
    let (lookup, diff) = tokenization_target(token);
    match engine.resolve_language(lookup) {
        Some(canonical) => {
            debug!(token, canonical = canonical.as_str(), "resolved code language");
            Ok((Language::Resolved(canonical), diff))
        }
        None if options.ignore_missing => {
            debug!(token, "unknown code language suppressed");
            Ok((Language::Suppressed(token.to_string()), diff))
        }
        None => Err(HighlightError::UnknownLanguage(token.to_string())),
    }
}

fn expected_line_count(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.split('\n').count()
    }
}
