mod annotate;
mod emit;
mod engine;
mod language;
mod meta;
mod segment;
mod transform;
mod tree;

pub use annotate::annotate_lines;
pub use emit::{to_html, to_html_sanitized};
pub use engine::HighlightEngine;
pub use language::{Language, language_token};
pub use meta::{RangeSpec, parse_meta};
pub use segment::{LineFragment, split_lines};
pub use transform::{
    CODE_HIGHLIGHT_CLASS, HighlightError, Options, highlight_code_element, highlight_tree,
};
pub use tree::{Element, Node, text_content};
