use ammonia::Builder;
use std::collections::{HashMap, HashSet};

use crate::tree::Node;

/// Serializes nodes to raw HTML.
///
/// Code content is whitespace-exact, so unlike a pretty-printer this
/// writer never inserts indentation or newlines of its own.
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

/// Serializes nodes and sanitizes the result against the tags and
/// attributes this crate emits.
pub fn to_html_sanitized(nodes: &[Node]) -> String {
    let raw_html = to_html(nodes);

    let tags: HashSet<&'static str> = ["pre", "code", "span"].iter().copied().collect();

    let mut generic_attributes: HashSet<&'static str> = HashSet::new();
    generic_attributes.insert("class");

    let mut tag_attributes = HashMap::new();
    tag_attributes.insert(
        "span",
        ["class", "line", "data-diff"].iter().copied().collect(),
    );

    let mut generic_attribute_prefixes = HashSet::new();
    generic_attribute_prefixes.insert("data-");

    Builder::new()
        .tags(tags)
        .generic_attributes(generic_attributes)
        .tag_attributes(tag_attributes)
        .generic_attribute_prefixes(generic_attribute_prefixes)
        .clean(&raw_html)
        .to_string()
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(content) => out.push_str(&escape_html(content)),
        Node::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            if !element.classes.is_empty() {
                out.push_str(" class=\"");
                for (index, class) in element.classes.iter().enumerate() {
                    if index > 0 {
                        out.push(' ');
                    }
                    out.push_str(&escape_attr(class));
                }
                out.push('"');
            }
            for (name, value) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');
            for child in &element.children {
                write_node(out, child);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{to_html, to_html_sanitized};
    use crate::tree::{Element, Node};

    #[test]
    fn text_is_entity_escaped() {
        assert_eq!(to_html(&[Node::text("a < b && c > d")]), "a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn elements_render_classes_then_attrs() {
        let mut span = Element::new("span").with_class("code-line");
        span.add_class("highlight-line");
        span.set_attr("line", "2");
        span.children.push(Node::text("x"));
        assert_eq!(
            to_html(&[Node::Element(span)]),
            "<span class=\"code-line highlight-line\" line=\"2\">x</span>"
        );
    }

    #[test]
    fn sanitizer_drops_tags_outside_the_output_surface() {
        let mut script = Element::new("script");
        script.children.push(Node::text("alert(1)"));
        let mut code = Element::new("code").with_class("code-highlight");
        code.children.push(Node::Element(script));
        code.children
            .push(Node::Element(Element::new("span").with_class("code-line")));
        let clean = to_html_sanitized(&[Node::Element(code)]);
        assert!(!clean.contains("<script"));
        assert!(clean.contains("code-line"));
    }
}
