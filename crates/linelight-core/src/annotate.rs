use crate::meta::RangeSpec;
use crate::segment::LineFragment;
use crate::tree::{Element, Node};

/// Wraps each fragment in its `code-line` container, in order.
///
/// Lines listed in the range spec gain the `highlight-line` marker; when
/// line numbers are on, every wrapper carries a `line` attribute counting
/// up from the spec's starting number. In diff mode a line whose text
/// starts with `+` or `-` is marked as an insertion or deletion.
pub fn annotate_lines(fragments: Vec<LineFragment>, spec: &RangeSpec, diff: bool) -> Vec<Node> {
    fragments
        .into_iter()
        .enumerate()
        .map(|(index, fragment)| {
            let mut wrapper = Element::new("span").with_class("code-line");
            if spec.highlighted_lines.contains(&(index + 1)) {
                wrapper.add_class("highlight-line");
            }
            if spec.show_line_numbers {
                wrapper.set_attr("line", (spec.line_number_start + index).to_string());
            }
            if diff {
                match leading_char(&fragment) {
                    Some('+') => mark_diff(&mut wrapper, "add"),
                    Some('-') => mark_diff(&mut wrapper, "del"),
                    _ => {}
                }
            }
            wrapper.children = fragment;
            Node::Element(wrapper)
        })
        .collect()
}

fn mark_diff(wrapper: &mut Element, kind: &str) {
    wrapper.add_class("diff");
    wrapper.add_class(kind);
    wrapper.set_attr("data-diff", kind);
}

fn leading_char(nodes: &[Node]) -> Option<char> {
    for node in nodes {
        let found = match node {
            Node::Text(content) => content.chars().next(),
            Node::Element(element) => leading_char(&element.children),
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::annotate_lines;
    use crate::meta::{RangeSpec, parse_meta};
    use crate::tree::{Node, text_content};

    #[test]
    fn numbering_counts_from_the_configured_start() {
        let spec = parse_meta(Some("showLineNumbers=5"));
        let wrapped = annotate_lines(
            vec![vec![Node::text("a\n")], vec![Node::text("b")]],
            &spec,
            false,
        );
        let numbers: Vec<_> = wrapped
            .iter()
            .map(|node| match node {
                Node::Element(element) => element.attr("line").map(str::to_string),
                Node::Text(_) => None,
            })
            .collect();
        assert_eq!(numbers, vec![Some("5".to_string()), Some("6".to_string())]);
    }

    #[test]
    fn line_attribute_is_absent_when_numbers_are_off() {
        let wrapped = annotate_lines(vec![vec![Node::text("a")]], &RangeSpec::default(), false);
        let Node::Element(wrapper) = &wrapped[0] else {
            panic!("expected element");
        };
        assert_eq!(wrapper.attr("line"), None);
        assert!(wrapper.has_class("code-line"));
    }

    #[test]
    fn diff_lines_are_marked_by_their_leading_character() {
        let fragments = vec![
            vec![Node::text("+new\n")],
            vec![Node::text("-old\n")],
            vec![Node::text(" same\n")],
        ];
        let wrapped = annotate_lines(fragments, &RangeSpec::default(), true);
        let classes: Vec<Vec<String>> = wrapped
            .iter()
            .map(|node| match node {
                Node::Element(element) => element.classes.clone(),
                Node::Text(_) => Vec::new(),
            })
            .collect();
        assert_eq!(classes[0], vec!["code-line", "diff", "add"]);
        assert_eq!(classes[1], vec!["code-line", "diff", "del"]);
        assert_eq!(classes[2], vec!["code-line"]);
        assert_eq!(
            text_content(&wrapped),
            "+new\n-old\n same\n",
            "wrappers must not change the text"
        );
    }
}
