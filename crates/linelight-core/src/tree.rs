/// One node of a markup fragment: an element or a literal text run.
///
/// A parent owns its children exclusively; the tree has no sharing and no
/// cycles, so splitting and rebuilding never needs back-references.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    // Insertion order is preserved so emission stays deterministic.
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    /// Adds `class` unless it is already present.
    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.classes.iter().any(|existing| *existing == class) {
            self.classes.push(class);
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|existing| existing == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.attrs.iter_mut().find(|(key, _)| *key == name) {
            entry.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(key, _)| key == name)?;
        Some(self.attrs.remove(index).1)
    }
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    /// Appends the literal text of this subtree to `out`, tags ignored.
    pub fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(content) => out.push_str(content),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    pub fn text_len(&self) -> usize {
        match self {
            Node::Text(content) => content.len(),
            Node::Element(element) => element.children.iter().map(Node::text_len).sum(),
        }
    }
}

pub fn text_content(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.collect_text(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{Element, Node, text_content};

    #[test]
    fn add_class_is_idempotent() {
        let mut element = Element::new("code");
        element.add_class("code-highlight");
        element.add_class("code-highlight");
        assert_eq!(element.classes, vec!["code-highlight".to_string()]);
    }

    #[test]
    fn text_content_walks_nested_elements() {
        let inner = Element::new("span").with_class("token");
        let mut inner = inner;
        inner.children.push(Node::text("a"));
        let mut outer = Element::new("span");
        outer.children.push(Node::Element(inner));
        outer.children.push(Node::text("b"));
        let nodes = vec![Node::Element(outer), Node::text("c")];
        assert_eq!(text_content(&nodes), "abc");
    }
}
