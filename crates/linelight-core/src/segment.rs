use std::mem;

use crate::tree::{Element, Node};

/// The markup belonging to exactly one physical source line, terminating
/// newline included. Produced here, consumed by the annotator.
pub type LineFragment = Vec<Node>;

/// Re-partitions a highlighted tree into one fragment per `\n`-delimited
/// record of the underlying text.
///
/// Ancestor spans never cross a line boundary: at every split the open
/// elements are closed and replayed as fresh copies on the next line, so
/// the fragments concatenate back to the input byte-for-byte while every
/// token span keeps its class and attribute set on both sides of the
/// split. `k` newlines produce `k + 1` fragments; an ancestor that is
/// empty on one side of a split still appears as an empty wrapper there.
/// Empty input produces no fragments at all.
pub fn split_lines(nodes: Vec<Node>) -> Vec<LineFragment> {
    if nodes.iter().map(Node::text_len).sum::<usize>() == 0 {
        return Vec::new();
    }
    let mut splitter = Splitter {
        lines: Vec::new(),
        line: Vec::new(),
        open: Vec::new(),
    };
    for node in nodes {
        splitter.walk(node);
    }
    splitter.finish()
}

/// Class/attribute set of an open ancestor element. Replayed as a fresh,
/// independent `Element` at the start of every line the ancestor spans;
/// the original node is never shared across lines.
#[derive(Clone)]
struct SpanDescriptor {
    tag: String,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
}

struct Frame {
    descriptor: SpanDescriptor,
    children: Vec<Node>,
}

impl Frame {
    fn open(descriptor: SpanDescriptor) -> Self {
        Self {
            descriptor,
            children: Vec::new(),
        }
    }

    fn into_element(self) -> Element {
        Element {
            tag: self.descriptor.tag,
            classes: self.descriptor.classes,
            attrs: self.descriptor.attrs,
            children: self.children,
        }
    }
}

struct Splitter {
    lines: Vec<LineFragment>,
    // Top-level nodes of the line being accumulated.
    line: Vec<Node>,
    // Open ancestor copies, outermost first.
    open: Vec<Frame>,
}

impl Splitter {
    fn walk(&mut self, node: Node) {
        match node {
            Node::Text(content) => self.push_text(&content),
            Node::Element(element) => {
                let Element {
                    tag,
                    classes,
                    attrs,
                    children,
                } = element;
                self.open.push(Frame::open(SpanDescriptor { tag, classes, attrs }));
                for child in children {
                    self.walk(child);
                }
                // The element ends here; its current copy closes for good.
                if let Some(frame) = self.open.pop() {
                    self.push(Node::Element(frame.into_element()));
                }
            }
        }
    }

    fn push(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(frame) => frame.children.push(node),
            None => self.line.push(node),
        }
    }

    fn push_text(&mut self, content: &str) {
        let mut rest = content;
        while let Some(pos) = rest.find('\n') {
            // The newline stays with the line being closed.
            let (head, tail) = rest.split_at(pos + 1);
            self.push(Node::Text(head.to_string()));
            self.end_line();
            rest = tail;
        }
        if !rest.is_empty() {
            self.push(Node::Text(rest.to_string()));
        }
    }

    fn end_line(&mut self) {
        let descriptors: Vec<SpanDescriptor> = self
            .open
            .iter()
            .map(|frame| frame.descriptor.clone())
            .collect();
        while let Some(frame) = self.open.pop() {
            let element = Node::Element(frame.into_element());
            match self.open.last_mut() {
                Some(parent) => parent.children.push(element),
                None => self.line.push(element),
            }
        }
        self.lines.push(mem::take(&mut self.line));
        self.open = descriptors.into_iter().map(Frame::open).collect();
    }

    fn finish(mut self) -> Vec<LineFragment> {
        // The walk is balanced, so only the root accumulator remains open.
        self.lines.push(self.line);
        self.lines
    }
}
