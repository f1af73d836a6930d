//! Owned HTML node tree.
//!
//! The editable region is modeled as a [`Fragment`]: an owned tree of
//! elements, text, and comments. Structural transforms never mutate a tree
//! in place — they rebuild child vectors and return a new tree — but every
//! node carries a stable [`NodeId`] that survives any transform which keeps
//! the node, so selection endpoints can be re-validated after a rewrite.

pub mod parser;
pub mod serialize;

use serde::Serialize;
use uuid::Uuid;

/// Stable identity of a node, preserved across tree rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn fresh() -> Self {
        NodeId(Uuid::new_v4())
    }
}

/// Element names the engine distinguishes. Anything else is `Other` and
/// carries its lowercased name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    P,
    Ul,
    Ol,
    Li,
    Strong,
    Em,
    Code,
    A,
    B,
    I,
    Font,
    Div,
    Span,
    Br,
    Script,
    Style,
    Other(String),
}

impl Tag {
    pub fn parse(name: &str) -> Tag {
        match name.to_ascii_lowercase().as_str() {
            "p" => Tag::P,
            "ul" => Tag::Ul,
            "ol" => Tag::Ol,
            "li" => Tag::Li,
            "strong" => Tag::Strong,
            "em" => Tag::Em,
            "code" => Tag::Code,
            "a" => Tag::A,
            "b" => Tag::B,
            "i" => Tag::I,
            "font" => Tag::Font,
            "div" => Tag::Div,
            "span" => Tag::Span,
            "br" => Tag::Br,
            "script" => Tag::Script,
            "style" => Tag::Style,
            other => Tag::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Tag::P => "p",
            Tag::Ul => "ul",
            Tag::Ol => "ol",
            Tag::Li => "li",
            Tag::Strong => "strong",
            Tag::Em => "em",
            Tag::Code => "code",
            Tag::A => "a",
            Tag::B => "b",
            Tag::I => "i",
            Tag::Font => "font",
            Tag::Div => "div",
            Tag::Span => "span",
            Tag::Br => "br",
            Tag::Script => "script",
            Tag::Style => "style",
            Tag::Other(name) => name,
        }
    }

    /// Block-level tags of the canonical vocabulary.
    pub fn is_block(&self) -> bool {
        matches!(self, Tag::P | Tag::Ul | Tag::Ol)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Tag::Ul | Tag::Ol)
    }

    /// Elements that never carry children.
    pub fn is_void(&self) -> bool {
        matches!(self, Tag::Br)
    }

    /// Elements whose content is raw text until the matching close tag.
    pub fn is_raw_text(&self) -> bool {
        matches!(self, Tag::Script | Tag::Style)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub id: NodeId,
    pub tag: Tag,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: Tag) -> Element {
        Element {
            id: NodeId::fresh(),
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Element {
        self.children = children;
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Element {
        self.set_attr(name, value);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
            attr.value = value.to_string();
        } else {
            self.attrs.push(Attr {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }

    /// Whether the `class` attribute contains the given class name.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|v| v.split_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let value = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr("class", &value);
    }
}

#[derive(Debug, Clone)]
pub struct Text {
    pub id: NodeId,
    pub text: String,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Text {
        Text {
            id: NodeId::fresh(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: NodeId,
    pub text: String,
}

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(Text),
    Comment(Comment),
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Element(el) => el.id,
            Node::Text(t) => t.id,
            Node::Comment(c) => c.id,
        }
    }

    pub fn element(tag: Tag) -> Node {
        Node::Element(Element::new(tag))
    }

    pub fn text(text: impl Into<String>) -> Node {
        Node::Text(Text::new(text))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_tag(&self, tag: &Tag) -> bool {
        matches!(self, Node::Element(el) if el.tag == *tag)
    }

    /// A text node consisting only of whitespace (including NBSP filler).
    pub fn is_whitespace_text(&self) -> bool {
        matches!(self, Node::Text(t) if t.text.chars().all(char::is_whitespace))
    }

    /// Length used when clamping a selection offset to this node: character
    /// count for text, child count for elements.
    pub fn selection_len(&self) -> usize {
        match self {
            Node::Text(t) => t.text.chars().count(),
            Node::Element(el) => el.children.len(),
            Node::Comment(_) => 0,
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&t.text),
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
            Node::Comment(_) => {}
        }
    }
}

/// A parentless sequence of sibling nodes — the contents of the editable
/// region, or of a pasted snippet.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    pub children: Vec<Node>,
}

impl Fragment {
    pub fn new(children: Vec<Node>) -> Fragment {
        Fragment { children }
    }

    /// Parse markup permissively; never fails.
    pub fn parse(html: &str) -> Fragment {
        parser::parse_fragment(html)
    }

    pub fn to_html(&self) -> String {
        serialize::to_html(self)
    }

    /// Concatenated text content, comments excluded.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    pub fn is_blank(&self) -> bool {
        self.text().chars().all(char::is_whitespace)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Depth-first lookup by identity.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        fn walk(nodes: &[Node], id: NodeId) -> Option<&Node> {
            for node in nodes {
                if node.id() == id {
                    return Some(node);
                }
                if let Node::Element(el) = node
                    && let Some(found) = walk(&el.children, id)
                {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.children, id)
    }
}
