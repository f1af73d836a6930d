//! Paste sanitization.
//!
//! External markup is filtered down to the allowed vocabulary: comments,
//! scripts, and styles are dropped outright, doubled annotations collapse,
//! unknown elements are unwrapped (their children kept), and disallowed
//! attributes vanish. The survivor is denormalized so the native commands
//! treat it like content they produced themselves. Unknown markup is never
//! an error — the result is always a best-effort cleaned fragment.

use super::{CODE_MARKER_CLASS, desemantify::desemantify};
use crate::dom::{Element, Fragment, Node, Tag};

/// Sanitize a raw markup string captured from the clipboard side channel.
///
/// `annotation_active` is whether an inline annotation command is active at
/// the insertion point; matching presentational markers are stripped from
/// the paste then, so pasting cannot silently extend or contradict the
/// active annotation. Returns `None` when nothing insertable remains.
pub fn sanitize_paste(
    markup: &str,
    code_font_family: &str,
    annotation_active: bool,
) -> Option<String> {
    let fragment = Fragment::parse(markup);
    let nodes = strip_forbidden(fragment.children);
    let nodes = collapse_nested_annotations(nodes, AnnotationSet::default());
    let nodes = whitelist_rewrite(nodes);
    let fragment = desemantify(&Fragment::new(nodes), code_font_family);
    let fragment = if annotation_active {
        strip_presentational(fragment)
    } else {
        fragment
    };
    let html = fragment.to_html();
    if html.trim().is_empty() {
        None
    } else {
        Some(html)
    }
}

/// Comments and script/style subtrees are removed, content included.
fn strip_forbidden(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            Node::Comment(_) => {}
            Node::Element(el) if el.tag.is_raw_text() => {}
            Node::Element(mut el) => {
                el.children = strip_forbidden(el.children);
                out.push(Node::Element(el));
            }
            other => out.push(other),
        }
    }
    out
}

/// Annotation categories for duplicate collapsing: presentational and
/// semantic variants of the same annotation count as one category.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Category {
    Emphasis,
    Strong,
    Code,
    Link,
}

fn category(tag: &Tag) -> Option<Category> {
    match tag {
        Tag::Em | Tag::I => Some(Category::Emphasis),
        Tag::Strong | Tag::B => Some(Category::Strong),
        Tag::Code => Some(Category::Code),
        Tag::A => Some(Category::Link),
        _ => None,
    }
}

#[derive(Clone, Copy, Default)]
struct AnnotationSet {
    emphasis: bool,
    strong: bool,
    code: bool,
    link: bool,
}

impl AnnotationSet {
    fn contains(&self, cat: Category) -> bool {
        match cat {
            Category::Emphasis => self.emphasis,
            Category::Strong => self.strong,
            Category::Code => self.code,
            Category::Link => self.link,
        }
    }

    fn with(mut self, cat: Category) -> AnnotationSet {
        match cat {
            Category::Emphasis => self.emphasis = true,
            Category::Strong => self.strong = true,
            Category::Code => self.code = true,
            Category::Link => self.link = true,
        }
        self
    }
}

/// An annotation element nested under another of the same category is
/// unwrapped; authoring tools produce doubled wrappers routinely.
fn collapse_nested_annotations(nodes: Vec<Node>, seen: AnnotationSet) -> Vec<Node> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            Node::Element(mut el) => match category(&el.tag) {
                Some(cat) if seen.contains(cat) => {
                    out.extend(collapse_nested_annotations(el.children, seen));
                }
                Some(cat) => {
                    el.children = collapse_nested_annotations(el.children, seen.with(cat));
                    out.push(Node::Element(el));
                }
                None => {
                    el.children = collapse_nested_annotations(el.children, seen);
                    out.push(Node::Element(el));
                }
            },
            other => out.push(other),
        }
    }
    out
}

fn allowed_attrs(tag: &Tag) -> &'static [&'static str] {
    match tag {
        Tag::A => &["href"],
        _ => &[],
    }
}

fn is_allowed(tag: &Tag) -> bool {
    matches!(
        tag,
        Tag::P
            | Tag::Ul
            | Tag::Ol
            | Tag::Li
            | Tag::Strong
            | Tag::Code
            | Tag::Em
            | Tag::B
            | Tag::I
            | Tag::A
    )
}

/// Children first, so nested disallowed markup is already resolved when an
/// element is rebuilt. Allowed elements are rebuilt clean with only their
/// whitelisted attributes; our own code-font markers pass through; anything
/// else is unwrapped.
fn whitelist_rewrite(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            Node::Element(mut el) => {
                el.children = whitelist_rewrite(el.children);
                if el.tag == Tag::Font && el.has_class(CODE_MARKER_CLASS) {
                    out.push(Node::Element(el));
                } else if is_allowed(&el.tag) {
                    let mut clean = Element::new(el.tag.clone()).with_children(el.children);
                    clean.id = el.id;
                    for name in allowed_attrs(&el.tag) {
                        if let Some(value) = el.attrs.iter().find(|a| a.name == *name) {
                            clean.set_attr(name, &value.value);
                        }
                    }
                    out.push(Node::Element(clean));
                } else {
                    out.extend(el.children);
                }
            }
            Node::Comment(_) => {}
            other => out.push(other),
        }
    }
    out
}

/// Remove presentational markers from a fragment, keeping their children.
/// Applied to pastes landing inside an active annotation.
fn strip_presentational(fragment: Fragment) -> Fragment {
    fn strip(nodes: Vec<Node>) -> Vec<Node> {
        let mut out = Vec::new();
        for node in nodes {
            match node {
                Node::Element(mut el) => {
                    el.children = strip(el.children);
                    if matches!(el.tag, Tag::B | Tag::I | Tag::Font) {
                        out.extend(el.children);
                    } else {
                        out.push(Node::Element(el));
                    }
                }
                other => out.push(other),
            }
        }
        out
    }
    Fragment::new(strip(fragment.children))
}
