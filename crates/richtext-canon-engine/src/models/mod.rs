//! The canonical semantic tree.
//!
//! [`ContentNode`] is the typed view of a normalized region: paragraphs and
//! lists of inline runs, nothing else. Trees are materialized transiently
//! on every read and discarded after use; nothing here caches.

use serde::{Deserialize, Serialize};

use crate::dom::{Element, Fragment, Node, Tag};

/// Inline annotation of a run. Emphasis, strong, and code are mutually
/// exclusive on any given run; link composes at the markup level but is
/// applied and removed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationKind {
    None,
    Emphasis,
    Strong,
    Code,
    Link,
}

/// A maximal run of identically-annotated text.
///
/// Two runs with different annotations are never merged, and nested
/// same-kind annotations collapse to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineRun {
    pub text: String,
    pub annotation: AnnotationKind,
    pub href: Option<String>,
}

impl InlineRun {
    pub fn plain(text: impl Into<String>) -> InlineRun {
        InlineRun {
            text: text.into(),
            annotation: AnnotationKind::None,
            href: None,
        }
    }

    pub fn annotated(text: impl Into<String>, annotation: AnnotationKind) -> InlineRun {
        InlineRun {
            text: text.into(),
            annotation,
            href: None,
        }
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> InlineRun {
        InlineRun {
            text: text.into(),
            annotation: AnnotationKind::Link,
            href: Some(href.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub children: Vec<ItemNode>,
}

/// A list item holds inline runs and, for nested lists, whole sublists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemNode {
    Run(InlineRun),
    List(List),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentNode {
    Paragraph(Vec<InlineRun>),
    List(List),
}

/// Inline context while flattening a subtree into runs.
#[derive(Clone, Default)]
struct RunContext {
    inline: Option<AnnotationKind>,
    in_link: bool,
    href: Option<String>,
}

impl RunContext {
    fn annotation(&self) -> AnnotationKind {
        match self.inline {
            Some(kind) => kind,
            None if self.in_link => AnnotationKind::Link,
            None => AnnotationKind::None,
        }
    }
}

/// Materialize the typed tree from a semantified fragment.
pub fn from_fragment(fragment: &Fragment) -> Vec<ContentNode> {
    let mut out = Vec::new();
    let mut loose: Vec<InlineRun> = Vec::new();
    for node in &fragment.children {
        match node {
            Node::Element(el) if el.tag == Tag::P => {
                flush_loose(&mut out, &mut loose);
                out.push(ContentNode::Paragraph(runs_of(&el.children)));
            }
            Node::Element(el) if el.tag.is_list() => {
                flush_loose(&mut out, &mut loose);
                out.push(ContentNode::List(list_of(el)));
            }
            node if node.is_whitespace_text() => {}
            node => collect_runs(node, &RunContext::default(), &mut loose),
        }
    }
    flush_loose(&mut out, &mut loose);
    out
}

fn flush_loose(out: &mut Vec<ContentNode>, loose: &mut Vec<InlineRun>) {
    if !loose.is_empty() {
        out.push(ContentNode::Paragraph(std::mem::take(loose)));
    }
}

fn runs_of(children: &[Node]) -> Vec<InlineRun> {
    let mut runs = Vec::new();
    for child in children {
        collect_runs(child, &RunContext::default(), &mut runs);
    }
    runs
}

fn collect_runs(node: &Node, ctx: &RunContext, out: &mut Vec<InlineRun>) {
    match node {
        Node::Text(t) => push_run(out, &t.text, ctx),
        Node::Comment(_) => {}
        Node::Element(el) => {
            let ctx = match el.tag {
                Tag::Em => ctx_with(ctx, AnnotationKind::Emphasis),
                Tag::Strong => ctx_with(ctx, AnnotationKind::Strong),
                Tag::Code => ctx_with(ctx, AnnotationKind::Code),
                Tag::A => RunContext {
                    inline: ctx.inline,
                    in_link: true,
                    href: el.attr("href").map(str::to_string).or_else(|| ctx.href.clone()),
                },
                Tag::Br => {
                    push_run(out, "\n", ctx);
                    return;
                }
                _ => ctx.clone(),
            };
            for child in &el.children {
                collect_runs(child, &ctx, out);
            }
        }
    }
}

fn ctx_with(ctx: &RunContext, kind: AnnotationKind) -> RunContext {
    RunContext {
        inline: Some(kind),
        in_link: ctx.in_link,
        href: ctx.href.clone(),
    }
}

fn push_run(out: &mut Vec<InlineRun>, text: &str, ctx: &RunContext) {
    if text.is_empty() {
        return;
    }
    let annotation = ctx.annotation();
    if let Some(last) = out.last_mut()
        && last.annotation == annotation
        && last.href == ctx.href
    {
        last.text.push_str(text);
        return;
    }
    out.push(InlineRun {
        text: text.to_string(),
        annotation,
        href: ctx.href.clone(),
    });
}

fn list_of(el: &Element) -> List {
    let mut items = Vec::new();
    for child in &el.children {
        match child {
            Node::Element(li) if li.tag == Tag::Li => {
                items.push(ListItem {
                    children: item_children(&li.children),
                });
            }
            // A list directly under a list is repaired upstream; if one
            // slips through, keep its content in a synthetic item.
            Node::Element(nested) if nested.tag.is_list() => {
                items.push(ListItem {
                    children: vec![ItemNode::List(list_of(nested))],
                });
            }
            _ => {}
        }
    }
    List {
        ordered: el.tag == Tag::Ol,
        items,
    }
}

fn item_children(children: &[Node]) -> Vec<ItemNode> {
    let mut out = Vec::new();
    let mut runs: Vec<InlineRun> = Vec::new();
    for child in children {
        match child {
            Node::Element(el) if el.tag.is_list() => {
                out.extend(runs.drain(..).map(ItemNode::Run));
                out.push(ItemNode::List(list_of(el)));
            }
            node => collect_runs(node, &RunContext::default(), &mut runs),
        }
    }
    out.extend(runs.drain(..).map(ItemNode::Run));
    out
}

/// Build the canonical DOM form of a typed tree.
pub fn to_fragment(nodes: &[ContentNode]) -> Fragment {
    let children = nodes
        .iter()
        .map(|node| match node {
            ContentNode::Paragraph(runs) => {
                Node::Element(Element::new(Tag::P).with_children(runs_to_nodes(runs)))
            }
            ContentNode::List(list) => list_to_node(list),
        })
        .collect();
    Fragment::new(children)
}

fn runs_to_nodes(runs: &[InlineRun]) -> Vec<Node> {
    runs.iter().map(run_to_node).collect()
}

fn run_to_node(run: &InlineRun) -> Node {
    let inner = Node::text(run.text.clone());
    let annotated = match run.annotation {
        AnnotationKind::Emphasis => wrap(Tag::Em, inner),
        AnnotationKind::Strong => wrap(Tag::Strong, inner),
        AnnotationKind::Code => wrap(Tag::Code, inner),
        AnnotationKind::None | AnnotationKind::Link => inner,
    };
    match &run.href {
        Some(href) => Node::Element(
            Element::new(Tag::A)
                .with_attr("href", href)
                .with_children(vec![annotated]),
        ),
        None if run.annotation == AnnotationKind::Link => {
            Node::Element(Element::new(Tag::A).with_children(vec![annotated]))
        }
        None => annotated,
    }
}

fn wrap(tag: Tag, child: Node) -> Node {
    Node::Element(Element::new(tag).with_children(vec![child]))
}

fn list_to_node(list: &List) -> Node {
    let tag = if list.ordered { Tag::Ol } else { Tag::Ul };
    let items = list
        .items
        .iter()
        .map(|item| {
            let children = item
                .children
                .iter()
                .map(|child| match child {
                    ItemNode::Run(run) => run_to_node(run),
                    ItemNode::List(nested) => list_to_node(nested),
                })
                .collect();
            Node::Element(Element::new(Tag::Li).with_children(children))
        })
        .collect();
    Node::Element(Element::new(tag).with_children(items))
}
