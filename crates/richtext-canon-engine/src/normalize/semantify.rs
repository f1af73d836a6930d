//! Presentational → semantic rewrite.
//!
//! Seven ordered passes, each a pure rebuild of the node tree and each
//! idempotent on its own output, so running the whole pipeline twice
//! changes nothing. Text nodes are never dropped; only structural wrapper
//! elements are removed or merged.

use super::CODE_MARKER_CLASS;
use crate::dom::{Element, Fragment, Node, Tag};

pub fn semantify(fragment: &Fragment) -> Fragment {
    let nodes = substitute_tags(fragment.children.clone());
    let nodes = collapse_spans(nodes);
    let nodes = dissolve_nested_blocks(nodes);
    let nodes = repair_orphan_lists(nodes);
    let nodes = wrap_loose_content(nodes);
    let nodes = drop_trailing_breaks(nodes);
    let nodes = unwrap_spans(nodes);
    Fragment::new(nodes)
}

/// Pass 1: replace presentational tags with their semantic counterparts.
/// Substituted elements keep their children and drop their attributes.
fn substitute_tags(nodes: Vec<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .map(|node| match node {
            Node::Element(mut el) => {
                el.children = substitute_tags(el.children);
                let semantic = match el.tag {
                    Tag::I => Some(Tag::Em),
                    Tag::B => Some(Tag::Strong),
                    Tag::Div => Some(Tag::P),
                    Tag::Font if el.has_class(CODE_MARKER_CLASS) => Some(Tag::Code),
                    _ => None,
                };
                if let Some(tag) = semantic {
                    el.tag = tag;
                    el.attrs.clear();
                }
                Node::Element(el)
            }
            other => other,
        })
        .collect()
}

/// Pass 2: a span with exactly one child is replaced by that child.
/// Children are processed first, so chains of single-child spans collapse
/// fully in one traversal.
fn collapse_spans(nodes: Vec<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .map(|node| match node {
            Node::Element(mut el) => {
                el.children = collapse_spans(el.children);
                if el.tag == Tag::Span
                    && el.children.len() == 1
                    && let Some(only) = el.children.pop()
                {
                    only
                } else {
                    Node::Element(el)
                }
            }
            other => other,
        })
        .collect()
}

/// Pass 3: a paragraph that directly contains a paragraph or list is
/// dissolved — its children are spliced into its place. Bottom-up, so
/// arbitrarily deep nesting converges in one traversal.
fn dissolve_nested_blocks(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            Node::Element(mut el) => {
                el.children = dissolve_nested_blocks(el.children);
                let contains_block = el
                    .children
                    .iter()
                    .any(|c| c.as_element().is_some_and(|e| e.tag.is_block()));
                if el.tag == Tag::P && contains_block {
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

/// Pass 4: a list that is a direct child of another list is merged into
/// the previous sibling item when one exists, otherwise wrapped in a
/// synthetic item. Lists only ever contain items afterwards.
fn repair_orphan_lists(nodes: Vec<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .map(|node| match node {
            Node::Element(mut el) => {
                el.children = repair_orphan_lists(el.children);
                if el.tag.is_list() {
                    el.children = adopt_orphan_lists(el.children);
                }
                Node::Element(el)
            }
            other => other,
        })
        .collect()
}

fn adopt_orphan_lists(children: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::new();
    for child in children {
        let is_orphan = child.as_element().is_some_and(|e| e.tag.is_list());
        if !is_orphan {
            out.push(child);
            continue;
        }
        match out.iter_mut().rev().find_map(|n| match n {
            Node::Element(el) if el.tag == Tag::Li => Some(el),
            _ => None,
        }) {
            Some(prev_item) => prev_item.children.push(child),
            None => out.push(Node::Element(
                Element::new(Tag::Li).with_children(vec![child]),
            )),
        }
    }
    out
}

/// Pass 5: at the top level, maximal runs of siblings that are neither
/// blocks nor pure whitespace are wrapped in a single new paragraph each,
/// in document order. Existing blocks and whitespace text stay in place
/// and bound the runs.
fn wrap_loose_content(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::new();
    let mut group: Vec<Node> = Vec::new();
    for node in nodes {
        let is_boundary = node.as_element().is_some_and(|e| e.tag.is_block())
            || node.is_whitespace_text();
        if is_boundary {
            flush_group(&mut out, &mut group);
            out.push(node);
        } else {
            group.push(node);
        }
    }
    flush_group(&mut out, &mut group);
    out
}

fn flush_group(out: &mut Vec<Node>, group: &mut Vec<Node>) {
    if !group.is_empty() {
        out.push(Node::Element(
            Element::new(Tag::P).with_children(std::mem::take(group)),
        ));
    }
}

/// Pass 6: remove line breaks hanging at the end of any element (and of
/// the fragment itself). Native commands append trailing breaks with no
/// semantic meaning; removing to fixpoint keeps the pipeline idempotent.
fn drop_trailing_breaks(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = nodes
        .into_iter()
        .map(|node| match node {
            Node::Element(mut el) => {
                el.children = drop_trailing_breaks(el.children);
                Node::Element(el)
            }
            other => other,
        })
        .collect();
    while out.last().is_some_and(|n| n.is_tag(&Tag::Br)) {
        out.pop();
    }
    out
}

/// Pass 7: any surviving span is replaced by its children in place.
fn unwrap_spans(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            Node::Element(mut el) => {
                el.children = unwrap_spans(el.children);
                if el.tag == Tag::Span {
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

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn canon(html: &str) -> String {
        semantify(&Fragment::parse(html)).to_html()
    }

    #[rstest]
    #[case("<i>a</i>", "<p><em>a</em></p>")]
    #[case("<b>a</b>", "<p><strong>a</strong></p>")]
    #[case("<div>a</div>", "<p>a</p>")]
    #[case(
        "<font class=\"canon-code\" face=\"Monaco\">a</font>",
        "<p><code>a</code></p>"
    )]
    fn presentational_tags_become_semantic(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(canon(input), expected);
    }

    #[test]
    fn font_without_marker_class_is_left_alone() {
        assert_eq!(canon("<font face=\"x\">a</font>"), "<p><font face=\"x\">a</font></p>");
    }

    #[test]
    fn single_child_spans_collapse() {
        assert_eq!(canon("<p><span><em>a</em></span></p>"), "<p><em>a</em></p>");
        // Chains collapse in one run.
        assert_eq!(canon("<p><span><span>a</span></span></p>"), "<p>a</p>");
    }

    #[test]
    fn multi_child_spans_are_unwrapped_by_the_final_pass() {
        assert_eq!(canon("<p><span>a<em>b</em></span></p>"), "<p>a<em>b</em></p>");
    }

    #[test]
    fn nested_paragraphs_are_dissolved() {
        assert_eq!(canon("<p>a<p>b</p></p>"), "<p>a</p><p>b</p>");
    }

    #[test]
    fn lists_do_not_stay_inside_paragraphs() {
        assert_eq!(canon("<p><ul><li>a</li></ul></p>"), "<ul><li>a</li></ul>");
    }

    #[test]
    fn orphan_list_merges_into_previous_item() {
        assert_eq!(
            canon("<ul><li>a</li><ul><li>b</li></ul></ul>"),
            "<ul><li>a<ul><li>b</li></ul></li></ul>"
        );
    }

    #[test]
    fn orphan_list_without_previous_item_gets_a_synthetic_one() {
        assert_eq!(
            canon("<ul><ol><li>a</li></ol></ul>"),
            "<ul><li><ol><li>a</li></ol></li></ul>"
        );
    }

    #[test]
    fn repaired_lists_only_contain_items() {
        let frag = semantify(&Fragment::parse(
            "<ul><ul><li>a</li></ul><li>b</li><ol><li>c</li></ol></ul>",
        ));
        fn check(nodes: &[crate::dom::Node]) {
            for node in nodes {
                if let crate::dom::Node::Element(el) = node {
                    if el.tag.is_list() {
                        for child in &el.children {
                            assert!(child.is_tag(&Tag::Li), "non-item child in list");
                        }
                    }
                    check(&el.children);
                }
            }
        }
        check(&frag.children);
    }

    #[test]
    fn loose_content_is_wrapped_in_paragraphs() {
        assert_eq!(
            canon("a<em>b</em><p>c</p>d"),
            "<p>a<em>b</em></p><p>c</p><p>d</p>"
        );
    }

    #[test]
    fn whitespace_text_bounds_loose_runs_and_stays() {
        assert_eq!(
            canon("<em>a</em> \n <em>b</em>"),
            "<p><em>a</em></p> \n <p><em>b</em></p>"
        );
    }

    #[test]
    fn trailing_breaks_are_removed_everywhere() {
        assert_eq!(canon("<p>a<br></p>"), "<p>a</p>");
        assert_eq!(canon("<p>a<br><br></p>"), "<p>a</p>");
        // A break in the middle stays.
        assert_eq!(canon("<p>a<br>b</p>"), "<p>a<br>b</p>");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(canon(""), "");
    }

    #[test]
    fn text_is_never_dropped() {
        let input = "<span>a</span><div><span><b>b</b></span>c</div>";
        let frag = semantify(&Fragment::parse(input));
        assert_eq!(frag.text(), "abc");
    }

    #[rstest]
    #[case("<div>a<br></div>b<span>c</span>")]
    #[case("<p>a<p>b<ul><li>c</li><ul><li>d</li></ul></ul></p></p>")]
    #[case("x<b><i>y</i></b> <br>")]
    #[case("<span><span>a</span>b</span>")]
    fn pipeline_is_idempotent(#[case] input: &str) {
        let once = semantify(&Fragment::parse(input));
        let twice = semantify(&once);
        assert_eq!(twice.to_html(), once.to_html());
    }

    #[test]
    fn node_identity_survives_kept_nodes() {
        let frag = Fragment::parse("<p>a<b>x</b></p>");
        let text_id = frag.children[0].as_element().unwrap().children[0].id();
        let out = semantify(&frag);
        assert!(out.contains(text_id));
    }
}
