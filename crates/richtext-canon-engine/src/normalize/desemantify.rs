//! Semantic → presentational rewrite.
//!
//! Native formatting commands recognize "already italic/bold/code" by the
//! presentational tags they themselves produce, so canonical content is
//! rewritten to that form whenever a region goes live: `em` → `i`,
//! `strong` → `b`, `code` → a font element carrying the marker class and
//! the configured code font stack.

use super::CODE_MARKER_CLASS;
use crate::dom::{Fragment, Node, Tag};

pub fn desemantify(fragment: &Fragment, code_font_family: &str) -> Fragment {
    Fragment::new(rewrite(fragment.children.clone(), code_font_family))
}

fn rewrite(nodes: Vec<Node>, code_font_family: &str) -> Vec<Node> {
    nodes
        .into_iter()
        .map(|node| match node {
            Node::Element(mut el) => {
                el.children = rewrite(el.children, code_font_family);
                match el.tag {
                    Tag::Em => {
                        el.tag = Tag::I;
                        el.attrs.clear();
                    }
                    Tag::Strong => {
                        el.tag = Tag::B;
                        el.attrs.clear();
                    }
                    Tag::Code => {
                        el.tag = Tag::Font;
                        el.attrs.clear();
                        el.set_attr("class", CODE_MARKER_CLASS);
                        el.set_attr("face", code_font_family);
                    }
                    _ => {}
                }
                Node::Element(el)
            }
            other => other,
        })
        .collect()
}

/// Tag every font element in the region with the code marker class. Native
/// font-name commands produce bare font elements; marking them is what lets
/// `semantify` recognize them as code later.
pub fn mark_code_fonts(fragment: &Fragment) -> Fragment {
    fn mark(nodes: Vec<Node>) -> Vec<Node> {
        nodes
            .into_iter()
            .map(|node| match node {
                Node::Element(mut el) => {
                    el.children = mark(el.children);
                    if el.tag == Tag::Font {
                        el.add_class(CODE_MARKER_CLASS);
                    }
                    Node::Element(el)
                }
                other => other,
            })
            .collect()
    }
    Fragment::new(mark(fragment.children.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::semantify;
    use pretty_assertions::assert_eq;

    const FONT: &str = "Monaco, Consolas, \"Lucida Console\", monospace";

    #[test]
    fn semantic_tags_become_presentational() {
        let frag = Fragment::parse("<p><em>a</em><strong>b</strong><code>c</code></p>");
        assert_eq!(
            desemantify(&frag, FONT).to_html(),
            "<p><i>a</i><b>b</b>\
             <font class=\"canon-code\" face=\"Monaco, Consolas, &quot;Lucida Console&quot;, monospace\">c</font></p>"
        );
    }

    #[test]
    fn links_and_blocks_are_untouched() {
        let html = "<p><a href=\"u\">x</a></p><ol><li>y</li></ol>";
        assert_eq!(desemantify(&Fragment::parse(html), FONT).to_html(), html);
    }

    #[test]
    fn roundtrips_back_through_semantify() {
        let canonical = "<p>a<em>b</em><code>c</code></p><ul><li><strong>d</strong></li></ul>";
        let frag = Fragment::parse(canonical);
        let back = semantify(&desemantify(&frag, FONT));
        assert_eq!(back.to_html(), canonical);
    }

    #[test]
    fn mark_code_fonts_tags_bare_fonts() {
        let frag = Fragment::parse("<p><font face=\"Monaco\">a</font></p>");
        let marked = mark_code_fonts(&frag);
        let el = marked.children[0].as_element().unwrap().children[0]
            .as_element()
            .unwrap();
        assert!(el.has_class(CODE_MARKER_CLASS));
        // Already-marked fonts are not tagged twice.
        let again = mark_code_fonts(&marked);
        let el = again.children[0].as_element().unwrap().children[0]
            .as_element()
            .unwrap();
        assert_eq!(el.attr("class"), Some(CODE_MARKER_CLASS));
    }
}
