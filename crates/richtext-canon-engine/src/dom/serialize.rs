//! Markup serialization with entity escaping.

use super::{Fragment, Node};

pub fn to_html(fragment: &Fragment) -> String {
    let mut out = String::new();
    for node in &fragment.children {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => {
            out.push_str(&html_escape::encode_text(&t.text));
        }
        Node::Comment(c) => {
            out.push_str("<!--");
            out.push_str(&c.text);
            out.push_str("-->");
        }
        Node::Element(el) => {
            out.push('<');
            out.push_str(el.tag.name());
            for attr in &el.attrs {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(&attr.value));
                out.push('"');
            }
            out.push('>');
            if el.tag.is_void() {
                return;
            }
            for child in &el.children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(el.tag.name());
            out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::{Element, Fragment, Node, Tag};
    use pretty_assertions::assert_eq;

    #[test]
    fn text_is_escaped() {
        let frag = Fragment::new(vec![Node::text("a < b & c")]);
        assert_eq!(frag.to_html(), "a &lt; b &amp; c");
    }

    #[test]
    fn attributes_are_escaped() {
        let el = Element::new(Tag::A)
            .with_attr("href", "x?a=1&b=\"2\"")
            .with_children(vec![Node::text("y")]);
        let frag = Fragment::new(vec![Node::Element(el)]);
        assert_eq!(frag.to_html(), "<a href=\"x?a=1&amp;b=&quot;2&quot;\">y</a>");
    }

    #[test]
    fn void_elements_have_no_close_tag() {
        let frag = Fragment::new(vec![Node::element(Tag::Br)]);
        assert_eq!(frag.to_html(), "<br>");
    }
}
