//! Permissive HTML fragment parser.
//!
//! Accepts whatever a clipboard or a native editing surface produces and
//! always yields a tree: unknown constructs become text, unclosed elements
//! are closed at end of input, and stray close tags are ignored. Entities
//! in text and attribute values are decoded here, once, so the rest of the
//! engine works on plain strings.

use super::{Attr, Comment, Element, Fragment, Node, NodeId, Tag, Text};

pub fn parse_fragment(html: &str) -> Fragment {
    Parser::new(html).run()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    /// Open-element stack; the fragment root is the implicit bottom.
    stack: Vec<Element>,
    top: Vec<Node>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Parser<'a> {
        Parser {
            src,
            pos: 0,
            stack: Vec::new(),
            top: Vec::new(),
        }
    }

    fn run(mut self) -> Fragment {
        while !self.eof() {
            if self.starts_with("<!--") {
                self.comment();
            } else if self.starts_with("</") {
                self.close_tag();
            } else if self.starts_with("<!") || self.starts_with("<?") {
                // Doctype or processing instruction: skip to '>'.
                self.skip_past('>');
            } else if self.at_open_tag() {
                self.open_tag();
            } else {
                self.text_run();
            }
        }
        // Unclosed elements attach where they stand.
        while let Some(el) = self.stack.pop() {
            self.append(Node::Element(el));
        }
        Fragment { children: self.top }
    }

    fn eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_past(&mut self, end: char) {
        match self.rest().find(end) {
            Some(i) => self.pos += i + end.len_utf8(),
            None => self.pos = self.src.len(),
        }
    }

    /// `<` followed by an ASCII letter starts a tag; anything else is text.
    fn at_open_tag(&self) -> bool {
        let mut chars = self.rest().chars();
        chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    }

    fn append(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.top.push(node),
        }
    }

    fn comment(&mut self) {
        self.pos += 4; // <!--
        let body = match self.rest().find("-->") {
            Some(i) => {
                let body = &self.rest()[..i];
                self.pos += i + 3;
                body
            }
            None => {
                let body = self.rest();
                self.pos = self.src.len();
                body
            }
        };
        self.append(Node::Comment(Comment {
            id: NodeId::fresh(),
            text: body.to_string(),
        }));
    }

    fn text_run(&mut self) {
        let start = self.pos;
        self.bump();
        while !self.eof() {
            if self.starts_with("<!--") || self.starts_with("</") || self.at_open_tag()
                || self.starts_with("<!") || self.starts_with("<?")
            {
                break;
            }
            self.bump();
        }
        let raw = &self.src[start..self.pos];
        let decoded = html_escape::decode_html_entities(raw).into_owned();
        self.append(Node::Text(Text::new(decoded)));
    }

    fn tag_name(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            self.bump();
        }
        self.src[start..self.pos].to_ascii_lowercase()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn open_tag(&mut self) {
        self.bump(); // <
        let name = self.tag_name();
        let tag = Tag::parse(&name);
        let mut el = Element::new(tag.clone());
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('>') => {
                    self.bump();
                    break;
                }
                Some('/') => {
                    self.bump();
                    if self.peek() == Some('>') {
                        self.bump();
                        self_closing = true;
                        break;
                    }
                }
                Some(_) => {
                    if let Some(attr) = self.attribute() {
                        el.attrs.push(attr);
                    }
                }
            }
        }

        if tag.is_raw_text() && !self_closing {
            let raw = self.raw_text_until_close(&name);
            if !raw.is_empty() {
                el.children.push(Node::Text(Text::new(raw)));
            }
            self.append(Node::Element(el));
        } else if tag.is_void() || self_closing {
            self.append(Node::Element(el));
        } else {
            self.stack.push(el);
        }
    }

    fn attribute(&mut self) -> Option<Attr> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !c.is_whitespace() && c != '=' && c != '>' && c != '/')
        {
            self.bump();
        }
        if self.pos == start {
            // Unparseable character; consume it so the loop advances.
            self.bump();
            return None;
        }
        let name = self.src[start..self.pos].to_ascii_lowercase();
        self.skip_whitespace();
        if self.peek() != Some('=') {
            return Some(Attr {
                name,
                value: String::new(),
            });
        }
        self.bump(); // =
        self.skip_whitespace();
        let raw = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.bump();
                }
                let value = &self.src[start..self.pos];
                self.bump(); // closing quote
                value
            }
            _ => {
                let start = self.pos;
                while self.peek().is_some_and(|c| !c.is_whitespace() && c != '>') {
                    self.bump();
                }
                &self.src[start..self.pos]
            }
        };
        Some(Attr {
            name,
            value: html_escape::decode_html_entities(raw).into_owned(),
        })
    }

    /// Content of script/style elements is opaque up to the matching close
    /// tag; the close tag itself is consumed.
    fn raw_text_until_close(&mut self, name: &str) -> String {
        let lower_rest = self.rest().to_ascii_lowercase();
        let close = format!("</{name}");
        match lower_rest.find(&close) {
            Some(i) => {
                let raw = self.rest()[..i].to_string();
                self.pos += i;
                self.skip_past('>');
                raw
            }
            None => {
                let raw = self.rest().to_string();
                self.pos = self.src.len();
                raw
            }
        }
    }

    fn close_tag(&mut self) {
        self.pos += 2; // </
        let name = self.tag_name();
        self.skip_past('>');
        let tag = Tag::parse(&name);

        // Find the nearest matching open element; ignore the close tag if
        // there is none. Everything opened above it closes implicitly.
        let Some(depth) = self.stack.iter().rposition(|el| el.tag == tag) else {
            return;
        };
        while self.stack.len() > depth {
            if let Some(el) = self.stack.pop() {
                self.append(Node::Element(el));
            }
        }
    }
}
