use std::fmt::Write as _;

use crate::markup::element::{Element, Node};

const INDENT: &str = "  ";

/// Serialize `root` as a standalone UTF-8 document with an XML declaration.
pub fn write_document(root: &Element) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    write_element(&mut out, root, 0);
    out
}

fn write_element(out: &mut String, el: &Element, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    write_open(out, el);

    if el.children.is_empty() {
        out.push_str("/>\n");
        return;
    }
    // Any text child means mixed content: nothing is indented inside it.
    if el.children.iter().any(|c| matches!(c, Node::Text(_))) {
        write_inline_children(out, el);
        out.push('\n');
        return;
    }

    out.push_str(">\n");
    for child in el.elements() {
        write_element(out, child, depth + 1);
    }
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    let _ = writeln!(out, "</{}>", el.name);
}

/// `<name attr="..."` without the closing bracket.
fn write_open(out: &mut String, el: &Element) {
    out.push('<');
    out.push_str(&el.name);
    for (k, v) in &el.attrs {
        let _ = write!(out, " {k}=\"{}\"", escape_attr(v));
    }
}

fn write_inline(out: &mut String, el: &Element) {
    write_open(out, el);
    if el.children.is_empty() {
        out.push_str("/>");
    } else {
        write_inline_children(out, el);
    }
}

/// `>children</name>` with text written verbatim.
fn write_inline_children(out: &mut String, el: &Element) {
    out.push('>');
    for child in &el.children {
        match child {
            Node::Element(e) => write_inline(out, e),
            Node::Text(t) => out.push_str(&escape_text(t)),
        }
    }
    let _ = write!(out, "</{}>", el.name);
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/markup/writer.rs"]
mod tests;
