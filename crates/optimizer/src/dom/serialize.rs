// ABOUTME: HTML serializer for the optimizer's document tree.
// ABOUTME: Walks open/close edges iteratively so deep documents cannot overflow the stack.

use ego_tree::iter::Edge;
use ego_tree::NodeRef;

use super::{Element, Node};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

// Children of these are written verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

pub(super) fn serialize(node: NodeRef<'_, Node>) -> String {
    let mut out = String::new();
    for edge in node.traverse() {
        match edge {
            Edge::Open(n) => match n.value() {
                Node::Document => {}
                Node::Doctype(doctype) => {
                    out.push_str("<!DOCTYPE ");
                    out.push_str(&doctype.name);
                    if !doctype.public_id.is_empty() {
                        out.push_str(" PUBLIC \"");
                        out.push_str(&doctype.public_id);
                        out.push('"');
                        if !doctype.system_id.is_empty() {
                            out.push_str(" \"");
                            out.push_str(&doctype.system_id);
                            out.push('"');
                        }
                    } else if !doctype.system_id.is_empty() {
                        out.push_str(" SYSTEM \"");
                        out.push_str(&doctype.system_id);
                        out.push('"');
                    }
                    out.push('>');
                }
                Node::Element(el) => open_tag(&mut out, el),
                Node::Text(text) => {
                    if is_raw_text_parent(n) {
                        out.push_str(text);
                    } else {
                        escape_text(&mut out, text);
                    }
                }
                Node::Comment(comment) => {
                    out.push_str("<!--");
                    out.push_str(comment);
                    out.push_str("-->");
                }
            },
            Edge::Close(n) => {
                if let Node::Element(el) = n.value() {
                    if !VOID_ELEMENTS.contains(&el.name()) {
                        out.push_str("</");
                        out.push_str(el.name());
                        out.push('>');
                    }
                }
            }
        }
    }
    out
}

fn open_tag(out: &mut String, el: &Element) {
    out.push('<');
    out.push_str(el.name());
    for (name, value) in el.attrs() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attr(out, value);
        out.push('"');
    }
    out.push('>');
}

fn is_raw_text_parent(text: NodeRef<'_, Node>) -> bool {
    text.parent()
        .and_then(|p| p.value().as_element())
        .is_some_and(|el| RAW_TEXT_ELEMENTS.contains(&el.name()))
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
