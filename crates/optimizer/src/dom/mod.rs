// ABOUTME: Mutable HTML document tree used by the optimizer transformers.
// ABOUTME: Wraps an ego_tree arena filled from scraper's html5ever parse output.

//! DOM utilities for HTML document manipulation.
//!
//! scraper's own tree cannot have its attributes edited, so parsed documents
//! are copied into a [`Document`] whose nodes own plain strings. Node handles
//! are [`NodeId`]s into the arena; removed nodes stay allocated but are no
//! longer reachable from the root.

mod serialize;

use ego_tree::Tree;
use scraper::Html;

pub use ego_tree::NodeId;

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Document,
    Doctype(Doctype),
    Element(Element),
    Text(String),
    Comment(String),
}

/// `<!DOCTYPE>` with its legacy public and system identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctype {
    pub name: String,
    pub public_id: String,
    pub system_id: String,
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// An element with a lower-cased tag name. Parsed attributes keep source
/// order and attributes set later are appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the attribute, `Some("")` for a present boolean attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == name)
    }

    /// Set an attribute, replacing the value in place if it already exists.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(idx).1)
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// An HTML document owned by the caller and mutated in place by transformers.
#[derive(Debug, Clone)]
pub struct Document {
    tree: Tree<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only its root node.
    pub fn new() -> Self {
        Self {
            tree: Tree::new(Node::Document),
        }
    }

    /// Parse a full HTML document. html5ever always synthesizes the
    /// `html`, `head` and `body` elements, so this cannot fail.
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut doc = Document::new();
        let root = doc.root();

        let mut stack: Vec<(ego_tree::NodeRef<'_, scraper::Node>, NodeId)> = Vec::new();
        push_children(&mut stack, parsed.tree.root(), root);

        while let Some((src, parent)) = stack.pop() {
            let value = match src.value() {
                scraper::Node::Doctype(doctype) => Node::Doctype(Doctype {
                    name: doctype.name().to_string(),
                    public_id: doctype.public_id().to_string(),
                    system_id: doctype.system_id().to_string(),
                }),
                scraper::Node::Element(el) => {
                    // html5ever already lower-cases HTML tags; keep foreign names as-is.
                    let mut element = Element {
                        name: el.name().to_string(),
                        attrs: Vec::new(),
                    };
                    for (name, value) in el.attrs() {
                        element.set_attr(name, value);
                    }
                    Node::Element(element)
                }
                scraper::Node::Text(text) => Node::Text(text.text.to_string()),
                scraper::Node::Comment(comment) => Node::Comment(comment.comment.to_string()),
                // Template contents live in a fragment; hang them off the template itself.
                scraper::Node::Fragment => {
                    push_children(&mut stack, src, parent);
                    continue;
                }
                _ => continue,
            };
            let Some(mut parent_node) = doc.tree.get_mut(parent) else {
                continue;
            };
            let id = parent_node.append(value).id();
            push_children(&mut stack, src, id);
        }

        doc
    }

    pub fn root(&self) -> NodeId {
        self.tree.root().id()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.get(id).map(|n| n.value())
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).and_then(Node::as_element)
    }

    /// Tag name of the node, `None` for non-element nodes.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::name)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id)?.parent().map(|n| n.id())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id)?.first_child().map(|n| n.id())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id)?.next_sibling().map(|n| n.id())
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id)?.prev_sibling().map(|n| n.id())
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match self.tree.get(id) {
            Some(node) => node.children().map(|c| c.id()).collect(),
            None => Vec::new(),
        }
    }

    /// First direct child element with the given tag name.
    pub fn first_child_by_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.tree
            .get(id)?
            .children()
            .find(|c| c.value().as_element().is_some_and(|el| el.name() == tag))
            .map(|c| c.id())
    }

    pub fn html(&self) -> Option<NodeId> {
        self.first_child_by_tag(self.root(), "html")
    }

    pub fn head(&self) -> Option<NodeId> {
        self.first_child_by_tag(self.html()?, "head")
    }

    pub fn body(&self) -> Option<NodeId> {
        self.first_child_by_tag(self.html()?, "body")
    }

    /// Next node in document order: first child, else next sibling, else the
    /// next sibling of the closest ancestor that has one.
    pub fn next_node(&self, id: NodeId) -> Option<NodeId> {
        self.step(id, None)
    }

    /// Like [`Document::next_node`] but never leaves the subtree of `scope`.
    pub fn next_node_within(&self, id: NodeId, scope: NodeId) -> Option<NodeId> {
        self.step(id, Some(scope))
    }

    fn step(&self, id: NodeId, scope: Option<NodeId>) -> Option<NodeId> {
        let node = self.tree.get(id)?;
        if let Some(child) = node.first_child() {
            return Some(child.id());
        }
        let mut current = node;
        loop {
            if Some(current.id()) == scope {
                return None;
            }
            if let Some(sibling) = current.next_sibling() {
                return Some(sibling.id());
            }
            current = current.parent()?;
        }
    }

    /// Run `f` against the element at `id`. Returns false for non-elements.
    pub fn update_element<F>(&mut self, id: NodeId, f: F) -> bool
    where
        F: FnOnce(&mut Element),
    {
        let Some(mut node) = self.tree.get_mut(id) else {
            return false;
        };
        match node.value() {
            Node::Element(el) => {
                f(el);
                true
            }
            _ => false,
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        self.update_element(id, |el| el.set_attr(name, value))
    }

    /// Create a detached element; attach it with `append` or `insert_before`.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.orphan(Node::Element(Element::new(tag))).id()
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.tree.orphan(Node::Text(text.into())).id()
    }

    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if let Some(mut node) = self.tree.get_mut(parent) {
            node.append_id(child);
        }
    }

    /// Insert `child` under `parent` before `reference`, or last when
    /// `reference` is `None`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        match reference {
            Some(reference) => {
                debug_assert_eq!(self.parent(reference), Some(parent));
                if let Some(mut node) = self.tree.get_mut(reference) {
                    node.insert_id_before(child);
                }
            }
            None => self.append(parent, child),
        }
    }

    /// Detach the node (and its subtree) from the tree.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(mut node) = self.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        serialize::serialize(self.tree.root())
    }

    /// Serialize a single node including its own tags.
    pub fn outer_html(&self, id: NodeId) -> String {
        match self.tree.get(id) {
            Some(node) => serialize::serialize(node),
            None => String::new(),
        }
    }
}

fn push_children<'a>(
    stack: &mut Vec<(ego_tree::NodeRef<'a, scraper::Node>, NodeId)>,
    src: ego_tree::NodeRef<'a, scraper::Node>,
    parent: NodeId,
) {
    // Reversed so that popping visits children in source order.
    let children: Vec<_> = src.children().collect();
    stack.extend(children.into_iter().rev().map(|c| (c, parent)));
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<!doctype html><html ⚡><head><title>t</title></head>\
        <body><div><p>a</p><p>b</p></div><span>c</span></body></html>";

    fn tags_in_order(doc: &Document, from: NodeId, scope: NodeId) -> Vec<String> {
        let mut tags = Vec::new();
        let mut node = Some(from);
        while let Some(id) = node {
            if let Some(tag) = doc.tag_name(id) {
                tags.push(tag.to_string());
            }
            node = doc.next_node_within(id, scope);
        }
        tags
    }

    #[test]
    fn parse_finds_structure() {
        let doc = Document::parse(PAGE);
        let html = doc.html().unwrap();
        assert!(doc.element(html).unwrap().has_attr("⚡"));
        assert_eq!(doc.tag_name(doc.head().unwrap()), Some("head"));
        assert_eq!(doc.tag_name(doc.body().unwrap()), Some("body"));
    }

    #[test]
    fn parse_synthesizes_missing_sections() {
        let doc = Document::parse("<p>hello</p>");
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
    }

    #[test]
    fn document_order_is_preorder() {
        let doc = Document::parse(PAGE);
        let body = doc.body().unwrap();
        assert_eq!(
            tags_in_order(&doc, body, body),
            vec!["body", "div", "p", "p", "span"]
        );
    }

    #[test]
    fn unbounded_next_node_leaves_subtree() {
        let doc = Document::parse(PAGE);
        let head = doc.head().unwrap();
        let title = doc.first_child(head).unwrap();
        let text = doc.first_child(title).unwrap();
        assert_eq!(doc.next_node(text), doc.body());
        assert_eq!(doc.next_node_within(text, head), None);
    }

    #[test]
    fn insert_before_and_remove() {
        let mut doc = Document::parse(PAGE);
        let head = doc.head().unwrap();
        let title = doc.first_child(head).unwrap();

        let style = doc.create_element("style");
        doc.set_attr(style, "amp-runtime", "");
        doc.insert_before(head, style, doc.first_child(head));
        assert_eq!(doc.first_child(head), Some(style));
        assert_eq!(doc.prev_sibling(title), Some(style));

        doc.remove(title);
        assert_eq!(doc.children(head), vec![style]);
        assert_eq!(doc.outer_html(head), "<head><style amp-runtime=\"\"></style></head>");
    }

    #[test]
    fn insert_before_none_appends() {
        let mut doc = Document::new();
        let root = doc.root();
        let div = doc.create_element("DIV");
        doc.insert_before(root, div, None);
        let text = doc.create_text("x");
        doc.append(div, text);
        assert_eq!(doc.to_html(), "<div>x</div>");
    }

    #[test]
    fn element_attribute_presence() {
        let mut el = Element::new("amp-img");
        assert!(!el.has_attr("hidden"));
        el.set_attr("hidden", "");
        assert_eq!(el.attr("hidden"), Some(""));
        el.set_attr("hidden", "hidden");
        assert_eq!(el.attrs().count(), 1);
        assert_eq!(el.remove_attr("hidden"), Some("hidden".to_string()));
        assert!(!el.has_attr("hidden"));
    }

    #[test]
    fn update_element_ignores_text() {
        let mut doc = Document::new();
        let text = doc.create_text("x");
        assert!(!doc.update_element(text, |el| el.set_attr("a", "b")));
    }

    #[test]
    fn template_contents_stay_in_tree() {
        let doc = Document::parse(
            "<html><head></head><body><template><amp-img></amp-img></template></body></html>",
        );
        let body = doc.body().unwrap();
        let template = doc.first_child_by_tag(body, "template").unwrap();
        let inner = doc.first_child(template).unwrap();
        assert_eq!(doc.tag_name(inner), Some("amp-img"));
        assert_eq!(doc.parent(inner), Some(template));
        assert_eq!(doc.next_node_within(template, body), Some(inner));
    }

    #[test]
    fn nested_templates_keep_their_contents() {
        let doc = Document::parse(
            "<html><head></head><body><template><div><template><span>x</span></template>\
             </div></template></body></html>",
        );
        let body = doc.body().unwrap();
        let outer = doc.first_child_by_tag(body, "template").unwrap();
        let div = doc.first_child_by_tag(outer, "div").unwrap();
        let inner = doc.first_child_by_tag(div, "template").unwrap();
        let span = doc.first_child_by_tag(inner, "span").unwrap();
        assert_eq!(doc.outer_html(span), "<span>x</span>");
    }
}
