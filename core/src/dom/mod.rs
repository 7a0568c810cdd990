//! Owned document tree
//!
//! The host page is modeled as an arena of nodes addressed by `NodeId`.
//! Element nodes carry a tag name and an ordered attribute list; text nodes
//! carry their text. The tree is append-oriented: nodes are created
//! detached, attached with `append`/`insert_after`, and never removed from
//! the arena (a detached node simply has no parent), so a `NodeId` stays
//! valid for the lifetime of the document.
//!
//! Traversal helpers (`ancestors`, `descendants`, `inner_text`) are what the
//! watcher and injector build on; everything selector-like lives in the
//! callers so host-page markup assumptions stay in one seam.

mod parse;
mod serialize;

pub use parse::parse_html;

/// Handle to a node in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Element payload: tag name plus ordered attributes.
#[derive(Debug, Clone)]
pub struct ElementData {
    tag: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.attrs.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value.to_string();
        } else {
            self.attrs.push((name.to_string(), value.to_string()));
        }
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// Synthetic root tag, mirroring the DOM's document container.
const DOCUMENT_TAG: &str = "#document";

/// Tags treated as block-level for inner-text extraction. Text inside
/// inline elements concatenates directly; block boundaries become newlines.
const BLOCK_TAGS: &[&str] = &[
    "article", "blockquote", "br", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "p", "section",
    "tr", "ul",
];

/// An owned document tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a minimal document: `#document` -> `html` -> (`head`, `body`).
    pub fn new() -> Self {
        let mut doc = Self::empty();
        let html = doc.create_element("html");
        doc.append(doc.root, html);
        let head = doc.create_element("head");
        doc.append(html, head);
        let body = doc.create_element("body");
        doc.append(html, body);
        doc
    }

    /// Create a document containing only the synthetic root container.
    pub(crate) fn empty() -> Self {
        let root_node = Node {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element(ElementData::new(DOCUMENT_TAG)),
        };
        Self {
            nodes: vec![root_node],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The first `body` element in the document, falling back to the root
    /// container for fragment-shaped documents.
    pub fn body(&self) -> NodeId {
        self.descendants(self.root)
            .find(|&id| self.tag(id) == Some("body"))
            .unwrap_or(self.root)
    }

    // ─── Construction ────────────────────────────────────────────────────────

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.push_node(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a detached element node with initial attributes.
    pub fn create_element_with(
        &mut self,
        tag: impl Into<String>,
        attrs: &[(&str, &str)],
    ) -> NodeId {
        let id = self.create_element(tag);
        for (name, value) in attrs {
            self.set_attr(id, name, value);
        }
        id
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push_node(NodeData::Text(text.into()))
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `node` as the next sibling of `sibling`. Falls back to
    /// appending under the root when `sibling` is detached.
    pub fn insert_after(&mut self, sibling: NodeId, node: NodeId) {
        self.detach(node);
        let Some(parent) = self.nodes[sibling.0].parent else {
            self.append(self.root, node);
            return;
        };
        let pos = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == sibling)
            .map(|p| p + 1)
            .unwrap_or(self.nodes[parent.0].children.len());
        self.nodes[node.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(pos, node);
    }

    /// Remove `node` from its parent's child list. The node (and its
    /// subtree) stays in the arena and can be re-attached.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────────

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].data, NodeData::Element(_))
    }

    /// Tag name for element nodes, `None` for text nodes.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => Some(el.tag()),
            NodeData::Text(_) => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => el.attr(name),
            NodeData::Text(_) => None,
        }
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Set an attribute on an element node. Ignored on text nodes.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeData::Element(el) = &mut self.nodes[id.0].data {
            el.set_attr(name, value);
        }
    }

    /// Text content for text nodes, `None` for elements.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element(_) => None,
            NodeData::Text(text) => Some(text),
        }
    }

    // ─── Traversal ───────────────────────────────────────────────────────────

    /// Ancestors of `id`, nearest first. Does not include `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.parent(id);
        std::iter::from_fn(move || {
            let next = current?;
            current = self.parent(next);
            Some(next)
        })
    }

    /// Descendants of `id` in document (preorder) order. Does not include
    /// `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack = Vec::new();
        stack.extend(self.children(id).iter().rev().copied());
        Descendants { doc: self, stack }
    }

    /// Concatenated text of the subtree under `id` (inclusive), with
    /// newlines at block-element boundaries. This approximates the rendered
    /// text a reader would see; the matcher only runs substring checks on
    /// it.
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out.trim().to_string()
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(el) => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
                if BLOCK_TAGS.contains(&el.tag()) && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
    }

    /// Serialize the document (or subtree) back to HTML.
    pub fn to_html(&self) -> String {
        serialize::serialize_node(self, self.root)
    }

    pub fn node_to_html(&self, id: NodeId) -> String {
        serialize::serialize_node(self, id)
    }
}

/// Preorder iterator over a subtree, excluding the start node.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_shape() {
        let doc = Document::new();
        assert_eq!(doc.tag(doc.root()), Some(DOCUMENT_TAG));
        assert_eq!(doc.tag(doc.body()), Some("body"));
    }

    #[test]
    fn test_append_and_traverse() {
        let mut doc = Document::new();
        let body = doc.body();
        let article = doc.create_element("article");
        doc.append(body, article);
        let img = doc.create_element_with("img", &[("src", "a.png")]);
        doc.append(article, img);

        assert_eq!(doc.parent(img), Some(article));
        assert!(doc.ancestors(img).any(|id| id == body));
        let tags: Vec<_> = doc
            .descendants(body)
            .filter_map(|id| doc.tag(id))
            .collect();
        assert_eq!(tags, vec!["article", "img"]);
    }

    #[test]
    fn test_set_attr_overwrites() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.set_attr(el, "class", "a");
        doc.set_attr(el, "class", "b");
        assert_eq!(doc.attr(el, "class"), Some("b"));
    }

    #[test]
    fn test_insert_after_ordering() {
        let mut doc = Document::new();
        let body = doc.body();
        let first = doc.create_element("p");
        let third = doc.create_element("p");
        doc.append(body, first);
        doc.append(body, third);
        let second = doc.create_element("div");
        doc.insert_after(first, second);
        assert_eq!(doc.children(body), &[first, second, third]);
    }

    #[test]
    fn test_inner_text_block_boundaries() {
        let mut doc = Document::new();
        let body = doc.body();
        let article = doc.create_element("article");
        doc.append(body, article);
        let p1 = doc.create_element("p");
        doc.append(article, p1);
        let t1 = doc.create_text("Happy Friday!");
        doc.append(p1, t1);
        let p2 = doc.create_element("p");
        doc.append(article, p2);
        let t2 = doc.create_text("Here's my 5x5");
        doc.append(p2, t2);

        assert_eq!(doc.inner_text(article), "Happy Friday!\nHere's my 5x5");
    }

    #[test]
    fn test_detach_keeps_arena_entry() {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.create_element("div");
        doc.append(body, div);
        doc.detach(div);
        assert_eq!(doc.parent(div), None);
        assert!(doc.descendants(body).next().is_none());
        // Still addressable
        assert_eq!(doc.tag(div), Some("div"));
    }
}
