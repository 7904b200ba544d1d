//! Document tree for the Folio converter.
//!
//! This crate provides an arena-based tree following the node model of the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), restricted to the four
//! node kinds the parser produces: document, element, text, and comment.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Every
//! node is owned by the arena and reachable from its parent's ordered child
//! list; the Document node is always [`NodeId::ROOT`].

use std::collections::HashMap;

/// Map of attribute names to values for an element.
///
/// Names are unique; the parser keeps the first value it sees for a name.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the document tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// The closed set of node kinds. Consumers match on it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    ///
    /// A single contiguous character run; the parser grows it in place.
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// Element-specific data.
///
/// NOTE: Only the local name and attributes are kept. There are no namespaces
/// because foreign content is never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// "An element's local name", always lower case.
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data with no attributes.
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            attrs: AttributesMap::new(),
        }
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
///
/// The DOCTYPE seen before the root element. Kept on the tree rather than as
/// a child node so the node kinds stay closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentType {
    /// "a name", missing when the DOCTYPE had none.
    pub name: Option<String>,
    /// "a public ID"
    pub public_identifier: Option<String>,
    /// "a system ID"
    pub system_identifier: Option<String>,
}

/// Arena-based document tree with O(1) node access.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree."
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,

    doctype: Option<DocumentType>,

    /// [§ 4.5](https://dom.spec.whatwg.org/#concept-document-quirks)
    /// "Unless stated otherwise, a document's mode is "no-quirks"."
    quirks_mode: bool,
}

impl DomTree {
    /// Create a new tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![document],
            doctype: None,
            quirks_mode: false,
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes in the tree, the Document included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (it always holds at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node, in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Get the tag name of an element node.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|data| data.tag_name.as_str())
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-descendant-text-content)
    ///
    /// "The descendant text content of a node node is the concatenation of the
    /// data of all the Text node descendants of node, in tree order."
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        self.collect_text(id, &mut result);
        result
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(text) = self.as_text(id) {
            out.push_str(text);
            return;
        }
        for &child in self.children(id) {
            self.collect_text(child, out);
        }
    }

    /// Find the first child element of `parent` with the given tag name.
    #[must_use]
    pub fn child_element(&self, parent: NodeId, tag_name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&id| self.tag_name(id) == Some(tag_name))
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .copied()
            .find(|&id| self.as_element(id).is_some())
    }

    /// [§ 3.1.3 The head element](https://html.spec.whatwg.org/multipage/dom.html#the-head-element-2)
    ///
    /// "The head element of a document is the first head element that is a
    /// child of the html element, if there is one, or null otherwise."
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.child_element(self.document_element()?, "head")
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's children
    /// that is either a body element or a frameset element, or null if there is
    /// no such element." Framesets are never built, so only body is searched.
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.child_element(self.document_element()?, "body")
    }

    /// The DOCTYPE recorded by the parser, if the document had one.
    #[must_use]
    pub const fn doctype(&self) -> Option<&DocumentType> {
        self.doctype.as_ref()
    }

    /// Record the document's DOCTYPE.
    pub fn set_doctype(&mut self, doctype: DocumentType) {
        self.doctype = Some(doctype);
    }

    /// Whether the document is in quirks mode.
    #[must_use]
    pub const fn quirks_mode(&self) -> bool {
        self.quirks_mode
    }

    /// Set the document's quirks mode flag.
    pub const fn set_quirks_mode(&mut self, quirks: bool) {
        self.quirks_mode = quirks;
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
