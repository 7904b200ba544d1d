//! Tests for building and querying the arena document tree.

use folio_dom::{DocumentType, DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)))
}

/// Builds `#document > html > [head, body > p > "Hi"]`.
fn sample_tree() -> (DomTree, NodeId, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let head = alloc_element(&mut tree, "head");
    tree.append_child(html, head);
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, body);
    let p = alloc_element(&mut tree, "p");
    tree.append_child(body, p);
    let text = tree.alloc(NodeType::Text("Hi".to_string()));
    tree.append_child(p, text);
    (tree, html, body, p)
}

#[test]
fn test_new_tree_has_only_document() {
    let tree = DomTree::new();
    assert_eq!(tree.len(), 1);
    assert!(!tree.is_empty());
    assert!(matches!(
        tree.get(tree.root()).map(|n| &n.node_type),
        Some(NodeType::Document)
    ));
    assert!(tree.document_element().is_none());
    assert!(tree.doctype().is_none());
    assert!(!tree.quirks_mode());
}

#[test]
fn test_append_child_links_parent_and_order() {
    let (tree, html, body, p) = sample_tree();
    assert_eq!(tree.parent(html), Some(NodeId::ROOT));
    assert_eq!(tree.parent(p), Some(body));
    assert_eq!(tree.children(html).len(), 2);
    assert_eq!(tree.last_child(html), Some(body));
}

#[test]
fn test_document_head_and_body_lookup() {
    let (tree, html, body, _) = sample_tree();
    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), Some(body));
    assert_eq!(tree.head().and_then(|id| tree.tag_name(id)), Some("head"));
}

#[test]
fn test_document_element_skips_comments() {
    let mut tree = DomTree::new();
    let comment = tree.alloc(NodeType::Comment(" lead ".to_string()));
    tree.append_child(NodeId::ROOT, comment);
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    assert_eq!(tree.document_element(), Some(html));
}

#[test]
fn test_text_content_concatenates_descendants() {
    let (mut tree, _, body, _) = sample_tree();
    let tail = tree.alloc(NodeType::Text(" there".to_string()));
    tree.append_child(body, tail);
    assert_eq!(tree.text_content(body), "Hi there");
}

#[test]
fn test_element_attributes_are_mutable() {
    let (mut tree, html, _, _) = sample_tree();
    if let Some(data) = tree.as_element_mut(html) {
        let _ = data.attrs.insert("lang".to_string(), "en".to_string());
    }
    assert_eq!(tree.as_element(html).and_then(|d| d.attr("lang")), Some("en"));
    assert_eq!(tree.as_element(html).and_then(|d| d.attr("dir")), None);
}

#[test]
fn test_doctype_and_quirks_are_recorded() {
    let mut tree = DomTree::new();
    tree.set_doctype(DocumentType {
        name: Some("html".to_string()),
        ..DocumentType::default()
    });
    tree.set_quirks_mode(true);
    assert_eq!(
        tree.doctype().and_then(|d| d.name.as_deref()),
        Some("html")
    );
    assert!(tree.quirks_mode());
}
