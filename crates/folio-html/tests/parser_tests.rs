//! Integration tests for the HTML parser.

use folio_dom::{DomTree, NodeId, NodeType};
use folio_html::{
    Error, HTMLParser, InsertionMode, IssueOrigin, ParseErrorCode, ParseIssue, format_tree,
    parse_with_issues,
};

/// Helper to parse HTML and return the DOM tree and reported issues
fn parse(html: &str) -> (DomTree, Vec<ParseIssue>) {
    parse_with_issues(html).expect("parse failed")
}

/// Helper to parse HTML and return only the error codes
fn codes(html: &str) -> Vec<ParseErrorCode> {
    parse(html).1.iter().map(|issue| issue.code).collect()
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.tag_name == tag
    {
        return Some(from);
    }
    for &child_id in tree.children(from) {
        if let Some(found) = find_element(tree, child_id, tag) {
            return Some(found);
        }
    }
    None
}

/// Helper to get the tag names of an element's element children
fn child_tags(tree: &DomTree, id: NodeId) -> Vec<&str> {
    tree.children(id)
        .iter()
        .filter_map(|&child| tree.tag_name(child))
        .collect()
}

fn body(tree: &DomTree) -> NodeId {
    tree.body().expect("no body element")
}

#[test]
fn test_document_structure() {
    let (tree, issues) = parse("<!DOCTYPE html><html><head></head><body></body></html>");
    assert!(issues.is_empty());

    let root = tree.get(NodeId::ROOT).expect("no root");
    assert!(matches!(root.node_type, NodeType::Document));

    let html_id = tree.document_element().expect("no html element");
    assert_eq!(child_tags(&tree, html_id), vec!["head", "body"]);
    assert!(!tree.quirks_mode());
    assert_eq!(
        tree.doctype().and_then(|d| d.name.as_deref()),
        Some("html")
    );
}

#[test]
fn test_implied_html_head_and_body() {
    let (tree, issues) = parse("<p>A<p>B");
    assert_eq!(
        format_tree(&tree),
        "Document\n  <html>\n    <head>\n    <body>\n      <p>\n        \"A\"\n      <p>\n        \"B\"\n"
    );
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, ParseErrorCode::MissingDoctype);
    assert_eq!(
        issues[0].origin,
        IssueOrigin::TreeBuilder(InsertionMode::Initial)
    );
    assert!(tree.quirks_mode());
}

#[test]
fn test_title_in_head() {
    let (tree, issues) = parse(
        "<!DOCTYPE html><html><head><title>Hello  world</title></head>\
         <body><p>x</p></body></html>",
    );
    assert!(issues.is_empty());
    let head = tree.head().expect("no head");
    let title = tree.child_element(head, "title").expect("no title");
    assert_eq!(tree.text_content(title), "Hello  world");
    let p = find_element(&tree, body(&tree), "p").expect("no p");
    assert_eq!(tree.text_content(p), "x");
}

#[test]
fn test_full_document_without_doctype_reports_only_missing_doctype() {
    let (tree, issues) = parse("<html><head><title>T</title></head><body>Hi</body></html>");
    assert_eq!(
        issues.iter().map(|issue| issue.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::MissingDoctype]
    );
    assert!(tree.quirks_mode());
    assert!(tree.doctype().is_none());
    let title = find_element(&tree, NodeId::ROOT, "title").expect("no title");
    assert_eq!(tree.text_content(title), "T");
    assert_eq!(tree.text_content(body(&tree)), "Hi");
}

#[test]
fn test_title_content_is_not_markup() {
    let (tree, _) = parse("<title>a</b>c</title>");
    let title = find_element(&tree, NodeId::ROOT, "title").expect("no title");
    assert_eq!(tree.text_content(title), "a</b>c");
    assert_eq!(tree.children(title).len(), 1);
}

#[test]
fn test_eof_in_title() {
    let (tree, issues) = parse("<!DOCTYPE html><title>abc");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, ParseErrorCode::UnexpectedEndOfFile);
    assert_eq!(
        issues[0].origin,
        IssueOrigin::TreeBuilder(InsertionMode::Text)
    );
    let title = find_element(&tree, NodeId::ROOT, "title").expect("no title");
    assert_eq!(tree.text_content(title), "abc");
    assert!(tree.body().is_some());
}

#[test]
fn test_list_items_close_each_other() {
    let (tree, _) = parse("<!DOCTYPE html><ul><li>a<li>b</ul><p>after");
    let ul = find_element(&tree, NodeId::ROOT, "ul").expect("no ul");
    assert_eq!(child_tags(&tree, ul), vec!["li", "li"]);
    assert_eq!(child_tags(&tree, body(&tree)), vec!["ul", "p"]);
}

#[test]
fn test_nested_list_item_stays_nested() {
    let (tree, issues) = parse("<!DOCTYPE html><ul><li>a<ul><li>b</ul></ul>");
    assert!(issues.is_empty());
    let outer = find_element(&tree, NodeId::ROOT, "ul").expect("no ul");
    assert_eq!(child_tags(&tree, outer), vec!["li"]);
    let li = tree.children(outer)[0];
    assert_eq!(child_tags(&tree, li), vec!["ul"]);
}

#[test]
fn test_definition_list_terms() {
    let (tree, issues) = parse("<!DOCTYPE html><dl><dt>a<dd>b<dt>c</dl>");
    assert!(issues.is_empty());
    let dl = find_element(&tree, NodeId::ROOT, "dl").expect("no dl");
    assert_eq!(child_tags(&tree, dl), vec!["dt", "dd", "dt"]);
}

#[test]
fn test_nested_heading_is_repaired() {
    let (tree, issues) = parse("<h1>a<h2>b</h2>");
    let nested = issues
        .iter()
        .filter(|issue| issue.code == ParseErrorCode::NestedHeading)
        .count();
    assert_eq!(nested, 1);
    assert_eq!(child_tags(&tree, body(&tree)), vec!["h1", "h2"]);
}

#[test]
fn test_heading_closes_paragraph() {
    let (tree, issues) = parse("<!DOCTYPE html><p>intro<h2>Title</h2>");
    assert!(issues.is_empty());
    assert_eq!(child_tags(&tree, body(&tree)), vec!["p", "h2"]);
}

#[test]
fn test_void_elements_have_no_children() {
    let (tree, issues) = parse(r#"<!DOCTYPE html><p>a<br>b<img src="x.png">c<hr>d"#);
    assert!(issues.is_empty());
    let p = find_element(&tree, NodeId::ROOT, "p").expect("no p");
    assert_eq!(child_tags(&tree, p), vec!["br", "img"]);
    assert_eq!(tree.text_content(p), "abc");
    assert_eq!(child_tags(&tree, body(&tree)), vec!["p", "hr"]);
    let img = find_element(&tree, NodeId::ROOT, "img").expect("no img");
    assert_eq!(
        tree.as_element(img).and_then(|data| data.attr("src")),
        Some("x.png")
    );
}

#[test]
fn test_formatting_elements() {
    let (tree, issues) = parse("<!DOCTYPE html><p>a <b>bold <i>both</i></b> c");
    assert!(issues.is_empty());
    let b = find_element(&tree, NodeId::ROOT, "b").expect("no b");
    assert_eq!(child_tags(&tree, b), vec!["i"]);
    assert_eq!(tree.text_content(b), "bold both");
}

#[test]
fn test_misnested_formatting_end_tag_aborts() {
    let result = parse_with_issues("<!DOCTYPE html><b><i>x</b></i>");
    assert_eq!(
        result.err(),
        Some(Error::MisnestedEndTag {
            tag: "b".to_string(),
            current: "i".to_string(),
        })
    );
}

#[test]
fn test_unsupported_elements_abort() {
    let result = parse_with_issues("<!DOCTYPE html><table>");
    assert_eq!(
        result.err(),
        Some(Error::UnsupportedElement {
            tag: "table".to_string(),
            mode: InsertionMode::InBody,
        })
    );

    let result = parse_with_issues("<script>x</script>");
    assert_eq!(
        result.err(),
        Some(Error::UnsupportedElement {
            tag: "script".to_string(),
            mode: InsertionMode::InHead,
        })
    );

    let result = parse_with_issues("<!DOCTYPE html><p>x</div>");
    assert!(matches!(result, Err(Error::UnsupportedEndTag { .. })));
}

#[test]
fn test_character_reference_aborts_parse() {
    let result = parse_with_issues("<!DOCTYPE html><p>fish &amp; chips");
    assert!(matches!(result, Err(Error::CharacterReference { .. })));
}

#[test]
fn test_comment_before_html() {
    let (tree, issues) = parse("<!-- c --><html><body>x");
    let children = tree.children(NodeId::ROOT);
    assert_eq!(children.len(), 2);
    assert!(matches!(
        tree.get(children[0]).map(|node| &node.node_type),
        Some(NodeType::Comment(data)) if data == " c "
    ));
    assert_eq!(tree.tag_name(children[1]), Some("html"));
    assert_eq!(
        issues.iter().map(|issue| issue.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::MissingDoctype]
    );
}

#[test]
fn test_comments_after_body() {
    let (tree, issues) = parse("<!DOCTYPE html><body></body><!--a--></html><!--b-->");
    assert!(issues.is_empty());
    let html = tree.document_element().expect("no html");
    let last_in_html = tree.last_child(html).expect("html is empty");
    assert!(matches!(
        tree.get(last_in_html).map(|node| &node.node_type),
        Some(NodeType::Comment(data)) if data == "a"
    ));
    let last_in_document = tree.last_child(NodeId::ROOT).expect("document is empty");
    assert!(matches!(
        tree.get(last_in_document).map(|node| &node.node_type),
        Some(NodeType::Comment(data)) if data == "b"
    ));
}

#[test]
fn test_text_after_html_end_goes_back_into_body() {
    let (tree, issues) = parse("<!DOCTYPE html><body>a</body></html>b");
    assert_eq!(tree.text_content(body(&tree)), "ab");
    assert_eq!(issues.len(), 1);
    assert_eq!(
        issues[0].origin,
        IssueOrigin::TreeBuilder(InsertionMode::AfterAfterBody)
    );
}

#[test]
fn test_cdata_becomes_comment() {
    let (tree, issues) = parse("<!DOCTYPE html><p><![CDATA[x]]></p>");
    let p = find_element(&tree, NodeId::ROOT, "p").expect("no p");
    let comment = tree.children(p)[0];
    assert!(matches!(
        tree.get(comment).map(|node| &node.node_type),
        Some(NodeType::Comment(data)) if data.starts_with("[CDATA[")
    ));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, ParseErrorCode::CdataInHtmlContent);
    assert!(issues[0].is_tokenizer_issue());
}

#[test]
fn test_doctype_variants() {
    let (tree, issues) = parse("<!DOCTYPE>");
    assert!(tree.quirks_mode());
    assert_eq!(
        issues.iter().map(|issue| issue.code).collect::<Vec<_>>(),
        vec![
            ParseErrorCode::MissingDoctypeName,
            ParseErrorCode::NonHtmlDoctype
        ]
    );

    let (tree, issues) = parse("<!doctype HTML SYSTEM \"about:legacy-compat\">");
    assert!(!tree.quirks_mode());
    assert!(issues.is_empty());

    let codes = codes("<!DOCTYPE html><!DOCTYPE html>");
    assert_eq!(codes, vec![ParseErrorCode::UnexpectedDoctype]);
}

#[test]
fn test_stray_end_p_inserts_empty_paragraph() {
    let (tree, issues) = parse("<!DOCTYPE html><body></p>");
    assert_eq!(child_tags(&tree, body(&tree)), vec!["p"]);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, ParseErrorCode::ElementNotInScope);
}

#[test]
fn test_end_tag_attributes_reported() {
    let codes = codes(r#"<!DOCTYPE html><p>x</p class="y">"#);
    assert_eq!(codes, vec![ParseErrorCode::EndTagWithAttributes]);
}

#[test]
fn test_unclosed_formatting_element_at_eof() {
    let codes = codes("<!DOCTYPE html><b>x");
    assert_eq!(codes, vec![ParseErrorCode::UnclosedElements]);
}

#[test]
fn test_stray_html_tag_merges_attributes() {
    let (tree, issues) = parse(r#"<!DOCTYPE html><html lang="en"><body><html lang="fr" dir="ltr">"#);
    let html = tree
        .as_element(tree.document_element().expect("no html"))
        .expect("html is not an element");
    assert_eq!(html.attr("lang"), Some("en"));
    assert_eq!(html.attr("dir"), Some("ltr"));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, ParseErrorCode::UnexpectedStartTag);
}

#[test]
fn test_whitespace_around_head_is_kept() {
    let (tree, issues) = parse("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n</head>\n<body>\n</body>\n</html>\n");
    assert!(issues.is_empty());
    let head = tree.head().expect("no head");
    assert_eq!(child_tags(&tree, head), vec!["meta"]);
    // Whitespace after </body> and </html> is handled by the "in body" rules.
    assert_eq!(tree.text_content(body(&tree)), "\n\n\n");
}

#[test]
fn test_issues_arrive_in_input_order() {
    let mut seen = Vec::new();
    let parser = HTMLParser::new(|issue: &ParseIssue| seen.push(issue.code));
    let _ = parser.run("<p id=a id=b><h1>x<h2>y").expect("parse failed");
    assert_eq!(
        seen,
        vec![
            ParseErrorCode::DuplicateAttribute,
            ParseErrorCode::MissingDoctype,
            ParseErrorCode::NestedHeading,
            ParseErrorCode::UnclosedElements,
        ]
    );
}

#[test]
fn test_unclosed_heading_is_reported_at_eof() {
    let codes = codes("<!DOCTYPE html><h1>Title<h2>Sub");
    assert_eq!(
        codes,
        vec![ParseErrorCode::NestedHeading, ParseErrorCode::UnclosedElements]
    );
}

#[test]
fn test_nul_in_text_is_replaced_not_dropped() {
    let (tree, issues) = parse("<!DOCTYPE html><p>a\0b");
    assert_eq!(tree.text_content(body(&tree)), "a\u{FFFD}b");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, ParseErrorCode::UnexpectedNullCharacter);
}
