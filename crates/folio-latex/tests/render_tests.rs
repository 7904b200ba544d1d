//! Integration tests for the LaTeX renderer.

use folio_common::warning::has_warned;
use folio_dom::{DomTree, ElementData, NodeId, NodeType};
use folio_latex::{RenderError, render};

/// Helper to parse HTML and render it
fn latex(html: &str) -> String {
    let (tree, _) = folio_html::parse_with_issues(html).expect("parse failed");
    render(&tree).expect("render failed")
}

fn element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.alloc(NodeType::Element(ElementData::new(tag)));
    tree.append_child(parent, id);
    id
}

#[test]
fn test_preamble_and_metadata() {
    let out = latex(
        "<!DOCTYPE html><html><head><title>Notes</title>\
         <meta name=\"author\" content=\"Ada Lovelace\"></head>\
         <body><h1>Intro</h1><p>Hello <b>world</b> 50%</p></body></html>",
    );
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "\\documentclass{article}");
    assert!(lines.contains(&"\\title{Notes}"));
    assert!(lines.contains(&"\\author{Ada Lovelace}"));
    assert!(lines.contains(&"\\maketitle"));
    assert_eq!(lines.last(), Some(&"\\end{document}"));
    assert!(out.contains("\\section{Intro}"));
    assert!(out.contains("Hello \\textbf{world} 50\\%"));
}

#[test]
fn test_default_metadata() {
    let out = latex("<p>x");
    assert!(out.contains("\\title{empty}"));
    assert!(out.contains("\\author{unknown}"));
}

#[test]
fn test_headings_map_to_sectioning_commands() {
    let out = latex("<!DOCTYPE html><h1>a</h1><h2>b</h2><h3>c</h3><h4>d</h4><h5>e</h5>");
    for command in [
        "\\section{a}",
        "\\subsection{b}",
        "\\subsubsection{c}",
        "\\paragraph{d}",
        "\\subparagraph{e}",
    ] {
        assert!(out.contains(command), "missing {command}");
    }
}

#[test]
fn test_lists() {
    let out = latex("<!DOCTYPE html><ul><li>a<li>b</ul><ol><li>c</ol><dl><dt>term<dd>def</dl>");
    assert!(out.contains("\\begin{itemize}\n\n\\item a\n\\item b\n\\end{itemize}"));
    assert!(out.contains("\\begin{enumerate}\n\n\\item c\n\\end{enumerate}"));
    assert!(out.contains("\\item[term] \n\\item def"));
}

#[test]
fn test_inline_markup() {
    let out = latex(
        "<!DOCTYPE html><p><i>i</i> <em>em</em> <u>u</u> <code>c</code> \
         <big>B</big> <small>s</small> <a href=\"http://x.org/#top\">site</a>",
    );
    assert!(out.contains(
        "\\emph{i} \\emph{em} \\underline{u} \\texttt{c} {\\large B} {\\small s} \
         \\href{http://x.org/\\#top}{site}"
    ));
}

#[test]
fn test_void_elements() {
    let out = latex("<!DOCTYPE html><p>a<br>b<img src=\"fig.png\"><hr>");
    assert!(out.contains("a\\\\\nb\\includegraphics{fig.png}"));
    assert!(out.contains("\\hrulefill"));
}

#[test]
fn test_comments_are_dropped_and_newlines_folded() {
    let out = latex("<!DOCTYPE html><p>a<!-- hidden -->b\nc</p>");
    assert!(out.contains("ab c"));
    assert!(!out.contains("hidden"));
}

#[test]
fn test_unknown_element_renders_children_with_warning() {
    let mut tree = DomTree::new();
    let html = element(&mut tree, NodeId::ROOT, "html");
    let body = element(&mut tree, html, "body");
    let span = element(&mut tree, body, "span");
    let text = tree.alloc(NodeType::Text("inside".to_string()));
    tree.append_child(span, text);

    let out = render(&tree).expect("render failed");
    assert!(out.contains("\ninside\n"));
    assert!(has_warned(
        "LaTeX",
        "no markup for <span>, rendering its children only"
    ));
}

#[test]
fn test_missing_structure_is_an_error() {
    let tree = DomTree::new();
    assert!(matches!(
        render(&tree),
        Err(RenderError::MissingDocumentElement)
    ));

    let mut tree = DomTree::new();
    let _ = element(&mut tree, NodeId::ROOT, "html");
    assert!(matches!(render(&tree), Err(RenderError::MissingBody)));
}
