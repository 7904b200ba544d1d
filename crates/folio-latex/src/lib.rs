//! LaTeX renderer for Folio document trees.
//!
//! Walks a finished [`DomTree`] and maps every element of the supported HTML
//! subset onto a fixed piece of LaTeX markup. Metadata comes from the
//! `head` element: the first `title` becomes `\title`, and
//! `<meta name="author" content="...">` becomes `\author`.
//!
//! Elements without a mapping render their children only, with one warning
//! per tag name through [`folio_common::warning::warn_once`].

use std::fmt::{self, Write as _};

use folio_common::warning::warn_once;
use folio_dom::{DomTree, NodeId, NodeType};
use thiserror::Error;

/// Why a tree could not be rendered.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The document has no `html` element.
    #[error("document has no root element")]
    MissingDocumentElement,

    /// The `html` element has no `body` child.
    #[error("document has no body element")]
    MissingBody,

    /// Writing to the output buffer failed.
    #[error("failed to write LaTeX output")]
    Fmt(#[from] fmt::Error),
}

const DEFAULT_TITLE: &str = "empty";
const DEFAULT_AUTHOR: &str = "unknown";

/// Document metadata taken from the `head` element.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Metadata {
    title: String,
    author: String,
}

impl Metadata {
    fn from_tree(tree: &DomTree) -> Self {
        let mut metadata = Self {
            title: DEFAULT_TITLE.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
        };
        let Some(head) = tree.head() else {
            return metadata;
        };

        let mut seen_title = false;
        for &child in tree.children(head) {
            let Some(element) = tree.as_element(child) else {
                continue;
            };
            match element.tag_name.as_str() {
                "title" if !seen_title => {
                    metadata.title = tree.text_content(child);
                    seen_title = true;
                }
                "meta" if element.attr("name") == Some("author") => {
                    if let Some(content) = element.attr("content") {
                        metadata.author = content.to_string();
                    }
                }
                _ => {}
            }
        }
        metadata
    }
}

/// Render `tree` as a complete LaTeX document.
///
/// # Errors
///
/// Returns [`RenderError::MissingDocumentElement`] or
/// [`RenderError::MissingBody`] for trees that were not produced by the
/// parser, which always creates both.
pub fn render(tree: &DomTree) -> Result<String, RenderError> {
    let html = tree
        .document_element()
        .ok_or(RenderError::MissingDocumentElement)?;
    let body = tree
        .child_element(html, "body")
        .ok_or(RenderError::MissingBody)?;
    let metadata = Metadata::from_tree(tree);

    let mut writer = LatexWriter {
        tree,
        out: String::new(),
    };
    writer.write_children(body)?;
    let content = writer.out.trim();

    let mut out = String::new();
    writeln!(out, "\\documentclass{{article}}")?;
    writeln!(out, "\\usepackage{{graphicx}}")?;
    writeln!(out, "\\usepackage{{hyperref}}")?;
    writeln!(out, "\\title{{{}}}", escape_text(&metadata.title))?;
    writeln!(out, "\\author{{{}}}", escape_text(&metadata.author))?;
    writeln!(out, "\\begin{{document}}")?;
    writeln!(out, "\\maketitle")?;
    if !content.is_empty() {
        writeln!(out, "{content}")?;
    }
    writeln!(out, "\\end{{document}}")?;
    Ok(out)
}

/// Escape LaTeX special characters and fold line breaks into spaces.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' | '}' | '$' | '&' | '#' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// Escape the characters `\href` and `\includegraphics` arguments cannot
/// contain verbatim.
fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        if matches!(c, '\\' | '{' | '}' | '%' | '#') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

struct LatexWriter<'a> {
    tree: &'a DomTree,
    out: String,
}

impl LatexWriter<'_> {
    fn write_children(&mut self, id: NodeId) -> fmt::Result {
        for &child in self.tree.children(id) {
            self.write_node(child)?;
        }
        Ok(())
    }

    fn write_node(&mut self, id: NodeId) -> fmt::Result {
        let tree = self.tree;
        let Some(node) = tree.get(id) else {
            return Ok(());
        };
        match &node.node_type {
            NodeType::Text(text) => self.out.push_str(&escape_text(text)),
            NodeType::Element(_) => self.write_element(id)?,
            NodeType::Document | NodeType::Comment(_) => {}
        }
        Ok(())
    }

    /// Wrap the children of `id` in `open` and `close`.
    fn wrap(&mut self, id: NodeId, open: &str, close: &str) -> fmt::Result {
        self.out.push_str(open);
        self.write_children(id)?;
        self.out.push_str(close);
        Ok(())
    }

    fn write_element(&mut self, id: NodeId) -> fmt::Result {
        let tree = self.tree;
        let Some(element) = tree.as_element(id) else {
            return Ok(());
        };
        match element.tag_name.as_str() {
            "p" => self.wrap(id, "\n\n", "\n\n"),
            "h1" => self.wrap(id, "\n\\section{", "}\n"),
            "h2" => self.wrap(id, "\n\\subsection{", "}\n"),
            "h3" => self.wrap(id, "\n\\subsubsection{", "}\n"),
            "h4" => self.wrap(id, "\n\\paragraph{", "}\n"),
            "h5" => self.wrap(id, "\n\\subparagraph{", "}\n"),
            "ul" => self.wrap(id, "\n\\begin{itemize}\n", "\n\\end{itemize}\n"),
            "ol" => self.wrap(id, "\n\\begin{enumerate}\n", "\n\\end{enumerate}\n"),
            "dl" => self.wrap(id, "\n\\begin{description}\n", "\n\\end{description}\n"),
            "li" | "dd" => self.wrap(id, "\n\\item ", ""),
            "dt" => self.wrap(id, "\n\\item[", "] "),
            "b" | "strong" => self.wrap(id, "\\textbf{", "}"),
            "i" | "em" => self.wrap(id, "\\emph{", "}"),
            "u" => self.wrap(id, "\\underline{", "}"),
            "code" | "tt" => self.wrap(id, "\\texttt{", "}"),
            "big" => self.wrap(id, "{\\large ", "}"),
            "small" => self.wrap(id, "{\\small ", "}"),
            "a" => match element.attr("href") {
                Some(href) => {
                    let open = format!("\\href{{{}}}{{", escape_url(href));
                    self.wrap(id, &open, "}")
                }
                None => self.write_children(id),
            },
            "br" => {
                self.out.push_str("\\\\\n");
                Ok(())
            }
            "hr" => {
                self.out.push_str("\n\n\\hrulefill\n\n");
                Ok(())
            }
            "img" => {
                match element.attr("src") {
                    Some(src) => write!(self.out, "\\includegraphics{{{}}}", escape_url(src))?,
                    None => warn_once("LaTeX", "<img> without src skipped"),
                }
                Ok(())
            }
            // Metadata already went into the preamble.
            "title" | "meta" => Ok(()),
            tag => {
                warn_once(
                    "LaTeX",
                    &format!("no markup for <{tag}>, rendering its children only"),
                );
                self.write_children(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text_handles_specials() {
        assert_eq!(escape_text("50% of $5"), "50\\% of \\$5");
        assert_eq!(escape_text("a_b & {c}"), "a\\_b \\& \\{c\\}");
        assert_eq!(escape_text("x\\y"), "x\\textbackslash{}y");
        assert_eq!(escape_text("~^"), "\\textasciitilde{}\\textasciicircum{}");
        assert_eq!(escape_text("one\ntwo\r\n"), "one two  ");
    }

    #[test]
    fn test_escape_url_keeps_slashes() {
        assert_eq!(escape_url("http://x.org/a#b"), "http://x.org/a\\#b");
    }
}
