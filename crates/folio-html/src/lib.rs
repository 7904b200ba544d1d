//! HTML tokenizer and tree builder for the Folio converter.
//!
//! # Scope
//!
//! This crate implements a deliberately restricted subset of the WHATWG
//! parsing algorithm:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA, tag, and attribute states
//!   - Comment, bogus comment, and DOCTYPE states
//!
//! - **HTML Parser / Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Insertion modes: Initial, BeforeHtml, BeforeHead, InHead, AfterHead, InBody, Text, AfterBody, AfterAfterBody
//!   - Implicit closing of `p`, `li`, `dd`, `dt` and headings
//!
//! The two state machines are coupled through [`tokenizer::TokenSink`]: the
//! tokenizer pushes each token into the tree builder as soon as it is produced,
//! and the tree builder may answer with a request to enter RCDATA for `title`.
//!
//! # Unsupported constructs
//!
//! Anything outside the subset aborts the parse with an [`Error`] instead of
//! being guessed at:
//! - Character references (`&amp;` and friends)
//! - Script, style, template, and other raw-text elements
//! - Tables, forms, and every tag missing from the "in body" table
//! - Mis-nested formatting end tags (no adoption agency algorithm)

/// Hard failures that abort a parse.
pub mod error;
/// Recoverable parse errors reported through the diagnostic callback.
pub mod issue;
/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

use folio_dom::DomTree;

pub use error::{Error, Result};
pub use issue::{IssueOrigin, ParseErrorCode, ParseIssue};
pub use parser::{HTMLParser, InsertionMode, format_tree, print_tree};
pub use tokenizer::{Attribute, HTMLTokenizer, Token, TokenCollector, TokenSink, TokenSinkResult};

/// Parse `input` into a document tree, reporting every recoverable parse
/// error to `on_issue` in input order.
///
/// # Errors
///
/// Returns an [`Error`] when the input uses a construct outside the
/// supported subset. No partial tree is returned in that case.
pub fn parse_document<F>(input: &str, on_issue: F) -> Result<DomTree>
where
    F: FnMut(&ParseIssue),
{
    HTMLParser::new(on_issue).run(input)
}

/// Parse `input` and return the tree together with all recoverable parse
/// errors.
///
/// # Errors
///
/// Returns an [`Error`] when the input uses a construct outside the
/// supported subset.
pub fn parse_with_issues(input: &str) -> Result<(DomTree, Vec<ParseIssue>)> {
    let mut issues = Vec::new();
    let tree = parse_document(input, |issue| issues.push(issue.clone()))?;
    Ok((tree, issues))
}
