//! Folio CLI - convert a small subset of HTML to LaTeX
//!
//! Usage:
//!   folio <file>              Convert to LaTeX on stdout
//!   folio <file> -o out.tex   Convert to LaTeX into a file
//!   folio <file> --tree       Show the document tree
//!   folio <file> --json       Output the document tree as JSON
//!   folio <file> --tokens     Show HTML tokens
//!   folio --html '<h1>Hello</h1>'

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;

use folio_common::warning::clear_warnings;
use folio_dom::{DomTree, NodeId, NodeType};
use folio_html::tokenizer::tokenize;
use folio_html::{ParseIssue, parse_document, print_tree};

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Convert a file and print LaTeX
    folio notes.html

    # Write the LaTeX to a file, without diagnostics
    folio notes.html -o notes.tex --quiet

    # Inspect how a snippet is parsed
    folio --html '<p>one<p>two' --tree
"#)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Path to the HTML file to convert
    #[arg(value_name = "FILE", required_unless_present = "html", conflicts_with = "html")]
    path: Option<PathBuf>,

    /// Convert an HTML string instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Write the output to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the document tree instead of LaTeX
    #[arg(long, conflicts_with_all = ["json", "tokens"])]
    tree: bool,

    /// Print the document tree as JSON instead of LaTeX
    #[arg(long, conflicts_with = "tokens")]
    json: bool,

    /// Print the token stream instead of LaTeX
    #[arg(long)]
    tokens: bool,

    /// Do not print parse errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let source = load_source(&cli)?;
    clear_warnings();

    if cli.tokens {
        return dump_tokens(&source, cli.quiet);
    }

    let quiet = cli.quiet;
    let tree = parse_document(&source, |issue| report_issue(issue, quiet))
        .context("failed to parse HTML")?;

    if cli.tree {
        println!("=== DOM Tree ===");
        print_tree(&tree, tree.root(), 0);
        return Ok(());
    }

    let output = if cli.json {
        let json = serde_json::to_string_pretty(&JsonNode::from_tree(&tree, NodeId::ROOT))
            .context("failed to serialize the document tree")?;
        json + "\n"
    } else {
        folio_latex::render(&tree).context("failed to render LaTeX")?
    };

    if let Some(ref path) = cli.output {
        fs::write(path, output).with_context(|| format!("failed to write '{}'", path.display()))?;
    } else {
        print!("{output}");
    }
    Ok(())
}

/// Read the HTML source from `--html` or the input file
fn load_source(cli: &Cli) -> anyhow::Result<String> {
    if let Some(ref html) = cli.html {
        Ok(html.clone())
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
    } else {
        anyhow::bail!("an input file or --html is required")
    }
}

fn report_issue(issue: &ParseIssue, quiet: bool) {
    if !quiet {
        eprintln!("{}", issue.to_string().yellow());
    }
}

/// Print every token the tokenizer produces, with its parse errors
fn dump_tokens(source: &str, quiet: bool) -> anyhow::Result<()> {
    let collector = tokenize(source).context("failed to tokenize HTML")?;
    for issue in &collector.issues {
        report_issue(issue, quiet);
    }
    println!("=== HTML Tokens ({}) ===", collector.tokens.len());
    for (i, token) in collector.tokens.iter().enumerate() {
        println!("  {i:3}: {token}");
    }
    Ok(())
}

/// Serializable view of a document tree node
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum JsonNode<'a> {
    Document {
        #[serde(skip_serializing_if = "Option::is_none")]
        doctype: Option<&'a str>,
        #[serde(rename = "quirksMode")]
        quirks_mode: bool,
        children: Vec<JsonNode<'a>>,
    },
    Element {
        #[serde(rename = "tagName")]
        tag_name: &'a str,
        attributes: BTreeMap<&'a str, &'a str>,
        children: Vec<JsonNode<'a>>,
    },
    Text {
        content: &'a str,
    },
    Comment {
        content: &'a str,
    },
}

impl<'a> JsonNode<'a> {
    fn from_tree(tree: &'a DomTree, id: NodeId) -> Option<Self> {
        let node = tree.get(id)?;
        let children = || -> Vec<JsonNode<'a>> {
            tree.children(id)
                .iter()
                .filter_map(|&child| Self::from_tree(tree, child))
                .collect()
        };
        Some(match &node.node_type {
            NodeType::Document => Self::Document {
                doctype: tree.doctype().and_then(|d| d.name.as_deref()),
                quirks_mode: tree.quirks_mode(),
                children: children(),
            },
            NodeType::Element(data) => Self::Element {
                tag_name: &data.tag_name,
                attributes: data
                    .attrs
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect(),
                children: children(),
            },
            NodeType::Text(text) => Self::Text { content: text },
            NodeType::Comment(text) => Self::Comment { content: text },
        })
    }
}
