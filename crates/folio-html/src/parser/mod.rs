//! HTML parser module for tree construction.

/// HTML parser implementation.
pub mod core;

pub use core::{HTMLParser, InsertionMode, format_tree, print_tree};
