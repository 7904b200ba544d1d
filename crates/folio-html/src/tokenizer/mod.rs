//! HTML tokenizer module.
//!
//! Implements the subset of [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! used by Folio: data, RCDATA, tags, attributes, comments, and DOCTYPEs.

/// Character classification predicates.
pub mod chars;
/// Comment and markup declaration states.
mod comment;
/// HTML tokenizer state machine implementation.
pub mod core;
/// DOCTYPE states.
mod doctype;
/// Helper methods for tokenizer state transitions.
mod helpers;
/// The character source the tokenizer reads from.
pub mod input;
/// The tokenizer's consumer interface.
pub mod sink;
/// Token types produced by the tokenizer.
pub mod token;

pub use core::{HTMLTokenizer, TokenizerState};
pub use input::InputStream;
pub use sink::{TokenCollector, TokenSink, TokenSinkResult, tokenize};
pub use token::{Attribute, Token};
