use thiserror::Error;

use crate::parser::InsertionMode;

/// Convenience alias for results whose error is a parse abort.
pub type Result<T> = std::result::Result<T, Error>;

/// A construct outside the supported subset of HTML.
///
/// Unlike a [`ParseIssue`](crate::ParseIssue), which is repaired and
/// reported, an `Error` stops the parse immediately.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A start tag that is excluded from the subset, or missing from the
    /// table of the insertion mode that received it.
    #[error("HTML tag <{tag}> is not supported (insertion mode {mode})")]
    UnsupportedElement {
        /// Lower-cased tag name.
        tag: String,
        /// Insertion mode that rejected the tag.
        mode: InsertionMode,
    },

    /// An end tag the "in body" insertion mode has no rule for.
    #[error("HTML end tag </{tag}> is not supported (insertion mode {mode})")]
    UnsupportedEndTag {
        /// Lower-cased tag name.
        tag: String,
        /// Insertion mode that rejected the tag.
        mode: InsertionMode,
    },

    /// A formatting end tag that does not close the current node.
    ///
    /// Recovering from this needs the adoption agency algorithm, which is
    /// not implemented.
    #[error("end tag </{tag}> does not match the current element <{current}>")]
    MisnestedEndTag {
        /// Tag name of the end tag.
        tag: String,
        /// Tag name of the current node.
        current: String,
    },

    /// An `&` in text or an attribute value.
    #[error("character references are not supported (at input position {position})")]
    CharacterReference {
        /// Index of the `&` in the input, in characters.
        position: usize,
    },

    /// A token was reprocessed without the insertion mode changing.
    #[error("token reprocessed twice in insertion mode {mode}")]
    ReprocessLoop {
        /// Mode that asked for the reprocess.
        mode: InsertionMode,
    },
}
