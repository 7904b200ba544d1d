//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! "This specification defines the parsing rules for HTML documents, whether
//! they are syntactically correct or not. Certain points in the parsing
//! algorithm are said to be parse errors."
//!
//! Every parse error here is recoverable: it is reported, repaired, and the
//! parse continues.

use core::fmt;

use strum_macros::Display;

use crate::parser::InsertionMode;
use crate::tokenizer::TokenizerState;

/// The error codes of [§ 13.2.2](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
/// that the tokenizer can raise, followed by the tree construction errors,
/// which the standard leaves unnamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ParseErrorCode {
    // Tokenizer errors.
    /// "abrupt-closing-of-empty-comment"
    AbruptClosingOfEmptyComment,
    /// "abrupt-doctype-public-identifier"
    AbruptDoctypePublicIdentifier,
    /// "abrupt-doctype-system-identifier"
    AbruptDoctypeSystemIdentifier,
    /// "cdata-in-html-content"
    CdataInHtmlContent,
    /// "duplicate-attribute"
    DuplicateAttribute,
    /// "end-tag-with-attributes"
    EndTagWithAttributes,
    /// "end-tag-with-trailing-solidus"
    EndTagWithTrailingSolidus,
    /// "eof-before-tag-name"
    EofBeforeTagName,
    /// "eof-in-comment"
    EofInComment,
    /// "eof-in-doctype"
    EofInDoctype,
    /// "eof-in-tag"
    EofInTag,
    /// "incorrectly-closed-comment"
    IncorrectlyClosedComment,
    /// "incorrectly-opened-comment"
    IncorrectlyOpenedComment,
    /// "invalid-character-sequence-after-doctype-name"
    InvalidCharacterSequenceAfterDoctypeName,
    /// "invalid-first-character-of-tag-name"
    InvalidFirstCharacterOfTagName,
    /// "missing-attribute-value"
    MissingAttributeValue,
    /// "missing-doctype-name"
    MissingDoctypeName,
    /// "missing-doctype-public-identifier"
    MissingDoctypePublicIdentifier,
    /// "missing-doctype-system-identifier"
    MissingDoctypeSystemIdentifier,
    /// "missing-end-tag-name"
    MissingEndTagName,
    /// "missing-quote-before-doctype-public-identifier"
    MissingQuoteBeforeDoctypePublicIdentifier,
    /// "missing-quote-before-doctype-system-identifier"
    MissingQuoteBeforeDoctypeSystemIdentifier,
    /// "missing-whitespace-after-doctype-public-keyword"
    MissingWhitespaceAfterDoctypePublicKeyword,
    /// "missing-whitespace-after-doctype-system-keyword"
    MissingWhitespaceAfterDoctypeSystemKeyword,
    /// "missing-whitespace-before-doctype-name"
    MissingWhitespaceBeforeDoctypeName,
    /// "missing-whitespace-between-attributes"
    MissingWhitespaceBetweenAttributes,
    /// "missing-whitespace-between-doctype-public-and-system-identifiers"
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    /// "nested-comment"
    NestedComment,
    /// "unexpected-character-after-doctype-system-identifier"
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    /// "unexpected-character-in-attribute-name"
    UnexpectedCharacterInAttributeName,
    /// "unexpected-character-in-unquoted-attribute-value"
    UnexpectedCharacterInUnquotedAttributeValue,
    /// "unexpected-equals-sign-before-attribute-name"
    UnexpectedEqualsSignBeforeAttributeName,
    /// "unexpected-null-character"
    UnexpectedNullCharacter,
    /// "unexpected-question-mark-instead-of-tag-name"
    UnexpectedQuestionMarkInsteadOfTagName,
    /// "unexpected-solidus-in-tag"
    UnexpectedSolidusInTag,

    // Tree construction errors.
    /// Content arrived before any DOCTYPE.
    MissingDoctype,
    /// The DOCTYPE is not `<!DOCTYPE html>`.
    NonHtmlDoctype,
    /// A DOCTYPE after the document has started.
    UnexpectedDoctype,
    /// A start tag the current insertion mode ignores or repairs.
    UnexpectedStartTag,
    /// An end tag the current insertion mode ignores.
    UnexpectedEndTag,
    /// End of input inside a raw-text element.
    UnexpectedEndOfFile,
    /// A heading opened while another heading is the current node.
    NestedHeading,
    /// Elements that may not be left open are still open at the end.
    UnclosedElements,
    /// An end tag whose element is not in scope.
    ElementNotInScope,
    /// An end tag closed elements other than the current node.
    MisnestedTags,
}

/// Which state machine raised a [`ParseIssue`], and in which state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueOrigin {
    /// Raised by the tokenizer while in the given state.
    Tokenizer(TokenizerState),
    /// Raised by the tree builder while in the given insertion mode.
    TreeBuilder(InsertionMode),
}

impl fmt::Display for IssueOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tokenizer(state) => write!(f, "tokenizer, {state} state"),
            Self::TreeBuilder(mode) => write!(f, "tree builder, {mode} mode"),
        }
    }
}

/// A recoverable parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// State machine and state active when the error was raised.
    pub origin: IssueOrigin,
    /// What went wrong.
    pub code: ParseErrorCode,
    /// Input position in characters, when the tokenizer raised the error.
    pub position: Option<usize>,
}

impl ParseIssue {
    /// Returns true if the tokenizer raised this error.
    #[must_use]
    pub const fn is_tokenizer_issue(&self) -> bool {
        matches!(self.origin, IssueOrigin::Tokenizer(_))
    }
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error: {} ({})", self.code, self.origin)?;
        if let Some(position) = self.position {
            write!(f, " at position {position}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_display_in_kebab_case() {
        assert_eq!(ParseErrorCode::EofInTag.to_string(), "eof-in-tag");
        assert_eq!(
            ParseErrorCode::CdataInHtmlContent.to_string(),
            "cdata-in-html-content"
        );
        assert_eq!(ParseErrorCode::MissingDoctype.to_string(), "missing-doctype");
    }

    #[test]
    fn test_issue_display_includes_position() {
        let issue = ParseIssue {
            origin: IssueOrigin::TreeBuilder(InsertionMode::InBody),
            code: ParseErrorCode::NestedHeading,
            position: None,
        };
        assert_eq!(
            issue.to_string(),
            "parse error: nested-heading (tree builder, InBody mode)"
        );

        let issue = ParseIssue {
            origin: IssueOrigin::Tokenizer(TokenizerState::TagName),
            code: ParseErrorCode::EofInTag,
            position: Some(4),
        };
        assert!(issue.to_string().ends_with("at position 4"));
        assert!(issue.is_tokenizer_issue());
    }
}
