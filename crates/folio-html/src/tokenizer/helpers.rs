//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Token emission ("Emit the current token")
//! - RCDATA end tag detection
//! - Attribute construction and duplicate detection
//! - Parse error reporting

use super::core::{Emission, HTMLTokenizer, TokenizerState};
use super::token::{Attribute, Token};
use crate::issue::{IssueOrigin, ParseErrorCode, ParseIssue};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Switch to the X state"
    ///
    /// Transitions to a new state. The next character will be consumed on the
    /// next iteration of the main loop.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Reconsume in the X state"
    ///
    /// Pushes the current input character back so the new state reads it again.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.input.pushback();
        self.state = new_state;
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Emit the current token"
    ///
    /// For tags, the pending attribute is committed first.
    pub(super) fn emit_token(&mut self) {
        self.commit_current_attribute();
        let Some(token) = self.current_token.take() else {
            return;
        };

        // [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
        // "When an end tag token is emitted with attributes, that is an
        // end-tag-with-attributes parse error. When an end tag token is emitted
        // with its self-closing flag set, that is an end-tag-with-trailing-solidus
        // parse error."
        if let Token::EndTag {
            self_closing,
            ref attributes,
            ..
        } = token
        {
            if !attributes.is_empty() {
                self.log_parse_error(ParseErrorCode::EndTagWithAttributes);
            }
            if self_closing {
                self.log_parse_error(ParseErrorCode::EndTagWithTrailingSolidus);
            }
        }
        self.emitted.push(Emission::Token(token));
    }

    /// "Emit the current input character as a character token."
    ///
    /// Emits a character token directly without going through `current_token`.
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.emitted.push(Emission::Token(Token::new_character(c)));
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof_token(&mut self) {
        if self.at_eof {
            return;
        }
        self.at_eof = true;
        self.emitted.push(Emission::Token(Token::new_eof()));
    }

    /// "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
    ///
    /// The unfinished tag is dropped.
    pub(super) fn eof_in_tag(&mut self) {
        self.log_parse_error(ParseErrorCode::EofInTag);
        self.current_token = None;
        self.current_attribute = None;
        self.emit_eof_token();
    }
}

// =============================================================================
// RCDATA Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    ///
    /// Used to determine if `</title>` should close the current `<title>` element.
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        if let (Some(last_start_tag), Some(Token::EndTag { name, .. })) =
            (&self.last_start_tag_name, &self.current_token)
        {
            return name == last_start_tag;
        }
        false
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// "Anything else":
    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character
    /// token, and a character token for each of the characters in the temporary
    /// buffer... Reconsume in the RCDATA state."
    pub(super) fn emit_rcdata_end_tag_name_anything_else(&mut self) {
        // STEP 1: "Emit a U+003C LESS-THAN SIGN character token"
        self.emit_character_token('<');
        // STEP 2: "Emit a U+002F SOLIDUS character token"
        self.emit_character_token('/');
        // STEP 3: "Emit a character token for each of the characters in the temporary buffer"
        let buffer = std::mem::take(&mut self.temporary_buffer);
        for c in buffer.chars() {
            self.emit_character_token(c);
        }
        // STEP 4: Discard the current end tag token
        self.current_token = None;
        // STEP 5: "Reconsume in the RCDATA state"
        self.reconsume_in(TokenizerState::RCDATA);
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Start a new attribute in the current tag token. Set that attribute
    /// name and value to the empty string."
    pub(super) fn start_new_attribute(&mut self) {
        self.commit_current_attribute();
        self.current_attribute = Some(Attribute::default());
    }

    /// "Append the current input character to the current attribute's name."
    pub(super) fn append_to_current_attribute_name(&mut self, c: char) {
        if let Some(ref mut attribute) = self.current_attribute {
            attribute.name.push(c);
        }
    }

    /// "Append the current input character to the current attribute's value."
    pub(super) fn append_to_current_attribute_value(&mut self, c: char) {
        if let Some(ref mut attribute) = self.current_attribute {
            attribute.value.push(c);
        }
    }

    /// Move the pending attribute onto the current tag token.
    ///
    /// A name already present on the token keeps its first value.
    pub(super) fn commit_current_attribute(&mut self) {
        if let (Some(attribute), Some(token)) =
            (self.current_attribute.take(), self.current_token.as_mut())
        {
            token.add_attribute(attribute);
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "When the user agent leaves the attribute name state... if there is
    /// already an attribute on the token with the exact same name, then this
    /// is a duplicate-attribute parse error and the new attribute must be
    /// removed from the token."
    ///
    /// Only the error is raised here. Removal happens in
    /// [`commit_current_attribute`](Self::commit_current_attribute).
    pub(super) fn check_duplicate_attribute(&mut self) {
        let is_duplicate = match (&self.current_attribute, &self.current_token) {
            (Some(attribute), Some(token)) => token.has_attribute(&attribute.name),
            _ => false,
        };
        if is_duplicate {
            self.log_parse_error(ParseErrorCode::DuplicateAttribute);
        }
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Queues a parse error for the sink. Parse errors in HTML are not
    /// fatal: the tokenizer recovers and continues.
    ///
    /// The position is the index of the current input character, or the
    /// input length when the error is raised at end of input.
    pub(super) fn log_parse_error(&mut self, code: ParseErrorCode) {
        self.emitted.push(Emission::Issue(ParseIssue {
            origin: IssueOrigin::Tokenizer(self.state),
            code,
            position: Some(self.input.position().saturating_sub(1)),
        }));
    }
}
