//! DOCTYPE states,
//! [§ 13.2.5.53](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
//! through [§ 13.2.5.68](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state).

use super::chars::{NULL, REPLACEMENT_CHARACTER, is_ascii_upper_alpha, is_tokenizer_whitespace};
use super::core::{HTMLTokenizer, TokenizerState};
use super::token::Token;
use crate::issue::ParseErrorCode;

impl HTMLTokenizer {
    fn set_force_quirks(&mut self) {
        if let Some(ref mut token) = self.current_token {
            token.set_force_quirks();
        }
    }

    /// "Create a new DOCTYPE token. Set the token's name to ..."
    fn start_doctype_with_name(&mut self, c: char) {
        let mut token = Token::new_doctype();
        token.append_to_doctype_name(c);
        self.current_token = Some(token);
    }

    /// "EOF - This is an eof-in-doctype parse error. Set the current DOCTYPE
    /// token's force-quirks flag to on. Emit the current DOCTYPE token. Emit an
    /// end-of-file token."
    ///
    /// In states where no DOCTYPE token exists yet, one is created first.
    fn eof_in_doctype(&mut self) {
        self.log_parse_error(ParseErrorCode::EofInDoctype);
        if self.current_token.is_none() {
            self.current_token = Some(Token::new_doctype());
        }
        self.set_force_quirks();
        self.emit_token();
        self.emit_eof_token();
    }

    /// Raise `code`, turn force-quirks on, and go to the data state with the
    /// DOCTYPE emitted. Shared by every "missing identifier" and "abrupt
    /// identifier" `>` branch.
    fn emit_quirky_doctype(&mut self, code: ParseErrorCode) {
        self.log_parse_error(code);
        self.set_force_quirks();
        self.switch_to(TokenizerState::Data);
        self.emit_token();
    }

    /// Raise `code`, turn force-quirks on, and reconsume in the bogus DOCTYPE state.
    fn bogus_doctype(&mut self, code: ParseErrorCode) {
        self.log_parse_error(code);
        self.set_force_quirks();
        self.reconsume_in(TokenizerState::BogusDOCTYPE);
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    pub(super) fn handle_doctype_state(&mut self) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION (tab), U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+0020 SPACE"
            // "Switch to the before DOCTYPE name state."
            Some(c) if is_tokenizer_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPEName);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "Reconsume in the before DOCTYPE name state."
            Some('>') => self.reconsume_in(TokenizerState::BeforeDOCTYPEName),
            // "EOF"
            // "This is an eof-in-doctype parse error. Create a new DOCTYPE token.
            // Set its force-quirks flag to on. Emit the current token. Emit an
            // end-of-file token."
            None => self.eof_in_doctype(),
            // "Anything else"
            // "This is a missing-whitespace-before-doctype-name parse error.
            // Reconsume in the before DOCTYPE name state."
            Some(_) => {
                self.log_parse_error(ParseErrorCode::MissingWhitespaceBeforeDoctypeName);
                self.reconsume_in(TokenizerState::BeforeDOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    pub(super) fn handle_before_doctype_name_state(&mut self) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION (tab), U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+0020 SPACE"
            // "Ignore the character."
            Some(c) if is_tokenizer_whitespace(c) => {}
            // "ASCII upper alpha"
            // "Create a new DOCTYPE token. Set the token's name to the lowercase version
            // of the current input character (add 0x0020 to the character's code point).
            // Switch to the DOCTYPE name state."
            Some(c) if is_ascii_upper_alpha(c) => {
                self.start_doctype_with_name(c.to_ascii_lowercase());
                self.switch_to(TokenizerState::DOCTYPEName);
            }
            // "U+0000 NULL"
            // "This is an unexpected-null-character parse error. Create a new DOCTYPE
            // token. Set the token's name to a U+FFFD REPLACEMENT CHARACTER character.
            // Switch to the DOCTYPE name state."
            Some(NULL) => {
                self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.start_doctype_with_name(REPLACEMENT_CHARACTER);
                self.switch_to(TokenizerState::DOCTYPEName);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "This is a missing-doctype-name parse error. Create a new DOCTYPE token.
            // Set its force-quirks flag to on. Switch to the data state. Emit the
            // current token."
            Some('>') => {
                self.current_token = Some(Token::new_doctype());
                self.emit_quirky_doctype(ParseErrorCode::MissingDoctypeName);
            }
            // "EOF"
            None => self.eof_in_doctype(),
            // "Anything else"
            // "Create a new DOCTYPE token. Set the token's name to the current input
            // character. Switch to the DOCTYPE name state."
            Some(c) => {
                self.start_doctype_with_name(c);
                self.switch_to(TokenizerState::DOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    pub(super) fn handle_doctype_name_state(&mut self) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION (tab), U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+0020 SPACE"
            // "Switch to the after DOCTYPE name state."
            Some(c) if is_tokenizer_whitespace(c) => {
                self.switch_to(TokenizerState::AfterDOCTYPEName);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "Switch to the data state. Emit the current DOCTYPE token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "ASCII upper alpha"
            // "Append the lowercase version of the current input character (add 0x0020
            // to the character's code point) to the current DOCTYPE token's name."
            Some(c) if is_ascii_upper_alpha(c) => {
                if let Some(ref mut token) = self.current_token {
                    token.append_to_doctype_name(c.to_ascii_lowercase());
                }
            }
            // "U+0000 NULL"
            // "This is an unexpected-null-character parse error. Append a U+FFFD
            // REPLACEMENT CHARACTER character to the current DOCTYPE token's name."
            Some(NULL) => {
                self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
                if let Some(ref mut token) = self.current_token {
                    token.append_to_doctype_name(REPLACEMENT_CHARACTER);
                }
            }
            // "EOF"
            None => self.eof_in_doctype(),
            // "Anything else"
            // "Append the current input character to the current DOCTYPE token's name."
            Some(c) => {
                if let Some(ref mut token) = self.current_token {
                    token.append_to_doctype_name(c);
                }
            }
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    pub(super) fn handle_after_doctype_name_state(&mut self) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION (tab), U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+0020 SPACE"
            // "Ignore the character."
            Some(c) if is_tokenizer_whitespace(c) => {}
            // "U+003E GREATER-THAN SIGN (>)"
            // "Switch to the data state. Emit the current DOCTYPE token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "EOF"
            None => self.eof_in_doctype(),
            // "Anything else"
            // "If the six characters starting from the current input character are an
            // ASCII case-insensitive match for the word "PUBLIC", then consume those
            // characters and switch to the after DOCTYPE public keyword state.
            // Otherwise, if the six characters starting from the current input character
            // are an ASCII case-insensitive match for the word "SYSTEM", then consume
            // those characters and switch to the after DOCTYPE system keyword state.
            // Otherwise, this is an invalid-character-sequence-after-doctype-name parse
            // error. Set the current DOCTYPE token's force-quirks flag to on. Reconsume
            // in the bogus DOCTYPE state."
            Some(_) => {
                self.input.pushback();
                if self.input.literal_match("PUBLIC", true) {
                    self.switch_to(TokenizerState::AfterDOCTYPEPublicKeyword);
                } else if self.input.literal_match("SYSTEM", true) {
                    self.switch_to(TokenizerState::AfterDOCTYPESystemKeyword);
                } else {
                    // Already pushed back, so switching is reconsuming.
                    self.log_parse_error(ParseErrorCode::InvalidCharacterSequenceAfterDoctypeName);
                    self.set_force_quirks();
                    self.switch_to(TokenizerState::BogusDOCTYPE);
                }
            }
        }
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    pub(super) fn handle_after_doctype_public_keyword_state(&mut self) {
        match self.current_input_character {
            // "Switch to the before DOCTYPE public identifier state."
            Some(c) if is_tokenizer_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPEPublicIdentifier);
            }
            // "U+0022 QUOTATION MARK (") / U+0027 APOSTROPHE (')"
            // "This is a missing-whitespace-after-doctype-public-keyword parse error. Set
            // the current DOCTYPE token's public identifier to the empty string (not
            // missing), then switch to the DOCTYPE public identifier (double-quoted)
            // state." (single-quoted for U+0027)
            Some(quote @ ('"' | '\'')) => {
                self.log_parse_error(ParseErrorCode::MissingWhitespaceAfterDoctypePublicKeyword);
                self.begin_public_identifier(quote);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "This is a missing-doctype-public-identifier parse error. Set the current
            // DOCTYPE token's force-quirks flag to on. Switch to the data state. Emit
            // the current DOCTYPE token."
            Some('>') => self.emit_quirky_doctype(ParseErrorCode::MissingDoctypePublicIdentifier),
            None => self.eof_in_doctype(),
            // "This is a missing-quote-before-doctype-public-identifier parse error. Set
            // the current DOCTYPE token's force-quirks flag to on. Reconsume in the
            // bogus DOCTYPE state."
            Some(_) => self.bogus_doctype(ParseErrorCode::MissingQuoteBeforeDoctypePublicIdentifier),
        }
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    pub(super) fn handle_before_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tokenizer_whitespace(c) => {}
            Some(quote @ ('"' | '\'')) => self.begin_public_identifier(quote),
            Some('>') => self.emit_quirky_doctype(ParseErrorCode::MissingDoctypePublicIdentifier),
            None => self.eof_in_doctype(),
            Some(_) => self.bogus_doctype(ParseErrorCode::MissingQuoteBeforeDoctypePublicIdentifier),
        }
    }

    fn begin_public_identifier(&mut self, quote: char) {
        if let Some(ref mut token) = self.current_token {
            token.set_public_identifier_empty();
        }
        self.switch_to(if quote == '"' {
            TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted
        } else {
            TokenizerState::DOCTYPEPublicIdentifierSingleQuoted
        });
    }

    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    /// [§ 13.2.5.60 DOCTYPE public identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(single-quoted)-state)
    pub(super) fn handle_doctype_public_identifier_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            // "Switch to the after DOCTYPE public identifier state."
            Some(c) if c == quote => {
                self.switch_to(TokenizerState::AfterDOCTYPEPublicIdentifier);
            }
            // "U+0000 NULL"
            // "This is an unexpected-null-character parse error. Append a U+FFFD
            // REPLACEMENT CHARACTER character to the current DOCTYPE token's public
            // identifier."
            Some(NULL) => {
                self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
                if let Some(ref mut token) = self.current_token {
                    token.append_to_public_identifier(REPLACEMENT_CHARACTER);
                }
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "This is an abrupt-doctype-public-identifier parse error. Set the current
            // DOCTYPE token's force-quirks flag to on. Switch to the data state. Emit
            // the current DOCTYPE token."
            Some('>') => self.emit_quirky_doctype(ParseErrorCode::AbruptDoctypePublicIdentifier),
            None => self.eof_in_doctype(),
            // "Append the current input character to the current DOCTYPE token's public
            // identifier."
            Some(c) => {
                if let Some(ref mut token) = self.current_token {
                    token.append_to_public_identifier(c);
                }
            }
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    pub(super) fn handle_after_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            // "Switch to the between DOCTYPE public and system identifiers state."
            Some(c) if is_tokenizer_whitespace(c) => {
                self.switch_to(TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers);
            }
            // "Switch to the data state. Emit the current DOCTYPE token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "This is a missing-whitespace-between-doctype-public-and-system-identifiers
            // parse error. Set the current DOCTYPE token's system identifier to the empty
            // string (not missing), then switch to the DOCTYPE system identifier
            // (double-quoted) state." (single-quoted for U+0027)
            Some(quote @ ('"' | '\'')) => {
                self.log_parse_error(
                    ParseErrorCode::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.begin_system_identifier(quote);
            }
            None => self.eof_in_doctype(),
            Some(_) => self.bogus_doctype(ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier),
        }
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    pub(super) fn handle_between_doctype_public_and_system_identifiers_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tokenizer_whitespace(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some(quote @ ('"' | '\'')) => self.begin_system_identifier(quote),
            None => self.eof_in_doctype(),
            Some(_) => self.bogus_doctype(ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier),
        }
    }

    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    pub(super) fn handle_after_doctype_system_keyword_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tokenizer_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPESystemIdentifier);
            }
            Some(quote @ ('"' | '\'')) => {
                self.log_parse_error(ParseErrorCode::MissingWhitespaceAfterDoctypeSystemKeyword);
                self.begin_system_identifier(quote);
            }
            Some('>') => self.emit_quirky_doctype(ParseErrorCode::MissingDoctypeSystemIdentifier),
            None => self.eof_in_doctype(),
            Some(_) => self.bogus_doctype(ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier),
        }
    }

    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    pub(super) fn handle_before_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tokenizer_whitespace(c) => {}
            Some(quote @ ('"' | '\'')) => self.begin_system_identifier(quote),
            Some('>') => self.emit_quirky_doctype(ParseErrorCode::MissingDoctypeSystemIdentifier),
            None => self.eof_in_doctype(),
            Some(_) => self.bogus_doctype(ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier),
        }
    }

    fn begin_system_identifier(&mut self, quote: char) {
        if let Some(ref mut token) = self.current_token {
            token.set_system_identifier_empty();
        }
        self.switch_to(if quote == '"' {
            TokenizerState::DOCTYPESystemIdentifierDoubleQuoted
        } else {
            TokenizerState::DOCTYPESystemIdentifierSingleQuoted
        });
    }

    /// [§ 13.2.5.65 DOCTYPE system identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(double-quoted)-state)
    /// [§ 13.2.5.66 DOCTYPE system identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(single-quoted)-state)
    pub(super) fn handle_doctype_system_identifier_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => {
                self.switch_to(TokenizerState::AfterDOCTYPESystemIdentifier);
            }
            Some(NULL) => {
                self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
                if let Some(ref mut token) = self.current_token {
                    token.append_to_system_identifier(REPLACEMENT_CHARACTER);
                }
            }
            // "This is an abrupt-doctype-system-identifier parse error. Set the current
            // DOCTYPE token's force-quirks flag to on. Switch to the data state. Emit
            // the current DOCTYPE token."
            Some('>') => self.emit_quirky_doctype(ParseErrorCode::AbruptDoctypeSystemIdentifier),
            None => self.eof_in_doctype(),
            Some(c) => {
                if let Some(ref mut token) = self.current_token {
                    token.append_to_system_identifier(c);
                }
            }
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    pub(super) fn handle_after_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_tokenizer_whitespace(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_doctype(),
            // "This is an unexpected-character-after-doctype-system-identifier parse
            // error. Reconsume in the bogus DOCTYPE state. (This does not set the
            // current DOCTYPE token's force-quirks flag to on.)"
            Some(_) => {
                self.log_parse_error(ParseErrorCode::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    pub(super) fn handle_bogus_doctype_state(&mut self) {
        match self.current_input_character {
            // "Switch to the data state. Emit the DOCTYPE token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "This is an unexpected-null-character parse error. Ignore the character."
            Some(NULL) => self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter),
            // "Emit the DOCTYPE token. Emit an end-of-file token."
            None => {
                self.emit_token();
                self.emit_eof_token();
            }
            // "Ignore the character."
            Some(_) => {}
        }
    }
}
