use strum_macros::Display;

use super::chars::{
    NULL, REPLACEMENT_CHARACTER, is_ascii_alpha, is_ascii_upper_alpha, is_tokenizer_whitespace,
};
use super::input::InputStream;
use super::sink::{TokenSink, TokenSinkResult};
use super::token::Token;
use crate::error::{Error, Result};
use crate::issue::{ParseErrorCode, ParseIssue};

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine. Each state corresponds to a section in § 13.2.5.
///
/// Script data, RAWTEXT, PLAINTEXT and CDATA states are absent: the elements
/// that need them are rejected by the tree builder, and CDATA is always read
/// as a bogus comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    RCDATA,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    RCDATALessThanSign,
    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    RCDATAEndTagOpen,
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    RCDATAEndTagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    CommentStart,
    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    CommentStartDash,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.46 Comment less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-state)
    CommentLessThanSign,
    /// [§ 13.2.5.47 Comment less-than sign bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-state)
    CommentLessThanSignBang,
    /// [§ 13.2.5.48 Comment less-than sign bang dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-state)
    CommentLessThanSignBangDash,
    /// [§ 13.2.5.49 Comment less-than sign bang dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-dash-state)
    CommentLessThanSignBangDashDash,
    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    CommentEndDash,
    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    CommentEnd,
    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    CommentEndBang,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    DOCTYPE,
    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    BeforeDOCTYPEName,
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    DOCTYPEName,
    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    AfterDOCTYPEName,
    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    AfterDOCTYPEPublicKeyword,
    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    BeforeDOCTYPEPublicIdentifier,
    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    DOCTYPEPublicIdentifierDoubleQuoted,
    /// [§ 13.2.5.60 DOCTYPE public identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(single-quoted)-state)
    DOCTYPEPublicIdentifierSingleQuoted,
    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    AfterDOCTYPEPublicIdentifier,
    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    BetweenDOCTYPEPublicAndSystemIdentifiers,
    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    AfterDOCTYPESystemKeyword,
    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    BeforeDOCTYPESystemIdentifier,
    /// [§ 13.2.5.65 DOCTYPE system identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(double-quoted)-state)
    DOCTYPESystemIdentifierDoubleQuoted,
    /// [§ 13.2.5.66 DOCTYPE system identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(single-quoted)-state)
    DOCTYPESystemIdentifierSingleQuoted,
    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    AfterDOCTYPESystemIdentifier,
    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    BogusDOCTYPE,
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// Entered on `&`; has no implemented target and aborts the run.
    CharacterReference,
}

/// Output produced by one tokenizer step, in order.
pub(super) enum Emission {
    Token(Token),
    Issue(ParseIssue),
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
///
/// This struct maintains the state machine for tokenizing HTML input into
/// tokens. Tokens are handed to a [`TokenSink`] as they are produced.
pub struct HTMLTokenizer {
    pub(super) state: TokenizerState,
    pub(super) input: InputStream,
    pub(super) current_input_character: Option<char>,
    pub(super) current_token: Option<Token>,

    /// The attribute being built. Committed to `current_token` when the next
    /// attribute starts or the tag is emitted.
    pub(super) current_attribute: Option<super::token::Attribute>,

    /// Tokens and parse errors of the current step, drained into the sink
    /// before the next character is read.
    pub(super) emitted: Vec<Emission>,

    /// Set once the end-of-file token has been emitted.
    pub(super) at_eof: bool,

    /// [§ 13.2.5.11](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-end-tag-token)
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    ///
    /// Supplied by [`configure_raw_text`](Self::configure_raw_text).
    pub(super) last_start_tag_name: Option<String>,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#temporary-buffer)
    /// "The temporary buffer is used to temporarily store characters during certain
    /// tokenization operations, particularly for end tag detection in RCDATA states."
    pub(super) temporary_buffer: String,
}

impl HTMLTokenizer {
    /// Create a new tokenizer for the given input.
    ///
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
    /// "The tokenizer state machine consists of the states defined in the
    /// following subsections. The initial state is the data state."
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            state: TokenizerState::Data,
            input: InputStream::new(input),
            current_input_character: None,
            current_token: None,
            current_attribute: None,
            emitted: Vec::new(),
            at_eof: false,
            last_start_tag_name: None,
            temporary_buffer: String::new(),
        }
    }

    /// The state the tokenizer will handle the next character in.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// [§ 13.2.6.2 Generic RCDATA element parsing algorithm](https://html.spec.whatwg.org/multipage/parsing.html#generic-rcdata-element-parsing-algorithm)
    ///
    /// "Switch the tokenizer to the RCDATA state."
    ///
    /// Only an end tag named `end_tag_name` leaves RCDATA again.
    pub fn configure_raw_text(&mut self, end_tag_name: &str) {
        self.last_start_tag_name = Some(end_tag_name.to_string());
        self.switch_to(TokenizerState::RCDATA);
    }

    /// Run the state machine to the end of the input, pushing every token
    /// and parse error into `sink` as soon as it is produced.
    ///
    /// Exactly one [`Token::EndOfFile`] is emitted, always last.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CharacterReference`] on the first `&` that starts a
    /// character reference, or any error returned by the sink.
    pub fn run<S: TokenSink>(&mut self, sink: &mut S) -> Result<()> {
        while !self.input.exhausted() {
            if self.state == TokenizerState::MarkupDeclarationOpen {
                // This state looks ahead instead of consuming a character.
                self.handle_markup_declaration_open_state();
            } else {
                self.current_input_character = self.input.read();
                self.step()?;
            }
            self.flush(sink)?;
        }
        Ok(())
    }

    fn flush<S: TokenSink>(&mut self, sink: &mut S) -> Result<()> {
        for emission in std::mem::take(&mut self.emitted) {
            match emission {
                Emission::Issue(issue) => sink.parse_error(issue),
                Emission::Token(token) => {
                    if let TokenSinkResult::RawText(name) = sink.process_token(token)? {
                        self.configure_raw_text(&name);
                    }
                }
            }
        }
        Ok(())
    }

    fn step(&mut self) -> Result<()> {
        match self.state {
            TokenizerState::Data => self.handle_data_state(),
            TokenizerState::RCDATA => self.handle_rcdata_state(),
            TokenizerState::TagOpen => self.handle_tag_open_state(),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
            TokenizerState::TagName => self.handle_tag_name_state(),
            TokenizerState::RCDATALessThanSign => self.handle_rcdata_less_than_sign_state(),
            TokenizerState::RCDATAEndTagOpen => self.handle_rcdata_end_tag_open_state(),
            TokenizerState::RCDATAEndTagName => self.handle_rcdata_end_tag_name_state(),
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
            TokenizerState::AttributeName => self.handle_attribute_name_state(),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.handle_attribute_value_quoted_state('"');
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.handle_attribute_value_quoted_state('\'');
            }
            TokenizerState::AttributeValueUnquoted => self.handle_attribute_value_unquoted_state(),
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state();
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            TokenizerState::MarkupDeclarationOpen => self.handle_markup_declaration_open_state(),
            TokenizerState::CommentStart => self.handle_comment_start_state(),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(),
            TokenizerState::Comment => self.handle_comment_state(),
            TokenizerState::CommentLessThanSign => self.handle_comment_less_than_sign_state(),
            TokenizerState::CommentLessThanSignBang => {
                self.handle_comment_less_than_sign_bang_state();
            }
            TokenizerState::CommentLessThanSignBangDash => {
                self.handle_comment_less_than_sign_bang_dash_state();
            }
            TokenizerState::CommentLessThanSignBangDashDash => {
                self.handle_comment_less_than_sign_bang_dash_dash_state();
            }
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(),
            TokenizerState::CommentEnd => self.handle_comment_end_state(),
            TokenizerState::CommentEndBang => self.handle_comment_end_bang_state(),
            TokenizerState::DOCTYPE => self.handle_doctype_state(),
            TokenizerState::BeforeDOCTYPEName => self.handle_before_doctype_name_state(),
            TokenizerState::DOCTYPEName => self.handle_doctype_name_state(),
            TokenizerState::AfterDOCTYPEName => self.handle_after_doctype_name_state(),
            TokenizerState::AfterDOCTYPEPublicKeyword => {
                self.handle_after_doctype_public_keyword_state();
            }
            TokenizerState::BeforeDOCTYPEPublicIdentifier => {
                self.handle_before_doctype_public_identifier_state();
            }
            TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted => {
                self.handle_doctype_public_identifier_quoted_state('"');
            }
            TokenizerState::DOCTYPEPublicIdentifierSingleQuoted => {
                self.handle_doctype_public_identifier_quoted_state('\'');
            }
            TokenizerState::AfterDOCTYPEPublicIdentifier => {
                self.handle_after_doctype_public_identifier_state();
            }
            TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers => {
                self.handle_between_doctype_public_and_system_identifiers_state();
            }
            TokenizerState::AfterDOCTYPESystemKeyword => {
                self.handle_after_doctype_system_keyword_state();
            }
            TokenizerState::BeforeDOCTYPESystemIdentifier => {
                self.handle_before_doctype_system_identifier_state();
            }
            TokenizerState::DOCTYPESystemIdentifierDoubleQuoted => {
                self.handle_doctype_system_identifier_quoted_state('"');
            }
            TokenizerState::DOCTYPESystemIdentifierSingleQuoted => {
                self.handle_doctype_system_identifier_quoted_state('\'');
            }
            TokenizerState::AfterDOCTYPESystemIdentifier => {
                self.handle_after_doctype_system_identifier_state();
            }
            TokenizerState::BogusDOCTYPE => self.handle_bogus_doctype_state(),
            TokenizerState::CharacterReference => return self.handle_character_reference_state(),
        }
        Ok(())
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self) {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&) - Set the return state to the data state.
            // Switch to the character reference state."
            Some('&') => self.switch_to(TokenizerState::CharacterReference),
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            // "U+0000 NULL - This is an unexpected-null-character parse error."
            // NOTE: The character is replaced rather than emitted as-is, so no
            // input character is ever dropped by the tree builder.
            Some(NULL) => {
                self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.emit_character_token(REPLACEMENT_CHARACTER);
            }
            // "EOF - Emit an end-of-file token."
            None => self.emit_eof_token(),
            // "Anything else - Emit the current input character as a character token."
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    fn handle_rcdata_state(&mut self) {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&)"
            // "Set the return state to the RCDATA state. Switch to the character reference state."
            Some('&') => self.switch_to(TokenizerState::CharacterReference),
            // "U+003C LESS-THAN SIGN (<)"
            // "Switch to the RCDATA less-than sign state."
            Some('<') => self.switch_to(TokenizerState::RCDATALessThanSign),
            // "U+0000 NULL"
            // "This is an unexpected-null-character parse error. Emit a U+FFFD REPLACEMENT
            // CHARACTER character token."
            Some(NULL) => {
                self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.emit_character_token(REPLACEMENT_CHARACTER);
            }
            // "EOF"
            // "Emit an end-of-file token."
            None => self.emit_eof_token(),
            // "Anything else"
            // "Emit the current input character as a character token."
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    fn handle_rcdata_less_than_sign_state(&mut self) {
        match self.current_input_character {
            // "U+002F SOLIDUS (/)"
            // "Set the temporary buffer to the empty string. Switch to the RCDATA end tag open state."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::RCDATAEndTagOpen);
            }
            // "Anything else"
            // "Emit a U+003C LESS-THAN SIGN character token. Reconsume in the RCDATA state."
            _ => {
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::RCDATA);
            }
        }
    }

    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    fn handle_rcdata_end_tag_open_state(&mut self) {
        match self.current_input_character {
            // "ASCII alpha"
            // "Create a new end tag token, set its tag name to the empty string. Reconsume in
            // the RCDATA end tag name state."
            Some(c) if is_ascii_alpha(c) => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::RCDATAEndTagName);
            }
            // "Anything else"
            // "Emit a U+003C LESS-THAN SIGN character token and a U+002F SOLIDUS character token.
            // Reconsume in the RCDATA state."
            _ => {
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.reconsume_in(TokenizerState::RCDATA);
            }
        }
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    fn handle_rcdata_end_tag_name_state(&mut self) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION (tab)"
            // "U+000A LINE FEED (LF)"
            // "U+000C FORM FEED (FF)"
            // "U+0020 SPACE"
            // "If the current end tag token is an appropriate end tag token, then switch to the
            // before attribute name state. Otherwise, treat it as per the "anything else" entry below."
            Some(c) if is_tokenizer_whitespace(c) && self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            // "U+002F SOLIDUS (/)"
            // "If the current end tag token is an appropriate end tag token, then switch to the
            // self-closing start tag state."
            Some('/') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "If the current end tag token is an appropriate end tag token, then switch to the
            // data state and emit the current tag token."
            Some('>') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "ASCII upper alpha"
            // "Append the lowercase version of the current input character (add 0x0020 to the
            // character's code point) to the current tag token's tag name. Append the current
            // input character to the temporary buffer."
            Some(c) if is_ascii_upper_alpha(c) => {
                if let Some(ref mut token) = self.current_token {
                    token.append_to_tag_name(c.to_ascii_lowercase());
                }
                self.temporary_buffer.push(c);
            }
            // "ASCII lower alpha"
            // "Append the current input character to the current tag token's tag name. Append
            // the current input character to the temporary buffer."
            Some(c) if is_ascii_alpha(c) => {
                if let Some(ref mut token) = self.current_token {
                    token.append_to_tag_name(c);
                }
                self.temporary_buffer.push(c);
            }
            // "Anything else"
            // "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character token,
            // and a character token for each of the characters in the temporary buffer (in the
            // order they were added to the buffer). Reconsume in the RCDATA state."
            _ => self.emit_rcdata_end_tag_name_anything_else(),
        }
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
            Some('!') => self.switch_to(TokenizerState::MarkupDeclarationOpen),
            // "U+002F SOLIDUS (/) - Switch to the end tag open state."
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            // "ASCII alpha - Create a new start tag token, set its tag name to the empty
            // string. Reconsume in the tag name state."
            Some(c) if is_ascii_alpha(c) => {
                self.current_token = Some(Token::new_start_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003F QUESTION MARK (?) - This is an unexpected-question-mark-instead-of-tag-name
            // parse error. Create a comment token whose data is the empty string. Reconsume in the
            // bogus comment state."
            Some('?') => {
                self.log_parse_error(ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName);
                self.current_token = Some(Token::new_comment());
                self.reconsume_in(TokenizerState::BogusComment);
            }
            // "EOF - This is an eof-before-tag-name parse error. Emit a U+003C LESS-THAN SIGN
            // character token and an end-of-file token."
            None => {
                self.log_parse_error(ParseErrorCode::EofBeforeTagName);
                self.emit_character_token('<');
                self.emit_eof_token();
            }
            // "Anything else - This is an invalid-first-character-of-tag-name parse error.
            // Emit a U+003C LESS-THAN SIGN character token. Reconsume in the data state."
            Some(_) => {
                self.log_parse_error(ParseErrorCode::InvalidFirstCharacterOfTagName);
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            // "ASCII alpha - Create a new end tag token, set its tag name to the empty
            // string. Reconsume in the tag name state."
            Some(c) if is_ascii_alpha(c) => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-end-tag-name parse error.
            // Switch to the data state."
            Some('>') => {
                self.log_parse_error(ParseErrorCode::MissingEndTagName);
                self.switch_to(TokenizerState::Data);
            }
            // "EOF - This is an eof-before-tag-name parse error. Emit a U+003C LESS-THAN
            // SIGN character token, a U+002F SOLIDUS character token and an end-of-file token."
            None => {
                self.log_parse_error(ParseErrorCode::EofBeforeTagName);
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.emit_eof_token();
            }
            // "Anything else - This is an invalid-first-character-of-tag-name parse error.
            // Create a comment token whose data is the empty string. Reconsume in the bogus
            // comment state."
            Some(_) => {
                self.log_parse_error(ParseErrorCode::InvalidFirstCharacterOfTagName);
                self.current_token = Some(Token::new_comment());
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION, U+000A LINE FEED, U+000C FORM FEED,
            // U+0020 SPACE - Switch to the before attribute name state."
            Some(c) if is_tokenizer_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            // "U+002F SOLIDUS (/) - Switch to the self-closing start tag state."
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            // "U+003E GREATER-THAN SIGN (>) - Switch to the data state. Emit the current token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "ASCII upper alpha - Append the lowercase version of the current input
            // character to the current tag token's tag name."
            Some(c) if is_ascii_upper_alpha(c) => {
                if let Some(ref mut token) = self.current_token {
                    token.append_to_tag_name(c.to_ascii_lowercase());
                }
            }
            // "U+0000 NULL - This is an unexpected-null-character parse error. Append a
            // U+FFFD REPLACEMENT CHARACTER to the current tag token's tag name."
            Some(NULL) => {
                self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
                if let Some(ref mut token) = self.current_token {
                    token.append_to_tag_name(REPLACEMENT_CHARACTER);
                }
            }
            // "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
            None => self.eof_in_tag(),
            // "Anything else - Append the current input character to the current tag
            // token's tag name."
            Some(c) => {
                if let Some(ref mut token) = self.current_token {
                    token.append_to_tag_name(c);
                }
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            // "U+003E GREATER-THAN SIGN (>) - Set the self-closing flag of the current
            // tag token. Switch to the data state. Emit the current token."
            Some('>') => {
                if let Some(ref mut token) = self.current_token {
                    token.set_self_closing();
                }
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
            None => self.eof_in_tag(),
            // "Anything else - This is an unexpected-solidus-in-tag parse error.
            // Reconsume in the before attribute name state."
            Some(_) => {
                self.log_parse_error(ParseErrorCode::UnexpectedSolidusInTag);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION, U+000A LINE FEED, U+000C FORM FEED,
            // U+0020 SPACE - Ignore the character."
            Some(c) if is_tokenizer_whitespace(c) => {}
            // "U+002F SOLIDUS (/), U+003E GREATER-THAN SIGN (>), EOF -
            // Reconsume in the after attribute name state."
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            // "U+003D EQUALS SIGN (=) - This is an unexpected-equals-sign-before-attribute-name
            // parse error. Start a new attribute in the current tag token. Set that attribute's name
            // to the current input character, and its value to the empty string. Switch to the
            // attribute name state."
            Some('=') => {
                self.log_parse_error(ParseErrorCode::UnexpectedEqualsSignBeforeAttributeName);
                self.start_new_attribute();
                self.append_to_current_attribute_name('=');
                self.switch_to(TokenizerState::AttributeName);
            }
            // "Anything else - Start a new attribute in the current tag token. Set that
            // attribute name and value to the empty string. Reconsume in the attribute name state."
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION, U+000A LINE FEED, U+000C FORM FEED,
            // U+0020 SPACE, U+002F SOLIDUS (/), U+003E GREATER-THAN SIGN (>), EOF -
            // Reconsume in the after attribute name state."
            Some('/' | '>') | None => {
                self.check_duplicate_attribute();
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some(c) if is_tokenizer_whitespace(c) => {
                self.check_duplicate_attribute();
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            // "U+003D EQUALS SIGN (=) - Switch to the before attribute value state."
            Some('=') => {
                self.check_duplicate_attribute();
                self.switch_to(TokenizerState::BeforeAttributeValue);
            }
            // "ASCII upper alpha - Append the lowercase version of the current input
            // character to the current attribute's name."
            Some(c) if is_ascii_upper_alpha(c) => {
                self.append_to_current_attribute_name(c.to_ascii_lowercase());
            }
            // "U+0000 NULL - This is an unexpected-null-character parse error. Append a
            // U+FFFD REPLACEMENT CHARACTER to the current attribute's name."
            Some(NULL) => {
                self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_current_attribute_name(REPLACEMENT_CHARACTER);
            }
            // "U+0022 QUOTATION MARK (\"), U+0027 APOSTROPHE ('), U+003C LESS-THAN SIGN (<) -
            // This is an unexpected-character-in-attribute-name parse error. Treat it as per the
            // 'anything else' entry below."
            Some(c @ ('"' | '\'' | '<')) => {
                self.log_parse_error(ParseErrorCode::UnexpectedCharacterInAttributeName);
                self.append_to_current_attribute_name(c);
            }
            // "Anything else - Append the current input character to the current attribute's name."
            Some(c) => self.append_to_current_attribute_name(c),
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION, U+000A LINE FEED, U+000C FORM FEED,
            // U+0020 SPACE - Ignore the character."
            Some(c) if is_tokenizer_whitespace(c) => {}
            // "U+002F SOLIDUS (/) - Switch to the self-closing start tag state."
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            // "U+003D EQUALS SIGN (=) - Switch to the before attribute value state."
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            // "U+003E GREATER-THAN SIGN (>) - Switch to the data state. Emit the current tag token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
            None => self.eof_in_tag(),
            // "Anything else - Start a new attribute in the current tag token. Set that
            // attribute name and value to the empty string. Reconsume in the attribute name state."
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION, U+000A LINE FEED, U+000C FORM FEED,
            // U+0020 SPACE - Ignore the character."
            Some(c) if is_tokenizer_whitespace(c) => {}
            // "U+0022 QUOTATION MARK (\") - Switch to the attribute value (double-quoted) state."
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            // "U+0027 APOSTROPHE (') - Switch to the attribute value (single-quoted) state."
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-attribute-value parse error.
            // Switch to the data state. Emit the current tag token."
            Some('>') => {
                self.log_parse_error(ParseErrorCode::MissingAttributeValue);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "Anything else - Reconsume in the attribute value (unquoted) state."
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    ///
    /// The two states differ only in the closing quote.
    fn handle_attribute_value_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            // "U+0022 QUOTATION MARK (\") - Switch to the after attribute value (quoted) state."
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            // "U+0026 AMPERSAND (&) - Set the return state to the attribute value (double-quoted)
            // state. Switch to the character reference state."
            Some('&') => self.switch_to(TokenizerState::CharacterReference),
            // "U+0000 NULL - This is an unexpected-null-character parse error. Append a
            // U+FFFD REPLACEMENT CHARACTER to the current attribute's value."
            Some(NULL) => {
                self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_current_attribute_value(REPLACEMENT_CHARACTER);
            }
            // "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
            None => self.eof_in_tag(),
            // "Anything else - Append the current input character to the current attribute's value."
            Some(c) => self.append_to_current_attribute_value(c),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION, U+000A LINE FEED, U+000C FORM FEED,
            // U+0020 SPACE - Switch to the before attribute name state."
            Some(c) if is_tokenizer_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            // "U+0026 AMPERSAND (&) - Set the return state to the attribute value (unquoted)
            // state. Switch to the character reference state."
            Some('&') => self.switch_to(TokenizerState::CharacterReference),
            // "U+003E GREATER-THAN SIGN (>) - Switch to the data state. Emit the current tag token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "U+0000 NULL - This is an unexpected-null-character parse error. Append a
            // U+FFFD REPLACEMENT CHARACTER to the current attribute's value."
            Some(NULL) => {
                self.log_parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_current_attribute_value(REPLACEMENT_CHARACTER);
            }
            // "U+0022 QUOTATION MARK (\"), U+0027 APOSTROPHE ('), U+003C LESS-THAN SIGN (<),
            // U+003D EQUALS SIGN (=), U+0060 GRAVE ACCENT (`) - This is an
            // unexpected-character-in-unquoted-attribute-value parse error. Treat it as per the
            // 'anything else' entry below."
            Some(c @ ('"' | '\'' | '<' | '=' | '`')) => {
                self.log_parse_error(ParseErrorCode::UnexpectedCharacterInUnquotedAttributeValue);
                self.append_to_current_attribute_value(c);
            }
            // "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
            None => self.eof_in_tag(),
            // "Anything else - Append the current input character to the current attribute's value."
            Some(c) => self.append_to_current_attribute_value(c),
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION, U+000A LINE FEED, U+000C FORM FEED,
            // U+0020 SPACE - Switch to the before attribute name state."
            Some(c) if is_tokenizer_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            // "U+002F SOLIDUS (/) - Switch to the self-closing start tag state."
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            // "U+003E GREATER-THAN SIGN (>) - Switch to the data state. Emit the current tag token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
            None => self.eof_in_tag(),
            // "Anything else - This is a missing-whitespace-between-attributes parse error.
            // Reconsume in the before attribute name state."
            Some(_) => {
                self.log_parse_error(ParseErrorCode::MissingWhitespaceBetweenAttributes);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// Character reference decoding is not implemented, so there is no
    /// target to move to. The run aborts instead of guessing at an entity table.
    fn handle_character_reference_state(&self) -> Result<()> {
        // The `&` is one character behind the current input character.
        Err(Error::CharacterReference {
            position: self.input.position().saturating_sub(2),
        })
    }
}
