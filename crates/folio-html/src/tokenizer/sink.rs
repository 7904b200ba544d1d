//! The narrow interface between the tokenizer and whatever consumes its tokens.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
//! "When a token is emitted, it must immediately be handled by the tree
//! construction stage. The tree construction stage can affect the state of
//! the tokenization stage, and can insert additional characters into the
//! stream."

use super::core::HTMLTokenizer;
use super::token::Token;
use crate::error::Result;
use crate::issue::ParseIssue;

/// What the sink wants the tokenizer to do after a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSinkResult {
    /// Keep tokenizing in the current state.
    Continue,
    /// Switch to RCDATA, expecting an end tag with this name.
    RawText(String),
}

/// Consumer of the tokenizer's output.
pub trait TokenSink {
    /// Handle one token. Called synchronously, before the tokenizer reads
    /// the next input character.
    ///
    /// # Errors
    ///
    /// An error aborts tokenization and is returned from
    /// [`HTMLTokenizer::run`].
    fn process_token(&mut self, token: Token) -> Result<TokenSinkResult>;

    /// Handle a recoverable tokenizer parse error.
    fn parse_error(&mut self, issue: ParseIssue);
}

/// A sink that records everything it receives.
///
/// It asks for RCDATA after a `title` start tag, as the tree builder
/// would, so dumps show the same tokens the tree builder sees.
#[derive(Debug, Default)]
pub struct TokenCollector {
    /// Tokens in emission order.
    pub tokens: Vec<Token>,
    /// Tokenizer parse errors in emission order.
    pub issues: Vec<ParseIssue>,
}

impl TokenSink for TokenCollector {
    fn process_token(&mut self, token: Token) -> Result<TokenSinkResult> {
        let result = if token.is_start_tag("title") {
            TokenSinkResult::RawText("title".to_string())
        } else {
            TokenSinkResult::Continue
        };
        self.tokens.push(token);
        Ok(result)
    }

    fn parse_error(&mut self, issue: ParseIssue) {
        self.issues.push(issue);
    }
}

/// Tokenize `input` into a [`TokenCollector`].
///
/// # Errors
///
/// Returns an error if the input contains a character reference.
pub fn tokenize(input: &str) -> Result<TokenCollector> {
    let mut collector = TokenCollector::default();
    HTMLTokenizer::new(input).run(&mut collector)?;
    Ok(collector)
}
