//! [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
//!
//! "The input stream consists of the characters pushed into it as the input
//! byte stream is decoded or from the various APIs that directly manipulate
//! the input stream."
//!
//! Decoding is out of scope; the stream is built from an already-decoded `&str`.

/// The tokenizer's character source: the whole input and a cursor.
///
/// Reading past the last character yields `None` (end of input) and still
/// advances the cursor once, so [`exhausted`](Self::exhausted) becomes true
/// exactly when end of input has been consumed.
#[derive(Debug, Clone)]
pub struct InputStream {
    chars: Vec<char>,
    position: usize,
}

impl InputStream {
    /// Create a stream positioned before the first character of `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    /// "Consume the next input character"
    ///
    /// Returns `None` at end of input.
    pub fn read(&mut self) -> Option<char> {
        let c = self.chars.get(self.position).copied();
        if self.position <= self.chars.len() {
            self.position += 1;
        }
        c
    }

    /// Rewind the cursor by one position, so the last character read
    /// (or end of input) is read again.
    ///
    /// Only meaningful directly after [`read`](Self::read).
    pub const fn pushback(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// "If the next few characters are..."
    ///
    /// Consumes `text` and returns true if the input continues with it,
    /// comparing ASCII case-insensitively when asked. Leaves the cursor
    /// untouched otherwise.
    pub fn literal_match(&mut self, text: &str, case_insensitive: bool) -> bool {
        let expected: Vec<char> = text.chars().collect();
        let end = self.position + expected.len();
        let Some(window) = self.chars.get(self.position..end) else {
            return false;
        };
        let matched = window.iter().zip(&expected).all(|(actual, wanted)| {
            if case_insensitive {
                actual.eq_ignore_ascii_case(wanted)
            } else {
                actual == wanted
            }
        });
        if matched {
            self.position = end;
        }
        matched
    }

    /// Returns true once end of input has been read.
    #[must_use]
    pub const fn exhausted(&self) -> bool {
        self.position > self.chars.len()
    }

    /// Index, in characters, of the next character to be read.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_then_eof_then_exhausted() {
        let mut input = InputStream::new("ab");
        assert_eq!(input.read(), Some('a'));
        assert_eq!(input.read(), Some('b'));
        assert!(!input.exhausted());
        assert_eq!(input.read(), None);
        assert!(input.exhausted());
        assert_eq!(input.read(), None);
        assert!(input.exhausted());
    }

    #[test]
    fn test_pushback_rereads_character_and_eof() {
        let mut input = InputStream::new("x");
        assert_eq!(input.read(), Some('x'));
        input.pushback();
        assert_eq!(input.read(), Some('x'));
        assert_eq!(input.read(), None);
        input.pushback();
        assert!(!input.exhausted());
        assert_eq!(input.read(), None);
        assert!(input.exhausted());
    }

    #[test]
    fn test_nul_is_not_eof() {
        let mut input = InputStream::new("\0");
        assert_eq!(input.read(), Some('\0'));
        assert_eq!(input.read(), None);
    }

    #[test]
    fn test_literal_match_consumes_only_on_success() {
        let mut input = InputStream::new("DocType html");
        assert!(!input.literal_match("DOCTYPE", false));
        assert_eq!(input.position(), 0);
        assert!(input.literal_match("DOCTYPE", true));
        assert_eq!(input.position(), 7);
        assert_eq!(input.read(), Some(' '));
    }

    #[test]
    fn test_literal_match_fails_past_end() {
        let mut input = InputStream::new("--");
        assert!(!input.literal_match("-->", false));
        assert!(input.literal_match("--", false));
        assert!(!input.literal_match("-", false));
    }
}
