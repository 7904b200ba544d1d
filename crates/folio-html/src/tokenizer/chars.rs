//! Character classification used by the tokenizer and tree builder.
//!
//! End of input is not a character: [`InputStream::read`](super::InputStream::read)
//! returns `None` for it, which keeps it distinct from a literal U+0000 NULL.

/// U+0000 NULL.
pub const NULL: char = '\0';

/// U+FFFD REPLACEMENT CHARACTER, substituted for NULL.
pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// [§ 4.5 ASCII upper alpha](https://infra.spec.whatwg.org/#ascii-upper-alpha)
///
/// "An ASCII upper alpha is a code point in the range U+0041 (A) to U+005A (Z), inclusive."
#[must_use]
pub const fn is_ascii_upper_alpha(c: char) -> bool {
    c.is_ascii_uppercase()
}

/// [§ 4.5 ASCII lower alpha](https://infra.spec.whatwg.org/#ascii-lower-alpha)
///
/// "An ASCII lower alpha is a code point in the range U+0061 (a) to U+007A (z), inclusive."
#[must_use]
pub const fn is_ascii_lower_alpha(c: char) -> bool {
    c.is_ascii_lowercase()
}

/// [§ 4.5 ASCII alpha](https://infra.spec.whatwg.org/#ascii-alpha)
///
/// "An ASCII alpha is an ASCII upper alpha or ASCII lower alpha."
#[must_use]
pub const fn is_ascii_alpha(c: char) -> bool {
    is_ascii_upper_alpha(c) || is_ascii_lower_alpha(c)
}

/// The whitespace the tokenizer switches on.
///
/// "U+0009 CHARACTER TABULATION (tab)"
/// "U+000A LINE FEED (LF)"
/// "U+000C FORM FEED (FF)"
/// "U+0020 SPACE"
#[must_use]
pub const fn is_tokenizer_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | ' ')
}

/// [§ 4.5 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
///
/// "ASCII whitespace is U+0009 TAB, U+000A LF, U+000C FF, U+000D CR,
/// or U+0020 SPACE."
///
/// The tree builder's definition; it additionally accepts CR.
#[must_use]
pub const fn is_ascii_whitespace(c: char) -> bool {
    is_tokenizer_whitespace(c) || c == '\r'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_sets_differ_only_in_cr() {
        for c in ['\t', '\n', '\x0C', ' '] {
            assert!(is_tokenizer_whitespace(c));
            assert!(is_ascii_whitespace(c));
        }
        assert!(!is_tokenizer_whitespace('\r'));
        assert!(is_ascii_whitespace('\r'));
        assert!(!is_ascii_whitespace(NULL));
    }

    #[test]
    fn test_alpha_classes() {
        assert!(is_ascii_upper_alpha('Q'));
        assert!(!is_ascii_upper_alpha('q'));
        assert!(is_ascii_lower_alpha('q'));
        assert!(is_ascii_alpha('z'));
        assert!(!is_ascii_alpha('1'));
        assert!(!is_ascii_alpha('é'));
    }
}
