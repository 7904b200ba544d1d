use core::fmt;

use folio_dom::AttributesMap;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The attribute currently being built by the tokenizer.
///
/// Per [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
/// "a list of attributes, each of which has a name and a value"
///
/// Only one exists at a time; it is committed to the tag token's attribute
/// map once complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribute {
    /// "each of which has a name"
    pub name: String,
    /// "and a value"
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system identifier,
    /// and a force-quirks flag. When a DOCTYPE token is created, its name,
    /// public identifier, and system identifier must be marked as missing
    /// (which is a distinct state from the empty string), and the force-quirks
    /// flag must be set to off (its other state is on)."
    Doctype {
        /// "a name"
        name: Option<String>,
        /// "a public identifier"
        public_identifier: Option<String>,
        /// "a system identifier"
        system_identifier: Option<String>,
        /// "a force-quirks flag"
        force_quirks: bool,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes, each of which has a name and a value. When a start
    /// or end tag token is created, its self-closing flag must be unset (its
    /// other state is that it be set), and its attributes list must be empty."
    StartTag {
        /// "a tag name", lower-cased by the tokenizer.
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes", keyed by lower-cased name. The first
        /// value seen for a name wins.
        attributes: AttributesMap,
    },

    /// End tag token. Same structure as a start tag.
    ///
    /// Attributes and the self-closing flag are only kept so the tokenizer
    /// can report them as parse errors.
    EndTag {
        /// "a tag name"
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes"
        attributes: AttributesMap,
    },

    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
    },

    /// "Comment and character tokens have data."
    Character {
        /// "data"
        data: char,
    },

    /// End-of-file token signals the end of input.
    EndOfFile,
}

impl Token {
    /// "When a DOCTYPE token is created, its name, public identifier, and system
    /// identifier must be marked as missing (which is a distinct state from the
    /// empty string), and the force-quirks flag must be set to off."
    #[must_use]
    pub const fn new_doctype() -> Self {
        Self::Doctype {
            name: None,
            public_identifier: None,
            system_identifier: None,
            force_quirks: false,
        }
    }

    /// "When a start or end tag token is created, its self-closing flag must be
    /// unset (its other state is that it be set), and its attributes list must
    /// be empty."
    #[must_use]
    pub fn new_start_tag() -> Self {
        Self::StartTag {
            name: String::new(),
            self_closing: false,
            attributes: AttributesMap::new(),
        }
    }

    /// Create a new, empty end tag token.
    #[must_use]
    pub fn new_end_tag() -> Self {
        Self::EndTag {
            name: String::new(),
            self_closing: false,
            attributes: AttributesMap::new(),
        }
    }

    /// Create a new comment token with empty data.
    #[must_use]
    pub const fn new_comment() -> Self {
        Self::Comment {
            data: String::new(),
        }
    }

    /// Create a character token with the given character.
    #[must_use]
    pub const fn new_character(c: char) -> Self {
        Self::Character { data: c }
    }

    /// Create an end-of-file token.
    #[must_use]
    pub const fn new_eof() -> Self {
        Self::EndOfFile
    }

    /// Returns true for a start tag named `name`.
    #[must_use]
    pub fn is_start_tag(&self, name: &str) -> bool {
        matches!(self, Self::StartTag { name: n, .. } if n == name)
    }

    /// Returns true for an end tag named `name`.
    #[must_use]
    pub fn is_end_tag(&self, name: &str) -> bool {
        matches!(self, Self::EndTag { name: n, .. } if n == name)
    }

    /// "A start tag whose tag name is one of: ..."
    #[must_use]
    pub fn is_start_tag_in(&self, names: &[&str]) -> bool {
        matches!(self, Self::StartTag { name, .. } if names.contains(&name.as_str()))
    }

    /// "An end tag whose tag name is one of: ..."
    #[must_use]
    pub fn is_end_tag_in(&self, names: &[&str]) -> bool {
        matches!(self, Self::EndTag { name, .. } if names.contains(&name.as_str()))
    }

    /// Mutation helpers for use during tokenization.
    /// These panic if called on the wrong token variant, which indicates a bug
    /// in the tokenizer state machine.
    ///
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    ///
    /// "Append the current input character to the current DOCTYPE token's name."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-DOCTYPE token, indicating a tokenizer bug.
    pub fn append_to_doctype_name(&mut self, c: char) {
        match self {
            Self::Doctype { name, .. } => name.get_or_insert_with(String::new).push(c),
            _ => panic!("append_to_doctype_name called on non-DOCTYPE token"),
        }
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    ///
    /// "Set the current DOCTYPE token's public identifier to the empty string
    /// (not missing)"
    ///
    /// # Panics
    ///
    /// Panics if called on a non-DOCTYPE token, indicating a tokenizer bug.
    pub fn set_public_identifier_empty(&mut self) {
        match self {
            Self::Doctype {
                public_identifier, ..
            } => *public_identifier = Some(String::new()),
            _ => panic!("set_public_identifier_empty called on non-DOCTYPE token"),
        }
    }

    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    ///
    /// "Append the current input character to the current DOCTYPE token's
    /// public identifier."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-DOCTYPE token, indicating a tokenizer bug.
    pub fn append_to_public_identifier(&mut self, c: char) {
        match self {
            Self::Doctype {
                public_identifier, ..
            } => public_identifier.get_or_insert_with(String::new).push(c),
            _ => panic!("append_to_public_identifier called on non-DOCTYPE token"),
        }
    }

    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    ///
    /// "Set the current DOCTYPE token's system identifier to the empty string
    /// (not missing)"
    ///
    /// # Panics
    ///
    /// Panics if called on a non-DOCTYPE token, indicating a tokenizer bug.
    pub fn set_system_identifier_empty(&mut self) {
        match self {
            Self::Doctype {
                system_identifier, ..
            } => *system_identifier = Some(String::new()),
            _ => panic!("set_system_identifier_empty called on non-DOCTYPE token"),
        }
    }

    /// [§ 13.2.5.65 DOCTYPE system identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(double-quoted)-state)
    ///
    /// "Append the current input character to the current DOCTYPE token's
    /// system identifier."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-DOCTYPE token, indicating a tokenizer bug.
    pub fn append_to_system_identifier(&mut self, c: char) {
        match self {
            Self::Doctype {
                system_identifier, ..
            } => system_identifier.get_or_insert_with(String::new).push(c),
            _ => panic!("append_to_system_identifier called on non-DOCTYPE token"),
        }
    }

    /// "Set the current DOCTYPE token's force-quirks flag to on."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-DOCTYPE token, indicating a tokenizer bug.
    pub fn set_force_quirks(&mut self) {
        match self {
            Self::Doctype { force_quirks, .. } => *force_quirks = true,
            _ => panic!("set_force_quirks called on non-DOCTYPE token"),
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    ///
    /// "Append the current input character to the current tag token's tag name."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn append_to_tag_name(&mut self, c: char) {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name, .. } => name.push(c),
            _ => panic!("append_to_tag_name called on non-tag token"),
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    ///
    /// "Set the self-closing flag of the current tag token."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn set_self_closing(&mut self) {
        match self {
            Self::StartTag { self_closing, .. } | Self::EndTag { self_closing, .. } => {
                *self_closing = true;
            }
            _ => panic!("set_self_closing called on non-tag token"),
        }
    }

    /// Returns true if the tag token already carries an attribute called `name`.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => {
                attributes.contains_key(name)
            }
            _ => false,
        }
    }

    /// Commit a finished attribute to the tag token.
    ///
    /// "if there is already an attribute on the token with the exact same
    /// name, then ... the new attribute must be removed from the token."
    /// An existing value is therefore never overwritten.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn add_attribute(&mut self, attribute: Attribute) {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => {
                let _ = attributes.entry(attribute.name).or_insert(attribute.value);
            }
            _ => panic!("add_attribute called on non-tag token"),
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    ///
    /// "Append the current input character to the comment token's data."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-comment token, indicating a tokenizer bug.
    pub fn append_to_comment(&mut self, c: char) {
        match self {
            Self::Comment { data } => data.push(c),
            _ => panic!("append_to_comment called on non-comment token"),
        }
    }

    /// Append a string to the comment token's data.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-comment token, indicating a tokenizer bug.
    pub fn append_str_to_comment(&mut self, s: &str) {
        match self {
            Self::Comment { data } => data.push_str(s),
            _ => panic!("append_str_to_comment called on non-comment token"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                write!(f, "DOCTYPE")?;
                if let Some(n) = name {
                    write!(f, " {n}")?;
                }
                if let Some(pub_id) = public_identifier {
                    write!(f, " PUBLIC \"{pub_id}\"")?;
                }
                if let Some(sys_id) = system_identifier {
                    write!(f, " SYSTEM \"{sys_id}\"")?;
                }
                if *force_quirks {
                    write!(f, " (force-quirks)")?;
                }
                Ok(())
            }
            Self::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "<{name}")?;
                // Sorted so dumps are stable across runs.
                let mut attrs: Vec<_> = attributes.iter().collect();
                attrs.sort();
                for (attr_name, value) in attrs {
                    write!(f, " {attr_name}=\"{value}\"")?;
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name, .. } => write!(f, "</{name}>"),
            Self::Comment { data } => write!(f, "<!--{data}-->"),
            Self::Character { data } => {
                // Show whitespace characters explicitly
                match data {
                    '\n' => write!(f, "Character(\\n)"),
                    '\t' => write!(f, "Character(\\t)"),
                    ' ' => write!(f, "Character(SPACE)"),
                    c => write!(f, "Character({c})"),
                }
            }
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_attribute_value_wins() {
        let mut token = Token::new_start_tag();
        token.add_attribute(Attribute::new("id".to_string(), "a".to_string()));
        assert!(token.has_attribute("id"));
        token.add_attribute(Attribute::new("id".to_string(), "b".to_string()));
        let Token::StartTag { attributes, .. } = &token else {
            panic!("expected start tag");
        };
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes.get("id").map(String::as_str), Some("a"));
    }

    #[test]
    fn test_name_set_membership() {
        let mut token = Token::new_start_tag();
        for c in "li".chars() {
            token.append_to_tag_name(c);
        }
        assert!(token.is_start_tag("li"));
        assert!(token.is_start_tag_in(&["dd", "dt", "li"]));
        assert!(!token.is_end_tag_in(&["li"]));
        assert!(!token.is_end_tag("li"));
        assert!(!Token::new_eof().is_start_tag_in(&["li"]));
    }

    #[test]
    fn test_doctype_identifiers_distinguish_missing_from_empty() {
        let mut token = Token::new_doctype();
        token.set_public_identifier_empty();
        let Token::Doctype {
            public_identifier,
            system_identifier,
            ..
        } = &token
        else {
            panic!("expected DOCTYPE");
        };
        assert_eq!(public_identifier.as_deref(), Some(""));
        assert_eq!(system_identifier.as_deref(), None);
    }

    #[test]
    fn test_display_sorts_attributes() {
        let mut token = Token::new_start_tag();
        token.append_to_tag_name('a');
        token.add_attribute(Attribute::new("title".to_string(), "t".to_string()));
        token.add_attribute(Attribute::new("href".to_string(), "/x".to_string()));
        assert_eq!(token.to_string(), "<a href=\"/x\" title=\"t\">");
    }
}
