//! Integration tests for the HTML tokenizer.

use folio_html::tokenizer::tokenize;
use folio_html::{Error, IssueOrigin, ParseErrorCode, Token};

/// Helper to tokenize a string and return the tokens
fn tokens(input: &str) -> Vec<Token> {
    tokenize(input).expect("tokenize failed").tokens
}

/// Helper to collect the error codes the tokenizer reported
fn issue_codes(input: &str) -> Vec<ParseErrorCode> {
    tokenize(input)
        .expect("tokenize failed")
        .issues
        .iter()
        .map(|issue| issue.code)
        .collect()
}

#[test]
fn test_plain_text() {
    let tokens = tokens("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert!(matches!(tokens[0], Token::Character { data: 'H' }));
    assert!(matches!(tokens[4], Token::Character { data: 'o' }));
    assert!(matches!(tokens[5], Token::EndOfFile));
}

#[test]
fn test_single_eof_is_always_last() {
    for input in ["", "x", "<p>", "<!-- open", "<!DOCTYPE", "<div id=\"x", "</"] {
        let tokens = tokens(input);
        let eof_count = tokens
            .iter()
            .filter(|t| matches!(t, Token::EndOfFile))
            .count();
        assert_eq!(eof_count, 1, "input {input:?}");
        assert_eq!(tokens.last(), Some(&Token::EndOfFile), "input {input:?}");
    }
}

#[test]
fn test_doctype() {
    let tokens = tokens("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2); // DOCTYPE + EOF
    match &tokens[0] {
        Token::Doctype {
            name, force_quirks, ..
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_with_identifiers() {
    let tokens = tokens(
        r#"<!doctype HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" 'http://www.w3.org/TR/html4/strict.dtd'>"#,
    );
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert_eq!(public_identifier.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
            assert_eq!(
                system_identifier.as_deref(),
                Some("http://www.w3.org/TR/html4/strict.dtd")
            );
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_eof_in_doctype_forces_quirks() {
    let collector = tokenize("<!DOCTYPE html").expect("tokenize failed");
    match &collector.tokens[0] {
        Token::Doctype { force_quirks, .. } => assert!(force_quirks),
        _ => panic!("Expected DOCTYPE token"),
    }
    assert_eq!(collector.issues.len(), 1);
    assert_eq!(collector.issues[0].code, ParseErrorCode::EofInDoctype);
}

#[test]
fn test_start_tag_names_and_attributes_are_lowercased() {
    let tokens = tokens(r#"<DIV ID="Main" Class='Big' hidden data-x=1>"#);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert_eq!(attributes.get("id").map(String::as_str), Some("Main"));
            assert_eq!(attributes.get("class").map(String::as_str), Some("Big"));
            assert_eq!(attributes.get("hidden").map(String::as_str), Some(""));
            assert_eq!(attributes.get("data-x").map(String::as_str), Some("1"));
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokens("<br/>");
    match &tokens[0] {
        Token::StartTag {
            name, self_closing, ..
        } => {
            assert_eq!(name, "br");
            assert!(self_closing);
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_duplicate_attribute_keeps_first_value() {
    let collector = tokenize(r#"<p id="a" ID="b">"#).expect("tokenize failed");
    match &collector.tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes.get("id").map(String::as_str), Some("a"));
        }
        _ => panic!("Expected StartTag token"),
    }
    assert_eq!(collector.issues.len(), 1);
    assert_eq!(collector.issues[0].code, ParseErrorCode::DuplicateAttribute);
}

#[test]
fn test_stray_solidus_starts_a_new_attribute() {
    let collector = tokenize("<a / b>").expect("tokenize failed");
    match &collector.tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "a");
            assert!(!self_closing);
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes.get("b").map(String::as_str), Some(""));
        }
        _ => panic!("Expected StartTag token"),
    }
    assert_eq!(
        collector.issues.iter().map(|i| i.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::UnexpectedSolidusInTag]
    );
}

#[test]
fn test_null_in_tag_is_replaced() {
    let collector = tokenize("<p\0 id=\"a\0b\" t\0g>").expect("tokenize failed");
    match &collector.tokens[0] {
        Token::StartTag {
            name, attributes, ..
        } => {
            assert_eq!(name, "p\u{FFFD}");
            assert_eq!(attributes.get("id").map(String::as_str), Some("a\u{FFFD}b"));
            assert_eq!(attributes.get("t\u{FFFD}g").map(String::as_str), Some(""));
        }
        _ => panic!("Expected StartTag token"),
    }
    assert_eq!(
        collector.issues.iter().map(|i| i.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::UnexpectedNullCharacter; 3]
    );
}

#[test]
fn test_end_tag_with_attributes_is_reported() {
    let codes = issue_codes(r#"</p class="x">"#);
    assert_eq!(codes, vec![ParseErrorCode::EndTagWithAttributes]);

    let codes = issue_codes("</br/>");
    assert_eq!(codes, vec![ParseErrorCode::EndTagWithTrailingSolidus]);
}

#[test]
fn test_eof_in_tag_drops_the_tag() {
    let collector = tokenize(r#"<div id="x"#).expect("tokenize failed");
    assert_eq!(collector.tokens, vec![Token::EndOfFile]);
    assert_eq!(collector.issues.len(), 1);
    assert_eq!(collector.issues[0].code, ParseErrorCode::EofInTag);
    assert!(matches!(
        collector.issues[0].origin,
        IssueOrigin::Tokenizer(_)
    ));
    assert!(collector.issues[0].position.is_some());
}

#[test]
fn test_issue_position_is_the_offending_character() {
    let collector = tokenize("a\0").expect("tokenize failed");
    assert_eq!(collector.issues[0].code, ParseErrorCode::UnexpectedNullCharacter);
    assert_eq!(collector.issues[0].position, Some(1));

    // End of input sits one past the last character.
    let collector = tokenize("<p").expect("tokenize failed");
    assert_eq!(collector.issues[0].code, ParseErrorCode::EofInTag);
    assert_eq!(collector.issues[0].position, Some(2));
}

#[test]
fn test_comment() {
    let tokens = tokens("<!-- hello -->");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: " hello ".to_string()
        }
    );
}

#[test]
fn test_abrupt_empty_comment() {
    let collector = tokenize("<!-->").expect("tokenize failed");
    assert_eq!(
        collector.tokens[0],
        Token::Comment {
            data: String::new()
        }
    );
    assert_eq!(
        collector.issues[0].code,
        ParseErrorCode::AbruptClosingOfEmptyComment
    );
}

#[test]
fn test_nested_comment_stays_open() {
    let collector = tokenize("<!--a<!--b-->").expect("tokenize failed");
    assert_eq!(
        collector.tokens,
        vec![
            Token::Comment {
                data: "a<!--b".to_string()
            },
            Token::EndOfFile,
        ]
    );
    assert_eq!(
        collector.issues.iter().map(|i| i.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::NestedComment]
    );
}

#[test]
fn test_incorrectly_closed_comment() {
    let collector = tokenize("<!--a--!>").expect("tokenize failed");
    assert_eq!(
        collector.tokens[0],
        Token::Comment {
            data: "a".to_string()
        }
    );
    assert_eq!(
        collector.issues.iter().map(|i| i.code).collect::<Vec<_>>(),
        vec![ParseErrorCode::IncorrectlyClosedComment]
    );
}

#[test]
fn test_null_in_comment_is_replaced() {
    let collector = tokenize("<!--a\0b-->").expect("tokenize failed");
    assert_eq!(
        collector.tokens[0],
        Token::Comment {
            data: "a\u{FFFD}b".to_string()
        }
    );
    assert_eq!(
        issue_codes("<!--a\0b-->"),
        vec![ParseErrorCode::UnexpectedNullCharacter]
    );
}

#[test]
fn test_cdata_becomes_bogus_comment() {
    let collector = tokenize("<![CDATA[x]]>").expect("tokenize failed");
    match &collector.tokens[0] {
        Token::Comment { data } => assert!(data.starts_with("[CDATA[")),
        _ => panic!("Expected Comment token"),
    }
    assert_eq!(collector.issues[0].code, ParseErrorCode::CdataInHtmlContent);
}

#[test]
fn test_processing_instruction_becomes_bogus_comment() {
    let collector = tokenize("<?xml version?>").expect("tokenize failed");
    assert_eq!(
        collector.tokens[0],
        Token::Comment {
            data: "?xml version?".to_string()
        }
    );
    assert_eq!(
        collector.issues[0].code,
        ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName
    );
}

#[test]
fn test_lone_less_than_is_text() {
    let tokens = tokens("a < b");
    let text: String = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Character { data } => Some(*data),
            _ => None,
        })
        .collect();
    assert_eq!(text, "a < b");
}

#[test]
fn test_title_content_is_rcdata() {
    let tokens = tokens("<title>a<b>c</b></title>");
    let names: Vec<String> = tokens.iter().map(ToString::to_string).collect();
    assert_eq!(
        names,
        vec![
            "<title>",
            "Character(a)",
            "Character(<)",
            "Character(b)",
            "Character(>)",
            "Character(c)",
            "Character(<)",
            "Character(/)",
            "Character(b)",
            "Character(>)",
            "</title>",
            "EOF",
        ]
    );
}

#[test]
fn test_character_reference_aborts() {
    let result = tokenize("a&amp;b");
    assert_eq!(result.err(), Some(Error::CharacterReference { position: 1 }));

    let result = tokenize(r#"<a href="?x=1&y=2">"#);
    assert!(matches!(result, Err(Error::CharacterReference { .. })));
}
