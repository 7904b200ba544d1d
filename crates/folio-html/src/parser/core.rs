use std::fmt::Write as _;

use strum_macros::Display;

use folio_dom::{AttributesMap, DocumentType, DomTree, ElementData, NodeId, NodeType};

use crate::error::{Error, Result};
use crate::issue::{IssueOrigin, ParseErrorCode, ParseIssue};
use crate::tokenizer::chars::is_ascii_whitespace;
use crate::tokenizer::{HTMLTokenizer, Token, TokenSink, TokenSinkResult};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
///
/// Only the modes reachable from the supported subset exist. Tables, forms,
/// templates and framesets are rejected before they could need one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
}

/// Outcome of handling one token in one insertion mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// The token was consumed.
    Handled,
    /// The mode was switched and the same token must be handled again.
    Reprocess,
}

/// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
///
/// "has an element in scope": "applet, caption, html, table, td, th,
/// marquee, object, template, MathML mi, ..."
const DEFAULT_SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
];

/// "has an element in button scope": default scope plus "button".
const BUTTON_SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template", "button",
];

/// "has an element in list item scope": default scope plus "ol" and "ul".
const LIST_ITEM_SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template", "ol",
    "ul",
];

/// Headings handled by the "in body" insertion mode. `h6` is not part of the subset.
const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5"];

/// Inline formatting elements. Their end tags must match the current node.
const FORMATTING_ELEMENTS: &[&str] = &[
    "b", "strong", "i", "em", "u", "big", "small", "code", "tt", "a",
];

/// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
///
/// "If there is a node in the stack of open elements that is not either a dd
/// element, a dt element, an li element, an optgroup element, an option
/// element, a p element, an rb element, an rp element, an rt element, an rtc
/// element, a tbody element, a td element, a tfoot element, a th element, a
/// thead element, a tr element, the body element, or the html element, then
/// this is a parse error."
const MAY_STAY_OPEN: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td", "tfoot",
    "th", "thead", "tr", "body", "html",
];

/// [§ 13.2.6.4.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
///
/// "in head" start tags outside the subset.
const UNSUPPORTED_HEAD_ELEMENTS: &[&str] = &[
    "noscript", "noframes", "style", "script", "template", "base", "basefont", "bgsound", "link",
];

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The HTML parser builds a DOM tree from the tokens an [`HTMLTokenizer`]
/// pushes into it.
///
/// One parser handles one document. Recoverable parse errors, from both the
/// tokenizer and the tree builder, are passed to the callback given to
/// [`HTMLParser::new`] in input order.
pub struct HTMLParser<'a> {
    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    /// "the original insertion mode", restored when the "text" mode ends.
    original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// Stores `NodeId`s into the arena.
    stack_of_open_elements: Vec<NodeId>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    head_element_pointer: Option<NodeId>,

    /// `NodeId::ROOT` (index 0) is the Document node.
    tree: DomTree,

    on_issue: Box<dyn FnMut(&ParseIssue) + 'a>,

    /// End tag name the tokenizer must be switched to RCDATA for once the
    /// current token is done.
    pending_raw_text: Option<String>,

    /// Set once the end-of-file token has been handled.
    ready: bool,
}

impl<'a> HTMLParser<'a> {
    /// Create a parser that reports recoverable parse errors to `on_issue`.
    #[must_use]
    pub fn new(on_issue: impl FnMut(&ParseIssue) + 'a) -> Self {
        // DomTree::new() creates the Document node at NodeId::ROOT
        Self {
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            stack_of_open_elements: Vec::new(),
            head_element_pointer: None,
            tree: DomTree::new(),
            on_issue: Box::new(on_issue),
            pending_raw_text: None,
            ready: false,
        }
    }

    /// Tokenize `input`, build its tree, and return the tree.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] as soon as the input uses a construct outside
    /// the supported subset.
    pub fn run(mut self, input: &str) -> Result<DomTree> {
        let mut tokenizer = HTMLTokenizer::new(input);
        tokenizer.run(&mut self)?;
        Ok(self.tree)
    }

    /// The mode the next token will be handled in.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.insertion_mode
    }

    /// Returns true once the end-of-file token has been handled.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Report a tree construction parse error, tagged with the current mode.
    fn log_parse_error(&mut self, code: ParseErrorCode) {
        let issue = ParseIssue {
            origin: IssueOrigin::TreeBuilder(self.insertion_mode),
            code,
            position: None,
        };
        (self.on_issue)(&issue);
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    fn dispatch(&mut self, token: &Token) -> Result<Step> {
        match self.insertion_mode {
            InsertionMode::Initial => Ok(self.handle_initial_mode(token)),
            InsertionMode::BeforeHtml => Ok(self.handle_before_html_mode(token)),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => Ok(self.handle_text_mode(token)),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
        }
    }

    /// Dispatch `token` until a mode handles it, calling `visit` with each
    /// mode the token passes through. Does nothing once parsing has stopped.
    fn dispatch_until_handled(
        &mut self,
        token: &Token,
        mut visit: impl FnMut(InsertionMode),
    ) -> Result<()> {
        if self.ready {
            return Ok(());
        }
        loop {
            let mode = self.insertion_mode;
            visit(mode);
            match self.dispatch(token)? {
                Step::Handled => return Ok(()),
                Step::Reprocess if self.insertion_mode == mode => {
                    return Err(Error::ReprocessLoop { mode });
                }
                Step::Reprocess => {}
            }
        }
    }

    // =========================================================================
    // Stack of open elements
    // =========================================================================

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open elements."
    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    fn get_tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.tag_name(id)
    }

    fn current_tag_name(&self) -> Option<&str> {
        self.get_tag_name(self.current_node())
    }

    /// Pop elements until one named `tag_name` has been popped.
    fn pop_until_tag(&mut self, tag_name: &str) {
        self.pop_until_one_of(&[tag_name]);
    }

    /// Pop elements until one whose name is in `tag_names` has been popped.
    fn pop_until_one_of(&mut self, tag_names: &[&str]) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self
                .get_tag_name(id)
                .is_some_and(|name| tag_names.contains(&name))
            {
                break;
            }
        }
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "The stack of open elements is said to have an element target node in a
    /// specific scope consisting of a list of element types list when the
    /// following algorithm terminates in a match state:"
    ///
    /// STEP 1: "Initialize node to be the current node (the bottommost node
    ///          of the stack)."
    /// STEP 2: "If node is the target node, terminate in a match state."
    /// STEP 3: "Otherwise, if node is one of the element types in list,
    ///          terminate in a failure state."
    /// STEP 4: "Otherwise, set node to the previous entry in the stack of
    ///          open elements and return to step 2."
    fn has_element_in_specific_scope(&self, tag_name: &str, scope_markers: &[&str]) -> bool {
        for &node_id in self.stack_of_open_elements.iter().rev() {
            if let Some(node_tag) = self.get_tag_name(node_id) {
                if node_tag == tag_name {
                    return true;
                }
                if scope_markers.contains(&node_tag) {
                    return false;
                }
            }
        }
        false
    }

    fn has_element_in_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(tag_name, DEFAULT_SCOPE)
    }

    fn has_element_in_button_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(tag_name, BUTTON_SCOPE)
    }

    fn has_element_in_list_item_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(tag_name, LIST_ITEM_SCOPE)
    }

    /// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// ... a p element, ... the user agent must pop the current node off the
    /// stack of open elements."
    ///
    /// Only `dd`, `dt`, `li` and `p` can be open in the subset.
    fn generate_implied_end_tags_excluding(&mut self, exclude: Option<&str>) {
        const IMPLIED_END_TAG_ELEMENTS: &[&str] = &["dd", "dt", "li", "p"];

        while let Some(&current) = self.stack_of_open_elements.last() {
            if let Some(tag) = self.get_tag_name(current)
                && IMPLIED_END_TAG_ELEMENTS.contains(&tag)
                && exclude != Some(tag)
            {
                let _ = self.stack_of_open_elements.pop();
                continue;
            }
            break;
        }
    }

    /// Generate implied end tags except for `tag_name`, report a parse error
    /// if the current node is then not `tag_name`, and pop up to and
    /// including it. The caller has checked that it is in scope.
    fn close_element(&mut self, tag_name: &str) {
        self.generate_implied_end_tags_excluding(Some(tag_name));
        if self.current_tag_name() != Some(tag_name) {
            self.log_parse_error(ParseErrorCode::MisnestedTags);
        }
        self.pop_until_tag(tag_name);
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    fn close_p_element_in_button_scope(&mut self) {
        if self.has_element_in_button_scope("p") {
            self.close_element("p");
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// The `li` / `dd` / `dt` start tag loop.
    ///
    /// STEP 1: "Initialize node to be the current node."
    /// STEP 2: "Loop: If node is a [candidate] element, then run these substeps:
    ///          generate implied end tags, except for [candidate] elements. If
    ///          the current node is not a [candidate] element, then this is a
    ///          parse error. Pop elements from the stack of open elements until
    ///          a [candidate] element has been popped from the stack. Jump to
    ///          the step labeled done below."
    /// STEP 3: "If node is in the special category, but is not an address, div,
    ///          or p element, then jump to the step labeled done below."
    /// STEP 4: "Otherwise, set node to the previous entry in the stack of open
    ///          elements and return to the step labeled loop."
    fn close_open_list_item(&mut self, candidates: &[&str]) {
        let mut target = None;
        for &node_id in self.stack_of_open_elements.iter().rev() {
            let Some(tag) = self.get_tag_name(node_id) else {
                continue;
            };
            if candidates.contains(&tag) {
                target = Some(tag.to_string());
                break;
            }
            if Self::is_special_element(tag) && !matches!(tag, "address" | "div" | "p") {
                break;
            }
        }
        if let Some(tag) = target {
            self.close_element(&tag);
        }
    }

    /// Report `unclosed-elements` once if any open element is not allowed
    /// to remain open at the end of the body.
    fn check_open_elements_may_stay_open(&mut self) {
        let offending = self.stack_of_open_elements.iter().any(|&id| {
            self.get_tag_name(id)
                .is_some_and(|tag| !MAY_STAY_OPEN.contains(&tag))
        });
        if offending {
            self.log_parse_error(ParseErrorCode::UnclosedElements);
        }
    }

    /// [§ 13.1.1 Special](https://html.spec.whatwg.org/multipage/parsing.html#special)
    ///
    /// "The following elements have varying levels of special parsing rules:
    /// ... they are collectively known as special elements."
    fn is_special_element(tag_name: &str) -> bool {
        const SPECIAL: &[&str] = &[
            "address", "applet", "area", "article", "aside", "base", "basefont", "bgsound",
            "blockquote", "body", "br", "button", "caption", "center", "col", "colgroup", "dd",
            "details", "dir", "div", "dl", "dt", "embed", "fieldset", "figcaption", "figure",
            "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head",
            "header", "hgroup", "hr", "html", "iframe", "img", "input", "keygen", "li", "link",
            "listing", "main", "marquee", "menu", "meta", "nav", "noembed", "noframes",
            "noscript", "object", "ol", "p", "param", "plaintext", "pre", "script", "search",
            "section", "select", "source", "style", "summary", "table", "tbody", "td",
            "template", "textarea", "tfoot", "th", "thead", "title", "tr", "track", "ul", "wbr",
            "xmp",
        ];
        SPECIAL.contains(&tag_name)
    }

    // =========================================================================
    // Creating and inserting nodes
    // =========================================================================

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// STEP 1: "Create an element for the token"
    /// STEP 2: "Append the new element to the node at the adjusted insertion location."
    /// STEP 3: "Push the element onto the stack of open elements."
    fn insert_html_element(&mut self, tag_name: &str, attributes: &AttributesMap) -> NodeId {
        let element_id = self.tree.alloc(NodeType::Element(ElementData {
            tag_name: tag_name.to_string(),
            attrs: attributes.clone(),
        }));
        let parent_id = self.current_node();
        self.tree.append_child(parent_id, element_id);
        self.stack_of_open_elements.push(element_id);
        element_id
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data. Otherwise, create
    /// a new Text node whose data is data ... and insert the newly created
    /// node at the adjusted insertion location."
    fn insert_character(&mut self, c: char) {
        let parent_id = self.current_node();
        if let Some(last_id) = self.tree.last_child(parent_id)
            && let Some(node) = self.tree.get_mut(last_id)
            && let NodeType::Text(ref mut text) = node.node_type
        {
            text.push(c);
            return;
        }
        let text_id = self.tree.alloc(NodeType::Text(String::from(c)));
        self.tree.append_child(parent_id, text_id);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    ///
    /// With no explicit position, the comment goes into the current node.
    fn insert_comment(&mut self, data: &str, parent_id: Option<NodeId>) {
        let parent_id = parent_id.unwrap_or_else(|| self.current_node());
        let comment_id = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.tree.append_child(parent_id, comment_id);
    }

    /// Copy attributes of a stray `html` or `body` start tag onto an
    /// existing element: "for each attribute on the token, check to see if
    /// the attribute is already present on the ... element. If it is not,
    /// add the attribute and its corresponding value to that element."
    fn merge_attributes(&mut self, target: NodeId, attributes: &AttributesMap) {
        if let Some(element) = self.tree.as_element_mut(target) {
            for (name, value) in attributes {
                let _ = element
                    .attrs
                    .entry(name.clone())
                    .or_insert_with(|| value.clone());
            }
        }
    }

    /// [§ 13.2.6.2 The generic RCDATA element parsing algorithm](https://html.spec.whatwg.org/multipage/parsing.html#generic-rcdata-element-parsing-algorithm)
    ///
    /// STEP 1: "Insert an HTML element for the token."
    /// STEP 2: "Switch the tokenizer to the RCDATA state."
    /// STEP 3: "Let the original insertion mode be the current insertion mode."
    /// STEP 4: "Switch the insertion mode to "text"."
    fn follow_generic_rcdata(&mut self, tag_name: &str, attributes: &AttributesMap) {
        let _ = self.insert_html_element(tag_name, attributes);
        self.pending_raw_text = Some(tag_name.to_string());
        self.original_insertion_mode = Some(self.insertion_mode);
        self.insertion_mode = InsertionMode::Text;
    }

    // =========================================================================
    // Insertion modes
    // =========================================================================

    const fn is_whitespace_token(token: &Token) -> bool {
        matches!(token, Token::Character { data } if is_ascii_whitespace(*data))
    }

    /// Error code for a token that does not belong after the body.
    const fn unexpected_token_code(token: &Token) -> ParseErrorCode {
        match token {
            Token::StartTag { .. } | Token::Character { .. } => ParseErrorCode::UnexpectedStartTag,
            _ => ParseErrorCode::UnexpectedEndTag,
        }
    }

    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    fn handle_initial_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if is_ascii_whitespace(*data) => Step::Handled,

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.insert_comment(data, Some(NodeId::ROOT));
                Step::Handled
            }

            // "A DOCTYPE token"
            // "If the DOCTYPE token's name is not "html", or the token's public identifier is not
            // missing, or the token's system identifier is neither missing nor "about:legacy-compat",
            // then there is a parse error."
            // "Append a DocumentType node to the Document node..."
            // "Then, if the document is not an iframe srcdoc document, and the parser cannot change
            // the mode flag is false, and the DOCTYPE token matches one of the conditions in the
            // following list, then set the Document to quirks mode: The force-quirks flag is set
            // to on. ..."
            // "Then, switch the insertion mode to "before html"."
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                if name.as_deref() != Some("html")
                    || public_identifier.is_some()
                    || system_identifier
                        .as_deref()
                        .is_some_and(|id| id != "about:legacy-compat")
                {
                    self.log_parse_error(ParseErrorCode::NonHtmlDoctype);
                }
                self.tree.set_doctype(DocumentType {
                    name: name.clone(),
                    public_identifier: public_identifier.clone(),
                    system_identifier: system_identifier.clone(),
                });
                if *force_quirks {
                    self.tree.set_quirks_mode(true);
                }
                self.insertion_mode = InsertionMode::BeforeHtml;
                Step::Handled
            }

            // "Anything else"
            // "If the document is not an iframe srcdoc document, then this is a parse error;
            // if the parser cannot change the mode flag is false, set the Document to quirks mode."
            // "In any case, switch the insertion mode to "before html", then reprocess the token."
            _ => {
                self.log_parse_error(ParseErrorCode::MissingDoctype);
                self.tree.set_quirks_mode(true);
                self.insertion_mode = InsertionMode::BeforeHtml;
                Step::Reprocess
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    fn handle_before_html_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.log_parse_error(ParseErrorCode::UnexpectedDoctype);
                Step::Handled
            }

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.insert_comment(data, Some(NodeId::ROOT));
                Step::Handled
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if is_ascii_whitespace(*data) => Step::Handled,

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the Document as the
            // intended parent. Append it to the Document object. Put this element in the stack
            // of open elements."
            // "Switch the insertion mode to "before head"."
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                let _ = self.insert_html_element(name, attributes);
                self.insertion_mode = InsertionMode::BeforeHead;
                Step::Handled
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } if !token.is_end_tag_in(&["head", "body", "html", "br"]) => {
                self.log_parse_error(ParseErrorCode::UnexpectedEndTag);
                Step::Handled
            }

            // "Anything else"
            // "Create an html element whose node document is the Document object. Append it to
            // the Document object. Put this element in the stack of open elements."
            // "Switch the insertion mode to "before head", then reprocess the token."
            _ => {
                let _ = self.insert_html_element("html", &AttributesMap::new());
                self.insertion_mode = InsertionMode::BeforeHead;
                Step::Reprocess
            }
        }
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    fn handle_before_head_mode(&mut self, token: &Token) -> Result<Step> {
        Ok(match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if is_ascii_whitespace(*data) => Step::Handled,

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data, None);
                Step::Handled
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.log_parse_error(ParseErrorCode::UnexpectedDoctype);
                Step::Handled
            }

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            _ if token.is_start_tag("html") => self.handle_in_body_mode(token)?,

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token."
            // "Set the head element pointer to the newly created head element."
            // "Switch the insertion mode to "in head"."
            Token::StartTag {
                name, attributes, ..
            } if name == "head" => {
                let head_id = self.insert_html_element(name, attributes);
                self.head_element_pointer = Some(head_id);
                self.insertion_mode = InsertionMode::InHead;
                Step::Handled
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } if !token.is_end_tag_in(&["head", "body", "html", "br"]) => {
                self.log_parse_error(ParseErrorCode::UnexpectedEndTag);
                Step::Handled
            }

            // "Anything else"
            // "Insert an HTML element for a "head" start tag token with no attributes."
            // "Set the head element pointer to the newly created head element."
            // "Switch the insertion mode to "in head"."
            // "Reprocess the current token."
            _ => {
                let head_id = self.insert_html_element("head", &AttributesMap::new());
                self.head_element_pointer = Some(head_id);
                self.insertion_mode = InsertionMode::InHead;
                Step::Reprocess
            }
        })
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    fn handle_in_head_mode(&mut self, token: &Token) -> Result<Step> {
        Ok(match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } if is_ascii_whitespace(*data) => {
                self.insert_character(*data);
                Step::Handled
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data, None);
                Step::Handled
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.log_parse_error(ParseErrorCode::UnexpectedDoctype);
                Step::Handled
            }

            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is "html""
                // "Process the token using the rules for the "in body" insertion mode."
                "html" => self.handle_in_body_mode(token)?,

                // "A start tag whose tag name is "meta""
                // "Insert an HTML element for the token. Immediately pop the current node off the
                // stack of open elements."
                "meta" => {
                    let _ = self.insert_html_element(name, attributes);
                    let _ = self.stack_of_open_elements.pop();
                    Step::Handled
                }

                // "A start tag whose tag name is "title""
                // "Follow the generic RCDATA element parsing algorithm."
                "title" => {
                    self.follow_generic_rcdata(name, attributes);
                    Step::Handled
                }

                // Script, style, template and the other metadata elements are outside the subset.
                tag if UNSUPPORTED_HEAD_ELEMENTS.contains(&tag) => {
                    return Err(Error::UnsupportedElement {
                        tag: tag.to_string(),
                        mode: self.insertion_mode,
                    });
                }

                // "A start tag whose tag name is "head""
                // "Parse error. Ignore the token."
                "head" => {
                    self.log_parse_error(ParseErrorCode::UnexpectedStartTag);
                    Step::Handled
                }

                _ => self.handle_in_head_anything_else(),
            },

            // "An end tag whose tag name is "head""
            // "Pop the current node (which will be the head element) off the stack of open elements."
            // "Switch the insertion mode to "after head"."
            _ if token.is_end_tag("head") => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::AfterHead;
                Step::Handled
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } if !token.is_end_tag_in(&["body", "html", "br"]) => {
                self.log_parse_error(ParseErrorCode::UnexpectedEndTag);
                Step::Handled
            }

            // "Anything else"
            _ => self.handle_in_head_anything_else(),
        })
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    ///
    /// "Anything else":
    /// "Pop the current node (which will be the head element) off the stack of open elements."
    /// "Switch the insertion mode to "after head"."
    /// "Reprocess the token."
    fn handle_in_head_anything_else(&mut self) -> Step {
        let _ = self.stack_of_open_elements.pop();
        self.insertion_mode = InsertionMode::AfterHead;
        Step::Reprocess
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    fn handle_after_head_mode(&mut self, token: &Token) -> Result<Step> {
        Ok(match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } if is_ascii_whitespace(*data) => {
                self.insert_character(*data);
                Step::Handled
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data, None);
                Step::Handled
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.log_parse_error(ParseErrorCode::UnexpectedDoctype);
                Step::Handled
            }

            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is "html""
                // "Process the token using the rules for the "in body" insertion mode."
                "html" => self.handle_in_body_mode(token)?,

                // "A start tag whose tag name is "body""
                // "Insert an HTML element for the token."
                // "Switch the insertion mode to "in body"."
                "body" => {
                    let _ = self.insert_html_element(name, attributes);
                    self.insertion_mode = InsertionMode::InBody;
                    Step::Handled
                }

                "frameset" | "base" | "basefont" | "bgsound" | "link" | "noframes" | "style"
                | "script" | "template" => {
                    return Err(Error::UnsupportedElement {
                        tag: name.clone(),
                        mode: self.insertion_mode,
                    });
                }

                // "A start tag whose tag name is one of: ... "meta", ... "title""
                // "Parse error."
                // "Push the node pointed to by the head element pointer onto the stack of open
                // elements."
                // "Process the token using the rules for the "in head" insertion mode."
                // "Remove the node pointed to by the head element pointer from the stack of open
                // elements. (It might not be the current node at this point.)"
                "title" | "meta" => {
                    self.log_parse_error(ParseErrorCode::UnexpectedStartTag);
                    let Some(head_id) = self.head_element_pointer else {
                        return self.handle_in_head_mode(token);
                    };
                    self.stack_of_open_elements.push(head_id);
                    let step = self.handle_in_head_mode(token)?;
                    self.stack_of_open_elements.retain(|&id| id != head_id);
                    step
                }

                // "A start tag whose tag name is "head""
                // "Parse error. Ignore the token."
                "head" => {
                    self.log_parse_error(ParseErrorCode::UnexpectedStartTag);
                    Step::Handled
                }

                _ => self.handle_after_head_anything_else(),
            },

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } if !token.is_end_tag_in(&["body", "html", "br"]) => {
                self.log_parse_error(ParseErrorCode::UnexpectedEndTag);
                Step::Handled
            }

            // "Anything else"
            _ => self.handle_after_head_anything_else(),
        })
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    ///
    /// "Anything else":
    /// "Insert an HTML element for a "body" start tag token with no attributes."
    /// "Switch the insertion mode to "in body"."
    /// "Reprocess the current token."
    fn handle_after_head_anything_else(&mut self) -> Step {
        let _ = self.insert_html_element("body", &AttributesMap::new());
        self.insertion_mode = InsertionMode::InBody;
        Step::Reprocess
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// Handles the supported body vocabulary: paragraphs, lists, headings h1
    /// to h5, inline formatting, and `br`/`img`/`hr`. Every other tag aborts
    /// the parse.
    fn handle_in_body_mode(&mut self, token: &Token) -> Result<Step> {
        match token {
            // "Any other character token"
            // "Reconstruct the active formatting elements, if any. Insert the token's character."
            // NOTE: The tokenizer has already replaced NUL with U+FFFD, so no
            // character token is ever ignored here.
            Token::Character { data } => self.insert_character(*data),

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data, None),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.log_parse_error(ParseErrorCode::UnexpectedDoctype),

            Token::StartTag {
                name, attributes, ..
            } => return self.handle_in_body_start_tag(token, name, attributes),

            Token::EndTag { name, .. } => return self.handle_in_body_end_tag(name),

            // "An end-of-file token"
            // "If the stack of template insertion modes is not empty, then process the token
            // using the rules for the "in template" insertion mode."
            // "Otherwise, follow these steps: If there is a node in the stack of open elements
            // that is not either a dd element, ... then this is a parse error."
            // "Stop parsing."
            Token::EndOfFile => {
                self.check_open_elements_may_stay_open();
                self.ready = true;
            }
        }
        Ok(Step::Handled)
    }

    fn handle_in_body_start_tag(
        &mut self,
        token: &Token,
        name: &str,
        attributes: &AttributesMap,
    ) -> Result<Step> {
        match name {
            // "A start tag whose tag name is "html""
            // "Parse error."
            // "Otherwise, for each attribute on the token, check to see if the attribute is
            // already present on the top element of the stack of open elements. If it is not,
            // add the attribute and its corresponding value to that element."
            "html" => {
                self.log_parse_error(ParseErrorCode::UnexpectedStartTag);
                if let Some(&html_id) = self.stack_of_open_elements.first() {
                    self.merge_attributes(html_id, attributes);
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont", "bgsound", "link",
            // "meta", "noframes", "script", "style", "template", "title""
            // "Process the token using the rules for the "in head" insertion mode."
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
            | "style" | "template" | "title" => return self.handle_in_head_mode(token),

            // "A start tag whose tag name is "body""
            // "Parse error."
            // "If the second element on the stack of open elements is not a body element, if
            // the stack of open elements has only one node on it, or if there is a template
            // element on the stack of open elements, then ignore the token."
            // "Otherwise, ... for each attribute on the token, check to see if the attribute is
            // already present on the body element (the second element) on the stack of open
            // elements, and if it is not, add the attribute and its corresponding value to that
            // element."
            "body" => {
                self.log_parse_error(ParseErrorCode::UnexpectedStartTag);
                if let Some(&body_id) = self.stack_of_open_elements.get(1)
                    && self.get_tag_name(body_id) == Some("body")
                {
                    self.merge_attributes(body_id, attributes);
                }
            }

            // "A start tag whose tag name is one of: ... "dl", ... "ol", "p", ... "ul""
            // "If the stack of open elements has a p element in button scope, then close a p
            // element."
            // "Insert an HTML element for the token."
            "p" | "ul" | "ol" | "dl" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            // "If the stack of open elements has a p element in button scope, then close a p
            // element."
            // "If the current node is an HTML element whose tag name is one of "h1", "h2", "h3",
            // "h4", "h5", or "h6", then this is a parse error; pop the current node off the
            // stack of open elements."
            // "Insert an HTML element for the token."
            tag if HEADINGS.contains(&tag) => {
                self.close_p_element_in_button_scope();
                if self
                    .current_tag_name()
                    .is_some_and(|current| HEADINGS.contains(&current))
                {
                    self.log_parse_error(ParseErrorCode::NestedHeading);
                    let _ = self.stack_of_open_elements.pop();
                }
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em", "font", "i",
            // "s", "small", "strike", "strong", "tt", "u""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            // NOTE: The list of active formatting elements is not kept, so
            // formatting elements are plain open elements.
            tag if FORMATTING_ELEMENTS.contains(&tag) => {
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is one of: "area", "br", "embed", "img", "keygen", "wbr""
            // "Insert an HTML element for the token. Immediately pop the current node off the
            // stack of open elements."
            "br" | "img" => {
                let _ = self.insert_html_element(name, attributes);
                let _ = self.stack_of_open_elements.pop();
            }

            // "A start tag whose tag name is "hr""
            // "If the stack of open elements has a p element in button scope, then close a p
            // element."
            // "Insert an HTML element for the token. Immediately pop the current node off the
            // stack of open elements."
            "hr" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(name, attributes);
                let _ = self.stack_of_open_elements.pop();
            }

            // "A start tag whose tag name is "li""
            // "A start tag whose tag name is one of: "dd", "dt""
            // (loop described on close_open_list_item)
            // "Done: If the stack of open elements has a p element in button scope, then close
            // a p element."
            // "Finally, insert an HTML element for the token."
            "li" | "dd" | "dt" => {
                let candidates: &[&str] = if name == "li" { &["li"] } else { &["dd", "dt"] };
                self.close_open_list_item(candidates);
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(name, attributes);
            }

            _ => {
                return Err(Error::UnsupportedElement {
                    tag: name.to_string(),
                    mode: self.insertion_mode,
                });
            }
        }
        Ok(Step::Handled)
    }

    fn handle_in_body_end_tag(&mut self, name: &str) -> Result<Step> {
        match name {
            // "An end tag whose tag name is "body""
            // "If the stack of open elements does not have a body element in scope, this is a
            // parse error; ignore the token."
            // "Otherwise, if there is a node in the stack of open elements that is not either a
            // dd element, ... then this is a parse error."
            // "Switch the insertion mode to "after body"."
            //
            // "An end tag whose tag name is "html""
            // Same steps, then "Reprocess the token."
            "body" | "html" => {
                if !self.has_element_in_scope("body") {
                    self.log_parse_error(ParseErrorCode::ElementNotInScope);
                    return Ok(Step::Handled);
                }
                self.check_open_elements_may_stay_open();
                self.insertion_mode = InsertionMode::AfterBody;
                if name == "html" {
                    return Ok(Step::Reprocess);
                }
            }

            // "An end tag whose tag name is "p""
            // "If the stack of open elements does not have a p element in button scope, then
            // this is a parse error; insert an HTML element for a "p" start tag token with no
            // attributes."
            // "Close a p element."
            "p" => {
                if !self.has_element_in_button_scope("p") {
                    self.log_parse_error(ParseErrorCode::ElementNotInScope);
                    let _ = self.insert_html_element("p", &AttributesMap::new());
                }
                self.close_element("p");
            }

            // "An end tag whose tag name is one of: ... "dl", ... "ol", ... "ul""
            // "If the stack of open elements does not have an element in scope that is an HTML
            // element with the same tag name as that of the token, then this is a parse error;
            // ignore the token."
            // "Otherwise, run these steps: Generate implied end tags. If the current node is not
            // an HTML element with the same tag name as that of the token, then this is a parse
            // error. Pop elements from the stack of open elements until an HTML element with the
            // same tag name as the token has been popped from the stack."
            "ul" | "ol" | "dl" | "dd" | "dt" => {
                if self.has_element_in_scope(name) {
                    self.close_element(name);
                } else {
                    self.log_parse_error(ParseErrorCode::ElementNotInScope);
                }
            }

            // "An end tag whose tag name is "li""
            // "If the stack of open elements does not have an li element in list item scope,
            // then this is a parse error; ignore the token."
            "li" => {
                if self.has_element_in_list_item_scope("li") {
                    self.close_element("li");
                } else {
                    self.log_parse_error(ParseErrorCode::ElementNotInScope);
                }
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            // "If the stack of open elements does not have an element in scope that is an HTML
            // element and whose tag name is one of "h1", "h2", "h3", "h4", "h5", or "h6", then
            // this is a parse error; ignore the token."
            // "Otherwise, run these steps: Generate implied end tags. If the current node is not
            // an HTML element with the same tag name as that of the token, then this is a parse
            // error. Pop elements from the stack of open elements until an HTML element whose
            // tag name is one of "h1", "h2", "h3", "h4", "h5", or "h6" has been popped from the
            // stack."
            tag if HEADINGS.contains(&tag) => {
                if HEADINGS.iter().any(|h| self.has_element_in_scope(h)) {
                    self.generate_implied_end_tags_excluding(None);
                    if self.current_tag_name() != Some(name) {
                        self.log_parse_error(ParseErrorCode::MisnestedTags);
                    }
                    self.pop_until_one_of(HEADINGS);
                } else {
                    self.log_parse_error(ParseErrorCode::ElementNotInScope);
                }
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code", "em", "font", "i",
            // "nobr", "s", "small", "strike", "strong", "tt", "u""
            // "Run the adoption agency algorithm for the token."
            // NOTE: Only the first step is kept: "If the current node is an HTML element whose
            // tag name is subject, ... pop the current node off the stack of open elements and
            // return." Anything else needs the full algorithm.
            tag if FORMATTING_ELEMENTS.contains(&tag) => {
                let current = self.current_tag_name().unwrap_or_default();
                if current != tag {
                    return Err(Error::MisnestedEndTag {
                        tag: tag.to_string(),
                        current: current.to_string(),
                    });
                }
                let _ = self.stack_of_open_elements.pop();
            }

            _ => {
                return Err(Error::UnsupportedEndTag {
                    tag: name.to_string(),
                    mode: self.insertion_mode,
                });
            }
        }
        Ok(Step::Handled)
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    fn handle_text_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token"
            // "Insert the token's character."
            Token::Character { data } => {
                self.insert_character(*data);
                Step::Handled
            }

            // "An end-of-file token"
            // "Parse error."
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode and reprocess the token."
            Token::EndOfFile => {
                self.log_parse_error(ParseErrorCode::UnexpectedEndOfFile);
                self.leave_text_mode();
                Step::Reprocess
            }

            // "Any other end tag"
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode."
            _ => {
                self.leave_text_mode();
                Step::Handled
            }
        }
    }

    fn leave_text_mode(&mut self) {
        let _ = self.stack_of_open_elements.pop();
        self.insertion_mode = self
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody);
    }

    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    fn handle_after_body_mode(&mut self, token: &Token) -> Result<Step> {
        Ok(match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            _ if Self::is_whitespace_token(token) || token.is_start_tag("html") => {
                self.handle_in_body_mode(token)?
            }

            // "A comment token"
            // "Insert a comment as the last child of the first element in the stack of open
            // elements (the html element)."
            Token::Comment { data } => {
                let html_id = self.stack_of_open_elements.first().copied();
                self.insert_comment(data, html_id);
                Step::Handled
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.log_parse_error(ParseErrorCode::UnexpectedDoctype);
                Step::Handled
            }

            // "An end tag whose tag name is "html""
            // "Otherwise, switch the insertion mode to "after after body"."
            _ if token.is_end_tag("html") => {
                self.insertion_mode = InsertionMode::AfterAfterBody;
                Step::Handled
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => {
                self.ready = true;
                Step::Handled
            }

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess the token."
            _ => {
                self.log_parse_error(Self::unexpected_token_code(token));
                self.insertion_mode = InsertionMode::InBody;
                Step::Reprocess
            }
        })
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    fn handle_after_after_body_mode(&mut self, token: &Token) -> Result<Step> {
        Ok(match token {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.insert_comment(data, Some(NodeId::ROOT));
                Step::Handled
            }

            // "A DOCTYPE token"
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            _ if matches!(token, Token::Doctype { .. })
                || Self::is_whitespace_token(token)
                || token.is_start_tag("html") =>
            {
                self.handle_in_body_mode(token)?
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => {
                self.ready = true;
                Step::Handled
            }

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess the token."
            _ => {
                self.log_parse_error(Self::unexpected_token_code(token));
                self.insertion_mode = InsertionMode::InBody;
                Step::Reprocess
            }
        })
    }
}

impl TokenSink for HTMLParser<'_> {
    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
    ///
    /// "Reprocess the token": the same token is dispatched again in the mode
    /// the handler switched to. A handler asking for a reprocess without
    /// switching modes would loop forever and aborts the parse instead.
    fn process_token(&mut self, token: Token) -> Result<TokenSinkResult> {
        self.dispatch_until_handled(&token, |_| {})?;
        Ok(self
            .pending_raw_text
            .take()
            .map_or(TokenSinkResult::Continue, TokenSinkResult::RawText))
    }

    fn parse_error(&mut self, issue: ParseIssue) {
        (self.on_issue)(&issue);
    }
}

/// Render the subtree rooted at `id` as an indented outline, one node per line.
fn write_tree(out: &mut String, tree: &DomTree, id: NodeId, indent: usize) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document => {
            let _ = writeln!(out, "{prefix}Document");
            if let Some(doctype) = tree.doctype() {
                let name = doctype.name.as_deref().unwrap_or_default();
                let _ = writeln!(out, "{prefix}  <!DOCTYPE {name}>");
            }
        }
        NodeType::Element(data) => {
            if data.attrs.is_empty() {
                let _ = writeln!(out, "{prefix}<{}>", data.tag_name);
            } else {
                let mut attrs: Vec<String> = data
                    .attrs
                    .iter()
                    .map(|(k, v)| {
                        if v.is_empty() {
                            k.clone()
                        } else {
                            format!("{k}=\"{v}\"")
                        }
                    })
                    .collect();
                attrs.sort();
                let _ = writeln!(out, "{prefix}<{} {}>", data.tag_name, attrs.join(" "));
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            let _ = writeln!(out, "{prefix}\"{display}\"");
        }
        NodeType::Comment(data) => {
            let _ = writeln!(out, "{prefix}<!-- {data} -->");
        }
    }
    for &child_id in tree.children(id) {
        write_tree(out, tree, child_id, indent + 1);
    }
}

/// Format a whole DOM tree as an indented outline.
///
/// Attributes are sorted by name; spaces in text show as `·` and newlines
/// as `\n`, so whitespace-only text nodes stay visible.
#[must_use]
pub fn format_tree(tree: &DomTree) -> String {
    let mut out = String::new();
    write_tree(&mut out, tree, NodeId::ROOT, 0);
    out
}

/// Print a DOM tree for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let mut out = String::new();
    write_tree(&mut out, tree, id, indent);
    print!("{out}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser_with_stack(tags: &[&str]) -> HTMLParser<'static> {
        let mut parser = HTMLParser::new(|_| {});
        for tag in tags {
            let _ = parser.insert_html_element(tag, &AttributesMap::new());
        }
        parser
    }

    #[test]
    fn test_scope_stops_at_html_boundary_markers() {
        let parser = parser_with_stack(&["html", "body", "p", "b"]);
        assert!(parser.has_element_in_scope("p"));
        assert!(parser.has_element_in_button_scope("p"));
        assert!(!parser.has_element_in_scope("li"));
    }

    #[test]
    fn test_list_item_scope_stops_at_lists() {
        let parser = parser_with_stack(&["html", "body", "ul", "li", "ol"]);
        assert!(parser.has_element_in_scope("li"));
        assert!(!parser.has_element_in_list_item_scope("li"));
    }

    #[test]
    fn test_implied_end_tags_respect_exclusion() {
        let mut parser = parser_with_stack(&["html", "body", "ul", "li", "p"]);
        parser.generate_implied_end_tags_excluding(Some("li"));
        assert_eq!(parser.current_tag_name(), Some("li"));
        parser.generate_implied_end_tags_excluding(None);
        assert_eq!(parser.current_tag_name(), Some("ul"));
    }

    #[test]
    fn test_list_item_scan_stops_at_special_elements() {
        let mut parser = parser_with_stack(&["html", "body", "ul", "li", "ul"]);
        parser.close_open_list_item(&["li"]);
        assert_eq!(parser.stack_of_open_elements.len(), 5);

        let mut parser = parser_with_stack(&["html", "body", "ul", "li", "p"]);
        parser.close_open_list_item(&["li"]);
        assert_eq!(parser.current_tag_name(), Some("ul"));
    }

    #[test]
    fn test_end_of_file_alone_walks_every_mode_to_ready() {
        let mut issues = Vec::new();
        let mut parser = HTMLParser::new(|issue: &ParseIssue| issues.push(issue.code));
        let result = parser.process_token(Token::EndOfFile);
        assert_eq!(result, Ok(TokenSinkResult::Continue));
        assert!(parser.is_ready());
        assert_eq!(parser.insertion_mode(), InsertionMode::InBody);
        assert_eq!(
            parser.tree.children(NodeId::ROOT).len(),
            1,
            "only the synthesized html element"
        );

        // Tokens after the end are ignored.
        let result = parser.process_token(Token::Character { data: 'x' });
        assert_eq!(result, Ok(TokenSinkResult::Continue));
        assert_eq!(parser.tree.text_content(NodeId::ROOT), "");
        drop(parser);
        assert_eq!(issues, vec![ParseErrorCode::MissingDoctype]);
    }

    #[test]
    fn test_title_requests_rcdata() {
        let mut parser = parser_with_stack(&["html", "head"]);
        parser.insertion_mode = InsertionMode::InHead;
        let token = Token::StartTag {
            name: "title".to_string(),
            self_closing: false,
            attributes: AttributesMap::new(),
        };
        let result = parser.process_token(token);
        assert_eq!(result, Ok(TokenSinkResult::RawText("title".to_string())));
        assert_eq!(parser.insertion_mode(), InsertionMode::Text);
        assert_eq!(parser.original_insertion_mode, Some(InsertionMode::InHead));
    }

    fn modes_visited(parser: &mut HTMLParser<'_>, token: &Token) -> Vec<InsertionMode> {
        let mut modes = Vec::new();
        parser
            .dispatch_until_handled(token, |mode| modes.push(mode))
            .expect("dispatch failed");
        modes
    }

    fn assert_no_mode_repeats(modes: &[InsertionMode]) {
        for pair in modes.windows(2) {
            assert_ne!(pair[0], pair[1], "mode repeated in {modes:?}");
        }
    }

    #[test]
    fn test_reprocessing_always_changes_mode() {
        use InsertionMode::{
            AfterAfterBody, AfterBody, AfterHead, BeforeHead, BeforeHtml, InBody, InHead, Initial,
            Text,
        };

        let mut parser = HTMLParser::new(|_| {});
        let modes = modes_visited(&mut parser, &Token::Character { data: 'x' });
        assert_eq!(
            modes,
            vec![Initial, BeforeHtml, BeforeHead, InHead, AfterHead, InBody]
        );
        assert_no_mode_repeats(&modes);

        let mut parser = parser_with_stack(&["html", "body"]);
        parser.insertion_mode = AfterBody;
        let modes = modes_visited(&mut parser, &Token::Character { data: 'x' });
        assert_eq!(modes, vec![AfterBody, InBody]);

        let mut parser = parser_with_stack(&["html", "body"]);
        parser.insertion_mode = AfterAfterBody;
        let modes = modes_visited(&mut parser, &Token::Character { data: 'x' });
        assert_eq!(modes, vec![AfterAfterBody, InBody]);

        let mut parser = parser_with_stack(&["html", "head", "title"]);
        parser.original_insertion_mode = Some(InHead);
        parser.insertion_mode = Text;
        let modes = modes_visited(&mut parser, &Token::EndOfFile);
        assert_eq!(modes, vec![Text, InHead, AfterHead, InBody]);
        assert_no_mode_repeats(&modes);
        assert!(parser.is_ready());
    }

    #[test]
    fn test_characters_coalesce_into_one_text_node() {
        let mut parser = parser_with_stack(&["html", "body"]);
        for c in "Hi there".chars() {
            parser.insert_character(c);
        }
        let body = parser.current_node();
        assert_eq!(parser.tree.children(body).len(), 1);
        assert_eq!(parser.tree.text_content(body), "Hi there");
    }
}
