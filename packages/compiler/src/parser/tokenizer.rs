//! Character level HTML tokenizer.
//!
//! The tokenizer never builds nodes itself. It reports what it sees to a
//! [`TokenizerDelegate`] and exposes its state so the tree builder can splice
//! mustaches into the middle of a tag.

use super::entities::decode_character_reference;
use super::tags::{get_html_tag_definition, TagContentType};
use crate::chars;
use crate::syntax_error::{SyntaxErrorCode, SyntaxResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerState {
    BeforeData,
    Data,
    TagOpen,
    MarkupDeclarationOpen,
    CommentStart,
    CommentStartDash,
    Comment,
    CommentEndDash,
    CommentEnd,
    TagName,
    EndTagName,
    EndTagOpen,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueDoubleQuoted,
    AttributeValueSingleQuoted,
    AttributeValueUnquoted,
    AfterAttributeValueQuoted,
    SelfClosingStartTag,
}

impl TokenizerState {
    pub fn name(&self) -> &'static str {
        match self {
            TokenizerState::BeforeData => "beforeData",
            TokenizerState::Data => "data",
            TokenizerState::TagOpen => "tagOpen",
            TokenizerState::MarkupDeclarationOpen => "markupDeclarationOpen",
            TokenizerState::CommentStart => "commentStart",
            TokenizerState::CommentStartDash => "commentStartDash",
            TokenizerState::Comment => "comment",
            TokenizerState::CommentEndDash => "commentEndDash",
            TokenizerState::CommentEnd => "commentEnd",
            TokenizerState::TagName => "tagName",
            TokenizerState::EndTagName => "endTagName",
            TokenizerState::EndTagOpen => "endTagOpen",
            TokenizerState::BeforeAttributeName => "beforeAttributeName",
            TokenizerState::AttributeName => "attributeName",
            TokenizerState::AfterAttributeName => "afterAttributeName",
            TokenizerState::BeforeAttributeValue => "beforeAttributeValue",
            TokenizerState::AttributeValueDoubleQuoted => "attributeValueDoubleQuoted",
            TokenizerState::AttributeValueSingleQuoted => "attributeValueSingleQuoted",
            TokenizerState::AttributeValueUnquoted => "attributeValueUnquoted",
            TokenizerState::AfterAttributeValueQuoted => "afterAttributeValueQuoted",
            TokenizerState::SelfClosingStartTag => "selfClosingStartTag",
        }
    }

    /// Inside any comment state.
    pub fn in_comment(&self) -> bool {
        matches!(
            self,
            TokenizerState::CommentStart
                | TokenizerState::CommentStartDash
                | TokenizerState::Comment
                | TokenizerState::CommentEndDash
                | TokenizerState::CommentEnd
        )
    }
}

/// Receives tokenizer events. Offsets are absolute byte offsets into the
/// template source.
pub trait TokenizerDelegate {
    fn begin_data(&mut self, offset: usize);
    fn append_to_data(&mut self, text: &str);
    fn finish_data(&mut self, offset: usize);

    /// A `<` starting a tag or comment was consumed at `offset`.
    fn tag_open(&mut self, offset: usize);
    fn begin_start_tag(&mut self);
    fn begin_end_tag(&mut self);
    fn append_to_tag_name(&mut self, ch: char);
    fn mark_tag_as_self_closing(&mut self);
    fn finish_tag(&mut self, offset: usize) -> SyntaxResult<()>;

    fn begin_attribute(&mut self, offset: usize);
    fn append_to_attribute_name(&mut self, ch: char);
    fn begin_attribute_value(&mut self, quoted: bool, offset: usize);
    /// `start..end` is the source range the text was read from.
    fn append_to_attribute_value(&mut self, text: &str, start: usize, end: usize);
    fn finish_attribute_value(&mut self, offset: usize) -> SyntaxResult<()>;

    fn begin_comment(&mut self);
    fn append_to_comment_data(&mut self, text: &str);
    fn finish_comment(&mut self, offset: usize);

    fn report_syntax_error(&mut self, code: SyntaxErrorCode, offset: usize) -> SyntaxResult<()>;
}

pub struct Tokenizer {
    state: TokenizerState,
    /// Absolute offset of the next character to be consumed.
    offset: usize,
    tag_name_buffer: String,
    decode_entities: bool,
}

/// The part of the input currently being tokenized.
struct Part<'a> {
    input: &'a str,
    index: usize,
}

impl<'a> Part<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.index..].chars().next()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.index..]
    }
}

impl Tokenizer {
    pub fn new(decode_entities: bool) -> Self {
        Tokenizer {
            state: TokenizerState::BeforeData,
            offset: 0,
            tag_name_buffer: String::new(),
            decode_entities,
        }
    }

    pub fn state(&self) -> TokenizerState {
        self.state
    }

    pub fn transition_to(&mut self, state: TokenizerState) {
        self.state = state;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Moves the tokenizer to where the next part begins in the source.
    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// Ends a run of text: the tree builder calls this after every content
    /// statement so that mustaches split text nodes.
    pub fn flush_data(&mut self, delegate: &mut dyn TokenizerDelegate) {
        if self.state == TokenizerState::Data {
            delegate.finish_data(self.offset);
            self.state = TokenizerState::BeforeData;
        }
    }

    pub fn tokenize_part(&mut self, input: &str, delegate: &mut dyn TokenizerDelegate) -> SyntaxResult<()> {
        let mut part = Part { input, index: 0 };
        while part.index < input.len() {
            self.step(&mut part, delegate)?;
        }
        Ok(())
    }

    fn consume(&mut self, part: &mut Part) -> Option<char> {
        let ch = part.peek()?;
        part.index += ch.len_utf8();
        self.offset += ch.len_utf8();
        Some(ch)
    }

    /// Decodes a character reference after a consumed `&`. Falls back to a
    /// literal `&` when decoding is off or the reference is incomplete.
    fn consume_char_ref(&mut self, part: &mut Part) -> String {
        if !self.decode_entities {
            return "&".to_string();
        }
        match decode_character_reference(part.rest()) {
            Some((decoded, len)) => {
                part.index += len;
                self.offset += len;
                decoded
            }
            None => "&".to_string(),
        }
    }

    /// Inside raw text elements only the matching end tag ends the text.
    fn is_ignored_end_tag(&self, part: &Part) -> bool {
        let tag = self.tag_name_buffer.as_str();
        if !matches!(tag, "title" | "style" | "script") {
            return false;
        }
        let end_tag = format!("</{tag}>");
        !part.rest().starts_with(&end_tag)
    }

    fn decodes_in_data(&self) -> bool {
        get_html_tag_definition(&self.tag_name_buffer).content_type != TagContentType::RawText
    }

    fn append_to_tag_name(&mut self, ch: char, delegate: &mut dyn TokenizerDelegate) {
        self.tag_name_buffer.push(ch);
        delegate.append_to_tag_name(ch);
    }

    fn step(&mut self, part: &mut Part, delegate: &mut dyn TokenizerDelegate) -> SyntaxResult<()> {
        use TokenizerState::*;

        match self.state {
            BeforeData => {
                let ch = part.peek();
                if ch == Some(chars::LT) && !self.is_ignored_end_tag(part) {
                    self.state = TagOpen;
                    delegate.tag_open(self.offset);
                    self.consume(part);
                } else {
                    if ch == Some(chars::LF)
                        && self.decode_entities
                        && get_html_tag_definition(&self.tag_name_buffer).ignore_first_lf
                    {
                        self.consume(part);
                        self.tag_name_buffer.clear();
                        return Ok(());
                    }
                    self.state = Data;
                    delegate.begin_data(self.offset);
                }
            }
            Data => {
                let ch = part.peek();
                if ch == Some(chars::LT) && !self.is_ignored_end_tag(part) {
                    delegate.finish_data(self.offset);
                    self.state = TagOpen;
                    delegate.tag_open(self.offset);
                    self.consume(part);
                } else if ch == Some(chars::AMPERSAND) && self.decodes_in_data() {
                    self.consume(part);
                    let text = self.consume_char_ref(part);
                    delegate.append_to_data(&text);
                } else if let Some(ch) = self.consume(part) {
                    delegate.append_to_data(ch.encode_utf8(&mut [0; 4]));
                }
            }
            TagOpen => match self.consume(part) {
                Some(chars::BANG) => self.state = MarkupDeclarationOpen,
                Some(chars::SLASH) => self.state = EndTagOpen,
                Some(ch) if ch == chars::AT || ch == ':' || chars::is_ascii_letter(ch) => {
                    self.state = TagName;
                    self.tag_name_buffer.clear();
                    delegate.begin_start_tag();
                    self.append_to_tag_name(ch, delegate);
                }
                _ => {}
            },
            MarkupDeclarationOpen => {
                let ch = self.consume(part);
                if ch == Some(chars::MINUS) && part.peek() == Some(chars::MINUS) {
                    self.consume(part);
                    self.state = CommentStart;
                    delegate.begin_comment();
                }
            }
            CommentStart => match self.consume(part) {
                Some(chars::MINUS) => self.state = CommentStartDash,
                Some(chars::GT) => {
                    delegate.finish_comment(self.offset);
                    self.state = BeforeData;
                }
                Some(ch) => {
                    delegate.append_to_comment_data(ch.encode_utf8(&mut [0; 4]));
                    self.state = Comment;
                }
                None => {}
            },
            CommentStartDash => match self.consume(part) {
                Some(chars::MINUS) => self.state = CommentEnd,
                Some(chars::GT) => {
                    delegate.finish_comment(self.offset);
                    self.state = BeforeData;
                }
                Some(ch) => {
                    delegate.append_to_comment_data("-");
                    delegate.append_to_comment_data(ch.encode_utf8(&mut [0; 4]));
                    self.state = Comment;
                }
                None => {}
            },
            Comment => match self.consume(part) {
                Some(chars::MINUS) => self.state = CommentEndDash,
                Some(ch) => delegate.append_to_comment_data(ch.encode_utf8(&mut [0; 4])),
                None => {}
            },
            CommentEndDash => match self.consume(part) {
                Some(chars::MINUS) => self.state = CommentEnd,
                Some(ch) => {
                    delegate.append_to_comment_data("-");
                    delegate.append_to_comment_data(ch.encode_utf8(&mut [0; 4]));
                    self.state = Comment;
                }
                None => {}
            },
            CommentEnd => match self.consume(part) {
                Some(chars::GT) => {
                    delegate.finish_comment(self.offset);
                    self.state = BeforeData;
                }
                Some(ch) => {
                    delegate.append_to_comment_data("--");
                    delegate.append_to_comment_data(ch.encode_utf8(&mut [0; 4]));
                    self.state = Comment;
                }
                None => {}
            },
            TagName => match self.consume(part) {
                Some(ch) if chars::is_whitespace(ch) => self.state = BeforeAttributeName,
                Some(chars::SLASH) => self.state = SelfClosingStartTag,
                Some(chars::GT) => {
                    delegate.finish_tag(self.offset)?;
                    self.state = BeforeData;
                }
                Some(ch) => self.append_to_tag_name(ch, delegate),
                None => {}
            },
            EndTagName => match self.consume(part) {
                Some(ch) if chars::is_whitespace(ch) => {
                    self.state = BeforeAttributeName;
                    self.tag_name_buffer.clear();
                }
                Some(chars::SLASH) => {
                    self.state = SelfClosingStartTag;
                    self.tag_name_buffer.clear();
                }
                Some(chars::GT) => {
                    delegate.finish_tag(self.offset)?;
                    self.state = BeforeData;
                    self.tag_name_buffer.clear();
                }
                Some(ch) => self.append_to_tag_name(ch, delegate),
                None => {}
            },
            EndTagOpen => match self.consume(part) {
                Some(ch) if ch == chars::AT || ch == ':' || chars::is_ascii_letter(ch) => {
                    self.state = EndTagName;
                    self.tag_name_buffer.clear();
                    delegate.begin_end_tag();
                    self.append_to_tag_name(ch, delegate);
                }
                _ => {}
            },
            BeforeAttributeName => match part.peek() {
                Some(ch) if chars::is_whitespace(ch) => {
                    self.consume(part);
                }
                Some(chars::SLASH) => {
                    self.state = SelfClosingStartTag;
                    self.consume(part);
                }
                Some(chars::GT) => {
                    self.consume(part);
                    delegate.finish_tag(self.offset)?;
                    self.state = BeforeData;
                }
                Some(chars::EQ) => {
                    delegate.report_syntax_error(SyntaxErrorCode::AttrsInvalidChar(chars::EQ), self.offset)?;
                    self.state = AttributeName;
                    delegate.begin_attribute(self.offset);
                    self.consume(part);
                    delegate.append_to_attribute_name(chars::EQ);
                }
                Some(_) => {
                    self.state = AttributeName;
                    delegate.begin_attribute(self.offset);
                }
                None => {}
            },
            AttributeName => match part.peek() {
                Some(ch) if chars::is_whitespace(ch) => {
                    self.state = AfterAttributeName;
                    self.consume(part);
                }
                Some(chars::SLASH) => {
                    delegate.begin_attribute_value(false, self.offset);
                    delegate.finish_attribute_value(self.offset)?;
                    self.consume(part);
                    self.state = SelfClosingStartTag;
                }
                Some(chars::EQ) => {
                    self.state = BeforeAttributeValue;
                    self.consume(part);
                }
                Some(chars::GT) => {
                    delegate.begin_attribute_value(false, self.offset);
                    delegate.finish_attribute_value(self.offset)?;
                    self.consume(part);
                    delegate.finish_tag(self.offset)?;
                    self.state = BeforeData;
                }
                Some(ch @ (chars::DQ | chars::SQ | chars::LT)) => {
                    delegate.report_syntax_error(SyntaxErrorCode::AttrsInvalidChar(ch), self.offset)?;
                    self.consume(part);
                    delegate.append_to_attribute_name(ch);
                }
                Some(ch) => {
                    self.consume(part);
                    delegate.append_to_attribute_name(ch);
                }
                None => {}
            },
            AfterAttributeName => match part.peek() {
                Some(ch) if chars::is_whitespace(ch) => {
                    self.consume(part);
                }
                Some(chars::SLASH) => {
                    delegate.begin_attribute_value(false, self.offset);
                    delegate.finish_attribute_value(self.offset)?;
                    self.consume(part);
                    self.state = SelfClosingStartTag;
                }
                Some(chars::EQ) => {
                    self.consume(part);
                    self.state = BeforeAttributeValue;
                }
                Some(chars::GT) => {
                    delegate.begin_attribute_value(false, self.offset);
                    delegate.finish_attribute_value(self.offset)?;
                    self.consume(part);
                    delegate.finish_tag(self.offset)?;
                    self.state = BeforeData;
                }
                Some(ch) => {
                    delegate.begin_attribute_value(false, self.offset);
                    delegate.finish_attribute_value(self.offset)?;
                    self.state = AttributeName;
                    delegate.begin_attribute(self.offset);
                    self.consume(part);
                    delegate.append_to_attribute_name(ch);
                }
                None => {}
            },
            BeforeAttributeValue => match part.peek() {
                Some(ch) if chars::is_whitespace(ch) => {
                    self.consume(part);
                }
                Some(chars::DQ) => {
                    self.state = AttributeValueDoubleQuoted;
                    delegate.begin_attribute_value(true, self.offset);
                    self.consume(part);
                }
                Some(chars::SQ) => {
                    self.state = AttributeValueSingleQuoted;
                    delegate.begin_attribute_value(true, self.offset);
                    self.consume(part);
                }
                Some(chars::GT) => {
                    delegate.begin_attribute_value(false, self.offset);
                    delegate.finish_attribute_value(self.offset)?;
                    self.consume(part);
                    delegate.finish_tag(self.offset)?;
                    self.state = BeforeData;
                }
                Some(ch) => {
                    self.state = AttributeValueUnquoted;
                    delegate.begin_attribute_value(false, self.offset);
                    let start = self.offset;
                    self.consume(part);
                    delegate.append_to_attribute_value(ch.encode_utf8(&mut [0; 4]), start, self.offset);
                }
                None => {}
            },
            AttributeValueDoubleQuoted | AttributeValueSingleQuoted => {
                let quote = if self.state == AttributeValueDoubleQuoted {
                    chars::DQ
                } else {
                    chars::SQ
                };
                let start = self.offset;
                match self.consume(part) {
                    Some(ch) if ch == quote => {
                        delegate.finish_attribute_value(self.offset)?;
                        self.state = AfterAttributeValueQuoted;
                    }
                    Some(chars::AMPERSAND) => {
                        let text = self.consume_char_ref(part);
                        delegate.append_to_attribute_value(&text, start, self.offset);
                    }
                    Some(ch) => delegate.append_to_attribute_value(ch.encode_utf8(&mut [0; 4]), start, self.offset),
                    None => {}
                }
            }
            AttributeValueUnquoted => match part.peek() {
                Some(ch) if chars::is_whitespace(ch) => {
                    delegate.finish_attribute_value(self.offset)?;
                    self.consume(part);
                    self.state = BeforeAttributeName;
                }
                Some(chars::SLASH) => {
                    delegate.finish_attribute_value(self.offset)?;
                    self.consume(part);
                    self.state = SelfClosingStartTag;
                }
                Some(chars::AMPERSAND) => {
                    let start = self.offset;
                    self.consume(part);
                    let text = self.consume_char_ref(part);
                    delegate.append_to_attribute_value(&text, start, self.offset);
                }
                Some(chars::GT) => {
                    delegate.finish_attribute_value(self.offset)?;
                    self.consume(part);
                    delegate.finish_tag(self.offset)?;
                    self.state = BeforeData;
                }
                Some(ch) => {
                    let start = self.offset;
                    self.consume(part);
                    delegate.append_to_attribute_value(ch.encode_utf8(&mut [0; 4]), start, self.offset);
                }
                None => {}
            },
            AfterAttributeValueQuoted => match part.peek() {
                Some(ch) if chars::is_whitespace(ch) => {
                    self.consume(part);
                    self.state = BeforeAttributeName;
                }
                Some(chars::SLASH) => {
                    self.consume(part);
                    self.state = SelfClosingStartTag;
                }
                Some(chars::GT) => {
                    self.consume(part);
                    delegate.finish_tag(self.offset)?;
                    self.state = BeforeData;
                }
                Some(_) => self.state = BeforeAttributeName,
                None => {}
            },
            SelfClosingStartTag => match part.peek() {
                Some(chars::GT) => {
                    self.consume(part);
                    delegate.mark_tag_as_self_closing();
                    delegate.finish_tag(self.offset)?;
                    self.state = BeforeData;
                }
                _ => self.state = BeforeAttributeName,
            },
        }
        Ok(())
    }
}
