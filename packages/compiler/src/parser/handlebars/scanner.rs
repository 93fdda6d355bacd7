//! Character cursor and the token lexer used inside mustaches.

use crate::chars;
use crate::source::SourceSpan;

/// A position in the template text. Copying a cursor is how the parser
/// looks ahead without committing.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Cursor { input, offset: 0 }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn rest(&self) -> &'a str {
        &self.input[self.offset..]
    }

    pub fn at_end(&self) -> bool {
        self.offset >= self.input.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        Some(ch)
    }

    pub fn starts_with(&self, text: &str) -> bool {
        self.rest().starts_with(text)
    }

    /// Consumes `text` if the input continues with it.
    pub fn eat(&mut self, text: &str) -> bool {
        if self.starts_with(text) {
            self.offset += text.len();
            true
        } else {
            false
        }
    }

    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.advance();
        }
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn span_from(&self, start: usize) -> SourceSpan {
        SourceSpan::new(start, self.offset)
    }

    pub fn chars_from(&self, start: usize) -> &'a str {
        &self.input[start..self.offset]
    }

    /// Byte offset of the next `{{` at or after the cursor.
    pub fn find_open(&self) -> Option<usize> {
        self.rest().find("{{").map(|index| self.offset + index)
    }
}

/// Tokens that can appear between `{{` and `}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprToken {
    Id(String),
    Sep(char),
    Data,
    Str(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
    OpenSexpr,
    CloseSexpr,
    Equals,
    OpenBlockParams,
    Pipe,
    /// `}}`, with `strip` set for `~}}`.
    Close { strip: bool },
    /// `}}}`, with `strip` set for `~}}}`.
    CloseTriple { strip: bool },
    Eof,
    Invalid(char),
}

impl ExprToken {
    pub fn describe(&self) -> String {
        match self {
            ExprToken::Id(id) => format!("'{id}'"),
            ExprToken::Sep(sep) => format!("'{sep}'"),
            ExprToken::Data => "'@'".to_string(),
            ExprToken::Str(_) => "a string".to_string(),
            ExprToken::Number(_) => "a number".to_string(),
            ExprToken::Boolean(_) => "a boolean".to_string(),
            ExprToken::Null => "'null'".to_string(),
            ExprToken::Undefined => "'undefined'".to_string(),
            ExprToken::OpenSexpr => "'('".to_string(),
            ExprToken::CloseSexpr => "')'".to_string(),
            ExprToken::Equals => "'='".to_string(),
            ExprToken::OpenBlockParams => "'as |'".to_string(),
            ExprToken::Pipe => "'|'".to_string(),
            ExprToken::Close { .. } => "'}}'".to_string(),
            ExprToken::CloseTriple { .. } => "'}}}'".to_string(),
            ExprToken::Eof => "end of input".to_string(),
            ExprToken::Invalid(ch) => format!("'{ch}'"),
        }
    }
}

/// Characters that may follow a path segment or `.`.
fn is_lookahead(ch: Option<char>) -> bool {
    match ch {
        None => true,
        Some(ch) => ch.is_whitespace() || matches!(ch, '=' | '~' | '}' | '/' | '.' | ')' | '|'),
    }
}

/// Characters that may follow a literal.
fn is_literal_lookahead(ch: Option<char>) -> bool {
    match ch {
        None => true,
        Some(ch) => ch.is_whitespace() || matches!(ch, '~' | '}' | ')' | '|' | '='),
    }
}

impl<'a> Cursor<'a> {
    /// Lexes the next token inside a mustache, skipping leading whitespace.
    pub fn next_token(&mut self) -> (ExprToken, SourceSpan) {
        self.skip_whitespace();
        let start = self.offset;
        let token = self.lex_token();
        (token, self.span_from(start))
    }

    pub fn peek_token(&self) -> ExprToken {
        let mut lookahead = *self;
        lookahead.next_token().0
    }

    fn lex_token(&mut self) -> ExprToken {
        let Some(ch) = self.peek() else {
            return ExprToken::Eof;
        };

        if self.eat("~}}}") {
            return ExprToken::CloseTriple { strip: true };
        }
        if self.eat("}}}") {
            return ExprToken::CloseTriple { strip: false };
        }
        if self.eat("~}}") {
            return ExprToken::Close { strip: true };
        }
        if self.eat("}}") {
            return ExprToken::Close { strip: false };
        }

        match ch {
            chars::LPAREN => {
                self.advance();
                ExprToken::OpenSexpr
            }
            chars::RPAREN => {
                self.advance();
                ExprToken::CloseSexpr
            }
            chars::EQ => {
                self.advance();
                ExprToken::Equals
            }
            chars::PIPE => {
                self.advance();
                ExprToken::Pipe
            }
            chars::AT => {
                self.advance();
                ExprToken::Data
            }
            chars::DQ | chars::SQ => self.lex_string(ch),
            chars::PERIOD => {
                if self.eat("..") {
                    return ExprToken::Id("..".to_string());
                }
                self.advance();
                if is_lookahead(self.peek()) {
                    ExprToken::Id(".".to_string())
                } else {
                    ExprToken::Sep('.')
                }
            }
            chars::SLASH => {
                self.advance();
                ExprToken::Sep('/')
            }
            '[' => self.lex_literal_segment(),
            _ => {
                if let Some(token) = self.lex_keyword_or_number() {
                    return token;
                }
                if chars::is_id_terminator(ch) {
                    self.advance();
                    return ExprToken::Invalid(ch);
                }
                let start = self.offset;
                while matches!(self.peek(), Some(ch) if !chars::is_id_terminator(ch)) {
                    self.advance();
                }
                ExprToken::Id(self.chars_from(start).to_string())
            }
        }
    }

    fn lex_string(&mut self, quote: char) -> ExprToken {
        self.advance();
        let mut value = String::new();
        loop {
            match self.advance() {
                None => return ExprToken::Invalid(quote),
                Some(chars::BACKSLASH) if self.peek() == Some(quote) => {
                    self.advance();
                    value.push(quote);
                }
                Some(ch) if ch == quote => return ExprToken::Str(value),
                Some(ch) => value.push(ch),
            }
        }
    }

    fn lex_literal_segment(&mut self) -> ExprToken {
        self.advance();
        let start = self.offset;
        while let Some(ch) = self.peek() {
            if ch == ']' {
                let id = self.chars_from(start).to_string();
                self.advance();
                return ExprToken::Id(id);
            }
            self.advance();
        }
        ExprToken::Invalid('[')
    }

    fn lex_keyword_or_number(&mut self) -> Option<ExprToken> {
        let rest = self.rest();

        if rest.starts_with("as") {
            let after = rest[2..].trim_start();
            let leading_ws = rest.len() - 2 - after.len();
            if leading_ws > 0 && after.starts_with('|') {
                self.offset += 2 + leading_ws + 1;
                return Some(ExprToken::OpenBlockParams);
            }
        }

        for (word, token) in [
            ("true", ExprToken::Boolean(true)),
            ("false", ExprToken::Boolean(false)),
            ("null", ExprToken::Null),
            ("undefined", ExprToken::Undefined),
        ] {
            if rest.starts_with(word) && is_literal_lookahead(rest[word.len()..].chars().next()) {
                self.offset += word.len();
                return Some(token);
            }
        }

        let number_len = number_prefix_len(rest);
        if number_len > 0 && is_literal_lookahead(rest[number_len..].chars().next()) {
            let value = rest[..number_len].parse::<f64>().ok()?;
            self.offset += number_len;
            return Some(ExprToken::Number(value));
        }
        None
    }
}

/// Length of a leading `-?[0-9]+(\.[0-9]+)?`, or 0.
fn number_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut index = 0;
    if bytes.first() == Some(&b'-') {
        index += 1;
    }
    let digits_start = index;
    while index < bytes.len() && bytes[index].is_ascii_digit() {
        index += 1;
    }
    if index == digits_start {
        return 0;
    }
    if index + 1 < bytes.len() && bytes[index] == b'.' && bytes[index + 1].is_ascii_digit() {
        index += 1;
        while index < bytes.len() && bytes[index].is_ascii_digit() {
            index += 1;
        }
    }
    index
}
