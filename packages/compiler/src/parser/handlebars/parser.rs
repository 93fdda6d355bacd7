//! Recursive descent parser for the handlebars layer.

use tracing::trace;

use super::scanner::{Cursor, ExprToken};
use super::whitespace::apply_whitespace_control;
use super::{Content, HbsBlock, HbsComment, HbsMustache, HbsPartial, HbsStatement, Program};
use crate::source::{PreprocessMode, Source, SourceSpan};
use crate::syntax_error::{SyntaxError, SyntaxErrorCode, SyntaxResult};
use crate::v1::{
    AtHead, Expression, Hash, HashPair, Literal, LiteralValue, PathExpression, PathHead,
    StripFlags, SubExpression, VarHead,
};

/// Parses `source` into a handlebars program. Whitespace control (`~` and
/// standalone lines) is applied unless the source is in codemod mode.
pub fn parse_handlebars(source: &Source) -> SyntaxResult<Program> {
    let mut parser = HbsParser {
        source,
        cursor: Cursor::new(source.text()),
    };
    let mut program = parser.parse_program(Vec::new())?;

    if let Some(terminator) = parser.terminator() {
        let start = parser.cursor.offset();
        let found = match terminator {
            Terminator::Close => "{{/",
            Terminator::Inverse | Terminator::InverseChain => "{{else",
        };
        return Err(parser.error(
            SyntaxErrorCode::HbsParseError(format!("unexpected `{found}` without an open block")),
            SourceSpan::new(start, start + 3),
        ));
    }

    if source.mode() == PreprocessMode::Precompile {
        apply_whitespace_control(&mut program);
    }
    trace!(statements = program.body.len(), "parsed handlebars program");
    Ok(program)
}

/// What ends the program currently being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    /// `{{/name}}`
    Close,
    /// `{{else}}` or `{{^}}`
    Inverse,
    /// `{{else name ...}}`
    InverseChain,
}

struct HbsParser<'s> {
    source: &'s Source,
    cursor: Cursor<'s>,
}

/// A parsed call: `path params... key=value... as |x|`.
struct Call {
    path: Expression,
    params: Vec<Expression>,
    hash: Hash,
    block_params: Vec<VarHead>,
}

/// The parts of a block after its opening mustache.
struct BlockTail {
    program: Program,
    inverse: Option<Program>,
    inverse_strip: StripFlags,
    close_strip: StripFlags,
    close_name: String,
    close_span: SourceSpan,
}

impl<'s> HbsParser<'s> {
    fn error(&self, code: SyntaxErrorCode, span: SourceSpan) -> SyntaxError {
        SyntaxError::new(code, span, self.source)
    }

    fn parse_error(&self, detail: String, span: SourceSpan) -> SyntaxError {
        self.error(SyntaxErrorCode::HbsParseError(detail), span)
    }

    fn parse_program(&mut self, block_params: Vec<VarHead>) -> SyntaxResult<Program> {
        let start = self.cursor.offset();
        let mut body = Vec::new();

        while !self.cursor.at_end() {
            if self.cursor.starts_with("{{") {
                if self.terminator().is_some() {
                    break;
                }
                body.push(self.parse_mustache_like()?);
            } else {
                self.parse_content(&mut body);
            }
        }

        Ok(Program {
            body,
            block_params,
            chained: false,
            loc: self.cursor.span_from(start),
        })
    }

    /// Classifies a `{{` that would end the current program.
    fn terminator(&self) -> Option<Terminator> {
        let mut lookahead = self.cursor;
        if !lookahead.eat("{{") {
            return None;
        }
        lookahead.eat("~");
        if lookahead.eat("/") {
            return Some(Terminator::Close);
        }
        if lookahead.eat("^") {
            lookahead.skip_whitespace();
            return (lookahead.starts_with("}}") || lookahead.starts_with("~}}"))
                .then_some(Terminator::Inverse);
        }
        lookahead.skip_whitespace();
        if !lookahead.eat("else") {
            return None;
        }
        match lookahead.peek() {
            Some(ch) if ch.is_whitespace() || ch == '~' || ch == '}' => {
                lookahead.skip_whitespace();
                if lookahead.starts_with("}}") || lookahead.starts_with("~}}") {
                    Some(Terminator::Inverse)
                } else {
                    Some(Terminator::InverseChain)
                }
            }
            _ => None,
        }
    }

    /// Content up to the next mustache. `\{{` escapes a mustache, which then
    /// becomes its own content statement running to the next `{{`.
    fn parse_content(&mut self, body: &mut Vec<HbsStatement>) {
        let start = self.cursor.offset();
        let input = self.cursor.input();
        let open = self.cursor.find_open().unwrap_or(input.len());
        let segment = &input[start..open];

        if segment.ends_with("\\\\") && open < input.len() {
            push_content(body, &segment[..segment.len() - 1], start, open);
            self.cursor.set_offset(open);
        } else if segment.ends_with('\\') && open < input.len() {
            let before = &segment[..segment.len() - 1];
            if !before.is_empty() {
                push_content(body, before, start, open - 1);
            }
            let end = escaped_content_end(input, open);
            push_content(body, &input[open..end], open, end);
            self.cursor.set_offset(end);
        } else {
            push_content(body, segment, start, open);
            self.cursor.set_offset(open);
        }
    }

    fn parse_mustache_like(&mut self) -> SyntaxResult<HbsStatement> {
        let start = self.cursor.offset();
        self.cursor.eat("{{");
        let mut strip = StripFlags::empty();
        if self.cursor.eat("~") {
            strip |= StripFlags::OPEN;
        }

        if self.cursor.starts_with("!") {
            return self.parse_comment(start, strip);
        }
        if self.cursor.eat("#>") {
            return Err(self.error(SyntaxErrorCode::HbsPartialUnsupported, self.cursor.span_from(start)));
        }
        if self.cursor.starts_with("#*") || self.cursor.starts_with("*") {
            return Err(self.error(SyntaxErrorCode::HbsDecoratorUnsupported, self.cursor.span_from(start)));
        }
        if self.cursor.eat("#") {
            return self.parse_block(start, strip, false);
        }
        if self.cursor.eat("^") {
            return self.parse_block(start, strip, true);
        }
        if self.cursor.eat(">") {
            return self.parse_partial(start, strip);
        }

        let (trusting, triple) = if self.cursor.eat("{") {
            (true, true)
        } else if self.cursor.eat("&") {
            (true, false)
        } else {
            (false, false)
        };

        let call = self.parse_call(false)?;
        let close_strip = self.expect_close(triple)?;
        Ok(HbsStatement::Mustache(HbsMustache {
            path: call.path,
            params: call.params,
            hash: call.hash,
            trusting,
            strip: strip | close_strip,
            loc: self.cursor.span_from(start),
        }))
    }

    fn parse_comment(&mut self, start: usize, strip: StripFlags) -> SyntaxResult<HbsStatement> {
        self.cursor.eat("!");
        let long = self.cursor.eat("--");
        let value_start = self.cursor.offset();
        let rest = self.cursor.rest();
        let terminator = if long { "--" } else { "}}" };

        let Some(found) = find_comment_end(rest, long) else {
            return Err(self.parse_error(
                format!("unclosed comment, expected `{terminator}}}}}`"),
                self.cursor.span_from(start),
            ));
        };

        let (value_len, close_len, close_strip) = found;
        let value = rest[..value_len].to_string();
        self.cursor.set_offset(value_start + value_len + close_len);
        let mut strip = strip;
        if close_strip {
            strip |= StripFlags::CLOSE;
        }
        Ok(HbsStatement::Comment(HbsComment {
            value,
            long,
            strip,
            loc: self.cursor.span_from(start),
        }))
    }

    fn parse_partial(&mut self, start: usize, strip: StripFlags) -> SyntaxResult<HbsStatement> {
        let name_start = self.cursor.offset();
        let Some(end) = self.cursor.rest().find("}}") else {
            return Err(self.parse_error("unclosed partial".to_string(), self.cursor.span_from(start)));
        };
        let raw = &self.cursor.rest()[..end];
        let close_strip = raw.ends_with('~');
        let name = raw.trim_end_matches('~').trim().to_string();
        self.cursor.set_offset(name_start + end + 2);
        let mut strip = strip;
        if close_strip {
            strip |= StripFlags::CLOSE;
        }
        Ok(HbsStatement::Partial(HbsPartial {
            name,
            strip,
            loc: self.cursor.span_from(start),
        }))
    }

    fn parse_block(&mut self, start: usize, open_strip: StripFlags, inverted: bool) -> SyntaxResult<HbsStatement> {
        let call = self.parse_call(true)?;
        let open_strip = open_strip | self.expect_close(false)?;
        let path_name = expression_name(&call.path);

        let tail = self.parse_block_tail(call.block_params)?;
        if tail.close_name != path_name {
            return Err(self.error(
                SyntaxErrorCode::HbsMismatchedBlock {
                    open: path_name,
                    close: tail.close_name,
                },
                tail.close_span,
            ));
        }

        let loc = self.cursor.span_from(start);
        let (program, inverse) = if inverted {
            if tail.inverse.is_some() {
                return Err(self.parse_error("unexpected inverse block in an inverted section".to_string(), loc));
            }
            let empty = Program {
                body: Vec::new(),
                block_params: Vec::new(),
                chained: false,
                loc: tail.program.loc.collapse_start(),
            };
            (empty, Some(tail.program))
        } else {
            (tail.program, tail.inverse)
        };

        Ok(HbsStatement::Block(HbsBlock {
            path: call.path,
            params: call.params,
            hash: call.hash,
            program,
            inverse,
            open_strip,
            inverse_strip: tail.inverse_strip,
            close_strip: tail.close_strip,
            loc,
        }))
    }

    /// Parses a block body plus its `{{else}}` branches and the closing tag.
    /// `{{else if ..}}` chains recurse so that every chained block shares the
    /// outer closing tag.
    fn parse_block_tail(&mut self, block_params: Vec<VarHead>) -> SyntaxResult<BlockTail> {
        let program = self.parse_program(block_params)?;

        match self.terminator() {
            Some(Terminator::Inverse) => {
                let inverse_strip = self.consume_inverse()?;
                let inverse = self.parse_program(Vec::new())?;
                if self.terminator() != Some(Terminator::Close) {
                    return Err(self.unclosed_block_error());
                }
                let (close_name, close_strip, close_span) = self.parse_close()?;
                Ok(BlockTail {
                    program,
                    inverse: Some(inverse),
                    inverse_strip,
                    close_strip,
                    close_name,
                    close_span,
                })
            }
            Some(Terminator::InverseChain) => {
                let chain_start = self.cursor.offset();
                self.cursor.eat("{{");
                let mut inverse_strip = StripFlags::empty();
                if self.cursor.eat("~") {
                    inverse_strip |= StripFlags::OPEN;
                }
                self.cursor.skip_whitespace();
                self.cursor.eat("else");
                let call = self.parse_call(true)?;
                let chain_strip = inverse_strip | self.expect_close(false)?;
                let nested = self.parse_block_tail(call.block_params)?;
                let chain_loc = self.cursor.span_from(chain_start);

                let chained = HbsBlock {
                    path: call.path,
                    params: call.params,
                    hash: call.hash,
                    program: nested.program,
                    inverse: nested.inverse,
                    open_strip: chain_strip,
                    inverse_strip: nested.inverse_strip,
                    close_strip: nested.close_strip,
                    loc: chain_loc,
                };
                Ok(BlockTail {
                    program,
                    inverse: Some(Program {
                        body: vec![HbsStatement::Block(chained)],
                        block_params: Vec::new(),
                        chained: true,
                        loc: chain_loc,
                    }),
                    inverse_strip: chain_strip,
                    close_strip: nested.close_strip,
                    close_name: nested.close_name,
                    close_span: nested.close_span,
                })
            }
            Some(Terminator::Close) => {
                let (close_name, close_strip, close_span) = self.parse_close()?;
                Ok(BlockTail {
                    program,
                    inverse: None,
                    inverse_strip: StripFlags::empty(),
                    close_strip,
                    close_name,
                    close_span,
                })
            }
            None => Err(self.unclosed_block_error()),
        }
    }

    fn unclosed_block_error(&self) -> SyntaxError {
        let offset = self.cursor.offset();
        self.parse_error(
            "expected a closing `{{/...}}` for the open block".to_string(),
            SourceSpan::new(offset, offset),
        )
    }

    /// Consumes `{{else}}` or `{{^}}`, returning its strip flags.
    fn consume_inverse(&mut self) -> SyntaxResult<StripFlags> {
        self.cursor.eat("{{");
        let mut strip = StripFlags::empty();
        if self.cursor.eat("~") {
            strip |= StripFlags::OPEN;
        }
        self.cursor.skip_whitespace();
        if !self.cursor.eat("^") {
            self.cursor.eat("else");
        }
        Ok(strip | self.expect_close(false)?)
    }

    /// Consumes `{{/name}}`, returning the name as written.
    fn parse_close(&mut self) -> SyntaxResult<(String, StripFlags, SourceSpan)> {
        let start = self.cursor.offset();
        self.cursor.eat("{{");
        let mut strip = StripFlags::empty();
        if self.cursor.eat("~") {
            strip |= StripFlags::OPEN;
        }
        self.cursor.eat("/");
        let name = self.parse_expression()?;
        let strip = strip | self.expect_close(false)?;
        Ok((expression_name(&name), strip, self.cursor.span_from(start)))
    }

    fn expect_close(&mut self, triple: bool) -> SyntaxResult<StripFlags> {
        let (token, span) = self.cursor.next_token();
        let strip = match (&token, triple) {
            (ExprToken::Close { strip }, false) | (ExprToken::CloseTriple { strip }, true) => *strip,
            _ => {
                let expected = if triple { "'}}}'" } else { "'}}'" };
                return Err(self.parse_error(
                    format!("expected {expected}, found {}", token.describe()),
                    span,
                ));
            }
        };
        Ok(if strip { StripFlags::CLOSE } else { StripFlags::empty() })
    }

    fn parse_call(&mut self, allow_block_params: bool) -> SyntaxResult<Call> {
        let path = self.parse_expression()?;
        let mut params = Vec::new();
        let mut hash = Hash {
            pairs: Vec::new(),
            loc: path.loc().collapse_end(),
        };
        let mut block_params = Vec::new();

        loop {
            let token = self.cursor.peek_token();
            match token {
                ExprToken::Close { .. } | ExprToken::CloseTriple { .. } | ExprToken::CloseSexpr | ExprToken::Eof => break,
                ExprToken::OpenBlockParams => {
                    let (_, span) = self.cursor.next_token();
                    if !allow_block_params {
                        return Err(self.parse_error("block params are only allowed on blocks".to_string(), span));
                    }
                    block_params = self.parse_block_params()?;
                    break;
                }
                ExprToken::Id(_) if self.is_hash_start() => {
                    hash = self.parse_hash()?;
                }
                _ if !hash.pairs.is_empty() => {
                    let (token, span) = self.cursor.next_token();
                    return Err(self.parse_error(
                        format!("expected a hash pair or '}}}}', found {}", token.describe()),
                        span,
                    ));
                }
                _ => params.push(self.parse_expression()?),
            }
        }

        Ok(Call {
            path,
            params,
            hash,
            block_params,
        })
    }

    fn is_hash_start(&self) -> bool {
        let mut lookahead = self.cursor;
        matches!(lookahead.next_token().0, ExprToken::Id(_)) && lookahead.next_token().0 == ExprToken::Equals
    }

    fn parse_hash(&mut self) -> SyntaxResult<Hash> {
        let mut pairs = Vec::new();
        while self.is_hash_start() {
            let (key, key_span) = self.cursor.next_token();
            let ExprToken::Id(key) = key else {
                unreachable!("is_hash_start checked for an identifier")
            };
            self.cursor.next_token();
            let value = self.parse_expression()?;
            pairs.push(HashPair {
                key,
                loc: key_span.extend(value.loc()),
                value,
            });
        }
        let loc = match (pairs.first(), pairs.last()) {
            (Some(first), Some(last)) => first.loc.extend(last.loc),
            _ => self.cursor.span_from(self.cursor.offset()),
        };
        Ok(Hash { pairs, loc })
    }

    fn parse_block_params(&mut self) -> SyntaxResult<Vec<VarHead>> {
        let mut params = Vec::new();
        loop {
            let (token, span) = self.cursor.next_token();
            match token {
                ExprToken::Pipe => return Ok(params),
                ExprToken::Id(name) => params.push(VarHead {
                    name,
                    local: false,
                    loc: span,
                }),
                other => {
                    return Err(self.parse_error(
                        format!("expected a block param or '|', found {}", other.describe()),
                        span,
                    ))
                }
            }
        }
    }

    fn parse_expression(&mut self) -> SyntaxResult<Expression> {
        let (token, span) = self.cursor.next_token();
        let literal = |value| Ok(Expression::Literal(Literal { value, loc: span }));
        match token {
            ExprToken::OpenSexpr => {
                let call = self.parse_call(false)?;
                let (close, close_span) = self.cursor.next_token();
                if close != ExprToken::CloseSexpr {
                    return Err(self.parse_error(
                        format!("expected ')', found {}", close.describe()),
                        close_span,
                    ));
                }
                Ok(Expression::SubExpression(SubExpression {
                    path: Box::new(call.path),
                    params: call.params,
                    hash: call.hash,
                    loc: span.extend(close_span),
                }))
            }
            ExprToken::Str(value) => literal(LiteralValue::String(value)),
            ExprToken::Number(value) => literal(LiteralValue::Number(value)),
            ExprToken::Boolean(value) => literal(LiteralValue::Boolean(value)),
            ExprToken::Null => literal(LiteralValue::Null),
            ExprToken::Undefined => literal(LiteralValue::Undefined),
            ExprToken::Data => self.parse_path(span.start, true),
            ExprToken::Id(_) => {
                self.cursor.set_offset(span.start);
                self.parse_path(span.start, false)
            }
            other => Err(self.parse_error(
                format!("expected an expression, found {}", other.describe()),
                span,
            )),
        }
    }

    /// Parses `segment (sep segment)*` starting at the cursor. `start` is where
    /// the path begins in the source (before `@` for data paths).
    fn parse_path(&mut self, start: usize, data: bool) -> SyntaxResult<Expression> {
        let mut segments: Vec<(String, SourceSpan)> = Vec::new();
        loop {
            let (token, span) = self.cursor.next_token();
            let segment = match token {
                ExprToken::Id(id) => id,
                ExprToken::Number(_) if !segments.is_empty() => self.source.text()[span.start..span.end].to_string(),
                other => {
                    return Err(self.parse_error(
                        format!("expected a path segment, found {}", other.describe()),
                        span,
                    ))
                }
            };
            segments.push((segment, span));

            let mut lookahead = self.cursor;
            let before = lookahead.offset();
            if matches!(lookahead.peek(), Some('.') | Some('/')) {
                if let (ExprToken::Sep(_), _) = lookahead.next_token() {
                    if lookahead.offset() == before + 1 {
                        self.cursor = lookahead;
                        continue;
                    }
                }
            }
            break;
        }

        let loc = self.cursor.span_from(start);
        let original = &self.source.text()[loc.start..loc.end];
        self.build_path(original, segments, data, loc)
    }

    fn build_path(
        &self,
        original: &str,
        segments: Vec<(String, SourceSpan)>,
        data: bool,
        loc: SourceSpan,
    ) -> SyntaxResult<Expression> {
        if original.contains('/') {
            if original.starts_with("./") {
                return Err(self.error(SyntaxErrorCode::HbsInvalidDotSlash, loc));
            }
            if original.starts_with("../") {
                return Err(self.error(SyntaxErrorCode::HbsInvalidDotDot, loc));
            }
            if original.contains('.') {
                return Err(self.error(SyntaxErrorCode::HbsInvalidSlash, loc));
            }
        }
        if segments.iter().any(|(segment, _)| segment == "..") {
            return Err(self.error(SyntaxErrorCode::HbsInvalidDotDot, loc));
        }

        let (head_name, head_span) = segments[0].clone();
        let slash_path = original.contains('/');

        if data {
            let name = if slash_path {
                original.to_string()
            } else {
                format!("@{head_name}")
            };
            let tail = if slash_path { Vec::new() } else { tail_names(&segments) };
            return Ok(Expression::Path(PathExpression {
                head: PathHead::At(AtHead {
                    name,
                    loc: head_span.with_start(loc.start),
                }),
                tail,
                loc,
            }));
        }

        if head_name == "this" || head_name == "." {
            if segments[1..].iter().any(|(segment, _)| segment == "this") {
                return Err(self.parse_error(format!("invalid path: {original}"), loc));
            }
            return Ok(Expression::Path(PathExpression {
                head: PathHead::This(head_span),
                tail: tail_names(&segments),
                loc,
            }));
        }

        if segments[1..].iter().any(|(segment, _)| segment == "this" || segment == ".") {
            return Err(self.parse_error(format!("invalid path: {original}"), loc));
        }

        let (name, tail) = if slash_path {
            (original.to_string(), Vec::new())
        } else {
            (head_name, tail_names(&segments))
        };
        Ok(Expression::Path(PathExpression {
            head: PathHead::Var(VarHead {
                name,
                local: false,
                loc: if slash_path { loc } else { head_span },
            }),
            tail,
            loc,
        }))
    }
}

fn tail_names(segments: &[(String, SourceSpan)]) -> Vec<String> {
    segments[1..].iter().map(|(segment, _)| segment.clone()).collect()
}

/// The name a block is closed with: the path as written, or the literal.
fn expression_name(expression: &Expression) -> String {
    match expression {
        Expression::Path(path) => path.original(),
        Expression::Literal(literal) => match &literal.value {
            LiteralValue::String(value) => value.clone(),
            other => format!("{other:?}"),
        },
        Expression::SubExpression(_) => "(subexpression)".to_string(),
    }
}

fn push_content(body: &mut Vec<HbsStatement>, value: &str, start: usize, end: usize) {
    if value.is_empty() {
        return;
    }
    body.push(HbsStatement::Content(Content {
        value: value.to_string(),
        original: value.to_string(),
        value_start: start,
        loc: SourceSpan::new(start, end),
        left_stripped: false,
        right_stripped: false,
    }));
}

/// Where the text of an escaped `\{{` ends: just before the next `{{` (or the
/// backslashes escaping it), or at the end of input.
fn escaped_content_end(input: &str, open: usize) -> usize {
    let search_from = (open + 2).min(input.len());
    match input[search_from..].find("{{") {
        None => input.len(),
        Some(index) => {
            let mut end = search_from + index;
            let bytes = input.as_bytes();
            if end > search_from && bytes[end - 1] == b'\\' {
                end -= 1;
                if end > search_from && bytes[end - 1] == b'\\' {
                    end -= 1;
                }
            }
            end
        }
    }
}

/// Finds the end of a comment body. Returns `(value_len, close_len, strip)`
/// where `close_len` covers `--}}`/`}}` and an optional `~`.
fn find_comment_end(rest: &str, long: bool) -> Option<(usize, usize, bool)> {
    if long {
        let index = rest.find("--}}").map(|i| (i, false));
        let stripped = rest.find("--~}}").map(|i| (i, true));
        match (index, stripped) {
            (Some((a, _)), Some((b, _))) if b < a => Some((b, 5, true)),
            (Some((a, _)), _) => Some((a, 4, false)),
            (None, Some((b, _))) => Some((b, 5, true)),
            (None, None) => None,
        }
    } else {
        let index = rest.find("}}")?;
        if index > 0 && rest.as_bytes()[index - 1] == b'~' {
            Some((index - 1, 3, true))
        } else {
            Some((index, 2, false))
        }
    }
}
