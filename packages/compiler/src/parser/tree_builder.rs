//! Builds the v1 AST from the handlebars program.
//!
//! Handlebars statements are visited in order. Content is run through the
//! HTML [`Tokenizer`], whose events land in [`ParserContext`]; mustaches,
//! blocks and comments are spliced in according to the tokenizer state at
//! the point they occur.

use tracing::trace;

use super::block_params::{take_block_params, PendingAttribute};
use super::handlebars::{Content, HbsBlock, HbsComment, HbsMustache, HbsPartial, HbsStatement, Program};
use super::tags::is_void_element;
use super::tokenizer::{Tokenizer, TokenizerDelegate, TokenizerState};
use crate::assertions::{assert_balanced, existing};
use crate::source::{PreprocessMode, Source, SourceSpan};
use crate::syntax_error::{SyntaxError, SyntaxErrorCode, SyntaxResult};
use crate::v1::{
    AttrNode, AttrValue, Block, BlockStatement, CommentStatement, ConcatPart, ConcatStatement,
    ElementModifierStatement, ElementNode, Expression, Hash, MustacheCommentStatement,
    MustacheStatement, PartialStatement, PathHead, Statement, Template, TextNode,
};

/// Turns a handlebars program into a v1 template.
pub(crate) fn build_template(program: Program, source: &Source) -> SyntaxResult<Template> {
    let decode_entities = source.mode() == PreprocessMode::Precompile;
    let mut builder = TreeBuilder {
        tokenizer: Tokenizer::new(decode_entities),
        context: ParserContext::new(source),
    };

    let locals = source.options().locals.clone();
    let body = builder.visit_program(program.body, locals.clone(), program.loc)?;
    builder.context.check_tag_closed()?;

    trace!(statements = body.len(), "built template");
    Ok(Template {
        body,
        block_params: locals,
        loc: SourceSpan::new(0, source.len()),
    })
}

/// Nodes that children are appended to while they are open.
#[derive(Debug)]
enum NodeContainer {
    Program {
        body: Vec<Statement>,
    },
    Element {
        element: ElementNode,
        pushed_scope: bool,
    },
}

impl NodeContainer {
    fn children_mut(&mut self) -> &mut Vec<Statement> {
        match self {
            NodeContainer::Program { body } => body,
            NodeContainer::Element { element, .. } => &mut element.children,
        }
    }
}

/// Parser bookkeeping, pushed and popped in matching pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParserState {
    Comment,
    Text,
    Element { tag: String },
    OpenTag,
    AttrName,
    AttrValue,
}

impl ParserState {
    fn name(&self) -> &'static str {
        match self {
            ParserState::Comment => "comment",
            ParserState::Text => "text",
            ParserState::Element { .. } => "element",
            ParserState::OpenTag => "open-tag",
            ParserState::AttrName => "attr:name",
            ParserState::AttrValue => "attr:value",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Start,
    End,
}

#[derive(Debug)]
struct Tag {
    kind: TagKind,
    name: String,
    attributes: Vec<PendingAttribute>,
    modifiers: Vec<ElementModifierStatement>,
    comments: Vec<MustacheCommentStatement>,
    self_closing: bool,
    start: usize,
}

/// The node the tokenizer is currently filling in.
#[derive(Debug)]
enum CurrentNode {
    Comment(CommentStatement),
    Text(TextNode),
    Tag(Tag),
}

#[derive(Debug)]
struct CurrentAttribute {
    name: String,
    parts: Vec<ConcatPart>,
    current_part: Option<TextNode>,
    is_quoted: bool,
    is_dynamic: bool,
    start: usize,
    value_start: usize,
}

struct TreeBuilder<'s> {
    tokenizer: Tokenizer,
    context: ParserContext<'s>,
}

impl<'s> TreeBuilder<'s> {
    fn visit_program(
        &mut self,
        body: Vec<HbsStatement>,
        block_params: Vec<String>,
        loc: SourceSpan,
    ) -> SyntaxResult<Vec<Statement>> {
        let pushed_scope = !block_params.is_empty();
        if pushed_scope {
            self.context.scope.push(block_params);
        }
        self.context.push_container(NodeContainer::Program { body: Vec::new() });

        for statement in body {
            self.visit_statement(statement)?;
        }

        let body = match self.context.pop_container() {
            NodeContainer::Program { body } => body,
            NodeContainer::Element { element, .. } => {
                trace!(tag = %element.tag, block = ?loc, "element left open at the end of a block");
                return Err(self.context.error(
                    SyntaxErrorCode::ElementsUnclosedElement(element.tag.clone()),
                    element.start_tag,
                ));
            }
        };

        if pushed_scope {
            existing(self.context.scope.pop(), "a block params scope frame");
        }
        Ok(body)
    }

    fn visit_statement(&mut self, statement: HbsStatement) -> SyntaxResult<()> {
        match statement {
            HbsStatement::Content(content) => self.visit_content(content),
            HbsStatement::Mustache(mustache) => self.visit_mustache(mustache),
            HbsStatement::Block(block) => self.visit_block(block),
            HbsStatement::Comment(comment) => self.visit_comment(comment),
            HbsStatement::Partial(partial) => self.visit_partial(partial),
        }
    }

    fn visit_content(&mut self, content: Content) -> SyntaxResult<()> {
        self.tokenizer.set_offset(content.value_start);
        self.tokenizer.tokenize_part(&content.value, &mut self.context)?;
        self.tokenizer.flush_data(&mut self.context);
        Ok(())
    }

    fn visit_mustache(&mut self, raw: HbsMustache) -> SyntaxResult<()> {
        let state = self.tokenizer.state();
        if state.in_comment() {
            let text = raw.loc.slice(self.context.source).to_string();
            self.context.append_to_comment_data(&text);
            return Ok(());
        }

        let mut mustache = MustacheStatement {
            path: raw.path,
            params: raw.params,
            hash: raw.hash,
            trusting: raw.trusting,
            strip: raw.strip,
            loc: raw.loc,
        };
        self.context.mark_call_locals(&mut mustache.path, &mut mustache.params, &mut mustache.hash);

        match state {
            TokenizerState::TagOpen | TokenizerState::TagName | TokenizerState::EndTagOpen | TokenizerState::EndTagName => {
                return Err(self.context.error(SyntaxErrorCode::ElementsMustacheInTagName, mustache.loc));
            }
            TokenizerState::BeforeAttributeName => {
                self.context.add_element_modifier(mustache)?;
            }
            TokenizerState::AttributeName | TokenizerState::AfterAttributeName => {
                let offset = self.tokenizer.offset();
                self.context.begin_attribute_value(false, offset);
                self.context.finish_attribute_value(offset)?;
                self.context.add_element_modifier(mustache)?;
                self.tokenizer.transition_to(TokenizerState::BeforeAttributeName);
            }
            TokenizerState::AfterAttributeValueQuoted => {
                self.context.add_element_modifier(mustache)?;
                self.tokenizer.transition_to(TokenizerState::BeforeAttributeName);
            }
            TokenizerState::BeforeAttributeValue => {
                self.context.begin_attribute_value(false, mustache.loc.start);
                self.context.append_dynamic_attribute_value_part(mustache);
                self.tokenizer.transition_to(TokenizerState::AttributeValueUnquoted);
            }
            TokenizerState::AttributeValueDoubleQuoted
            | TokenizerState::AttributeValueSingleQuoted
            | TokenizerState::AttributeValueUnquoted => {
                self.context.append_dynamic_attribute_value_part(mustache);
            }
            _ => self.context.add_to_parent(Statement::Mustache(mustache)),
        }
        Ok(())
    }

    fn visit_block(&mut self, raw: HbsBlock) -> SyntaxResult<()> {
        let state = self.tokenizer.state();
        if state.in_comment() {
            let text = raw.loc.slice(self.context.source).to_string();
            self.context.append_to_comment_data(&text);
            return Ok(());
        }
        if state != TokenizerState::Data && state != TokenizerState::BeforeData {
            return Err(self.context.error(SyntaxErrorCode::HbsBlockInTag, raw.loc));
        }

        let HbsBlock {
            mut path,
            mut params,
            mut hash,
            program,
            inverse,
            open_strip,
            inverse_strip,
            close_strip,
            loc,
        } = raw;
        self.context.mark_call_locals(&mut path, &mut params, &mut hash);

        let program = self.visit_block_program(program)?;
        let inverse = match inverse {
            Some(inverse) => Some(self.visit_block_program(inverse)?),
            None => None,
        };

        self.context.add_to_parent(Statement::Block(BlockStatement {
            path,
            params,
            hash,
            program,
            inverse,
            open_strip,
            inverse_strip,
            close_strip,
            loc,
        }));
        Ok(())
    }

    fn visit_block_program(&mut self, program: Program) -> SyntaxResult<Block> {
        let Program {
            body,
            block_params,
            chained,
            loc,
        } = program;
        let names = block_params.iter().map(|param| param.name.clone()).collect();
        let body = self.visit_program(body, names, loc)?;
        Ok(Block {
            body,
            params: block_params,
            chained,
            loc,
        })
    }

    fn visit_comment(&mut self, raw: HbsComment) -> SyntaxResult<()> {
        let state = self.tokenizer.state();
        if state.in_comment() {
            let text = raw.loc.slice(self.context.source).to_string();
            self.context.append_to_comment_data(&text);
            return Ok(());
        }

        let comment = MustacheCommentStatement {
            value: raw.value,
            long: raw.long,
            loc: raw.loc,
        };
        match state {
            TokenizerState::BeforeAttributeName | TokenizerState::AfterAttributeName => {
                self.context.current_tag_mut().comments.push(comment);
            }
            TokenizerState::BeforeData | TokenizerState::Data => {
                self.context.add_to_parent(Statement::MustacheComment(comment));
            }
            other => {
                return Err(self.context.error(
                    SyntaxErrorCode::HbsCommentInTag(other.name().to_string()),
                    comment.loc,
                ));
            }
        }
        Ok(())
    }

    fn visit_partial(&mut self, raw: HbsPartial) -> SyntaxResult<()> {
        match self.tokenizer.state() {
            TokenizerState::BeforeData | TokenizerState::Data => {
                self.context.add_to_parent(Statement::Partial(PartialStatement {
                    name: raw.name,
                    loc: raw.loc,
                }));
                Ok(())
            }
            _ => Err(self.context.error(SyntaxErrorCode::HbsPartialUnsupported, raw.loc)),
        }
    }
}

/// Receives tokenizer events and owns everything under construction.
struct ParserContext<'s> {
    source: &'s Source,
    container_stack: Vec<NodeContainer>,
    states: Vec<ParserState>,
    current: Option<CurrentNode>,
    current_attribute: Option<CurrentAttribute>,
    /// Block param names per lexical frame, innermost last.
    scope: Vec<Vec<String>>,
    tag_open_offset: usize,
}

impl<'s> ParserContext<'s> {
    fn new(source: &'s Source) -> Self {
        ParserContext {
            source,
            container_stack: Vec::new(),
            states: Vec::new(),
            current: None,
            current_attribute: None,
            scope: Vec::new(),
            tag_open_offset: 0,
        }
    }

    fn error(&self, code: SyntaxErrorCode, span: SourceSpan) -> SyntaxError {
        SyntaxError::new(code, span, self.source)
    }

    // Containers

    fn push_container(&mut self, container: NodeContainer) {
        self.container_stack.push(container);
    }

    fn pop_container(&mut self) -> NodeContainer {
        existing(self.container_stack.pop(), "an open node container")
    }

    fn get_container(&self) -> Option<&NodeContainer> {
        self.container_stack.last()
    }

    fn add_to_parent(&mut self, statement: Statement) {
        let container = existing(self.container_stack.last_mut(), "a parent container");
        container.children_mut().push(statement);
    }

    // State stack

    fn push_state(&mut self, state: ParserState) {
        self.states.push(state);
    }

    fn pop_state(&mut self, expected: &str) -> ParserState {
        let state = existing(self.states.pop(), "a parser state");
        assert_balanced(expected, state.name());
        state
    }

    fn in_state(&self, name: &str) -> bool {
        self.states.last().is_some_and(|state| state.name() == name)
    }

    // Current node accessors

    fn current_tag_mut(&mut self) -> &mut Tag {
        match self.current.as_mut() {
            Some(CurrentNode::Tag(tag)) => tag,
            _ => panic!("BUG: expected the current node to be a tag"),
        }
    }

    fn current_attr_mut(&mut self) -> &mut CurrentAttribute {
        existing(self.current_attribute.as_mut(), "the current attribute")
    }

    fn is_local(&self, name: &str) -> bool {
        self.scope.iter().any(|frame| frame.iter().any(|local| local == name))
    }

    /// Flags variable heads that refer to block params in scope.
    fn mark_locals(&self, expression: &mut Expression) {
        match expression {
            Expression::Path(path) => {
                if let PathHead::Var(head) = &mut path.head {
                    head.local = self.is_local(&head.name);
                }
            }
            Expression::SubExpression(sexpr) => {
                self.mark_call_locals(&mut sexpr.path, &mut sexpr.params, &mut sexpr.hash);
            }
            Expression::Literal(_) => {}
        }
    }

    fn mark_call_locals(&self, path: &mut Expression, params: &mut [Expression], hash: &mut Hash) {
        self.mark_locals(path);
        for param in params.iter_mut() {
            self.mark_locals(param);
        }
        for pair in hash.pairs.iter_mut() {
            self.mark_locals(&mut pair.value);
        }
    }

    // Tags

    fn add_element_modifier(&mut self, mustache: MustacheStatement) -> SyntaxResult<()> {
        if matches!(mustache.path, Expression::Literal(_)) {
            return Err(self.error(
                SyntaxErrorCode::HbsParseError(format!(
                    "`{}` is not a valid modifier",
                    mustache.path.loc().slice(self.source)
                )),
                mustache.loc,
            ));
        }
        let loc = mustache.loc;
        let tag = self.current_tag_mut();
        if tag.kind == TagKind::End {
            return Err(self.error(SyntaxErrorCode::ElementsInvalidAttrsInEndTag, loc));
        }
        tag.modifiers.push(ElementModifierStatement {
            path: mustache.path,
            params: mustache.params,
            hash: mustache.hash,
            loc,
        });
        Ok(())
    }

    fn begin_tag(&mut self, kind: TagKind) {
        self.push_state(ParserState::OpenTag);
        self.current = Some(CurrentNode::Tag(Tag {
            kind,
            name: String::new(),
            attributes: Vec::new(),
            modifiers: Vec::new(),
            comments: Vec::new(),
            self_closing: false,
            start: self.tag_open_offset,
        }));
    }

    fn take_tag(&mut self) -> Tag {
        match self.current.take() {
            Some(CurrentNode::Tag(tag)) => tag,
            _ => panic!("BUG: expected the current node to be a tag"),
        }
    }

    fn finish_start_tag(&mut self, tag: Tag, offset: usize) -> SyntaxResult<()> {
        let Tag {
            name,
            attributes,
            modifiers,
            comments,
            self_closing,
            start,
            ..
        } = tag;

        let (attributes, block_params) = take_block_params(attributes, self.source)?;
        let start_tag = SourceSpan::new(start, offset);
        let element = ElementNode {
            tag: name.clone(),
            self_closing,
            attributes,
            block_params,
            modifiers,
            comments,
            children: Vec::new(),
            loc: start_tag,
            start_tag,
        };

        let pushed_scope = !is_void_element(&name) && !self_closing && !element.block_params.is_empty();
        if pushed_scope {
            let names = element.block_params.iter().map(|param| param.name.clone()).collect();
            self.scope.push(names);
        }

        self.push_container(NodeContainer::Element { element, pushed_scope });
        self.pop_state("open-tag");
        self.push_state(ParserState::Element { tag: name });
        Ok(())
    }

    fn finish_end_tag(&mut self, name: &str, tag_loc: SourceSpan, self_closing: bool, offset: usize) -> SyntaxResult<()> {
        if is_void_element(name) && !self_closing {
            return Err(self.error(SyntaxErrorCode::ElementsUnnecessaryEndTag(name.to_string()), tag_loc));
        }
        match self.get_container() {
            Some(NodeContainer::Element { element, .. }) => {
                if element.tag != name {
                    return Err(self.error(
                        SyntaxErrorCode::ElementsUnbalancedTags {
                            open: element.tag.clone(),
                            close: name.to_string(),
                        },
                        tag_loc,
                    ));
                }
            }
            _ => {
                return Err(self.error(SyntaxErrorCode::ElementsEndWithoutStartTag(name.to_string()), tag_loc));
            }
        }

        let NodeContainer::Element { mut element, pushed_scope } = self.pop_container() else {
            unreachable!("checked above");
        };
        element.loc = element.loc.with_end(offset);
        if pushed_scope {
            existing(self.scope.pop(), "an element scope frame");
        }

        if !self_closing {
            self.pop_state("open-tag");
        }
        let ParserState::Element { tag } = self.pop_state("element") else {
            unreachable!("pop_state checks the state name");
        };
        assert_balanced(&tag, &element.tag);

        self.add_to_parent(Statement::Element(element));
        Ok(())
    }

    /// Called once the template is fully visited: a tag left open in the
    /// tokenizer means the source ended inside it.
    fn check_tag_closed(&self) -> SyntaxResult<()> {
        match &self.current {
            Some(CurrentNode::Tag(tag)) => Err(self.error(
                SyntaxErrorCode::ElementsUnclosedElement(tag.name.clone()),
                SourceSpan::new(tag.start, self.source.len()),
            )),
            Some(CurrentNode::Comment(comment)) => Err(self.error(
                SyntaxErrorCode::HbsParseError("unclosed HTML comment".to_string()),
                comment.loc.with_end(self.source.len()),
            )),
            _ => Ok(()),
        }
    }

    // Attribute values

    fn start_text_part(&mut self) {
        self.current_attr_mut().current_part = None;
    }

    fn finalize_text_part(&mut self) {
        let attr = self.current_attr_mut();
        if let Some(part) = attr.current_part.take() {
            attr.parts.push(ConcatPart::Text(part));
        }
    }

    fn append_dynamic_attribute_value_part(&mut self, mustache: MustacheStatement) {
        self.finalize_text_part();
        let attr = self.current_attr_mut();
        attr.is_dynamic = true;
        attr.parts.push(ConcatPart::Mustache(mustache));
    }

    fn assemble_attribute_value(
        &self,
        parts: Vec<ConcatPart>,
        is_quoted: bool,
        is_dynamic: bool,
        span: SourceSpan,
    ) -> SyntaxResult<AttrValue> {
        if is_dynamic {
            if is_quoted {
                return Ok(AttrValue::Concat(assemble_concatenated_value(parts, span)));
            }
            let trailing_slash_only = parts.len() == 2
                && matches!(&parts[1], ConcatPart::Text(text) if text.chars == "/");
            if parts.len() == 1 || trailing_slash_only {
                return Ok(match parts.into_iter().next() {
                    Some(ConcatPart::Mustache(mustache)) => AttrValue::Mustache(mustache),
                    Some(ConcatPart::Text(text)) => AttrValue::Text(text),
                    None => unreachable!("length checked above"),
                });
            }
            return Err(self.error(SyntaxErrorCode::AttrsInvalidAttrValue, span));
        }

        Ok(match parts.into_iter().next() {
            Some(ConcatPart::Text(mut text)) => {
                text.loc = span;
                AttrValue::Text(text)
            }
            Some(ConcatPart::Mustache(mustache)) => AttrValue::Mustache(mustache),
            None => AttrValue::Text(TextNode {
                chars: String::new(),
                loc: span,
            }),
        })
    }
}

fn assemble_concatenated_value(parts: Vec<ConcatPart>, span: SourceSpan) -> ConcatStatement {
    let loc = match (parts.first(), parts.last()) {
        (Some(first), Some(last)) => concat_part_loc(first).extend(concat_part_loc(last)),
        _ => span,
    };
    ConcatStatement { parts, loc }
}

fn concat_part_loc(part: &ConcatPart) -> SourceSpan {
    match part {
        ConcatPart::Text(text) => text.loc,
        ConcatPart::Mustache(mustache) => mustache.loc,
    }
}

impl<'s> TokenizerDelegate for ParserContext<'s> {
    fn begin_data(&mut self, offset: usize) {
        self.current = Some(CurrentNode::Text(TextNode {
            chars: String::new(),
            loc: SourceSpan::new(offset, offset),
        }));
        self.push_state(ParserState::Text);
    }

    fn append_to_data(&mut self, text: &str) {
        if let Some(CurrentNode::Text(node)) = self.current.as_mut() {
            node.chars.push_str(text);
        }
    }

    fn finish_data(&mut self, offset: usize) {
        let Some(CurrentNode::Text(mut node)) = self.current.take() else {
            panic!("BUG: expected the current node to be text");
        };
        node.loc = node.loc.with_end(offset);
        self.add_to_parent(Statement::Text(node));
        self.pop_state("text");
    }

    fn tag_open(&mut self, offset: usize) {
        self.tag_open_offset = offset;
    }

    fn begin_start_tag(&mut self) {
        self.begin_tag(TagKind::Start);
    }

    fn begin_end_tag(&mut self) {
        self.begin_tag(TagKind::End);
    }

    fn append_to_tag_name(&mut self, ch: char) {
        self.current_tag_mut().name.push(ch);
    }

    fn mark_tag_as_self_closing(&mut self) {
        self.current_tag_mut().self_closing = true;
    }

    fn finish_tag(&mut self, offset: usize) -> SyntaxResult<()> {
        let tag = self.take_tag();
        let tag_loc = SourceSpan::new(tag.start, offset);

        match tag.kind {
            TagKind::Start => {
                if tag.name == ":" {
                    return Err(self.error(
                        SyntaxErrorCode::HbsParseError("a named block needs a name".to_string()),
                        tag_loc,
                    ));
                }
                let name = tag.name.clone();
                let closes_itself = is_void_element(&name) || tag.self_closing;
                self.finish_start_tag(tag, offset)?;
                if closes_itself {
                    self.finish_end_tag(&name, tag_loc, true, offset)?;
                }
            }
            TagKind::End => {
                self.finish_end_tag(&tag.name, tag_loc, false, offset)?;
            }
        }
        Ok(())
    }

    fn begin_attribute(&mut self, offset: usize) {
        self.current_attribute = Some(CurrentAttribute {
            name: String::new(),
            parts: Vec::new(),
            current_part: None,
            is_quoted: false,
            is_dynamic: false,
            start: offset,
            value_start: offset,
        });
        self.push_state(ParserState::AttrName);
    }

    fn append_to_attribute_name(&mut self, ch: char) {
        self.current_attr_mut().name.push(ch);
    }

    fn begin_attribute_value(&mut self, quoted: bool, offset: usize) {
        self.pop_state("attr:name");
        self.push_state(ParserState::AttrValue);
        self.start_text_part();
        let attr = self.current_attr_mut();
        attr.is_quoted = quoted;
        attr.value_start = offset;
    }

    fn append_to_attribute_value(&mut self, text: &str, start: usize, end: usize) {
        let attr = self.current_attr_mut();
        match attr.current_part.as_mut() {
            Some(part) => {
                part.chars.push_str(text);
                part.loc = part.loc.with_end(end);
            }
            None => {
                attr.current_part = Some(TextNode {
                    chars: text.to_string(),
                    loc: SourceSpan::new(start, end),
                });
            }
        }
    }

    fn finish_attribute_value(&mut self, offset: usize) -> SyntaxResult<()> {
        self.finalize_text_part();
        let CurrentAttribute {
            name,
            parts,
            is_quoted,
            is_dynamic,
            start,
            value_start,
            ..
        } = existing(self.current_attribute.take(), "the current attribute");

        let attr_loc = SourceSpan::new(start, offset);
        let value_loc = SourceSpan::new(value_start, offset);

        if self.current_tag_mut().kind == TagKind::End {
            return Err(self.error(SyntaxErrorCode::ElementsInvalidAttrsInEndTag, attr_loc));
        }

        let value = match self.assemble_attribute_value(parts, is_quoted, is_dynamic, value_loc)? {
            AttrValue::Concat(mut concat) => {
                concat.loc = value_loc;
                AttrValue::Concat(concat)
            }
            other => other,
        };
        let valueless = !attr_loc.slice(self.source).contains('=');

        self.current_tag_mut().attributes.push(PendingAttribute {
            node: AttrNode {
                name,
                value,
                loc: attr_loc,
            },
            valueless,
        });
        self.pop_state("attr:value");
        Ok(())
    }

    fn begin_comment(&mut self) {
        self.push_state(ParserState::Comment);
        self.current = Some(CurrentNode::Comment(CommentStatement {
            value: String::new(),
            loc: SourceSpan::new(self.tag_open_offset, self.tag_open_offset),
        }));
    }

    fn append_to_comment_data(&mut self, text: &str) {
        if let Some(CurrentNode::Comment(comment)) = self.current.as_mut() {
            comment.value.push_str(text);
        }
    }

    fn finish_comment(&mut self, offset: usize) {
        let Some(CurrentNode::Comment(mut comment)) = self.current.take() else {
            panic!("BUG: expected the current node to be a comment");
        };
        comment.loc = comment.loc.with_end(offset);
        self.add_to_parent(Statement::Comment(comment));
        self.pop_state("comment");
    }

    fn report_syntax_error(&mut self, code: SyntaxErrorCode, offset: usize) -> SyntaxResult<()> {
        // Quotes and `<` inside a name are kept and rejected later if the
        // name has to be an identifier.
        if self.in_state("attr:name") {
            return Ok(());
        }
        Err(self.error(code, SourceSpan::new(offset, offset)))
    }
}
