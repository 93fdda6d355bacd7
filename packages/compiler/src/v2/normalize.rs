//! v1 → v2: resolves every name and validates scoping rules.

use tracing::{debug, trace};

use super::nodes::*;
use super::resolution::{CallPosition, FreeVarResolution};
use super::symbols::SymbolTable;
use crate::parser::PreprocessOptions;
use crate::source::{Source, SourceSpan};
use crate::syntax_error::{SyntaxError, SyntaxErrorCode, SyntaxResult};
use crate::v1;
use crate::v1::LiteralValue;

/// Normalizes a parsed template. `source` must be the source it was parsed
/// from so that errors point at the right text.
pub fn normalize_template(
    template: &v1::Template,
    source: &Source,
    options: &PreprocessOptions,
) -> SyntaxResult<Template> {
    debug!(module = %source.module(), strict = source.is_strict(), "normalizing template");
    let mut normalizer = Normalizer {
        source,
        options,
        strict: source.is_strict(),
        table: SymbolTable::new(template.block_params.clone()),
    };
    let body = normalizer.statements(&template.body)?;
    let table = normalizer.table.finish();
    trace!(
        symbols = table.symbols.len(),
        upvars = table.upvars.len(),
        "normalized template"
    );
    Ok(Template {
        body,
        table,
        loc: template.loc,
    })
}

/// The keywords a template can use without importing them. Block params
/// and embedder locals with the same name take precedence.
const BLOCK_KEYWORDS: &[&str] = &["if", "unless", "each", "let", "with"];
const APPEND_KEYWORDS: &[&str] = &["yield", "debugger"];
const EXPR_KEYWORDS: &[&str] = &["has-block", "has-block-params", "if", "unless", "log"];

struct Normalizer<'a> {
    source: &'a Source,
    options: &'a PreprocessOptions,
    strict: bool,
    table: SymbolTable,
}

impl<'a> Normalizer<'a> {
    fn error(&self, code: SyntaxErrorCode, span: SourceSpan) -> SyntaxError {
        SyntaxError::new(code, span, self.source)
    }

    fn invalid_usage(&self, keyword: &str, reason: &str, span: SourceSpan) -> SyntaxError {
        self.error(
            SyntaxErrorCode::KeywordsInvalidUsage {
                keyword: keyword.to_string(),
                reason: reason.to_string(),
            },
            span,
        )
    }

    /// The keyword `path` names, if it names one in `keywords`.
    fn keyword<'p>(&self, path: &'p v1::Expression, keywords: &[&str]) -> Option<&'p str> {
        let v1::Expression::Path(path) = path else {
            return None;
        };
        let v1::PathHead::Var(head) = &path.head else {
            return None;
        };
        if !path.tail.is_empty()
            || self.table.lookup_local(&head.name).is_some()
            || self.table.is_embedder_local(&head.name)
        {
            return None;
        }
        keywords.contains(&head.name.as_str()).then_some(head.name.as_str())
    }

    // Content

    fn statements(&mut self, statements: &[v1::Statement]) -> SyntaxResult<Vec<Content>> {
        statements.iter().map(|statement| self.statement(statement)).collect()
    }

    fn statement(&mut self, statement: &v1::Statement) -> SyntaxResult<Content> {
        match statement {
            v1::Statement::Text(text) => Ok(Content::Text(TextContent {
                chars: text.chars.clone(),
                loc: text.loc,
            })),
            v1::Statement::Comment(comment) => Ok(Content::HtmlComment(HtmlComment {
                text: comment.value.clone(),
                loc: comment.loc,
            })),
            v1::Statement::MustacheComment(comment) => Ok(Content::GlimmerComment(GlimmerComment {
                text: comment.value.clone(),
                loc: comment.loc,
            })),
            v1::Statement::Partial(partial) => Err(self.error(SyntaxErrorCode::HbsPartialUnsupported, partial.loc)),
            v1::Statement::Mustache(mustache) => self.append(mustache),
            v1::Statement::Block(block) => self.block_statement(block),
            v1::Statement::Element(element) => self.element(element),
        }
    }

    fn append(&mut self, mustache: &v1::MustacheStatement) -> SyntaxResult<Content> {
        match self.keyword(&mustache.path, APPEND_KEYWORDS) {
            Some("yield") => return self.yield_keyword(mustache),
            Some(_) => return self.debugger_keyword(mustache),
            None => {}
        }

        let value = self.call_like(
            &mustache.path,
            &mustache.params,
            &mustache.hash,
            mustache.loc,
            CallPosition::Append,
        )?;
        Ok(Content::Append(AppendContent {
            value,
            trusting: mustache.trusting,
            loc: mustache.loc,
        }))
    }

    fn yield_keyword(&mut self, mustache: &v1::MustacheStatement) -> SyntaxResult<Content> {
        let mut to = "default".to_string();
        for pair in &mustache.hash.pairs {
            match (pair.key.as_str(), &pair.value) {
                ("to", v1::Expression::Literal(v1::Literal {
                    value: LiteralValue::String(name),
                    ..
                })) => to = block_name(name),
                ("to", _) => {
                    return Err(self.invalid_usage("yield", "`to` must be a string literal", pair.loc));
                }
                _ => {
                    return Err(self.invalid_usage("yield", "only the `to` argument is supported", pair.loc));
                }
            }
        }
        let positional = self.positional(&mustache.params)?;
        Ok(Content::Yield(YieldContent {
            to: self.table.allocate_block(&to),
            positional,
            loc: mustache.loc,
        }))
    }

    fn debugger_keyword(&mut self, mustache: &v1::MustacheStatement) -> SyntaxResult<Content> {
        if !mustache.params.is_empty() || !mustache.hash.is_empty() {
            return Err(self.invalid_usage("debugger", "it takes no arguments", mustache.loc));
        }
        self.table.set_has_eval();
        Ok(Content::Debugger(DebuggerContent {
            scope: self.table.visible_symbols(),
            loc: mustache.loc,
        }))
    }

    fn block_statement(&mut self, block: &v1::BlockStatement) -> SyntaxResult<Content> {
        if let Some(keyword) = self.keyword(&block.path, BLOCK_KEYWORDS) {
            return self.block_keyword(keyword, block);
        }

        let callee = self.callee(&block.path, CallPosition::Block, true)?;
        let args = self.args(&block.params, &block.hash, block.loc)?;
        let mut blocks = vec![NamedBlock {
            name: "default".to_string(),
            block: self.block(&block.program)?,
            loc: block.program.loc,
        }];
        if let Some(inverse) = &block.inverse {
            blocks.push(NamedBlock {
                name: "else".to_string(),
                block: self.block(inverse)?,
                loc: inverse.loc,
            });
        }
        Ok(Content::InvokeBlock(InvokeBlock {
            callee,
            args,
            blocks,
            loc: block.loc,
        }))
    }

    fn block_keyword(&mut self, keyword: &str, block: &v1::BlockStatement) -> SyntaxResult<Content> {
        let loc = block.loc;
        let inverse = |this: &mut Self| -> SyntaxResult<Option<Block>> {
            block.inverse.as_ref().map(|inverse| this.block(inverse)).transpose()
        };

        match keyword {
            "if" | "unless" => {
                if block.params.len() != 1 || !block.hash.is_empty() {
                    return Err(self.invalid_usage(keyword, "it takes exactly one positional argument", loc));
                }
                if !block.program.params.is_empty() {
                    return Err(self.invalid_usage(keyword, "it does not yield block params", loc));
                }
                let mut condition = self.expr(&block.params[0], CallPosition::Argument)?;
                if keyword == "unless" {
                    condition = Expr::Not {
                        loc: condition.loc(),
                        value: Box::new(condition),
                    };
                }
                Ok(Content::If(IfContent {
                    condition,
                    block: self.block(&block.program)?,
                    inverse: inverse(self)?,
                    loc,
                }))
            }
            "each" => {
                if block.params.len() != 1 {
                    return Err(self.invalid_usage(keyword, "it takes exactly one positional argument", loc));
                }
                let mut key = None;
                for pair in &block.hash.pairs {
                    if pair.key != "key" {
                        return Err(self.invalid_usage(keyword, "only the `key` argument is supported", pair.loc));
                    }
                    // `key=null` keys by identity, same as no key
                    key = match self.expr(&pair.value, CallPosition::Argument)? {
                        Expr::Literal(LiteralExpr { value: LiteralValue::Null, .. }) => None,
                        other => Some(other),
                    };
                }
                Ok(Content::Each(EachContent {
                    value: self.expr(&block.params[0], CallPosition::Argument)?,
                    key,
                    block: self.block(&block.program)?,
                    inverse: inverse(self)?,
                    loc,
                }))
            }
            "let" => {
                if block.params.is_empty() || !block.hash.is_empty() {
                    return Err(self.invalid_usage(keyword, "it takes positional arguments only", loc));
                }
                if block.inverse.is_some() {
                    return Err(self.invalid_usage(keyword, "it does not take an `else` block", loc));
                }
                Ok(Content::Let(LetContent {
                    positional: self.positional(&block.params)?,
                    block: self.block(&block.program)?,
                    loc,
                }))
            }
            _ => {
                if block.params.len() != 1 || !block.hash.is_empty() {
                    return Err(self.invalid_usage(keyword, "it takes exactly one positional argument", loc));
                }
                if block.program.params.len() > 1 {
                    return Err(self.invalid_usage(keyword, "it yields at most one block param", loc));
                }
                Ok(Content::With(WithContent {
                    value: self.expr(&block.params[0], CallPosition::Argument)?,
                    block: self.block(&block.program)?,
                    inverse: inverse(self)?,
                    loc,
                }))
            }
        }
    }

    fn block(&mut self, block: &v1::Block) -> SyntaxResult<Block> {
        let names: Vec<String> = block.params.iter().map(|param| param.name.clone()).collect();
        self.scoped_block(&block.body, &names, block.loc)
    }

    fn scoped_block(&mut self, body: &[v1::Statement], params: &[String], loc: SourceSpan) -> SyntaxResult<Block> {
        let parameters = self.table.push_frame(params);
        let body = self.statements(body);
        self.table.pop_frame();
        Ok(Block {
            body: body?,
            parameters,
            loc,
        })
    }

    // Elements

    fn element(&mut self, element: &v1::ElementNode) -> SyntaxResult<Content> {
        if element.tag.starts_with(':') {
            return Err(self.error(
                SyntaxErrorCode::ElementsNamedBlockOutsideComponent(element.tag[1..].to_string()),
                element.start_tag,
            ));
        }
        match self.component_callee(element)? {
            Some(callee) => self.component(element, callee),
            None => self.simple_element(element),
        }
    }

    fn tag_span(element: &v1::ElementNode) -> SourceSpan {
        let start = element.start_tag.start + 1;
        SourceSpan::new(start, start + element.tag.len())
    }

    /// Resolves the tag of an element that invokes a component.
    fn component_callee(&mut self, element: &v1::ElementNode) -> SyntaxResult<Option<Expr>> {
        let loc = Self::tag_span(element);
        let mut segments = element.tag.split('.');
        let head = segments.next().unwrap_or_default();
        let tail: Vec<String> = segments.map(str::to_string).collect();

        let reference = if head == "this" {
            VariableReference::This
        } else if head.starts_with('@') {
            VariableReference::Arg {
                name: head.to_string(),
                symbol: self.table.allocate_named(head),
            }
        } else if let Some((symbol, depth)) = self.table.lookup_local(head) {
            VariableReference::Local {
                name: head.to_string(),
                symbol,
                depth,
            }
        } else if self.table.is_embedder_local(head) {
            VariableReference::Lexical {
                name: head.to_string(),
                upvar: self.table.allocate_lexical(head),
            }
        } else if !tail.is_empty() || head.starts_with(|ch: char| ch.is_ascii_uppercase()) {
            if self.strict {
                return Err(self.error(SyntaxErrorCode::StrictModeUnresolvedVariable(head.to_string()), loc));
            }
            if !tail.is_empty() {
                let mut this_tail = vec![head.to_string()];
                this_tail.extend(tail);
                return Ok(Some(Expr::Path(PathExpr {
                    reference: VariableReference::This,
                    tail: this_tail,
                    loc,
                })));
            }
            let name = self.options.customize_component_name(head);
            VariableReference::Free {
                upvar: self.table.allocate_free(&name),
                name,
                resolution: FreeVarResolution::Component,
            }
        } else {
            return Ok(None);
        };

        Ok(Some(Expr::Path(PathExpr { reference, tail, loc })))
    }

    fn simple_element(&mut self, element: &v1::ElementNode) -> SyntaxResult<Content> {
        if !element.block_params.is_empty() {
            return Err(self.error(
                SyntaxErrorCode::BlockParamsOnSimpleElement(element.tag.clone()),
                element.start_tag,
            ));
        }

        let mut attrs = Vec::new();
        for attr in &element.attributes {
            if attr.name.starts_with('@') {
                return Err(self.error(SyntaxErrorCode::AttrsArgOnSimpleElement(attr.name.clone()), attr.loc));
            }
            attrs.push(self.element_attr(attr)?);
        }
        let modifiers = self.modifiers(&element.modifiers)?;
        let body = self.statements(&element.children)?;

        Ok(Content::Element(SimpleElement {
            tag: element.tag.clone(),
            attrs,
            modifiers,
            body,
            loc: element.loc,
        }))
    }

    fn component(&mut self, element: &v1::ElementNode, callee: Expr) -> SyntaxResult<Content> {
        let mut attrs = Vec::new();
        let mut args = Vec::new();
        for attr in &element.attributes {
            if attr.name.starts_with('@') {
                args.push(NamedArgument {
                    name: attr.name.clone(),
                    value: self.component_arg(&attr.value)?,
                    loc: attr.loc,
                });
            } else {
                attrs.push(self.element_attr(attr)?);
            }
        }
        let modifiers = self.modifiers(&element.modifiers)?;
        let blocks = self.component_blocks(element)?;

        Ok(Content::Component(InvokeComponent {
            callee,
            attrs,
            args,
            modifiers,
            blocks,
            loc: element.loc,
        }))
    }

    fn component_blocks(&mut self, element: &v1::ElementNode) -> SyntaxResult<Vec<NamedBlock>> {
        let is_named_block =
            |statement: &v1::Statement| matches!(statement, v1::Statement::Element(child) if child.tag.starts_with(':'));

        if !element.children.iter().any(is_named_block) {
            if element.children.is_empty() && element.block_params.is_empty() {
                return Ok(Vec::new());
            }
            let params: Vec<String> = element.block_params.iter().map(|param| param.name.clone()).collect();
            let loc = element.loc;
            return Ok(vec![NamedBlock {
                name: "default".to_string(),
                block: self.scoped_block(&element.children, &params, loc)?,
                loc,
            }]);
        }

        if !element.block_params.is_empty() {
            return Err(self.error(
                SyntaxErrorCode::ElementsNamedBlocksMixed(element.tag.clone()),
                element.start_tag,
            ));
        }

        let mut blocks = Vec::new();
        for child in &element.children {
            match child {
                v1::Statement::Element(named) if named.tag.starts_with(':') => {
                    let params: Vec<String> = named.block_params.iter().map(|param| param.name.clone()).collect();
                    blocks.push(NamedBlock {
                        name: block_name(&named.tag[1..]),
                        block: self.scoped_block(&named.children, &params, named.loc)?,
                        loc: named.loc,
                    });
                }
                v1::Statement::Text(text) if text.chars.trim().is_empty() => {}
                v1::Statement::MustacheComment(_) | v1::Statement::Comment(_) => {}
                other => {
                    return Err(self.error(
                        SyntaxErrorCode::ElementsNamedBlocksMixed(element.tag.clone()),
                        other.loc(),
                    ));
                }
            }
        }
        Ok(blocks)
    }

    fn element_attr(&mut self, attr: &v1::AttrNode) -> SyntaxResult<ElementAttr> {
        if attr.name == "...attributes" {
            return Ok(ElementAttr::Splat {
                symbol: self.table.allocate_block("attrs"),
                loc: attr.loc,
            });
        }
        let (value, trusting) = match &attr.value {
            v1::AttrValue::Text(text) => (AttrValue::Static(text.chars.clone()), false),
            v1::AttrValue::Mustache(mustache) => (
                AttrValue::Dynamic(self.mustache_expr(mustache, CallPosition::Attribute)?),
                mustache.trusting,
            ),
            v1::AttrValue::Concat(concat) => (AttrValue::Dynamic(self.interpolate(concat)?), false),
        };
        Ok(ElementAttr::Html(HtmlAttr {
            name: attr.name.clone(),
            value,
            trusting,
            loc: attr.loc,
        }))
    }

    fn component_arg(&mut self, value: &v1::AttrValue) -> SyntaxResult<Expr> {
        match value {
            v1::AttrValue::Text(text) => Ok(Expr::string(text.chars.clone(), text.loc)),
            v1::AttrValue::Mustache(mustache) => self.mustache_expr(mustache, CallPosition::ComponentArgument),
            v1::AttrValue::Concat(concat) => self.interpolate(concat),
        }
    }

    fn interpolate(&mut self, concat: &v1::ConcatStatement) -> SyntaxResult<Expr> {
        let parts = concat
            .parts
            .iter()
            .map(|part| match part {
                v1::ConcatPart::Text(text) => Ok(Expr::string(text.chars.clone(), text.loc)),
                v1::ConcatPart::Mustache(mustache) => self.mustache_expr(mustache, CallPosition::Attribute),
            })
            .collect::<SyntaxResult<Vec<_>>>()?;
        Ok(Expr::Interpolate(InterpolateExpr { parts, loc: concat.loc }))
    }

    fn modifiers(&mut self, modifiers: &[v1::ElementModifierStatement]) -> SyntaxResult<Vec<ElementModifier>> {
        modifiers
            .iter()
            .map(|modifier| {
                Ok(ElementModifier {
                    callee: self.callee(&modifier.path, CallPosition::Modifier, true)?,
                    args: self.args(&modifier.params, &modifier.hash, modifier.loc)?,
                    loc: modifier.loc,
                })
            })
            .collect()
    }

    // Expressions

    /// A mustache used as a value (attribute, argument or concat part).
    fn mustache_expr(&mut self, mustache: &v1::MustacheStatement, position: CallPosition) -> SyntaxResult<Expr> {
        if let Some(keyword) = self.keyword(&mustache.path, APPEND_KEYWORDS) {
            return Err(self.invalid_usage(keyword, "it can only be used as content", mustache.loc));
        }
        self.call_like(&mustache.path, &mustache.params, &mustache.hash, mustache.loc, position)
    }

    /// `path params hash` in `position`: a keyword expression, a call, or a
    /// bare reference when there are no arguments.
    fn call_like(
        &mut self,
        path: &v1::Expression,
        params: &[v1::Expression],
        hash: &v1::Hash,
        loc: SourceSpan,
        position: CallPosition,
    ) -> SyntaxResult<Expr> {
        if let Some(keyword) = self.keyword(path, EXPR_KEYWORDS) {
            return self.keyword_expr(keyword, params, hash, loc);
        }

        let has_args = !params.is_empty() || !hash.is_empty();
        if !has_args {
            return self.callee(path, position, false);
        }
        let callee = self.callee(path, position, true)?;
        Ok(Expr::Call(CallExpr {
            callee: Box::new(callee),
            args: self.args(params, hash, loc)?,
            loc,
        }))
    }

    fn keyword_expr(
        &mut self,
        keyword: &str,
        params: &[v1::Expression],
        hash: &v1::Hash,
        loc: SourceSpan,
    ) -> SyntaxResult<Expr> {
        if !hash.is_empty() {
            return Err(self.invalid_usage(keyword, "it takes positional arguments only", hash.loc));
        }
        match keyword {
            "has-block" | "has-block-params" => {
                let name = match params {
                    [] => "default".to_string(),
                    [v1::Expression::Literal(v1::Literal {
                        value: LiteralValue::String(name),
                        ..
                    })] => block_name(name),
                    _ => {
                        return Err(self.invalid_usage(keyword, "it takes an optional block name string", loc));
                    }
                };
                let target = self.table.allocate_block(&name);
                Ok(if keyword == "has-block" {
                    Expr::HasBlock { target, loc }
                } else {
                    Expr::HasBlockParams { target, loc }
                })
            }
            "if" | "unless" => {
                if params.len() < 2 || params.len() > 3 {
                    return Err(self.invalid_usage(keyword, "it takes two or three positional arguments", loc));
                }
                let mut condition = self.expr(&params[0], CallPosition::Argument)?;
                if keyword == "unless" {
                    condition = Expr::Not {
                        loc: condition.loc(),
                        value: Box::new(condition),
                    };
                }
                let truthy = self.expr(&params[1], CallPosition::Argument)?;
                let falsy = match params.get(2) {
                    Some(falsy) => Some(Box::new(self.expr(falsy, CallPosition::Argument)?)),
                    None => None,
                };
                Ok(Expr::IfInline(IfInlineExpr {
                    condition: Box::new(condition),
                    truthy: Box::new(truthy),
                    falsy,
                    loc,
                }))
            }
            _ => Ok(Expr::Log {
                positional: self.positional(params)?,
                loc,
            }),
        }
    }

    fn positional(&mut self, params: &[v1::Expression]) -> SyntaxResult<Vec<Expr>> {
        params
            .iter()
            .map(|param| self.expr(param, CallPosition::Argument))
            .collect()
    }

    fn args(&mut self, params: &[v1::Expression], hash: &v1::Hash, loc: SourceSpan) -> SyntaxResult<Args> {
        let positional = self.positional(params)?;
        let named = hash
            .pairs
            .iter()
            .map(|pair| {
                Ok(NamedArgument {
                    name: pair.key.clone(),
                    value: self.expr(&pair.value, CallPosition::Argument)?,
                    loc: pair.loc,
                })
            })
            .collect::<SyntaxResult<Vec<_>>>()?;
        Ok(Args { positional, named, loc })
    }

    fn expr(&mut self, expression: &v1::Expression, position: CallPosition) -> SyntaxResult<Expr> {
        match expression {
            v1::Expression::Literal(literal) => Ok(Expr::Literal(LiteralExpr {
                value: literal.value.clone(),
                loc: literal.loc,
            })),
            v1::Expression::Path(path) => self.path(path, position, false),
            v1::Expression::SubExpression(sexpr) => self.sub_expression(sexpr),
        }
    }

    /// `(x ...)` always invokes `x`, even without arguments.
    fn sub_expression(&mut self, sexpr: &v1::SubExpression) -> SyntaxResult<Expr> {
        if let Some(keyword) = self.keyword(&sexpr.path, EXPR_KEYWORDS) {
            return self.keyword_expr(keyword, &sexpr.params, &sexpr.hash, sexpr.loc);
        }
        let callee = self.callee(&sexpr.path, CallPosition::SubExpression, true)?;
        Ok(Expr::Call(CallExpr {
            callee: Box::new(callee),
            args: self.args(&sexpr.params, &sexpr.hash, sexpr.loc)?,
            loc: sexpr.loc,
        }))
    }

    /// The head of a call: paths resolve per `position`, anything else is an
    /// ordinary expression.
    fn callee(&mut self, expression: &v1::Expression, position: CallPosition, has_args: bool) -> SyntaxResult<Expr> {
        match expression {
            v1::Expression::Path(path) => self.path(path, position, has_args),
            other => self.expr(other, CallPosition::SubExpression),
        }
    }

    fn path(&mut self, path: &v1::PathExpression, position: CallPosition, has_args: bool) -> SyntaxResult<Expr> {
        let loc = path.loc;
        let tail = path.tail.clone();
        let reference = match &path.head {
            v1::PathHead::This(_) => VariableReference::This,
            v1::PathHead::At(head) => VariableReference::Arg {
                name: head.name.clone(),
                symbol: self.table.allocate_named(&head.name),
            },
            v1::PathHead::Var(head) => {
                let name = head.name.as_str();
                if let Some((symbol, depth)) = self.table.lookup_local(name) {
                    VariableReference::Local {
                        name: name.to_string(),
                        symbol,
                        depth,
                    }
                } else if self.table.is_embedder_local(name) {
                    VariableReference::Lexical {
                        name: name.to_string(),
                        upvar: self.table.allocate_lexical(name),
                    }
                } else if self.strict {
                    return Err(self.error(SyntaxErrorCode::StrictModeUnresolvedVariable(name.to_string()), head.loc));
                } else {
                    match position.loose_resolution(has_args) {
                        Some(resolution) if tail.is_empty() => VariableReference::Free {
                            name: name.to_string(),
                            resolution,
                            upvar: self.table.allocate_free(name),
                        },
                        _ => {
                            let mut this_tail = vec![name.to_string()];
                            this_tail.extend(tail);
                            return Ok(Expr::Path(PathExpr {
                                reference: VariableReference::This,
                                tail: this_tail,
                                loc,
                            }));
                        }
                    }
                }
            }
        };
        Ok(Expr::Path(PathExpr { reference, tail, loc }))
    }
}

/// Block names as referenced by `to=`, `has-block` and `<:name>`.
fn block_name(name: &str) -> String {
    match name {
        "inverse" => "else".to_string(),
        other => other.to_string(),
    }
}
