//! v2 template → typed wire format.

use tracing::debug;

use super::format::*;
use super::names::attr_namespace;
use crate::v1::LiteralValue;
use crate::v2;

pub fn encode(template: &v2::Template) -> SerializedTemplateBlock {
    let statements = content_list(&template.body);
    debug!(
        statements = statements.len(),
        symbols = template.table.symbols.len(),
        upvars = template.table.upvars.len(),
        "encoded template"
    );
    SerializedTemplateBlock {
        statements,
        symbols: template.table.symbols.clone(),
        has_eval: template.table.has_eval,
        upvars: template.table.upvars.clone(),
    }
}

fn content_list(body: &[v2::Content]) -> Vec<Statement> {
    let mut out = Vec::with_capacity(body.len());
    for content in body {
        encode_content(content, &mut out);
    }
    out
}

fn encode_content(content: &v2::Content, out: &mut Vec<Statement>) {
    match content {
        v2::Content::Text(text) => out.push(Statement::Append {
            value: Expression::string(text.chars.clone()),
            trusting: false,
        }),
        v2::Content::HtmlComment(comment) => out.push(Statement::Comment(comment.text.clone())),
        v2::Content::GlimmerComment(_) => {}
        v2::Content::Append(append) => out.push(Statement::Append {
            value: expr(&append.value),
            trusting: append.trusting,
        }),
        v2::Content::InvokeBlock(block) => {
            let (params, hash) = args(&block.args);
            out.push(Statement::Block {
                callee: expr(&block.callee),
                params,
                hash,
                blocks: named_blocks(&block.blocks),
            });
        }
        v2::Content::Component(component) => {
            let mut attrs: Vec<ElementParameter> =
                component.attrs.iter().map(|attr| element_attr(attr, true)).collect();
            attrs.extend(component.modifiers.iter().map(modifier));
            out.push(Statement::Component {
                tag: expr(&component.callee),
                attrs: (!attrs.is_empty()).then_some(attrs),
                args: hash(&component.args),
                blocks: named_blocks(&component.blocks),
            });
        }
        v2::Content::Element(element) => {
            out.push(Statement::OpenElement {
                tag: element.tag.clone(),
                splat: element.has_splat(),
            });
            for attr in &element.attrs {
                out.push(Statement::Parameter(element_attr(attr, false)));
            }
            for element_modifier in &element.modifiers {
                out.push(Statement::Parameter(modifier(element_modifier)));
            }
            out.push(Statement::FlushElement);
            for child in &element.body {
                encode_content(child, out);
            }
            out.push(Statement::CloseElement);
        }
        v2::Content::If(node) => out.push(Statement::If {
            condition: expr(&node.condition),
            block: block(&node.block),
            inverse: node.inverse.as_ref().map(block),
        }),
        v2::Content::Each(node) => out.push(Statement::Each {
            value: expr(&node.value),
            key: node.key.as_ref().map(expr),
            block: block(&node.block),
            inverse: node.inverse.as_ref().map(block),
        }),
        v2::Content::With(node) => out.push(Statement::With {
            value: expr(&node.value),
            block: block(&node.block),
            inverse: node.inverse.as_ref().map(block),
        }),
        v2::Content::Let(node) => out.push(Statement::Let {
            positional: node.positional.iter().map(expr).collect(),
            block: block(&node.block),
        }),
        v2::Content::Yield(node) => out.push(Statement::Yield {
            to: node.to,
            positional: params(&node.positional),
        }),
        v2::Content::Debugger(node) => out.push(Statement::Debugger {
            scope: node.scope.clone(),
        }),
    }
}

fn block(block: &v2::Block) -> SerializedInlineBlock {
    SerializedInlineBlock {
        statements: content_list(&block.body),
        parameters: block.parameters.clone(),
    }
}

fn named_blocks(blocks: &[v2::NamedBlock]) -> Option<NamedBlocks> {
    if blocks.is_empty() {
        return None;
    }
    Some(NamedBlocks {
        names: blocks.iter().map(|named| named.name.clone()).collect(),
        blocks: blocks.iter().map(|named| block(&named.block)).collect(),
    })
}

fn element_attr(attr: &v2::ElementAttr, component: bool) -> ElementParameter {
    match attr {
        v2::ElementAttr::Splat { symbol, .. } => ElementParameter::AttrSplat { symbol: *symbol },
        v2::ElementAttr::Html(attr) => {
            let namespace = attr_namespace(&attr.name).map(str::to_string);
            match &attr.value {
                v2::AttrValue::Static(value) => ElementParameter::StaticAttr {
                    name: attr.name.clone(),
                    value: value.clone(),
                    namespace,
                    component,
                },
                v2::AttrValue::Dynamic(value) => ElementParameter::DynamicAttr {
                    name: attr.name.clone(),
                    value: expr(value),
                    namespace,
                    trusting: attr.trusting,
                    component,
                },
            }
        }
    }
}

fn modifier(modifier: &v2::ElementModifier) -> ElementParameter {
    let (params, hash) = args(&modifier.args);
    ElementParameter::Modifier {
        callee: expr(&modifier.callee),
        params,
        hash,
    }
}

fn params(positional: &[v2::Expr]) -> Params {
    (!positional.is_empty()).then(|| positional.iter().map(expr).collect())
}

fn hash(named: &[v2::NamedArgument]) -> Option<Hash> {
    if named.is_empty() {
        return None;
    }
    Some(Hash {
        keys: named.iter().map(|arg| arg.name.clone()).collect(),
        values: named.iter().map(|arg| expr(&arg.value)).collect(),
    })
}

fn args(args: &v2::Args) -> (Params, Option<Hash>) {
    (params(&args.positional), hash(&args.named))
}

fn expr(expression: &v2::Expr) -> Expression {
    match expression {
        v2::Expr::Literal(literal) => match &literal.value {
            LiteralValue::String(value) => Expression::Primitive(Primitive::String(value.clone())),
            LiteralValue::Number(value) => Expression::Primitive(Primitive::Number(*value)),
            LiteralValue::Boolean(value) => Expression::Primitive(Primitive::Boolean(*value)),
            LiteralValue::Null => Expression::Primitive(Primitive::Null),
            LiteralValue::Undefined => Expression::Undefined,
        },
        v2::Expr::Path(path) => {
            let tail = path.tail.clone();
            match &path.reference {
                v2::VariableReference::This => Expression::GetSymbol { symbol: 0, tail },
                v2::VariableReference::Arg { symbol, .. } | v2::VariableReference::Local { symbol, .. } => {
                    Expression::GetSymbol { symbol: *symbol, tail }
                }
                v2::VariableReference::Lexical { upvar, .. } => Expression::GetLexicalSymbol { upvar: *upvar, tail },
                v2::VariableReference::Free { resolution, upvar, .. } => {
                    debug_assert!(tail.is_empty(), "free variables with a tail read from `this`");
                    Expression::GetFree {
                        resolution: *resolution,
                        upvar: *upvar,
                    }
                }
            }
        }
        v2::Expr::Call(call) => {
            let (params, hash) = args(&call.args);
            Expression::Call {
                callee: Box::new(expr(&call.callee)),
                params,
                hash,
            }
        }
        v2::Expr::Interpolate(interpolate) => Expression::Concat(interpolate.parts.iter().map(expr).collect()),
        v2::Expr::HasBlock { target, .. } => Expression::HasBlock(Box::new(Expression::GetSymbol {
            symbol: *target,
            tail: Vec::new(),
        })),
        v2::Expr::HasBlockParams { target, .. } => Expression::HasBlockParams(Box::new(Expression::GetSymbol {
            symbol: *target,
            tail: Vec::new(),
        })),
        v2::Expr::IfInline(node) => Expression::IfInline {
            condition: Box::new(expr(&node.condition)),
            truthy: Box::new(expr(&node.truthy)),
            falsy: node.falsy.as_deref().map(|falsy| Box::new(expr(falsy))),
        },
        v2::Expr::Not { value, .. } => Expression::Not(Box::new(expr(value))),
        v2::Expr::Log { positional, .. } => Expression::Log(params(positional)),
    }
}
