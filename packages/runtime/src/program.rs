//! Links wire format statements into render nodes.
//!
//! Linking resolves every name a block uses (symbols against the current
//! [`Scope`], free variables against the [`Capabilities`], lexical upvars
//! against the template's scope values) and rebuilds element nesting from
//! the flat open/flush/close stream. Blocks are linked again each time they
//! render, with their block params bound in a fresh scope.

use std::rc::Rc;
use std::slice;

use glimmer_compiler::v2::FreeVarResolution;
use glimmer_compiler::wire_format::{
    ElementParameter, Expression, Hash, Primitive, SerializedInlineBlock, SerializedTemplateBlock, Statement,
};
use indexmap::IndexMap;
use tracing::{info, trace};

use crate::capabilities::{Capabilities, HelperArgs, HelperFn, ModifierDefinition};
use crate::error::RenderError;
use crate::nodes::{
    AppendContext, AppendResult, AttributeNode, BlockNode, BlockRender, CommentNode, DebuggerNode,
    DynamicAttributeNode, DynamicHtmlNode, DynamicTextNode, ElementNode, Evaluator, FragmentNode, HtmlNode,
    ModifierNode, RenderNode, TextNode,
};
use crate::template::ScopeValue;
use crate::value::Value;

type LinkResult<T> = Result<T, RenderError>;

/// Symbol values for one block. Slot 0 is `this`; slot `n` holds the value
/// of the template's `n`th symbol.
#[derive(Debug, Clone)]
pub struct Scope {
    slots: Rc<Vec<Value>>,
}

impl Scope {
    /// The top level scope: `this` plus named arguments (`@name`, keyed
    /// without the `@`).
    pub fn root(symbols: &[String], this: Value, args: &IndexMap<String, Value>) -> Scope {
        let mut slots = Vec::with_capacity(symbols.len() + 1);
        slots.push(this);
        slots.extend(symbols.iter().map(|symbol| match symbol.strip_prefix('@') {
            Some(name) => args.get(name).cloned().unwrap_or_default(),
            None => Value::Undefined,
        }));
        Scope { slots: Rc::new(slots) }
    }

    pub fn get(&self, symbol: u32) -> Value {
        self.slots.get(symbol as usize).cloned().unwrap_or_default()
    }

    /// A child scope with `values` bound to `symbols`; missing values bind
    /// `undefined`.
    pub fn bind(&self, symbols: &[u32], values: &[Value]) -> Scope {
        if symbols.is_empty() {
            return self.clone();
        }
        let mut slots = (*self.slots).clone();
        for (index, symbol) in symbols.iter().enumerate() {
            let symbol = *symbol as usize;
            if slots.len() <= symbol {
                slots.resize(symbol + 1, Value::Undefined);
            }
            slots[symbol] = values.get(index).cloned().unwrap_or_default();
        }
        Scope { slots: Rc::new(slots) }
    }
}

/// A decoded template block together with the values of its lexical scope.
#[derive(Debug)]
pub struct Program {
    pub(crate) block: SerializedTemplateBlock,
    pub(crate) lexical: IndexMap<String, ScopeValue>,
}

impl Program {
    pub fn new(block: SerializedTemplateBlock, lexical: IndexMap<String, ScopeValue>) -> Self {
        Program { block, lexical }
    }

    pub fn block(&self) -> &SerializedTemplateBlock {
        &self.block
    }

    fn upvar(&self, upvar: u32) -> LinkResult<&str> {
        self.block
            .upvars
            .get(upvar as usize)
            .map(String::as_str)
            .ok_or_else(|| RenderError::MalformedProgram(format!("upvar {upvar} is out of range")))
    }

    fn lexical(&self, upvar: u32) -> LinkResult<(&str, &ScopeValue)> {
        let name = self.upvar(upvar)?;
        match self.lexical.get(name) {
            Some(value) => Ok((name, value)),
            None => Err(RenderError::MissingLexical(name.to_string())),
        }
    }

    fn symbol_name(&self, symbol: u32) -> String {
        match symbol {
            0 => "this".to_string(),
            n => self
                .block
                .symbols
                .get(n as usize - 1)
                .cloned()
                .unwrap_or_else(|| format!("#{n}")),
        }
    }
}

#[derive(Clone)]
pub struct Linker {
    program: Rc<Program>,
    capabilities: Rc<Capabilities>,
}

impl Linker {
    pub fn new(program: Rc<Program>, capabilities: Rc<Capabilities>) -> Self {
        Linker { program, capabilities }
    }

    /// Links the template's top level statements.
    pub fn link_template(&self, scope: &Scope) -> LinkResult<FragmentNode> {
        self.link_statements(&self.program.block.statements, scope)
    }

    pub fn link_statements(&self, statements: &[Statement], scope: &Scope) -> LinkResult<FragmentNode> {
        let mut iter = statements.iter();
        let nodes = self.link_sequence(&mut iter, scope, None)?;
        Ok(FragmentNode::new(nodes))
    }

    /// Links statements up to the `CloseElement` of `element`, or to the end
    /// when not inside an element.
    fn link_sequence(
        &self,
        statements: &mut slice::Iter<'_, Statement>,
        scope: &Scope,
        element: Option<&str>,
    ) -> LinkResult<Vec<Box<dyn RenderNode>>> {
        let mut nodes: Vec<Box<dyn RenderNode>> = Vec::new();
        while let Some(statement) = statements.next() {
            match statement {
                Statement::CloseElement => {
                    return match element {
                        Some(_) => Ok(nodes),
                        None => Err(malformed("a close element without an open element")),
                    };
                }
                Statement::OpenElement { tag, .. } => {
                    nodes.push(Box::new(self.link_element(tag, statements, scope)?));
                }
                Statement::Parameter(_) | Statement::FlushElement => {
                    return Err(malformed("element parameters outside an open element"));
                }
                other => {
                    if let Some(node) = self.link_statement(other, scope)? {
                        nodes.push(node);
                    }
                }
            }
        }
        match element {
            Some(tag) => Err(RenderError::MalformedProgram(format!("<{tag}> is never closed"))),
            None => Ok(nodes),
        }
    }

    fn link_element(
        &self,
        tag: &str,
        statements: &mut slice::Iter<'_, Statement>,
        scope: &Scope,
    ) -> LinkResult<ElementNode> {
        let mut attributes: Vec<Box<dyn RenderNode>> = Vec::new();
        let mut modifiers = Vec::new();
        loop {
            match statements.next() {
                Some(Statement::Parameter(parameter)) => match parameter {
                    ElementParameter::StaticAttr {
                        name, value, namespace, ..
                    } => attributes.push(Box::new(AttributeNode {
                        name: name.clone(),
                        value: value.clone(),
                        namespace: namespace.clone(),
                    })),
                    ElementParameter::DynamicAttr {
                        name, value, namespace, ..
                    } => attributes.push(Box::new(DynamicAttributeNode {
                        name: name.clone(),
                        value: self.link_expression(value, scope)?,
                        namespace: namespace.clone(),
                    })),
                    ElementParameter::AttrSplat { .. } => {
                        trace!(tag, "no attributes to splat at the top level");
                    }
                    ElementParameter::Modifier { callee, params, hash } => {
                        let (name, definition) = self.modifier_callee(callee)?;
                        modifiers.push(ModifierNode {
                            name,
                            definition,
                            positional: self.link_params(params.as_deref(), scope)?,
                            named: self.link_hash(hash.as_ref(), scope)?,
                        });
                    }
                },
                Some(Statement::FlushElement) => break,
                _ => return Err(RenderError::MalformedProgram(format!("<{tag}> is missing its flush"))),
            }
        }
        let children = self.link_sequence(statements, scope, Some(tag))?;
        Ok(ElementNode {
            tag: tag.to_string(),
            attributes: FragmentNode::new(attributes),
            modifiers,
            children: FragmentNode::new(children),
        })
    }

    fn link_statement(&self, statement: &Statement, scope: &Scope) -> LinkResult<Option<Box<dyn RenderNode>>> {
        let node: Box<dyn RenderNode> = match statement {
            Statement::Append {
                value: Expression::Primitive(Primitive::String(text)),
                trusting,
            } => {
                if *trusting {
                    Box::new(HtmlNode(text.clone()))
                } else {
                    Box::new(TextNode(text.clone()))
                }
            }
            Statement::Append { value, trusting } => {
                let value = self.link_expression(value, scope)?;
                if *trusting {
                    Box::new(DynamicHtmlNode { value })
                } else {
                    Box::new(DynamicTextNode { value })
                }
            }
            Statement::Comment(text) => Box::new(CommentNode(text.clone())),
            Statement::Block { .. } => return Err(RenderError::Unsupported("block invocation")),
            Statement::Component { .. } => return Err(RenderError::Unsupported("component invocation")),
            Statement::Yield { to, .. } => {
                trace!(to, "yield without a block to yield to");
                return Ok(None);
            }
            Statement::Debugger { scope: symbols } => Box::new(DebuggerNode {
                names: symbols.iter().map(|symbol| self.program.symbol_name(*symbol)).collect(),
                values: symbols
                    .iter()
                    .map(|symbol| {
                        let value = scope.get(*symbol);
                        Rc::new(move || value.clone()) as Evaluator
                    })
                    .collect(),
            }),
            Statement::If {
                condition,
                block,
                inverse,
            } => {
                // branch on truthiness, not the raw value
                let condition = self.link_expression(condition, scope)?;
                let args: Vec<Evaluator> = vec![Rc::new(move || Value::Bool(condition().is_truthy()))];
                let (block, inverse) = (Rc::new(block.clone()), inverse.clone().map(Rc::new));
                let linker = self.clone();
                let scope = scope.clone();
                Box::new(BlockNode {
                    name: "if",
                    args,
                    render: Rc::new(move |ctx: &mut AppendContext<'_>, args: &[Value]| {
                        let truthy = matches!(args.first(), Some(Value::Bool(true)));
                        match (truthy, &inverse) {
                            (true, _) => linker.append_block(ctx, &block, &scope, &[]),
                            (false, Some(inverse)) => linker.append_block(ctx, inverse, &scope, &[]),
                            (false, None) => Ok(None),
                        }
                    }),
                })
            }
            Statement::Each {
                value, block, inverse, ..
            } => {
                let args = vec![self.link_expression(value, scope)?];
                let (block, inverse) = (Rc::new(block.clone()), inverse.clone().map(Rc::new));
                let linker = self.clone();
                let scope = scope.clone();
                let render: BlockRender = Rc::new(move |ctx: &mut AppendContext<'_>, args: &[Value]| match args.first() {
                    Some(Value::Array(items)) if !items.is_empty() => {
                        let mut nodes: Vec<Box<dyn RenderNode>> = Vec::with_capacity(items.len());
                        for (index, item) in items.iter().enumerate() {
                            let scope = scope.bind(&block.parameters, &[item.clone(), Value::from(index)]);
                            nodes.push(Box::new(linker.link_statements(&block.statements, &scope)?));
                        }
                        FragmentNode::new(nodes).append(ctx)
                    }
                    _ => match &inverse {
                        Some(inverse) => linker.append_block(ctx, inverse, &scope, &[]),
                        None => Ok(None),
                    },
                });
                Box::new(BlockNode {
                    name: "each",
                    args,
                    render,
                })
            }
            Statement::With { value, block, inverse } => {
                let args = vec![self.link_expression(value, scope)?];
                let (block, inverse) = (Rc::new(block.clone()), inverse.clone().map(Rc::new));
                let linker = self.clone();
                let scope = scope.clone();
                Box::new(BlockNode {
                    name: "with",
                    args,
                    render: Rc::new(move |ctx: &mut AppendContext<'_>, args: &[Value]| {
                        let value = args.first().cloned().unwrap_or_default();
                        if value.is_truthy() {
                            linker.append_block(ctx, &block, &scope, &[value])
                        } else if let Some(inverse) = &inverse {
                            linker.append_block(ctx, inverse, &scope, &[])
                        } else {
                            Ok(None)
                        }
                    }),
                })
            }
            Statement::Let { positional, block } => {
                let block = Rc::new(block.clone());
                let args = self.link_params(Some(positional.as_slice()), scope)?;
                let linker = self.clone();
                let scope = scope.clone();
                Box::new(BlockNode {
                    name: "let",
                    args,
                    render: Rc::new(move |ctx: &mut AppendContext<'_>, args: &[Value]| linker.append_block(ctx, &block, &scope, args)),
                })
            }
            Statement::OpenElement { .. }
            | Statement::Parameter(_)
            | Statement::FlushElement
            | Statement::CloseElement => return Err(malformed("an element statement out of place")),
        };
        Ok(Some(node))
    }

    fn append_block(
        &self,
        ctx: &mut AppendContext<'_>,
        block: &SerializedInlineBlock,
        scope: &Scope,
        values: &[Value],
    ) -> AppendResult {
        let scope = scope.bind(&block.parameters, values);
        self.link_statements(&block.statements, &scope)?.append(ctx)
    }

    fn link_params(&self, params: Option<&[Expression]>, scope: &Scope) -> LinkResult<Vec<Evaluator>> {
        params
            .unwrap_or_default()
            .iter()
            .map(|param| self.link_expression(param, scope))
            .collect()
    }

    fn link_hash(&self, hash: Option<&Hash>, scope: &Scope) -> LinkResult<Vec<(String, Evaluator)>> {
        let Some(hash) = hash else {
            return Ok(Vec::new());
        };
        hash.keys
            .iter()
            .zip(&hash.values)
            .map(|(key, value)| Ok((key.clone(), self.link_expression(value, scope)?)))
            .collect()
    }

    pub fn link_expression(&self, expression: &Expression, scope: &Scope) -> LinkResult<Evaluator> {
        Ok(match expression {
            Expression::Primitive(primitive) => constant(match primitive {
                Primitive::String(value) => Value::from(value.as_str()),
                Primitive::Number(value) => Value::Number(*value),
                Primitive::Boolean(value) => Value::Bool(*value),
                Primitive::Null => Value::Null,
            }),
            Expression::Undefined => constant(Value::Undefined),
            Expression::GetSymbol { symbol, tail } => {
                let value = scope.get(*symbol);
                path(value, tail.clone())
            }
            Expression::GetLexicalSymbol { upvar, tail } => match self.program.lexical(*upvar)? {
                (_, ScopeValue::Value(value)) => path(value.clone(), tail.clone()),
                (_, ScopeValue::Helper(definition)) if tail.is_empty() => {
                    invoke(definition.get_helper(), Vec::new(), Vec::new())
                }
                (name, _) => {
                    return Err(RenderError::InvalidLexical {
                        name: name.to_string(),
                        expected: "value",
                    })
                }
            },
            Expression::GetFree { resolution, upvar } => self.link_free_value(*resolution, *upvar, scope)?,
            Expression::Call { callee, params, hash } => invoke(
                self.helper_callee(callee)?,
                self.link_params(params.as_deref(), scope)?,
                self.link_hash(hash.as_ref(), scope)?,
            ),
            Expression::Concat(parts) => {
                let parts = self.link_params(Some(parts.as_slice()), scope)?;
                Rc::new(move || {
                    Value::from(
                        parts
                            .iter()
                            .map(|part| part().to_display_string())
                            .collect::<String>(),
                    )
                })
            }
            Expression::HasBlock(_) | Expression::HasBlockParams(_) => constant(Value::Bool(false)),
            Expression::IfInline {
                condition,
                truthy,
                falsy,
            } => {
                let condition = self.link_expression(condition, scope)?;
                let truthy = self.link_expression(truthy, scope)?;
                let falsy = falsy
                    .as_deref()
                    .map(|falsy| self.link_expression(falsy, scope))
                    .transpose()?;
                Rc::new(move || {
                    if condition().is_truthy() {
                        truthy()
                    } else {
                        falsy.as_ref().map(|falsy| falsy()).unwrap_or_default()
                    }
                })
            }
            Expression::Not(value) => {
                let value = self.link_expression(value, scope)?;
                Rc::new(move || Value::Bool(!value().is_truthy()))
            }
            Expression::Log(params) => {
                let params = self.link_params(params.as_deref(), scope)?;
                let capabilities = Rc::clone(&self.capabilities);
                Rc::new(move || {
                    let values: Vec<Value> = params.iter().map(|param| param()).collect();
                    info!(?values, "{{{{log}}}}");
                    if let Some(log) = capabilities.log() {
                        log.log(&values);
                    }
                    Value::Undefined
                })
            }
        })
    }

    /// A free variable read as a value. Helpers are invoked without
    /// arguments; resolutions with a `this` fallback read `this.name` when
    /// no helper has that name.
    fn link_free_value(&self, resolution: FreeVarResolution, upvar: u32, scope: &Scope) -> LinkResult<Evaluator> {
        let name = self.program.upvar(upvar)?;
        match resolution {
            FreeVarResolution::Component => Err(RenderError::Unsupported("component invocation")),
            FreeVarResolution::Modifier => Err(RenderError::Unsupported("a modifier used as a value")),
            _ if resolution.falls_back_to_this() => Ok(match self.capabilities.helper(name) {
                Some(helper) => invoke(helper, Vec::new(), Vec::new()),
                None => path(scope.get(0), vec![name.to_string()]),
            }),
            _ => match self.capabilities.helper(name) {
                Some(helper) => Ok(invoke(helper, Vec::new(), Vec::new())),
                None => Err(RenderError::UnknownHelper(name.to_string())),
            },
        }
    }

    fn helper_callee(&self, callee: &Expression) -> LinkResult<HelperFn> {
        match callee {
            Expression::GetFree {
                resolution: FreeVarResolution::Component,
                ..
            } => Err(RenderError::Unsupported("component invocation")),
            Expression::GetFree { upvar, .. } => {
                let name = self.program.upvar(*upvar)?;
                self.capabilities
                    .helper(name)
                    .ok_or_else(|| RenderError::UnknownHelper(name.to_string()))
            }
            Expression::GetLexicalSymbol { upvar, tail } if tail.is_empty() => match self.program.lexical(*upvar)? {
                (_, ScopeValue::Helper(definition)) => Ok(definition.get_helper()),
                (name, _) => Err(RenderError::InvalidLexical {
                    name: name.to_string(),
                    expected: "helper",
                }),
            },
            _ => Err(RenderError::Unsupported("calling a value that is not a helper")),
        }
    }

    fn modifier_callee(&self, callee: &Expression) -> LinkResult<(String, ModifierDefinition)> {
        match callee {
            Expression::GetFree { upvar, .. } => {
                let name = self.program.upvar(*upvar)?;
                match self.capabilities.modifier(name) {
                    Some(definition) => Ok((name.to_string(), definition)),
                    None => Err(RenderError::UnknownModifier(name.to_string())),
                }
            }
            Expression::GetLexicalSymbol { upvar, tail } if tail.is_empty() => match self.program.lexical(*upvar)? {
                (name, ScopeValue::Modifier(definition)) => Ok((name.to_string(), Rc::clone(definition))),
                (name, _) => Err(RenderError::InvalidLexical {
                    name: name.to_string(),
                    expected: "modifier",
                }),
            },
            _ => Err(RenderError::Unsupported("a dynamic modifier")),
        }
    }
}

fn malformed(what: &str) -> RenderError {
    RenderError::MalformedProgram(what.to_string())
}

fn constant(value: Value) -> Evaluator {
    Rc::new(move || value.clone())
}

fn path(value: Value, tail: Vec<String>) -> Evaluator {
    if tail.is_empty() {
        return constant(value);
    }
    Rc::new(move || value.get_path(&tail))
}

fn invoke(helper: HelperFn, positional: Vec<Evaluator>, named: Vec<(String, Evaluator)>) -> Evaluator {
    Rc::new(move || {
        let args = HelperArgs {
            positional: positional.iter().map(|param| param()).collect(),
            named: named.iter().map(|(key, value)| (key.clone(), value())).collect(),
        };
        helper(&args)
    })
}
