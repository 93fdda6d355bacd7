//! Readable rendering of a compiled template, for tests and tooling.
//!
//! Opcodes become kebab-case names and symbol/upvar indices are replaced by
//! the names they refer to.

use serde_json::{json, Map, Value};

use super::format::*;

pub struct WireFormatDebugger<'a> {
    symbols: &'a [String],
    upvars: &'a [String],
}

impl<'a> WireFormatDebugger<'a> {
    pub fn new(block: &'a SerializedTemplateBlock) -> Self {
        WireFormatDebugger {
            symbols: &block.symbols,
            upvars: &block.upvars,
        }
    }

    pub fn format(&self, block: &SerializedTemplateBlock) -> Value {
        self.statements(&block.statements)
    }

    fn symbol(&self, symbol: u32) -> Value {
        match symbol {
            0 => Value::from("this"),
            n => self
                .symbols
                .get(n as usize - 1)
                .map_or_else(|| Value::from(format!("<symbol {n}>")), |name| Value::from(name.as_str())),
        }
    }

    fn upvar(&self, upvar: u32) -> Value {
        self.upvars
            .get(upvar as usize)
            .map_or_else(|| Value::from(format!("<upvar {upvar}>")), |name| Value::from(name.as_str()))
    }

    fn statements(&self, statements: &[Statement]) -> Value {
        Value::Array(statements.iter().map(|statement| self.statement(statement)).collect())
    }

    fn statement(&self, statement: &Statement) -> Value {
        match statement {
            Statement::Append { value, trusting } => {
                let name = if *trusting { "trusting-append" } else { "append" };
                json!([name, self.expr(value)])
            }
            Statement::Comment(text) => json!(["comment", text]),
            Statement::Block {
                callee,
                params,
                hash,
                blocks,
            } => json!([
                "block",
                self.expr(callee),
                self.params(params),
                self.hash(hash.as_ref()),
                self.blocks(blocks.as_ref()),
            ]),
            Statement::Component {
                tag,
                attrs,
                args,
                blocks,
            } => json!([
                "component",
                self.expr(tag),
                attrs.as_ref().map_or(Value::Null, |attrs| {
                    Value::Array(attrs.iter().map(|attr| self.parameter(attr)).collect())
                }),
                self.hash(args.as_ref()),
                self.blocks(blocks.as_ref()),
            ]),
            Statement::OpenElement { tag, splat: false } => json!(["open-element", tag]),
            Statement::OpenElement { tag, splat: true } => json!(["open-element-with-splat", tag]),
            Statement::Parameter(param) => self.parameter(param),
            Statement::FlushElement => json!(["flush-element"]),
            Statement::CloseElement => json!(["close-element"]),
            Statement::Yield { to, positional } => json!(["yield", self.symbol(*to), self.params(positional)]),
            Statement::Debugger { scope } => json!([
                "debugger",
                Value::Array(scope.iter().map(|symbol| self.symbol(*symbol)).collect()),
            ]),
            Statement::If {
                condition,
                block,
                inverse,
            } => json!([
                "if",
                self.expr(condition),
                self.block(block),
                inverse.as_ref().map_or(Value::Null, |inverse| self.block(inverse)),
            ]),
            Statement::Each {
                value,
                key,
                block,
                inverse,
            } => json!([
                "each",
                self.expr(value),
                key.as_ref().map_or(Value::Null, |key| self.expr(key)),
                self.block(block),
                inverse.as_ref().map_or(Value::Null, |inverse| self.block(inverse)),
            ]),
            Statement::With { value, block, inverse } => json!([
                "with",
                self.expr(value),
                self.block(block),
                inverse.as_ref().map_or(Value::Null, |inverse| self.block(inverse)),
            ]),
            Statement::Let { positional, block } => json!([
                "let",
                Value::Array(positional.iter().map(|expr| self.expr(expr)).collect()),
                self.block(block),
            ]),
        }
    }

    fn parameter(&self, param: &ElementParameter) -> Value {
        match param {
            ElementParameter::StaticAttr {
                name,
                value,
                namespace,
                component,
            } => {
                let op = if *component { "static-component-attr" } else { "static-attr" };
                json!([op, name, value, namespace])
            }
            ElementParameter::DynamicAttr {
                name,
                value,
                namespace,
                trusting,
                component,
            } => {
                let op = match (*component, *trusting) {
                    (false, false) => "dynamic-attr",
                    (false, true) => "trusting-dynamic-attr",
                    (true, false) => "component-attr",
                    (true, true) => "trusting-component-attr",
                };
                json!([op, name, self.expr(value), namespace])
            }
            ElementParameter::AttrSplat { .. } => json!(["attr-splat"]),
            ElementParameter::Modifier { callee, params, hash } => json!([
                "modifier",
                self.expr(callee),
                self.params(params),
                self.hash(hash.as_ref()),
            ]),
        }
    }

    fn expr(&self, expression: &Expression) -> Value {
        match expression {
            Expression::Primitive(Primitive::String(value)) => Value::from(value.as_str()),
            Expression::Primitive(Primitive::Number(value)) => json!(value),
            Expression::Primitive(Primitive::Boolean(value)) => Value::from(*value),
            Expression::Primitive(Primitive::Null) => Value::Null,
            Expression::Undefined => json!(["undefined"]),
            Expression::GetSymbol { symbol, tail } => json!(["get-symbol", self.symbol(*symbol), tail]),
            Expression::GetLexicalSymbol { upvar, tail } => json!(["get-lexical-symbol", self.upvar(*upvar), tail]),
            Expression::GetFree { resolution, upvar } => json!([format!("{resolution:?}"), self.upvar(*upvar)]),
            Expression::Call { callee, params, hash } => json!([
                "call",
                self.expr(callee),
                self.params(params),
                self.hash(hash.as_ref()),
            ]),
            Expression::Concat(parts) => json!([
                "concat",
                Value::Array(parts.iter().map(|part| self.expr(part)).collect()),
            ]),
            Expression::HasBlock(target) => json!(["has-block", self.expr(target)]),
            Expression::HasBlockParams(target) => json!(["has-block-params", self.expr(target)]),
            Expression::IfInline {
                condition,
                truthy,
                falsy,
            } => json!([
                "if-inline",
                self.expr(condition),
                self.expr(truthy),
                falsy.as_ref().map_or(Value::Null, |falsy| self.expr(falsy)),
            ]),
            Expression::Not(value) => json!(["not", self.expr(value)]),
            Expression::Log(params) => json!(["log", self.params(params)]),
        }
    }

    fn params(&self, params: &Params) -> Value {
        params.as_ref().map_or(Value::Null, |params| {
            Value::Array(params.iter().map(|expr| self.expr(expr)).collect())
        })
    }

    fn hash(&self, hash: Option<&Hash>) -> Value {
        hash.map_or(Value::Null, |hash| {
            let map: Map<String, Value> = hash
                .keys
                .iter()
                .zip(&hash.values)
                .map(|(key, value)| (key.clone(), self.expr(value)))
                .collect();
            Value::Object(map)
        })
    }

    fn blocks(&self, blocks: Option<&NamedBlocks>) -> Value {
        blocks.map_or(Value::Null, |blocks| {
            let map: Map<String, Value> = blocks
                .names
                .iter()
                .zip(&blocks.blocks)
                .map(|(name, block)| (name.clone(), self.block(block)))
                .collect();
            Value::Object(map)
        })
    }

    fn block(&self, block: &SerializedInlineBlock) -> Value {
        json!({
            "statements": self.statements(&block.statements),
            "parameters": Value::Array(block.parameters.iter().map(|symbol| self.symbol(*symbol)).collect()),
        })
    }
}

/// Shorthand for `WireFormatDebugger::new(block).format(block)`.
pub fn debug_format(block: &SerializedTemplateBlock) -> Value {
    WireFormatDebugger::new(block).format(block)
}
