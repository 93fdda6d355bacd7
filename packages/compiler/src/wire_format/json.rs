//! JSON codec for the wire format.
//!
//! Every opcode is an array whose first element is the opcode number.
//! Literals are plain JSON values, `null` stands for an absent optional slot
//! unless the slot is trailing (then it is left out), and interned
//! tag/attribute names are written as their table index.

use serde_json::{json, Number, Value};
use thiserror::Error;

use super::format::*;
use super::names::{deflate_attr_name, deflate_tag_name, inflate_attr_name, inflate_tag_name, Deflated};
use super::opcodes::Op;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WireFormatError {
    #[error("invalid JSON: {0}")]
    Json(String),
    #[error("expected {expected}, found {found}")]
    Expected { expected: &'static str, found: String },
    #[error("unknown opcode {0}")]
    UnknownOpcode(u64),
    #[error("opcode {op:?} is not valid as {context}")]
    UnexpectedOpcode { op: Op, context: &'static str },
    #[error("no interned {kind} name at index {index}")]
    UnknownName { kind: &'static str, index: u64 },
    #[error("{table} {index} is out of range")]
    OutOfRange { table: &'static str, index: u32 },
}

pub type WireResult<T> = Result<T, WireFormatError>;

impl SerializedTemplateBlock {
    pub fn to_json(&self) -> Value {
        json!([
            statements_to_json(&self.statements),
            self.symbols,
            self.has_eval,
            self.upvars,
        ])
    }

    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    pub fn from_json(value: &Value) -> WireResult<Self> {
        let items = array(value, "a serialized template block")?;
        let [statements, symbols, has_eval, upvars] = items.as_slice() else {
            return Err(expected("a four element template block", value));
        };
        let block = SerializedTemplateBlock {
            statements: decode_statements(statements)?,
            symbols: strings(symbols, "the symbol table")?,
            has_eval: has_eval
                .as_bool()
                .ok_or_else(|| expected("a boolean hasEval flag", has_eval))?,
            upvars: strings(upvars, "the upvar table")?,
        };
        block.validate()?;
        Ok(block)
    }

    pub fn from_json_str(text: &str) -> WireResult<Self> {
        let value: Value = serde_json::from_str(text).map_err(|err| WireFormatError::Json(err.to_string()))?;
        Self::from_json(&value)
    }
}

// Encoding

fn statements_to_json(statements: &[Statement]) -> Value {
    Value::Array(statements.iter().map(statement_to_json).collect())
}

fn op(op: Op) -> Value {
    Value::from(op.code())
}

fn deflated(name: Deflated<'_>) -> Value {
    match name {
        Deflated::Index(index) => Value::from(index),
        Deflated::Name(name) => Value::from(name),
    }
}

fn optional<T>(value: Option<&T>, f: impl FnOnce(&T) -> Value) -> Value {
    value.map_or(Value::Null, f)
}

fn statement_to_json(statement: &Statement) -> Value {
    match statement {
        Statement::Append { value, trusting } => {
            let code = if *trusting { Op::TrustingAppend } else { Op::Append };
            json!([op(code), expr_to_json(value)])
        }
        Statement::Comment(text) => json!([op(Op::Comment), text]),
        Statement::Block {
            callee,
            params,
            hash,
            blocks,
        } => json!([
            op(Op::Block),
            expr_to_json(callee),
            params_to_json(params),
            optional(hash.as_ref(), hash_to_json),
            optional(blocks.as_ref(), blocks_to_json),
        ]),
        Statement::Component {
            tag,
            attrs,
            args,
            blocks,
        } => json!([
            op(Op::Component),
            expr_to_json(tag),
            optional(attrs.as_ref(), |attrs| Value::Array(attrs.iter().map(param_to_json).collect())),
            optional(args.as_ref(), hash_to_json),
            optional(blocks.as_ref(), blocks_to_json),
        ]),
        Statement::OpenElement { tag, splat } => {
            let code = if *splat { Op::OpenElementWithSplat } else { Op::OpenElement };
            json!([op(code), deflated(deflate_tag_name(tag))])
        }
        Statement::Parameter(param) => param_to_json(param),
        Statement::FlushElement => json!([op(Op::FlushElement)]),
        Statement::CloseElement => json!([op(Op::CloseElement)]),
        Statement::Yield { to, positional } => json!([op(Op::Yield), to, params_to_json(positional)]),
        Statement::Debugger { scope } => json!([op(Op::Debugger), scope]),
        Statement::If {
            condition,
            block,
            inverse,
        } => json!([
            op(Op::If),
            expr_to_json(condition),
            block_to_json(block),
            optional(inverse.as_ref(), block_to_json),
        ]),
        Statement::Each {
            value,
            key,
            block,
            inverse,
        } => json!([
            op(Op::Each),
            expr_to_json(value),
            optional(key.as_ref(), expr_to_json),
            block_to_json(block),
            optional(inverse.as_ref(), block_to_json),
        ]),
        Statement::With { value, block, inverse } => json!([
            op(Op::With),
            expr_to_json(value),
            block_to_json(block),
            optional(inverse.as_ref(), block_to_json),
        ]),
        Statement::Let { positional, block } => json!([
            op(Op::Let),
            Value::Array(positional.iter().map(expr_to_json).collect()),
            block_to_json(block),
        ]),
    }
}

fn param_to_json(param: &ElementParameter) -> Value {
    let with_namespace = |mut tuple: Vec<Value>, namespace: &Option<String>| {
        if let Some(namespace) = namespace {
            tuple.push(Value::from(namespace.as_str()));
        }
        Value::Array(tuple)
    };

    match param {
        ElementParameter::StaticAttr {
            name,
            value,
            namespace,
            component,
        } => {
            let code = if *component { Op::StaticComponentAttr } else { Op::StaticAttr };
            with_namespace(
                vec![op(code), deflated(deflate_attr_name(name)), Value::from(value.as_str())],
                namespace,
            )
        }
        ElementParameter::DynamicAttr {
            name,
            value,
            namespace,
            trusting,
            component,
        } => {
            let code = match (*component, *trusting) {
                (false, false) => Op::DynamicAttr,
                (false, true) => Op::TrustingDynamicAttr,
                (true, false) => Op::ComponentAttr,
                (true, true) => Op::TrustingComponentAttr,
            };
            with_namespace(
                vec![op(code), deflated(deflate_attr_name(name)), expr_to_json(value)],
                namespace,
            )
        }
        ElementParameter::AttrSplat { symbol } => json!([op(Op::AttrSplat), symbol]),
        ElementParameter::Modifier { callee, params, hash } => json!([
            op(Op::Modifier),
            expr_to_json(callee),
            params_to_json(params),
            optional(hash.as_ref(), hash_to_json),
        ]),
    }
}

fn number_to_json(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Value::from(value as i64)
    } else {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

fn lookup_to_json(code: Op, index: u32, tail: &[String]) -> Value {
    if tail.is_empty() {
        json!([op(code), index])
    } else {
        json!([op(code), index, tail])
    }
}

fn expr_to_json(expression: &Expression) -> Value {
    match expression {
        Expression::Primitive(Primitive::String(value)) => Value::from(value.as_str()),
        Expression::Primitive(Primitive::Number(value)) => number_to_json(*value),
        Expression::Primitive(Primitive::Boolean(value)) => Value::from(*value),
        Expression::Primitive(Primitive::Null) => Value::Null,
        Expression::Undefined => json!([op(Op::Undefined)]),
        Expression::GetSymbol { symbol, tail } => lookup_to_json(Op::GetSymbol, *symbol, tail),
        Expression::GetLexicalSymbol { upvar, tail } => lookup_to_json(Op::GetLexicalSymbol, *upvar, tail),
        Expression::GetFree { resolution, upvar } => json!([op(Op::for_free_var(*resolution)), upvar]),
        Expression::Call { callee, params, hash } => json!([
            op(Op::Call),
            expr_to_json(callee),
            params_to_json(params),
            optional(hash.as_ref(), hash_to_json),
        ]),
        Expression::Concat(parts) => json!([op(Op::Concat), Value::Array(parts.iter().map(expr_to_json).collect())]),
        Expression::HasBlock(target) => json!([op(Op::HasBlock), expr_to_json(target)]),
        Expression::HasBlockParams(target) => json!([op(Op::HasBlockParams), expr_to_json(target)]),
        Expression::IfInline {
            condition,
            truthy,
            falsy,
        } => {
            let mut tuple = vec![op(Op::IfInline), expr_to_json(condition), expr_to_json(truthy)];
            if let Some(falsy) = falsy {
                tuple.push(expr_to_json(falsy));
            }
            Value::Array(tuple)
        }
        Expression::Not(value) => json!([op(Op::Not), expr_to_json(value)]),
        Expression::Log(params) => json!([op(Op::Log), params_to_json(params)]),
    }
}

fn params_to_json(params: &Params) -> Value {
    optional(params.as_ref(), |params| Value::Array(params.iter().map(expr_to_json).collect()))
}

fn hash_to_json(hash: &Hash) -> Value {
    json!([hash.keys, Value::Array(hash.values.iter().map(expr_to_json).collect())])
}

fn blocks_to_json(blocks: &NamedBlocks) -> Value {
    json!([blocks.names, Value::Array(blocks.blocks.iter().map(block_to_json).collect())])
}

fn block_to_json(block: &SerializedInlineBlock) -> Value {
    json!([statements_to_json(&block.statements), block.parameters])
}

// Decoding

fn describe(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() > 40 {
        format!("{}...", text.chars().take(40).collect::<String>())
    } else {
        text
    }
}

fn expected(what: &'static str, value: &Value) -> WireFormatError {
    WireFormatError::Expected {
        expected: what,
        found: describe(value),
    }
}

fn array<'v>(value: &'v Value, what: &'static str) -> WireResult<&'v Vec<Value>> {
    value.as_array().ok_or_else(|| expected(what, value))
}

fn string(value: &Value, what: &'static str) -> WireResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| expected(what, value))
}

fn strings(value: &Value, what: &'static str) -> WireResult<Vec<String>> {
    array(value, what)?.iter().map(|item| string(item, what)).collect()
}

fn index(value: &Value, what: &'static str) -> WireResult<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| expected(what, value))
}

fn indices(value: &Value, what: &'static str) -> WireResult<Vec<u32>> {
    array(value, what)?.iter().map(|item| index(item, what)).collect()
}

/// An opcode tuple: the opcode and the operands after it.
struct Tuple<'v> {
    op: Op,
    operands: &'v [Value],
    whole: &'v Value,
}

impl<'v> Tuple<'v> {
    fn read(value: &'v Value) -> WireResult<Tuple<'v>> {
        let items = array(value, "an opcode tuple")?;
        let (code, operands) = items.split_first().ok_or_else(|| expected("an opcode tuple", value))?;
        let code = code.as_u64().ok_or_else(|| expected("an opcode number", code))?;
        let op = Op::from_code(code).ok_or(WireFormatError::UnknownOpcode(code))?;
        Ok(Tuple {
            op,
            operands,
            whole: value,
        })
    }

    fn get(&self, position: usize) -> WireResult<&'v Value> {
        self.operands
            .get(position)
            .ok_or_else(|| expected("another operand", self.whole))
    }

    /// An operand that may be missing or `null`.
    fn optional(&self, position: usize) -> Option<&'v Value> {
        self.operands.get(position).filter(|value| !value.is_null())
    }

    /// A trailing operand that is left out when absent, so `null` is a value.
    fn trailing(&self, position: usize) -> Option<&'v Value> {
        self.operands.get(position)
    }

    fn unexpected(&self, context: &'static str) -> WireFormatError {
        WireFormatError::UnexpectedOpcode { op: self.op, context }
    }
}

fn decode_statements(value: &Value) -> WireResult<Vec<Statement>> {
    array(value, "a statement list")?.iter().map(decode_statement).collect()
}

fn decode_statement(value: &Value) -> WireResult<Statement> {
    let tuple = Tuple::read(value)?;
    Ok(match tuple.op {
        Op::Append | Op::TrustingAppend => Statement::Append {
            value: decode_expr(tuple.get(0)?)?,
            trusting: tuple.op == Op::TrustingAppend,
        },
        Op::Comment => Statement::Comment(string(tuple.get(0)?, "comment text")?),
        Op::Block => Statement::Block {
            callee: decode_expr(tuple.get(0)?)?,
            params: decode_params(tuple.optional(1))?,
            hash: tuple.optional(2).map(decode_hash).transpose()?,
            blocks: tuple.optional(3).map(decode_blocks).transpose()?,
        },
        Op::Component => Statement::Component {
            tag: decode_expr(tuple.get(0)?)?,
            attrs: tuple
                .optional(1)
                .map(|attrs| {
                    array(attrs, "element parameters")?
                        .iter()
                        .map(|attr| decode_param(&Tuple::read(attr)?))
                        .collect::<WireResult<Vec<_>>>()
                })
                .transpose()?,
            args: tuple.optional(2).map(decode_hash).transpose()?,
            blocks: tuple.optional(3).map(decode_blocks).transpose()?,
        },
        Op::OpenElement | Op::OpenElementWithSplat => Statement::OpenElement {
            tag: inflate(tuple.get(0)?, "tag")?,
            splat: tuple.op == Op::OpenElementWithSplat,
        },
        Op::FlushElement => Statement::FlushElement,
        Op::CloseElement => Statement::CloseElement,
        Op::Yield => Statement::Yield {
            to: index(tuple.get(0)?, "a block symbol")?,
            positional: decode_params(tuple.optional(1))?,
        },
        Op::Debugger => Statement::Debugger {
            scope: indices(tuple.get(0)?, "debugger scope symbols")?,
        },
        Op::If => Statement::If {
            condition: decode_expr(tuple.get(0)?)?,
            block: decode_block(tuple.get(1)?)?,
            inverse: tuple.optional(2).map(decode_block).transpose()?,
        },
        Op::Each => Statement::Each {
            value: decode_expr(tuple.get(0)?)?,
            key: tuple.optional(1).map(decode_expr).transpose()?,
            block: decode_block(tuple.get(2)?)?,
            inverse: tuple.optional(3).map(decode_block).transpose()?,
        },
        Op::With => Statement::With {
            value: decode_expr(tuple.get(0)?)?,
            block: decode_block(tuple.get(1)?)?,
            inverse: tuple.optional(2).map(decode_block).transpose()?,
        },
        Op::Let => Statement::Let {
            positional: decode_params(Some(tuple.get(0)?))?.unwrap_or_default(),
            block: decode_block(tuple.get(1)?)?,
        },
        _ => Statement::Parameter(decode_param(&tuple)?),
    })
}

fn decode_param(tuple: &Tuple<'_>) -> WireResult<ElementParameter> {
    let namespace = |position: usize| tuple.optional(position).map(|ns| string(ns, "a namespace")).transpose();

    Ok(match tuple.op {
        Op::StaticAttr | Op::StaticComponentAttr => ElementParameter::StaticAttr {
            name: inflate(tuple.get(0)?, "attribute")?,
            value: string(tuple.get(1)?, "a static attribute value")?,
            namespace: namespace(2)?,
            component: tuple.op == Op::StaticComponentAttr,
        },
        Op::DynamicAttr | Op::TrustingDynamicAttr | Op::ComponentAttr | Op::TrustingComponentAttr => {
            ElementParameter::DynamicAttr {
                name: inflate(tuple.get(0)?, "attribute")?,
                value: decode_expr(tuple.get(1)?)?,
                namespace: namespace(2)?,
                trusting: matches!(tuple.op, Op::TrustingDynamicAttr | Op::TrustingComponentAttr),
                component: matches!(tuple.op, Op::ComponentAttr | Op::TrustingComponentAttr),
            }
        }
        Op::AttrSplat => ElementParameter::AttrSplat {
            symbol: index(tuple.get(0)?, "the attrs symbol")?,
        },
        Op::Modifier => ElementParameter::Modifier {
            callee: decode_expr(tuple.get(0)?)?,
            params: decode_params(tuple.optional(1))?,
            hash: tuple.optional(2).map(decode_hash).transpose()?,
        },
        _ => return Err(tuple.unexpected("a statement")),
    })
}

fn inflate(value: &Value, kind: &'static str) -> WireResult<String> {
    if let Some(name) = value.as_str() {
        return Ok(name.to_string());
    }
    let position = value.as_u64().ok_or_else(|| expected("a name or name index", value))?;
    let table_entry = match kind {
        "tag" => inflate_tag_name(position as usize),
        _ => inflate_attr_name(position as usize),
    };
    table_entry
        .map(str::to_string)
        .ok_or(WireFormatError::UnknownName { kind, index: position })
}

fn decode_number(value: &Number) -> WireResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| expected("a finite number", &Value::Number(value.clone())))
}

fn decode_expr(value: &Value) -> WireResult<Expression> {
    let tuple = match value {
        Value::String(text) => return Ok(Expression::string(text.clone())),
        Value::Number(number) => return Ok(Expression::Primitive(Primitive::Number(decode_number(number)?))),
        Value::Bool(flag) => return Ok(Expression::Primitive(Primitive::Boolean(*flag))),
        Value::Null => return Ok(Expression::Primitive(Primitive::Null)),
        Value::Object(_) => return Err(expected("an expression", value)),
        Value::Array(_) => Tuple::read(value)?,
    };

    let tail = |position: usize| -> WireResult<Vec<String>> {
        tuple
            .optional(position)
            .map_or(Ok(Vec::new()), |tail| strings(tail, "a property path"))
    };

    if let Some(resolution) = tuple.op.free_var_resolution() {
        return Ok(Expression::GetFree {
            resolution,
            upvar: index(tuple.get(0)?, "an upvar index")?,
        });
    }

    Ok(match tuple.op {
        Op::Undefined => Expression::Undefined,
        Op::GetSymbol => Expression::GetSymbol {
            symbol: index(tuple.get(0)?, "a symbol index")?,
            tail: tail(1)?,
        },
        Op::GetLexicalSymbol => Expression::GetLexicalSymbol {
            upvar: index(tuple.get(0)?, "a lexical index")?,
            tail: tail(1)?,
        },
        Op::Call => Expression::Call {
            callee: Box::new(decode_expr(tuple.get(0)?)?),
            params: decode_params(tuple.optional(1))?,
            hash: tuple.optional(2).map(decode_hash).transpose()?,
        },
        Op::Concat => Expression::Concat(decode_params(Some(tuple.get(0)?))?.unwrap_or_default()),
        Op::HasBlock => Expression::HasBlock(Box::new(decode_expr(tuple.get(0)?)?)),
        Op::HasBlockParams => Expression::HasBlockParams(Box::new(decode_expr(tuple.get(0)?)?)),
        Op::IfInline => Expression::IfInline {
            condition: Box::new(decode_expr(tuple.get(0)?)?),
            truthy: Box::new(decode_expr(tuple.get(1)?)?),
            falsy: tuple.trailing(2).map(decode_expr).transpose()?.map(Box::new),
        },
        Op::Not => Expression::Not(Box::new(decode_expr(tuple.get(0)?)?)),
        Op::Log => Expression::Log(decode_params(tuple.optional(0))?),
        _ => return Err(tuple.unexpected("an expression")),
    })
}

fn decode_params(value: Option<&Value>) -> WireResult<Params> {
    value
        .map(|params| array(params, "a parameter list")?.iter().map(decode_expr).collect())
        .transpose()
}

fn decode_hash(value: &Value) -> WireResult<Hash> {
    let items = array(value, "a hash")?;
    let [keys, values] = items.as_slice() else {
        return Err(expected("a [keys, values] hash", value));
    };
    let hash = Hash {
        keys: strings(keys, "hash keys")?,
        values: array(values, "hash values")?
            .iter()
            .map(decode_expr)
            .collect::<WireResult<_>>()?,
    };
    if hash.keys.len() != hash.values.len() {
        return Err(expected("as many hash values as keys", value));
    }
    Ok(hash)
}

fn decode_blocks(value: &Value) -> WireResult<NamedBlocks> {
    let items = array(value, "named blocks")?;
    let [names, blocks] = items.as_slice() else {
        return Err(expected("a [names, blocks] pair", value));
    };
    let blocks = NamedBlocks {
        names: strings(names, "block names")?,
        blocks: array(blocks, "blocks")?
            .iter()
            .map(decode_block)
            .collect::<WireResult<_>>()?,
    };
    if blocks.names.len() != blocks.blocks.len() {
        return Err(expected("as many blocks as block names", value));
    }
    Ok(blocks)
}

fn decode_block(value: &Value) -> WireResult<SerializedInlineBlock> {
    let items = array(value, "a block")?;
    let [statements, parameters] = items.as_slice() else {
        return Err(expected("a [statements, parameters] block", value));
    };
    Ok(SerializedInlineBlock {
        statements: decode_statements(statements)?,
        parameters: indices(parameters, "block parameters")?,
    })
}
