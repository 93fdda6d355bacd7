//! Typed form of the wire format.
//!
//! Each variant corresponds to one opcode tuple. The positional JSON layout
//! only exists in [`super::json`]; everything else works with named fields.

use crate::v2::FreeVarResolution;

/// `[statements, symbols, hasEval, upvars]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SerializedTemplateBlock {
    pub statements: Vec<Statement>,
    pub symbols: Vec<String>,
    pub has_eval: bool,
    pub upvars: Vec<String>,
}

/// `[statements, parameters]`: a nested block and the symbols its block
/// params were assigned.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SerializedInlineBlock {
    pub statements: Vec<Statement>,
    pub parameters: Vec<u32>,
}

/// `[keys, values]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hash {
    pub keys: Vec<String>,
    pub values: Vec<Expression>,
}

impl Hash {
    pub fn get(&self, key: &str) -> Option<&Expression> {
        self.keys.iter().position(|k| k == key).map(|index| &self.values[index])
    }
}

/// `[names, blocks]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamedBlocks {
    pub names: Vec<String>,
    pub blocks: Vec<SerializedInlineBlock>,
}

impl NamedBlocks {
    pub fn get(&self, name: &str) -> Option<&SerializedInlineBlock> {
        self.names.iter().position(|n| n == name).map(|index| &self.blocks[index])
    }
}

pub type Params = Option<Vec<Expression>>;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Append { value: Expression, trusting: bool },
    Comment(String),
    Block {
        callee: Expression,
        params: Params,
        hash: Option<Hash>,
        blocks: Option<NamedBlocks>,
    },
    Component {
        tag: Expression,
        attrs: Option<Vec<ElementParameter>>,
        args: Option<Hash>,
        blocks: Option<NamedBlocks>,
    },
    OpenElement { tag: String, splat: bool },
    /// An attribute or modifier between `OpenElement` and `FlushElement`.
    Parameter(ElementParameter),
    FlushElement,
    CloseElement,
    Yield { to: u32, positional: Params },
    Debugger { scope: Vec<u32> },
    If {
        condition: Expression,
        block: SerializedInlineBlock,
        inverse: Option<SerializedInlineBlock>,
    },
    Each {
        value: Expression,
        key: Option<Expression>,
        block: SerializedInlineBlock,
        inverse: Option<SerializedInlineBlock>,
    },
    With {
        value: Expression,
        block: SerializedInlineBlock,
        inverse: Option<SerializedInlineBlock>,
    },
    Let { positional: Vec<Expression>, block: SerializedInlineBlock },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementParameter {
    StaticAttr {
        name: String,
        value: String,
        namespace: Option<String>,
        component: bool,
    },
    DynamicAttr {
        name: String,
        value: Expression,
        namespace: Option<String>,
        trusting: bool,
        component: bool,
    },
    AttrSplat { symbol: u32 },
    Modifier {
        callee: Expression,
        params: Params,
        hash: Option<Hash>,
    },
}

/// A literal as it appears in JSON: anything but `undefined`.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Primitive(Primitive),
    Undefined,
    /// Symbol 0 is `this`.
    GetSymbol { symbol: u32, tail: Vec<String> },
    GetLexicalSymbol { upvar: u32, tail: Vec<String> },
    GetFree { resolution: FreeVarResolution, upvar: u32 },
    Call {
        callee: Box<Expression>,
        params: Params,
        hash: Option<Hash>,
    },
    Concat(Vec<Expression>),
    HasBlock(Box<Expression>),
    HasBlockParams(Box<Expression>),
    IfInline {
        condition: Box<Expression>,
        truthy: Box<Expression>,
        falsy: Option<Box<Expression>>,
    },
    Not(Box<Expression>),
    Log(Params),
}

impl Expression {
    pub fn string(value: impl Into<String>) -> Expression {
        Expression::Primitive(Primitive::String(value.into()))
    }

    pub fn this() -> Expression {
        Expression::GetSymbol {
            symbol: 0,
            tail: Vec::new(),
        }
    }
}
