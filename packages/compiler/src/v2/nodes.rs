//! AST v2: every name resolved, every local assigned a symbol slot.

use crate::source::SourceSpan;
use crate::v1::LiteralValue;

use super::resolution::FreeVarResolution;

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub body: Vec<Content>,
    pub table: ProgramSymbols,
    pub loc: SourceSpan,
}

/// The program level symbol table once normalization finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramSymbols {
    /// Slot `i + 1` holds `symbols[i]`; slot 0 is `this`.
    pub symbols: Vec<String>,
    pub upvars: Vec<String>,
    pub has_eval: bool,
    /// Embedder locals the template referenced, in first use order.
    pub used_locals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub body: Vec<Content>,
    /// Symbols allocated for the block params, in declaration order.
    pub parameters: Vec<u32>,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedBlock {
    pub name: String,
    pub block: Block,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args {
    pub positional: Vec<Expr>,
    pub named: Vec<NamedArgument>,
    pub loc: SourceSpan,
}

impl Args {
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedArgument {
    pub name: String,
    pub value: Expr,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(TextContent),
    HtmlComment(HtmlComment),
    GlimmerComment(GlimmerComment),
    Append(AppendContent),
    InvokeBlock(InvokeBlock),
    Component(InvokeComponent),
    Element(SimpleElement),
    If(IfContent),
    Each(EachContent),
    Let(LetContent),
    With(WithContent),
    Yield(YieldContent),
    Debugger(DebuggerContent),
}

impl Content {
    pub fn loc(&self) -> SourceSpan {
        match self {
            Content::Text(node) => node.loc,
            Content::HtmlComment(node) => node.loc,
            Content::GlimmerComment(node) => node.loc,
            Content::Append(node) => node.loc,
            Content::InvokeBlock(node) => node.loc,
            Content::Component(node) => node.loc,
            Content::Element(node) => node.loc,
            Content::If(node) => node.loc,
            Content::Each(node) => node.loc,
            Content::Let(node) => node.loc,
            Content::With(node) => node.loc,
            Content::Yield(node) => node.loc,
            Content::Debugger(node) => node.loc,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextContent {
    pub chars: String,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlComment {
    pub text: String,
    pub loc: SourceSpan,
}

/// `{{! }}` comments survive normalization for tooling but are not encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct GlimmerComment {
    pub text: String,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppendContent {
    pub value: Expr,
    pub trusting: bool,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvokeBlock {
    pub callee: Expr,
    pub args: Args,
    pub blocks: Vec<NamedBlock>,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvokeComponent {
    pub callee: Expr,
    pub attrs: Vec<ElementAttr>,
    pub args: Vec<NamedArgument>,
    pub modifiers: Vec<ElementModifier>,
    pub blocks: Vec<NamedBlock>,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleElement {
    pub tag: String,
    pub attrs: Vec<ElementAttr>,
    pub modifiers: Vec<ElementModifier>,
    pub body: Vec<Content>,
    pub loc: SourceSpan,
}

impl SimpleElement {
    pub fn has_splat(&self) -> bool {
        self.attrs.iter().any(|attr| matches!(attr, ElementAttr::Splat { .. }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementAttr {
    Html(HtmlAttr),
    /// `...attributes`, forwarding the `&attrs` symbol.
    Splat { symbol: u32, loc: SourceSpan },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlAttr {
    pub name: String,
    pub value: AttrValue,
    pub trusting: bool,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Static(String),
    Dynamic(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementModifier {
    pub callee: Expr,
    pub args: Args,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfContent {
    pub condition: Expr,
    pub block: Block,
    pub inverse: Option<Block>,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EachContent {
    pub value: Expr,
    pub key: Option<Expr>,
    pub block: Block,
    pub inverse: Option<Block>,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetContent {
    pub positional: Vec<Expr>,
    pub block: Block,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithContent {
    pub value: Expr,
    pub block: Block,
    pub inverse: Option<Block>,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YieldContent {
    /// Symbol of the block yielded to (`&default` unless `to=` says otherwise).
    pub to: u32,
    pub positional: Vec<Expr>,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebuggerContent {
    /// Symbols visible at the `{{debugger}}`.
    pub scope: Vec<u32>,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralExpr),
    Path(PathExpr),
    Call(CallExpr),
    Interpolate(InterpolateExpr),
    HasBlock { target: u32, loc: SourceSpan },
    HasBlockParams { target: u32, loc: SourceSpan },
    IfInline(IfInlineExpr),
    Not { value: Box<Expr>, loc: SourceSpan },
    Log { positional: Vec<Expr>, loc: SourceSpan },
}

impl Expr {
    pub fn loc(&self) -> SourceSpan {
        match self {
            Expr::Literal(node) => node.loc,
            Expr::Path(node) => node.loc,
            Expr::Call(node) => node.loc,
            Expr::Interpolate(node) => node.loc,
            Expr::HasBlock { loc, .. }
            | Expr::HasBlockParams { loc, .. }
            | Expr::Not { loc, .. }
            | Expr::Log { loc, .. } => *loc,
            Expr::IfInline(node) => node.loc,
        }
    }

    pub fn string(value: impl Into<String>, loc: SourceSpan) -> Expr {
        Expr::Literal(LiteralExpr {
            value: LiteralValue::String(value.into()),
            loc,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub value: LiteralValue,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    pub reference: VariableReference,
    pub tail: Vec<String>,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableReference {
    This,
    /// `@name`; the symbol is the program slot for `@name`.
    Arg { name: String, symbol: u32 },
    /// A block param. `depth` counts the frames between the use and the
    /// declaring frame, 0 for the innermost.
    Local { name: String, symbol: u32, depth: u32 },
    /// A name supplied by the embedder's scope.
    Lexical { name: String, upvar: u32 },
    /// A name resolved against the runtime environment.
    Free {
        name: String,
        resolution: FreeVarResolution,
        upvar: u32,
    },
}

impl VariableReference {
    pub fn name(&self) -> &str {
        match self {
            VariableReference::This => "this",
            VariableReference::Arg { name, .. }
            | VariableReference::Local { name, .. }
            | VariableReference::Lexical { name, .. }
            | VariableReference::Free { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Args,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterpolateExpr {
    pub parts: Vec<Expr>,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfInlineExpr {
    pub condition: Box<Expr>,
    pub truthy: Box<Expr>,
    pub falsy: Option<Box<Expr>>,
    pub loc: SourceSpan,
}
