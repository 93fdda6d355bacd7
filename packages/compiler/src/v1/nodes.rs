//! AST v1: the located, unresolved tree the parser produces.
//!
//! Node shapes follow the template syntax closely so the printer can
//! regenerate source from them. Names are still plain strings here; the
//! normalizer turns them into resolved references.

use bitflags::bitflags;

use crate::source::SourceSpan;

bitflags! {
    /// `~` whitespace control markers on a mustache: `{{~` and `~}}`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StripFlags: u8 {
        const OPEN = 0b01;
        const CLOSE = 0b10;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub body: Vec<Statement>,
    pub block_params: Vec<String>,
    pub loc: SourceSpan,
}

/// The body of a block statement (`{{#x}}body{{/x}}`) or its inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub body: Vec<Statement>,
    pub params: Vec<VarHead>,
    /// Set on `{{else if}}` chains: the body holds exactly the chained block.
    pub chained: bool,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Mustache(MustacheStatement),
    Block(BlockStatement),
    Partial(PartialStatement),
    MustacheComment(MustacheCommentStatement),
    Text(TextNode),
    Element(ElementNode),
    Comment(CommentStatement),
}

impl Statement {
    pub fn loc(&self) -> SourceSpan {
        match self {
            Statement::Mustache(node) => node.loc,
            Statement::Block(node) => node.loc,
            Statement::Partial(node) => node.loc,
            Statement::MustacheComment(node) => node.loc,
            Statement::Text(node) => node.loc,
            Statement::Element(node) => node.loc,
            Statement::Comment(node) => node.loc,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Mustache(_) => "MustacheStatement",
            Statement::Block(_) => "BlockStatement",
            Statement::Partial(_) => "PartialStatement",
            Statement::MustacheComment(_) => "MustacheCommentStatement",
            Statement::Text(_) => "TextNode",
            Statement::Element(_) => "ElementNode",
            Statement::Comment(_) => "CommentStatement",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MustacheStatement {
    pub path: Expression,
    pub params: Vec<Expression>,
    pub hash: Hash,
    /// `{{{x}}}` or `{{&x}}`: the value is inserted as HTML.
    pub trusting: bool,
    pub strip: StripFlags,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub path: Expression,
    pub params: Vec<Expression>,
    pub hash: Hash,
    pub program: Block,
    pub inverse: Option<Block>,
    pub open_strip: StripFlags,
    pub inverse_strip: StripFlags,
    pub close_strip: StripFlags,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementModifierStatement {
    pub path: Expression,
    pub params: Vec<Expression>,
    pub hash: Hash,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartialStatement {
    pub name: String,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentStatement {
    pub value: String,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MustacheCommentStatement {
    pub value: String,
    /// Written as `{{!-- --}}` rather than `{{! }}`.
    pub long: bool,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub chars: String,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub tag: String,
    pub self_closing: bool,
    pub attributes: Vec<AttrNode>,
    pub block_params: Vec<VarHead>,
    pub modifiers: Vec<ElementModifierStatement>,
    pub comments: Vec<MustacheCommentStatement>,
    pub children: Vec<Statement>,
    pub loc: SourceSpan,
    pub start_tag: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttrNode {
    pub name: String,
    pub value: AttrValue,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(TextNode),
    Mustache(MustacheStatement),
    Concat(ConcatStatement),
}

impl AttrValue {
    pub fn loc(&self) -> SourceSpan {
        match self {
            AttrValue::Text(node) => node.loc,
            AttrValue::Mustache(node) => node.loc,
            AttrValue::Concat(node) => node.loc,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConcatStatement {
    pub parts: Vec<ConcatPart>,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConcatPart {
    Text(TextNode),
    Mustache(MustacheStatement),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Path(PathExpression),
    SubExpression(SubExpression),
    Literal(Literal),
}

impl Expression {
    pub fn loc(&self) -> SourceSpan {
        match self {
            Expression::Path(node) => node.loc,
            Expression::SubExpression(node) => node.loc,
            Expression::Literal(node) => node.loc,
        }
    }

    pub fn as_path(&self) -> Option<&PathExpression> {
        match self {
            Expression::Path(path) => Some(path),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubExpression {
    pub path: Box<Expression>,
    pub params: Vec<Expression>,
    pub hash: Hash,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathExpression {
    pub head: PathHead,
    pub tail: Vec<String>,
    pub loc: SourceSpan,
}

impl PathExpression {
    /// The path as written, e.g. `this.foo.bar` or `@args.x`.
    pub fn original(&self) -> String {
        let mut original = self.head.name().to_string();
        for part in &self.tail {
            original.push('.');
            original.push_str(part);
        }
        original
    }

    /// Whether this is a bare identifier with no tail (`{{foo}}`).
    pub fn is_simple(&self) -> bool {
        self.tail.is_empty() && matches!(self.head, PathHead::Var(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathHead {
    This(SourceSpan),
    At(AtHead),
    Var(VarHead),
}

impl PathHead {
    pub fn name(&self) -> &str {
        match self {
            PathHead::This(_) => "this",
            PathHead::At(head) => &head.name,
            PathHead::Var(head) => &head.name,
        }
    }

    pub fn loc(&self) -> SourceSpan {
        match self {
            PathHead::This(loc) => *loc,
            PathHead::At(head) => head.loc,
            PathHead::Var(head) => head.loc,
        }
    }
}

/// `@name`; `name` keeps the leading `@`.
#[derive(Debug, Clone, PartialEq)]
pub struct AtHead {
    pub name: String,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarHead {
    pub name: String,
    /// Declared as a block param by an enclosing element or block.
    pub local: bool,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Boolean(bool),
    Number(f64),
    Null,
    Undefined,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hash {
    pub pairs: Vec<HashPair>,
    pub loc: SourceSpan,
}

impl Hash {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Expression> {
        self.pairs.iter().find(|pair| pair.key == key).map(|pair| &pair.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: String,
    pub value: Expression,
    pub loc: SourceSpan,
}
