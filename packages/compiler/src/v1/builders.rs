//! Public builders for AST v1 nodes.
//!
//! Plugins and tests use these to assemble nodes without going through the
//! parser. Every node gets a synthetic span.
//!
//! ```ignore
//! use glimmer_compiler::v1::builders as b;
//! let hello = b::mustache(b::path("this.greeting"));
//! ```

use super::nodes::*;
use crate::source::SourceSpan;

fn synthetic() -> SourceSpan {
    SourceSpan::synthetic()
}

/// Builds a path from its written form: `this`, `this.a.b`, `@a.b` or `a.b`.
pub fn path(original: &str) -> Expression {
    Expression::Path(path_expression(original))
}

pub fn path_expression(original: &str) -> PathExpression {
    let mut parts = original.split('.');
    let head_name = parts.next().unwrap_or_default();
    let tail: Vec<String> = parts.map(str::to_string).collect();
    full_path(head(head_name), tail)
}

pub fn head(name: &str) -> PathHead {
    if name == "this" {
        this()
    } else if name.starts_with('@') {
        at_name(name)
    } else {
        var(name)
    }
}

pub fn full_path(head: PathHead, tail: Vec<String>) -> PathExpression {
    PathExpression {
        head,
        tail,
        loc: synthetic(),
    }
}

pub fn this() -> PathHead {
    PathHead::This(synthetic())
}

pub fn at_name(name: &str) -> PathHead {
    let name = if name.starts_with('@') {
        name.to_string()
    } else {
        format!("@{name}")
    };
    PathHead::At(AtHead {
        name,
        loc: synthetic(),
    })
}

pub fn var(name: &str) -> PathHead {
    PathHead::Var(var_head(name))
}

pub fn var_head(name: &str) -> VarHead {
    VarHead {
        name: name.to_string(),
        local: false,
        loc: synthetic(),
    }
}

pub fn mustache(path: Expression) -> MustacheStatement {
    call_mustache(path, Vec::new(), hash(Vec::new()))
}

pub fn call_mustache(path: Expression, params: Vec<Expression>, hash: Hash) -> MustacheStatement {
    MustacheStatement {
        path,
        params,
        hash,
        trusting: false,
        strip: StripFlags::empty(),
        loc: synthetic(),
    }
}

pub fn trusting_mustache(path: Expression) -> MustacheStatement {
    MustacheStatement {
        trusting: true,
        ..mustache(path)
    }
}

pub fn block(
    path: Expression,
    params: Vec<Expression>,
    hash: Hash,
    program: Block,
    inverse: Option<Block>,
) -> BlockStatement {
    BlockStatement {
        path,
        params,
        hash,
        program,
        inverse,
        open_strip: StripFlags::empty(),
        inverse_strip: StripFlags::empty(),
        close_strip: StripFlags::empty(),
        loc: synthetic(),
    }
}

pub fn block_itself(body: Vec<Statement>, params: Vec<&str>) -> Block {
    Block {
        body,
        params: params.into_iter().map(var_head).collect(),
        chained: false,
        loc: synthetic(),
    }
}

pub fn template(body: Vec<Statement>) -> Template {
    Template {
        body,
        block_params: Vec::new(),
        loc: synthetic(),
    }
}

pub fn element_modifier(path: Expression, params: Vec<Expression>, hash: Hash) -> ElementModifierStatement {
    ElementModifierStatement {
        path,
        params,
        hash,
        loc: synthetic(),
    }
}

pub fn partial(name: &str) -> PartialStatement {
    PartialStatement {
        name: name.to_string(),
        loc: synthetic(),
    }
}

pub fn comment(value: &str) -> CommentStatement {
    CommentStatement {
        value: value.to_string(),
        loc: synthetic(),
    }
}

pub fn mustache_comment(value: &str) -> MustacheCommentStatement {
    MustacheCommentStatement {
        value: value.to_string(),
        long: value.contains("}}"),
        loc: synthetic(),
    }
}

pub fn concat(parts: Vec<ConcatPart>) -> ConcatStatement {
    ConcatStatement {
        parts,
        loc: synthetic(),
    }
}

pub fn attr(name: &str, value: AttrValue) -> AttrNode {
    AttrNode {
        name: name.to_string(),
        value,
        loc: synthetic(),
    }
}

/// A static attribute: `name="value"`.
pub fn static_attr(name: &str, value: &str) -> AttrNode {
    attr(name, AttrValue::Text(text(value)))
}

pub fn text(chars: &str) -> TextNode {
    TextNode {
        chars: chars.to_string(),
        loc: synthetic(),
    }
}

pub fn sexpr(path: Expression, params: Vec<Expression>, hash: Hash) -> Expression {
    Expression::SubExpression(SubExpression {
        path: Box::new(path),
        params,
        hash,
        loc: synthetic(),
    })
}

pub fn hash(pairs: Vec<HashPair>) -> Hash {
    Hash {
        pairs,
        loc: synthetic(),
    }
}

pub fn pair(key: &str, value: Expression) -> HashPair {
    HashPair {
        key: key.to_string(),
        value,
        loc: synthetic(),
    }
}

fn literal(value: LiteralValue) -> Expression {
    Expression::Literal(Literal {
        value,
        loc: synthetic(),
    })
}

pub fn string(value: &str) -> Expression {
    literal(LiteralValue::String(value.to_string()))
}

pub fn boolean(value: bool) -> Expression {
    literal(LiteralValue::Boolean(value))
}

pub fn number(value: f64) -> Expression {
    literal(LiteralValue::Number(value))
}

pub fn null() -> Expression {
    literal(LiteralValue::Null)
}

pub fn undefined() -> Expression {
    literal(LiteralValue::Undefined)
}

/// Starts building an element: `b::element("div").attr(..).children(..).build()`.
pub fn element(tag: &str) -> BuildElement {
    BuildElement {
        node: ElementNode {
            tag: tag.to_string(),
            self_closing: false,
            attributes: Vec::new(),
            block_params: Vec::new(),
            modifiers: Vec::new(),
            comments: Vec::new(),
            children: Vec::new(),
            loc: synthetic(),
            start_tag: synthetic(),
        },
    }
}

pub struct BuildElement {
    node: ElementNode,
}

impl BuildElement {
    pub fn attr(mut self, attr: AttrNode) -> Self {
        self.node.attributes.push(attr);
        self
    }

    pub fn modifier(mut self, modifier: ElementModifierStatement) -> Self {
        self.node.modifiers.push(modifier);
        self
    }

    pub fn comment(mut self, comment: MustacheCommentStatement) -> Self {
        self.node.comments.push(comment);
        self
    }

    pub fn children(mut self, children: Vec<Statement>) -> Self {
        self.node.children = children;
        self
    }

    pub fn block_params(mut self, params: Vec<&str>) -> Self {
        self.node.block_params = params.into_iter().map(var_head).collect();
        self
    }

    pub fn self_closing(mut self) -> Self {
        self.node.self_closing = true;
        self
    }

    pub fn build(self) -> ElementNode {
        self.node
    }
}
