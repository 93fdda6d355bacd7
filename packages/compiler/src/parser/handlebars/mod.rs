//! The handlebars layer of the parser.
//!
//! Splits template source into content and mustache statements. Content is
//! later fed through the HTML tokenizer by the tree builder; this layer never
//! looks inside it beyond finding where mustaches start.

mod parser;
mod scanner;
mod whitespace;

pub use parser::parse_handlebars;

use crate::source::SourceSpan;
use crate::v1::{Expression, Hash, StripFlags, VarHead};

#[derive(Debug, Clone)]
pub struct Program {
    pub body: Vec<HbsStatement>,
    pub block_params: Vec<VarHead>,
    pub chained: bool,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone)]
pub enum HbsStatement {
    Content(Content),
    Mustache(HbsMustache),
    Block(HbsBlock),
    Comment(HbsComment),
    Partial(HbsPartial),
}

#[derive(Debug, Clone)]
pub struct Content {
    /// Text after whitespace control.
    pub value: String,
    /// Text as written.
    pub original: String,
    /// Byte offset where `value` starts; moves forward when leading
    /// whitespace is stripped.
    pub value_start: usize,
    pub loc: SourceSpan,
    pub left_stripped: bool,
    pub right_stripped: bool,
}

#[derive(Debug, Clone)]
pub struct HbsMustache {
    pub path: Expression,
    pub params: Vec<Expression>,
    pub hash: Hash,
    pub trusting: bool,
    pub strip: StripFlags,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone)]
pub struct HbsBlock {
    pub path: Expression,
    pub params: Vec<Expression>,
    pub hash: Hash,
    pub program: Program,
    pub inverse: Option<Program>,
    pub open_strip: StripFlags,
    pub inverse_strip: StripFlags,
    pub close_strip: StripFlags,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone)]
pub struct HbsComment {
    pub value: String,
    pub long: bool,
    pub strip: StripFlags,
    pub loc: SourceSpan,
}

#[derive(Debug, Clone)]
pub struct HbsPartial {
    pub name: String,
    pub strip: StripFlags,
    pub loc: SourceSpan,
}
