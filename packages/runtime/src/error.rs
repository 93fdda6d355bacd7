//! Errors raised while linking or rendering a template.

use glimmer_compiler::WireFormatError;
use thiserror::Error;

/// A write the DOM facade cannot perform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("cannot insert HTML into <{tag}>: it is not an HTML element (namespace {namespace})")]
    HtmlInForeignElement { tag: String, namespace: String },
    #[error("cannot insert HTML into a {0} node")]
    HtmlInNonElement(&'static str),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("no helper named `{0}` is available")]
    UnknownHelper(String),
    #[error("no modifier named `{0}` is available")]
    UnknownModifier(String),
    #[error("`{0}` is not in the template's scope")]
    MissingLexical(String),
    #[error("`{name}` cannot be used as a {expected}")]
    InvalidLexical { name: String, expected: &'static str },
    #[error("{0} is not supported by this runtime")]
    Unsupported(&'static str),
    #[error("the template expects {expected} scope values but was given {found}")]
    ScopeMismatch { expected: usize, found: usize },
    #[error("malformed program: {0}")]
    MalformedProgram(String),
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error(transparent)]
    WireFormat(#[from] WireFormatError),
}
