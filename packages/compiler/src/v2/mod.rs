//! AST v2: the resolved form of a template.

mod nodes;
mod normalize;
mod resolution;
mod symbols;

pub use nodes::*;
pub use normalize::normalize_template;
pub use resolution::{CallPosition, FreeVarResolution};
pub use symbols::SymbolTable;

use crate::parser::{preprocess_source, PreprocessOptions};
use crate::syntax_error::SyntaxResult;

/// Parses and normalizes `text` in one step.
pub fn normalize(text: &str, options: &PreprocessOptions) -> SyntaxResult<Template> {
    let source = options.source_for(text);
    let template = preprocess_source(&source, options)?;
    normalize_template(&template, &source, options)
}
