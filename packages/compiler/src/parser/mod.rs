//! Template source to v1 AST.
//!
//! Parsing runs in two layers: [`handlebars`] splits the source into content
//! and mustaches, then the tree builder feeds content through the HTML
//! [`tokenizer`] and assembles elements around the mustaches.

mod block_params;
mod entities;
pub mod handlebars;
mod options;
pub mod tags;
pub mod tokenizer;
mod tree_builder;

use tracing::debug;

pub use entities::decode_character_reference;
pub use options::{CustomizeComponentName, PreprocessOptions, TemplateMeta};

use crate::source::Source;
use crate::syntax_error::SyntaxResult;
use crate::traversal::{apply_plugins, AstPluginEnvironment};
use crate::v1::Template;

/// Parses `text` into a v1 template and applies the configured plugins.
pub fn preprocess(text: &str, options: &PreprocessOptions) -> SyntaxResult<Template> {
    let source = options.source_for(text);
    preprocess_source(&source, options)
}

/// Like [`preprocess`], for a [`Source`] the caller keeps to resolve spans.
pub fn preprocess_source(source: &Source, options: &PreprocessOptions) -> SyntaxResult<Template> {
    debug!(module = %source.module(), mode = ?source.mode(), "preprocessing template");
    let program = handlebars::parse_handlebars(source)?;
    let mut template = tree_builder::build_template(program, source)?;

    if !options.plugins.is_empty() {
        let env = AstPluginEnvironment {
            module_name: source.module().to_string(),
            strict_mode: source.is_strict(),
            locals: source.options().locals.clone(),
        };
        apply_plugins(&mut template, &options.plugins, &env);
    }
    Ok(template)
}
