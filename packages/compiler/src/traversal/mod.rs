//! Generic traversal over the v1 AST, and the AST plugins built on it.

mod plugins;
mod traverse;
mod visitor;

pub use plugins::{apply_plugins, AstPlugin, AstPluginBuilder, AstPluginEnvironment};
pub use traverse::traverse;
pub use visitor::{NodeVisitor, VisitAction};
