use std::sync::Arc;

use tracing::debug;

use super::traverse::traverse;
use super::visitor::NodeVisitor;
use crate::v1::Template;

/// What a plugin builder knows about the template being compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstPluginEnvironment {
    pub module_name: String,
    pub strict_mode: bool,
    pub locals: Vec<String>,
}

pub struct AstPlugin {
    pub name: String,
    pub visitor: Box<dyn NodeVisitor>,
}

impl AstPlugin {
    pub fn new(name: impl Into<String>, visitor: impl NodeVisitor + 'static) -> Self {
        AstPlugin {
            name: name.into(),
            visitor: Box::new(visitor),
        }
    }
}

/// Creates a fresh plugin for every template compiled.
pub type AstPluginBuilder = Arc<dyn Fn(&AstPluginEnvironment) -> AstPlugin + Send + Sync>;

/// Runs each plugin over `template` in order.
pub fn apply_plugins(template: &mut Template, builders: &[AstPluginBuilder], env: &AstPluginEnvironment) {
    for builder in builders {
        let mut plugin = builder(env);
        debug!(plugin = %plugin.name, module = %env.module_name, "applying AST plugin");
        traverse(template, plugin.visitor.as_mut());
    }
}
