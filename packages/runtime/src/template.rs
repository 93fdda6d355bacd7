//! Template factories, templates and render results.

use std::fmt;
use std::rc::Rc;

use glimmer_compiler::wire_format::SerializedTemplateBlock;
use glimmer_compiler::SerializedTemplateWithLazyBlock;
use indexmap::IndexMap;
use tracing::debug;

use crate::builder::{BlockHandle, Cursor, ElementBuilder};
use crate::capabilities::{HelperArgs, HelperDefinition, ModifierDefinition};
use crate::dom::NodeId;
use crate::environment::{Environment, Transaction};
use crate::error::RenderError;
use crate::nodes::{AppendContext, PollResult, RenderNode, Update, UpdateContext};
use crate::program::{Linker, Program, Scope};
use crate::value::Value;

/// A value injected into a strict mode template's lexical scope.
#[derive(Clone)]
pub enum ScopeValue {
    Value(Value),
    Helper(HelperDefinition),
    Modifier(ModifierDefinition),
}

impl ScopeValue {
    pub fn value(value: impl Into<Value>) -> Self {
        ScopeValue::Value(value.into())
    }

    pub fn helper(f: impl Fn(&HelperArgs) -> Value + 'static) -> Self {
        ScopeValue::Helper(HelperDefinition::function(f))
    }
}

impl fmt::Debug for ScopeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            ScopeValue::Helper(definition) => f.debug_tuple("Helper").field(definition).finish(),
            ScopeValue::Modifier(_) => f.write_str("Modifier"),
        }
    }
}

/// Creates [`Template`]s from a compiled block, one per set of scope
/// values.
#[derive(Debug, Clone)]
pub struct TemplateFactory {
    id: String,
    module_name: String,
    block: SerializedTemplateBlock,
    scope: Vec<String>,
}

impl TemplateFactory {
    /// Decodes the block of a precompiled template.
    pub fn new(template: &SerializedTemplateWithLazyBlock) -> Result<Self, RenderError> {
        Ok(TemplateFactory {
            id: template.id.clone(),
            module_name: template.module_name.clone(),
            block: template.block()?,
            scope: template.scope.clone(),
        })
    }

    /// A factory for an already decoded block. `scope` names the lexical
    /// values [`TemplateFactory::create`] expects, in order.
    pub fn from_block(id: impl Into<String>, block: SerializedTemplateBlock, scope: Vec<String>) -> Self {
        TemplateFactory {
            id: id.into(),
            module_name: glimmer_compiler::source::UNKNOWN_MODULE.to_string(),
            block,
            scope,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    /// Binds the template's lexical scope. `values` line up with
    /// [`TemplateFactory::scope`].
    pub fn create(&self, values: Vec<ScopeValue>) -> Result<Template, RenderError> {
        self.block.validate()?;
        if values.len() != self.scope.len() {
            return Err(RenderError::ScopeMismatch {
                expected: self.scope.len(),
                found: values.len(),
            });
        }
        let lexical: IndexMap<String, ScopeValue> = self.scope.iter().cloned().zip(values).collect();
        Ok(Template {
            id: self.id.clone(),
            module_name: self.module_name.clone(),
            program: Rc::new(Program::new(self.block.clone(), lexical)),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Template {
    id: String,
    module_name: String,
    program: Rc<Program>,
}

impl Template {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn symbols(&self) -> &[String] {
        &self.program.block().symbols
    }

    pub fn has_eval(&self) -> bool {
        self.program.block().has_eval
    }

    /// Renders as the last children of `append_to`, with `self_value` as
    /// `this`.
    pub fn render(&self, env: &Environment, self_value: Value, append_to: NodeId) -> Result<RenderResult, RenderError> {
        self.render_with_args(env, self_value, IndexMap::new(), append_to)
    }

    /// Like [`Template::render`], also binding `@name` arguments. `args`
    /// are keyed without the `@`.
    pub fn render_with_args(
        &self,
        env: &Environment,
        self_value: Value,
        args: IndexMap<String, Value>,
        append_to: NodeId,
    ) -> Result<RenderResult, RenderError> {
        debug!(id = %self.id, module = %self.module_name, "rendering template");
        let scope = Scope::root(self.symbols(), self_value, &args);
        let linker = Linker::new(Rc::clone(&self.program), Rc::clone(env.capabilities()));
        let root = linker.link_template(&scope)?;

        let mut builder = ElementBuilder::for_initial_render(Rc::clone(env.dom()), Cursor::append_to(append_to));
        let update = root.append(&mut AppendContext {
            builder: &mut builder,
            env,
        })?;
        let bounds = builder.finish();

        Ok(RenderResult {
            env: env.clone(),
            bounds,
            update,
        })
    }
}

/// What a render left in the document and how to keep it up to date.
pub struct RenderResult {
    env: Environment,
    bounds: BlockHandle,
    update: Option<Update>,
}

impl RenderResult {
    /// Brings the rendered nodes up to date with the state they read, inside
    /// a transaction. Once everything reports constant the result is never
    /// polled again.
    pub fn rerender(&mut self) -> Result<PollResult, RenderError> {
        let Some(update) = self.update.as_mut() else {
            return Ok(PollResult::Constant);
        };
        let env = &self.env;
        let result = env.transaction(|tx| update.poll(&mut UpdateContext { env, tx }))?;
        debug!(?result, "rerendered");
        if result == PollResult::Constant {
            self.update = None;
        }
        Ok(result)
    }

    pub fn first_node(&self) -> Option<NodeId> {
        self.bounds.first_node()
    }

    pub fn last_node(&self) -> Option<NodeId> {
        self.bounds.last_node()
    }

    pub fn parent_element(&self) -> NodeId {
        self.bounds.parent_element()
    }

    /// Removes the rendered nodes. Destructors run when `tx` commits.
    pub fn destroy(self, tx: &mut Transaction) {
        debug!(parent = ?self.bounds.parent_element(), "destroying render result");
        tx.schedule_all(self.bounds.teardown());
        self.bounds.clear_nodes(&**self.env.dom());
    }
}

impl fmt::Debug for RenderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderResult")
            .field("bounds", &self.bounds)
            .field("updatable", &self.update.is_some())
            .finish()
    }
}
