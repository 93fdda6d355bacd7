//! What a template can call into: helpers, modifiers, the `{{log}}` sink
//! and the `{{debugger}}` hook.
//!
//! Free variables are looked up here by name when a template is linked;
//! strict mode templates get the same kinds of values through their lexical
//! scope instead (see [`crate::ScopeValue`]).

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::dom::{DomOperations, NodeId};
use crate::value::Value;

/// Evaluated arguments of a helper or modifier invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HelperArgs {
    pub positional: Vec<Value>,
    pub named: IndexMap<String, Value>,
}

impl HelperArgs {
    pub fn positional(&self, index: usize) -> Value {
        self.positional.get(index).cloned().unwrap_or_default()
    }

    pub fn named(&self, name: &str) -> Value {
        self.named.get(name).cloned().unwrap_or_default()
    }
}

pub type HelperFn = Rc<dyn Fn(&HelperArgs) -> Value>;

/// Produces the callable for a managed helper definition.
pub trait HelperManager {
    fn get_helper(&self) -> HelperFn;
}

#[derive(Clone)]
pub enum HelperDefinition {
    /// Already callable.
    Function(HelperFn),
    Managed(Rc<dyn HelperManager>),
}

impl HelperDefinition {
    pub fn function(f: impl Fn(&HelperArgs) -> Value + 'static) -> Self {
        HelperDefinition::Function(Rc::new(f))
    }

    pub fn get_helper(&self) -> HelperFn {
        match self {
            HelperDefinition::Function(f) => Rc::clone(f),
            HelperDefinition::Managed(manager) => manager.get_helper(),
        }
    }
}

impl fmt::Debug for HelperDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HelperDefinition::Function(_) => f.write_str("HelperDefinition::Function"),
            HelperDefinition::Managed(_) => f.write_str("HelperDefinition::Managed"),
        }
    }
}

/// An element modifier instance. One is created per element it is
/// attached to.
pub trait Modifier {
    /// Called once the element is flushed, before its children render.
    fn install(&mut self, dom: &dyn DomOperations, element: NodeId, args: &HelperArgs);

    fn update(&mut self, dom: &dyn DomOperations, element: NodeId, args: &HelperArgs);

    /// Called when the transaction that tore the element's block down
    /// commits.
    fn destroy(&mut self, _element: NodeId) {}
}

/// Creates modifier instances.
pub type ModifierDefinition = Rc<dyn Fn() -> Box<dyn Modifier>>;

pub trait LogCapability {
    fn log(&self, values: &[Value]);
}

impl<F: Fn(&[Value])> LogCapability for F {
    fn log(&self, values: &[Value]) {
        self(values)
    }
}

/// The symbols visible at a `{{debugger}}` statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugScope {
    pub names: Vec<String>,
    pub values: Vec<Value>,
}

impl DebugScope {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .and_then(|index| self.values.get(index))
    }
}

pub type DebuggerHook = Rc<dyn Fn(&DebugScope)>;

#[derive(Default, Clone)]
pub struct Capabilities {
    helpers: IndexMap<String, HelperDefinition>,
    modifiers: IndexMap<String, ModifierDefinition>,
    log: Option<Rc<dyn LogCapability>>,
    debugger: Option<DebuggerHook>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_helper(self, name: impl Into<String>, helper: impl Fn(&HelperArgs) -> Value + 'static) -> Self {
        self.with_helper_definition(name, HelperDefinition::function(helper))
    }

    pub fn with_helper_definition(mut self, name: impl Into<String>, definition: HelperDefinition) -> Self {
        self.helpers.insert(name.into(), definition);
        self
    }

    pub fn with_modifier<M, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        M: Modifier + 'static,
        F: Fn() -> M + 'static,
    {
        self.modifiers
            .insert(name.into(), Rc::new(move || Box::new(factory()) as Box<dyn Modifier>));
        self
    }

    pub fn with_log(mut self, log: impl LogCapability + 'static) -> Self {
        self.log = Some(Rc::new(log));
        self
    }

    pub fn with_debugger(mut self, hook: impl Fn(&DebugScope) + 'static) -> Self {
        self.debugger = Some(Rc::new(hook));
        self
    }

    pub fn helper(&self, name: &str) -> Option<HelperFn> {
        self.helpers.get(name).map(HelperDefinition::get_helper)
    }

    pub fn modifier(&self, name: &str) -> Option<ModifierDefinition> {
        self.modifiers.get(name).cloned()
    }

    pub fn log(&self) -> Option<&dyn LogCapability> {
        self.log.as_deref()
    }

    pub fn debugger(&self) -> Option<&DebuggerHook> {
        self.debugger.as_ref()
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .field("modifiers", &self.modifiers.keys().collect::<Vec<_>>())
            .field("log", &self.log.is_some())
            .field("debugger", &self.debugger.is_some())
            .finish()
    }
}
