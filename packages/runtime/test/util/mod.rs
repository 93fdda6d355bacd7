#![allow(dead_code)]

//! Helpers shared by the runtime integration tests.

use glimmer_compiler::{precompile, PrecompileOptions, PreprocessOptions};
use glimmer_runtime::{
    Capabilities, DomOperations, Environment, NodeId, RenderError, RenderResult, ScopeValue, SimpleDocument, Template,
    TemplateFactory, TrackedObject, Value,
};
use indexmap::IndexMap;

/// A document with an empty `<div>` to render into.
pub struct Harness {
    pub doc: SimpleDocument,
    pub root: NodeId,
    pub env: Environment,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(Capabilities::new())
    }

    pub fn with(capabilities: Capabilities) -> Self {
        let doc = SimpleDocument::new();
        let root = doc.create_element("div", None);
        let env = Environment::new(doc.clone(), capabilities);
        Harness { doc, root, env }
    }

    pub fn render(&self, text: &str, this: impl Into<Value>) -> RenderResult {
        self.try_render(text, this).unwrap_or_else(|error| panic!("render failed: {error}"))
    }

    pub fn try_render(&self, text: &str, this: impl Into<Value>) -> Result<RenderResult, RenderError> {
        template(text).render(&self.env, this.into(), self.root)
    }

    pub fn render_with_args(&self, text: &str, this: impl Into<Value>, args: &[(&str, Value)]) -> RenderResult {
        let args: IndexMap<String, Value> = args.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        template(text)
            .render_with_args(&self.env, this.into(), args, self.root)
            .unwrap_or_else(|error| panic!("render failed: {error}"))
    }

    /// The root's inner HTML.
    pub fn html(&self) -> String {
        self.doc.serialize_children(self.root)
    }
}

pub fn factory(text: &str, options: PreprocessOptions) -> TemplateFactory {
    let compiled = precompile(text, &PrecompileOptions::from(options))
        .unwrap_or_else(|error| panic!("unexpected syntax error:\n{error}"));
    TemplateFactory::new(&compiled).unwrap_or_else(|error| panic!("undecodable block: {error}"))
}

/// A loose mode template with no lexical scope.
pub fn template(text: &str) -> Template {
    factory(text, PreprocessOptions::default())
        .create(Vec::new())
        .unwrap_or_else(|error| panic!("{error}"))
}

/// A strict mode template; `scope` pairs each local with its value.
pub fn strict_template(text: &str, scope: Vec<(&str, ScopeValue)>) -> Template {
    let names: Vec<&str> = scope.iter().map(|(name, _)| *name).collect();
    let factory = factory(text, PreprocessOptions::strict().with_locals(names));
    let values = factory
        .scope()
        .iter()
        .map(|used| {
            scope
                .iter()
                .find(|(name, _)| name == used)
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| panic!("no value for {used}"))
        })
        .collect();
    factory.create(values).unwrap_or_else(|error| panic!("{error}"))
}

pub fn tracked(json: serde_json::Value) -> TrackedObject {
    match Value::from(json) {
        Value::Object(object) => object,
        other => panic!("expected an object, got {other:?}"),
    }
}
