//! Render nodes and the update nodes they leave behind.
//!
//! Appending a [`RenderNode`] performs its part of the first render. When
//! anything it rendered can change it returns an [`UpdateNode`], which is
//! polled on every rerender and reports a [`PollResult`]. Nodes that
//! rendered only constants return nothing and are never visited again.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::builder::{BlockHandle, DynamicAttribute, ElementBuilder};
use crate::capabilities::{DebugScope, HelperArgs, Modifier, ModifierDefinition};
use crate::dom::NodeId;
use crate::environment::{Environment, Transaction};
use crate::error::RenderError;
use crate::reactive::{untrack, Cache};
use crate::value::Value;

/// Computes a value, reading tracked state through the reactive layer.
pub type Evaluator = Rc<dyn Fn() -> Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollResult {
    Initial,
    /// Nothing changed.
    Valid,
    /// Something changed and was written.
    Invalid,
    /// Nothing can change any more.
    Constant,
}

impl PollResult {
    /// Coalesces sibling results: `Valid` if all are valid, `Constant` if
    /// all are constant (or there are none), `Invalid` otherwise.
    pub fn combine(results: impl IntoIterator<Item = PollResult>) -> PollResult {
        let mut results = results.into_iter();
        let Some(first) = results.next() else {
            return PollResult::Constant;
        };
        let uniform = match first {
            PollResult::Valid | PollResult::Constant => first,
            _ => return PollResult::Invalid,
        };
        if results.all(|result| result == uniform) {
            uniform
        } else {
            PollResult::Invalid
        }
    }
}

pub struct AppendContext<'a> {
    pub builder: &'a mut ElementBuilder,
    pub env: &'a Environment,
}

pub struct UpdateContext<'a> {
    pub env: &'a Environment,
    pub tx: &'a mut Transaction,
}

pub type Update = Box<dyn UpdateNode>;
pub type AppendResult = Result<Option<Update>, RenderError>;

pub trait RenderNode {
    fn append(&self, ctx: &mut AppendContext<'_>) -> AppendResult;
}

pub trait UpdateNode {
    fn poll(&mut self, ctx: &mut UpdateContext<'_>) -> Result<PollResult, RenderError>;
}

fn cache_of(evaluator: &Evaluator) -> Cache<Value> {
    let evaluator = Rc::clone(evaluator);
    Cache::new(move || evaluator())
}

pub struct TextNode(pub String);

impl RenderNode for TextNode {
    fn append(&self, ctx: &mut AppendContext<'_>) -> AppendResult {
        ctx.builder.append_text(&self.0);
        Ok(None)
    }
}

pub struct CommentNode(pub String);

impl RenderNode for CommentNode {
    fn append(&self, ctx: &mut AppendContext<'_>) -> AppendResult {
        ctx.builder.append_comment(&self.0);
        Ok(None)
    }
}

pub struct HtmlNode(pub String);

impl RenderNode for HtmlNode {
    fn append(&self, ctx: &mut AppendContext<'_>) -> AppendResult {
        ctx.builder.append_html(&self.0)?;
        Ok(None)
    }
}

pub struct AttributeNode {
    pub name: String,
    pub value: String,
    pub namespace: Option<String>,
}

impl RenderNode for AttributeNode {
    fn append(&self, ctx: &mut AppendContext<'_>) -> AppendResult {
        ctx.builder
            .set_static_attribute(&self.name, &self.value, self.namespace.as_deref());
        Ok(None)
    }
}

pub struct DynamicAttributeNode {
    pub name: String,
    pub value: Evaluator,
    pub namespace: Option<String>,
}

impl RenderNode for DynamicAttributeNode {
    fn append(&self, ctx: &mut AppendContext<'_>) -> AppendResult {
        let cache = cache_of(&self.value);
        let initial = cache.value();
        let attribute = ctx
            .builder
            .set_dynamic_attribute(&self.name, &initial, self.namespace.as_deref());
        if cache.is_const() {
            return Ok(None);
        }
        Ok(Some(Box::new(DynamicAttributeUpdate {
            cache,
            attribute,
            last: initial,
        })))
    }
}

struct DynamicAttributeUpdate {
    cache: Cache<Value>,
    attribute: DynamicAttribute,
    last: Value,
}

impl UpdateNode for DynamicAttributeUpdate {
    fn poll(&mut self, ctx: &mut UpdateContext<'_>) -> Result<PollResult, RenderError> {
        let next = self.cache.value();
        if next == self.last {
            return Ok(PollResult::Valid);
        }
        self.attribute.set(&**ctx.env.dom(), &next);
        self.last = next;
        Ok(changed(&self.cache))
    }
}

fn changed<T: Clone + 'static>(cache: &Cache<T>) -> PollResult {
    if cache.is_const() {
        PollResult::Constant
    } else {
        PollResult::Invalid
    }
}

pub struct DynamicTextNode {
    pub value: Evaluator,
}

impl RenderNode for DynamicTextNode {
    fn append(&self, ctx: &mut AppendContext<'_>) -> AppendResult {
        let cache = cache_of(&self.value);
        let initial = cache.value();
        let node = ctx.builder.append_text(&initial.to_display_string());
        trace!(value = ?initial, "rendered text");
        if cache.is_const() {
            return Ok(None);
        }
        Ok(Some(Box::new(DynamicTextUpdate {
            cache,
            node,
            last: initial,
        })))
    }
}

struct DynamicTextUpdate {
    cache: Cache<Value>,
    node: NodeId,
    last: Value,
}

impl UpdateNode for DynamicTextUpdate {
    fn poll(&mut self, ctx: &mut UpdateContext<'_>) -> Result<PollResult, RenderError> {
        let next = self.cache.value();
        if next == self.last {
            return Ok(PollResult::Valid);
        }
        trace!(value = ?next, "updating text");
        ctx.env.dom().set_text(self.node, &next.to_display_string());
        self.last = next;
        Ok(changed(&self.cache))
    }
}

/// Trusted HTML. A change replaces the inserted nodes.
pub struct DynamicHtmlNode {
    pub value: Evaluator,
}

impl RenderNode for DynamicHtmlNode {
    fn append(&self, ctx: &mut AppendContext<'_>) -> AppendResult {
        let cache = cache_of(&self.value);
        let initial = cache.value();
        if cache.is_const() {
            ctx.builder.append_html(&initial.to_display_string())?;
            return Ok(None);
        }
        let block = ctx.builder.push_updatable_block();
        ctx.builder.append_html(&initial.to_display_string())?;
        ctx.builder.pop_block();
        Ok(Some(Box::new(DynamicHtmlUpdate {
            cache,
            block,
            last: initial,
        })))
    }
}

struct DynamicHtmlUpdate {
    cache: Cache<Value>,
    block: BlockHandle,
    last: Value,
}

impl UpdateNode for DynamicHtmlUpdate {
    fn poll(&mut self, ctx: &mut UpdateContext<'_>) -> Result<PollResult, RenderError> {
        let next = self.cache.value();
        if next == self.last {
            return Ok(PollResult::Valid);
        }
        let mut builder = ElementBuilder::resume(Rc::clone(ctx.env.dom()), &self.block);
        builder.append_html(&next.to_display_string())?;
        builder.pop_block();
        self.last = next;
        Ok(changed(&self.cache))
    }
}

/// Appends its children in order.
#[derive(Default)]
pub struct FragmentNode {
    nodes: Vec<Box<dyn RenderNode>>,
}

impl FragmentNode {
    pub fn new(nodes: Vec<Box<dyn RenderNode>>) -> Self {
        FragmentNode { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl RenderNode for FragmentNode {
    fn append(&self, ctx: &mut AppendContext<'_>) -> AppendResult {
        let mut updates = SmallVec::new();
        for node in &self.nodes {
            if let Some(update) = node.append(ctx)? {
                updates.push(update);
            }
        }
        Ok(FragmentUpdate::boxed(updates))
    }
}

struct FragmentUpdate {
    updates: SmallVec<[Update; 4]>,
}

impl FragmentUpdate {
    fn boxed(updates: SmallVec<[Update; 4]>) -> Option<Update> {
        if updates.is_empty() {
            None
        } else {
            Some(Box::new(FragmentUpdate { updates }))
        }
    }
}

impl UpdateNode for FragmentUpdate {
    fn poll(&mut self, ctx: &mut UpdateContext<'_>) -> Result<PollResult, RenderError> {
        let mut results = SmallVec::<[PollResult; 4]>::new();
        for update in &mut self.updates {
            results.push(update.poll(ctx)?);
        }
        Ok(PollResult::combine(results))
    }
}

/// A modifier attached to an element.
pub struct ModifierNode {
    pub name: String,
    pub definition: ModifierDefinition,
    pub positional: Vec<Evaluator>,
    pub named: Vec<(String, Evaluator)>,
}

impl ModifierNode {
    fn install(&self, ctx: &mut AppendContext<'_>, element: NodeId) -> AppendResult {
        let cache = {
            let positional = self.positional.clone();
            let named = self.named.clone();
            Cache::new(move || HelperArgs {
                positional: positional.iter().map(|value| value()).collect(),
                named: named.iter().map(|(key, value)| (key.clone(), value())).collect(),
            })
        };
        let args = cache.value();
        let instance: Rc<RefCell<Box<dyn Modifier>>> = Rc::new(RefCell::new((self.definition)()));
        debug!(modifier = %self.name, ?element, "installing modifier");
        instance.borrow_mut().install(&**ctx.builder.dom(), element, &args);

        let destroyed = Rc::clone(&instance);
        let name = self.name.clone();
        ctx.builder.register_destructor(move || {
            debug!(modifier = %name, ?element, "destroying modifier");
            destroyed.borrow_mut().destroy(element);
        });

        if cache.is_const() {
            return Ok(None);
        }
        Ok(Some(Box::new(ModifierUpdate {
            cache,
            instance,
            element,
            last: args,
        })))
    }
}

struct ModifierUpdate {
    cache: Cache<HelperArgs>,
    instance: Rc<RefCell<Box<dyn Modifier>>>,
    element: NodeId,
    last: HelperArgs,
}

impl UpdateNode for ModifierUpdate {
    fn poll(&mut self, ctx: &mut UpdateContext<'_>) -> Result<PollResult, RenderError> {
        let next = self.cache.value();
        if next == self.last {
            return Ok(PollResult::Valid);
        }
        self.instance
            .borrow_mut()
            .update(&**ctx.env.dom(), self.element, &next);
        self.last = next;
        Ok(changed(&self.cache))
    }
}

/// Open tag, attributes, flush, modifiers, children, close.
pub struct ElementNode {
    pub tag: String,
    pub attributes: FragmentNode,
    pub modifiers: Vec<ModifierNode>,
    pub children: FragmentNode,
}

impl RenderNode for ElementNode {
    fn append(&self, ctx: &mut AppendContext<'_>) -> AppendResult {
        ctx.builder.open_element(&self.tag);
        let attributes = self.attributes.append(ctx)?;
        let element = ctx.builder.flush_element();

        let mut modifier_updates = SmallVec::new();
        for modifier in &self.modifiers {
            if let Some(update) = modifier.install(ctx, element)? {
                modifier_updates.push(update);
            }
        }
        let modifiers = FragmentUpdate::boxed(modifier_updates);

        let children = self.children.append(ctx)?;
        ctx.builder.close_element();

        let parts: SmallVec<[Update; 3]> = [attributes, modifiers, children].into_iter().flatten().collect();
        if parts.is_empty() {
            return Ok(None);
        }
        Ok(Some(Box::new(ElementUpdate { parts })))
    }
}

struct ElementUpdate {
    parts: SmallVec<[Update; 3]>,
}

impl UpdateNode for ElementUpdate {
    fn poll(&mut self, ctx: &mut UpdateContext<'_>) -> Result<PollResult, RenderError> {
        let mut results = SmallVec::<[PollResult; 3]>::new();
        for part in &mut self.parts {
            results.push(part.poll(ctx)?);
        }
        Ok(PollResult::combine(results))
    }
}

/// Renders a block's content for the given argument values.
pub type BlockRender = Rc<dyn Fn(&mut AppendContext<'_>, &[Value]) -> AppendResult>;

/// A region whose content depends on its arguments (`if`, `each`, `with`,
/// `let`). While the arguments stay the same the content updates in place;
/// when they change the region is torn down and rendered again.
pub struct BlockNode {
    pub name: &'static str,
    pub args: Vec<Evaluator>,
    pub render: BlockRender,
}

impl RenderNode for BlockNode {
    fn append(&self, ctx: &mut AppendContext<'_>) -> AppendResult {
        let cache = {
            let args = self.args.clone();
            Cache::new(move || args.iter().map(|arg| arg()).collect::<Vec<Value>>())
        };
        let initial = cache.value();

        if cache.is_const() {
            trace!(block = self.name, "rendering constant block inline");
            return (self.render)(ctx, &initial);
        }

        let block = ctx.builder.push_updatable_block();
        let updates = (self.render)(ctx, &initial)?;
        ctx.builder.pop_block();

        Ok(Some(Box::new(BlockUpdate {
            name: self.name,
            cache,
            render: Rc::clone(&self.render),
            block,
            last: initial,
            updates,
        })))
    }
}

struct BlockUpdate {
    name: &'static str,
    cache: Cache<Vec<Value>>,
    render: BlockRender,
    block: BlockHandle,
    last: Vec<Value>,
    updates: Option<Update>,
}

impl UpdateNode for BlockUpdate {
    fn poll(&mut self, ctx: &mut UpdateContext<'_>) -> Result<PollResult, RenderError> {
        let next = self.cache.value();
        if next == self.last {
            let Some(updates) = &mut self.updates else {
                return Ok(if self.cache.is_const() {
                    PollResult::Constant
                } else {
                    PollResult::Valid
                });
            };
            let inner = updates.poll(ctx)?;
            if inner != PollResult::Constant {
                return Ok(inner);
            }
            self.updates = None;
            // settled content was written this poll; the arguments can still change
            return Ok(if self.cache.is_const() {
                PollResult::Constant
            } else {
                PollResult::Invalid
            });
        }

        debug!(block = self.name, "rebuilding block");
        ctx.tx.schedule_all(self.block.teardown());
        let env = ctx.env;
        let mut builder = ElementBuilder::resume(Rc::clone(env.dom()), &self.block);
        let updates = (self.render)(
            &mut AppendContext {
                builder: &mut builder,
                env,
            },
            &next,
        )?;
        builder.pop_block();

        self.last = next;
        self.updates = updates;
        if self.updates.is_none() && self.cache.is_const() {
            Ok(PollResult::Constant)
        } else {
            Ok(PollResult::Invalid)
        }
    }
}

/// `{{debugger}}`: hands the visible symbols to the debugger hook.
pub struct DebuggerNode {
    pub names: Vec<String>,
    pub values: Vec<Evaluator>,
}

impl RenderNode for DebuggerNode {
    fn append(&self, ctx: &mut AppendContext<'_>) -> AppendResult {
        let scope = DebugScope {
            names: self.names.clone(),
            values: untrack(|| self.values.iter().map(|value| value()).collect()),
        };
        match ctx.env.capabilities().debugger() {
            Some(hook) => hook(&scope),
            None => debug!(names = ?scope.names, "reached {{{{debugger}}}} without a debugger hook"),
        }
        Ok(None)
    }
}
