//! The element builder: where the next node goes, which element is being
//! constructed, and which updatable blocks the inserted nodes belong to.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::assertions::existing;
use crate::dom::{adjust_attribute, child_namespace, DomOperations, NodeId, NodeRange};
use crate::environment::Destructor;
use crate::error::DomError;
use crate::value::Value;

/// Insert position: before `next_sibling` in `element`, or at its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub element: NodeId,
    pub next_sibling: Option<NodeId>,
}

impl Cursor {
    pub fn append_to(element: NodeId) -> Self {
        Cursor {
            element,
            next_sibling: None,
        }
    }
}

#[derive(Clone)]
enum Edge {
    Node(NodeId),
    Block(BlockHandle),
}

impl Edge {
    fn first_node(&self) -> Option<NodeId> {
        match self {
            Edge::Node(node) => Some(*node),
            Edge::Block(block) => block.first_node(),
        }
    }

    fn last_node(&self) -> Option<NodeId> {
        match self {
            Edge::Node(node) => Some(*node),
            Edge::Block(block) => block.last_node(),
        }
    }
}

struct BlockState {
    parent: NodeId,
    first: Option<Edge>,
    last: Option<Edge>,
    destructors: Vec<Destructor>,
    children: Vec<BlockHandle>,
}

/// A run of sibling nodes that can be cleared and rendered again, plus the
/// destructors registered while it rendered.
#[derive(Clone)]
pub struct BlockHandle(Rc<RefCell<BlockState>>);

impl BlockHandle {
    fn new(parent: NodeId) -> Self {
        BlockHandle(Rc::new(RefCell::new(BlockState {
            parent,
            first: None,
            last: None,
            destructors: Vec::new(),
            children: Vec::new(),
        })))
    }

    pub fn parent_element(&self) -> NodeId {
        self.0.borrow().parent
    }

    pub fn first_node(&self) -> Option<NodeId> {
        let first = self.0.borrow().first.clone();
        first.and_then(|edge| edge.first_node())
    }

    pub fn last_node(&self) -> Option<NodeId> {
        let last = self.0.borrow().last.clone();
        last.and_then(|edge| edge.last_node())
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().first.is_none()
    }

    fn did_append(&self, edge: Edge) {
        let mut state = self.0.borrow_mut();
        if state.first.is_none() {
            state.first = Some(edge.clone());
        }
        state.last = Some(edge);
    }

    fn adopt(&self, child: &BlockHandle) {
        self.0.borrow_mut().children.push(child.clone());
    }

    pub fn register_destructor(&self, destructor: impl FnOnce() + 'static) {
        self.0.borrow_mut().destructors.push(Box::new(destructor));
    }

    /// Removes every node between the block's first and last node from the
    /// document.
    pub fn clear_nodes(&self, dom: &dyn DomOperations) {
        let parent = self.parent_element();
        let (Some(first), Some(last)) = (self.first_node(), self.last_node()) else {
            return;
        };
        let mut current = Some(first);
        while let Some(node) = current {
            current = dom.next_sibling(node);
            dom.remove_child(parent, node);
            if node == last {
                break;
            }
        }
    }

    /// Forgets the block's nodes and nested blocks so it can be rendered
    /// into again.
    fn reset(&self) {
        let mut state = self.0.borrow_mut();
        state.first = None;
        state.last = None;
        state.children.clear();
    }

    /// Takes the destructors of nested blocks and then this one's.
    pub fn teardown(&self) -> Vec<Destructor> {
        let (children, own) = {
            let mut state = self.0.borrow_mut();
            (std::mem::take(&mut state.children), std::mem::take(&mut state.destructors))
        };
        let mut destructors: Vec<Destructor> = children.iter().flat_map(BlockHandle::teardown).collect();
        destructors.extend(own);
        destructors
    }
}

impl fmt::Debug for BlockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockHandle")
            .field("parent", &self.parent_element())
            .field("first", &self.first_node())
            .field("last", &self.last_node())
            .finish()
    }
}

/// How a dynamic attribute is written: as a DOM property for form state,
/// otherwise as an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicAttribute {
    element: NodeId,
    name: String,
    namespace: Option<String>,
    property: bool,
}

impl DynamicAttribute {
    pub fn set(&self, dom: &dyn DomOperations, value: &Value) {
        if self.property {
            dom.set_property(self.element, &self.name, value);
            return;
        }
        let namespace = self.namespace.as_deref();
        match attribute_value(value) {
            Some(text) => dom.set_attribute(self.element, &self.name, &text, namespace),
            None => dom.remove_attribute(self.element, &self.name, namespace),
        }
    }
}

/// `false`, `null` and `undefined` remove the attribute; `true` sets it
/// empty.
fn attribute_value(value: &Value) -> Option<String> {
    match value {
        Value::Undefined | Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some(String::new()),
        other => Some(other.to_display_string()),
    }
}

fn is_property(tag: &str, name: &str) -> bool {
    matches!(
        (tag, name),
        ("input", "value" | "checked") | ("textarea", "value") | ("select", "value")
    )
}

pub struct ElementBuilder {
    dom: Rc<dyn DomOperations>,
    cursors: Vec<Cursor>,
    constructing: Option<NodeId>,
    /// Open blocks with the cursor depth they were opened at. Only nodes
    /// inserted at that depth are the block's own.
    blocks: Vec<(BlockHandle, usize)>,
}

impl ElementBuilder {
    /// A builder appending at `cursor`, tracking everything it inserts in a
    /// root block returned by [`ElementBuilder::finish`].
    pub fn for_initial_render(dom: Rc<dyn DomOperations>, cursor: Cursor) -> Self {
        let root = BlockHandle::new(cursor.element);
        ElementBuilder {
            dom,
            cursors: vec![cursor],
            constructing: None,
            blocks: vec![(root, 1)],
        }
    }

    /// A builder that renders `block` again in place: its current nodes are
    /// removed and new ones go where they were.
    pub fn resume(dom: Rc<dyn DomOperations>, block: &BlockHandle) -> Self {
        let parent = block.parent_element();
        let next_sibling = block.last_node().and_then(|last| dom.next_sibling(last));
        block.clear_nodes(&*dom);
        block.reset();
        trace!(?parent, ?next_sibling, "resuming block");
        ElementBuilder {
            dom,
            cursors: vec![Cursor {
                element: parent,
                next_sibling,
            }],
            constructing: None,
            blocks: vec![(block.clone(), 1)],
        }
    }

    pub fn dom(&self) -> &Rc<dyn DomOperations> {
        &self.dom
    }

    fn cursor(&self) -> Cursor {
        *existing(self.cursors.last(), "an insertion cursor")
    }

    pub fn current_element(&self) -> NodeId {
        self.cursor().element
    }

    fn insert(&mut self, node: NodeId) {
        let cursor = self.cursor();
        self.dom.insert_before(cursor.element, node, cursor.next_sibling);
        self.did_append(Edge::Node(node));
    }

    fn did_append(&self, edge: Edge) {
        if let Some((block, depth)) = self.blocks.last() {
            if *depth == self.cursors.len() {
                block.did_append(edge);
            }
        }
    }

    pub fn open_element(&mut self, tag: &str) -> NodeId {
        assert!(self.constructing.is_none(), "BUG: opened <{tag}> before flushing the previous element");
        let parent = self.current_element();
        let parent_tag = self.dom.tag_name(parent);
        let parent_namespace = self.dom.namespace_of(parent);
        let namespace = child_namespace(tag, parent_tag.as_deref(), parent_namespace.as_deref());
        let element = self.dom.create_element(tag, namespace);
        self.constructing = Some(element);
        element
    }

    fn constructing(&self) -> NodeId {
        existing(self.constructing, "an element under construction")
    }

    pub fn set_static_attribute(&mut self, name: &str, value: &str, namespace: Option<&str>) {
        let element = self.constructing();
        let namespace = namespace.or_else(|| adjust_attribute(name));
        self.dom.set_attribute(element, name, value, namespace);
    }

    pub fn set_dynamic_attribute(&mut self, name: &str, value: &Value, namespace: Option<&str>) -> DynamicAttribute {
        let element = self.constructing();
        let property = self.dom.namespace_of(element).is_none()
            && self.dom.tag_name(element).is_some_and(|tag| is_property(&tag, name));
        let attribute = DynamicAttribute {
            element,
            name: name.to_string(),
            namespace: namespace.or_else(|| adjust_attribute(name)).map(str::to_string),
            property,
        };
        attribute.set(&*self.dom, value);
        attribute
    }

    /// Inserts the element under construction and moves the cursor into it.
    pub fn flush_element(&mut self) -> NodeId {
        let element = self.constructing();
        self.constructing = None;
        self.insert(element);
        self.cursors.push(Cursor::append_to(element));
        element
    }

    pub fn close_element(&mut self) {
        if self.cursors.len() <= 1 {
            panic!("BUG: closed more elements than were opened");
        }
        self.cursors.pop();
    }

    pub fn append_text(&mut self, text: &str) -> NodeId {
        let node = self.dom.create_text_node(text);
        self.insert(node);
        node
    }

    pub fn append_comment(&mut self, text: &str) -> NodeId {
        let node = self.dom.create_comment(text);
        self.insert(node);
        node
    }

    pub fn append_html(&mut self, html: &str) -> Result<NodeRange, DomError> {
        let cursor = self.cursor();
        let range = self.dom.insert_html_before(cursor.element, cursor.next_sibling, html)?;
        self.did_append(Edge::Node(range.first));
        self.did_append(Edge::Node(range.last));
        Ok(range)
    }

    /// Opens a block that collects the nodes inserted until the matching
    /// [`ElementBuilder::pop_block`].
    pub fn push_updatable_block(&mut self) -> BlockHandle {
        let block = BlockHandle::new(self.current_element());
        let (parent, _) = existing(self.blocks.last(), "an enclosing block");
        parent.adopt(&block);
        self.blocks.push((block.clone(), self.cursors.len()));
        block
    }

    /// Closes the innermost block. An empty block gets a comment so it keeps
    /// a position in the document.
    pub fn pop_block(&mut self) -> BlockHandle {
        if existing(self.blocks.last(), "a block to pop").0.is_empty() {
            self.append_comment("");
        }
        let (block, depth) = existing(self.blocks.pop(), "a block to pop");
        if let Some((outer, outer_depth)) = self.blocks.last() {
            if *outer_depth == depth {
                outer.did_append(Edge::Block(block.clone()));
            }
        }
        block
    }

    pub fn register_destructor(&mut self, destructor: impl FnOnce() + 'static) {
        existing(self.blocks.last(), "a block to own the destructor")
            .0
            .register_destructor(destructor);
    }

    /// Ends an initial render, returning the root block. Unlike nested
    /// blocks the root may stay empty.
    pub fn finish(mut self) -> BlockHandle {
        assert!(self.blocks.len() == 1, "BUG: {} blocks left open", self.blocks.len() - 1);
        existing(self.blocks.pop(), "the root block").0
    }
}

impl fmt::Debug for ElementBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementBuilder")
            .field("cursors", &self.cursors)
            .field("constructing", &self.constructing)
            .field("blocks", &self.blocks.len())
            .finish()
    }
}
