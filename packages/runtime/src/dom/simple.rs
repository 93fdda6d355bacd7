use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;

use super::{DomOperations, NodeId, NodeRange, SVG_NAMESPACE};
use crate::error::DomError;
use crate::value::Value;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source", "track", "wbr",
];

#[derive(Debug, Clone)]
struct Attribute {
    name: String,
    namespace: Option<String>,
    value: String,
}

#[derive(Debug)]
enum NodeKind {
    Element {
        tag: String,
        namespace: Option<String>,
        attributes: Vec<Attribute>,
        properties: IndexMap<String, Value>,
    },
    Text(String),
    Comment(String),
    /// Trusted HTML, kept unparsed.
    Raw(String),
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Default)]
struct DocumentData {
    nodes: Vec<NodeData>,
}

/// An in-memory document. Cloning gives another handle to the same nodes.
///
/// Every change to attached state (insertions, removals, attribute,
/// property and text writes) bumps [`SimpleDocument::mutations`], which is
/// how tests check that a rerender left the document alone.
#[derive(Debug, Clone, Default)]
pub struct SimpleDocument {
    data: Rc<RefCell<DocumentData>>,
    mutations: Rc<Cell<usize>>,
}

impl SimpleDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mutations(&self) -> usize {
        self.mutations.get()
    }

    fn mutated(&self) {
        self.mutations.set(self.mutations.get() + 1);
    }

    fn push(&self, kind: NodeKind) -> NodeId {
        let mut data = self.data.borrow_mut();
        data.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeId(data.nodes.len() - 1)
    }

    fn detach(data: &mut DocumentData, node: NodeId) {
        if let Some(parent) = data.nodes[node.0].parent.take() {
            data.nodes[parent.0].children.retain(|child| *child != node);
        }
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.data.borrow().nodes[node.0].children.clone()
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.data.borrow().nodes[node.0].children.first().copied()
    }

    pub fn attribute(&self, element: NodeId, name: &str) -> Option<String> {
        match &self.data.borrow().nodes[element.0].kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|attribute| attribute.name == name)
                .map(|attribute| attribute.value.clone()),
            _ => None,
        }
    }

    pub fn attribute_namespace(&self, element: NodeId, name: &str) -> Option<String> {
        match &self.data.borrow().nodes[element.0].kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|attribute| attribute.name == name)
                .and_then(|attribute| attribute.namespace.clone()),
            _ => None,
        }
    }

    pub fn property(&self, element: NodeId, name: &str) -> Option<Value> {
        match &self.data.borrow().nodes[element.0].kind {
            NodeKind::Element { properties, .. } => properties.get(name).cloned(),
            _ => None,
        }
    }

    /// The text of a text or comment node.
    pub fn text(&self, node: NodeId) -> Option<String> {
        match &self.data.borrow().nodes[node.0].kind {
            NodeKind::Text(text) | NodeKind::Comment(text) => Some(text.clone()),
            _ => None,
        }
    }

    /// The markup of `node` itself.
    pub fn serialize(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&self.data.borrow(), node, &mut out);
        out
    }

    /// The markup of `node`'s children, like `innerHTML`.
    pub fn serialize_children(&self, node: NodeId) -> String {
        let data = self.data.borrow();
        let mut out = String::new();
        for child in &data.nodes[node.0].children {
            self.write_node(&data, *child, &mut out);
        }
        out
    }

    fn write_node(&self, data: &DocumentData, node: NodeId, out: &mut String) {
        let node = &data.nodes[node.0];
        match &node.kind {
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Raw(html) => out.push_str(html),
            NodeKind::Element { tag, attributes, .. } => {
                out.push('<');
                out.push_str(tag);
                for attribute in attributes {
                    out.push(' ');
                    out.push_str(&attribute.name);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(&attribute.value));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) && node.children.is_empty() {
                    return;
                }
                for child in &node.children {
                    self.write_node(data, *child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

impl DomOperations for SimpleDocument {
    fn create_element(&self, tag: &str, namespace: Option<&str>) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_string(),
            namespace: namespace.map(str::to_string),
            attributes: Vec::new(),
            properties: IndexMap::new(),
        })
    }

    fn create_text_node(&self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn create_comment(&self, text: &str) -> NodeId {
        self.push(NodeKind::Comment(text.to_string()))
    }

    fn insert_before(&self, parent: NodeId, node: NodeId, reference: Option<NodeId>) {
        let mut data = self.data.borrow_mut();
        Self::detach(&mut data, node);
        let children = &mut data.nodes[parent.0].children;
        let index = reference
            .and_then(|reference| children.iter().position(|child| *child == reference))
            .unwrap_or(children.len());
        children.insert(index, node);
        data.nodes[node.0].parent = Some(parent);
        drop(data);
        self.mutated();
    }

    fn insert_html_before(&self, parent: NodeId, reference: Option<NodeId>, html: &str) -> Result<NodeRange, DomError> {
        match &self.data.borrow().nodes[parent.0].kind {
            NodeKind::Element { tag, namespace, .. } => {
                if namespace.as_deref() == Some(SVG_NAMESPACE) {
                    return Err(DomError::HtmlInForeignElement {
                        tag: tag.clone(),
                        namespace: SVG_NAMESPACE.to_string(),
                    });
                }
            }
            NodeKind::Text(_) => return Err(DomError::HtmlInNonElement("text node")),
            NodeKind::Comment(_) => return Err(DomError::HtmlInNonElement("comment")),
            NodeKind::Raw(_) => return Err(DomError::HtmlInNonElement("raw html")),
        }

        let node = if html.is_empty() {
            self.create_comment("")
        } else {
            self.push(NodeKind::Raw(html.to_string()))
        };
        self.insert_before(parent, node, reference);
        Ok(NodeRange { first: node, last: node })
    }

    fn set_attribute(&self, element: NodeId, name: &str, value: &str, namespace: Option<&str>) {
        if let NodeKind::Element { attributes, .. } = &mut self.data.borrow_mut().nodes[element.0].kind {
            match attributes
                .iter_mut()
                .find(|attribute| attribute.name == name && attribute.namespace.as_deref() == namespace)
            {
                Some(attribute) => attribute.value = value.to_string(),
                None => attributes.push(Attribute {
                    name: name.to_string(),
                    namespace: namespace.map(str::to_string),
                    value: value.to_string(),
                }),
            }
        }
        self.mutated();
    }

    fn remove_attribute(&self, element: NodeId, name: &str, namespace: Option<&str>) {
        if let NodeKind::Element { attributes, .. } = &mut self.data.borrow_mut().nodes[element.0].kind {
            attributes.retain(|attribute| !(attribute.name == name && attribute.namespace.as_deref() == namespace));
        }
        self.mutated();
    }

    fn set_property(&self, element: NodeId, name: &str, value: &Value) {
        if let NodeKind::Element { properties, .. } = &mut self.data.borrow_mut().nodes[element.0].kind {
            properties.insert(name.to_string(), value.clone());
        }
        self.mutated();
    }

    fn set_text(&self, node: NodeId, text: &str) {
        if let NodeKind::Text(current) | NodeKind::Comment(current) = &mut self.data.borrow_mut().nodes[node.0].kind {
            *current = text.to_string();
        }
        self.mutated();
    }

    fn remove_child(&self, parent: NodeId, node: NodeId) {
        let mut data = self.data.borrow_mut();
        if data.nodes[node.0].parent == Some(parent) {
            Self::detach(&mut data, node);
            drop(data);
            self.mutated();
        }
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let data = self.data.borrow();
        let parent = data.nodes[node.0].parent?;
        let siblings = &data.nodes[parent.0].children;
        let index = siblings.iter().position(|child| *child == node)?;
        siblings.get(index + 1).copied()
    }

    fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.data.borrow().nodes[node.0].parent
    }

    fn namespace_of(&self, element: NodeId) -> Option<String> {
        match &self.data.borrow().nodes[element.0].kind {
            NodeKind::Element { namespace, .. } => namespace.clone(),
            _ => None,
        }
    }

    fn tag_name(&self, element: NodeId) -> Option<String> {
        match &self.data.borrow().nodes[element.0].kind {
            NodeKind::Element { tag, .. } => Some(tag.clone()),
            _ => None,
        }
    }
}
