//! The DOM facade the renderer writes through.
//!
//! Rendering never touches a concrete document: it goes through
//! [`DomOperations`], which [`SimpleDocument`] implements with an in-memory
//! node arena.

mod namespace;
mod simple;

pub use namespace::{adjust_attribute, child_namespace, SVG_NAMESPACE};
pub use simple::SimpleDocument;

use crate::error::DomError;
use crate::value::Value;

/// A node handle. Only meaningful for the document that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// The first and last node of an inserted run of siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRange {
    pub first: NodeId,
    pub last: NodeId,
}

pub trait DomOperations {
    fn create_element(&self, tag: &str, namespace: Option<&str>) -> NodeId;
    fn create_text_node(&self, text: &str) -> NodeId;
    fn create_comment(&self, text: &str) -> NodeId;

    /// Inserts `node` into `parent` before `reference`, or at the end.
    fn insert_before(&self, parent: NodeId, node: NodeId, reference: Option<NodeId>);

    /// Parses `html` as children of `parent` and inserts them before
    /// `reference`. An empty string still inserts a node so the range is
    /// never empty.
    fn insert_html_before(&self, parent: NodeId, reference: Option<NodeId>, html: &str) -> Result<NodeRange, DomError>;

    fn set_attribute(&self, element: NodeId, name: &str, value: &str, namespace: Option<&str>);
    fn remove_attribute(&self, element: NodeId, name: &str, namespace: Option<&str>);
    fn set_property(&self, element: NodeId, name: &str, value: &Value);
    fn set_text(&self, node: NodeId, text: &str);
    fn remove_child(&self, parent: NodeId, node: NodeId);

    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;
    fn parent_node(&self, node: NodeId) -> Option<NodeId>;
    fn namespace_of(&self, element: NodeId) -> Option<String>;
    fn tag_name(&self, element: NodeId) -> Option<String>;
}
