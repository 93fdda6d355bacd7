#![deny(clippy::all)]

//! Glimmer rendering runtime.
//!
//! Renders compiled templates (see `glimmer_compiler::wire_format`) into a
//! DOM and keeps them up to date as tracked state changes:
//!
//! - [`reactive`]: revision clock, tags, caches and tracked objects.
//! - [`dom`]: the DOM facade the runtime writes through, plus an in-memory
//!   document.
//! - [`builder`]: the element builder that owns the insertion cursor.
//! - [`nodes`]: render nodes and the update nodes they leave behind.
//! - [`program`]: links wire format statements into render nodes.
//! - [`template`]: the template factory and render results.

mod assertions;
pub mod builder;
pub mod capabilities;
pub mod dom;
pub mod environment;
pub mod error;
pub mod nodes;
pub mod program;
pub mod reactive;
pub mod template;
pub mod value;

pub use builder::{BlockHandle, Cursor, ElementBuilder};
pub use capabilities::{
    Capabilities, DebugScope, HelperArgs, HelperDefinition, HelperFn, HelperManager, LogCapability, Modifier,
    ModifierDefinition,
};
pub use dom::{DomOperations, NodeId, NodeRange, SimpleDocument};
pub use environment::{Environment, Transaction};
pub use error::{DomError, RenderError};
pub use nodes::PollResult;
pub use reactive::{create_cache, get_value, is_const, Cache, Tag, TrackedObject};
pub use template::{RenderResult, ScopeValue, Template, TemplateFactory};
pub use value::Value;
