//! Revision based reactivity.
//!
//! Every write bumps a global revision and stamps the written storage's
//! [`Tag`] with it. Reads made while a [`Cache`] computes are tracked, and
//! the cache stays valid until one of the tags it read moves past the
//! revision it was computed at.

mod cache;
mod tag;
mod tracked;

pub use cache::{create_cache, get_value, is_const, Cache};
pub use tag::{consume, current_revision, track, untrack, Revision, Tag, CONSTANT_REVISION, INITIAL_REVISION};
pub use tracked::TrackedObject;
