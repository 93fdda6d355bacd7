//! The compiled, index based form of a template.

mod debug;
mod encoder;
mod format;
mod json;
pub mod names;
mod opcodes;
mod validate;

pub use debug::{debug_format, WireFormatDebugger};
pub use encoder::encode;
pub use format::*;
pub use json::{WireFormatError, WireResult};
pub use opcodes::Op;
