#![deny(clippy::all)]

//! Glimmer template compiler.
//!
//! Templates go through four stages, each its own module:
//!
//! 1. [`parser`]: source text → AST v1 ([`v1`]), with [`traversal`] plugins
//!    applied to the result.
//! 2. [`v2`]: name resolution, producing a symbol indexed AST.
//! 3. [`wire_format`]: the compact opcode form and its JSON codec.
//! 4. [`precompile`]: the public entry points tying the stages together.

mod assertions;
pub mod chars;
pub mod parser;
pub mod precompile;
pub mod source;
pub mod syntax_error;
pub mod traversal;
pub mod v1;
pub mod v2;
pub mod wire_format;

pub use parser::{preprocess, PreprocessOptions};
pub use precompile::{precompile, precompile_json, PrecompileOptions, SerializedTemplateWithLazyBlock};
pub use source::{PreprocessMode, Source, SourceSpan};
pub use syntax_error::{SyntaxError, SyntaxErrorCode, SyntaxResult};
pub use v1::builders as b;
pub use v2::normalize;
pub use wire_format::{SerializedTemplateBlock, WireFormatError};
