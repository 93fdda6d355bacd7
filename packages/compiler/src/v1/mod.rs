//! AST v1, its builders and the source printer.

pub mod builders;
mod nodes;
mod printer;

pub use nodes::*;
pub use printer::{print, EntityEncoding, PrinterOptions};
