//! Source text and location model.
//!
//! A [`Source`] owns the template text, its module name and the options the
//! template is compiled with. Everything downstream refers back to it through
//! [`SourceSpan`] byte ranges.

mod format;
mod span;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use format::format_error;
pub use span::{SourceLocation, SourceOffset, SourcePosition, SourceSlice, SourceSpan};

/// Module name used when the embedder does not provide one.
pub const UNKNOWN_MODULE: &str = "an unknown module";

/// What the parsed template is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreprocessMode {
    /// Source rewriting: entities stay encoded and whitespace control is off,
    /// so printing the AST reproduces the input.
    Codemod,
    #[default]
    Precompile,
}

/// The subset of preprocessing options a compiled template carries with it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceOptions {
    pub strict_mode: bool,
    pub locals: Vec<String>,
    pub mode: PreprocessMode,
}

#[derive(Debug)]
struct SourceData {
    text: Option<String>,
    module: String,
    options: SourceOptions,
    line_starts: Vec<usize>,
}

/// An immutable, cheaply cloneable template source.
#[derive(Debug, Clone)]
pub struct Source {
    data: Arc<SourceData>,
}

impl Source {
    pub fn new(text: impl Into<String>, module: impl Into<String>) -> Self {
        Source::with_options(Some(text.into()), module.into(), SourceOptions::default())
    }

    /// A source without text, for ASTs assembled from builders.
    pub fn synthetic(module: impl Into<String>) -> Self {
        Source::with_options(None, module.into(), SourceOptions::default())
    }

    pub fn with_options(text: Option<String>, module: String, options: SourceOptions) -> Self {
        let module = if module.is_empty() {
            UNKNOWN_MODULE.to_string()
        } else {
            module
        };
        let line_starts = text.as_deref().map(line_starts).unwrap_or_else(|| vec![0]);
        Source {
            data: Arc::new(SourceData {
                text,
                module,
                options,
                line_starts,
            }),
        }
    }

    /// Derives a new source sharing this text but compiled with `options`.
    pub fn derive(&self, options: SourceOptions) -> Source {
        Source::with_options(self.data.text.clone(), self.data.module.clone(), options)
    }

    pub fn text(&self) -> &str {
        self.data.text.as_deref().unwrap_or("")
    }

    pub fn has_text(&self) -> bool {
        self.data.text.is_some()
    }

    pub fn module(&self) -> &str {
        &self.data.module
    }

    pub fn options(&self) -> &SourceOptions {
        &self.data.options
    }

    pub fn is_strict(&self) -> bool {
        self.data.options.strict_mode
    }

    pub fn mode(&self) -> PreprocessMode {
        self.data.options.mode
    }

    pub fn len(&self) -> usize {
        self.text().len()
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    /// Whether `offset` points into (or just past the end of) the text.
    pub fn check(&self, offset: usize) -> bool {
        offset <= self.len() && self.text().is_char_boundary(offset)
    }

    pub fn slice(&self, start: usize, end: usize) -> Option<&str> {
        if start <= end && self.check(start) && self.check(end) {
            Some(&self.text()[start..end])
        } else {
            None
        }
    }

    /// Converts a byte offset into a 1-based line and 0-based column.
    pub fn position_for(&self, offset: usize) -> Option<SourcePosition> {
        if !self.check(offset) {
            return None;
        }
        let line_index = self.data.line_starts.partition_point(|start| *start <= offset) - 1;
        let line_start = self.data.line_starts[line_index];
        let column = self.text()[line_start..offset].chars().count();
        Some(SourcePosition::new(line_index + 1, column))
    }

    /// Converts a 1-based line and 0-based column back into a byte offset.
    pub fn offset_for(&self, line: usize, column: usize) -> Option<SourceOffset> {
        let line_start = *self.data.line_starts.get(line.checked_sub(1)?)?;
        let rest = &self.text()[line_start..];
        let line_text = rest.split('\n').next().unwrap_or("");
        let mut offset = line_start;
        let mut chars = line_text.chars();
        for _ in 0..column {
            offset += chars.next()?.len_utf8();
        }
        Some(SourceOffset(offset))
    }

    pub fn location_for(&self, span: SourceSpan) -> SourceLocation {
        let start = self.position_for(span.start).unwrap_or(SourcePosition::new(1, 0));
        let end = self.position_for(span.end).unwrap_or(start);
        SourceLocation { start, end }
    }

    pub fn span_for(&self, location: SourceLocation) -> Option<SourceSpan> {
        let start = self.offset_for(location.start.line, location.start.column)?;
        let end = self.offset_for(location.end.line, location.end.column)?;
        Some(start.until(end))
    }

    /// The full text of the 1-based `line`, without its terminator.
    pub fn line(&self, line: usize) -> Option<&str> {
        let start = *self.data.line_starts.get(line.checked_sub(1)?)?;
        let end = self
            .data
            .line_starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(self.len());
        self.text().get(start..end).map(|l| l.trim_end_matches('\r'))
    }
}

fn line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(index, _)| index + 1))
        .collect()
}
