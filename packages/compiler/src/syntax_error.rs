//! Template author facing errors.
//!
//! Every error carries a symbolic [`SyntaxErrorCode`] so callers (and tests)
//! branch on the kind of failure instead of matching on prose. The message
//! text is derived from the code in one place, [`SyntaxErrorCode::message`].

use serde_json::{json, Value};
use thiserror::Error;

use crate::source::{format_error, Source, SourceLocation, SourceSpan};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorCode {
    BlockParamsEmpty,
    BlockParamsUnclosed,
    BlockParamsExtraPipesAndAttrs,
    BlockParamsExtraPipes,
    BlockParamsExtraAttrs,
    BlockParamsMissingPipe,
    BlockParamsMissingAs,
    BlockParamsMissingAsBeforeUnclosedPipe,
    BlockParamsInvalidId(String),
    BlockParamsOnSimpleElement(String),

    ElementsInvalidAttrsInEndTag,
    ElementsUnclosedElement(String),
    ElementsEndWithoutStartTag(String),
    ElementsUnnecessaryEndTag(String),
    ElementsUnbalancedTags { open: String, close: String },
    ElementsMustacheInTagName,
    ElementsNamedBlocksMixed(String),
    ElementsNamedBlockOutsideComponent(String),

    AttrsInvalidAttrValue,
    AttrsInvalidChar(char),
    AttrsArgOnSimpleElement(String),

    HbsInvalidDotDot,
    HbsInvalidSlash,
    HbsInvalidDotSlash,
    HbsParseError(String),
    HbsPartialUnsupported,
    HbsDecoratorUnsupported,
    HbsBlockInTag,
    HbsCommentInTag(String),
    HbsMismatchedBlock { open: String, close: String },

    StrictModeUnresolvedVariable(String),
    KeywordsInvalidUsage { keyword: String, reason: String },
}

impl SyntaxErrorCode {
    /// The stable symbolic code, e.g. `elements.unbalanced-tags`.
    pub fn code(&self) -> &'static str {
        use SyntaxErrorCode::*;
        match self {
            BlockParamsEmpty => "block-params.empty",
            BlockParamsUnclosed => "block-params.unclosed",
            BlockParamsExtraPipesAndAttrs => "block-params.extra-pipes-and-attrs",
            BlockParamsExtraPipes => "block-params.extra-pipes",
            BlockParamsExtraAttrs => "block-params.extra-attrs",
            BlockParamsMissingPipe => "block-params.missing-pipe",
            BlockParamsMissingAs => "block-params.missing-as",
            BlockParamsMissingAsBeforeUnclosedPipe => "block-params.missing-as-before-unclosed-pipe",
            BlockParamsInvalidId(_) => "block-params.invalid-id",
            BlockParamsOnSimpleElement(_) => "block-params.on-simple-element",
            ElementsInvalidAttrsInEndTag => "elements.invalid-attrs-in-end-tag",
            ElementsUnclosedElement(_) => "elements.unclosed-element",
            ElementsEndWithoutStartTag(_) => "elements.end-without-start-tag",
            ElementsUnnecessaryEndTag(_) => "elements.unnecessary-end-tag",
            ElementsUnbalancedTags { .. } => "elements.unbalanced-tags",
            ElementsMustacheInTagName => "elements.mustache-in-tag-name",
            ElementsNamedBlocksMixed(_) => "elements.named-blocks-mixed",
            ElementsNamedBlockOutsideComponent(_) => "elements.named-block-outside-component",
            AttrsInvalidAttrValue => "attrs.invalid-attr-value",
            AttrsInvalidChar(_) => "attrs.invalid-char",
            AttrsArgOnSimpleElement(_) => "attrs.arg-on-simple-element",
            HbsInvalidDotDot => "hbs.syntax.invalid-dotdot",
            HbsInvalidSlash => "hbs.syntax.invalid-slash",
            HbsInvalidDotSlash => "hbs.syntax.invalid-dotslash",
            HbsParseError(_) => "hbs.syntax.parse-error",
            HbsPartialUnsupported => "hbs.syntax.partial-unsupported",
            HbsDecoratorUnsupported => "hbs.syntax.decorator-unsupported",
            HbsBlockInTag => "hbs.syntax.block-in-tag",
            HbsCommentInTag(_) => "hbs.syntax.comment-in-tag",
            HbsMismatchedBlock { .. } => "hbs.syntax.mismatched-block",
            StrictModeUnresolvedVariable(_) => "strict-mode.unresolved-variable",
            KeywordsInvalidUsage { .. } => "keywords.invalid-usage",
        }
    }

    /// Human readable message, generated from the code and its payload.
    pub fn message(&self) -> String {
        use SyntaxErrorCode::*;
        const AFTER_BLOCK_PARAMS: &str = "after block parameters. The closing pipe after the last block parameter must be the last thing in a tag with block parameters";
        match self {
            BlockParamsEmpty => "Empty block params are not allowed".to_string(),
            BlockParamsUnclosed => "Unclosed block parameters".to_string(),
            BlockParamsExtraPipesAndAttrs => format!("Extra pipes and attributes {AFTER_BLOCK_PARAMS}"),
            BlockParamsExtraPipes => format!("Extra pipes {AFTER_BLOCK_PARAMS}"),
            BlockParamsExtraAttrs => format!("Extra attributes {AFTER_BLOCK_PARAMS}"),
            BlockParamsMissingPipe => "The `as` keyword must immediately precede a pipe character".to_string(),
            BlockParamsMissingAs => "Block params must be immediately preceded by `as`".to_string(),
            BlockParamsMissingAsBeforeUnclosedPipe => {
                "Unclosed block parameters must be immediately preceded by `as`".to_string()
            }
            BlockParamsInvalidId(name) => format!("Invalid identifier for block parameters, '{name}'"),
            BlockParamsOnSimpleElement(tag) => {
                format!("Unexpected block params in <{tag}>: simple elements cannot have block params")
            }
            ElementsInvalidAttrsInEndTag => "Invalid end tag: closing tag must not have attributes".to_string(),
            ElementsUnclosedElement(tag) => format!("Unclosed element `{tag}`"),
            ElementsEndWithoutStartTag(tag) => format!("Closing tag </{tag}> without an open tag"),
            ElementsUnnecessaryEndTag(tag) => {
                format!("<{tag}> elements do not need end tags. You should remove it")
            }
            ElementsUnbalancedTags { open, close } => {
                format!("Closing tag </{close}> did not match last open tag <{open}>")
            }
            ElementsMustacheInTagName => "Cannot use mustaches in an elements tagname".to_string(),
            ElementsNamedBlocksMixed(tag) => format!(
                "Unexpected content inside <{tag}> component invocation: when using named blocks, the tag cannot contain other content"
            ),
            ElementsNamedBlockOutsideComponent(name) => {
                format!("Unexpected named block <:{name}> outside of a component invocation")
            }
            AttrsInvalidAttrValue => "An unquoted attribute value must be a string or a mustache, preceded by whitespace or a '=' character, and followed by whitespace, a '>' character, or '/>'".to_string(),
            AttrsInvalidChar(ch) => format!("Invalid character `{ch}` in attribute name"),
            AttrsArgOnSimpleElement(name) => format!(
                "Invalid attribute `{name}`: arguments (`@name`) can only be passed to components"
            ),
            HbsInvalidDotDot => "Changing context using \"../\" is not supported in Glimmer".to_string(),
            HbsInvalidSlash => "Mixing '.' and '/' in paths is not supported in Glimmer; use only '.' to separate property paths".to_string(),
            HbsInvalidDotSlash => "Using \"./\" is not supported in Glimmer and unnecessary".to_string(),
            HbsParseError(detail) => format!("Parse error: {detail}"),
            HbsPartialUnsupported => "Handlebars partials are not supported".to_string(),
            HbsDecoratorUnsupported => "Handlebars decorators are not supported".to_string(),
            HbsBlockInTag => "A block may only be used inside an HTML element or another block.".to_string(),
            HbsCommentInTag(state) => format!(
                "Using a Handlebars comment when in the `{state}` state is not supported"
            ),
            HbsMismatchedBlock { open, close } => format!("{open} doesn't match {close}"),
            StrictModeUnresolvedVariable(name) => format!(
                "Attempted to resolve `{name}`, which was expected to be a component, helper, or value, but nothing was found in strict mode"
            ),
            KeywordsInvalidUsage { keyword, reason } => format!("Invalid `{keyword}` usage: {reason}"),
        }
    }

    /// Structured payload for codes that carry one.
    pub fn payload(&self) -> Option<Value> {
        use SyntaxErrorCode::*;
        match self {
            BlockParamsInvalidId(name)
            | BlockParamsOnSimpleElement(name)
            | ElementsUnclosedElement(name)
            | ElementsEndWithoutStartTag(name)
            | ElementsUnnecessaryEndTag(name)
            | ElementsNamedBlocksMixed(name)
            | ElementsNamedBlockOutsideComponent(name)
            | AttrsArgOnSimpleElement(name)
            | StrictModeUnresolvedVariable(name)
            | HbsParseError(name)
            | HbsCommentInTag(name) => Some(Value::String(name.clone())),
            AttrsInvalidChar(ch) => Some(Value::String(ch.to_string())),
            ElementsUnbalancedTags { open, close } | HbsMismatchedBlock { open, close } => {
                Some(json!({ "open": open, "close": close }))
            }
            KeywordsInvalidUsage { keyword, reason } => {
                Some(json!({ "keyword": keyword, "reason": reason }))
            }
            _ => None,
        }
    }
}

/// A located template error.
#[derive(Debug, Clone, Error)]
#[error("{formatted}")]
pub struct SyntaxError {
    pub code: SyntaxErrorCode,
    pub span: SourceSpan,
    pub module: String,
    pub location: SourceLocation,
    /// The message plus a code frame and module/line reference.
    pub formatted: String,
}

impl SyntaxError {
    pub fn new(code: SyntaxErrorCode, span: SourceSpan, source: &Source) -> Self {
        let formatted = format_error(source, span, &code.message());
        SyntaxError {
            location: source.location_for(span),
            module: source.module().to_string(),
            code,
            span,
            formatted,
        }
    }

    pub fn code(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> String {
        self.code.message()
    }

    pub fn payload(&self) -> Option<Value> {
        self.code.payload()
    }
}

pub type SyntaxResult<T> = Result<T, SyntaxError>;
