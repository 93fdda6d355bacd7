//! HTML tag definitions the tokenizer and tree builder consult.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// How the tokenizer treats an element's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagContentType {
    /// `<script>`, `<style>`: content up to the matching end tag is text,
    /// character references are not decoded.
    RawText,
    /// `<title>`, `<textarea>`: content is text, references are decoded.
    EscapableRawText,
    ParsableData,
}

#[derive(Debug, Clone)]
pub struct HtmlTagDefinition {
    pub is_void: bool,
    pub ignore_first_lf: bool,
    pub content_type: TagContentType,
}

impl HtmlTagDefinition {
    pub fn new() -> Self {
        HtmlTagDefinition {
            is_void: false,
            ignore_first_lf: false,
            content_type: TagContentType::ParsableData,
        }
    }

    pub fn with_void(mut self, is_void: bool) -> Self {
        self.is_void = is_void;
        self
    }

    pub fn with_ignore_first_lf(mut self, ignore: bool) -> Self {
        self.ignore_first_lf = ignore;
        self
    }

    pub fn with_content_type(mut self, content_type: TagContentType) -> Self {
        self.content_type = content_type;
        self
    }
}

impl Default for HtmlTagDefinition {
    fn default() -> Self {
        Self::new()
    }
}

/// Elements that never have content or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link", "meta",
    "param", "source", "track", "wbr",
];

static TAG_DEFINITIONS: Lazy<HashMap<&'static str, HtmlTagDefinition>> = Lazy::new(|| {
    let mut definitions = HashMap::new();
    for tag in VOID_ELEMENTS {
        definitions.insert(*tag, HtmlTagDefinition::new().with_void(true));
    }
    definitions.insert("pre", HtmlTagDefinition::new().with_ignore_first_lf(true));
    definitions.insert("listing", HtmlTagDefinition::new().with_ignore_first_lf(true));
    definitions.insert(
        "textarea",
        HtmlTagDefinition::new()
            .with_ignore_first_lf(true)
            .with_content_type(TagContentType::EscapableRawText),
    );
    definitions.insert(
        "title",
        HtmlTagDefinition::new().with_content_type(TagContentType::EscapableRawText),
    );
    definitions.insert(
        "script",
        HtmlTagDefinition::new().with_content_type(TagContentType::RawText),
    );
    definitions.insert(
        "style",
        HtmlTagDefinition::new().with_content_type(TagContentType::RawText),
    );
    definitions
});

static DEFAULT_TAG_DEFINITION: Lazy<HtmlTagDefinition> = Lazy::new(HtmlTagDefinition::new);

/// Tag names are matched case-sensitively: components are capitalized, and
/// lowering them would turn `<Input>` into a void element.
pub fn get_html_tag_definition(tag_name: &str) -> &'static HtmlTagDefinition {
    TAG_DEFINITIONS
        .get(tag_name)
        .unwrap_or(&DEFAULT_TAG_DEFINITION)
}

pub fn is_void_element(tag_name: &str) -> bool {
    get_html_tag_definition(tag_name).is_void
}
