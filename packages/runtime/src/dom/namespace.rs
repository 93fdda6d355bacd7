use glimmer_compiler::wire_format::names::{XLINK, XML, XMLNS};

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Foreign attributes HTML syntax can express, with the namespace each one
/// is written in. Any other colon is an ordinary character.
const ADJUST_FOREIGN_ATTRIBUTES: &[(&str, &str)] = &[
    ("xlink:actuate", XLINK),
    ("xlink:arcrole", XLINK),
    ("xlink:href", XLINK),
    ("xlink:role", XLINK),
    ("xlink:show", XLINK),
    ("xlink:title", XLINK),
    ("xlink:type", XLINK),
    ("xml:base", XML),
    ("xml:lang", XML),
    ("xml:space", XML),
    ("xmlns", XMLNS),
    ("xmlns:xlink", XMLNS),
];

/// The namespace `name` must be set in, if it is one of the adjusted
/// foreign attributes.
pub fn adjust_attribute(name: &str) -> Option<&'static str> {
    ADJUST_FOREIGN_ATTRIBUTES
        .iter()
        .find(|(attribute, _)| *attribute == name)
        .map(|(_, namespace)| *namespace)
}

/// The namespace a `tag` element gets when created inside a parent in
/// `parent_namespace` whose tag is `parent_tag`.
pub fn child_namespace(tag: &str, parent_tag: Option<&str>, parent_namespace: Option<&str>) -> Option<&'static str> {
    if tag == "svg" {
        return Some(SVG_NAMESPACE);
    }
    match (parent_namespace, parent_tag) {
        (Some(SVG_NAMESPACE), Some(parent)) if parent != "foreignObject" => Some(SVG_NAMESPACE),
        _ => None,
    }
}
