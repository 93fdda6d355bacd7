//! Name interning and attribute namespaces.
//!
//! The most common tag and attribute names are written as their index in a
//! fixed table instead of as strings.

pub const TAG_NAMES: &[&str] = &["div", "span", "p", "a"];
pub const ATTR_NAMES: &[&str] = &["class", "id", "value", "name", "type", "style", "href"];

pub const XLINK: &str = "http://www.w3.org/1999/xlink";
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";

/// A name that is either interned or spelled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deflated<'a> {
    Index(usize),
    Name(&'a str),
}

fn deflate<'a>(table: &[&str], name: &'a str) -> Deflated<'a> {
    match table.iter().position(|entry| *entry == name) {
        Some(index) => Deflated::Index(index),
        None => Deflated::Name(name),
    }
}

pub fn deflate_tag_name(name: &str) -> Deflated<'_> {
    deflate(TAG_NAMES, name)
}

pub fn deflate_attr_name(name: &str) -> Deflated<'_> {
    deflate(ATTR_NAMES, name)
}

pub fn inflate_tag_name(index: usize) -> Option<&'static str> {
    TAG_NAMES.get(index).copied()
}

pub fn inflate_attr_name(index: usize) -> Option<&'static str> {
    ATTR_NAMES.get(index).copied()
}

/// The namespace a foreign attribute lives in, e.g. `xlink:href`.
pub fn attr_namespace(name: &str) -> Option<&'static str> {
    if name.starts_with("xlink:") {
        Some(XLINK)
    } else if name.starts_with("xml:") {
        Some(XML)
    } else if name == "xmlns" || name.starts_with("xmlns:") {
        Some(XMLNS)
    } else {
        None
    }
}
