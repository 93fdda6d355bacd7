//! Regenerates template source from an AST v1 tree.

use super::nodes::*;
use crate::parser::tags::is_void_element;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityEncoding {
    /// Text is written as stored. Use for ASTs parsed in codemod mode, where
    /// character references were never decoded.
    #[default]
    Raw,
    /// `&`, `<`, `>`, `"` and non-breaking spaces are re-encoded.
    Transformed,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PrinterOptions {
    pub entity_encoding: EntityEncoding,
}

pub fn print(template: &Template, options: PrinterOptions) -> String {
    let mut printer = Printer {
        buffer: String::new(),
        options,
    };
    printer.statements(&template.body);
    printer.buffer
}

struct Printer {
    buffer: String,
    options: PrinterOptions,
}

impl Printer {
    fn statements(&mut self, statements: &[Statement]) {
        for statement in statements {
            self.statement(statement);
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Mustache(mustache) => self.mustache(mustache),
            Statement::Block(block) => self.block_statement(block),
            Statement::Partial(partial) => {
                self.buffer.push_str("{{>");
                self.buffer.push_str(&partial.name);
                self.buffer.push_str("}}");
            }
            Statement::MustacheComment(comment) => self.mustache_comment(comment),
            Statement::Text(text) => {
                let chars = self.escape_text(&text.chars);
                self.buffer.push_str(&chars);
            }
            Statement::Element(element) => self.element(element),
            Statement::Comment(comment) => {
                self.buffer.push_str("<!--");
                self.buffer.push_str(&comment.value);
                self.buffer.push_str("-->");
            }
        }
    }

    fn element(&mut self, element: &ElementNode) {
        self.buffer.push('<');
        self.buffer.push_str(&element.tag);
        for attr in &element.attributes {
            self.buffer.push(' ');
            self.attribute(attr);
        }
        for modifier in &element.modifiers {
            self.buffer.push_str(" {{");
            self.call(&modifier.path, &modifier.params, &modifier.hash);
            self.buffer.push_str("}}");
        }
        for comment in &element.comments {
            self.buffer.push(' ');
            self.mustache_comment(comment);
        }
        if !element.block_params.is_empty() {
            self.buffer.push_str(" as |");
            self.buffer.push_str(&join_params(&element.block_params));
            self.buffer.push('|');
        }
        if element.self_closing {
            self.buffer.push_str(" /");
        }
        self.buffer.push('>');

        if element.self_closing || is_void_element(&element.tag) {
            return;
        }
        self.statements(&element.children);
        self.buffer.push_str("</");
        self.buffer.push_str(&element.tag);
        self.buffer.push('>');
    }

    fn attribute(&mut self, attr: &AttrNode) {
        self.buffer.push_str(&attr.name);
        match &attr.value {
            AttrValue::Text(text) if text.chars.is_empty() => {}
            AttrValue::Text(text) => {
                let chars = self.escape_attr_value(&text.chars);
                self.buffer.push_str("=\"");
                self.buffer.push_str(&chars);
                self.buffer.push('"');
            }
            AttrValue::Mustache(mustache) => {
                self.buffer.push('=');
                self.mustache(mustache);
            }
            AttrValue::Concat(concat) => {
                self.buffer.push_str("=\"");
                for part in &concat.parts {
                    match part {
                        ConcatPart::Text(text) => {
                            let chars = self.escape_attr_value(&text.chars);
                            self.buffer.push_str(&chars);
                        }
                        ConcatPart::Mustache(mustache) => self.mustache(mustache),
                    }
                }
                self.buffer.push('"');
            }
        }
    }

    fn mustache(&mut self, mustache: &MustacheStatement) {
        self.buffer.push_str(if mustache.trusting { "{{{" } else { "{{" });
        self.open_strip(mustache.strip);
        self.call(&mustache.path, &mustache.params, &mustache.hash);
        self.close_strip(mustache.strip);
        self.buffer.push_str(if mustache.trusting { "}}}" } else { "}}" });
    }

    fn block_statement(&mut self, block: &BlockStatement) {
        self.buffer.push_str("{{");
        self.open_strip(block.open_strip);
        self.buffer.push('#');
        self.call(&block.path, &block.params, &block.hash);
        self.block_params(&block.program);
        self.close_strip(block.open_strip);
        self.buffer.push_str("}}");
        self.block_body(block);
        self.buffer.push_str("{{");
        self.open_strip(block.close_strip);
        self.buffer.push('/');
        self.expression(&block.path);
        self.close_strip(block.close_strip);
        self.buffer.push_str("}}");
    }

    /// The program and any `{{else}}` / `{{else if}}` branches of a block.
    fn block_body(&mut self, block: &BlockStatement) {
        self.statements(&block.program.body);
        let Some(inverse) = &block.inverse else {
            return;
        };
        self.buffer.push_str("{{");
        self.open_strip(block.inverse_strip);
        self.buffer.push_str("else");
        match (inverse.chained, inverse.body.first()) {
            (true, Some(Statement::Block(chained))) => {
                self.buffer.push(' ');
                self.call(&chained.path, &chained.params, &chained.hash);
                self.block_params(&chained.program);
                self.close_strip(block.inverse_strip);
                self.buffer.push_str("}}");
                self.block_body(chained);
            }
            _ => {
                self.close_strip(block.inverse_strip);
                self.buffer.push_str("}}");
                self.statements(&inverse.body);
            }
        }
    }

    fn block_params(&mut self, program: &Block) {
        if !program.params.is_empty() {
            self.buffer.push_str(" as |");
            self.buffer.push_str(&join_params(&program.params));
            self.buffer.push('|');
        }
    }

    fn mustache_comment(&mut self, comment: &MustacheCommentStatement) {
        if comment.long {
            self.buffer.push_str("{{!--");
            self.buffer.push_str(&comment.value);
            self.buffer.push_str("--}}");
        } else {
            self.buffer.push_str("{{!");
            self.buffer.push_str(&comment.value);
            self.buffer.push_str("}}");
        }
    }

    fn call(&mut self, path: &Expression, params: &[Expression], hash: &Hash) {
        self.expression(path);
        for param in params {
            self.buffer.push(' ');
            self.expression(param);
        }
        for pair in &hash.pairs {
            self.buffer.push(' ');
            self.buffer.push_str(&pair.key);
            self.buffer.push('=');
            self.expression(&pair.value);
        }
    }

    fn expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Path(path) => self.buffer.push_str(&path.original()),
            Expression::SubExpression(sexpr) => {
                self.buffer.push('(');
                self.call(&sexpr.path, &sexpr.params, &sexpr.hash);
                self.buffer.push(')');
            }
            Expression::Literal(literal) => match &literal.value {
                LiteralValue::String(value) => {
                    self.buffer.push('"');
                    self.buffer.push_str(&value.replace('"', "\\\""));
                    self.buffer.push('"');
                }
                LiteralValue::Boolean(value) => self.buffer.push_str(&value.to_string()),
                LiteralValue::Number(value) => self.buffer.push_str(&format_number(*value)),
                LiteralValue::Null => self.buffer.push_str("null"),
                LiteralValue::Undefined => self.buffer.push_str("undefined"),
            },
        }
    }

    fn open_strip(&mut self, strip: StripFlags) {
        if strip.contains(StripFlags::OPEN) {
            self.buffer.push('~');
        }
    }

    fn close_strip(&mut self, strip: StripFlags) {
        if strip.contains(StripFlags::CLOSE) {
            self.buffer.push('~');
        }
    }

    fn escape_text(&self, text: &str) -> String {
        match self.options.entity_encoding {
            EntityEncoding::Raw => text.to_string(),
            EntityEncoding::Transformed => text
                .replace('&', "&amp;")
                .replace('\u{a0}', "&nbsp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;"),
        }
    }

    fn escape_attr_value(&self, text: &str) -> String {
        match self.options.entity_encoding {
            EntityEncoding::Raw => text.to_string(),
            EntityEncoding::Transformed => text
                .replace('&', "&amp;")
                .replace('\u{a0}', "&nbsp;")
                .replace('"', "&quot;"),
        }
    }
}

fn join_params(params: &[VarHead]) -> String {
    params
        .iter()
        .map(|param| param.name.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats a number the way it would be written in a template: integral
/// values without a fractional part.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
