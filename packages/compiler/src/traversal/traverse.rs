use super::visitor::{NodeVisitor, VisitAction};
use crate::v1::{
    AttrValue, Block, ConcatPart, Expression, Hash, Statement, Template,
};

/// Walks `template` depth first in source order, applying `visitor`.
pub fn traverse(template: &mut Template, visitor: &mut dyn NodeVisitor) {
    visitor.enter_template(template);
    visit_statements(&mut template.body, visitor);
    visitor.exit_template(template);
}

fn visit_statements(list: &mut Vec<Statement>, visitor: &mut dyn NodeVisitor) {
    let mut index = 0;
    while index < list.len() {
        match enter_statement(&mut list[index], visitor) {
            VisitAction::Keep => {}
            VisitAction::Remove => {
                list.remove(index);
                continue;
            }
            VisitAction::Replace(nodes) => {
                list.splice(index..=index, nodes);
                continue;
            }
        }

        visit_statement_children(&mut list[index], visitor);

        match exit_statement(&mut list[index], visitor) {
            VisitAction::Keep => index += 1,
            VisitAction::Remove => {
                list.remove(index);
            }
            VisitAction::Replace(nodes) => {
                let count = nodes.len();
                list.splice(index..=index, nodes);
                index += count;
            }
        }
    }
}

fn enter_statement(statement: &mut Statement, visitor: &mut dyn NodeVisitor) -> VisitAction<Statement> {
    match statement {
        Statement::Mustache(node) => visitor.mustache_statement(node),
        Statement::Block(node) => visitor.block_statement(node),
        Statement::Partial(node) => visitor.partial_statement(node),
        Statement::MustacheComment(node) => visitor.mustache_comment_statement(node),
        Statement::Text(node) => visitor.text_node(node),
        Statement::Element(node) => visitor.element_node(node),
        Statement::Comment(node) => visitor.comment_statement(node),
    }
}

fn exit_statement(statement: &mut Statement, visitor: &mut dyn NodeVisitor) -> VisitAction<Statement> {
    match statement {
        Statement::Block(node) => visitor.exit_block_statement(node),
        Statement::Element(node) => visitor.exit_element_node(node),
        _ => VisitAction::Keep,
    }
}

fn visit_statement_children(statement: &mut Statement, visitor: &mut dyn NodeVisitor) {
    match statement {
        Statement::Mustache(node) => visit_call(&mut node.path, &mut node.params, &mut node.hash, visitor),
        Statement::Block(node) => {
            visit_call(&mut node.path, &mut node.params, &mut node.hash, visitor);
            visit_block(&mut node.program, visitor);
            if let Some(inverse) = node.inverse.as_mut() {
                visit_block(inverse, visitor);
            }
        }
        Statement::Element(node) => {
            visit_list(&mut node.attributes, visitor, |visitor, attr| visitor.attr_node(attr), |visitor, attr| {
                visit_attr_value(&mut attr.value, visitor)
            });
            visit_list(
                &mut node.modifiers,
                visitor,
                |visitor, modifier| visitor.element_modifier_statement(modifier),
                |visitor, modifier| visit_call(&mut modifier.path, &mut modifier.params, &mut modifier.hash, visitor),
            );
            visit_statements(&mut node.children, visitor);
        }
        Statement::Partial(_) | Statement::MustacheComment(_) | Statement::Text(_) | Statement::Comment(_) => {}
    }
}

fn visit_block(block: &mut Block, visitor: &mut dyn NodeVisitor) {
    visitor.enter_block(block);
    visit_statements(&mut block.body, visitor);
    visitor.exit_block(block);
}

/// Enter-only walk over a node list: replacements are visited in turn.
fn visit_list<T>(
    list: &mut Vec<T>,
    visitor: &mut dyn NodeVisitor,
    enter: fn(&mut dyn NodeVisitor, &mut T) -> VisitAction<T>,
    children: fn(&mut dyn NodeVisitor, &mut T),
) {
    let mut index = 0;
    while index < list.len() {
        match enter(visitor, &mut list[index]) {
            VisitAction::Keep => {
                children(visitor, &mut list[index]);
                index += 1;
            }
            VisitAction::Remove => {
                list.remove(index);
            }
            VisitAction::Replace(nodes) => {
                list.splice(index..=index, nodes);
            }
        }
    }
}

fn visit_attr_value(value: &mut AttrValue, visitor: &mut dyn NodeVisitor) {
    match value {
        AttrValue::Text(_) => {}
        AttrValue::Mustache(node) => visit_call(&mut node.path, &mut node.params, &mut node.hash, visitor),
        AttrValue::Concat(concat) => {
            for part in concat.parts.iter_mut() {
                if let ConcatPart::Mustache(node) = part {
                    visit_call(&mut node.path, &mut node.params, &mut node.hash, visitor);
                }
            }
        }
    }
}

fn visit_call(path: &mut Expression, params: &mut [Expression], hash: &mut Hash, visitor: &mut dyn NodeVisitor) {
    visit_expression(path, visitor);
    for param in params.iter_mut() {
        visit_expression(param, visitor);
    }
    visit_list(
        &mut hash.pairs,
        visitor,
        |visitor, pair| visitor.hash_pair(pair),
        |visitor, pair| visit_expression(&mut pair.value, visitor),
    );
}

fn visit_expression(expression: &mut Expression, visitor: &mut dyn NodeVisitor) {
    let replacement = match expression {
        Expression::Path(path) => visitor.path_expression(path),
        Expression::SubExpression(sexpr) => {
            visit_call(&mut sexpr.path, &mut sexpr.params, &mut sexpr.hash, visitor);
            visitor.sub_expression(sexpr)
        }
        Expression::Literal(literal) => visitor.literal(literal),
    };
    if let Some(replacement) = replacement {
        *expression = replacement;
    }
}
