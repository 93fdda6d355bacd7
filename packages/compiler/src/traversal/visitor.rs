use crate::v1::{
    AttrNode, Block, BlockStatement, CommentStatement, ElementModifierStatement, ElementNode,
    Expression, HashPair, Literal, MustacheCommentStatement, MustacheStatement, PartialStatement,
    PathExpression, Statement, SubExpression, Template, TextNode,
};

/// What to do with the node a hook was called for.
#[derive(Debug, Clone, PartialEq)]
pub enum VisitAction<T> {
    Keep,
    Remove,
    /// Splice these nodes in. Replacements returned from an enter hook are
    /// visited in turn; replacements from an exit hook are not.
    Replace(Vec<T>),
}

impl<T> Default for VisitAction<T> {
    fn default() -> Self {
        VisitAction::Keep
    }
}

/// Hooks called by [`traverse`](super::traverse). Every hook defaults to
/// keeping the node untouched.
///
/// Statement hooks run before the node's children are visited; the `exit_*`
/// hooks run after. Expression hooks return a replacement expression.
#[allow(unused_variables)]
pub trait NodeVisitor {
    fn enter_template(&mut self, template: &mut Template) {}
    fn exit_template(&mut self, template: &mut Template) {}

    fn enter_block(&mut self, block: &mut Block) {}
    fn exit_block(&mut self, block: &mut Block) {}

    fn element_node(&mut self, node: &mut ElementNode) -> VisitAction<Statement> {
        VisitAction::Keep
    }
    fn exit_element_node(&mut self, node: &mut ElementNode) -> VisitAction<Statement> {
        VisitAction::Keep
    }

    fn block_statement(&mut self, node: &mut BlockStatement) -> VisitAction<Statement> {
        VisitAction::Keep
    }
    fn exit_block_statement(&mut self, node: &mut BlockStatement) -> VisitAction<Statement> {
        VisitAction::Keep
    }

    fn mustache_statement(&mut self, node: &mut MustacheStatement) -> VisitAction<Statement> {
        VisitAction::Keep
    }

    fn text_node(&mut self, node: &mut TextNode) -> VisitAction<Statement> {
        VisitAction::Keep
    }

    fn comment_statement(&mut self, node: &mut CommentStatement) -> VisitAction<Statement> {
        VisitAction::Keep
    }

    fn mustache_comment_statement(&mut self, node: &mut MustacheCommentStatement) -> VisitAction<Statement> {
        VisitAction::Keep
    }

    fn partial_statement(&mut self, node: &mut PartialStatement) -> VisitAction<Statement> {
        VisitAction::Keep
    }

    fn attr_node(&mut self, node: &mut AttrNode) -> VisitAction<AttrNode> {
        VisitAction::Keep
    }

    fn element_modifier_statement(
        &mut self,
        node: &mut ElementModifierStatement,
    ) -> VisitAction<ElementModifierStatement> {
        VisitAction::Keep
    }

    fn hash_pair(&mut self, node: &mut HashPair) -> VisitAction<HashPair> {
        VisitAction::Keep
    }

    fn path_expression(&mut self, node: &mut PathExpression) -> Option<Expression> {
        None
    }

    fn sub_expression(&mut self, node: &mut SubExpression) -> Option<Expression> {
        None
    }

    fn literal(&mut self, node: &mut Literal) -> Option<Expression> {
        None
    }
}
