//! Index checks for decoded blocks.
//!
//! Symbol references must point into `symbols` (0 is `this`) and free or
//! lexical references into `upvars`. The encoder only produces blocks that
//! pass; JSON from elsewhere may not.

use super::format::*;
use super::json::{WireFormatError, WireResult};

impl SerializedTemplateBlock {
    pub fn validate(&self) -> WireResult<()> {
        let check = Check {
            symbols: self.symbols.len(),
            upvars: self.upvars.len(),
        };
        check.statements(&self.statements)
    }
}

struct Check {
    symbols: usize,
    upvars: usize,
}

impl Check {
    fn symbol(&self, symbol: u32) -> WireResult<()> {
        if symbol as usize > self.symbols {
            return Err(WireFormatError::OutOfRange { table: "symbol", index: symbol });
        }
        Ok(())
    }

    /// A symbol other than `this`.
    fn named_symbol(&self, symbol: u32) -> WireResult<()> {
        if symbol == 0 {
            return Err(WireFormatError::OutOfRange { table: "symbol", index: symbol });
        }
        self.symbol(symbol)
    }

    fn upvar(&self, upvar: u32) -> WireResult<()> {
        if upvar as usize >= self.upvars {
            return Err(WireFormatError::OutOfRange { table: "upvar", index: upvar });
        }
        Ok(())
    }

    fn statements(&self, statements: &[Statement]) -> WireResult<()> {
        statements.iter().try_for_each(|statement| self.statement(statement))
    }

    fn statement(&self, statement: &Statement) -> WireResult<()> {
        match statement {
            Statement::Append { value, .. } => self.expr(value),
            Statement::Comment(_) | Statement::OpenElement { .. } | Statement::FlushElement | Statement::CloseElement => {
                Ok(())
            }
            Statement::Block {
                callee,
                params,
                hash,
                blocks,
            } => {
                self.expr(callee)?;
                self.params(params)?;
                self.hash(hash.as_ref())?;
                self.named_blocks(blocks.as_ref())
            }
            Statement::Component {
                tag,
                attrs,
                args,
                blocks,
            } => {
                self.expr(tag)?;
                for attr in attrs.iter().flatten() {
                    self.parameter(attr)?;
                }
                self.hash(args.as_ref())?;
                self.named_blocks(blocks.as_ref())
            }
            Statement::Parameter(parameter) => self.parameter(parameter),
            Statement::Yield { to, positional } => {
                self.named_symbol(*to)?;
                self.params(positional)
            }
            Statement::Debugger { scope } => scope.iter().try_for_each(|symbol| self.named_symbol(*symbol)),
            Statement::If {
                condition,
                block,
                inverse,
            } => {
                self.expr(condition)?;
                self.block(block)?;
                self.optional_block(inverse.as_ref())
            }
            Statement::Each {
                value,
                key,
                block,
                inverse,
            } => {
                self.expr(value)?;
                if let Some(key) = key {
                    self.expr(key)?;
                }
                self.block(block)?;
                self.optional_block(inverse.as_ref())
            }
            Statement::With { value, block, inverse } => {
                self.expr(value)?;
                self.block(block)?;
                self.optional_block(inverse.as_ref())
            }
            Statement::Let { positional, block } => {
                positional.iter().try_for_each(|value| self.expr(value))?;
                self.block(block)
            }
        }
    }

    fn parameter(&self, parameter: &ElementParameter) -> WireResult<()> {
        match parameter {
            ElementParameter::StaticAttr { .. } => Ok(()),
            ElementParameter::DynamicAttr { value, .. } => self.expr(value),
            ElementParameter::AttrSplat { symbol } => self.named_symbol(*symbol),
            ElementParameter::Modifier { callee, params, hash } => {
                self.expr(callee)?;
                self.params(params)?;
                self.hash(hash.as_ref())
            }
        }
    }

    fn block(&self, block: &SerializedInlineBlock) -> WireResult<()> {
        block
            .parameters
            .iter()
            .try_for_each(|symbol| self.named_symbol(*symbol))?;
        self.statements(&block.statements)
    }

    fn optional_block(&self, block: Option<&SerializedInlineBlock>) -> WireResult<()> {
        block.map_or(Ok(()), |block| self.block(block))
    }

    fn named_blocks(&self, blocks: Option<&NamedBlocks>) -> WireResult<()> {
        blocks.map_or(Ok(()), |blocks| blocks.blocks.iter().try_for_each(|block| self.block(block)))
    }

    fn params(&self, params: &Params) -> WireResult<()> {
        params.iter().flatten().try_for_each(|param| self.expr(param))
    }

    fn hash(&self, hash: Option<&Hash>) -> WireResult<()> {
        hash.map_or(Ok(()), |hash| hash.values.iter().try_for_each(|value| self.expr(value)))
    }

    fn expr(&self, expression: &Expression) -> WireResult<()> {
        match expression {
            Expression::Primitive(_) | Expression::Undefined => Ok(()),
            Expression::GetSymbol { symbol, .. } => self.symbol(*symbol),
            Expression::GetLexicalSymbol { upvar, .. } | Expression::GetFree { upvar, .. } => self.upvar(*upvar),
            Expression::Call { callee, params, hash } => {
                self.expr(callee)?;
                self.params(params)?;
                self.hash(hash.as_ref())
            }
            Expression::Concat(parts) => parts.iter().try_for_each(|part| self.expr(part)),
            Expression::HasBlock(target) | Expression::HasBlockParams(target) | Expression::Not(target) => {
                self.expr(target)
            }
            Expression::IfInline {
                condition,
                truthy,
                falsy,
            } => {
                self.expr(condition)?;
                self.expr(truthy)?;
                falsy.as_deref().map_or(Ok(()), |falsy| self.expr(falsy))
            }
            Expression::Log(params) => self.params(params),
        }
    }
}
