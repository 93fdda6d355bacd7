//! `as |a b|` block params on element start tags.
//!
//! The HTML tokenizer has no notion of block params: `as |a b|` arrives as
//! the attributes `as`, `|a` and `b|`. This module takes them back out of the
//! attribute list and validates their shape.

use crate::chars;
use crate::source::{Source, SourceSpan};
use crate::syntax_error::{SyntaxError, SyntaxErrorCode, SyntaxResult};
use crate::v1::{AttrNode, VarHead};

/// An attribute as the tree builder collected it.
#[derive(Debug, Clone)]
pub(crate) struct PendingAttribute {
    pub node: AttrNode,
    /// Written without `=`, e.g. `disabled` or `as`.
    pub valueless: bool,
}

impl PendingAttribute {
    fn is_as(&self) -> bool {
        self.valueless && self.node.name == "as"
    }

    fn opens_pipe(&self) -> bool {
        self.node.name.starts_with(chars::PIPE)
    }
}

/// Splits block params off the end of an attribute list.
pub(crate) fn take_block_params(
    attributes: Vec<PendingAttribute>,
    source: &Source,
) -> SyntaxResult<(Vec<AttrNode>, Vec<VarHead>)> {
    let as_index = attributes.iter().position(PendingAttribute::is_as);
    let pipe_index = attributes.iter().position(PendingAttribute::opens_pipe);

    let error = |code: SyntaxErrorCode, span: SourceSpan| SyntaxError::new(code, span, source);

    let as_index = match (as_index, pipe_index) {
        (None, None) => {
            return Ok((attributes.into_iter().map(|attr| attr.node).collect(), Vec::new()));
        }
        (None, Some(pipe)) => return Err(missing_as(&attributes[pipe..], source)),
        (Some(as_index), Some(pipe)) if pipe < as_index => {
            return Err(missing_as(&attributes[pipe..], source));
        }
        (Some(as_index), pipe) if pipe != Some(as_index + 1) => {
            return Err(error(
                SyntaxErrorCode::BlockParamsMissingPipe,
                attributes[as_index].node.loc,
            ));
        }
        (Some(as_index), _) => as_index,
    };

    let mut params = Vec::new();
    let mut closed_at = None;
    let mut trailing_in_last = String::new();

    for (index, attr) in attributes.iter().enumerate().skip(as_index + 1) {
        if !attr.valueless {
            return Err(error(
                SyntaxErrorCode::BlockParamsInvalidId(attr.node.name.clone()),
                attr.node.loc,
            ));
        }

        let name = attr.node.name.as_str();
        let start = attr.node.loc.start;
        let (body, body_start) = if index == as_index + 1 {
            (&name[1..], start + 1)
        } else {
            (name, start)
        };

        let (param, rest) = match body.find(chars::PIPE) {
            Some(close) => (&body[..close], Some(&body[close + 1..])),
            None => (body, None),
        };

        if !param.is_empty() {
            if !chars::is_identifier(param) {
                return Err(error(
                    SyntaxErrorCode::BlockParamsInvalidId(param.to_string()),
                    SourceSpan::new(body_start, body_start + param.len()),
                ));
            }
            params.push(VarHead {
                name: param.to_string(),
                local: true,
                loc: SourceSpan::new(body_start, body_start + param.len()),
            });
        }

        if let Some(rest) = rest {
            closed_at = Some(index);
            trailing_in_last = rest.to_string();
            break;
        }
    }

    let pipe_span = attributes[as_index].node.loc.extend(
        attributes
            .last()
            .map(|attr| attr.node.loc)
            .unwrap_or(attributes[as_index].node.loc),
    );

    let Some(closed_at) = closed_at else {
        return Err(error(SyntaxErrorCode::BlockParamsUnclosed, pipe_span));
    };

    if params.is_empty() {
        return Err(error(SyntaxErrorCode::BlockParamsEmpty, pipe_span));
    }

    let mut trailing: Vec<&str> = attributes[closed_at + 1..]
        .iter()
        .map(|attr| attr.node.name.as_str())
        .collect();
    if !trailing_in_last.is_empty() {
        trailing.insert(0, &trailing_in_last);
    }
    if !trailing.is_empty() {
        let pipes = trailing.iter().filter(|name| name.contains(chars::PIPE)).count();
        let code = if pipes == 0 {
            SyntaxErrorCode::BlockParamsExtraAttrs
        } else if pipes == trailing.len() && trailing.iter().all(|name| name.chars().all(|ch| ch == chars::PIPE)) {
            SyntaxErrorCode::BlockParamsExtraPipes
        } else {
            SyntaxErrorCode::BlockParamsExtraPipesAndAttrs
        };
        let start = attributes[closed_at].node.loc.end;
        return Err(error(code, pipe_span.with_start(start)));
    }

    let attrs = attributes
        .into_iter()
        .take(as_index)
        .map(|attr| attr.node)
        .collect();
    Ok((attrs, params))
}

fn missing_as(from_pipe: &[PendingAttribute], source: &Source) -> SyntaxError {
    let closed = from_pipe
        .iter()
        .enumerate()
        .any(|(index, attr)| {
            let name = if index == 0 { &attr.node.name[1..] } else { attr.node.name.as_str() };
            name.contains(chars::PIPE)
        });
    let code = if closed {
        SyntaxErrorCode::BlockParamsMissingAs
    } else {
        SyntaxErrorCode::BlockParamsMissingAsBeforeUnclosedPipe
    };
    SyntaxError::new(code, from_pipe[0].node.loc, source)
}
