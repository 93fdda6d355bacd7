//! Whitespace control: `~` stripping and standalone-line removal.
//!
//! A block, `{{else}}`, comment or partial that sits alone on its line is
//! "standalone": the indentation before it and the newline after it are
//! removed so the template's own structure does not leak into the output.

use super::{Content, HbsBlock, HbsStatement, Program};
use crate::assertions::existing;
use crate::v1::StripFlags;

/// How a statement wants the content around it stripped.
#[derive(Debug, Default, Clone, Copy)]
struct Strip {
    open: bool,
    close: bool,
    open_standalone: bool,
    close_standalone: bool,
    inline_standalone: bool,
}

pub fn apply_whitespace_control(program: &mut Program) {
    visit_program(program, true);
}

fn visit_program(program: &mut Program, is_root: bool) {
    let body = &mut program.body;
    for i in 0..body.len() {
        let Some(strip) = visit_statement(&mut body[i]) else {
            continue;
        };

        let prev_whitespace = is_prev_whitespace(body, Some(i), is_root);
        let next_whitespace = is_next_whitespace(body, Some(i), is_root);
        let open_standalone = strip.open_standalone && prev_whitespace;
        let close_standalone = strip.close_standalone && next_whitespace;
        let inline_standalone = strip.inline_standalone && prev_whitespace && next_whitespace;

        if strip.close {
            omit_right(body, Some(i), true);
        }
        if strip.open {
            omit_left(body, Some(i), true);
        }

        if inline_standalone {
            omit_right(body, Some(i), false);
            omit_left(body, Some(i), false);
        }

        if open_standalone {
            if let HbsStatement::Block(block) = &mut body[i] {
                omit_right(&mut block.program.body, None, false);
            }
            omit_left(body, Some(i), false);
        }

        if close_standalone {
            omit_right(body, Some(i), false);
            if let HbsStatement::Block(block) = &mut body[i] {
                let last = last_program(block);
                omit_left(&mut last.body, None, false);
            }
        }
    }
}

fn visit_statement(statement: &mut HbsStatement) -> Option<Strip> {
    match statement {
        HbsStatement::Content(_) => None,
        HbsStatement::Mustache(mustache) => Some(Strip {
            open: mustache.strip.contains(StripFlags::OPEN),
            close: mustache.strip.contains(StripFlags::CLOSE),
            ..Strip::default()
        }),
        HbsStatement::Comment(comment) => Some(Strip {
            open: comment.strip.contains(StripFlags::OPEN),
            close: comment.strip.contains(StripFlags::CLOSE),
            inline_standalone: true,
            ..Strip::default()
        }),
        HbsStatement::Partial(partial) => Some(Strip {
            open: partial.strip.contains(StripFlags::OPEN),
            close: partial.strip.contains(StripFlags::CLOSE),
            inline_standalone: true,
            ..Strip::default()
        }),
        HbsStatement::Block(block) => Some(visit_block(block)),
    }
}

fn visit_block(block: &mut HbsBlock) -> Strip {
    visit_program(&mut block.program, false);
    if let Some(inverse) = &mut block.inverse {
        visit_program(inverse, false);
    }

    let strip = Strip {
        open: block.open_strip.contains(StripFlags::OPEN),
        close: block.close_strip.contains(StripFlags::CLOSE),
        open_standalone: is_next_whitespace(&block.program.body, None, false),
        close_standalone: is_prev_whitespace(&first_inverse_or_program(block).body, None, false),
        inline_standalone: false,
    };

    if block.open_strip.contains(StripFlags::CLOSE) {
        omit_right(&mut block.program.body, None, true);
    }

    if block.inverse.is_some() {
        let inverse_strip = block.inverse_strip;
        let close_strip = block.close_strip;
        if inverse_strip.contains(StripFlags::OPEN) {
            omit_left(&mut block.program.body, None, true);
        }
        if inverse_strip.contains(StripFlags::CLOSE) {
            omit_right(&mut first_inverse_or_program(block).body, None, true);
        }
        if close_strip.contains(StripFlags::OPEN) {
            omit_left(&mut last_program(block).body, None, true);
        }

        // a standalone `{{else}}`
        if is_prev_whitespace(&block.program.body, None, false)
            && is_next_whitespace(&first_inverse_or_program(block).body, None, false)
        {
            omit_left(&mut block.program.body, None, false);
            omit_right(&mut first_inverse_or_program(block).body, None, false);
        }
    } else if block.close_strip.contains(StripFlags::OPEN) {
        omit_left(&mut block.program.body, None, true);
    }

    strip
}

/// The program right after the `{{else}}`: for an `{{else if}}` chain this is
/// the chained block's own program.
fn first_inverse_or_program(block: &mut HbsBlock) -> &mut Program {
    if block.inverse.is_none() {
        return &mut block.program;
    }
    let inverse = existing(block.inverse.as_mut(), "inverse program");
    if is_chain(inverse) {
        &mut chained_block(inverse).program
    } else {
        inverse
    }
}

/// The program that ends right before the closing `{{/name}}`.
fn last_program(block: &mut HbsBlock) -> &mut Program {
    if block.inverse.is_none() {
        return &mut block.program;
    }
    let inverse = existing(block.inverse.as_mut(), "inverse program");
    if is_chain(inverse) {
        last_program(chained_block(inverse))
    } else {
        inverse
    }
}

fn is_chain(program: &Program) -> bool {
    program.chained && matches!(program.body.first(), Some(HbsStatement::Block(_)))
}

fn chained_block(program: &mut Program) -> &mut HbsBlock {
    let block = match program.body.first_mut() {
        Some(HbsStatement::Block(block)) => Some(block),
        _ => None,
    };
    existing(block, "chained block")
}

fn content(statement: Option<&HbsStatement>) -> Option<&Content> {
    match statement {
        Some(HbsStatement::Content(content)) => Some(content),
        _ => None,
    }
}

fn is_prev_whitespace(body: &[HbsStatement], i: Option<usize>, is_root: bool) -> bool {
    let i = i.unwrap_or(body.len());
    if i == 0 {
        return is_root;
    }
    let has_sibling = i >= 2;
    match content(body.get(i - 1)) {
        Some(prev) => ends_with_line_break(&prev.original, has_sibling || !is_root),
        None => false,
    }
}

fn is_next_whitespace(body: &[HbsStatement], i: Option<usize>, is_root: bool) -> bool {
    let next_index = i.map(|i| i + 1).unwrap_or(0);
    let Some(next) = body.get(next_index) else {
        return is_root;
    };
    let has_sibling = body.get(next_index + 1).is_some();
    match content(Some(next)) {
        Some(next) => starts_with_line_break(&next.original, has_sibling || !is_root),
        None => false,
    }
}

/// `/\r?\n\s*?$/` when `require_newline`, otherwise `/(^|\r?\n)\s*?$/`.
fn ends_with_line_break(text: &str, require_newline: bool) -> bool {
    let trimmed = text.trim_end_matches(|ch: char| ch.is_whitespace() && ch != '\n');
    if trimmed.ends_with('\n') {
        return true;
    }
    !require_newline && trimmed.is_empty()
}

/// `/^\s*?\r?\n/` when `require_newline`, otherwise `/^\s*?(\r?\n|$)/`.
fn starts_with_line_break(text: &str, require_newline: bool) -> bool {
    let trimmed = text.trim_start_matches(|ch: char| ch.is_whitespace() && ch != '\n' && ch != '\r');
    if trimmed.starts_with('\n') || trimmed.starts_with("\r\n") {
        return true;
    }
    !require_newline && trimmed.is_empty()
}

/// Strips whitespace from the start of the content right of `i` (or the
/// first statement when `i` is `None`).
fn omit_right(body: &mut [HbsStatement], i: Option<usize>, multiple: bool) {
    let index = i.map(|i| i + 1).unwrap_or(0);
    let Some(HbsStatement::Content(current)) = body.get_mut(index) else {
        return;
    };
    if !multiple && current.right_stripped {
        return;
    }
    let original_len = current.value.len();
    let stripped = if multiple {
        current.value.trim_start().to_string()
    } else {
        strip_leading_line(&current.value).to_string()
    };
    let removed = original_len - stripped.len();
    current.value = stripped;
    current.value_start += removed;
    current.right_stripped = removed > 0;
}

/// Strips whitespace from the end of the content left of `i` (or the last
/// statement when `i` is `None`). Returns whether anything was removed.
fn omit_left(body: &mut [HbsStatement], i: Option<usize>, multiple: bool) -> bool {
    let index = match i {
        Some(0) => return false,
        Some(i) => i - 1,
        None => match body.len() {
            0 => return false,
            len => len - 1,
        },
    };
    let Some(HbsStatement::Content(current)) = body.get_mut(index) else {
        return false;
    };
    if !multiple && current.left_stripped {
        return false;
    }
    let original_len = current.value.len();
    let stripped = if multiple {
        current.value.trim_end().to_string()
    } else {
        current.value.trim_end_matches([' ', '\t']).to_string()
    };
    current.left_stripped = stripped.len() != original_len;
    current.value = stripped;
    current.left_stripped
}

/// `/^[ \t]*\r?\n?/`
fn strip_leading_line(text: &str) -> &str {
    let rest = text.trim_start_matches([' ', '\t']);
    let rest = rest.strip_prefix('\r').filter(|r| r.starts_with('\n')).unwrap_or(rest);
    rest.strip_prefix('\n').unwrap_or(rest)
}
