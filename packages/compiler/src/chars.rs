//! Character constants and predicates shared by the handlebars scanner and
//! the HTML tokenizer.

pub const TAB: char = '\t';
pub const LF: char = '\n';
pub const FF: char = '\x0C';
pub const CR: char = '\r';
pub const SPACE: char = ' ';

pub const BANG: char = '!';
pub const DQ: char = '"';
pub const AMPERSAND: char = '&';
pub const SQ: char = '\'';
pub const LPAREN: char = '(';
pub const RPAREN: char = ')';
pub const MINUS: char = '-';
pub const PERIOD: char = '.';
pub const SLASH: char = '/';
pub const LT: char = '<';
pub const EQ: char = '=';
pub const GT: char = '>';
pub const AT: char = '@';
pub const BACKSLASH: char = '\\';
pub const PIPE: char = '|';

/// HTML whitespace: space, tab, LF, FF and CR.
pub fn is_whitespace(ch: char) -> bool {
    matches!(ch, SPACE | TAB | LF | FF | CR)
}

pub fn is_ascii_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

/// Characters that terminate a handlebars identifier.
///
/// Mirrors the handlebars `ID` token, which excludes whitespace and the
/// punctuation `!"#%&'()*+,./;<=>@[\]^`{|}~`.
pub fn is_id_terminator(ch: char) -> bool {
    is_whitespace(ch)
        || matches!(
            ch,
            '!' | '"'
                | '#'
                | '%'
                | '&'
                | '\''
                | '('
                | ')'
                | '*'
                | '+'
                | ','
                | '.'
                | '/'
                | ';'
                | '<'
                | '='
                | '>'
                | '@'
                | '['
                | '\\'
                | ']'
                | '^'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
        )
}

/// Whether `name` is a valid handlebars identifier.
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(is_id_terminator)
}
