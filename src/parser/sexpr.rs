// ABOUTME: Classical parenthesised-prefix S-expression parser: a single
// ABOUTME: left-to-right pass producing a sequence of top-level values.

use crate::error::{BaliError, Signal};
use crate::parser::Scanner;
use crate::value::{Value, ValueRef};

const COMMENT_CHAR: char = ';';

/// Separator bytes that terminate a bare (unquoted) atom.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == COMMENT_CHAR || c == '(' || c == ')' || c == '\''
}

fn parse_value(s: &mut Scanner) -> Result<ValueRef, Signal> {
    s.skip_whitespace(COMMENT_CHAR);
    let start = s.location();

    if s.eof() {
        return Err(Signal::Error(BaliError::at(
            "Unexpected end of input, missing token.",
            Some(start),
        )));
    }

    if s.peek_read('(') {
        let mut elements = Vec::new();
        loop {
            s.skip_whitespace(COMMENT_CHAR);
            if s.eof() {
                return Err(Signal::Error(BaliError::at(
                    "Unterminated list: Missing ')'.",
                    Some(start),
                )));
            }
            if s.peek_read(')') {
                break;
            }
            elements.push(parse_value(s)?);
        }
        return Ok(Value::list_at(elements, Some(start)));
    }

    if s.peek_read('\'') {
        let quoted = parse_value(s)?;
        return Ok(Value::list_at(
            vec![Value::atom_at("quote", Some(start)), quoted],
            Some(start),
        ));
    }

    let mut buffer = String::new();
    if s.peek_read('"') {
        loop {
            if s.eof() {
                return Err(Signal::Error(BaliError::at(
                    "Unterminated string: Missing '\"'.",
                    Some(start),
                )));
            }
            if s.peek_read('"') {
                break;
            }
            if s.peek_read('\\') {
                buffer.push(s.parse_escape_sequence()?);
            } else {
                buffer.push(s.read().expect("checked not eof"));
            }
        }
    } else {
        loop {
            if s.peek_read('\\') {
                buffer.push(s.parse_escape_sequence()?);
            } else {
                buffer.push(s.read().expect("checked not eof"));
            }
            if s.eof() || s.peek().is_some_and(is_separator) {
                break;
            }
        }
    }

    Ok(Value::atom_at(buffer, Some(start)))
}

/// Parses a sequence of top-level S-expression values from `input`, with no
/// shebang handling (that's `parser::parse_source`'s job, run once per
/// whole script rather than per top-level value).
pub fn parse_forms(input: &str, start_line: usize) -> Result<Vec<ValueRef>, Signal> {
    let mut s = Scanner::new(input, start_line);
    let mut values = Vec::new();
    loop {
        s.skip_whitespace(COMMENT_CHAR);
        if s.eof() {
            return Ok(values);
        }
        values.push(parse_value(&mut s)?);
    }
}
