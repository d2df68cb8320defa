// ABOUTME: Shared low-level scanner (byte/codepoint reading, location
// ABOUTME: tracking, whitespace/comment skipping, escape sequences) used by
// ABOUTME: both the S-expression and M-expression parsers.

pub mod mexpr;
pub mod sexpr;

use crate::error::{BaliError, Signal};
use crate::value::Location;

/// Which surface syntax is in use — recorded so `load` (spec.md §4.6) can
/// re-enter the parser with the syntax currently active, per SPEC_FULL.md's
/// "load re-enters the parser for the surface syntax currently active".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    SExpression,
    MExpression,
}

/// Validates `input` as UTF-8, reporting an invalid sequence's byte offset
/// translated into a 1-based (line, column), per spec.md §4.3 ("an
/// incomplete or invalid sequence fails with the offending position").
pub fn decode_utf8(input: &[u8]) -> Result<&str, Signal> {
    std::str::from_utf8(input).map_err(|e| {
        let offset = e.valid_up_to();
        let (line, column) = line_column_at(input, offset);
        Signal::Error(BaliError::at(
            "Invalid UTF-8 sequence.",
            Some(Location { line, column }),
        ))
    })
}

/// `char::from_u32` already excludes surrogates and values past U+10FFFF;
/// this adds the "non-character" exclusions spec.md §4.3 also names
/// (`\uXXXX` "rejects surrogates, non-characters, and values > U+10FFFF"),
/// mirroring the `isvalid` check `original_source/src/parser.cpp` delegates
/// to an external Unicode library for.
fn is_valid_codepoint(value: u32) -> bool {
    !((0xFDD0..=0xFDEF).contains(&value) || (value & 0xFFFE) == 0xFFFE)
}

fn line_column_at(input: &[u8], offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for &b in &input[..offset.min(input.len())] {
        if b == b'\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// Parses the optional `#!...\n` shebang (only on the very first line, once
/// per input, not per top-level value) and returns the remainder plus the
/// number of lines it occupied.
fn skip_shebang(input: &str) -> (&str, usize) {
    if let Some(rest) = input.strip_prefix("#!") {
        if let Some(idx) = rest.find('\n') {
            return (&rest[idx + 1..], 2);
        }
        return ("", 1);
    }
    (input, 1)
}

/// The one true top-level entry point: strips an optional shebang once
/// (not per top-level value, see SPEC_FULL.md) and dispatches to the
/// surface-syntax-specific form parser.
pub fn parse_source(
    input: &str,
    syntax: Syntax,
    start_line: usize,
) -> Result<Vec<crate::value::ValueRef>, Signal> {
    let (body, lines_skipped) = skip_shebang(input);
    let line = start_line + lines_skipped - 1;
    match syntax {
        Syntax::SExpression => sexpr::parse_forms(body, line),
        Syntax::MExpression => mexpr::parse_forms(body, line),
    }
}

/// A cursor over a `&str`'s characters, tracking 1-based line/column.
pub struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    pub line: usize,
    pub column: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str, line: usize) -> Self {
        Scanner {
            chars: input.chars().peekable(),
            line,
            column: 1,
        }
    }

    pub fn eof(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    pub fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    pub fn read(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    pub fn peek_read(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.read();
            true
        } else {
            false
        }
    }

    pub fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.column,
        }
    }

    /// Skips whitespace and `comment_char`-to-end-of-line comments.
    pub fn skip_whitespace(&mut self, comment_char: char) {
        loop {
            if self.peek_read(comment_char) {
                while !self.eof() {
                    if self.peek() == Some('\n') || self.peek() == Some('\r') {
                        break;
                    }
                    self.read();
                }
            } else if self.peek().is_some_and(|c| c.is_whitespace()) {
                self.read();
            } else {
                return;
            }
        }
    }

    /// Parses one escape sequence after a `\` has already been consumed.
    /// Supports `\b \t \n \f \r \" \' \\ \/` and `\uXXXX` (4 hex digits;
    /// rejects surrogates, non-characters, and values > U+10FFFF).
    pub fn parse_escape_sequence(&mut self) -> Result<char, Signal> {
        let start = self.location();

        let Some(c) = self.read() else {
            return Err(Signal::Error(BaliError::at(
                "Unexpected end of input; Missing escape sequence.",
                Some(start),
            )));
        };

        match c {
            'b' => Ok('\u{8}'),
            't' => Ok('\t'),
            'n' => Ok('\n'),
            'f' => Ok('\u{c}'),
            'r' => Ok('\r'),
            '"' | '\'' | '\\' | '/' => Ok(c),
            'u' => {
                let mut value: u32 = 0;
                for _ in 0..4 {
                    let Some(digit) = self.peek() else {
                        return Err(Signal::Error(BaliError::at(
                            "Unterminated escape sequence.",
                            Some(start),
                        )));
                    };
                    let Some(nibble) = digit.to_digit(16) else {
                        return Err(Signal::Error(BaliError::at(
                            "Illegal Unicode hex escape sequence.",
                            Some(start),
                        )));
                    };
                    self.read();
                    value = value * 16 + nibble;
                }
                match char::from_u32(value).filter(|_| is_valid_codepoint(value)) {
                    Some(ch) => Ok(ch),
                    None => Err(Signal::Error(BaliError::at(
                        "Illegal Unicode hex escape sequence.",
                        Some(start),
                    ))),
                }
            }
            _ => Err(Signal::Error(BaliError::at(
                "Illegal escape sequence.",
                Some(self.location()),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_shebang_removes_first_line_only() {
        assert_eq!(skip_shebang("#!/usr/bin/bali\n(+ 1 2)").0, "(+ 1 2)");
        assert_eq!(skip_shebang("(+ 1 2)").0, "(+ 1 2)");
    }

    #[test]
    fn parse_source_skips_shebang_once_for_sexpr() {
        let forms = parse_source("#!/usr/bin/bali\n(+ 1 2) (* 3 4)", Syntax::SExpression, 1)
            .expect("should parse");
        assert_eq!(forms.len(), 2);
    }

    #[test]
    fn decode_utf8_reports_offending_position() {
        let bad = [b'a', b'\n', 0xff];
        let err = decode_utf8(&bad).unwrap_err();
        match err {
            Signal::Error(e) => assert_eq!(e.to_string(), "2:2: Invalid UTF-8 sequence."),
            _ => panic!("expected error signal"),
        }
    }

    #[test]
    fn escape_rejects_surrogate_halves() {
        let mut s = Scanner::new("d800", 1);
        let err = s.parse_escape_sequence().unwrap_err();
        match err {
            Signal::Error(e) => assert!(e.to_string().contains("Illegal Unicode hex escape")),
            _ => panic!("expected error"),
        }
    }

    #[test]
    fn escape_rejects_non_characters() {
        let mut s = Scanner::new("ffff", 1);
        let err = s.parse_escape_sequence().unwrap_err();
        match err {
            Signal::Error(e) => assert!(e.to_string().contains("Illegal Unicode hex escape")),
            _ => panic!("expected error"),
        }
    }

    #[test]
    fn escape_accepts_ordinary_codepoint() {
        let mut s = Scanner::new("0041", 1);
        assert_eq!(s.parse_escape_sequence().unwrap(), 'A');
    }

    #[test]
    fn scanner_tracks_line_and_column() {
        let mut s = Scanner::new("ab\ncd", 1);
        s.read();
        s.read();
        assert_eq!((s.line, s.column), (1, 3));
        s.read();
        assert_eq!((s.line, s.column), (2, 1));
    }
}
