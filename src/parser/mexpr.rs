// ABOUTME: M-expression parser: tokeniser plus a precedence-climbing
// ABOUTME: recursive descent that desugars infix/bracketed syntax into the
// ABOUTME: same S-expression value tree.

use crate::error::{BaliError, Signal};
use crate::parser::Scanner;
use crate::value::{Location, Value, ValueRef};

const COMMENT_CHAR: char = '#';

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Atom(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Arrow,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    location: Location,
}

impl TokenKind {
    fn describe(&self) -> &'static str {
        match self {
            TokenKind::Atom(_) => "atom",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Arrow => "'<='",
        }
    }
}

/// Per spec.md §9: any byte that isn't a separator, `#`, `+`, `-`, `*`, `/`,
/// `=`, or `"` is an identifier byte — this crate mirrors that literally
/// rather than guessing at dot/digit/Unicode-punctuation refinements.
fn is_symbol_char(c: char) -> bool {
    !matches!(
        c,
        '(' | ')' | '[' | ']' | ',' | ';' | '#' | '+' | '-' | '*' | '/' | '=' | '"'
    )
}

fn tokenize(s: &mut Scanner) -> Result<Vec<Token>, Signal> {
    let mut tokens = Vec::new();
    loop {
        s.skip_whitespace(COMMENT_CHAR);
        if s.eof() {
            break;
        }
        let location = s.location();

        let kind = if s.peek_read('(') {
            TokenKind::LParen
        } else if s.peek_read(')') {
            TokenKind::RParen
        } else if s.peek_read('[') {
            TokenKind::LBracket
        } else if s.peek_read(']') {
            TokenKind::RBracket
        } else if s.peek_read(',') {
            TokenKind::Comma
        } else if s.peek_read(';') {
            TokenKind::Semicolon
        } else if s.peek_read('<') {
            if s.peek_read('=') {
                TokenKind::Atom("<=".to_string())
            } else {
                TokenKind::Atom("<".to_string())
            }
        } else if s.peek_read('>') {
            if s.peek_read('=') {
                TokenKind::Atom(">=".to_string())
            } else {
                TokenKind::Atom(">".to_string())
            }
        } else if s.peek_read('-') {
            if s.peek_read('>') {
                TokenKind::Arrow
            } else {
                TokenKind::Atom("-".to_string())
            }
        } else {
            let mut buffer = String::new();
            if s.peek_read('"') {
                loop {
                    if s.eof() {
                        return Err(Signal::Error(BaliError::at(
                            "Unterminated string: Missing '\"'.",
                            Some(location),
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
                    if s.eof() || !s.peek().is_some_and(is_symbol_char) {
                        break;
                    }
                }
            }
            TokenKind::Atom(buffer)
        };

        tokens.push(Token { kind, location });
    }
    Ok(tokens)
}

struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_is(&self, kind: &TokenKind) -> bool {
        self.peek().is_some_and(|t| &t.kind == kind)
    }

    fn peek_read(&mut self, kind: &TokenKind) -> bool {
        if self.peek_is(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn peek_atom(&self, symbol: &str) -> bool {
        matches!(&self.peek().map(|t| &t.kind), Some(TokenKind::Atom(s)) if s == symbol)
    }

    fn peek_read_atom(&mut self, symbol: &str) -> bool {
        if self.peek_atom(symbol) {
            self.pos += 1;
            true
        } else {
            false
        }
    }
}

fn parse_list(c: &mut Cursor) -> Result<Vec<ValueRef>, Signal> {
    let location = c.peek().map(|t| t.location).unwrap_or(Location { line: 0, column: 0 });
    c.pos += 1; // consume '['
    let mut result = Vec::new();

    if c.peek_read(&TokenKind::RBracket) {
        return Ok(result);
    }
    loop {
        result.push(parse_expression(c)?);
        if c.peek_read(&TokenKind::RBracket) {
            return Ok(result);
        }
        if c.peek_read(&TokenKind::Semicolon) {
            continue;
        }
        return Err(Signal::Error(BaliError::at(
            "Unterminated list, missing ']'.",
            Some(location),
        )));
    }
}

fn parse_primary(c: &mut Cursor) -> Result<ValueRef, Signal> {
    let Some(token) = c.peek() else {
        return Err(Signal::Error(BaliError::new(
            "Unexpected end of input, missing expression.",
        )));
    };
    let location = token.location;

    if c.peek_read(&TokenKind::LParen) {
        let mut elements = Vec::new();
        if !c.peek_read(&TokenKind::RParen) {
            loop {
                elements.push(parse_expression(c)?);
                if c.peek_read(&TokenKind::RParen) {
                    break;
                }
                if c.peek_read(&TokenKind::Comma) {
                    continue;
                }
                return Err(Signal::Error(BaliError::at(
                    "Unterminated list, missing ')'.",
                    Some(location),
                )));
            }
        }
        return Ok(Value::list_at(
            vec![
                Value::atom_at("quote", Some(location)),
                Value::list_at(elements, Some(location)),
            ],
            Some(location),
        ));
    }

    if c.peek_is(&TokenKind::LBracket) {
        let elements = parse_list(c)?;
        return Ok(Value::list_at(
            vec![
                Value::atom_at("quote", Some(location)),
                Value::list_at(elements, Some(location)),
            ],
            Some(location),
        ));
    }

    if let Some(Token {
        kind: TokenKind::Atom(symbol),
        ..
    }) = c.peek()
    {
        let symbol = symbol.clone();
        c.pos += 1;
        let atom = Value::atom_at(symbol.clone(), Some(location));

        if c.peek_is(&TokenKind::LBracket) {
            let mut arguments = parse_list(c)?;

            if c.peek_read_atom("<=") {
                let body = parse_expression(c)?;
                return Ok(Value::list_at(
                    vec![
                        Value::atom_at("defun", Some(location)),
                        atom,
                        Value::list_at(arguments, Some(location)),
                        body,
                    ],
                    Some(location),
                ));
            }

            arguments.insert(
                0,
                Value::list_at(
                    vec![Value::atom_at("quote", Some(location)), atom],
                    Some(location),
                ),
            );
            return Ok(Value::list_at(arguments, Some(location)));
        }

        return Ok(atom);
    }

    Err(Signal::Error(BaliError::at(
        format!(
            "Unexpected {}, missing expression.",
            c.peek().unwrap().kind.describe()
        ),
        Some(location),
    )))
}

fn parse_operator(
    c: &mut Cursor,
    operators: &[&str],
    next: fn(&mut Cursor) -> Result<ValueRef, Signal>,
) -> Result<ValueRef, Signal> {
    let mut expression = next(c)?;
    let expr_location = expression.as_ref().and_then(|v| v.position());

    loop {
        let matched = operators.iter().find(|op| c.peek_atom(op));
        let Some(op) = matched else {
            return Ok(expression);
        };
        let location = c.peek().unwrap().location;
        let atom = Value::atom_at(op.to_string(), Some(location));
        c.pos += 1;
        let rhs = next(c)?;
        expression = Value::list_at(vec![atom, expression, rhs], expr_location);
    }
}

fn parse_multiplicative(c: &mut Cursor) -> Result<ValueRef, Signal> {
    parse_operator(c, &["*", "/"], parse_primary)
}

fn parse_additive(c: &mut Cursor) -> Result<ValueRef, Signal> {
    parse_operator(c, &["+", "-"], parse_multiplicative)
}

fn parse_relational(c: &mut Cursor) -> Result<ValueRef, Signal> {
    parse_operator(c, &["<", ">", "<=", ">="], parse_additive)
}

fn parse_expression(c: &mut Cursor) -> Result<ValueRef, Signal> {
    parse_operator(c, &["="], parse_relational)
}

/// Parses a sequence of top-level M-expression values from `input`, with no
/// shebang handling (see `parser::parse_source`).
pub fn parse_forms(input: &str, start_line: usize) -> Result<Vec<ValueRef>, Signal> {
    let mut scanner = Scanner::new(input, start_line);
    let tokens = tokenize(&mut scanner)?;
    let mut cursor = Cursor {
        tokens: &tokens,
        pos: 0,
    };
    let mut values = Vec::new();
    while cursor.pos < cursor.tokens.len() {
        values.push(parse_expression(&mut cursor)?);
    }
    Ok(values)
}
