// ABOUTME: The two non-local control carriers (error, function-return) plus
// ABOUTME: the structured, source-chained error used at the process boundary.

use std::fmt;

use thiserror::Error;

use crate::value::{Position, ValueRef};

/// The `error` carrier: a message plus independently-optional (line, column),
/// per spec.md §7 and `error.hpp`'s `m_line`/`m_column`. `line` is set
/// without `column` when an error is raised from a location that only
/// tracked line (a `ValueRef`'s `Position` always carries both when
/// present, since the parser tracks them together, but construction errors
/// may legitimately carry only a line).
#[derive(Debug, Clone)]
pub struct BaliError {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl BaliError {
    pub fn new(message: impl Into<String>) -> Self {
        BaliError {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn at(message: impl Into<String>, position: Position) -> Self {
        match position {
            Some(loc) => BaliError {
                message: message.into(),
                line: Some(loc.line),
                column: Some(loc.column),
            },
            None => BaliError::new(message),
        }
    }

    pub fn at_line(message: impl Into<String>, line: usize) -> Self {
        BaliError {
            message: message.into(),
            line: Some(line),
            column: None,
        }
    }
}

impl fmt::Display for BaliError {
    /// `line:column: message` / `line: message` / `message`, per spec.md §6.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, "{line}:{column}: {}", self.message),
            (Some(line), None) => write!(f, "{line}: {}", self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for BaliError {}

/// The two distinct non-local control transfers named in spec.md §7,
/// threaded through `Result` rather than thrown, per the "explicit result
/// tagged {value|return|error}" design spec.md §9 sanctions as equivalent
/// to stack-unwinding.
#[derive(Debug, Clone)]
pub enum Signal {
    Error(BaliError),
    Return(ValueRef),
}

impl From<BaliError> for Signal {
    fn from(e: BaliError) -> Self {
        Signal::Error(e)
    }
}

pub type EvalResult = Result<ValueRef, Signal>;

/// Shorthand for raising a plain `error` signal.
pub fn fail<T>(message: impl Into<String>) -> Result<T, Signal> {
    Err(Signal::Error(BaliError::new(message)))
}

pub fn fail_at<T>(message: impl Into<String>, position: Position) -> Result<T, Signal> {
    Err(Signal::Error(BaliError::at(message, position)))
}

/// The structured, source-chained error surfaced at the CLI/script-driver
/// boundary, in the teacher's `thiserror`-derived idiom (`src/error.rs`'s
/// `EvalError`) — distinct from `BaliError`, which is a carried interpreter
/// value, not a diagnostic type.
#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("{0}")]
    Eval(#[from] BaliError),

    #[error("Unexpected 'return'.")]
    UnexpectedReturn,

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
