// ABOUTME: load and write: the two builtins that cross the process boundary
// ABOUTME: (reading a script file, printing to standard output).

use std::rc::Rc;

use crate::error::{fail_at, BaliError, EvalResult, Signal};
use crate::eval::{eval, to_atom, Args};
use crate::interpreter::Interpreter;
use crate::parser::{decode_utf8, parse_source};
use crate::scope::Scope;
use crate::value::Value;

/// `(load filename)` — reads the named file fully, parses it in whichever
/// surface syntax is currently active, and evaluates each top-level form in
/// the *caller's* scope, in order; returns absent (spec.md §4.6).
pub fn load(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let Some(filename_expr) = args.next() else {
        return fail_at("load: Not enough arguments.", None);
    };
    if !args.is_empty() {
        return fail_at("load: Too many arguments.", None);
    }

    let filename = to_atom(&filename_expr, Some((scope, interp)))?;
    tracing::debug!(filename, "loading script");
    let bytes = crate::fs::read(&filename)
        .map_err(|_| Signal::Error(BaliError::new("Unable to open file")))?;
    let contents = decode_utf8(&bytes)?;

    let forms = parse_source(contents, interp.syntax, 1)?;
    for form in forms {
        eval(&form, scope, interp)?;
    }
    Ok(None)
}

/// `(write value)` — evaluates its argument, prints it followed by a
/// newline, and returns absent.
pub fn write(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let Some(expr) = args.next() else {
        return fail_at("write: Not enough arguments.", None);
    };
    if !args.is_empty() {
        return fail_at("write: Too many arguments.", None);
    }

    let value = eval(&expr, scope, interp)?;
    println!("{}", crate::value::print_value(&value));
    Ok(None)
}
