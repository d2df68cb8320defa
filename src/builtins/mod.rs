// ABOUTME: The builtin dispatcher: the name -> callback table and the
// ABOUTME: `BuiltinFn` calling convention every primitive implements.

mod arithmetic;
mod binding;
mod comparison;
mod functions;
mod lists;
mod logic;
mod misc;

use std::rc::Rc;

use crate::error::EvalResult;
use crate::eval::Args;
use crate::interpreter::Interpreter;
use crate::scope::Scope;

/// A builtin receives the caller's scope, the interpreter instance, and an
/// iterator over its *unevaluated* argument expressions — it decides for
/// itself how many to consume and whether/when to evaluate each one, which
/// is how special forms (`if`, `quote`, `setq`, ...) differ from ordinary
/// functions (spec.md §4.5).
pub type BuiltinFn = fn(&mut Args, &Rc<Scope>, &Interpreter) -> EvalResult;

/// The complete primitive vocabulary (spec.md §4.6). Custom-function lookup
/// happens before this is consulted; see `Interpreter::call_function`.
pub fn lookup(name: &str) -> Option<BuiltinFn> {
    Some(match name {
        "+" => arithmetic::add,
        "-" => arithmetic::subtract,
        "*" => arithmetic::multiply,
        "/" => arithmetic::divide,
        "=" => comparison::eq,
        "<" => comparison::lt,
        ">" => comparison::gt,
        "<=" => comparison::le,
        ">=" => comparison::ge,
        "length" => lists::length,
        "cons" => lists::cons,
        "car" => lists::car,
        "cdr" => lists::cdr,
        "list" => lists::list,
        "append" => lists::append,
        "filter" => lists::filter,
        "map" => lists::map,
        "not" => logic::not,
        "and" => logic::and,
        "or" => logic::or,
        "if" => logic::if_,
        "setq" => binding::setq,
        "let" => binding::let_form,
        "quote" => binding::quote,
        "apply" => functions::apply,
        "defun" => functions::defun,
        "lambda" => functions::lambda,
        "return" => functions::return_,
        "load" => misc::load,
        "write" => misc::write,
        _ => return None,
    })
}
