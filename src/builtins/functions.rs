// ABOUTME: Function-definition and application builtins: defun, lambda,
// ABOUTME: return, apply.

use std::rc::Rc;

use crate::error::{fail, fail_at, EvalResult, Signal};
use crate::eval::{apply_by_name, apply_value, eval, literal_list, to_atom, to_list, Args};
use crate::interpreter::Interpreter;
use crate::scope::Scope;
use crate::value::{Value, ValueRef};

fn require_body(v: ValueRef, function_name: &str) -> Result<Rc<Value>, Signal> {
    v.ok_or_else(|| Signal::Error(crate::error::BaliError::new(format!("{function_name}: Missing body."))))
}

fn read_parameters(expr: &ValueRef) -> Result<Vec<String>, Signal> {
    literal_list(expr)?
        .iter()
        .map(|p| to_atom(p, None))
        .collect()
}

/// `(defun NAME (PARAMS...) BODY)` — name and parameters are read literally
/// (never evaluated); registers the named custom function globally and
/// returns the function value (spec.md §4.6). The function carries no
/// closure scope — its body runs against the *caller's* scope at each
/// invocation (see `eval::call_custom_function`, DESIGN.md).
pub fn defun(args: &mut Args, _scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let (Some(name_expr), Some(params_expr), Some(body_expr)) = (args.next(), args.next(), args.next()) else {
        return fail_at("defun: Not enough arguments.", None);
    };
    if !args.is_empty() {
        return fail_at("defun: Too many arguments.", None);
    }

    let name = to_atom(&name_expr, None)?;
    let parameters = read_parameters(&params_expr)?;
    let body = require_body(body_expr, "defun")?;

    let function = Value::custom_function(Some(name.clone()), parameters, body);
    interp.define_function(name, function.clone());
    Ok(function)
}

/// `(lambda (PARAMS...) BODY)` — anonymous version of `defun`; returns the
/// function value without registering it anywhere.
pub fn lambda(args: &mut Args, _scope: &Rc<Scope>, _interp: &Interpreter) -> EvalResult {
    let (Some(params_expr), Some(body_expr)) = (args.next(), args.next()) else {
        return fail_at("lambda: Not enough arguments.", None);
    };
    if !args.is_empty() {
        return fail_at("lambda: Too many arguments.", None);
    }

    let parameters = read_parameters(&params_expr)?;
    let body = require_body(body_expr, "lambda")?;
    Ok(Value::custom_function(None, parameters, body))
}

/// `(return [value])` — unwinds to the nearest enclosing custom-function
/// call with `value` (or absent), via the dedicated `Signal::Return`
/// carrier distinct from `error` (spec.md §4.6, §7).
pub fn return_(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let value = match args.next() {
        Some(expr) => eval(&expr, scope, interp)?,
        None => None,
    };
    if !args.is_empty() {
        return fail_at("return: Too many arguments.", None);
    }
    Err(Signal::Return(value))
}

/// `(apply f args)` — if `f` evaluates to a function value, calls it with
/// the evaluated `args` list spread as already-constructed values (not
/// re-evaluated); otherwise `f` is coerced to an atom and dispatched
/// through the call table by name (spec.md §4.6, §9).
pub fn apply(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let (Some(function_expr), Some(args_expr)) = (args.next(), args.next()) else {
        return fail_at("apply: Not enough arguments.", None);
    };
    if !args.is_empty() {
        return fail_at("apply: Too many arguments.", None);
    }

    let argument = eval(&function_expr, scope, interp)?;
    let spread = to_list(&args_expr, scope, interp)?;

    match &argument {
        Some(rc) if matches!(rc.as_ref(), Value::Function(_)) => {
            apply_value(rc, spread, scope, interp)
        }
        _ => {
            let name = to_atom(&argument, None)?;
            apply_by_name(&name, spread, scope, interp, None)
        }
    }
}
