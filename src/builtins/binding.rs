// ABOUTME: Binding-form builtins: setq, let, quote. All three read at least
// ABOUTME: one argument literally rather than evaluating it as code.

use std::rc::Rc;

use crate::error::{fail, fail_at, EvalResult};
use crate::eval::{eval, literal_list, to_atom, Args};
use crate::interpreter::Interpreter;
use crate::scope::Scope;
use crate::value::Value;

/// `(setq name value)` — the name is taken literally (`to_atom(_, None)`,
/// per spec.md §9's explicit "no computed assignment targets" note);
/// `value` is evaluated and assigned to the nearest enclosing binding, or
/// created in the current scope if none exists.
pub fn setq(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let (Some(name_expr), Some(value_expr)) = (args.next(), args.next()) else {
        return fail_at("setq: Not enough arguments.", None);
    };
    if !args.is_empty() {
        return fail_at("setq: Too many arguments.", None);
    }

    let name = to_atom(&name_expr, None)?;
    let value = eval(&value_expr, scope, interp)?;
    scope.set(&name, value.clone());
    Ok(value)
}

/// `(let ((name expr)...) body...)` — bindings are literal list syntax, not
/// evaluated as code; each binding expression is evaluated in the *outer*
/// scope, then bound into a single new child scope the body runs in.
pub fn let_form(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let Some(bindings_expr) = args.next() else {
        return fail_at("let: Not enough arguments.", None);
    };
    let bindings = literal_list(&bindings_expr)?;
    let child = Scope::with_parent(scope);

    for binding in bindings {
        match binding {
            Some(rc) => match rc.as_ref() {
                Value::Atom(atom) => child.let_(atom.symbol.clone(), None),
                Value::List(list) if list.elements.len() == 2 => {
                    let name = to_atom(&list.elements[0], None)?;
                    let value = eval(&list.elements[1], scope, interp)?;
                    child.let_(name, value);
                }
                _ => return fail("Malformed 'let' binding."),
            },
            None => return fail("Malformed 'let' binding."),
        }
    }

    let mut result = None;
    while let Some(form) = args.next() {
        result = eval(&form, &child, interp)?;
    }
    Ok(result)
}

/// `(quote value)` — returns its argument exactly as written, unevaluated.
pub fn quote(args: &mut Args, _scope: &Rc<Scope>, _interp: &Interpreter) -> EvalResult {
    let Some(expr) = args.next() else {
        return fail_at("quote: Not enough arguments.", None);
    };
    if !args.is_empty() {
        return fail_at("quote: Too many arguments.", None);
    }
    Ok(expr)
}
