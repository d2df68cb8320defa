// ABOUTME: The evaluator: variable resolution, application protocol, and the
// ABOUTME: five coercion helpers builtins use to pull typed values out of
// ABOUTME: unevaluated argument expressions.

use std::rc::Rc;

use crate::error::{fail, fail_at, EvalResult, Signal};
use crate::interpreter::Interpreter;
use crate::scope::Scope;
use crate::utils::is_number;
use crate::value::{Function, Value, ValueRef};

/// An iterator over a call's unevaluated argument expressions, handed to
/// builtins so the dispatcher decides nothing about arity or evaluation
/// order up front — the builtin does, per spec.md §4.5's fexpr design.
pub struct Args<'a> {
    items: &'a [ValueRef],
    pos: usize,
}

impl<'a> Args<'a> {
    pub fn new(items: &'a [ValueRef]) -> Self {
        Args { items, pos: 0 }
    }

    pub fn next(&mut self) -> Option<ValueRef> {
        let item = self.items.get(self.pos)?.clone();
        self.pos += 1;
        Some(item)
    }

    /// Consumes and returns every remaining argument expression, in order.
    pub fn rest(&mut self) -> Vec<ValueRef> {
        let rest = self.items[self.pos..].to_vec();
        self.pos = self.items.len();
        rest
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.items.len()
    }
}

/// `eval(value, scope) -> value`, per spec.md §4.5.
pub fn eval(expr: &ValueRef, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let Some(rc) = expr else {
        return Ok(None);
    };

    match rc.as_ref() {
        Value::Atom(atom) => {
            if let Some(bound) = scope.get(&atom.symbol) {
                return Ok(bound);
            }
            if atom.symbol == "nil" {
                return Ok(None);
            }
            Ok(Some(Rc::clone(rc)))
        }
        Value::List(list) => {
            if list.elements.is_empty() {
                return Ok(Some(Rc::clone(rc)));
            }
            let name = to_atom(&list.elements[0], Some((scope, interp)))?;
            let mut args = Args::new(&list.elements[1..]);
            interp.call_function(&name, &mut args, scope, rc.position())
        }
        Value::Function(_) => Ok(Some(Rc::clone(rc))),
    }
}

/// `to_atom(v, scope)`. The special case named in spec.md §4.5 — `to_atom(x,
/// None)` skips evaluation entirely — is `ctx: None` here; binding forms
/// (`let`, `defun`, `lambda`, `setq`'s name argument) read parameter and
/// variable names this way so they are never looked up as variables.
pub fn to_atom(v: &ValueRef, ctx: Option<(&Rc<Scope>, &Interpreter)>) -> Result<String, Signal> {
    let resolved = match ctx {
        Some((scope, interp)) => eval(v, scope, interp)?,
        None => v.clone(),
    };
    match &resolved {
        Some(rc) => match rc.as_ref() {
            Value::Atom(atom) => Ok(atom.symbol.clone()),
            _ => fail_at("Value is not an atom.", rc.position()),
        },
        None => fail_at("Value is not an atom.", v.as_ref().and_then(|v| v.position())),
    }
}

/// `to_bool(v, scope)`. Absent is false; everything else — including the
/// empty list and the atom `0` — is true (spec.md §4.5's explicit
/// correction to `original_source`'s empty-list-is-falsy behaviour).
pub fn to_bool(v: &ValueRef, scope: &Rc<Scope>, interp: &Interpreter) -> Result<bool, Signal> {
    Ok(eval(v, scope, interp)?.is_some())
}

/// `to_list(v, scope)`.
pub fn to_list(v: &ValueRef, scope: &Rc<Scope>, interp: &Interpreter) -> Result<Vec<ValueRef>, Signal> {
    let resolved = eval(v, scope, interp)?;
    match &resolved {
        Some(rc) => match rc.as_ref() {
            Value::List(list) => Ok(list.elements.clone()),
            _ => fail_at("Value is not a list.", rc.position()),
        },
        None => fail_at("Value is not a list.", v.as_ref().and_then(|v| v.position())),
    }
}

/// `to_number(v, scope)`.
pub fn to_number(v: &ValueRef, scope: &Rc<Scope>, interp: &Interpreter) -> Result<f64, Signal> {
    let resolved = eval(v, scope, interp)?;
    if let Some(rc) = &resolved {
        if let Value::Atom(atom) = rc.as_ref() {
            if is_number(&atom.symbol) {
                if let Ok(n) = atom.symbol.parse::<f64>() {
                    return Ok(n);
                }
            }
        }
    }
    fail_at("Value is not a number.", v.as_ref().and_then(|v| v.position()))
}

/// `to_function(v, scope)`.
pub fn to_function(v: &ValueRef, scope: &Rc<Scope>, interp: &Interpreter) -> Result<Rc<Value>, Signal> {
    let resolved = eval(v, scope, interp)?;
    match resolved {
        Some(rc) if matches!(rc.as_ref(), Value::Function(_)) => Ok(rc),
        _ => fail_at("Value is not a function.", v.as_ref().and_then(|v| v.position())),
    }
}

/// Reads a literal (unevaluated) list node's elements — used for `let`
/// bindings and `defun`/`lambda` parameter lists, which are inspected as
/// syntax, never evaluated as code.
pub fn literal_list(v: &ValueRef) -> Result<&[ValueRef], Signal> {
    match v {
        Some(rc) => match rc.as_ref() {
            Value::List(list) => Ok(&list.elements),
            _ => fail_at("Value is not a list.", rc.position()),
        },
        None => fail("Value is not a list."),
    }
}

/// The custom-function application protocol (spec.md §4.5): arity-checks
/// already-evaluated `args` against the parameter list, binds them in a
/// child scope (skipped when there are no parameters), evaluates the body,
/// and catches a `return` unwind aimed at exactly this call.
///
/// `scope` is the *caller's* scope, not a scope captured at definition time:
/// per `original_source/src/value.cpp`'s `function::call`, the function's
/// scope is parented on whatever scope the call happens in, giving dynamic
/// rather than lexical scoping (see DESIGN.md's Open Questions).
pub fn call_custom_function(
    function: &ValueRef,
    args: Vec<ValueRef>,
    scope: &Rc<Scope>,
    interp: &Interpreter,
) -> EvalResult {
    let Some(rc) = function else {
        return fail("Value is not a function.");
    };
    let Value::Function(Function::Custom {
        parameters, body, ..
    }) = rc.as_ref()
    else {
        return fail("Value is not a function.");
    };

    if args.len() < parameters.len() {
        return fail("Not enough arguments");
    }
    if args.len() > parameters.len() {
        return fail("Too many arguments");
    }

    let call_scope = if parameters.is_empty() {
        Rc::clone(scope)
    } else {
        let child = Scope::with_parent(scope);
        for (name, value) in parameters.iter().zip(args.into_iter()) {
            child.let_(name.clone(), value);
        }
        child
    };

    match eval(&Some(Rc::clone(body)), &call_scope, interp) {
        Err(Signal::Return(value)) => Ok(value),
        other => other,
    }
}

/// Wraps an already-evaluated value in `(quote value)` so a builtin can
/// receive it through the ordinary "unevaluated expression" calling
/// convention and get back exactly that value, unevaluated, per `apply`'s
/// contract that spread arguments "are not re-evaluated" (spec.md §4.6/§9).
fn quote_wrap(value: ValueRef) -> ValueRef {
    Value::list(vec![Value::atom("quote"), value])
}

/// Calls a resolved function value with already-evaluated argument values —
/// used by `apply` (when its first argument evaluates to a function) and by
/// `map`/`filter` (which call their function argument once per element).
pub fn apply_value(
    function: &Rc<Value>,
    args: Vec<ValueRef>,
    scope: &Rc<Scope>,
    interp: &Interpreter,
) -> EvalResult {
    match function.as_ref() {
        Value::Function(Function::Custom { .. }) => {
            call_custom_function(&Some(Rc::clone(function)), args, scope, interp)
        }
        Value::Function(Function::Builtin { callback, .. }) => {
            let quoted: Vec<ValueRef> = args.into_iter().map(quote_wrap).collect();
            let mut wrapped = Args::new(&quoted);
            callback(&mut wrapped, scope, interp)
        }
        _ => fail("Value is not a function."),
    }
}

/// Dispatches by name through the call table (custom functions, then
/// builtins) with already-evaluated argument values — `apply`'s fallback
/// when its first argument evaluates to something other than a function
/// value (spec.md §4.6: "else treat as a function name").
pub fn apply_by_name(
    name: &str,
    args: Vec<ValueRef>,
    scope: &Rc<Scope>,
    interp: &Interpreter,
    position: crate::value::Position,
) -> EvalResult {
    let quoted: Vec<ValueRef> = args.into_iter().map(quote_wrap).collect();
    let mut wrapped = Args::new(&quoted);
    interp.call_function(name, &mut wrapped, scope, position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::sexpr::parse_forms;
    use crate::parser::Syntax;
    use crate::value::print_value;

    fn run(source: &str) -> ValueRef {
        let interp = Interpreter::new(Syntax::SExpression);
        let forms = parse_forms(source, 1).expect("parse");
        let mut result = None;
        for form in forms {
            result = eval(&form, &interp.top_level, &interp).expect("eval");
        }
        result
    }

    #[test]
    fn unbound_atom_evaluates_to_itself() {
        assert_eq!(print_value(&run("foo")), "foo");
    }

    #[test]
    fn nil_symbol_is_absent() {
        assert!(run("nil").is_none());
    }

    #[test]
    fn quote_returns_unevaluated() {
        assert_eq!(print_value(&run("(quote (+ 1 2))")), "(+ 1 2)");
    }

    #[test]
    fn empty_list_evaluates_to_itself() {
        assert_eq!(print_value(&run("()")), "()");
    }

    #[test]
    fn lambda_application() {
        // A lambda value is not an atom, so it cannot sit in call-head
        // position directly (`eval_list` resolves the head via `to_atom`,
        // spec.md §4.5); `apply` is how an anonymous function is actually
        // invoked, matching `original_source`'s behaviour.
        assert_eq!(
            print_value(&run("(apply (lambda (x) (* x x)) (list 5))")),
            "25"
        );
    }

    #[test]
    fn not_enough_arguments_fails() {
        let interp = Interpreter::new(Syntax::SExpression);
        let forms = parse_forms("(defun f (a b) a) (f 1)", 1).unwrap();
        let mut result = Ok(None);
        for form in &forms {
            result = eval(form, &interp.top_level, &interp);
        }
        match result {
            Err(Signal::Error(e)) => assert_eq!(e.to_string(), "Not enough arguments"),
            other => panic!("expected arity error, got {other:?}"),
        }
    }

    #[test]
    fn too_many_arguments_fails() {
        let interp = Interpreter::new(Syntax::SExpression);
        let forms = parse_forms("(defun f (a) a) (f 1 2)", 1).unwrap();
        let mut result = Ok(None);
        for form in &forms {
            result = eval(form, &interp.top_level, &interp);
        }
        match result {
            Err(Signal::Error(e)) => assert_eq!(e.to_string(), "Too many arguments"),
            other => panic!("expected arity error, got {other:?}"),
        }
    }

    #[test]
    fn return_unwinds_to_enclosing_call() {
        assert_eq!(
            print_value(&run("(defun f () (return 1) 2) (f)")),
            "1"
        );
    }

    #[test]
    fn zero_parameter_call_reuses_callers_scope() {
        // A zero-parameter custom function's body runs directly in the
        // caller's scope rather than an empty child scope, per spec.md §3
        // ("Scopes are created by ... every invocation of a custom function
        // that has at least one parameter").
        assert_eq!(print_value(&run("(defun f () (setq x 1) x) (f) x")), "1");
    }

    #[test]
    fn custom_function_scoping_is_dynamic_not_lexical() {
        // Per `original_source/src/value.cpp`'s `function::call`, a custom
        // function carries no closure: its body is evaluated against the
        // *caller's* scope at invocation time. `f` is defined inside the
        // `let` where `x` is bound to `5`, but called afterwards at the top
        // level, where `x` is unbound — so `x` self-evaluates to the atom
        // `x`, not `5`.
        assert_eq!(
            print_value(&run("(let ((x 5)) (defun f () x)) (f)")),
            "x"
        );
    }
}
