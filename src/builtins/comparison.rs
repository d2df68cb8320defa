// ABOUTME: Relational builtins: =, <, >, <=, >=. Each chains across all
// ABOUTME: arguments; the empty and single-argument cases are vacuously true.

use std::rc::Rc;

use crate::error::EvalResult;
use crate::eval::{to_number, Args};
use crate::interpreter::Interpreter;
use crate::scope::Scope;
use crate::value::Value;

fn compare(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter, relation: fn(f64, f64) -> bool) -> EvalResult {
    let Some(first) = args.next() else {
        return Ok(Value::boolean(true));
    };
    let mut previous = to_number(&first, scope, interp)?;

    while let Some(expr) = args.next() {
        let current = to_number(&expr, scope, interp)?;
        if !relation(previous, current) {
            // Still consume the rest: every argument is evaluated once,
            // left to right, even once the chain has already failed.
            while let Some(expr) = args.next() {
                to_number(&expr, scope, interp)?;
            }
            return Ok(Value::boolean(false));
        }
        previous = current;
    }
    Ok(Value::boolean(true))
}

pub fn eq(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    compare(args, scope, interp, |a, b| a == b)
}

pub fn lt(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    compare(args, scope, interp, |a, b| a < b)
}

pub fn gt(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    compare(args, scope, interp, |a, b| a > b)
}

pub fn le(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    compare(args, scope, interp, |a, b| a <= b)
}

pub fn ge(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    compare(args, scope, interp, |a, b| a >= b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::eval;
    use crate::parser::sexpr::parse_forms;
    use crate::parser::Syntax;
    use crate::value::print_value;

    fn run(source: &str) -> String {
        let interp = Interpreter::new(Syntax::SExpression);
        let forms = parse_forms(source, 1).unwrap();
        print_value(&eval(&forms[0], &interp.top_level, &interp).unwrap())
    }

    #[test]
    fn chain_less_than() {
        assert_eq!(run("(< 1 2 3)"), "true");
        assert_eq!(run("(< 1 3 2)"), "nil");
    }

    #[test]
    fn empty_and_single_are_true() {
        assert_eq!(run("(<)"), "true");
        assert_eq!(run("(< 5)"), "true");
    }

    #[test]
    fn equality_chain() {
        assert_eq!(run("(= 1 1 1)"), "true");
        assert_eq!(run("(= 1 1 2)"), "nil");
    }

    #[test]
    fn greater_or_equal() {
        assert_eq!(run("(>= 3 3 2)"), "true");
    }
}
