// ABOUTME: Boolean builtins: not, and, or, if. and/or/if are special forms
// ABOUTME: — they evaluate only as many branches as needed.

use std::rc::Rc;

use crate::error::{fail_at, EvalResult};
use crate::eval::{eval, to_bool, Args};
use crate::interpreter::Interpreter;
use crate::scope::Scope;
use crate::value::Value;

pub fn not(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let Some(arg) = args.next() else {
        return fail_at("not: Not enough arguments.", None);
    };
    Ok(Value::boolean(!to_bool(&arg, scope, interp)?))
}

pub fn and(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let mut result = Value::boolean(true);
    while let Some(expr) = args.next() {
        result = eval(&expr, scope, interp)?;
        if result.is_none() {
            return Ok(result);
        }
    }
    Ok(result)
}

pub fn or(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    while let Some(expr) = args.next() {
        let result = eval(&expr, scope, interp)?;
        if result.is_some() {
            return Ok(result);
        }
    }
    Ok(Value::boolean(false))
}

pub fn if_(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let Some(condition) = args.next() else {
        return fail_at("if: Not enough arguments.", None);
    };
    let Some(then_branch) = args.next() else {
        return fail_at("if: Not enough arguments.", None);
    };
    let else_branch = args.next();
    if !args.is_empty() {
        return fail_at("if: Too many arguments.", None);
    }

    if to_bool(&condition, scope, interp)? {
        eval(&then_branch, scope, interp)
    } else {
        eval(&else_branch, scope, interp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::sexpr::parse_forms;
    use crate::parser::Syntax;
    use crate::value::print_value;

    fn run(source: &str) -> String {
        let interp = Interpreter::new(Syntax::SExpression);
        let forms = parse_forms(source, 1).unwrap();
        print_value(&eval(&forms[0], &interp.top_level, &interp).unwrap())
    }

    #[test]
    fn not_negates() {
        assert_eq!(run("(not nil)"), "true");
        assert_eq!(run("(not true)"), "nil");
    }

    #[test]
    fn and_short_circuits() {
        assert_eq!(run("(and 1 nil 3)"), "nil");
        assert_eq!(run("(and 1 2 3)"), "3");
    }

    #[test]
    fn empty_and_is_true() {
        assert_eq!(run("(and)"), "true");
    }

    #[test]
    fn or_short_circuits() {
        assert_eq!(run("(or nil 2 3)"), "2");
    }

    #[test]
    fn empty_or_is_false() {
        assert_eq!(run("(or)"), "nil");
    }

    #[test]
    fn if_picks_branch() {
        assert_eq!(run("(if (> 5 3) (quote yes) (quote no))"), "yes");
        assert_eq!(run("(if nil (quote yes) (quote no))"), "no");
    }

    #[test]
    fn if_without_else_is_nil() {
        assert_eq!(run("(if nil (quote yes))"), "nil");
    }
}
