// ABOUTME: The interpreter-level state object: top-level scope, the global
// ABOUTME: custom-function registry, and the active surface syntax — kept as
// ABOUTME: an explicit instance (spec.md §9) rather than hidden module state,
// ABOUTME: so multiple interpreters can coexist.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::builtins;
use crate::error::{fail_at, EvalResult, Signal};
use crate::eval::Args;
use crate::parser::Syntax;
use crate::scope::Scope;
use crate::value::{Position, ValueRef};

pub struct Interpreter {
    pub top_level: Rc<Scope>,
    functions: RefCell<HashMap<String, ValueRef>>,
    pub syntax: Syntax,
}

impl Interpreter {
    pub fn new(syntax: Syntax) -> Self {
        Interpreter {
            top_level: Scope::new(),
            functions: RefCell::new(HashMap::new()),
            syntax,
        }
    }

    /// `defun`/`lambda` register here; custom lookup precedes builtin
    /// lookup, per spec.md §4.6.
    pub fn define_function(&self, name: String, function: ValueRef) {
        self.functions.borrow_mut().insert(name, function);
    }

    pub fn lookup_function(&self, name: &str) -> Option<ValueRef> {
        self.functions.borrow().get(name).cloned()
    }

    /// The call-table dispatch named in spec.md §4.5: custom functions
    /// first, then builtins; `Unrecognized function` if neither matches.
    /// `args` is the caller's iterator over unevaluated argument
    /// expressions, exactly as `eval_list` receives it.
    pub fn call_function(
        &self,
        name: &str,
        args: &mut Args,
        scope: &Rc<Scope>,
        position: Position,
    ) -> EvalResult {
        if let Some(function) = self.lookup_function(name) {
            tracing::trace!(name, "dispatching to custom function");
            let mut evaluated = Vec::new();
            while let Some(expr) = args.next() {
                evaluated.push(crate::eval::eval(&expr, scope, self)?);
            }
            return crate::eval::call_custom_function(&function, evaluated, scope, self);
        }
        if let Some(callback) = builtins::lookup(name) {
            tracing::trace!(name, "dispatching to builtin");
            return callback(args, scope, self);
        }
        fail_at("Unrecognized function", position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::eval;
    use crate::parser::sexpr::parse_forms;
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
    fn arithmetic_end_to_end() {
        assert_eq!(print_value(&run("(+ 1 2 3)")), "6");
    }

    #[test]
    fn factorial_via_defun() {
        let result = run(
            "(defun fact (n) (if (<= n 1) 1 (* n (fact (- n 1))))) (fact 5)",
        );
        assert_eq!(print_value(&result), "120");
    }

    #[test]
    fn unrecognized_function_fails() {
        let interp = Interpreter::new(Syntax::SExpression);
        let forms = parse_forms("(bogus 1 2)", 1).unwrap();
        let err = eval(&forms[0], &interp.top_level, &interp).unwrap_err();
        match err {
            Signal::Error(e) => assert!(e.to_string().contains("Unrecognized function")),
            _ => panic!("expected error"),
        }
    }
}
