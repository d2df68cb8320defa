// ABOUTME: The value model: a tagged sum type with three variants, shared by
// ABOUTME: reference count, carrying optional source-location metadata.

use std::fmt;
use std::rc::Rc;

/// A value reference. `None` is the absent value (`nil`); `Some` wraps a
/// shared, immutable `Value` node. Mirrors the original's nullable
/// `value::ptr` rather than introducing a dedicated `Nil` variant.
pub type ValueRef = Option<Rc<Value>>;

/// Convenience constant for the absent value, spelled out at call sites
/// that build a `ValueRef` rather than receive one.
pub fn nil() -> ValueRef {
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

pub type Position = Option<Location>;

#[derive(Debug)]
pub enum Value {
    Atom(Atom),
    List(List),
    Function(Function),
}

#[derive(Debug)]
pub struct Atom {
    pub symbol: String,
    pub position: Position,
}

#[derive(Debug)]
pub struct List {
    pub elements: Vec<ValueRef>,
    pub position: Position,
}

/// A function value: either a primitive implemented by the interpreter host,
/// or a user-defined function over named parameters and an unevaluated body.
/// A nested sum rather than a trait object, per spec.md §9. Carries no
/// closure scope: per `original_source/src/value.cpp`'s `function::call`,
/// a custom function's body runs against the *caller's* scope at
/// invocation time, not a scope captured at definition time (see DESIGN.md).
#[derive(Clone)]
pub enum Function {
    Builtin {
        name: &'static str,
        callback: crate::builtins::BuiltinFn,
    },
    Custom {
        name: Option<String>,
        parameters: Vec<String>,
        body: Rc<Value>,
    },
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Builtin { name, .. } => {
                f.debug_struct("Builtin").field("name", name).finish()
            }
            Function::Custom {
                name, parameters, ..
            } => f
                .debug_struct("Custom")
                .field("name", name)
                .field("parameters", parameters)
                .finish(),
        }
    }
}

impl Value {
    pub fn atom(symbol: impl Into<String>) -> ValueRef {
        Some(Rc::new(Value::Atom(Atom {
            symbol: symbol.into(),
            position: None,
        })))
    }

    pub fn atom_at(symbol: impl Into<String>, position: Position) -> ValueRef {
        Some(Rc::new(Value::Atom(Atom {
            symbol: symbol.into(),
            position,
        })))
    }

    /// Prints a double in general format, trimming trailing fractional
    /// zeros (`1.5`, `42`, never `42.0000`) — the Rust equivalent of the
    /// original's `snprintf(..., "%g", ...)`.
    pub fn number(value: f64) -> ValueRef {
        Value::atom(format_number(value))
    }

    /// `true` -> the atom `"true"`; `false` -> the absent value, per
    /// spec.md §3 ("false ≡ nil; truthy ≡ any non-nil value").
    pub fn boolean(value: bool) -> ValueRef {
        if value {
            Value::atom("true")
        } else {
            nil()
        }
    }

    pub fn list(elements: Vec<ValueRef>) -> ValueRef {
        Some(Rc::new(Value::List(List {
            elements,
            position: None,
        })))
    }

    pub fn list_at(elements: Vec<ValueRef>, position: Position) -> ValueRef {
        Some(Rc::new(Value::List(List { elements, position })))
    }

    pub fn custom_function(
        name: Option<String>,
        parameters: Vec<String>,
        body: Rc<Value>,
    ) -> ValueRef {
        Some(Rc::new(Value::Function(Function::Custom {
            name,
            parameters,
            body,
        })))
    }

    pub fn builtin_function(name: &'static str, callback: crate::builtins::BuiltinFn) -> ValueRef {
        Some(Rc::new(Value::Function(Function::Builtin { name, callback })))
    }

    pub fn position(&self) -> Position {
        match self {
            Value::Atom(a) => a.position,
            Value::List(l) => l.position,
            Value::Function(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Atom(_) => "atom",
            Value::List(_) => "list",
            Value::Function(_) => "function",
        }
    }
}

/// Prints `value` as spec.md §4.1 defines: atom -> symbol; list -> `(` +
/// space-joined children + `)`; function -> `(defun NAME (P...) BODY)` /
/// `(lambda (P...) BODY)`; absent -> `nil`.
pub fn print_value(value: &ValueRef) -> String {
    match value {
        None => "nil".to_string(),
        Some(v) => print_rc(v),
    }
}

fn print_rc(v: &Rc<Value>) -> String {
    match v.as_ref() {
        Value::Atom(a) => a.symbol.clone(),
        Value::List(l) => {
            let parts: Vec<String> = l.elements.iter().map(print_value).collect();
            format!("({})", parts.join(" "))
        }
        Value::Function(Function::Builtin { name, .. }) => format!("(builtin {name})"),
        Value::Function(Function::Custom {
            name,
            parameters,
            body,
            ..
        }) => {
            let params = parameters.join(" ");
            let body_str = print_rc(body);
            match name {
                Some(n) => format!("(defun {n} ({params}) {body_str})"),
                None => format!("(lambda ({params}) {body_str})"),
            }
        }
    }
}

fn format_number(value: f64) -> String {
    if value == value.trunc() && value.is_finite() && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let mut s = format!("{value}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_prints_its_symbol() {
        assert_eq!(print_value(&Value::atom("foo")), "foo");
    }

    #[test]
    fn nil_prints_as_nil() {
        assert_eq!(print_value(&nil()), "nil");
    }

    #[test]
    fn list_prints_space_separated() {
        let list = Value::list(vec![Value::atom("a"), Value::atom("b")]);
        assert_eq!(print_value(&list), "(a b)");
    }

    #[test]
    fn empty_list_prints_as_empty_parens() {
        assert_eq!(print_value(&Value::list(vec![])), "()");
    }

    #[test]
    fn number_trims_trailing_zeros() {
        assert_eq!(print_value(&Value::number(1.5)), "1.5");
        assert_eq!(print_value(&Value::number(42.0)), "42");
        assert_eq!(print_value(&Value::number(-3.25)), "-3.25");
    }

    #[test]
    fn boolean_true_is_atom_true_false_is_nil() {
        assert_eq!(print_value(&Value::boolean(true)), "true");
        assert!(Value::boolean(false).is_none());
    }

    #[test]
    fn lambda_prints_without_name() {
        let f = Value::custom_function(None, vec!["x".to_string()], Value::atom("x").unwrap());
        assert_eq!(print_value(&f), "(lambda (x) x)");
    }

    #[test]
    fn defun_prints_with_name() {
        let f = Value::custom_function(
            Some("double".to_string()),
            vec!["x".to_string()],
            Value::atom("x").unwrap(),
        );
        assert_eq!(print_value(&f), "(defun double (x) x)");
    }
}
