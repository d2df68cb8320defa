// ABOUTME: Parent-linked name -> value environment with define-here /
// ABOUTME: assign-nearest-enclosing-binding semantics.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::ValueRef;

#[derive(Debug)]
pub struct Scope {
    bindings: RefCell<HashMap<String, ValueRef>>,
    parent: Option<Rc<Scope>>,
}

impl Scope {
    /// The distinguished root scope, with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Scope {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// A child scope, e.g. for `let` or a custom function call.
    pub fn with_parent(parent: &Rc<Scope>) -> Rc<Self> {
        Rc::new(Scope {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(Rc::clone(parent)),
        })
    }

    /// Returns the binding from the nearest scope in the chain that has
    /// `name`, if any. The outer `Option` is "found at all"; the inner
    /// `ValueRef` is the (possibly nil) bound value itself, so a name bound
    /// to nil is distinguishable from an unbound name.
    pub fn get(&self, name: &str) -> Option<ValueRef> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|p| p.get(name))
    }

    /// Binds `name` in this scope only; any shadowed outer binding is left
    /// untouched.
    pub fn let_(&self, name: impl Into<String>, value: ValueRef) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// If this scope has `name`, overwrites it here. Otherwise walks the
    /// parent chain, checking each scope's *own* bindings (not recursing
    /// through `set` again), and overwrites the nearest one that has it.
    /// If no scope in the chain has `name`, creates it in the scope `set`
    /// was originally called on. Never fails.
    ///
    /// This deliberately does not port `scope.cpp`'s literal parent-checked-
    /// before-self walk, which overwrites the outermost rather than nearest
    /// binding whenever an ancestor also defines the name — see DESIGN.md.
    pub fn set(self: &Rc<Self>, name: &str, value: ValueRef) {
        let mut cursor = Rc::clone(self);
        loop {
            if cursor.bindings.borrow().contains_key(name) {
                cursor.bindings.borrow_mut().insert(name.to_string(), value);
                return;
            }
            match cursor.parent.clone() {
                Some(parent) => cursor = parent,
                None => break,
            }
        }
        self.bindings.borrow_mut().insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn get_and_let() {
        let scope = Scope::new();
        scope.let_("x", Value::number(42.0));
        assert_eq!(
            crate::value::print_value(&scope.get("x").unwrap()),
            "42"
        );
    }

    #[test]
    fn get_missing_is_none() {
        let scope = Scope::new();
        assert!(scope.get("missing").is_none());
    }

    #[test]
    fn child_shadows_parent() {
        let parent = Scope::new();
        parent.let_("x", Value::number(1.0));
        let child = Scope::with_parent(&parent);
        child.let_("x", Value::number(2.0));
        assert_eq!(
            crate::value::print_value(&child.get("x").unwrap()),
            "2"
        );
        assert_eq!(
            crate::value::print_value(&parent.get("x").unwrap()),
            "1"
        );
    }

    #[test]
    fn child_sees_parent_binding() {
        let parent = Scope::new();
        parent.let_("x", Value::number(42.0));
        let child = Scope::with_parent(&parent);
        assert_eq!(
            crate::value::print_value(&child.get("x").unwrap()),
            "42"
        );
    }

    #[test]
    fn set_overwrites_nearest_enclosing_binding() {
        // (let ((x 1)) (let ((x 2)) (setq x 3)) x) -> 1
        let outer = Scope::new();
        outer.let_("x", Value::number(1.0));
        let inner = Scope::with_parent(&outer);
        inner.let_("x", Value::number(2.0));

        inner.set("x", Value::number(3.0));

        assert_eq!(crate::value::print_value(&inner.get("x").unwrap()), "3");
        assert_eq!(crate::value::print_value(&outer.get("x").unwrap()), "1");
    }

    #[test]
    fn set_with_no_existing_binding_creates_in_current_scope() {
        let top = Scope::new();
        top.set("y", Value::number(5.0));
        assert_eq!(crate::value::print_value(&top.get("y").unwrap()), "5");
    }

    #[test]
    fn set_from_child_with_no_binding_anywhere_creates_in_child() {
        let parent = Scope::new();
        let child = Scope::with_parent(&parent);
        child.set("z", Value::number(9.0));
        assert_eq!(crate::value::print_value(&child.get("z").unwrap()), "9");
        assert!(parent.get("z").is_none());
    }

    #[test]
    fn bound_to_nil_is_distinguishable_from_unbound() {
        let scope = Scope::new();
        scope.let_("n", None);
        assert_eq!(scope.get("n"), Some(None));
        assert_eq!(scope.get("missing"), None);
    }
}
