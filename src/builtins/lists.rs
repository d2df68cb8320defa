// ABOUTME: List builtins: length, cons, car, cdr, list, append, filter, map.

use std::rc::Rc;

use crate::error::{fail, fail_at, EvalResult};
use crate::eval::{apply_value, eval, to_function, to_list, Args};
use crate::interpreter::Interpreter;
use crate::scope::Scope;
use crate::value::Value;

pub fn length(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let Some(arg) = args.next() else {
        return fail_at("length: Not enough arguments.", None);
    };
    let elements = to_list(&arg, scope, interp)?;
    Ok(Value::number(elements.len() as f64))
}

pub fn cons(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let (Some(head_expr), Some(tail_expr)) = (args.next(), args.next()) else {
        return fail_at("cons: Not enough arguments.", None);
    };
    let head = eval(&head_expr, scope, interp)?;
    let mut elements = to_list(&tail_expr, scope, interp)?;
    elements.insert(0, head);
    Ok(Value::list(elements))
}

pub fn car(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let Some(arg) = args.next() else {
        return fail_at("car: Not enough arguments.", None);
    };
    let elements = to_list(&arg, scope, interp)?;
    match elements.first() {
        Some(head) => Ok(head.clone()),
        None => fail("car: Empty list."),
    }
}

pub fn cdr(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let Some(arg) = args.next() else {
        return fail_at("cdr: Not enough arguments.", None);
    };
    let elements = to_list(&arg, scope, interp)?;
    if elements.is_empty() {
        return fail("cdr: Empty list.");
    }
    Ok(Value::list(elements[1..].to_vec()))
}

pub fn list(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let mut elements = Vec::new();
    while let Some(expr) = args.next() {
        elements.push(eval(&expr, scope, interp)?);
    }
    Ok(Value::list(elements))
}

pub fn append(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let mut elements = Vec::new();
    while let Some(expr) = args.next() {
        elements.extend(to_list(&expr, scope, interp)?);
    }
    Ok(Value::list(elements))
}

pub fn filter(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let (Some(xs_expr), Some(f_expr)) = (args.next(), args.next()) else {
        return fail_at("filter: Not enough arguments.", None);
    };
    let elements = to_list(&xs_expr, scope, interp)?;
    let function = to_function(&f_expr, scope, interp)?;

    let mut kept = Vec::new();
    for element in elements {
        let verdict = apply_value(&function, vec![element.clone()], scope, interp)?;
        if verdict.is_some() {
            kept.push(element);
        }
    }
    Ok(Value::list(kept))
}

pub fn map(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let (Some(xs_expr), Some(f_expr)) = (args.next(), args.next()) else {
        return fail_at("map: Not enough arguments.", None);
    };
    let elements = to_list(&xs_expr, scope, interp)?;
    let function = to_function(&f_expr, scope, interp)?;

    let mut mapped = Vec::with_capacity(elements.len());
    for element in elements {
        mapped.push(apply_value(&function, vec![element], scope, interp)?);
    }
    Ok(Value::list(mapped))
}
