// ABOUTME: Numeric builtins: +, -, *, /. Every argument is evaluated and
// ABOUTME: coerced to a number in left-to-right order before use.

use std::rc::Rc;

use crate::error::{fail, EvalResult};
use crate::eval::{eval, to_number, Args};
use crate::interpreter::Interpreter;
use crate::scope::Scope;
use crate::value::Value;

pub fn add(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let mut sum = 0.0;
    while let Some(expr) = args.next() {
        sum += to_number(&expr, scope, interp)?;
    }
    Ok(Value::number(sum))
}

pub fn subtract(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let Some(first) = args.next() else {
        return fail("-: Not enough arguments.");
    };
    let first = to_number(&first, scope, interp)?;

    if args.is_empty() {
        return Ok(Value::number(-first));
    }

    let mut result = first;
    while let Some(expr) = args.next() {
        result -= to_number(&expr, scope, interp)?;
    }
    Ok(Value::number(result))
}

pub fn multiply(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let mut product = 1.0;
    while let Some(expr) = args.next() {
        product *= to_number(&expr, scope, interp)?;
    }
    Ok(Value::number(product))
}

pub fn divide(args: &mut Args, scope: &Rc<Scope>, interp: &Interpreter) -> EvalResult {
    let Some(first) = args.next() else {
        return fail("/: Not enough arguments.");
    };
    let Some(second) = args.next() else {
        return fail("/: Not enough arguments.");
    };

    let mut result = to_number(&first, scope, interp)?;
    let divisor = to_number(&second, scope, interp)?;
    if divisor == 0.0 {
        return fail("/: Division by zero.");
    }
    result /= divisor;

    while let Some(expr) = args.next() {
        let divisor = to_number(&expr, scope, interp)?;
        if divisor == 0.0 {
            return fail("/: Division by zero.");
        }
        result /= divisor;
    }
    Ok(Value::number(result))
}
