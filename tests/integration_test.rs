// ABOUTME: End-to-end scenarios from spec.md §8 exercised through the public
// ABOUTME: library surface (parse -> eval), one fresh `Interpreter` per case.

use bali::error::Signal;
use bali::eval::eval;
use bali::interpreter::Interpreter;
use bali::parser::{parse_source, Syntax};
use bali::value::print_value;

fn run(source: &str, syntax: Syntax) -> String {
    let interp = Interpreter::new(syntax);
    let forms = parse_source(source, syntax, 1).expect("parse");
    let mut result = None;
    for form in forms {
        result = eval(&form, &interp.top_level, &interp).expect("eval");
    }
    print_value(&result)
}

fn run_sexpr(source: &str) -> String {
    run(source, Syntax::SExpression)
}

fn run_mexpr(source: &str) -> String {
    run(source, Syntax::MExpression)
}

#[test]
fn sum_of_three() {
    assert_eq!(run_sexpr("(+ 1 2 3)"), "6");
}

#[test]
fn if_picks_truthy_branch() {
    assert_eq!(run_sexpr("(if (> 5 3) (quote yes) (quote no))"), "yes");
}

#[test]
fn let_binds_two_names() {
    assert_eq!(run_sexpr("(let ((x 10) (y 20)) (+ x y))"), "30");
}

#[test]
fn recursive_factorial_via_defun() {
    assert_eq!(
        run_sexpr(
            "(defun fact (n) (if (<= n 1) 1 (* n (fact (- n 1))))) (fact 5)"
        ),
        "120"
    );
}

#[test]
fn map_squares_a_list() {
    assert_eq!(
        run_sexpr("(map (quote (1 2 3)) (lambda (x) (* x x)))"),
        "(1 4 9)"
    );
}

#[test]
fn filter_keeps_matching_elements() {
    assert_eq!(
        run_sexpr("(filter (quote (1 2 3 4)) (lambda (x) (> x 2)))"),
        "(3 4)"
    );
}

#[test]
fn setq_mutates_nearest_enclosing_binding() {
    assert_eq!(
        run_sexpr("(let ((x 1)) (let ((x 2)) (setq x 3)) x)"),
        "1"
    );
}

#[test]
fn top_level_setq_creates_binding() {
    assert_eq!(run_sexpr("(setq y 5) y"), "5");
}

#[test]
fn return_unwinds_exactly_to_enclosing_call() {
    assert_eq!(run_sexpr("(defun f () (return 1) 2) (f)"), "1");
}

#[test]
fn unbound_non_nil_atom_evaluates_to_itself() {
    assert_eq!(run_sexpr("frobnicate"), "frobnicate");
}

#[test]
fn quote_never_evaluates_its_argument() {
    assert_eq!(run_sexpr("(quote (+ 1 2))"), "(+ 1 2)");
}

#[test]
fn map_preserves_length() {
    assert_eq!(
        run_sexpr("(length (map (quote (1 2 3)) (lambda (x) x)))"),
        "3"
    );
}

#[test]
fn filter_never_grows_the_list() {
    assert_eq!(
        run_sexpr("(length (filter (quote (1 2 3 4 5)) (lambda (x) nil)))"),
        "0"
    );
}

#[test]
fn append_length_is_additive() {
    assert_eq!(
        run_sexpr("(length (append (quote (1 2)) (quote (3 4 5))))"),
        "5"
    );
}

#[test]
fn cons_car_cdr_reconstructs_a_nonempty_list() {
    assert_eq!(
        run_sexpr("(cons (car (quote (1 2 3))) (cdr (quote (1 2 3))))"),
        "(1 2 3)"
    );
}

#[test]
fn addition_and_multiplication_commute() {
    assert_eq!(run_sexpr("(+ 3 4)"), run_sexpr("(+ 4 3)"));
    assert_eq!(run_sexpr("(* 3 4)"), run_sexpr("(* 4 3)"));
}

#[test]
fn unrecognized_function_is_an_error() {
    let interp = Interpreter::new(Syntax::SExpression);
    let forms = parse_source("(this-does-not-exist 1 2)", Syntax::SExpression, 1).unwrap();
    let err = eval(&forms[0], &interp.top_level, &interp).unwrap_err();
    match err {
        Signal::Error(e) => assert!(e.to_string().contains("Unrecognized function")),
        Signal::Return(_) => panic!("expected an error, not a return"),
    }
}

#[test]
fn unhandled_return_at_top_level_is_reported_as_an_error() {
    let interp = Interpreter::new(Syntax::SExpression);
    let forms = parse_source("(return 1)", Syntax::SExpression, 1).unwrap();
    match eval(&forms[0], &interp.top_level, &interp) {
        Err(Signal::Return(_)) => {}
        other => panic!("expected an unhandled return signal, got {other:?}"),
    }
}

#[test]
fn apply_spreads_already_evaluated_elements_without_re_evaluating() {
    // A quoted symbol passed through `apply`'s argument list must arrive at
    // the target function as itself, never looked up as a variable again.
    assert_eq!(
        run_sexpr("(apply (quote list) (list (quote a) (quote b)))"),
        "(a b)"
    );
}

#[test]
fn m_expr_call_syntax_matches_s_expr_call() {
    assert_eq!(
        run_mexpr("square[x] <= x*x square[5]"),
        run_sexpr("(defun square (x) (* x x)) (square 5)")
    );
}

#[test]
fn m_expr_arithmetic_precedence_matches_s_expr() {
    assert_eq!(run_mexpr("1+2*3"), run_sexpr("(+ 1 (* 2 3))"));
}

#[test]
fn m_expr_bracketed_list_literal_matches_quote() {
    assert_eq!(run_mexpr("[1;2;3]"), run_sexpr("(quote (1 2 3))"));
}

#[test]
fn m_expr_defun_shortcut_matches_s_expr_defun() {
    assert_eq!(
        run_mexpr("double[x] <= x*2 double[21]"),
        run_sexpr("(defun double (x) (* x 2)) (double 21)")
    );
}
