// ABOUTME: Boundary-scenario and end-to-end integration tests over the evaluator

use lisp_llm_sandbox::error::SchemeError;
use lisp_llm_sandbox::interp::Interpreter;
use lisp_llm_sandbox::parser::Reader;
use lisp_llm_sandbox::value::{to_display_string, Value};

/// Evaluates every top-level form in `src` in order and renders the final
/// result's display string. A bare top-level symbol or atom is wrapped by the
/// reader as a one-element list (so it is read back as a call), so callers
/// that want to observe a variable's value should close it in `(begin ...)`
/// instead of leaving it as the last bare top-level form.
fn eval(interp: &mut Interpreter, src: &str) -> String {
    let mut reader = Reader::new(src);
    let root = interp.root_env;
    let mut last = interp.heap.void;
    loop {
        let expr = reader.read(&mut interp.heap).expect("reader error");
        if expr == interp.heap.eof {
            break;
        }
        last = interp.eval_top_level(root, expr).expect("evaluation error");
    }
    to_display_string(interp, last)
}

fn eval_err(interp: &mut Interpreter, src: &str) -> SchemeError {
    let mut reader = Reader::new(src);
    let root = interp.root_env;
    let expr = reader.read(&mut interp.heap).expect("reader error");
    interp.eval_top_level(root, expr).expect_err("expected an evaluation error")
}

#[test]
fn add_sums_three_integers() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "(+ 1 2 3)"), "6");
}

#[test]
fn add_sums_floats() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "(+ 1.5 2.5)"), "4.0");
}

#[test]
fn add_concatenates_strings_and_numbers() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "(+ \"hello \" 1 \" world!\")"), "\"hello 1 world!\"");
}

#[test]
fn sub_negates_a_single_operand() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "(- 5)"), "-5");
}

#[test]
fn div_always_returns_a_float() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "(/ 5 2)"), "2.5");
}

#[test]
fn if_picks_the_else_branch_when_condition_is_false() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "(if (> 2 4) 1 2)"), "2");
}

#[test]
fn begin_returns_the_last_expressions_value() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "(begin (define a 10) a)"), "10");
}

#[test]
fn define_of_a_function_form_binds_a_callable() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "(begin (define (f x) (+ x 1)) (f 41))"), "42");
}

#[test]
fn lambda_application_multiplies_its_operands() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "((lambda (x y) (* x y)) 6 7)"), "42");
}

#[test]
fn quote_returns_its_operand_unevaluated() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "(quote (1 2 3))"), "(1 2 3)");
}

#[test]
fn bare_quote_of_nil_prints_as_empty_parens() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "'()"), "()");
}

#[test]
fn car_of_cdr_reaches_the_second_element() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "(car (cdr '(1 2 3)))"), "2");
}

#[test]
fn symbols_are_not_interned_so_eq_on_two_quoted_symbols_is_false() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "(eq? 'a 'a)"), "#f");
}

#[test]
fn nil_has_stable_singleton_identity_under_eq() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "(eq? (quote ()) (quote ()))"), "#t");
}

#[test]
fn define_overwrites_a_prior_binding_in_the_same_scope() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "(begin (define a 1) (define a 2) a)"), "2");
}

#[test]
fn cons_then_car_and_cdr_round_trip_to_the_original_parts() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "(begin (define p (cons 1 2)) (car p))"), "1");
    assert_eq!(eval(&mut interp, "(begin (define p (cons 1 2)) (cdr p))"), "2");
}

#[test]
fn integer_overflow_is_reported() {
    let mut interp = Interpreter::new();
    let err = eval_err(&mut interp, "(+ 9223372036854775807 1)");
    assert!(matches!(err, SchemeError::Overflow { .. }));
}

#[test]
fn calling_an_undefined_name_is_undefined_variable() {
    let mut interp = Interpreter::new();
    let err = eval_err(&mut interp, "(foo)");
    assert!(matches!(err, SchemeError::UndefinedVariable { .. }));
}

#[test]
fn recursive_factorial_of_five_is_120() {
    let mut interp = Interpreter::new();
    let result = eval(
        &mut interp,
        "(define (fact n) (if (= n 0) 1 (* n (fact (- n 1))))) (fact 5)",
    );
    assert_eq!(result, "120");
}

#[test]
fn closures_capture_their_defining_environment() {
    let mut interp = Interpreter::new();
    let result = eval(
        &mut interp,
        "(define (make-adder n) (lambda (x) (+ x n))) (define add3 (make-adder 3)) (add3 4)",
    );
    assert_eq!(result, "7");
}

#[test]
fn set_bang_mutation_is_visible_through_a_captured_closure() {
    let mut interp = Interpreter::new();
    let result = eval(
        &mut interp,
        "(begin (define c 0) (define (bump) (set! c (+ c 1))) (bump) (bump) c)",
    );
    assert_eq!(result, "2");
}

#[test]
fn improper_lists_print_with_a_dot() {
    let mut interp = Interpreter::new();
    assert_eq!(eval(&mut interp, "(cons 1 2)"), "(1 . 2)");
}

#[test]
fn garbage_collection_reclaims_a_rebound_lists_cons_cells() {
    let mut interp = Interpreter::new();
    eval(&mut interp, "(define x (list 1 2 3))");
    let original_list = interp.envs.lookup(interp.root_env, "x").unwrap();
    eval(&mut interp, "(define x 0)");
    interp.collect_garbage();
    assert!(matches!(interp.heap.get(original_list), Value::Void));
    assert_eq!(eval(&mut interp, "(begin x)"), "0");
}
