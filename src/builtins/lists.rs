// ABOUTME: List primitives: cons car cdr list

use crate::error::SchemeError;
use crate::interp::Interpreter;
use crate::value::{Value, ValueRef};

pub fn register(interp: &mut Interpreter) {
    super::def_builtin(interp, "cons", 2, op_cons, "(cons a b) builds a pair whose car is a and cdr is b.");
    super::def_builtin(interp, "car", 1, op_car, "(car pair) returns the first element of pair.");
    super::def_builtin(interp, "cdr", 1, op_cdr, "(cdr pair) returns everything after the first element of pair.");
    super::def_builtin(
        interp,
        "list",
        -1,
        op_list,
        "(list a...) builds a proper list of its operands; (list) is the empty list.",
    );
}

fn op_cons(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    Ok(interp.heap.alloc(Value::Cons(args[0], args[1])))
}

fn op_car(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    match interp.heap.get(args[0]) {
        Value::Cons(car, _) => Ok(*car),
        other => Err(crate::type_error!(format!(
            "car requires a cons, found {}",
            other.type_name()
        ))),
    }
}

fn op_cdr(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    match interp.heap.get(args[0]) {
        Value::Cons(_, cdr) => Ok(*cdr),
        other => Err(crate::type_error!(format!(
            "cdr requires a cons, found {}",
            other.type_name()
        ))),
    }
}

fn op_list(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    let mut result = interp.heap.nil;
    for &a in args.iter().rev() {
        result = interp.heap.alloc(Value::Cons(a, result));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cons_builds_a_pair() {
        let mut interp = Interpreter::new();
        let one = interp.heap.alloc(Value::Int(1));
        let two = interp.heap.alloc(Value::Int(2));
        let pair = op_cons(&mut interp, &[one, two]).unwrap();
        assert!(matches!(interp.heap.get(pair), Value::Cons(a, b) if *a == one && *b == two));
    }

    #[test]
    fn car_of_non_cons_is_a_type_error() {
        let mut interp = Interpreter::new();
        let n = interp.heap.alloc(Value::Int(1));
        let err = op_car(&mut interp, &[n]).unwrap_err();
        assert!(matches!(err, SchemeError::Type { .. }));
    }

    #[test]
    fn list_of_no_operands_is_nil() {
        let mut interp = Interpreter::new();
        let result = op_list(&mut interp, &[]).unwrap();
        assert_eq!(result, interp.heap.nil);
    }

    #[test]
    fn list_builds_a_proper_list_in_order() {
        let mut interp = Interpreter::new();
        let one = interp.heap.alloc(Value::Int(1));
        let two = interp.heap.alloc(Value::Int(2));
        let list = op_list(&mut interp, &[one, two]).unwrap();
        match interp.heap.get(list) {
            Value::Cons(car, cdr) => {
                assert_eq!(*car, one);
                match interp.heap.get(*cdr) {
                    Value::Cons(car2, cdr2) => {
                        assert_eq!(*car2, two);
                        assert!(matches!(interp.heap.get(*cdr2), Value::Nil));
                    }
                    _ => panic!("expected second cons cell"),
                }
            }
            _ => panic!("expected a cons cell"),
        }
    }
}
