// ABOUTME: Comparison primitives: = < > eq? equal-string?

use crate::error::SchemeError;
use crate::interp::Interpreter;
use crate::value::{as_f64, equal_string, eq_ref, Value, ValueRef};

pub fn register(interp: &mut Interpreter) {
    super::def_builtin(
        interp,
        "=",
        -1,
        num_eq,
        "(= num num...) is true when every operand is numerically equal, coercing int/float.",
    );
    super::def_builtin(
        interp,
        "<",
        -1,
        lt,
        "(< num num...) is true when each operand is strictly less than the next.",
    );
    super::def_builtin(
        interp,
        ">",
        -1,
        gt,
        "(> num num...) is true when each operand is strictly greater than the next.",
    );
    super::def_builtin(
        interp,
        "eq?",
        2,
        op_eq,
        "(eq? a b) is true when a and b name the same heap slot.",
    );
    super::def_builtin(
        interp,
        "equal-string?",
        2,
        op_equal_string,
        "(equal-string? a b) is true when both are strings with equal contents.",
    );
}

fn bool_value(interp: &mut Interpreter, b: bool) -> ValueRef {
    if b {
        interp.heap.t
    } else {
        interp.heap.f
    }
}

fn chain(
    interp: &mut Interpreter,
    args: &[ValueRef],
    name: &str,
    cmp: fn(f64, f64) -> bool,
) -> Result<ValueRef, SchemeError> {
    if args.len() < 2 {
        return Err(crate::arity_error!(name, 2, args.len()));
    }
    for pair in args.windows(2) {
        let a = as_f64(interp, pair[0])?;
        let b = as_f64(interp, pair[1])?;
        if !cmp(a, b) {
            return Ok(bool_value(interp, false));
        }
    }
    Ok(bool_value(interp, true))
}

fn num_eq(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    chain(interp, args, "=", |a, b| a == b)
}

fn lt(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    chain(interp, args, "<", |a, b| a < b)
}

fn gt(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    chain(interp, args, ">", |a, b| a > b)
}

fn op_eq(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    let result = eq_ref(args[0], args[1]);
    Ok(bool_value(interp, result))
}

fn op_equal_string(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    let result = equal_string(interp, args[0], args[1])?;
    Ok(bool_value(interp, result))
}
