// ABOUTME: Arithmetic primitives: + - * / %

use crate::error::SchemeError;
use crate::interp::Interpreter;
use crate::value::{as_f64, to_display_string, Value, ValueRef};

pub fn register(interp: &mut Interpreter) {
    super::def_builtin(
        interp,
        "+",
        -1,
        add,
        "(+ num...) sums its operands (Float if any operand is Float); \
         with any String operand it concatenates decimal forms instead.",
    );
    super::def_builtin(
        interp,
        "-",
        -1,
        sub,
        "(- num...) subtracts left to right; with one operand, negates it.",
    );
    super::def_builtin(interp, "*", -1, mul, "(* num...) multiplies its operands.");
    super::def_builtin(
        interp,
        "/",
        -1,
        div,
        "(/ num num...) divides left to right, always producing a Float; requires at least two operands.",
    );
    super::def_builtin(
        interp,
        "%",
        2,
        modulo,
        "(% num num) returns the remainder of the first operand divided by the second.",
    );
}

fn as_i64(interp: &Interpreter, v: ValueRef) -> Result<i64, SchemeError> {
    match interp.heap.get(v) {
        Value::Int(n) => Ok(*n),
        other => Err(crate::type_error!(format!(
            "expected an integer, found {}",
            other.type_name()
        ))),
    }
}

fn any_float(interp: &Interpreter, args: &[ValueRef]) -> bool {
    args.iter()
        .any(|&a| matches!(interp.heap.get(a), Value::Float(_)))
}

fn any_string(interp: &Interpreter, args: &[ValueRef]) -> bool {
    args.iter()
        .any(|&a| matches!(interp.heap.get(a), Value::Str(_)))
}

fn add(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    if any_string(interp, args) {
        let mut out = String::new();
        for &a in args {
            match interp.heap.get(a) {
                Value::Str(s) => out.push_str(s),
                Value::Int(_) | Value::Float(_) => out.push_str(&to_display_string(interp, a)),
                other => {
                    return Err(crate::type_error!(format!(
                        "+ cannot combine a string with {}",
                        other.type_name()
                    )))
                }
            }
        }
        return Ok(interp.heap.alloc(Value::Str(out)));
    }
    if any_float(interp, args) {
        let mut sum = 0.0f64;
        for &a in args {
            sum += as_f64(interp, a)?;
        }
        return Ok(interp.heap.alloc(Value::Float(sum)));
    }
    let mut sum: i64 = 0;
    for &a in args {
        let n = as_i64(interp, a)?;
        sum = sum
            .checked_add(n)
            .ok_or_else(|| crate::overflow_error!("+"))?;
    }
    Ok(interp.heap.alloc(Value::Int(sum)))
}

fn sub(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    if args.is_empty() {
        return Err(crate::arity_error!("-", 1, 0));
    }
    if any_float(interp, args) {
        let mut result = as_f64(interp, args[0])?;
        if args.len() == 1 {
            return Ok(interp.heap.alloc(Value::Float(-result)));
        }
        for &a in &args[1..] {
            result -= as_f64(interp, a)?;
        }
        return Ok(interp.heap.alloc(Value::Float(result)));
    }
    let first = as_i64(interp, args[0])?;
    if args.len() == 1 {
        return Ok(interp.heap.alloc(Value::Int(-first)));
    }
    let mut result = first;
    for &a in &args[1..] {
        result -= as_i64(interp, a)?;
    }
    Ok(interp.heap.alloc(Value::Int(result)))
}

fn mul(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    if any_float(interp, args) {
        let mut product = 1.0f64;
        for &a in args {
            product *= as_f64(interp, a)?;
        }
        return Ok(interp.heap.alloc(Value::Float(product)));
    }
    let mut product: i64 = 1;
    for &a in args {
        let n = as_i64(interp, a)?;
        product = product
            .checked_mul(n)
            .ok_or_else(|| crate::overflow_error!("*"))?;
    }
    Ok(interp.heap.alloc(Value::Int(product)))
}

fn div(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    if args.len() < 2 {
        return Err(crate::arity_error!("/", 2, args.len()));
    }
    let mut result = as_f64(interp, args[0])?;
    for &a in &args[1..] {
        let divisor = as_f64(interp, a)?;
        if divisor == 0.0 {
            return Err(crate::division_error!("division by zero"));
        }
        result /= divisor;
    }
    Ok(interp.heap.alloc(Value::Float(result)))
}

fn modulo(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    if args.len() != 2 {
        return Err(crate::arity_error!("%", 2, args.len()));
    }
    let both_int = matches!(interp.heap.get(args[0]), Value::Int(_))
        && matches!(interp.heap.get(args[1]), Value::Int(_));
    if both_int {
        let a = as_i64(interp, args[0])?;
        let b = as_i64(interp, args[1])?;
        if b == 0 {
            return Err(crate::division_error!("modulo by zero"));
        }
        Ok(interp.heap.alloc(Value::Int(a % b)))
    } else {
        let a = as_f64(interp, args[0])?;
        let b = as_f64(interp, args[1])?;
        if b == 0.0 {
            return Err(crate::division_error!("modulo by zero"));
        }
        Ok(interp.heap.alloc(Value::Float(a % b)))
    }
}
