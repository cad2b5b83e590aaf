// ABOUTME: Type predicates: string? number? cons? function? user-function? bool?

use crate::error::SchemeError;
use crate::interp::Interpreter;
use crate::value::{Value, ValueRef};

pub fn register(interp: &mut Interpreter) {
    super::def_builtin(interp, "string?", 1, string_p, "(string? v) is true when v is a string.");
    super::def_builtin(interp, "number?", 1, number_p, "(number? v) is true when v is an integer or a float.");
    super::def_builtin(interp, "cons?", 1, cons_p, "(cons? v) is true when v is a pair.");
    super::def_builtin(
        interp,
        "function?",
        1,
        function_p,
        "(function? v) is true when v is callable: a builtin, a syntax form, or a user function.",
    );
    super::def_builtin(
        interp,
        "user-function?",
        1,
        user_function_p,
        "(user-function? v) is true when v was created by lambda or define.",
    );
    super::def_builtin(interp, "bool?", 1, bool_p, "(bool? v) is true when v is #t or #f.");
}

fn bool_value(interp: &mut Interpreter, b: bool) -> ValueRef {
    if b {
        interp.heap.t
    } else {
        interp.heap.f
    }
}

fn string_p(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    let b = matches!(interp.heap.get(args[0]), Value::Str(_));
    Ok(bool_value(interp, b))
}

fn number_p(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    let b = matches!(interp.heap.get(args[0]), Value::Int(_) | Value::Float(_));
    Ok(bool_value(interp, b))
}

fn cons_p(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    let b = matches!(interp.heap.get(args[0]), Value::Cons(..));
    Ok(bool_value(interp, b))
}

fn function_p(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    let b = matches!(
        interp.heap.get(args[0]),
        Value::BuiltinFunction { .. } | Value::Syntax { .. } | Value::UserFunction { .. }
    );
    Ok(bool_value(interp, b))
}

fn user_function_p(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    let b = matches!(interp.heap.get(args[0]), Value::UserFunction { .. });
    Ok(bool_value(interp, b))
}

fn bool_p(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    let b = matches!(interp.heap.get(args[0]), Value::True | Value::False);
    Ok(bool_value(interp, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_p_is_true_only_for_strings() {
        let mut interp = Interpreter::new();
        let s = interp.heap.alloc(Value::Str("hi".to_string()));
        let n = interp.heap.alloc(Value::Int(1));
        assert!(matches!(interp.heap.get(string_p(&mut interp, &[s]).unwrap()), Value::True));
        assert!(matches!(interp.heap.get(string_p(&mut interp, &[n]).unwrap()), Value::False));
    }

    #[test]
    fn function_p_recognizes_all_three_callable_kinds() {
        let mut interp = Interpreter::new();
        let car = interp.envs.lookup(interp.root_env, "car").unwrap();
        let result = function_p(&mut interp, &[car]).unwrap();
        assert!(matches!(interp.heap.get(result), Value::True));
    }

    #[test]
    fn user_function_p_is_false_for_builtins() {
        let mut interp = Interpreter::new();
        let car = interp.envs.lookup(interp.root_env, "car").unwrap();
        let result = user_function_p(&mut interp, &[car]).unwrap();
        assert!(matches!(interp.heap.get(result), Value::False));
    }
}
