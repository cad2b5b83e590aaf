// ABOUTME: Introspection primitives over user functions: function-body, function-arglist

use crate::error::SchemeError;
use crate::interp::Interpreter;
use crate::value::{Value, ValueRef};

pub fn register(interp: &mut Interpreter) {
    super::def_builtin(
        interp,
        "function-body",
        1,
        function_body,
        "(function-body f) returns f's body as a list of expressions.",
    );
    super::def_builtin(
        interp,
        "function-arglist",
        1,
        function_arglist,
        "(function-arglist f) returns f's parameter list.",
    );
}

fn function_body(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    match interp.heap.get(args[0]) {
        Value::UserFunction { body, .. } => Ok(*body),
        other => Err(crate::type_error!(format!(
            "function-body requires a user function, found {}",
            other.type_name()
        ))),
    }
}

fn function_arglist(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    match interp.heap.get(args[0]) {
        Value::UserFunction { params, .. } => Ok(*params),
        other => Err(crate::type_error!(format!(
            "function-arglist requires a user function, found {}",
            other.type_name()
        ))),
    }
}
