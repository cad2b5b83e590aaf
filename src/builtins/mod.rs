//! Primitive operations and the special-forms installer.
//!
//! Every primitive and special form is installed as an **essential** heap
//! value (never collected) bound by name into the root environment, exactly
//! once, when an `Interpreter` is constructed. Each category lives in its
//! own sub-module, matching how the corresponding components are laid out
//! in the design:
//!
//! - [`arithmetic`] — `+ - * / %`
//! - [`comparison`] — `= < > eq? equal-string?`
//! - [`lists`] — `cons car cdr list`
//! - [`types`] — `string? number? cons? function? user-function? bool?`
//! - [`console`] — `display`
//! - [`introspect`] — `function-body function-arglist`

pub mod arithmetic;
pub mod comparison;
pub mod console;
pub mod introspect;
pub mod lists;
pub mod types;

use crate::interp::Interpreter;
use crate::value::{BuiltinFn, SyntaxFn, Value};

pub fn install(interp: &mut Interpreter) {
    crate::special_forms::install(interp);
    arithmetic::register(interp);
    comparison::register(interp);
    lists::register(interp);
    types::register(interp);
    console::register(interp);
    introspect::register(interp);
}

/// Allocates an essential `BuiltinFunction` value and binds it by `name` in
/// the root environment. `arity = -1` means variadic (the operation itself
/// validates the argument count it received).
pub(crate) fn def_builtin(interp: &mut Interpreter, name: &str, arity: i32, op: BuiltinFn, help: &str) {
    let value = interp.heap.alloc_essential(Value::BuiltinFunction {
        name: name.to_string(),
        arity,
        op,
        help: help.to_string(),
    });
    let root = interp.root_env;
    interp.envs.define(root, name.to_string(), value);
}

/// Allocates an essential `Syntax` value and binds it by `name` in the root
/// environment. Its operands are passed to `op` unevaluated.
pub(crate) fn def_syntax(interp: &mut Interpreter, name: &str, arity: i32, op: SyntaxFn, help: &str) {
    let value = interp.heap.alloc_essential(Value::Syntax {
        name: name.to_string(),
        arity,
        op,
        help: help.to_string(),
    });
    let root = interp.root_env;
    interp.envs.define(root, name.to_string(), value);
}
