// ABOUTME: The evaluator core: trampoline steps that dispatch, apply, and sequence

use crate::env::EnvId;
use crate::error::SchemeError;
use crate::interp::Interpreter;
use crate::trampoline::{StackSlot, StepResult};
use crate::value::{to_display_string, Value, ValueRef};

/// Walks a proper list counting its `Cons` cells. Used for the argument-count
/// check against a fixed-arity `Syntax`/`BuiltinFunction` before its operation
/// runs, per the evaluator's argument-count checking rule.
pub fn list_len(interp: &Interpreter, mut v: ValueRef) -> Result<usize, SchemeError> {
    let mut n = 0usize;
    loop {
        match interp.heap.get(v) {
            Value::Nil => return Ok(n),
            Value::Cons(_, cdr) => {
                let next = *cdr;
                v = next;
                n += 1;
            }
            _ => return Err(crate::internal_error!("operand list is not a proper list")),
        }
    }
}

/// Splits a non-empty `Cons` into `(car, cdr)`. Special forms call this on
/// operand lists whose length the evaluator has already arity-checked, so a
/// mismatch here means a bug in this crate's wiring, not a user-program error.
pub fn uncons(interp: &Interpreter, v: ValueRef) -> Result<(ValueRef, ValueRef), SchemeError> {
    match interp.heap.get(v) {
        Value::Cons(car, cdr) => Ok((*car, *cdr)),
        _ => Err(crate::internal_error!(
            "expected another operand but the list ended"
        )),
    }
}

fn check_arity(name: &str, arity: i32, got: usize) -> Result<(), SchemeError> {
    if arity >= 0 && got != arity as usize {
        return Err(crate::arity_error!(name, arity, got));
    }
    Ok(())
}

/// Evaluates `expr` in `env`. Self-evaluating tags and unrecognized tags return
/// themselves; a `Symbol` is looked up; a `Cons` evaluates its operator and
/// dispatches on the resulting tag via [`step_after_operator`].
pub fn step_dispatch(interp: &mut Interpreter) -> StepResult {
    let env = interp.pop_env()?;
    let expr = interp.pop_val()?;
    match interp.heap.get(expr).clone() {
        Value::Symbol(name) => match interp.envs.lookup(env, &name) {
            Some(v) => interp.return_step(v),
            None => Err(crate::undefined_error!(name)),
        },
        Value::Cons(operator, operands) => interp.call(
            step_dispatch,
            Some(step_after_operator),
            &[
                StackSlot::Env(env),
                StackSlot::Val(operator),
                StackSlot::Val(operands),
                StackSlot::Env(env),
            ],
        ),
        _ => interp.return_step(expr),
    }
}

/// Runs once the operator sub-expression has been evaluated (its value sits in
/// `last_return`). Dispatches on the operator's tag: `Syntax` runs directly
/// against the raw operand list; `BuiltinFunction`/`UserFunction` first evaluate
/// every operand left to right via [`step_eval_next_operand`].
fn step_after_operator(interp: &mut Interpreter) -> StepResult {
    let operands = interp.pop_val()?;
    let env = interp.pop_env()?;
    let operator = interp.last_return;
    match interp.heap.get(operator).clone() {
        Value::Syntax {
            name, arity, op, ..
        } => {
            if arity >= 0 {
                let got = list_len(interp, operands)?;
                check_arity(&name, arity, got)?;
            }
            op(interp, env, operands)
        }
        Value::BuiltinFunction { .. } | Value::UserFunction { .. } => interp.call(
            step_eval_next_operand,
            None,
            &[
                StackSlot::Val(operands),
                StackSlot::Size(0),
                StackSlot::Val(operator),
                StackSlot::Env(env),
            ],
        ),
        other => Err(crate::type_error!(format!(
            "{} is not applicable",
            display_operator(interp, operator, &other)
        ))),
    }
}

fn display_operator(interp: &Interpreter, operator: ValueRef, _tag: &Value) -> String {
    to_display_string(interp, operator)
}

/// One iteration of the left-to-right operand-evaluation loop: pops the
/// remaining operand list, the in-progress arg count, the operator, and the
/// calling environment; either applies the operator (operand list exhausted)
/// or tail-calls the evaluator on the next operand.
fn step_eval_next_operand(interp: &mut Interpreter) -> StepResult {
    let remaining = interp.pop_val()?;
    let count = interp.pop_size()?;
    let operator = interp.pop_val()?;
    let env = interp.pop_env()?;
    match interp.heap.get(remaining).clone() {
        Value::Nil => interp.call(
            step_apply,
            None,
            &[StackSlot::Size(count), StackSlot::Val(operator), StackSlot::Env(env)],
        ),
        Value::Cons(car, cdr) => interp.call(
            step_dispatch,
            Some(step_after_operand),
            &[
                StackSlot::Env(env),
                StackSlot::Val(car),
                StackSlot::Val(cdr),
                StackSlot::Size(count),
                StackSlot::Val(operator),
                StackSlot::Env(env),
            ],
        ),
        _ => Err(crate::internal_error!("operand list is not a proper list")),
    }
}

/// Runs after one operand has been evaluated: stashes its value on the
/// argument stack (so the final `pop_vals` sees every operand's result in
/// left-to-right order once reversed) and resumes the loop on the remaining
/// operands.
fn step_after_operand(interp: &mut Interpreter) -> StepResult {
    let cdr = interp.pop_val()?;
    let count = interp.pop_size()?;
    let operator = interp.pop_val()?;
    let env = interp.pop_env()?;
    let value = interp.last_return;
    interp.push_val(value);
    interp.call(
        step_eval_next_operand,
        None,
        &[
            StackSlot::Val(cdr),
            StackSlot::Size(count + 1),
            StackSlot::Val(operator),
            StackSlot::Env(env),
        ],
    )
}

/// Applies `operator` to the `count` already-evaluated arguments sitting on
/// the argument stack. A `BuiltinFunction` is arity-checked and invoked
/// directly; a `UserFunction` gets a fresh environment child of its captured
/// environment, binds its parameters, and tail-evaluates its body.
fn step_apply(interp: &mut Interpreter) -> StepResult {
    let count = interp.pop_size()?;
    let operator = interp.pop_val()?;
    let _env = interp.pop_env()?;
    let mut args = interp.pop_vals(count)?;
    args.reverse();
    match interp.heap.get(operator).clone() {
        Value::BuiltinFunction {
            name, arity, op, ..
        } => {
            check_arity(&name, arity, args.len())?;
            let result = op(interp, &args)?;
            interp.return_step(result)
        }
        Value::UserFunction { params, body, env } => {
            let expected = list_len(interp, params)?;
            if expected != args.len() {
                return Err(crate::arity_error!("lambda", expected as i32, args.len()));
            }
            let call_env = interp.envs.child(env);
            bind_params(interp, call_env, params, &args)?;
            interp.call(
                step_eval_sequence,
                None,
                &[StackSlot::Val(body), StackSlot::Env(call_env)],
            )
        }
        other => Err(crate::type_error!(format!(
            "{} is not applicable",
            display_operator(interp, operator, &other)
        ))),
    }
}

fn bind_params(
    interp: &mut Interpreter,
    env: EnvId,
    mut params: ValueRef,
    args: &[ValueRef],
) -> Result<(), SchemeError> {
    let mut i = 0usize;
    loop {
        match interp.heap.get(params).clone() {
            Value::Nil => return Ok(()),
            Value::Cons(car, cdr) => {
                let name = match interp.heap.get(car) {
                    Value::Symbol(s) => s.clone(),
                    other => {
                        return Err(crate::type_error!(format!(
                            "lambda parameter must be a symbol, found {}",
                            other.type_name()
                        )))
                    }
                };
                let value = args[i];
                interp.envs.define(env, name, value);
                i += 1;
                params = cdr;
            }
            _ => return Err(crate::internal_error!("improper parameter list")),
        }
    }
}

/// Evaluates a proper list of expressions in order, discarding every result
/// but the last, which is reached via a tail call so that the last expression
/// of a `begin` or a function body does not grow `fn_stack`. `(begin)` (an
/// empty sequence) returns `Void`.
pub fn step_eval_sequence(interp: &mut Interpreter) -> StepResult {
    let remaining = interp.pop_val()?;
    let env = interp.pop_env()?;
    match interp.heap.get(remaining).clone() {
        Value::Nil => interp.return_step(interp.heap.void),
        Value::Cons(car, cdr) => match interp.heap.get(cdr).clone() {
            Value::Nil => interp.call(step_dispatch, None, &[StackSlot::Env(env), StackSlot::Val(car)]),
            _ => interp.call(
                step_dispatch,
                Some(step_eval_sequence_after),
                &[
                    StackSlot::Env(env),
                    StackSlot::Val(car),
                    StackSlot::Val(cdr),
                    StackSlot::Env(env),
                ],
            ),
        },
        _ => Err(crate::internal_error!("sequence is not a proper list")),
    }
}

fn step_eval_sequence_after(interp: &mut Interpreter) -> StepResult {
    let cdr = interp.pop_val()?;
    let env = interp.pop_env()?;
    interp.call(
        step_eval_sequence,
        None,
        &[StackSlot::Val(cdr), StackSlot::Env(env)],
    )
}
