// ABOUTME: The special forms: syntax whose operands are not pre-evaluated

use crate::env::EnvId;
use crate::eval::{step_eval_sequence, uncons};
use crate::interp::Interpreter;
use crate::trampoline::{StackSlot, StepResult};
use crate::value::Value;

pub fn install(interp: &mut Interpreter) {
    crate::builtins::def_syntax(
        interp,
        "quote",
        1,
        quote,
        "(quote x) returns x unevaluated.",
    );
    crate::builtins::def_syntax(
        interp,
        "if",
        3,
        if_form,
        "(if c t e) evaluates c; returns t if truthy, else e.",
    );
    crate::builtins::def_syntax(
        interp,
        "define",
        -1,
        define,
        "(define name expr) or (define (name arg...) body...) binds name in the current scope.",
    );
    crate::builtins::def_syntax(
        interp,
        "set!",
        2,
        set_bang,
        "(set! name expr) rebinds name in this scope and every ancestor that already binds it.",
    );
    crate::builtins::def_syntax(
        interp,
        "lambda",
        -1,
        lambda,
        "(lambda (arg...) body...) creates a function capturing the current scope.",
    );
    crate::builtins::def_syntax(
        interp,
        "begin",
        -1,
        begin,
        "(begin e...) evaluates each e in order, returning the last; (begin) returns void.",
    );
    crate::builtins::def_syntax(
        interp,
        "help",
        -1,
        help,
        "(help) lists the current scope; (help name) shows that binding's documentation.",
    );
}

fn quote(interp: &mut Interpreter, _env: EnvId, operands: crate::value::ValueRef) -> StepResult {
    let (x, _rest) = uncons(interp, operands)?;
    interp.return_step(x)
}

fn if_form(interp: &mut Interpreter, env: EnvId, operands: crate::value::ValueRef) -> StepResult {
    let (cond, rest) = uncons(interp, operands)?;
    let (then_branch, rest) = uncons(interp, rest)?;
    let (else_branch, _rest) = uncons(interp, rest)?;
    interp.call(
        crate::eval::step_dispatch,
        Some(step_if_branch),
        &[
            StackSlot::Env(env),
            StackSlot::Val(cond),
            StackSlot::Val(else_branch),
            StackSlot::Val(then_branch),
            StackSlot::Env(env),
        ],
    )
}

fn step_if_branch(interp: &mut Interpreter) -> StepResult {
    let else_branch = interp.pop_val()?;
    let then_branch = interp.pop_val()?;
    let env = interp.pop_env()?;
    let cond_value = interp.last_return;
    let branch = if interp.heap.get(cond_value).is_truthy() {
        then_branch
    } else {
        else_branch
    };
    interp.call(
        crate::eval::step_dispatch,
        None,
        &[StackSlot::Env(env), StackSlot::Val(branch)],
    )
}

fn define(interp: &mut Interpreter, env: EnvId, operands: crate::value::ValueRef) -> StepResult {
    let (target, rest) = uncons(interp, operands)?;
    match interp.heap.get(target).clone() {
        Value::Symbol(_) => {
            let (expr, rest2) = uncons(interp, rest)?;
            if !matches!(interp.heap.get(rest2), Value::Nil) {
                return Err(crate::type_error!(
                    "(define name expr) takes exactly one expression"
                ));
            }
            interp.call(
                crate::eval::step_dispatch,
                Some(step_define_finish),
                &[
                    StackSlot::Env(env),
                    StackSlot::Val(expr),
                    StackSlot::Val(target),
                    StackSlot::Env(env),
                ],
            )
        }
        Value::Cons(name_ref, params) => {
            if matches!(interp.heap.get(rest), Value::Nil) {
                return Err(crate::type_error!(
                    "(define (name arg...) body...) requires at least one body expression"
                ));
            }
            let name = match interp.heap.get(name_ref) {
                Value::Symbol(s) => s.clone(),
                other => {
                    return Err(crate::type_error!(format!(
                        "define's function name must be a symbol, found {}",
                        other.type_name()
                    )))
                }
            };
            let lambda = interp
                .heap
                .alloc(Value::UserFunction { params, body: rest, env });
            interp.envs.define(env, name, lambda);
            interp.return_step(interp.heap.void)
        }
        other => Err(crate::type_error!(format!(
            "define's first operand must be a symbol or a (name arg...) pattern, found {}",
            other.type_name()
        ))),
    }
}

fn step_define_finish(interp: &mut Interpreter) -> StepResult {
    let target = interp.pop_val()?;
    let env = interp.pop_env()?;
    let value = interp.last_return;
    let name = match interp.heap.get(target) {
        Value::Symbol(s) => s.clone(),
        _ => return Err(crate::internal_error!("define target was not a symbol")),
    };
    interp.envs.define(env, name, value);
    interp.return_step(interp.heap.void)
}

fn set_bang(interp: &mut Interpreter, env: EnvId, operands: crate::value::ValueRef) -> StepResult {
    let (target, rest) = uncons(interp, operands)?;
    let (expr, _rest) = uncons(interp, rest)?;
    if !matches!(interp.heap.get(target), Value::Symbol(_)) {
        return Err(crate::type_error!("set!'s first operand must be a symbol"));
    }
    interp.call(
        crate::eval::step_dispatch,
        Some(step_set_finish),
        &[
            StackSlot::Env(env),
            StackSlot::Val(expr),
            StackSlot::Val(target),
            StackSlot::Env(env),
        ],
    )
}

fn step_set_finish(interp: &mut Interpreter) -> StepResult {
    let target = interp.pop_val()?;
    let env = interp.pop_env()?;
    let value = interp.last_return;
    let name = match interp.heap.get(target) {
        Value::Symbol(s) => s.clone(),
        _ => return Err(crate::internal_error!("set! target was not a symbol")),
    };
    interp.envs.set(env, &name, value)?;
    interp.return_step(value)
}

fn lambda(interp: &mut Interpreter, env: EnvId, operands: crate::value::ValueRef) -> StepResult {
    let (params, body) = uncons(interp, operands)?;
    if matches!(interp.heap.get(body), Value::Nil) {
        return Err(crate::type_error!(
            "(lambda (arg...) body...) requires at least one body expression"
        ));
    }
    let mut cur = params;
    loop {
        match interp.heap.get(cur).clone() {
            Value::Nil => break,
            Value::Cons(car, cdr) => {
                if !matches!(interp.heap.get(car), Value::Symbol(_)) {
                    return Err(crate::type_error!("lambda parameters must be symbols"));
                }
                cur = cdr;
            }
            _ => return Err(crate::type_error!("lambda's parameter list must be a proper list")),
        }
    }
    let value = interp.heap.alloc(Value::UserFunction { params, body, env });
    interp.return_step(value)
}

fn begin(interp: &mut Interpreter, env: EnvId, operands: crate::value::ValueRef) -> StepResult {
    interp.call(
        step_eval_sequence,
        None,
        &[StackSlot::Val(operands), StackSlot::Env(env)],
    )
}

fn help(interp: &mut Interpreter, env: EnvId, operands: crate::value::ValueRef) -> StepResult {
    match interp.heap.get(operands).clone() {
        Value::Nil => {
            crate::help::print_environment(interp, env);
            interp.return_step(interp.heap.void)
        }
        Value::Cons(name_ref, rest) => {
            if !matches!(interp.heap.get(rest), Value::Nil) {
                return Err(crate::type_error!("help accepts at most one argument"));
            }
            crate::help::print_binding(interp, env, name_ref)?;
            interp.return_step(interp.heap.void)
        }
        other => Err(crate::type_error!(format!(
            "help's operand must be a symbol, found {}",
            other.type_name()
        ))),
    }
}
