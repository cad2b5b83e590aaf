// ABOUTME: The interpreter: trampoline stacks, step-call primitives, and the driver loop

use crate::env::{EnvId, Envs};
use crate::error::SchemeError;
use crate::heap::Heap;
use crate::trampoline::{StackSlot, StepFn, StepResult};
use crate::value::ValueRef;

/// Owns every piece of process-wide mutable state a trampoline step needs: the
/// value heap, the environment arena, the root (top-level) environment, the
/// argument and function stacks, and the single `last_return` slot. A step is a
/// plain `fn(&mut Interpreter) -> StepResult`, so all of its working state has to
/// live here rather than in its own call frame. Help text for a binding lives on
/// the `BuiltinFunction`/`Syntax` value itself (its `help` field) rather than in a
/// side registry, so there is no separate documentation table to keep in sync.
pub struct Interpreter {
    pub heap: Heap,
    pub envs: Envs,
    pub root_env: EnvId,
    pub arg_stack: Vec<StackSlot>,
    pub fn_stack: Vec<StepFn>,
    pub last_return: ValueRef,
}

impl Interpreter {
    pub fn new() -> Self {
        let heap = Heap::new();
        let mut envs = Envs::new();
        let root_env = envs.new_root();
        let last_return = heap.void;
        let mut interp = Interpreter {
            heap,
            envs,
            root_env,
            arg_stack: Vec::new(),
            fn_stack: Vec::new(),
            last_return,
        };
        crate::builtins::install(&mut interp);
        interp
    }

    pub fn push_val(&mut self, v: ValueRef) {
        self.arg_stack.push(StackSlot::Val(v));
    }

    pub fn push_env(&mut self, e: EnvId) {
        self.arg_stack.push(StackSlot::Env(e));
    }

    pub fn push_int(&mut self, n: i64) {
        self.arg_stack.push(StackSlot::Int(n));
    }

    pub fn push_size(&mut self, n: usize) {
        self.arg_stack.push(StackSlot::Size(n));
    }

    pub fn pop_val(&mut self) -> Result<ValueRef, SchemeError> {
        self.arg_stack
            .pop()
            .and_then(StackSlot::as_val)
            .ok_or_else(|| crate::internal_error!("expected a value on the argument stack"))
    }

    pub fn pop_env(&mut self) -> Result<EnvId, SchemeError> {
        self.arg_stack
            .pop()
            .and_then(StackSlot::as_env)
            .ok_or_else(|| crate::internal_error!("expected an environment on the argument stack"))
    }

    pub fn pop_int(&mut self) -> Result<i64, SchemeError> {
        self.arg_stack
            .pop()
            .and_then(StackSlot::as_int)
            .ok_or_else(|| crate::internal_error!("expected an integer on the argument stack"))
    }

    pub fn pop_size(&mut self) -> Result<usize, SchemeError> {
        self.arg_stack
            .pop()
            .and_then(StackSlot::as_size)
            .ok_or_else(|| crate::internal_error!("expected a size on the argument stack"))
    }

    /// Pops `n` values pushed by `call`'s reverse-order discipline, returning them
    /// in their original declared order.
    pub fn pop_vals(&mut self, n: usize) -> Result<Vec<ValueRef>, SchemeError> {
        (0..n).map(|_| self.pop_val()).collect()
    }

    /// The trampoline's `call` primitive: pushes `args` so that popping them in
    /// sequence yields `args[0]` first, pushes `continuation` onto the function
    /// stack (unless it is `None`, which is how a tail call avoids growing
    /// `fn_stack`), and returns `next` as the step to run.
    pub fn call(
        &mut self,
        next: StepFn,
        continuation: Option<StepFn>,
        args: &[StackSlot],
    ) -> StepResult {
        for &arg in args.iter().rev() {
            self.arg_stack.push(arg);
        }
        if let Some(cont) = continuation {
            self.fn_stack.push(cont);
        }
        Ok(Some(next))
    }

    /// The trampoline's `return` primitive: records `value` as the result just
    /// produced and resumes whatever step was waiting for it. An empty function
    /// stack means the top-level expression is fully evaluated.
    pub fn return_step(&mut self, value: ValueRef) -> StepResult {
        self.last_return = value;
        Ok(self.fn_stack.pop())
    }

    fn run_trampoline(&mut self, first: StepFn) -> Result<ValueRef, SchemeError> {
        let mut step = first;
        loop {
            match step(self) {
                Ok(Some(next)) => step = next,
                Ok(None) => return Ok(self.last_return),
                Err(e) => return Err(e),
            }
        }
    }

    /// Evaluates one top-level expression to completion. Both stacks are expected
    /// to be empty on entry; on any error they are truncated back to that snapshot
    /// before the error propagates, so a failed expression never leaves stale state
    /// for the next REPL turn.
    pub fn eval_top_level(&mut self, env: EnvId, expr: ValueRef) -> Result<ValueRef, SchemeError> {
        debug_assert!(self.arg_stack.is_empty());
        debug_assert!(self.fn_stack.is_empty());
        let arg_snapshot = self.arg_stack.len();
        let fn_snapshot = self.fn_stack.len();

        self.push_val(expr);
        self.push_env(env);
        let result = self.run_trampoline(crate::eval::step_dispatch);

        if result.is_err() {
            self.arg_stack.truncate(arg_snapshot);
            self.fn_stack.truncate(fn_snapshot);
        }
        result
    }

    /// Runs a full mark-and-sweep collection rooted at the root environment, the
    /// pending return value, and everything currently reachable from the
    /// (normally empty, between top-level turns) trampoline stacks.
    pub fn collect_garbage(&mut self) {
        let mut roots = vec![self.last_return];
        let mut root_envs = vec![self.root_env];
        for slot in &self.arg_stack {
            match slot {
                StackSlot::Val(v) => roots.push(*v),
                StackSlot::Env(e) => root_envs.push(*e),
                _ => {}
            }
        }
        self.heap.collect(&roots, &root_envs, &mut self.envs);
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn tail_call_does_not_grow_the_function_stack() {
        let mut interp = Interpreter::new();
        fn dummy_return(interp: &mut Interpreter) -> StepResult {
            let v = interp.pop_val()?;
            interp.return_step(v)
        }
        let before = interp.fn_stack.len();
        let five = interp.heap.alloc(Value::Int(5));
        interp
            .call(dummy_return, None, &[StackSlot::Val(five)])
            .unwrap();
        assert_eq!(interp.fn_stack.len(), before);
    }

    #[test]
    fn call_pushes_args_so_they_pop_in_declared_order() {
        let mut interp = Interpreter::new();
        let a = interp.heap.alloc(Value::Int(1));
        let b = interp.heap.alloc(Value::Int(2));
        let c = interp.heap.alloc(Value::Int(3));
        fn noop(_interp: &mut Interpreter) -> StepResult {
            Ok(None)
        }
        interp
            .call(noop, None, &[StackSlot::Val(a), StackSlot::Val(b), StackSlot::Val(c)])
            .unwrap();
        assert_eq!(interp.pop_vals(3).unwrap(), vec![a, b, c]);
    }

    #[test]
    fn eval_top_level_clears_stacks_on_error() {
        let mut interp = Interpreter::new();
        let undefined = interp.heap.alloc(Value::Symbol("not-bound-anywhere".to_string()));
        let root = interp.root_env;
        let err = interp.eval_top_level(root, undefined);
        assert!(err.is_err());
        assert!(interp.arg_stack.is_empty());
        assert!(interp.fn_stack.is_empty());
    }
}
