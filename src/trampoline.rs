// ABOUTME: Trampoline step and stack-slot types shared by the evaluator core

use crate::env::EnvId;
use crate::error::SchemeError;
use crate::interp::Interpreter;
use crate::value::ValueRef;

/// One unit of trampoline work. A step takes no explicit arguments of its own: its
/// inputs are already sitting on `Interpreter::arg_stack`/`fn_stack`. Returning
/// `Ok(Some(step))` continues the trampoline at `step`; `Ok(None)` is the stop
/// sentinel (the driver loop halts and reads `Interpreter::last_return`); `Err`
/// propagates a user or internal error up through `Interpreter::eval_top_level`.
pub type StepFn = fn(&mut Interpreter) -> StepResult;

pub type StepResult = Result<Option<StepFn>, SchemeError>;

/// A heterogeneous entry on the argument stack. Steps agree by convention on the
/// exact sequence of slot kinds they push and pop; popping the wrong variant is an
/// `InternalError` (a bug in this crate's step wiring, not in the user's program).
#[derive(Debug, Clone, Copy)]
pub enum StackSlot {
    Val(ValueRef),
    Env(EnvId),
    Int(i64),
    Size(usize),
}

impl StackSlot {
    pub fn as_val(self) -> Option<ValueRef> {
        match self {
            StackSlot::Val(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_env(self) -> Option<EnvId> {
        match self {
            StackSlot::Env(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_int(self) -> Option<i64> {
        match self {
            StackSlot::Int(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_size(self) -> Option<usize> {
        match self {
            StackSlot::Size(n) => Some(n),
            _ => None,
        }
    }
}
