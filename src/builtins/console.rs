// ABOUTME: The display primitive: writes operands to stdout

use crate::error::SchemeError;
use crate::interp::Interpreter;
use crate::value::{to_display_string, Value, ValueRef};

pub fn register(interp: &mut Interpreter) {
    super::def_builtin(
        interp,
        "display",
        -1,
        op_display,
        "(display v...) writes each operand's display form to stdout, space-separated, followed by a newline.",
    );
}

fn op_display(interp: &mut Interpreter, args: &[ValueRef]) -> Result<ValueRef, SchemeError> {
    let parts: Vec<String> = args.iter().map(|&a| render(interp, a)).collect();
    println!("{}", parts.join(" "));
    Ok(interp.heap.void)
}

fn render(interp: &Interpreter, v: ValueRef) -> String {
    match interp.heap.get(v) {
        Value::Str(s) => s.clone(),
        _ => to_display_string(interp, v),
    }
}
