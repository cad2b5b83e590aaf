// ABOUTME: The (help) special form's environment listing and per-binding documentation

use crate::env::EnvId;
use crate::error::SchemeError;
use crate::interp::Interpreter;
use crate::value::{to_display_string, Value, ValueRef};

/// `(help)` with no argument: prints every binding reachable from `env`,
/// grouped by kind (syntax, functions, variables) and aligned by longest name,
/// per the environment's `print` operation.
pub fn print_environment(interp: &Interpreter, env: EnvId) {
    let mut syntax_names = Vec::new();
    let mut function_names = Vec::new();
    let mut variable_names = Vec::new();

    for name in interp.envs.names(env) {
        let Some(v) = interp.envs.lookup(env, &name) else {
            continue;
        };
        match interp.heap.get(v) {
            Value::Syntax { .. } => syntax_names.push(name),
            Value::BuiltinFunction { .. } | Value::UserFunction { .. } => {
                function_names.push(name)
            }
            _ => variable_names.push(name),
        }
    }

    print_group("Syntax", &syntax_names);
    print_group("Functions", &function_names);
    print_group("Variables", &variable_names);
}

fn print_group(label: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    println!("{}:", label);
    let width = names.iter().map(|n| n.len()).max().unwrap_or(0);
    for name in names {
        println!("  {:width$}", name, width = width);
    }
}

/// `(help name)`: prints `name`'s help text (builtins/syntax) or its
/// reconstructed `(lambda ...)` source (user functions).
pub fn print_binding(interp: &Interpreter, env: EnvId, name_ref: ValueRef) -> Result<(), SchemeError> {
    let name = match interp.heap.get(name_ref) {
        Value::Symbol(s) => s.clone(),
        other => {
            return Err(crate::type_error!(format!(
                "help's operand must be a symbol, found {}",
                other.type_name()
            )))
        }
    };
    let Some(v) = interp.envs.lookup(env, &name) else {
        return Err(crate::undefined_error!(name));
    };
    match interp.heap.get(v) {
        Value::BuiltinFunction { help, .. } | Value::Syntax { help, .. } => {
            println!("{}: {}", name, help);
        }
        Value::UserFunction { .. } => {
            println!("{}: {}", name, to_display_string(interp, v));
        }
        _ => {
            println!("{} = {}", name, to_display_string(interp, v));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_of_undefined_help_target_is_undefined_variable() {
        let mut interp = Interpreter::new();
        let name = interp.heap.alloc(Value::Symbol("never-bound".to_string()));
        let root = interp.root_env;
        assert!(print_binding(&interp, root, name).is_err());
    }

    #[test]
    fn help_on_a_known_builtin_succeeds() {
        let mut interp = Interpreter::new();
        let name = interp.heap.alloc(Value::Symbol("car".to_string()));
        let root = interp.root_env;
        assert!(print_binding(&interp, root, name).is_ok());
    }
}
