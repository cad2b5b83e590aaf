// ABOUTME: Error types for the reader, evaluator, and trampoline

use thiserror::Error;

/// The taxonomy of errors the interpreter can raise.
///
/// Each variant carries the interpreter source location that raised it, rendered by
/// `main.rs` as `[ERROR:<file>:<line>] <message>` per the propagation policy: every
/// variant except `Internal` unwinds the current top-level evaluation and returns the
/// REPL to its prompt; `Internal` is fatal.
#[derive(Error, Debug, Clone)]
pub enum SchemeError {
    #[error("malformed input: {message}")]
    Reader { message: String },

    #[error("{message}")]
    Type {
        message: String,
        file: &'static str,
        line: u32,
    },

    #[error("{name}: expected {expected} argument{}, got {got}", if *expected == 1 { "" } else { "s" })]
    Arity {
        name: String,
        expected: i32,
        got: usize,
        file: &'static str,
        line: u32,
    },

    #[error("undefined variable: {name}")]
    UndefinedVariable {
        name: String,
        file: &'static str,
        line: u32,
    },

    #[error("integer overflow in {op}")]
    Overflow {
        op: String,
        file: &'static str,
        line: u32,
    },

    #[error("{message}")]
    Division {
        message: String,
        file: &'static str,
        line: u32,
    },

    #[error("internal evaluator error: {message}")]
    Internal {
        message: String,
        file: &'static str,
        line: u32,
    },
}

pub type Result<T> = std::result::Result<T, SchemeError>;

impl SchemeError {
    /// True for the one variant the driver treats as a fatal, process-terminating bug
    /// rather than a user-program error to report and recover from.
    pub fn is_internal(&self) -> bool {
        matches!(self, SchemeError::Internal { .. })
    }

    /// Interpreter source location that raised this error, for the `[ERROR:file:line]`
    /// diagnostic prefix. `Reader` has none of its own; it is reported without one.
    pub fn location(&self) -> Option<(&'static str, u32)> {
        match self {
            SchemeError::Reader { .. } => None,
            SchemeError::Type { file, line, .. }
            | SchemeError::Arity { file, line, .. }
            | SchemeError::UndefinedVariable { file, line, .. }
            | SchemeError::Overflow { file, line, .. }
            | SchemeError::Division { file, line, .. }
            | SchemeError::Internal { file, line, .. } => Some((file, *line)),
        }
    }
}

/// Builds a `SchemeError::Type` tagged with the call site.
#[macro_export]
macro_rules! type_error {
    ($msg:expr) => {
        $crate::error::SchemeError::Type {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };
}

/// Builds a `SchemeError::Arity` tagged with the call site.
#[macro_export]
macro_rules! arity_error {
    ($name:expr, $expected:expr, $got:expr) => {
        $crate::error::SchemeError::Arity {
            name: $name.to_string(),
            expected: $expected,
            got: $got,
            file: file!(),
            line: line!(),
        }
    };
}

/// Builds a `SchemeError::UndefinedVariable` tagged with the call site.
#[macro_export]
macro_rules! undefined_error {
    ($name:expr) => {
        $crate::error::SchemeError::UndefinedVariable {
            name: $name.to_string(),
            file: file!(),
            line: line!(),
        }
    };
}

/// Builds a `SchemeError::Overflow` tagged with the call site.
#[macro_export]
macro_rules! overflow_error {
    ($op:expr) => {
        $crate::error::SchemeError::Overflow {
            op: $op.to_string(),
            file: file!(),
            line: line!(),
        }
    };
}

/// Builds a `SchemeError::Division` tagged with the call site.
#[macro_export]
macro_rules! division_error {
    ($msg:expr) => {
        $crate::error::SchemeError::Division {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };
}

/// Builds a `SchemeError::Internal` tagged with the call site.
#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::error::SchemeError::Internal {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };
}
