// ABOUTME: Version, welcome banner, and prelude-path constants

#[allow(dead_code)]
pub const VERSION: &str = "1.0.0";
pub const WELCOME_MESSAGE: &str = "Lisp Interpreter v1.0";
pub const WELCOME_SUBTITLE: &str = "A Scheme-flavored Lisp in Rust with a trampolined evaluator";

/// Loaded relative to the current directory on startup unless `--no-prelude` is
/// given or `--prelude PATH` overrides it. Absent is not an error: the REPL and
/// batch runner both start from an empty root environment in that case.
pub const DEFAULT_PRELUDE_PATH: &str = "prelude.scm";

pub const HISTORY_FILE: &str = ".scheme_history";
