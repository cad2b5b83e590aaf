mod builtins;
mod config;
mod env;
mod error;
mod eval;
mod heap;
mod help;
mod highlighter;
mod interp;
mod parser;
mod special_forms;
mod trampoline;
mod value;

use clap::Parser;
use config::{DEFAULT_PRELUDE_PATH, HISTORY_FILE, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use highlighter::LispHelper;
use interp::Interpreter;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use std::path::PathBuf;

/// A Scheme-flavored Lisp interpreter
#[derive(Parser, Debug)]
#[command(name = "lisp-llm-sandbox")]
#[command(version = config::VERSION)]
#[command(about = "A Scheme-flavored Lisp interpreter with a trampolined evaluator")]
struct CliArgs {
    /// Script file to execute (optional; if omitted, starts the REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Skip loading the prelude
    #[arg(long = "no-prelude")]
    no_prelude: bool,

    /// Load the prelude from PATH instead of the default location
    #[arg(long = "prelude", value_name = "PATH")]
    prelude: Option<PathBuf>,
}

fn main() {
    let args = CliArgs::parse();
    let mut interp = Interpreter::new();

    if !args.no_prelude {
        let path = args.prelude.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_PRELUDE_PATH));
        load_prelude(&mut interp, &path);
    }

    if let Some(script_path) = args.script {
        match run_script(&mut interp, &script_path) {
            Ok(()) => std::process::exit(0),
            Err(()) => std::process::exit(1),
        }
    }

    run_repl(&mut interp);
}

/// Loads the prelude if it exists; its absence is not an error, it is simply
/// skipped (a fresh checkout has no prelude file yet).
fn load_prelude(interp: &mut Interpreter, path: &PathBuf) {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return;
    };
    if let Err(()) = eval_all(interp, &contents) {
        eprintln!("Warning: failed to load prelude at {}", path.display());
    }
}

fn run_script(interp: &mut Interpreter, path: &PathBuf) -> Result<(), ()> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("Cannot read script file {}: {}", path.display(), e);
    })?;
    eval_all(interp, &contents)
}

/// Evaluates every top-level form in `src` in order, printing a diagnostic
/// and stopping at the first error. Results are not printed in this mode.
fn eval_all(interp: &mut Interpreter, src: &str) -> Result<(), ()> {
    let mut reader = parser::Reader::new(src);
    loop {
        let expr = reader.read(&mut interp.heap).map_err(|e| print_error(&e))?;
        if expr == interp.heap.eof {
            return Ok(());
        }
        let root = interp.root_env;
        interp.eval_top_level(root, expr).map_err(|e| {
            print_error(&e);
            if e.is_internal() {
                std::process::exit(1);
            }
        })?;
        interp.collect_garbage();
    }
}

fn run_repl(interp: &mut Interpreter) {
    let rl_config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<LispHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(rl_config).expect("failed to initialize the line editor");
    rl.set_helper(Some(LispHelper::new()));
    let _ = rl.load_history(HISTORY_FILE);

    println!("{}", WELCOME_MESSAGE);
    println!("{}", WELCOME_SUBTITLE);

    loop {
        match rl.readline("lisp> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let mut reader = parser::Reader::new(&line);
                match reader.read(&mut interp.heap) {
                    Ok(expr) if expr == interp.heap.eof => {
                        println!("Goodbye!");
                        break;
                    }
                    Ok(expr) => {
                        let root = interp.root_env;
                        match interp.eval_top_level(root, expr) {
                            Ok(result) => {
                                let rendered = value::to_display_string(interp, result);
                                println!("=> {}", LispHelper::highlight_output(&rendered));
                            }
                            Err(e) => {
                                print_error(&e);
                                if e.is_internal() {
                                    std::process::exit(1);
                                }
                            }
                        }
                        interp.collect_garbage();
                    }
                    Err(e) => print_error(&e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
}

fn print_error(e: &error::SchemeError) {
    match e.location() {
        Some((file, line)) => eprintln!("[ERROR:{}:{}] {}", file, line, e),
        None => eprintln!("[ERROR] {}", e),
    }
}
