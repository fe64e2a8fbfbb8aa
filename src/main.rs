use std::fs;
use std::process;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::{prelude::*, EnvFilter, Registry};

use larch::{eval, eval_module, trace, CallTree, Error, Value};

/// Filtering reads `LARCH_LOG` (falling back to `RUST_LOG`), defaulting
/// to `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("LARCH_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(filter)
        .init();
}

fn print_result(result: Result<Value, Error>, trees: &[CallTree]) -> bool {
    for tree in trees {
        eprint!("{tree}");
    }
    match result {
        Ok(value) => {
            println!("{value}");
            true
        }
        Err(err) => {
            eprintln!("{err}");
            false
        }
    }
}

fn run_repl() -> rustyline::Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("larch repl - expressions are evaluated as you enter them; ctrl-d exits");
    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(&line)?;
                print_result(eval(&line), &[]);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let tracing_enabled = args.iter().any(|a| a == "--trace");
    args.retain(|a| a != "--trace");

    match args.as_slice() {
        [] => {
            run_repl()?;
        }
        [flag, expr] if flag == "-e" => {
            let ok = if tracing_enabled {
                let (result, trees) = trace(expr);
                print_result(result, &trees)
            } else {
                print_result(eval(expr), &[])
            };
            if !ok {
                process::exit(1);
            }
        }
        [path] => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("could not read {path}"))?;
            let ok = if tracing_enabled {
                let (result, trees) = larch::trace_module(&source, "main");
                print_result(result, &trees)
            } else {
                print_result(eval_module(&source, "main"), &[])
            };
            if !ok {
                process::exit(1);
            }
        }
        _ => {
            eprintln!("usage: larch [--trace] [file.larch | -e <expression>]");
            process::exit(2);
        }
    }
    Ok(())
}
