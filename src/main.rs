use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use moonwalk::{Context, Error, Options, StepBudget, Value};
use rustyline::{DefaultEditor, error::ReadlineError};

/// moonwalk runs scripts written in a small language of the Lua family.
///
/// Without a script or code to execute, an interactive session starts.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path of a script to run.
    script: Option<PathBuf>,

    /// Runs the given code (after the script, if any) and prints what it
    /// returns.
    #[arg(short, long, value_name = "CODE")]
    execute: Option<String>,

    /// Reads of undefined variables yield nil instead of failing.
    #[arg(long)]
    lenient_globals: bool,

    /// Maximum depth of nested function calls.
    #[arg(long, value_name = "N", default_value_t = moonwalk::interpreter::evaluator::core::MAX_CALL_DEPTH)]
    max_depth: usize,

    /// Aborts evaluation after this many steps.
    #[arg(long, value_name = "N")]
    step_limit: Option<u64>,

    /// Starts an interactive session after running the script.
    #[arg(short, long)]
    interactive: bool,
}

/// Installs a `tracing` subscriber writing to stderr, only when `RUST_LOG` is
/// set.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)
                                                        .with_target(true)
                                                        .with_level(true))
                                      .with(EnvFilter::from_default_env())
                                      .init();
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    let chunk_name = args.script
                         .as_ref()
                         .map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    let options = Options { strict_globals: !args.lenient_globals,
                            max_call_depth: args.max_depth,
                            chunk_name,
                            ..Options::default() };
    let mut context = Context::with_options(options);
    if let Some(limit) = args.step_limit {
        context.set_interrupt_hook(StepBudget::new(limit));
    }

    if let Some(path) = &args.script {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("Failed to read the script '{}': {e}", path.display());
                return ExitCode::FAILURE;
            },
        };
        if let Err(e) = context.run(&source) {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    }

    if let Some(code) = &args.execute {
        match context.run(code) {
            Ok(values) => print_values(&values),
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            },
        }
    }

    let nothing_to_run = args.script.is_none() && args.execute.is_none();
    if args.interactive || nothing_to_run {
        if let Err(e) = repl(&mut context) {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

/// Reads lines until `exit`, `quit`, Ctrl-C or Ctrl-D, evaluating each one in
/// the same context so bindings persist.
fn repl(context: &mut Context) -> rustyline::Result<()> {
    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if matches!(line, "exit" | "quit") {
                    break;
                }
                rl.add_history_entry(line)?;

                match eval_line(context, line) {
                    Ok(values) => print_values(&values),
                    Err(e) => eprintln!("{e}"),
                }
            },
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

/// Evaluates a line as an expression first, so `1 + 2` echoes `3`, and as a
/// statement list when that does not parse.
fn eval_line(context: &mut Context, line: &str) -> Result<Vec<Value>, Error> {
    match context.run(&format!("return {line}")) {
        Err(Error::Lex(_) | Error::Parse(_)) => context.run(line),
        result => result,
    }
}

fn print_values(values: &[Value]) {
    if values.is_empty() {
        return;
    }
    let text = values.iter().map(ToString::to_string).collect::<Vec<_>>().join("\t");
    println!("{text}");
}
