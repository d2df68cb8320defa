// ABOUTME: The CLI driver: flag parsing, REPL/file/stdin dispatch, and the
// ABOUTME: paren-balance-buffered interactive prompt.

use std::io::IsTerminal;
use std::path::PathBuf;

use bali::error::{BaliError, InterpreterError, Signal};
use bali::eval::eval;
use bali::interpreter::Interpreter;
use bali::parser::{decode_utf8, parse_source, Syntax};
use bali::value::print_value;
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

#[derive(Parser, Debug)]
#[command(name = "bali")]
#[command(version)]
#[command(about = "A tree-walking interpreter for the Bali Lisp dialect")]
struct CliArgs {
    /// Use M-expression surface syntax (default is S-expression)
    #[arg(short = 'm')]
    mexpr: bool,

    /// Program file to execute; omit for REPL (tty) or stdin (non-tty)
    #[arg(value_name = "FILE")]
    program: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let syntax = if args.mexpr {
        Syntax::MExpression
    } else {
        Syntax::SExpression
    };

    let exit_code = match args.program {
        Some(path) => run_file(&path, syntax),
        None if std::io::stdin().is_terminal() => run_repl(syntax),
        None => run_stdin(syntax),
    };

    std::process::exit(exit_code);
}

/// Evaluates `source` top-to-bottom against `interp`, printing nothing per
/// form (only `write` produces output); returns `Err` on the first `error`
/// or unhandled `return` signal, per spec.md §7.
fn run_source(source: &str, syntax: Syntax, interp: &Interpreter) -> Result<(), Signal> {
    let forms = parse_source(source, syntax, 1)?;
    for form in forms {
        eval(&form, &interp.top_level, interp)?;
    }
    Ok(())
}

fn unwrap_error(signal: Signal) -> BaliError {
    match signal {
        Signal::Error(e) => e,
        Signal::Return(_) => BaliError::new("Unexpected 'return'."),
    }
}

/// Runs a file or stdin program to completion, folding the two failure
/// modes named in spec.md §7 (file-open failure, an unhandled `error` or
/// `return`) into the shared `InterpreterError` the driver reports.
fn run_to_completion(contents: &str, syntax: Syntax) -> Result<(), InterpreterError> {
    let interp = Interpreter::new(syntax);
    run_source(contents, syntax, &interp).map_err(|signal| match signal {
        Signal::Error(e) => InterpreterError::Eval(e),
        Signal::Return(_) => InterpreterError::UnexpectedReturn,
    })
}

/// Decodes `bytes` as UTF-8, per spec.md §4.3/§7's "an incomplete or
/// invalid sequence fails with the offending position" contract; reports
/// the resulting positioned error the same way an unhandled interpreter
/// error would be reported.
fn decode_or_report(bytes: &[u8]) -> Result<&str, InterpreterError> {
    decode_utf8(bytes).map_err(|signal| InterpreterError::Eval(unwrap_error(signal)))
}

fn run_file(path: &PathBuf, syntax: Syntax) -> i32 {
    let bytes = match bali::fs::read(&path.to_string_lossy()) {
        Ok(b) => b,
        Err(e) => {
            eprintln!(
                "{}",
                InterpreterError::Io {
                    path: path.display().to_string(),
                    source: e,
                }
            );
            return 1;
        }
    };
    let contents = match decode_or_report(&bytes) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };

    match run_to_completion(contents, syntax) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{e}");
            1
        }
    }
}

fn run_stdin(syntax: Syntax) -> i32 {
    use std::io::Read;
    let mut bytes = Vec::new();
    if let Err(e) = std::io::stdin().read_to_end(&mut bytes) {
        eprintln!(
            "{}",
            InterpreterError::Io {
                path: "<stdin>".to_string(),
                source: e,
            }
        );
        return 1;
    }
    let contents = match decode_or_report(&bytes) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };

    match run_to_completion(contents, syntax) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{e}");
            1
        }
    }
}

/// The paren-balance-buffered interactive prompt (spec.md §6): input
/// accumulates across lines until the open-paren count returns to zero,
/// then every top-level form parsed from the buffer is evaluated and
/// printed; parse/eval errors are printed and the buffer is discarded
/// rather than ending the session.
fn run_repl(syntax: Syntax) -> i32 {
    let interp = Interpreter::new(syntax);
    let mut editor = match DefaultEditor::new() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("bali: Failed to initialize the line editor: {e}");
            return 1;
        }
    };

    let mut buffer = String::new();
    let mut completed_lines = 0usize;
    let mut open_parens: i64 = 0;

    loop {
        let prompt = format!("bali:{completed_lines}:{open_parens}> ");
        match editor.readline(&prompt) {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                open_parens += count_parens(&line);
                buffer.push_str(&line);
                buffer.push('\n');
                completed_lines += 1;

                if open_parens <= 0 {
                    run_repl_buffer(&buffer, syntax, &interp);
                    buffer.clear();
                    open_parens = 0;
                }
            }
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                open_parens = 0;
            }
            Err(ReadlineError::Eof) => return 0,
            Err(e) => {
                eprintln!("bali: {e}");
                return 1;
            }
        }
    }
}

fn run_repl_buffer(buffer: &str, syntax: Syntax, interp: &Interpreter) {
    let forms = match parse_source(buffer, syntax, 1) {
        Ok(forms) => forms,
        Err(signal) => {
            println!("{}", unwrap_error(signal));
            return;
        }
    };

    for form in forms {
        tracing::debug!(form = %print_value(&form), "evaluating REPL form");
        match eval(&form, &interp.top_level, interp) {
            Ok(value) => println!("{}", print_value(&value)),
            Err(Signal::Error(e)) => println!("{e}"),
            Err(Signal::Return(_)) => println!("Unexpected 'return'."),
        }
    }
}

fn count_parens(line: &str) -> i64 {
    let mut count: i64 = 0;
    for c in line.chars() {
        match c {
            '(' => count += 1,
            ')' => count -= 1,
            _ => {}
        }
    }
    count
}
