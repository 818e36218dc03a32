use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use treelox::diagnostics::Diagnostics;
use treelox::interpreter::Interpreter;
use treelox::{parse_program, parser, scan};

/// Runs a script, or starts an interactive prompt when no script is given.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print each parsed statement in prefix form before running it.
    #[arg(long)]
    print_ast: bool,

    script: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    match &args.script {
        Some(path) => run_file(path, args.print_ast),
        None => {
            run_prompt(args.print_ast)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_file(path: &Path, print_ast: bool) -> Result<ExitCode> {
    let source = fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;

    let mut interpreter = Interpreter::new();
    let mut diagnostics = Diagnostics::new();
    run(&source, print_ast, false, &mut interpreter, &mut diagnostics);
    diagnostics
        .report(&mut io::stderr())
        .context("Writing diagnostics")?;

    if diagnostics.had_error() {
        return Ok(ExitCode::from(65));
    }
    if diagnostics.had_runtime_error() {
        return Ok(ExitCode::from(70));
    }
    Ok(ExitCode::SUCCESS)
}

/// Every line runs on the same interpreter, so variables carry over between
/// lines while errors do not.
fn run_prompt(print_ast: bool) -> Result<()> {
    let mut interpreter = Interpreter::new();
    let mut diagnostics = Diagnostics::new();

    loop {
        print!("> ");
        io::stdout().flush().context("Writing prompt")?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input).context("Reading stdin")? == 0 {
            break;
        }
        if input.trim().is_empty() {
            continue;
        }

        run(&input, print_ast, true, &mut interpreter, &mut diagnostics);
        diagnostics
            .report(&mut io::stderr())
            .context("Writing diagnostics")?;
        diagnostics.reset();
    }

    Ok(())
}

fn run<W: Write>(
    source: &str,
    print_ast: bool,
    prompt: bool,
    interpreter: &mut Interpreter<W>,
    diagnostics: &mut Diagnostics,
) {
    let tokens = scan(source, diagnostics);
    if diagnostics.had_error() {
        return;
    }

    // at the prompt a lone expression is evaluated and echoed
    if let Some(expr) = prompt.then(|| parser::parse_expression(&tokens).ok()).flatten() {
        if print_ast {
            eprintln!("{expr}");
        }
        match interpreter.evaluate_expression(&expr) {
            Ok(value) => println!("{value}"),
            Err(error) => diagnostics.runtime_error(error),
        }
        return;
    }

    let statements = parse_program(&tokens, diagnostics);
    if print_ast {
        for statement in &statements {
            eprintln!("{statement}");
        }
    }
    if diagnostics.had_error() {
        return;
    }

    interpreter.interpret(&statements, diagnostics);
}
