//! A scanner, parser and tree-walking interpreter for a small dynamically
//! typed scripting language.
//!
//! The pipeline is source text → [`scanner`] → tokens → [`parser`] →
//! statements → [`interpreter::Interpreter`]. Errors from every stage are
//! collected in a [`diagnostics::Diagnostics`] passed through the calls.

pub mod ast_display;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod token_type;
pub mod value;

use std::io::Write;

use diagnostics::Diagnostics;
use interpreter::Interpreter;
use stmt::Stmt;
use token::Token;

pub use scanner::scan;

/// Scans and parses `source`, recording every scan and parse error.
pub fn compile(source: &str, diagnostics: &mut Diagnostics) -> Vec<Stmt> {
    let tokens = scan(source, diagnostics);
    parse_program(&tokens, diagnostics)
}

/// Parses `tokens` as a program, recording every parse error.
pub fn parse_program(tokens: &[Token], diagnostics: &mut Diagnostics) -> Vec<Stmt> {
    let (statements, errors) = parser::parse(tokens);
    for error in errors {
        diagnostics.parse_error(error);
    }
    statements
}

/// Runs `source` as a program on `interpreter`.
///
/// Nothing is executed when scanning or parsing failed. Check
/// [`Diagnostics::had_error`] and [`Diagnostics::had_runtime_error`] afterwards.
pub fn run<W: Write>(source: &str, interpreter: &mut Interpreter<W>, diagnostics: &mut Diagnostics) {
    let statements = compile(source, diagnostics);
    if diagnostics.had_error() {
        return;
    }

    interpreter.interpret(&statements, diagnostics);
}
