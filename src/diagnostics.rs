use std::io::{self, Write};

use log::warn;

use crate::error::{Error, ParseError, RuntimeError, ScanError};

/// Errors collected over one run of the pipeline.
///
/// Scan and parse errors accumulate; a runtime error ends the run, so at most
/// one is ever recorded. Call [`Diagnostics::reset`] between independent runs
/// (e.g. lines typed at the prompt).
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Error>,
    had_error: bool,
    had_runtime_error: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scan_error(&mut self, error: ScanError) {
        warn!("scan error: {error}");
        self.had_error = true;
        self.errors.push(error.into());
    }

    pub fn parse_error(&mut self, error: ParseError) {
        warn!("parse error: {error}");
        self.had_error = true;
        self.errors.push(error.into());
    }

    pub fn runtime_error(&mut self, error: RuntimeError) {
        warn!("runtime error: {error}");
        if self.had_runtime_error {
            return;
        }
        self.had_runtime_error = true;
        self.errors.push(error.into());
    }

    /// A scan or parse error was recorded.
    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn errors(&self) -> impl Iterator<Item = &Error> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn reset(&mut self) {
        self.errors.clear();
        self.had_error = false;
        self.had_runtime_error = false;
    }

    /// Writes one human-readable message per recorded error.
    pub fn report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for error in &self.errors {
            match error {
                Error::Runtime(error) => writeln!(out, "{}", error.report())?,
                _ => writeln!(out, "{error}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    #[test]
    fn first_runtime_error_wins() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.runtime_error(RuntimeError::DivisionByZero {
            operator: Token::eof(1),
        });
        diagnostics.runtime_error(RuntimeError::DivisionByZero {
            operator: Token::eof(2),
        });

        assert!(diagnostics.had_runtime_error());
        assert!(!diagnostics.had_error());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.errors().next().and_then(Error::line), Some(1));
    }

    #[test]
    fn reset_clears_flags() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.scan_error(ScanError::UnterminatedString { line: 4 });
        assert!(diagnostics.had_error());

        diagnostics.reset();
        assert!(!diagnostics.had_error());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn report_renders_every_error() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.scan_error(ScanError::UnexpectedCharacter {
            line: 1,
            character: '@',
        });
        diagnostics.runtime_error(RuntimeError::DivisionByZero {
            operator: Token::eof(2),
        });

        let mut out = Vec::new();
        diagnostics.report(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[line 1] Error: Unexpected character '@'.\nDivision by zero.\n[line 2]\n"
        );
    }
}
