use std::io;

use thiserror::Error;

use crate::token::Token;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Operand must be a number.")]
    OperandNotNumber { operator: Token },

    #[error("Operands must be numbers.")]
    OperandsNotNumbers { operator: Token },

    #[error("Operands must be two numbers or two strings.")]
    InvalidAddition { operator: Token },

    #[error("Division by zero.")]
    DivisionByZero { operator: Token },

    #[error("Unknown operator '{}'.", .operator.lexeme)]
    UnknownOperator { operator: Token },

    #[error("undefined variable '{}'", .name.lexeme)]
    UndefinedVariable { name: Token },

    #[error("Could not write output: {0}")]
    Output(#[from] io::Error),
}

impl RuntimeError {
    /// The token the error points at. Only output failures have none.
    pub fn token(&self) -> Option<&Token> {
        match self {
            RuntimeError::OperandNotNumber { operator }
            | RuntimeError::OperandsNotNumbers { operator }
            | RuntimeError::InvalidAddition { operator }
            | RuntimeError::DivisionByZero { operator }
            | RuntimeError::UnknownOperator { operator } => Some(operator),
            RuntimeError::UndefinedVariable { name } => Some(name),
            RuntimeError::Output(_) => None,
        }
    }

    pub fn line(&self) -> Option<usize> {
        self.token().map(|token| token.line)
    }

    /// The message followed by the line it happened on, as shown to the user.
    pub fn report(&self) -> String {
        match self.line() {
            Some(line) => format!("{self}\n[line {line}]"),
            None => self.to_string(),
        }
    }
}
