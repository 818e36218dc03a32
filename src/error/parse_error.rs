use thiserror::Error;

use crate::token::Token;

/// A malformed statement, anchored at the token where parsing gave up.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("[line {}] Error{}: {}", .token.line, .token.location(), .message)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl ParseError {
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        ParseError {
            token: token.clone(),
            message: message.into(),
        }
    }
}
