use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("[line {line}] Error: Unexpected character '{character}'.")]
    UnexpectedCharacter { line: usize, character: char },

    #[error("[line {line}] Error: Unterminated string.")]
    UnterminatedString { line: usize },

    #[error("[line {line}] Error: Unterminated comment.")]
    UnterminatedComment { line: usize },

    #[error("[line {line}] Error: Can not convert '{lexeme}' to a number.")]
    InvalidNumber { line: usize, lexeme: String },
}

impl ScanError {
    pub fn line(&self) -> usize {
        match self {
            ScanError::UnexpectedCharacter { line, .. }
            | ScanError::UnterminatedString { line }
            | ScanError::UnterminatedComment { line }
            | ScanError::InvalidNumber { line, .. } => *line,
        }
    }
}
