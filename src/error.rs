/// Errors recorded while turning source text into tokens.
pub mod scan_error;
/// Errors recorded while building statements out of tokens.
pub mod parse_error;
/// Errors that stop execution of a program.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use scan_error::ScanError;

use thiserror::Error;

/// Any error the pipeline can surface to the user.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Scan(error) => Some(error.line()),
            Error::Parse(error) => Some(error.token.line),
            Error::Runtime(error) => error.line(),
        }
    }
}
