use crate::token_type::TokenType;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub typ: TokenType,
    pub lexeme: String,
    pub literal: Option<Value>,
    /// 1-based line the token started on.
    pub line: usize,
}

impl Token {
    pub fn new(typ: TokenType, lexeme: impl Into<String>, literal: Option<Value>, line: usize) -> Self {
        Token {
            typ,
            lexeme: lexeme.into(),
            literal,
            line,
        }
    }

    pub fn eof(line: usize) -> Self {
        Token::new(TokenType::Eof, "", None, line)
    }

    /// Where a diagnostic anchored at this token points, e.g. ` at 'foo'`.
    pub fn location(&self) -> String {
        match self.typ {
            TokenType::Eof => " at end".to_owned(),
            _ => format!(" at '{}'", self.lexeme),
        }
    }
}
