use lazy_static::lazy_static;
use log::debug;
use std::collections::HashMap;
use std::iter::Peekable;
use std::mem;
use std::str::Chars;

use crate::diagnostics::Diagnostics;
use crate::error::ScanError;
use crate::token::Token;
use crate::token_type::TokenType::{self, *};
use crate::value::Value;

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("and", And),
        ("class", Class),
        ("else", Else),
        ("false", False),
        ("for", For),
        ("fun", Fun),
        ("if", If),
        ("nil", Nil),
        ("or", Or),
        ("print", Print),
        ("return", Return),
        ("super", Super),
        ("this", This),
        ("true", True),
        ("var", Var),
        ("while", While),
    ]);
}

pub struct Scanner<'a> {
    source: Peekable<Chars<'a>>,
    tokens: Vec<Token>,
    /// Lexeme of the token being scanned.
    text: String,
    line: usize,
    start_line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source: source.chars().peekable(),
            tokens: Vec::new(),
            text: String::new(),
            line: 1,
            start_line: 1,
        }
    }

    /// Scans the whole source. Errors go to `diagnostics` and scanning carries
    /// on, so the result is always a complete stream ending in a single EOF.
    pub fn scan_tokens(mut self, diagnostics: &mut Diagnostics) -> Vec<Token> {
        while let Some(c) = self.source.next() {
            self.text.clear();
            self.text.push(c);
            self.start_line = self.line;
            if let Err(error) = self.scan_token(c) {
                diagnostics.scan_error(error);
            }
        }

        self.tokens.push(Token::eof(self.line));
        debug!("scanned {} tokens over {} lines", self.tokens.len(), self.line);
        self.tokens
    }

    fn scan_token(&mut self, c: char) -> Result<(), ScanError> {
        match c {
            '(' => self.add_token(LeftParen),
            ')' => self.add_token(RightParen),
            '{' => self.add_token(LeftBrace),
            '}' => self.add_token(RightBrace),
            ',' => self.add_token(Comma),
            '.' => self.add_token(Dot),
            '-' => self.add_token(Minus),
            '+' => self.add_token(Plus),
            ';' => self.add_token(Semicolon),
            '*' => self.add_token(Star),
            '!' => {
                let matched = self.match_next('=');
                self.add_token(if matched { BangEqual } else { Bang })
            }
            '=' => {
                let matched = self.match_next('=');
                self.add_token(if matched { EqualEqual } else { Equal })
            }
            '<' => {
                let matched = self.match_next('=');
                self.add_token(if matched { LessEqual } else { Less })
            }
            '>' => {
                let matched = self.match_next('=');
                self.add_token(if matched { GreaterEqual } else { Greater })
            }
            '/' => {
                if self.match_next('/') {
                    while self.source.next_if(|&c| c != '\n').is_some() {}
                } else if self.match_next('*') {
                    return self.skip_block_comment();
                } else {
                    self.add_token(Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => return self.scan_string(),
            _ => {
                if is_digit(c) {
                    return self.scan_number();
                } else if is_alpha(c) {
                    self.scan_identifier();
                } else {
                    return Err(ScanError::UnexpectedCharacter {
                        line: self.line,
                        character: c,
                    });
                }
            }
        };
        Ok(())
    }

    fn skip_block_comment(&mut self) -> Result<(), ScanError> {
        while let Some(c) = self.source.next() {
            match c {
                '*' if self.source.next_if_eq(&'/').is_some() => return Ok(()),
                '\n' => self.line += 1,
                _ => {}
            }
        }

        Err(ScanError::UnterminatedComment { line: self.line })
    }

    fn scan_string(&mut self) -> Result<(), ScanError> {
        let mut value = String::new();

        while let Some(c) = self.source.next() {
            self.text.push(c);
            match c {
                '"' => {
                    self.add_literal(StringToken, Some(Value::String(value)));
                    return Ok(());
                }
                '\\' => match self.source.next() {
                    Some(escaped) => {
                        self.text.push(escaped);
                        match escaped {
                            '"' | '\\' => value.push(escaped),
                            'n' => value.push('\n'),
                            't' => value.push('\t'),
                            _ => {
                                if escaped == '\n' {
                                    self.line += 1;
                                }
                                value.push('\\');
                                value.push(escaped);
                            }
                        }
                    }
                    None => value.push('\\'),
                },
                '\n' => {
                    self.line += 1;
                    value.push(c);
                }
                _ => value.push(c),
            }
        }

        Err(ScanError::UnterminatedString { line: self.line })
    }

    fn scan_number(&mut self) -> Result<(), ScanError> {
        self.advance_digits();

        // check for a fractional part
        if self.source.peek() == Some(&'.') {
            // clone the source iterator so that we can peek 2 characters ahead
            let mut cloned = self.source.clone();
            cloned.next();
            if cloned.peek().is_some_and(|&next_c| is_digit(next_c)) {
                self.text.push('.');
                self.source.next();
                self.advance_digits();
            }
        }

        match self.text.parse() {
            Ok(number) => {
                self.add_literal(Number, Some(Value::Number(number)));
                Ok(())
            }
            Err(_) => Err(ScanError::InvalidNumber {
                line: self.line,
                lexeme: mem::take(&mut self.text),
            }),
        }
    }

    fn advance_digits(&mut self) {
        while let Some(c) = self.source.next_if(|&c| is_digit(c)) {
            self.text.push(c);
        }
    }

    fn scan_identifier(&mut self) {
        while let Some(c) = self.source.next_if(|&c| is_alpha_num(c)) {
            self.text.push(c);
        }

        let typ = *KEYWORDS.get(self.text.as_str()).unwrap_or(&Identifier);

        self.add_token(typ);
    }

    fn match_next(&mut self, expected: char) -> bool {
        match self.source.next_if_eq(&expected) {
            Some(c) => {
                self.text.push(c);
                true
            }
            None => false,
        }
    }

    fn add_token(&mut self, typ: TokenType) {
        self.add_literal(typ, None);
    }

    fn add_literal(&mut self, typ: TokenType, literal: Option<Value>) {
        let lexeme = mem::take(&mut self.text);
        self.tokens
            .push(Token::new(typ, lexeme, literal, self.start_line));
    }
}

/// Convenience wrapper around [`Scanner`].
pub fn scan(source: &str, diagnostics: &mut Diagnostics) -> Vec<Token> {
    Scanner::new(source).scan_tokens(diagnostics)
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alpha_num(c: char) -> bool {
    is_alpha(c) || is_digit(c)
}
