use std::borrow::Cow;
use std::iter::Peekable;
use std::slice::Iter;

use log::debug;

use crate::error::ParseError;
use crate::stmt::Stmt;
use crate::token_type::TokenType::{self, *};
use crate::value::Value;
use crate::{expr::Expr, token::Token};

// program        -> declaration* EOF ;
// declaration    -> varDecl | statement ;
// varDecl        -> "var" IDENTIFIER ( "=" expression )? ";" ;
// statement      -> exprStmt | forStmt | ifStmt | printStmt | whileStmt | block ;
// forStmt        -> "for" "(" ( varDecl | exprStmt | ";" ) expression? ";" expression? ")" statement ;
// ifStmt         -> "if" "(" expression ")" statement ( "else" statement )? ;
// whileStmt      -> "while" "(" expression ")" statement ;
// block          -> "{" declaration* "}" ;
//
// expression     -> assignment ;
// assignment     -> IDENTIFIER "=" assignment | logic_or ;
// logic_or       -> logic_and ( "or" logic_and )* ;
// logic_and      -> equality ( "and" equality )* ;
// equality       -> comparison ( ( "!=" | "==" ) comparison )* ;
// comparison     -> term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
// term           -> factor ( ( "-" | "+" ) factor )* ;
// factor         -> unary ( ( "/" | "*" ) unary )* ;
// unary          -> ( "!" | "-" ) unary | primary ;
// primary        -> "true" | "false" | "nil" | NUMBER | STRING | IDENTIFIER | "(" expression ")" ;

type Tokens<'a> = Peekable<Iter<'a, Token>>;
type ParseResult<T> = Result<T, ParseError>;

// parameters: token iterator, and a series of TokenType variants separated by |
// return option of next token
macro_rules! match_types {
    ($tokens:ident, $( $variant:pat_param )|* ) => {
        $tokens.next_if(|token| match token.typ {
            $(
                $variant
            )|* => true,
            _ => false,
        })
    };
}

/// Parses a whole program.
///
/// A broken statement is recorded and skipped up to the next statement
/// boundary, so every independent statement still gets checked.
pub fn parse(tokens: &[Token]) -> (Vec<Stmt>, Vec<ParseError>) {
    let tokens = terminated(tokens);
    let token_iter = &mut tokens.iter().peekable();

    let mut statements = Vec::new();
    let mut errors = Vec::new();
    while peek_type(token_iter) != Eof {
        if let Some(stmt) = declaration(token_iter, &mut errors) {
            statements.push(stmt);
        }
    }

    debug!(
        "parsed {} statements with {} errors",
        statements.len(),
        errors.len()
    );
    (statements, errors)
}

/// Parses a lone expression. Gives up on the first error since there is no
/// following statement to recover into.
pub fn parse_expression(tokens: &[Token]) -> ParseResult<Expr> {
    let tokens = terminated(tokens);
    let token_iter = &mut tokens.iter().peekable();

    let expr = expression(token_iter)?;
    if peek_type(token_iter) != Eof {
        return Err(error(token_iter, "Expected end of expression."));
    }
    Ok(expr)
}

fn terminated(tokens: &[Token]) -> Cow<'_, [Token]> {
    match tokens.last() {
        Some(token) if token.typ == Eof => Cow::Borrowed(tokens),
        last => {
            let mut owned = tokens.to_vec();
            owned.push(Token::eof(last.map_or(1, |token| token.line)));
            Cow::Owned(owned)
        }
    }
}

fn declaration(tokens: &mut Tokens, errors: &mut Vec<ParseError>) -> Option<Stmt> {
    let result = match peek_type(tokens) {
        Var => var_declaration(tokens),
        _ => statement(tokens, errors),
    };

    match result {
        Ok(stmt) => Some(stmt),
        Err(error) => {
            debug!("recovering from: {error}");
            errors.push(error);
            synchronize(tokens);
            None
        }
    }
}

fn var_declaration(tokens: &mut Tokens) -> ParseResult<Stmt> {
    tokens.next();

    let name = consume(tokens, Identifier, "Expected variable name.")?.clone();
    let initializer = match match_types!(tokens, Equal) {
        Some(_) => Some(Box::new(expression(tokens)?)),
        None => None,
    };

    consume(tokens, Semicolon, "Expected ';' after variable declaration.")?;
    Ok(Stmt::Var { name, initializer })
}

fn statement(tokens: &mut Tokens, errors: &mut Vec<ParseError>) -> ParseResult<Stmt> {
    match peek_type(tokens) {
        For => for_statement(tokens, errors),
        If => if_statement(tokens, errors),
        Print => print_statement(tokens),
        While => while_statement(tokens, errors),
        LeftBrace => Ok(Stmt::Block {
            statements: block(tokens, errors)?,
        }),
        _ => expression_statement(tokens),
    }
}

/// `for` has no node of its own: it becomes a block holding the initializer
/// and a `while` whose body runs the increment last.
fn for_statement(tokens: &mut Tokens, errors: &mut Vec<ParseError>) -> ParseResult<Stmt> {
    tokens.next();
    consume(tokens, LeftParen, "Expected '(' after 'for'.")?;

    let initializer = match peek_type(tokens) {
        Semicolon => {
            tokens.next();
            None
        }
        Var => Some(var_declaration(tokens)?),
        _ => Some(expression_statement(tokens)?),
    };

    let condition = match peek_type(tokens) {
        Semicolon => None,
        _ => Some(expression(tokens)?),
    };
    consume(tokens, Semicolon, "Expected ';' after loop condition.")?;

    let increment = match peek_type(tokens) {
        RightParen => None,
        _ => Some(expression(tokens)?),
    };
    consume(tokens, RightParen, "Expected ')' after for clauses.")?;

    let mut body = statement(tokens, errors)?;
    if let Some(increment) = increment {
        body = Stmt::Block {
            statements: vec![
                body,
                Stmt::Expression {
                    expression: Box::new(increment),
                },
            ],
        };
    }

    let condition = condition.unwrap_or(Expr::Literal {
        value: Value::Boolean(true),
    });

    let mut statements: Vec<Stmt> = initializer.into_iter().collect();
    statements.push(Stmt::While {
        condition: Box::new(condition),
        body: Box::new(body),
    });
    Ok(Stmt::Block { statements })
}

fn if_statement(tokens: &mut Tokens, errors: &mut Vec<ParseError>) -> ParseResult<Stmt> {
    tokens.next();
    consume(tokens, LeftParen, "Expected '(' after 'if'.")?;
    let condition = expression(tokens)?;
    consume(tokens, RightParen, "Expected ')' after if condition.")?;

    let then_branch = Box::new(statement(tokens, errors)?);
    let else_branch = match match_types!(tokens, Else) {
        Some(_) => Some(Box::new(statement(tokens, errors)?)),
        None => None,
    };

    Ok(Stmt::If {
        condition: Box::new(condition),
        then_branch,
        else_branch,
    })
}

fn while_statement(tokens: &mut Tokens, errors: &mut Vec<ParseError>) -> ParseResult<Stmt> {
    tokens.next();
    consume(tokens, LeftParen, "Expected '(' after 'while'.")?;
    let condition = expression(tokens)?;
    consume(tokens, RightParen, "Expected ')' after condition.")?;

    Ok(Stmt::While {
        condition: Box::new(condition),
        body: Box::new(statement(tokens, errors)?),
    })
}

fn block(tokens: &mut Tokens, errors: &mut Vec<ParseError>) -> ParseResult<Vec<Stmt>> {
    tokens.next();
    let mut statements = Vec::new();

    while !matches!(peek_type(tokens), RightBrace | Eof) {
        if let Some(stmt) = declaration(tokens, errors) {
            statements.push(stmt);
        }
    }

    consume(tokens, RightBrace, "Expected '}' after block.")?;
    Ok(statements)
}

fn print_statement(tokens: &mut Tokens) -> ParseResult<Stmt> {
    tokens.next();
    let value = expression(tokens)?;
    consume(tokens, Semicolon, "Expected ';' after value.")?;

    Ok(Stmt::Print {
        expression: Box::new(value),
    })
}

fn expression_statement(tokens: &mut Tokens) -> ParseResult<Stmt> {
    let expression = expression(tokens)?;
    consume(tokens, Semicolon, "Expected ';' after expression.")?;

    Ok(Stmt::Expression {
        expression: Box::new(expression),
    })
}

fn expression(tokens: &mut Tokens) -> ParseResult<Expr> {
    assignment(tokens)
}

fn assignment(tokens: &mut Tokens) -> ParseResult<Expr> {
    let expr = logic_or(tokens)?;

    match match_types!(tokens, Equal) {
        Some(equals) => {
            let value = assignment(tokens)?;

            match expr {
                Expr::Variable { name } => Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                }),
                _ => Err(ParseError::new(equals, "Invalid assignment target.")),
            }
        }
        None => Ok(expr),
    }
}

fn logic_or(tokens: &mut Tokens) -> ParseResult<Expr> {
    let mut expr = logic_and(tokens)?;

    while let Some(operator) = match_types!(tokens, Or) {
        let right = logic_and(tokens)?;
        expr = Expr::Logical {
            left: Box::new(expr),
            operator: operator.to_owned(),
            right: Box::new(right),
        };
    }

    Ok(expr)
}

fn logic_and(tokens: &mut Tokens) -> ParseResult<Expr> {
    let mut expr = equality(tokens)?;

    while let Some(operator) = match_types!(tokens, And) {
        let right = equality(tokens)?;
        expr = Expr::Logical {
            left: Box::new(expr),
            operator: operator.to_owned(),
            right: Box::new(right),
        };
    }

    Ok(expr)
}

fn equality(tokens: &mut Tokens) -> ParseResult<Expr> {
    let mut expr = comparison(tokens)?;

    while let Some(operator) = match_types!(tokens, BangEqual | EqualEqual) {
        let right = comparison(tokens)?;
        expr = binary(expr, operator, right);
    }

    Ok(expr)
}

fn comparison(tokens: &mut Tokens) -> ParseResult<Expr> {
    let mut expr = term(tokens)?;

    while let Some(operator) = match_types!(tokens, Greater | GreaterEqual | Less | LessEqual) {
        let right = term(tokens)?;
        expr = binary(expr, operator, right);
    }

    Ok(expr)
}

fn term(tokens: &mut Tokens) -> ParseResult<Expr> {
    let mut expr = factor(tokens)?;

    while let Some(operator) = match_types!(tokens, Minus | Plus) {
        let right = factor(tokens)?;
        expr = binary(expr, operator, right);
    }

    Ok(expr)
}

fn factor(tokens: &mut Tokens) -> ParseResult<Expr> {
    let mut expr = unary(tokens)?;

    while let Some(operator) = match_types!(tokens, Slash | Star) {
        let right = unary(tokens)?;
        expr = binary(expr, operator, right);
    }

    Ok(expr)
}

fn unary(tokens: &mut Tokens) -> ParseResult<Expr> {
    match match_types!(tokens, Bang | Minus) {
        Some(operator) => {
            let right = unary(tokens)?;
            Ok(Expr::Unary {
                operator: operator.to_owned(),
                right: Box::new(right),
            })
        }
        None => primary(tokens),
    }
}

fn primary(tokens: &mut Tokens) -> ParseResult<Expr> {
    let token = match tokens.peek() {
        Some(&token) => token,
        None => return Err(error(tokens, "Expected expression.")),
    };

    let expr = match token.typ {
        False => Expr::Literal {
            value: Value::Boolean(false),
        },
        True => Expr::Literal {
            value: Value::Boolean(true),
        },
        Nil => Expr::Literal { value: Value::Nil },
        Number | StringToken => match &token.literal {
            Some(value) => Expr::Literal {
                value: value.clone(),
            },
            None => return Err(ParseError::new(token, "Expected a literal value.")),
        },
        Identifier => Expr::Variable {
            name: token.to_owned(),
        },
        LeftParen => {
            tokens.next();
            let expression = expression(tokens)?;
            consume(tokens, RightParen, "Expected ')' after expression.")?;
            return Ok(Expr::Grouping {
                expression: Box::new(expression),
            });
        }
        _ => return Err(ParseError::new(token, "Expected expression.")),
    };

    tokens.next();
    Ok(expr)
}

fn binary(left: Expr, operator: &Token, right: Expr) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        operator: operator.to_owned(),
        right: Box::new(right),
    }
}

fn peek_type(tokens: &mut Tokens) -> TokenType {
    tokens.peek().map_or(Eof, |token| token.typ)
}

fn consume<'a>(tokens: &mut Tokens<'a>, typ: TokenType, message: &str) -> ParseResult<&'a Token> {
    match tokens.next_if(|token| token.typ == typ) {
        Some(token) => Ok(token),
        None => Err(error(tokens, message)),
    }
}

/// An error anchored at the current, unconsumed token.
fn error(tokens: &mut Tokens, message: &str) -> ParseError {
    match tokens.peek() {
        Some(token) => ParseError::new(token, message),
        None => ParseError::new(&Token::eof(1), message),
    }
}

/// Skips tokens until the one after a `;` or one that starts a statement.
fn synchronize(tokens: &mut Tokens) {
    while let Some(token) = tokens.next_if(|token| token.typ != Eof) {
        if token.typ == Semicolon {
            return;
        }

        if matches!(
            peek_type(tokens),
            Class | Fun | Var | For | If | While | Print | Return
        ) {
            return;
        }
    }
}
