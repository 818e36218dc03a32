use std::fmt;

use crate::{expr::Expr, stmt::Stmt, token::Token, value::Value};

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(number) => {
                if number.fract() == 0f64 {
                    write!(f, "{number:.0}")
                } else {
                    write!(f, "{number}")
                }
            }
            Value::String(s) => write!(f, "{s}"),
            Value::Nil => write!(f, "nil"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

/// Parenthesized prefix form, e.g. `(+ 1 (* 2 3))`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Assign { name, value } => write!(f, "(= {name} {value})"),
            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => write!(f, "({operator} {left} {right})"),
            Expr::Grouping { expression } => write!(f, "(group {expression})"),
            Expr::Literal { value } => write_literal(f, value),
            Expr::Unary { operator, right } => write!(f, "({operator} {right})"),
            Expr::Variable { name } => write!(f, "{name}"),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Block { statements } => {
                write!(f, "(block")?;
                for statement in statements {
                    write!(f, " {statement}")?;
                }
                write!(f, ")")
            }
            Stmt::Expression { expression } => write!(f, "(; {expression})"),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => write!(f, "(if {condition} {then_branch} {else_branch})"),
                None => write!(f, "(if {condition} {then_branch})"),
            },
            Stmt::Print { expression } => write!(f, "(print {expression})"),
            Stmt::Var { name, initializer } => match initializer {
                Some(initializer) => write!(f, "(var {name} {initializer})"),
                None => write!(f, "(var {name})"),
            },
            Stmt::While { condition, body } => write!(f, "(while {condition} {body})"),
        }
    }
}

fn write_literal(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::String(s) => write!(f, "\"{}\"", escape(s)),
        _ => write!(f, "{value}"),
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl Expr {
    /// Renders the expression back into source text that parses to the same tree.
    pub fn to_source(&self) -> String {
        match self {
            Expr::Assign { name, value } => format!("{name} = {}", value.to_source()),
            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => format!("{} {operator} {}", left.to_source(), right.to_source()),
            Expr::Grouping { expression } => format!("({})", expression.to_source()),
            Expr::Literal { value } => match value {
                Value::String(s) => format!("\"{}\"", escape(s)),
                _ => value.to_string(),
            },
            Expr::Unary { operator, right } => format!("{operator}{}", right.to_source()),
            Expr::Variable { name } => name.lexeme.clone(),
        }
    }
}

impl Stmt {
    /// Renders the statement back into source text that parses to the same tree.
    pub fn to_source(&self) -> String {
        match self {
            Stmt::Block { statements } if statements.is_empty() => "{}".to_owned(),
            Stmt::Block { statements } => format!("{{ {} }}", program_source(statements, " ")),
            Stmt::Expression { expression } => format!("{};", expression.to_source()),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut source = format!("if ({}) {}", condition.to_source(), then_branch.to_source());
                if let Some(else_branch) = else_branch {
                    source.push_str(" else ");
                    source.push_str(&else_branch.to_source());
                }
                source
            }
            Stmt::Print { expression } => format!("print {};", expression.to_source()),
            Stmt::Var { name, initializer } => match initializer {
                Some(initializer) => format!("var {name} = {};", initializer.to_source()),
                None => format!("var {name};"),
            },
            Stmt::While { condition, body } => {
                format!("while ({}) {}", condition.to_source(), body.to_source())
            }
        }
    }
}

/// Source text for a whole program, one statement per `separator`.
pub fn program_source(statements: &[Stmt], separator: &str) -> String {
    statements
        .iter()
        .map(Stmt::to_source)
        .collect::<Vec<_>>()
        .join(separator)
}
