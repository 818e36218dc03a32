use std::io::{self, Write};

use log::{debug, trace};

use crate::diagnostics::Diagnostics;
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::expr::Expr;
use crate::stmt::Stmt;
use crate::token::Token;
use crate::token_type::TokenType;
use crate::value::Value;

/// Walks statements against a persistent global scope, printing to `out`.
pub struct Interpreter<W: Write> {
    environment: Environment,
    out: W,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(out: W) -> Self {
        Interpreter {
            environment: Environment::new(),
            out,
        }
    }

    /// Executes `statements` in order. The first runtime error is recorded in
    /// `diagnostics` and stops the run; returns whether that happened.
    pub fn interpret(&mut self, statements: &[Stmt], diagnostics: &mut Diagnostics) -> bool {
        debug!("interpreting {} statements", statements.len());
        for statement in statements {
            trace!("executing {statement}");
            if let Err(error) = statement.execute(&mut self.environment, &mut self.out) {
                diagnostics.runtime_error(error);
                return true;
            }
        }
        false
    }

    pub fn evaluate_expression(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        expr.evaluate(&mut self.environment)
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

trait Execute {
    fn execute(&self, environment: &mut Environment, out: &mut dyn Write) -> Result<(), RuntimeError>;
}

trait Evaluate {
    fn evaluate(&self, environment: &mut Environment) -> Result<Value, RuntimeError>;
}

impl Execute for Stmt {
    fn execute(&self, environment: &mut Environment, out: &mut dyn Write) -> Result<(), RuntimeError> {
        match self {
            Stmt::Block { statements } => execute_block(statements, environment, out)?,
            Stmt::Expression { expression } => {
                expression.evaluate(environment)?;
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if condition.evaluate(environment)?.is_truthy() {
                    then_branch.execute(environment, out)?;
                } else if let Some(else_branch) = else_branch {
                    else_branch.execute(environment, out)?;
                }
            }
            Stmt::Print { expression } => {
                let value = expression.evaluate(environment)?;
                writeln!(out, "{value}")?;
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(initializer) => initializer.evaluate(environment)?,
                    None => Value::Nil,
                };
                environment.define(&name.lexeme, value);
            }
            Stmt::While { condition, body } => {
                while condition.evaluate(environment)?.is_truthy() {
                    body.execute(environment, out)?;
                }
            }
        };
        Ok(())
    }
}

/// Runs `statements` in a fresh child scope, dropped again on every exit path.
fn execute_block(
    statements: &[Stmt],
    environment: &mut Environment,
    out: &mut dyn Write,
) -> Result<(), RuntimeError> {
    environment.add_scope();
    let result = statements
        .iter()
        .try_for_each(|statement| statement.execute(environment, out));
    environment.del_scope();
    result
}

impl Evaluate for Expr {
    fn evaluate(&self, environment: &mut Environment) -> Result<Value, RuntimeError> {
        match self {
            Expr::Assign { name, value } => {
                let value = value.evaluate(environment)?;
                environment.assign(name, value.clone())?;
                Ok(value)
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = left.evaluate(environment)?;
                let right = right.evaluate(environment)?;
                binary(operator, left, right)
            }
            Expr::Grouping { expression } => expression.evaluate(environment),
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = left.evaluate(environment)?;
                let decided = match operator.typ {
                    TokenType::Or => left.is_truthy(),
                    TokenType::And => !left.is_truthy(),
                    _ => {
                        return Err(RuntimeError::UnknownOperator {
                            operator: operator.clone(),
                        })
                    }
                };

                if decided {
                    Ok(left)
                } else {
                    right.evaluate(environment)
                }
            }
            Expr::Unary { operator, right } => {
                let right = right.evaluate(environment)?;
                match operator.typ {
                    TokenType::Bang => Ok(Value::Boolean(!right.is_truthy())),
                    TokenType::Minus => match right {
                        Value::Number(value) => Ok(Value::Number(-value)),
                        _ => Err(RuntimeError::OperandNotNumber {
                            operator: operator.clone(),
                        }),
                    },
                    _ => Err(RuntimeError::UnknownOperator {
                        operator: operator.clone(),
                    }),
                }
            }
            Expr::Variable { name } => environment.get(name),
        }
    }
}

fn binary(operator: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match operator.typ {
        TokenType::Plus => match (left, right) {
            (Value::Number(f1), Value::Number(f2)) => Ok(Value::Number(f1 + f2)),
            (Value::String(s1), Value::String(s2)) => Ok(Value::String(s1 + &s2)),
            _ => Err(RuntimeError::InvalidAddition {
                operator: operator.clone(),
            }),
        },
        TokenType::Minus => {
            let (left, right) = numeric_operands(operator, &left, &right)?;
            Ok(Value::Number(left - right))
        }
        TokenType::Slash => {
            let (left, right) = numeric_operands(operator, &left, &right)?;
            if right == 0f64 {
                return Err(RuntimeError::DivisionByZero {
                    operator: operator.clone(),
                });
            }
            Ok(Value::Number(left / right))
        }
        TokenType::Star => {
            let (left, right) = numeric_operands(operator, &left, &right)?;
            Ok(Value::Number(left * right))
        }
        TokenType::Greater => {
            let (left, right) = numeric_operands(operator, &left, &right)?;
            Ok(Value::Boolean(left > right))
        }
        TokenType::GreaterEqual => {
            let (left, right) = numeric_operands(operator, &left, &right)?;
            Ok(Value::Boolean(left >= right))
        }
        TokenType::Less => {
            let (left, right) = numeric_operands(operator, &left, &right)?;
            Ok(Value::Boolean(left < right))
        }
        TokenType::LessEqual => {
            let (left, right) = numeric_operands(operator, &left, &right)?;
            Ok(Value::Boolean(left <= right))
        }
        TokenType::BangEqual => Ok(Value::Boolean(!left.is_equal(&right))),
        TokenType::EqualEqual => Ok(Value::Boolean(left.is_equal(&right))),
        _ => Err(RuntimeError::UnknownOperator {
            operator: operator.clone(),
        }),
    }
}

fn numeric_operands(operator: &Token, left: &Value, right: &Value) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => Ok((*left, *right)),
        _ => Err(RuntimeError::OperandsNotNumbers {
            operator: operator.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, parse_expression};
    use crate::scanner::scan;
    use indoc::indoc;

    fn evaluate(source: &str) -> Result<Value, RuntimeError> {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan(source, &mut diagnostics);
        let expr = parse_expression(&tokens).unwrap();
        Interpreter::with_output(Vec::new()).evaluate_expression(&expr)
    }

    fn execute(source: &str) -> (String, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan(source, &mut diagnostics);
        let (statements, errors) = parse(&tokens);
        assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");

        let mut interpreter = Interpreter::with_output(Vec::new());
        interpreter.interpret(&statements, &mut diagnostics);
        let output = String::from_utf8(interpreter.into_output()).unwrap();
        (output, diagnostics)
    }

    #[test]
    fn arithmetic() {
        assert_eq!(evaluate("1 + 2 * 3").unwrap(), Value::Number(7.0));
        assert_eq!(evaluate("(1 + 2) * 3").unwrap(), Value::Number(9.0));
        assert_eq!(evaluate("10 / 4 - -1").unwrap(), Value::Number(3.5));
    }

    #[test]
    fn comparison() {
        assert_eq!(evaluate("5 > 3").unwrap(), Value::Boolean(true));
        assert_eq!(evaluate("3 >= 3").unwrap(), Value::Boolean(true));
        assert_eq!(evaluate("2 < 1").unwrap(), Value::Boolean(false));
        assert_eq!(evaluate("1 <= 1").unwrap(), Value::Boolean(true));
    }

    #[test]
    fn comparing_strings_is_an_error() {
        let error = evaluate(r#""a" < "b""#).unwrap_err();
        assert!(matches!(error, RuntimeError::OperandsNotNumbers { .. }));
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(evaluate(r#""a" + "b""#).unwrap(), Value::String("ab".into()));

        let error = evaluate(r#""a" + 1"#).unwrap_err();
        assert!(matches!(error, RuntimeError::InvalidAddition { .. }));
        assert_eq!(error.to_string(), "Operands must be two numbers or two strings.");
    }

    #[test]
    fn equality_and_truthiness() {
        assert_eq!(evaluate("nil == nil").unwrap(), Value::Boolean(true));
        assert_eq!(evaluate("0 == false").unwrap(), Value::Boolean(false));
        assert_eq!(evaluate(r#""1" != 1"#).unwrap(), Value::Boolean(true));
        assert_eq!(evaluate("!0").unwrap(), Value::Boolean(false));
        assert_eq!(evaluate("!nil").unwrap(), Value::Boolean(true));
        assert_eq!(evaluate(r#"!"""#).unwrap(), Value::Boolean(false));
    }

    #[test]
    fn negating_a_non_number() {
        let error = evaluate(r#"-"a""#).unwrap_err();
        assert_eq!(error.to_string(), "Operand must be a number.");
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let error = evaluate("1 / 0").unwrap_err();
        assert!(matches!(error, RuntimeError::DivisionByZero { .. }));
        assert_eq!(error.report(), "Division by zero.\n[line 1]");
    }

    #[test]
    fn logical_operators_return_the_deciding_operand() {
        assert_eq!(evaluate(r#"nil or "yes""#).unwrap(), Value::String("yes".into()));
        assert_eq!(evaluate("1 or 2").unwrap(), Value::Number(1.0));
        assert_eq!(evaluate("nil and 2").unwrap(), Value::Nil);
        assert_eq!(evaluate("1 and 2").unwrap(), Value::Number(2.0));
    }

    #[test]
    fn logical_operators_short_circuit() {
        // the right operands would fail if they were evaluated
        assert_eq!(evaluate("false and 1 / 0").unwrap(), Value::Boolean(false));
        assert_eq!(evaluate("true or undefined").unwrap(), Value::Boolean(true));
    }

    #[test]
    fn chained_assignment() {
        let (output, diagnostics) = execute("var a; var b; a = b = 1; print a; print b;");
        assert!(!diagnostics.had_runtime_error());
        assert_eq!(output, "1\n1\n");
    }

    #[test]
    fn print_formats() {
        let (output, _) = execute(r#"print 3; print 2.5; print "s"; print nil; print 1 == 1;"#);
        assert_eq!(output, "3\n2.5\ns\nnil\ntrue\n");
    }

    #[test]
    fn block_scope_is_dropped() {
        let (output, _) = execute("var a = 1; { var a = 2; print a; } print a;");
        assert_eq!(output, "2\n1\n");
    }

    #[test]
    fn if_else() {
        let source = indoc! {"
            if (0) print \"zero is truthy\"; else print \"unreachable\";
            if (nil) print \"unreachable\"; else print \"nil is falsey\";
            if (false) print \"unreachable\";
        "};
        let (output, _) = execute(source);
        assert_eq!(output, "zero is truthy\nnil is falsey\n");
    }

    #[test]
    fn while_loop() {
        let (output, _) = execute("var i = 0; while (i < 3) { print i; i = i + 1; }");
        assert_eq!(output, "0\n1\n2\n");
    }

    #[test]
    fn for_loop() {
        let source = indoc! {"
            var total = 0;
            for (var i = 1; i <= 4; i = i + 1) total = total + i;
            print total;
        "};
        let (output, _) = execute(source);
        assert_eq!(output, "10\n");
    }

    #[test]
    fn runtime_error_stops_the_run() {
        let (output, diagnostics) = execute("print 1; print x; print 3;");

        assert_eq!(output, "1\n");
        assert!(diagnostics.had_runtime_error());
        let errors: Vec<_> = diagnostics.errors().map(ToString::to_string).collect();
        assert_eq!(errors, vec!["undefined variable 'x'"]);
    }

    #[test]
    fn assignment_requires_declaration() {
        let (_, diagnostics) = execute("x = 1;");
        let mut out = Vec::new();
        diagnostics.report(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "undefined variable 'x'\n[line 1]\n");
    }

    #[test]
    fn error_inside_block_unwinds_its_scope() {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan("{ var inner = 1; print -nil; }", &mut diagnostics);
        let (statements, _) = parse(&tokens);

        let mut interpreter = Interpreter::with_output(Vec::new());
        assert!(interpreter.interpret(&statements, &mut diagnostics));
        assert_eq!(interpreter.environment().depth(), 1);
    }
}
