/// A runtime value. The language has exactly these four kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
    Nil,
}

impl Value {
    /// `nil` and `false` are falsey, everything else (including `0` and `""`) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Nil => false,
            _ => true,
        }
    }

    /// Language-level equality. Never fails; differing kinds are unequal.
    pub fn is_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Nil, _) | (_, Value::Nil) => false,
            (Value::Boolean(b1), Value::Boolean(b2)) => b1 == b2,
            (Value::Number(f1), Value::Number(f2)) => f1 == f2,
            (Value::String(s1), Value::String(s2)) => s1 == s2,
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Nil => "nil",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_empty_string_are_truthy() {
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::String(String::new()).is_truthy());
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
    }

    #[test]
    fn equality_across_kinds() {
        assert!(Value::Nil.is_equal(&Value::Nil));
        assert!(!Value::Number(0.0).is_equal(&Value::Boolean(false)));
        assert!(!Value::Nil.is_equal(&Value::Boolean(false)));
        assert!(!Value::String("1".into()).is_equal(&Value::Number(1.0)));
        assert!(Value::String("a".into()).is_equal(&Value::String("a".into())));
    }
}
