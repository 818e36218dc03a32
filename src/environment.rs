use std::collections::HashMap;

use crate::{error::RuntimeError, token::Token, value::Value};

/// The scope chain.
///
/// Scopes are stacked innermost-last: each layer's enclosing scope is the one
/// below it, and the bottom layer is the global scope, which is never popped.
#[derive(Debug)]
pub struct Environment {
    layers: Vec<HashMap<String, Value>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            layers: vec![HashMap::new()],
        }
    }

    pub fn add_scope(&mut self) {
        self.layers.push(HashMap::new());
    }

    pub fn del_scope(&mut self) {
        if self.layers.len() > 1 {
            self.layers.pop();
        }
    }

    /// Number of scopes in the chain, globals included.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Binds `name` in the innermost scope, replacing any binding already there.
    pub fn define(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.layers.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        self.layers
            .iter()
            .rev()
            .find_map(|values| values.get(&name.lexeme))
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.clone() })
    }

    /// Rebinds the innermost existing binding of `name`. Never creates one.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        for values in self.layers.iter_mut().rev() {
            if let Some(slot) = values.get_mut(&name.lexeme) {
                *slot = value;
                return Ok(());
            }
        }

        Err(RuntimeError::UndefinedVariable { name: name.clone() })
    }
}
