// Variable environment.
//
// A flat name -> Value map, created fresh on every function call and
// destroyed when the call returns: the source language has no block
// scoping beyond the function, so unlike the corpus's own `Env<T>`,
// which chains parent scopes for lexical nesting, this one never chains.

use std::collections::HashMap;

use crate::error::{CompileFault, Result};
use crate::value::Value;

#[derive(Debug, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment { bindings: HashMap::new() }
    }

    /// Binds a fresh declaration. Redeclaring a name silently shadows
    /// the previous binding in this environment's map, mirroring the
    /// source language's lack of block scoping (there is nowhere else
    /// for the old binding to go).
    pub fn declare(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    /// `Get`: returns the Value bound to `name`, aliasing
    /// the variable's storage rather than copying it. A `Byte`
    /// clone carries the same cell index, so consuming it (e.g. via
    /// `+=`) invalidates the variable unless the caller wrapped the
    /// read in `Copy`.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.bindings
            .get(name)
            .cloned()
            .ok_or_else(|| CompileFault::UnknownVariable { name: name.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_get_is_a_fault() {
        let env = Environment::new();
        assert_eq!(
            env.get("x"),
            Err(CompileFault::UnknownVariable { name: "x".to_string() })
        );
    }

    #[test]
    fn get_aliases_rather_than_copies() {
        let mut env = Environment::new();
        env.declare("x", Value::Byte(7));
        assert_eq!(env.get("x").unwrap(), Value::Byte(7));
        assert_eq!(env.get("x").unwrap(), Value::Byte(7));
    }
}
