use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Variable bindings supplied to a single evaluation.
///
/// Deserializes from a flat JSON object such as `{"a": 12, "b": "text"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    vars: HashMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Binds `name`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Builder form of [`Context::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl From<HashMap<String, Value>> for Context {
    fn from(vars: HashMap<String, Value>) -> Self {
        Context { vars }
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Context {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_object() {
        let ctx: Context = serde_json::from_value(json!({"a": 123, "b": "text"})).unwrap();
        assert_eq!(ctx.get("a"), Some(&Value::from(123)));
        assert_eq!(ctx.get("b"), Some(&Value::from("text")));
        assert!(!ctx.has("c"));
    }

    #[test]
    fn test_from_iter_and_set() {
        let mut ctx: Context = [("a", 1)].into_iter().collect();
        ctx.set("a", "overwritten");
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.get("a"), Some(&Value::from("overwritten")));
    }
}
