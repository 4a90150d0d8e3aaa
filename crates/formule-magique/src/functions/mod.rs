//! Function registry and the built-in functions.

pub mod arithmetic;
pub mod string;

use crate::error::FormulaError;
use crate::types::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Native implementation of a function. Receives exactly `arity` evaluated
/// arguments.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, FormulaError> + Send + Sync;

/// A registered function.
pub struct FunctionDefinition {
    pub name: String,
    pub arity: usize,
    pub invoke: Arc<NativeFn>,
}

impl FunctionDefinition {
    pub fn new<F>(name: impl Into<String>, arity: usize, invoke: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, FormulaError> + Send + Sync + 'static,
    {
        FunctionDefinition {
            name: name.into(),
            arity,
            invoke: Arc::new(invoke),
        }
    }
}

impl fmt::Debug for FunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDefinition")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Map of function name -> definition.
///
/// Built once, then shared read-only between the parser (existence checks)
/// and the evaluator (dispatch).
///
/// ```
/// use formule_magique::{FunctionCollection, Value};
///
/// let functions = FunctionCollection::new()
///     .register("twice", 1, |args: &[Value]| Ok(Value::from(2.0 * args[0].as_number().unwrap_or(0.0))));
///
/// assert!(functions.has("twice"));
/// assert!(functions.has_with_arity("twice", 1));
/// assert!(!functions.has_with_arity("twice", 2));
/// assert_eq!(functions.call("twice", &[Value::from(21)]), Ok(Value::from(42)));
/// ```
#[derive(Debug, Default, Clone)]
pub struct FunctionCollection {
    functions: HashMap<String, Arc<FunctionDefinition>>,
}

impl FunctionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `invoke` under `name`. A later registration of the same name
    /// replaces the earlier one.
    pub fn register<F>(self, name: impl Into<String>, arity: usize, invoke: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, FormulaError> + Send + Sync + 'static,
    {
        self.with_definition(FunctionDefinition::new(name, arity, invoke))
    }

    pub fn with_definition(mut self, definition: FunctionDefinition) -> Self {
        self.functions
            .insert(definition.name.clone(), Arc::new(definition));
        self
    }

    pub fn has(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn has_with_arity(&self, name: &str, arity: usize) -> bool {
        self.functions
            .get(name)
            .is_some_and(|def| def.arity == arity)
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.get(name).map(Arc::as_ref)
    }

    /// Invokes `name` with already evaluated arguments.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, FormulaError> {
        match self.functions.get(name) {
            Some(def) if def.arity == args.len() => (def.invoke)(args),
            _ => Err(FormulaError::Dispatch {
                name: name.to_string(),
                arity: args.len(),
            }),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// All built-in functions.
pub fn all_functions() -> Vec<FunctionDefinition> {
    let mut defs = Vec::new();
    defs.extend(string::functions());
    defs.extend(arithmetic::functions());
    defs
}

/// The default registry: `concat`, `replace` and `add`.
pub fn default_functions() -> FunctionCollection {
    all_functions()
        .into_iter()
        .fold(FunctionCollection::new(), FunctionCollection::with_definition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_functions() {
        let functions = default_functions();
        assert_eq!(functions.len(), 3);
        assert!(functions.has_with_arity("concat", 2));
        assert!(functions.has_with_arity("replace", 3));
        assert!(functions.has_with_arity("add", 2));
        assert!(!functions.has("substr"));
    }

    #[test]
    fn test_call_rejects_wrong_arity() {
        let functions = default_functions();
        let err = functions
            .call("concat", &[Value::from("a")])
            .unwrap_err();
        assert_eq!(
            err,
            FormulaError::Dispatch {
                name: "concat".to_string(),
                arity: 1
            }
        );
    }

    #[test]
    fn test_builtins_invoked_directly_reject_wrong_arity() {
        let functions = default_functions();
        for name in ["add", "replace"] {
            let def = functions.get(name).unwrap();
            let err = (def.invoke)(&[]).unwrap_err();
            assert_eq!(err.kind(), crate::error::ErrorKind::Dispatch, "{}", name);
        }
    }

    #[test]
    fn test_call_rejects_unknown_name() {
        let err = FunctionCollection::new().call("nope", &[]).unwrap_err();
        assert_eq!(err.to_string(), "Unknown function nope with 0 arguments");
    }

    #[test]
    fn test_register_replaces_previous_definition() {
        let functions = FunctionCollection::new()
            .register("f", 1, |_| Ok(Value::from("first")))
            .register("f", 0, |_| Ok(Value::from("second")));
        assert_eq!(functions.len(), 1);
        assert!(!functions.has_with_arity("f", 1));
        assert_eq!(functions.call("f", &[]), Ok(Value::from("second")));
    }

    #[test]
    fn test_native_errors_propagate() {
        let functions = FunctionCollection::new()
            .register("fail", 0, |_| Err(FormulaError::Native("boom".to_string())));
        assert_eq!(
            functions.call("fail", &[]),
            Err(FormulaError::Native("boom".to_string()))
        );
    }
}
