//! String functions.

use super::FunctionDefinition;
use crate::error::FormulaError;
use crate::types::Value;
use crate::util;

fn concat_eval(args: &[Value]) -> Result<Value, FormulaError> {
    let mut result = String::new();
    for arg in args {
        result.push_str(&util::str_val(arg));
    }
    Ok(Value::String(result))
}

fn replace_eval(args: &[Value]) -> Result<Value, FormulaError> {
    let [source, target, replacement] = args else {
        return Err(FormulaError::Dispatch {
            name: "replace".to_string(),
            arity: args.len(),
        });
    };
    let source = util::str_val(source);
    Ok(Value::String(source.replace(
        &util::str_val(target),
        &util::str_val(replacement),
    )))
}

pub fn functions() -> Vec<FunctionDefinition> {
    vec![
        FunctionDefinition::new("concat", 2, concat_eval),
        FunctionDefinition::new("replace", 3, replace_eval),
    ]
}
