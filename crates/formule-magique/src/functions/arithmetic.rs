//! Arithmetic functions.

use super::FunctionDefinition;
use crate::error::FormulaError;
use crate::types::{Operator, Value};
use crate::util;

fn add_eval(args: &[Value]) -> Result<Value, FormulaError> {
    match args {
        [left, right] => Ok(Value::Number(
            Operator::Add.apply(util::num(left), util::num(right)),
        )),
        _ => Err(FormulaError::Dispatch {
            name: "add".to_string(),
            arity: args.len(),
        }),
    }
}

pub fn functions() -> Vec<FunctionDefinition> {
    vec![FunctionDefinition::new("add", 2, add_eval)]
}
