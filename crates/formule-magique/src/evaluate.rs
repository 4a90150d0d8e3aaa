//! Bottom-up evaluation of a [`ParseTree`].

use crate::error::FormulaError;
use crate::eval_ctx::EvalCtx;
use crate::types::{Operator, ParseTree, Value};
use crate::util;

/// Evaluates a parse tree against an execution context.
///
/// - Constants are returned verbatim.
/// - Variables are looked up in the context; a missing name and a falsy value
///   are both errors.
/// - Operations coerce both operands to numbers. Bad coercions yield `NaN`
///   rather than an error.
/// - Functions evaluate every argument left to right, then dispatch through
///   the registry, which also checks the arity.
pub fn evaluate(tree: &ParseTree, ctx: &EvalCtx<'_>) -> Result<Value, FormulaError> {
    match tree {
        ParseTree::Constant { value } => Ok(value.clone()),
        ParseTree::Variable { value } => variable_eval(value, ctx),
        ParseTree::Operation { value, children } => operation_eval(*value, children, ctx),
        ParseTree::Function { value, children } => function_eval(value, children, ctx),
    }
}

fn variable_eval(name: &str, ctx: &EvalCtx<'_>) -> Result<Value, FormulaError> {
    let value = ctx
        .context
        .get(name)
        .ok_or_else(|| FormulaError::VariableUndefined(name.to_string()))?;
    // A bound `0` or `""` is rejected as well.
    if !util::is_truthy(value) {
        return Err(FormulaError::ValueUndefined(name.to_string()));
    }
    Ok(value.clone())
}

fn operation_eval(
    op: Operator,
    children: &[ParseTree],
    ctx: &EvalCtx<'_>,
) -> Result<Value, FormulaError> {
    let (left, right) = match children {
        [] => return Err(FormulaError::MissingLeftOperand(op)),
        [_] => return Err(FormulaError::MissingRightOperand(op)),
        [left, right] => (left, right),
        _ => return Err(FormulaError::ExcessOperands(op)),
    };
    let left = util::num(&evaluate(left, ctx)?);
    let right = util::num(&evaluate(right, ctx)?);
    Ok(Value::Number(op.apply(left, right)))
}

fn function_eval(
    name: &str,
    children: &[ParseTree],
    ctx: &EvalCtx<'_>,
) -> Result<Value, FormulaError> {
    if !ctx.functions.has_with_arity(name, children.len()) {
        return Err(FormulaError::Dispatch {
            name: name.to_string(),
            arity: children.len(),
        });
    }
    let args = children
        .iter()
        .map(|child| evaluate(child, ctx))
        .collect::<Result<Vec<_>, _>>()?;
    ctx.functions.call(name, &args)
}
