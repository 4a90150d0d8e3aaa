use crate::types::Operator;
use thiserror::Error;

/// Broad classification of a [`FormulaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected while parsing the token sequence.
    Syntax,
    /// An operation node without exactly two operands.
    Operand,
    /// A variable that cannot be resolved from the context.
    Binding,
    /// A function call that does not match the registry.
    Dispatch,
    /// Raised by a host-registered native function.
    Native,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    // ------------------------------------------------------------ Syntax

    #[error("Parsing Error")]
    Parsing,

    #[error("Parenthesis mismatch")]
    ParenthesisMismatch,

    #[error("Excess closing parenthesis at position {0}")]
    ExcessClosingParenthesis(usize),

    #[error("Operation {0} requires two operands")]
    MissingOperands(Operator),

    #[error("Division by zero is not allowed")]
    DivisionByZero,

    #[error("Unknown function {0}")]
    UnknownFunction(String),

    #[error("Function {0} must be followed by a parenthesized argument list")]
    MalformedCall(String),

    #[error("Empty argument in function {0}")]
    EmptyArgument(String),

    #[error("Adjacent operands without an operation")]
    AdjacentOperands,

    #[error("Unexpected {0}")]
    UnexpectedToken(String),

    #[error("Formula nests deeper than {0} levels")]
    TooDeep(usize),

    // ------------------------------------------------------------ Operand

    #[error("Missing left operand in operation {0}")]
    MissingLeftOperand(Operator),

    #[error("Missing right operand in operation {0}")]
    MissingRightOperand(Operator),

    #[error("Too many operands in operation {0}")]
    ExcessOperands(Operator),

    // ------------------------------------------------------------ Binding

    #[error("Variable {0} undefined in context")]
    VariableUndefined(String),

    #[error("Value {0} undefined in context")]
    ValueUndefined(String),

    // ------------------------------------------------------------ Dispatch

    #[error("Unknown function {name} with {arity} arguments")]
    Dispatch { name: String, arity: usize },

    // ------------------------------------------------------------ Native

    #[error("{0}")]
    Native(String),
}

impl FormulaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FormulaError::Parsing
            | FormulaError::ParenthesisMismatch
            | FormulaError::ExcessClosingParenthesis(_)
            | FormulaError::MissingOperands(_)
            | FormulaError::DivisionByZero
            | FormulaError::UnknownFunction(_)
            | FormulaError::MalformedCall(_)
            | FormulaError::EmptyArgument(_)
            | FormulaError::AdjacentOperands
            | FormulaError::UnexpectedToken(_)
            | FormulaError::TooDeep(_) => ErrorKind::Syntax,
            FormulaError::MissingLeftOperand(_)
            | FormulaError::MissingRightOperand(_)
            | FormulaError::ExcessOperands(_) => ErrorKind::Operand,
            FormulaError::VariableUndefined(_) | FormulaError::ValueUndefined(_) => {
                ErrorKind::Binding
            }
            FormulaError::Dispatch { .. } => ErrorKind::Dispatch,
            FormulaError::Native(_) => ErrorKind::Native,
        }
    }
}
