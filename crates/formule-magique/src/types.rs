use serde::{Deserialize, Serialize};
use std::fmt;

/// A formula value: either a number or a string.
///
/// Numbers follow IEEE-754 semantics, so `NaN` and the infinities are
/// ordinary values that propagate through arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    String(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Number(_) => None,
            Value::String(s) => Some(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&crate::util::number_to_string(*n)),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operator {
    /// Order in which the parser looks for a split point. The first operator
    /// of this list found at depth 0 becomes the root of the slice.
    pub const SPLIT_ORDER: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Divide,
        Operator::Multiply,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }

    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Punctuation {
    #[serde(rename = ",")]
    Comma,
    #[serde(rename = "(")]
    Open,
    #[serde(rename = ")")]
    Close,
}

impl Punctuation {
    pub fn symbol(self) -> &'static str {
        match self {
            Punctuation::Comma => ",",
            Punctuation::Open => "(",
            Punctuation::Close => ")",
        }
    }
}

/// One lexical unit handed to the parser by an external tokenizer.
///
/// Serializes as `{"type": "constant", "value": 1}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Token {
    Function(String),
    Constant(Value),
    Punctuation(Punctuation),
    Operation(Operator),
    Variable(String),
}

impl Token {
    pub fn constant(value: impl Into<Value>) -> Self {
        Token::Constant(value.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Token::Variable(name.into())
    }

    pub fn function(name: impl Into<String>) -> Self {
        Token::Function(name.into())
    }

    pub fn operation(op: Operator) -> Self {
        Token::Operation(op)
    }

    pub fn open() -> Self {
        Token::Punctuation(Punctuation::Open)
    }

    pub fn close() -> Self {
        Token::Punctuation(Punctuation::Close)
    }

    pub fn comma() -> Self {
        Token::Punctuation(Punctuation::Comma)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Token::Constant(_) | Token::Variable(_))
    }

    pub(crate) fn is_punctuation(&self, p: Punctuation) -> bool {
        matches!(self, Token::Punctuation(q) if *q == p)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Function(name) => write!(f, "function {}", name),
            Token::Constant(Value::String(s)) => write!(f, "constant {:?}", s),
            Token::Constant(value) => write!(f, "constant {}", value),
            Token::Punctuation(p) => write!(f, "punctuation {}", p.symbol()),
            Token::Operation(op) => write!(f, "operation {}", op),
            Token::Variable(name) => write!(f, "variable {}", name),
        }
    }
}

/// The tree produced by the parser.
///
/// Only operation and function nodes own children. Serializes in the same
/// shape as [`Token`] plus a `children` array on inner nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParseTree {
    Constant {
        value: Value,
    },
    Variable {
        value: String,
    },
    Operation {
        value: Operator,
        #[serde(default)]
        children: Vec<ParseTree>,
    },
    Function {
        value: String,
        #[serde(default)]
        children: Vec<ParseTree>,
    },
}

impl ParseTree {
    pub fn constant(value: impl Into<Value>) -> Self {
        ParseTree::Constant { value: value.into() }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        ParseTree::Variable { value: name.into() }
    }

    pub fn operation(op: Operator, left: ParseTree, right: ParseTree) -> Self {
        ParseTree::Operation {
            value: op,
            children: vec![left, right],
        }
    }

    pub fn function(name: impl Into<String>, children: Vec<ParseTree>) -> Self {
        ParseTree::Function {
            value: name.into(),
            children,
        }
    }

    pub fn children(&self) -> &[ParseTree] {
        match self {
            ParseTree::Operation { children, .. } | ParseTree::Function { children, .. } => {
                children
            }
            ParseTree::Constant { .. } | ParseTree::Variable { .. } => &[],
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(ParseTree::depth).max().unwrap_or(0)
    }
}
