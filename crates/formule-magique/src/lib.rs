//! Formule Magique: a small formula language over pre-tokenized input.
//!
//! # Overview
//!
//! An external tokenizer produces a flat sequence of [`Token`]s (constants,
//! variables, `+ - * /`, punctuation and function names). The [`Parser`]
//! turns that sequence into a [`ParseTree`], and [`evaluate`] computes the
//! tree against a [`Context`] of variable bindings. [`FormuleMagique`] wraps
//! both behind `validate` and `evaluate`.
//!
//! # Example
//!
//! ```
//! use formule_magique::{formule_magique, Context, Token, Value};
//!
//! // replace(concat(a, b), "Morceau", "Bout")
//! let tokens = [
//!     Token::function("replace"),
//!     Token::open(),
//!     Token::function("concat"),
//!     Token::open(),
//!     Token::variable("a"),
//!     Token::comma(),
//!     Token::variable("b"),
//!     Token::close(),
//!     Token::comma(),
//!     Token::constant("Morceau"),
//!     Token::comma(),
//!     Token::constant("Bout"),
//!     Token::close(),
//! ];
//! let ctx = Context::new()
//!     .with("a", "Marabout, ")
//!     .with("b", "Morceau de ficelle");
//!
//! let result = formule_magique().evaluate(&tokens, &ctx).unwrap();
//! assert_eq!(result, Value::from("Marabout, Bout de ficelle"));
//! ```

pub mod context;
pub mod error;
pub mod eval_ctx;
pub mod evaluate;
pub mod formule;
pub mod functions;
pub mod parser;
pub mod types;
pub mod util;

// Re-export the core public API
pub use context::Context;
pub use error::{ErrorKind, FormulaError};
pub use eval_ctx::EvalCtx;
pub use evaluate::evaluate;
pub use formule::{formule_magique, FormuleMagique, Validation};
pub use functions::{default_functions, FunctionCollection, FunctionDefinition, NativeFn};
pub use parser::{Parser, ParserOptions};
pub use types::{Operator, ParseTree, Punctuation, Token, Value};
