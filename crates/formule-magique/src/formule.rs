//! The `FormuleMagique` façade: one parser, one registry, two operations.

use crate::context::Context;
use crate::error::FormulaError;
use crate::eval_ctx::EvalCtx;
use crate::evaluate::evaluate;
use crate::functions::{default_functions, FunctionCollection};
use crate::parser::{Parser, ParserOptions};
use crate::types::{ParseTree, Token, Value};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

/// Outcome of [`FormuleMagique::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Validation {
    pub fn valid() -> Self {
        Validation {
            is_valid: true,
            comment: None,
        }
    }

    pub fn invalid(comment: impl Into<String>) -> Self {
        Validation {
            is_valid: false,
            comment: Some(comment.into()),
        }
    }
}

/// Parses and evaluates formulas against a fixed function registry.
///
/// ```
/// use formule_magique::{Context, FormuleMagique, Operator, Token, Value};
///
/// let formule = FormuleMagique::default();
/// let tokens = [
///     Token::variable("price"),
///     Token::operation(Operator::Multiply),
///     Token::constant(3),
/// ];
///
/// assert!(formule.validate(&tokens).is_valid);
/// let ctx = Context::new().with("price", 14);
/// assert_eq!(formule.evaluate(&tokens, &ctx), Ok(Value::from(42)));
/// ```
#[derive(Debug)]
pub struct FormuleMagique {
    parser: Parser,
    functions: Arc<FunctionCollection>,
}

impl FormuleMagique {
    pub fn new(functions: FunctionCollection) -> Self {
        Self::with_options(functions, ParserOptions::default())
    }

    pub fn with_options(functions: FunctionCollection, options: ParserOptions) -> Self {
        let functions = Arc::new(functions);
        FormuleMagique {
            parser: Parser::with_options(Arc::clone(&functions), options),
            functions,
        }
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn functions(&self) -> &FunctionCollection {
        &self.functions
    }

    /// Checks that `tokens` form a well-formed formula. Never fails; parse
    /// errors are reported through [`Validation::comment`].
    pub fn validate(&self, tokens: &[Token]) -> Validation {
        match self.parser.parse(tokens) {
            Ok(_) => Validation::valid(),
            Err(e) => {
                debug!("formula rejected: {}", e);
                Validation::invalid(e.to_string())
            }
        }
    }

    pub fn parse(&self, tokens: &[Token]) -> Result<ParseTree, FormulaError> {
        self.parser.parse(tokens)
    }

    /// Evaluates an already parsed tree with this instance's registry.
    pub fn evaluate_tree(
        &self,
        tree: &ParseTree,
        context: &Context,
    ) -> Result<Value, FormulaError> {
        evaluate(tree, &EvalCtx::new(context, &self.functions))
    }

    /// Parses then evaluates. Errors from either stage propagate.
    pub fn evaluate(&self, tokens: &[Token], context: &Context) -> Result<Value, FormulaError> {
        let tree = self.parse(tokens)?;
        self.evaluate_tree(&tree, context).inspect_err(|e| {
            debug!("formula evaluation failed: {}", e);
        })
    }
}

impl Default for FormuleMagique {
    fn default() -> Self {
        FormuleMagique::new(default_functions())
    }
}

/// Process-wide instance using the default functions.
///
/// Its parse cache is shared by every caller and never evicts: every distinct
/// formula that parses stays memoized for the life of the process. Hosts that
/// feed it an open-ended stream of formulas should call
/// `formule_magique().parser().clear_cache()` periodically, or build their own
/// [`FormuleMagique`] with `ParserOptions { cache: false, .. }`.
pub fn formule_magique() -> &'static FormuleMagique {
    static INSTANCE: OnceLock<FormuleMagique> = OnceLock::new();
    INSTANCE.get_or_init(FormuleMagique::default)
}
