//! Token sequence to [`ParseTree`].
//!
//! The parser works on slices of the input. At each level it either splits
//! the slice on a depth-0 operator, strips one pair of enclosing parentheses,
//! parses a function call, or accepts a single constant/variable.
//!
//! Operators are not ranked the conventional way. The split point is the
//! leftmost depth-0 `+`, else the leftmost `-`, else `/`, else `*`. Chains
//! of the same operator therefore nest to the right: `8 - 2 - 1` is
//! `8 - (2 - 1)`.

use crate::error::FormulaError;
use crate::functions::FunctionCollection;
use crate::types::{Operator, ParseTree, Punctuation, Token, Value};
use log::trace;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Options for [`Parser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Memoize successful parses by a fingerprint of the input tokens.
    pub cache: bool,
    /// Deepest parenthesis nesting and parser recursion accepted. Trees
    /// produced by the parser are never deeper, which also bounds evaluation.
    pub max_depth: usize,
}

impl ParserOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 256;
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            cache: true,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug)]
pub struct Parser {
    functions: Arc<FunctionCollection>,
    options: ParserOptions,
    cache: Mutex<HashMap<String, ParseTree>>,
}

impl Parser {
    pub fn new(functions: Arc<FunctionCollection>) -> Self {
        Self::with_options(functions, ParserOptions::default())
    }

    pub fn with_options(functions: Arc<FunctionCollection>, options: ParserOptions) -> Self {
        Parser {
            functions,
            options,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn functions(&self) -> &FunctionCollection {
        &self.functions
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Parses a whole token sequence into exactly one tree.
    ///
    /// Cached trees are handed out as clones, so the caller owns the result.
    pub fn parse(&self, tokens: &[Token]) -> Result<ParseTree, FormulaError> {
        if tokens.is_empty() {
            return Err(FormulaError::Parsing);
        }
        if !self.options.cache {
            return self.parse_uncached(tokens);
        }
        let key = fingerprint(tokens);
        if let Some(tree) = self.cache().get(&key) {
            trace!("parse cache hit for {} tokens", tokens.len());
            return Ok(tree.clone());
        }
        trace!("parse cache miss for {} tokens", tokens.len());
        let tree = self.parse_uncached(tokens)?;
        self.cache().insert(key, tree.clone());
        Ok(tree)
    }

    /// Number of memoized parses.
    pub fn cache_len(&self) -> usize {
        self.cache().len()
    }

    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    // Entries are inserted whole, so a poisoned map is still consistent.
    fn cache(&self) -> MutexGuard<'_, HashMap<String, ParseTree>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn parse_uncached(&self, tokens: &[Token]) -> Result<ParseTree, FormulaError> {
        check_parentheses(tokens, self.options.max_depth)?;
        self.parse_slice(tokens, 0)
    }

    fn parse_slice(&self, tokens: &[Token], depth: usize) -> Result<ParseTree, FormulaError> {
        if depth > self.options.max_depth {
            return Err(FormulaError::TooDeep(self.options.max_depth));
        }
        if let Some((index, op)) = find_split(tokens) {
            return self.parse_operation(tokens, index, op, depth);
        }
        if is_wrapped(tokens) {
            return self.parse_slice(&tokens[1..tokens.len() - 1], depth + 1);
        }
        match tokens {
            [] => Err(FormulaError::Parsing),
            [Token::Function(name), rest @ ..] => self.parse_function(name, rest, depth),
            [Token::Constant(value)] => Ok(ParseTree::Constant {
                value: value.clone(),
            }),
            [Token::Variable(name)] => Ok(ParseTree::Variable {
                value: name.clone(),
            }),
            _ => Err(match tokens.iter().find(|t| !t.is_leaf()) {
                Some(token) => FormulaError::UnexpectedToken(token.to_string()),
                None => FormulaError::AdjacentOperands,
            }),
        }
    }

    fn parse_operation(
        &self,
        tokens: &[Token],
        index: usize,
        op: Operator,
        depth: usize,
    ) -> Result<ParseTree, FormulaError> {
        let left = &tokens[..index];
        let right = &tokens[index + 1..];
        if left.is_empty() || right.is_empty() {
            return Err(FormulaError::MissingOperands(op));
        }
        // Only a literal zero leading the divisor is caught here, once the
        // parentheses wrapping the whole divisor are peeled off.
        if op == Operator::Divide
            && matches!(peel(right).first(), Some(Token::Constant(Value::Number(n))) if *n == 0.0)
        {
            return Err(FormulaError::DivisionByZero);
        }
        let left = self.parse_slice(left, depth + 1)?;
        let right = self.parse_slice(right, depth + 1)?;
        Ok(ParseTree::operation(op, left, right))
    }

    /// `rest` is everything after the function name.
    fn parse_function(
        &self,
        name: &str,
        rest: &[Token],
        depth: usize,
    ) -> Result<ParseTree, FormulaError> {
        if !self.functions.has(name) {
            return Err(FormulaError::UnknownFunction(name.to_string()));
        }
        if !is_wrapped(rest) {
            return Err(FormulaError::MalformedCall(name.to_string()));
        }
        let children = split_arguments(&rest[1..rest.len() - 1])
            .into_iter()
            .map(|group| {
                if group.is_empty() {
                    Err(FormulaError::EmptyArgument(name.to_string()))
                } else {
                    self.parse_slice(group, depth + 1)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ParseTree::function(name, children))
    }
}

/// Structural, order-sensitive key of a token sequence. Distinguishes `1`
/// from `"1"` and every token kind from the others.
fn fingerprint(tokens: &[Token]) -> String {
    format!("{:?}", tokens)
}

fn check_parentheses(tokens: &[Token], max_depth: usize) -> Result<(), FormulaError> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Punctuation(Punctuation::Open) => {
                depth += 1;
                if depth > max_depth {
                    return Err(FormulaError::TooDeep(max_depth));
                }
            }
            Token::Punctuation(Punctuation::Close) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(FormulaError::ExcessClosingParenthesis(i))?;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(FormulaError::ParenthesisMismatch);
    }
    Ok(())
}

/// Yields `(index, token, depth)`. An opening parenthesis reports the depth
/// it opens, a closing one the depth it returns to.
fn with_depth(tokens: &[Token]) -> impl Iterator<Item = (usize, &Token, usize)> + '_ {
    tokens.iter().enumerate().scan(0usize, |depth, (i, token)| {
        match token {
            Token::Punctuation(Punctuation::Open) => *depth += 1,
            Token::Punctuation(Punctuation::Close) => *depth = depth.saturating_sub(1),
            _ => {}
        }
        Some((i, token, *depth))
    })
}

fn find_split(tokens: &[Token]) -> Option<(usize, Operator)> {
    Operator::SPLIT_ORDER.iter().find_map(|&op| {
        with_depth(tokens)
            .find(|(_, token, depth)| {
                *depth == 0 && matches!(token, Token::Operation(o) if *o == op)
            })
            .map(|(i, _, _)| (i, op))
    })
}

/// Index of the parenthesis closing the one opened at `tokens[0]`.
fn matching_close(tokens: &[Token]) -> Option<usize> {
    if !tokens.first()?.is_punctuation(Punctuation::Open) {
        return None;
    }
    with_depth(tokens)
        .find(|(_, token, depth)| *depth == 0 && token.is_punctuation(Punctuation::Close))
        .map(|(i, _, _)| i)
}

/// True when the slice is one parenthesized group: `( ... )` where the last
/// token closes the first.
fn is_wrapped(tokens: &[Token]) -> bool {
    tokens.len() >= 2 && matching_close(tokens) == Some(tokens.len() - 1)
}

/// Strips every pair of parentheses wrapping the whole slice.
fn peel(mut tokens: &[Token]) -> &[Token] {
    while is_wrapped(tokens) {
        tokens = &tokens[1..tokens.len() - 1];
    }
    tokens
}

fn split_arguments(tokens: &[Token]) -> Vec<&[Token]> {
    if tokens.is_empty() {
        return Vec::new();
    }
    let mut groups = Vec::new();
    let mut start = 0;
    for (i, token, depth) in with_depth(tokens) {
        if depth == 0 && token.is_punctuation(Punctuation::Comma) {
            groups.push(&tokens[start..i]);
            start = i + 1;
        }
    }
    groups.push(&tokens[start..]);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(n: i32) -> Token {
        Token::constant(n)
    }

    #[test]
    fn test_check_parentheses_reports_first_excess() {
        let tokens = [Token::close(), c(1), Token::close()];
        assert_eq!(
            check_parentheses(&tokens, 8),
            Err(FormulaError::ExcessClosingParenthesis(0))
        );
        let tokens = [Token::open(), c(1), Token::close(), Token::close()];
        assert_eq!(
            check_parentheses(&tokens, 8),
            Err(FormulaError::ExcessClosingParenthesis(3))
        );
    }

    #[test]
    fn test_check_parentheses_unclosed() {
        let tokens = [Token::open(), Token::open(), c(1), Token::close()];
        assert_eq!(
            check_parentheses(&tokens, 8),
            Err(FormulaError::ParenthesisMismatch)
        );
    }

    #[test]
    fn test_check_parentheses_depth_limit() {
        let tokens = [Token::open(), Token::open(), c(1), Token::close(), Token::close()];
        assert_eq!(check_parentheses(&tokens, 2), Ok(()));
        assert_eq!(
            check_parentheses(&tokens, 1),
            Err(FormulaError::TooDeep(1))
        );
        // Fails on the opening run, before the missing closers are seen.
        let tokens = vec![Token::open(); 100];
        assert_eq!(
            check_parentheses(&tokens, 8),
            Err(FormulaError::TooDeep(8))
        );
    }

    #[test]
    fn test_peel() {
        let zero = [Token::open(), Token::open(), c(0), Token::close(), Token::close()];
        assert_eq!(peel(&zero), &zero[2..3]);
        // (1) - (0) is not wrapped as a whole.
        let tokens = [
            Token::open(),
            c(1),
            Token::close(),
            Token::operation(Operator::Subtract),
            Token::open(),
            c(0),
            Token::close(),
        ];
        assert_eq!(peel(&tokens), &tokens[..]);
    }

    #[test]
    fn test_find_split_ignores_nested_operators() {
        // (1 + 2) * 3
        let tokens = [
            Token::open(),
            c(1),
            Token::operation(Operator::Add),
            c(2),
            Token::close(),
            Token::operation(Operator::Multiply),
            c(3),
        ];
        assert_eq!(find_split(&tokens), Some((5, Operator::Multiply)));
    }

    #[test]
    fn test_find_split_order() {
        // 1 * 2 / 3 - 4 + 5 - 6
        let tokens = [
            c(1),
            Token::operation(Operator::Multiply),
            c(2),
            Token::operation(Operator::Divide),
            c(3),
            Token::operation(Operator::Subtract),
            c(4),
            Token::operation(Operator::Add),
            c(5),
            Token::operation(Operator::Subtract),
            c(6),
        ];
        assert_eq!(find_split(&tokens), Some((7, Operator::Add)));
        assert_eq!(find_split(&tokens[..7]), Some((5, Operator::Subtract)));
        assert_eq!(find_split(&tokens[..5]), Some((3, Operator::Divide)));
        assert_eq!(find_split(&tokens[..3]), Some((1, Operator::Multiply)));
        assert_eq!(find_split(&tokens[..1]), None);
    }

    #[test]
    fn test_is_wrapped() {
        assert!(is_wrapped(&[Token::open(), c(1), Token::close()]));
        assert!(is_wrapped(&[Token::open(), Token::close()]));
        // (1) + (2): the first parenthesis closes early.
        assert!(!is_wrapped(&[
            Token::open(),
            c(1),
            Token::close(),
            Token::operation(Operator::Add),
            Token::open(),
            c(2),
            Token::close(),
        ]));
        assert!(!is_wrapped(&[c(1)]));
        assert!(!is_wrapped(&[]));
    }

    #[test]
    fn test_split_arguments_respects_nesting() {
        // a, f(b, c), d
        let tokens = [
            Token::variable("a"),
            Token::comma(),
            Token::function("f"),
            Token::open(),
            Token::variable("b"),
            Token::comma(),
            Token::variable("c"),
            Token::close(),
            Token::comma(),
            Token::variable("d"),
        ];
        let groups = split_arguments(&tokens);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0], &tokens[0..1]);
        assert_eq!(groups[1], &tokens[2..8]);
        assert_eq!(groups[2], &tokens[9..]);
    }

    #[test]
    fn test_split_arguments_keeps_empty_groups() {
        let tokens = [Token::variable("a"), Token::comma()];
        let groups = split_arguments(&tokens);
        assert_eq!(groups.len(), 2);
        assert!(groups[1].is_empty());
        assert!(split_arguments(&[]).is_empty());
    }

    #[test]
    fn test_fingerprint_distinguishes_kinds() {
        assert_ne!(
            fingerprint(&[Token::constant(1)]),
            fingerprint(&[Token::constant("1")])
        );
        assert_ne!(
            fingerprint(&[Token::constant("a")]),
            fingerprint(&[Token::variable("a")])
        );
        assert_eq!(
            fingerprint(&[Token::variable("a")]),
            fingerprint(&[Token::variable("a")])
        );
    }
}
