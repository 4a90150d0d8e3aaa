use crate::context::Context;
use crate::functions::FunctionCollection;

/// Everything a tree needs to be evaluated: the variable bindings and the
/// function registry used for dispatch.
#[derive(Debug, Clone, Copy)]
pub struct EvalCtx<'a> {
    pub context: &'a Context,
    pub functions: &'a FunctionCollection,
}

impl<'a> EvalCtx<'a> {
    pub fn new(context: &'a Context, functions: &'a FunctionCollection) -> Self {
        EvalCtx { context, functions }
    }
}
