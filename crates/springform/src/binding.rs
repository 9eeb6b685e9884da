//! Seam to the data model a template binds against.

use crate::context::Context;
use std::error::Error as StdError;

/// A data node resolved from a binding expression.
pub trait BoundNode {
    /// Name used for `name` attributes and dom-id generation.
    fn flattened_name(&self) -> String;
    /// Scalar value as display text.
    fn value(&self) -> String;
}

/// Resolves binding expressions. `Ok(None)` means "nothing bound", which is
/// not an error.
pub trait Evaluator {
    fn evaluate(&self, expr: &str, ctx: &Context) -> Result<Option<Box<dyn BoundNode>>, EvalError>;
}

impl<F> Evaluator for F
where
    F: Fn(&str, &Context) -> Result<Option<Box<dyn BoundNode>>, EvalError>,
{
    fn evaluate(&self, expr: &str, ctx: &Context) -> Result<Option<Box<dyn BoundNode>>, EvalError> {
        self(expr, ctx)
    }
}

/// Evaluator that never binds anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBindings;

impl Evaluator for NoBindings {
    fn evaluate(&self, _expr: &str, _ctx: &Context) -> Result<Option<Box<dyn BoundNode>>, EvalError> {
        Ok(None)
    }
}

/// Fixed name/value pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticNode {
    pub name: String,
    pub value: String,
}

impl StaticNode {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn boxed(name: impl Into<String>, value: impl Into<String>) -> Box<dyn BoundNode> {
        Box::new(Self::new(name, value))
    }
}

impl BoundNode for StaticNode {
    fn flattened_name(&self) -> String {
        self.name.clone()
    }

    fn value(&self) -> String {
        self.value.clone()
    }
}

/// Failure to evaluate a binding expression.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct EvalError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
