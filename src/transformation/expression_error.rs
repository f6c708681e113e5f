use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error produced by the expression tokenizer and parser. The public API for this is
/// [`IncorrectExpression`], which also carries the original input string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum ExpressionError {
    #[error("Incorrect expression: {open} open brackets and {close} close brackets")]
    UnbalancedParentheses { open: usize, close: usize },
    #[error("Expression is empty")]
    EmptyExpression,
    #[error("Argument is empty at position `{position}`")]
    EmptyArgument { position: usize },
    #[error("Unexpected `{token}` at position `{position}`")]
    UnexpectedToken { position: usize, token: String },
    #[error("Input ended while expecting `)` at position `{position}`")]
    UnexpectedEnd { position: usize },
    #[error("`{name}` is not a valid function name at position `{position}`")]
    InvalidFunctionName { position: usize, name: String },
    #[error("Expression is nested deeper than the limit of {limit} calls")]
    NestingTooDeep { limit: usize },
}

/// An error raised when a transformation expression is invalid and cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[error("Invalid expression `{expression}`: {error}")]
pub struct IncorrectExpression {
    pub expression: String,
    pub error: ExpressionError,
}

impl IncorrectExpression {
    pub(crate) fn from_expression_error(error: ExpressionError, expression: &str) -> Self {
        IncorrectExpression {
            expression: expression.to_string(),
            error,
        }
    }
}

/// An error raised when a transformation statement (`"name: expression"` or a bare field
/// name) cannot be compiled.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum InvalidTransformation {
    #[error("Destination field name is missing in statement `{statement}`")]
    MissingFieldName { statement: String },
    #[error("Invalid transformation of field `{field}`: {source}")]
    Expression {
        field: String,
        #[source]
        source: IncorrectExpression,
    },
}
