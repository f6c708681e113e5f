//! Compiler of field-transformation statements.
//!
//! A statement is either a bare field name (copied unchanged), or `"name: expression"`
//! where the expression is a nested function call such as
//! `minus(mult(1, 3), mult(1, sum(2, 3)))`, a constant, or an alias of an existing field.

mod expression_enums;
mod expression_error;
mod expression_parser;
mod expression_token;
mod field_transformation;
mod syntax_tree;

pub use expression_enums::Literal;
pub use expression_error::{ExpressionError, IncorrectExpression, InvalidTransformation};
pub use expression_parser::{DEFAULT_MAX_DEPTH, ParserOptions};
pub use field_transformation::{
    ExpandedTransformationList, FieldTransformation, TransformationItem,
};
pub use syntax_tree::{ExpressionNode, SyntaxTree};

/// Parse a single transformation expression into a [`SyntaxTree`] (wrapped in
/// [`ExpressionNode::Call`]) or a bare [`Literal`], using default [`ParserOptions`].
pub fn parse_expression(expression: &str) -> Result<ExpressionNode, IncorrectExpression> {
    parse_expression_with_options(expression, &ParserOptions::default())
}

/// The same as [`parse_expression`], but with explicit [`ParserOptions`].
pub fn parse_expression_with_options(
    expression: &str,
    options: &ParserOptions,
) -> Result<ExpressionNode, IncorrectExpression> {
    expression_parser::parse_expression_str(expression, options)
        .map_err(|error| IncorrectExpression::from_expression_error(error, expression))
}

/// Compile a list of transformation statements using default [`ParserOptions`].
///
/// See [`ExpandedTransformationList::compile_with_options`].
pub fn compile_transformations<S: AsRef<str>>(
    statements: &[S],
) -> Result<ExpandedTransformationList, InvalidTransformation> {
    ExpandedTransformationList::compile(statements)
}
