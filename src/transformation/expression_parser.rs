use crate::transformation::expression_token::{
    ExpressionToken, ExpressionTokenData, tokenize_expression,
};
use crate::transformation::{ExpressionError, ExpressionNode, Literal, SyntaxTree};
use crate::utils::is_word;
use ExpressionTokenData::{Close, Comma, Open, Quoted, Text};
use serde::{Deserialize, Serialize};

/// Default limit on how deeply function calls can be nested in one expression.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options of the expression parser.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ParserOptions {
    /// Maximal number of nested function calls. Deeper expressions are rejected
    /// with [`ExpressionError::NestingTooDeep`].
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Parse a transformation expression string into an expression tree.
/// Basically a wrapper for tokenize+parse.
pub fn parse_expression_str(
    expression: &str,
    options: &ParserOptions,
) -> Result<ExpressionNode, ExpressionError> {
    if expression.trim().is_empty() {
        return Err(ExpressionError::EmptyExpression);
    }
    let tokens = tokenize_expression(expression);
    check_parentheses(&tokens)?;
    let mut parser = ExpressionParser {
        tokens: &tokens,
        cursor: 0,
        max_depth: options.max_depth,
    };
    let node = parser.parse_argument(0)?;
    if let Some(token) = parser.peek() {
        return Err(unexpected(token));
    }
    Ok(node)
}

/// Count parentheses of the whole expression. Quoted text is already a single token, so
/// parentheses inside string literals are not counted.
fn check_parentheses(tokens: &[ExpressionToken]) -> Result<(), ExpressionError> {
    let open = tokens.iter().filter(|t| t.data == Open).count();
    let close = tokens.iter().filter(|t| t.data == Close).count();
    if open != close {
        Err(ExpressionError::UnbalancedParentheses { open, close })
    } else {
        Ok(())
    }
}

fn unexpected(token: &ExpressionToken) -> ExpressionError {
    ExpressionError::UnexpectedToken {
        position: token.position,
        token: token.to_string(),
    }
}

struct ExpressionParser<'a> {
    tokens: &'a [ExpressionToken],
    cursor: usize,
    max_depth: usize,
}

impl<'a> ExpressionParser<'a> {
    fn peek(&self) -> Option<&'a ExpressionToken> {
        self.tokens.get(self.cursor)
    }

    fn peek_data(&self) -> Option<&'a ExpressionTokenData> {
        self.peek().map(|token| &token.data)
    }

    /// Position right after the last consumed token, used for errors at the end of input.
    fn end_position(&self) -> usize {
        match self.cursor.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.position + token.data.to_string().chars().count(),
            None => 0,
        }
    }

    /// Parse one argument: a quoted string, a nested call, or an unquoted literal/alias.
    /// The argument ends before the next `,` or `)`, which are left to the caller.
    fn parse_argument(&mut self, depth: usize) -> Result<ExpressionNode, ExpressionError> {
        let Some(token) = self.peek() else {
            return Err(ExpressionError::EmptyArgument {
                position: self.end_position(),
            });
        };
        match &token.data {
            Comma | Close => Err(ExpressionError::EmptyArgument {
                position: token.position,
            }),
            Open => Err(unexpected(token)),
            Quoted(value) => {
                self.cursor += 1;
                Ok(Literal::Str(value.clone()).into())
            }
            Text(value) => {
                self.cursor += 1;
                if self.peek_data() == Some(&Open) {
                    if !is_word(value) {
                        return Err(ExpressionError::InvalidFunctionName {
                            position: token.position,
                            name: value.clone(),
                        });
                    }
                    let tree = self.parse_call(value, depth + 1)?;
                    Ok(tree.into())
                } else {
                    Ok(Literal::classify(value).into())
                }
            }
        }
    }

    /// Parse the parenthesized argument list of the function `name`. The cursor must be
    /// at the opening parenthesis.
    fn parse_call(&mut self, name: &str, depth: usize) -> Result<SyntaxTree, ExpressionError> {
        if depth > self.max_depth {
            return Err(ExpressionError::NestingTooDeep {
                limit: self.max_depth,
            });
        }
        debug_assert_eq!(self.peek_data(), Some(&Open));
        self.cursor += 1;

        let mut children = Vec::new();
        if self.peek_data() == Some(&Close) {
            self.cursor += 1;
            return Ok(SyntaxTree::new(name, children));
        }

        loop {
            children.push(self.parse_argument(depth)?);
            match self.peek() {
                Some(token) if token.data == Comma => self.cursor += 1,
                Some(token) if token.data == Close => {
                    self.cursor += 1;
                    return Ok(SyntaxTree::new(name, children));
                }
                Some(token) => return Err(unexpected(token)),
                None => {
                    return Err(ExpressionError::UnexpectedEnd {
                        position: self.end_position(),
                    });
                }
            }
        }
    }
}
