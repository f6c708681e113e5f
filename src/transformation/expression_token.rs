use std::fmt::{Display, Formatter};

/// Enum of all possible tokens occurring in a transformation expression.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ExpressionTokenData {
    /// Opening parenthesis `(`.
    Open,
    /// Closing parenthesis `)`.
    Close,
    /// Argument separator `,`.
    Comma,
    /// Content of a single- or double-quoted string, with escapes resolved.
    Quoted(String),
    /// A trimmed run of any other characters: names, numbers, or free-form aliases.
    Text(String),
}

impl ExpressionTokenData {
    pub fn at(self, position: usize) -> ExpressionToken {
        ExpressionToken {
            data: self,
            position,
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ExpressionToken {
    pub position: usize,
    pub data: ExpressionTokenData,
}

impl Display for ExpressionTokenData {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpressionTokenData::Open => write!(f, "("),
            ExpressionTokenData::Close => write!(f, ")"),
            ExpressionTokenData::Comma => write!(f, ","),
            ExpressionTokenData::Quoted(value) => write!(f, "'{value}'"),
            ExpressionTokenData::Text(value) => write!(f, "{value}"),
        }
    }
}

impl Display for ExpressionToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.data)
    }
}

/// Tokenize a transformation expression into a flat list of tokens.
///
/// Positions are character offsets into `expression`. Whitespace between tokens is dropped,
/// but whitespace inside a text run is kept (only the ends are trimmed).
///
/// A quote opens a string literal only at the start of a token, and only when the literal
/// is closed and followed by `,`, `)` or the end of input. Any other quote is an ordinary
/// character of a text run, so `O'Brien` or `'abc` stay plain text.
pub fn tokenize_expression(expression: &str) -> Vec<ExpressionToken> {
    let chars: Vec<char> = expression.chars().collect();
    let mut result = Vec::new();
    let mut position = 0;

    while position < chars.len() {
        match chars[position] {
            c if c.is_whitespace() => position += 1,
            '(' => {
                result.push(ExpressionTokenData::Open.at(position));
                position += 1;
            }
            ')' => {
                result.push(ExpressionTokenData::Close.at(position));
                position += 1;
            }
            ',' => {
                result.push(ExpressionTokenData::Comma.at(position));
                position += 1;
            }
            c => {
                if let Some((value, length)) = collect_quoted_str(&chars, position, c) {
                    result.push(ExpressionTokenData::Quoted(value).at(position));
                    position += length;
                    continue;
                }
                let text = collect_text_str(&chars, position);
                let length = text.chars().count();
                let token = ExpressionTokenData::Text(text.trim_end().to_string());
                result.push(token.at(position));
                position += length;
            }
        }
    }

    result
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '(' | ')' | ',')
}

/// Collects a run of non-delimiter characters, starting at `start_at`.
fn collect_text_str(input: &[char], start_at: usize) -> String {
    input[start_at..]
        .iter()
        .take_while(|c| !is_delimiter(**c))
        .collect()
}

/// Collects a quoted string literal starting at `start_at`, if `quote` is a quote character.
///
/// Returns the unescaped content and the length of the literal including both quotes, or
/// `None` when the literal is not closed or is followed by anything other than whitespace
/// and `,`, `)` or the end of input.
/// Supported escapes are `\\`, `\'`, `\"`, `\n` and `\t`; any other escaped character is
/// kept as is, including the backslash.
fn collect_quoted_str(input: &[char], start_at: usize, quote: char) -> Option<(String, usize)> {
    if quote != '\'' && quote != '"' {
        return None;
    }
    let mut value = String::new();
    let mut position = start_at + 1;
    while position < input.len() {
        match input[position] {
            '\\' if position + 1 < input.len() => {
                match input[position + 1] {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    c @ ('\\' | '\'' | '"') => value.push(c),
                    c => {
                        value.push('\\');
                        value.push(c);
                    }
                }
                position += 2;
            }
            c if c == quote => {
                let closed = input[position + 1..]
                    .iter()
                    .find(|c| !c.is_whitespace())
                    .is_none_or(|c| matches!(*c, ',' | ')'));
                return closed.then(|| (value, position - start_at + 1));
            }
            c => {
                value.push(c);
                position += 1;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use crate::transformation::expression_token::{ExpressionTokenData, tokenize_expression};
    use ExpressionTokenData::{Close, Comma, Open, Quoted, Text};

    fn text(value: &str) -> ExpressionTokenData {
        Text(value.to_string())
    }

    #[test]
    fn test_simple_call() {
        let result = tokenize_expression("sum(2, 2,3)");
        assert_eq!(
            result,
            vec![
                text("sum").at(0),
                Open.at(3),
                text("2").at(4),
                Comma.at(5),
                text("2").at(7),
                Comma.at(8),
                text("3").at(9),
                Close.at(10),
            ]
        );
    }

    #[test]
    fn test_inner_whitespace_is_kept() {
        let result = tokenize_expression("  a b  ");
        assert_eq!(result, vec![text("a b").at(2)]);
    }

    #[test]
    fn test_quoted_strings_are_single_tokens() {
        let result = tokenize_expression(r#"concat('a, (b', "c\"d")"#);
        assert_eq!(
            result,
            vec![
                text("concat").at(0),
                Open.at(6),
                Quoted("a, (b".to_string()).at(7),
                Comma.at(14),
                Quoted("c\"d".to_string()).at(16),
                Close.at(22),
            ]
        );
    }

    #[test]
    fn test_escapes() {
        let result = tokenize_expression(r"'it\'s\n\x'");
        assert_eq!(result, vec![Quoted("it's\n\\x".to_string()).at(0)]);
    }

    #[test]
    fn test_unclosed_quote_is_text() {
        let result = tokenize_expression("f('abc)");
        assert_eq!(result, vec![text("f").at(0), Open.at(1), text("'abc").at(2), Close.at(6)]);
    }

    #[test]
    fn test_quotes_inside_text() {
        assert_eq!(tokenize_expression("it's"), vec![text("it's").at(0)]);
        assert_eq!(tokenize_expression(" a'b' "), vec![text("a'b'").at(1)]);
        let result = tokenize_expression("f(O'Brien, x)");
        assert_eq!(
            result,
            vec![
                text("f").at(0),
                Open.at(1),
                text("O'Brien").at(2),
                Comma.at(9),
                text("x").at(11),
                Close.at(12),
            ]
        );
    }

    #[test]
    fn test_quote_followed_by_text() {
        assert_eq!(tokenize_expression("'a'b"), vec![text("'a'b").at(0)]);
        assert_eq!(
            tokenize_expression("'a' , b"),
            vec![Quoted("a".to_string()).at(0), Comma.at(4), text("b").at(6)]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize_expression("   "), vec![]);
    }
}
