use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").unwrap());
static FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?([0-9]+\.[0-9]*|\.[0-9]+|[0-9]+)([eE][+-]?[0-9]+)?$").unwrap()
});

/// A leaf value of a transformation expression.
///
/// A leaf is either a typed constant or an [`Literal::Identifier`], which is a reference to
/// an existing field (an alias). Quoted text always becomes [`Literal::Str`], everything
/// else that is not a recognized constant is an identifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Identifier(String),
}

impl Literal {
    /// Classify unquoted text. The order of the checks matters: boolean keywords first,
    /// then integers, then floats, and anything else is an identifier.
    pub fn classify(text: &str) -> Literal {
        let text = text.trim();
        match text {
            "True" => return Literal::Bool(true),
            "False" => return Literal::Bool(false),
            _ => (),
        }
        if INTEGER.is_match(text) {
            if let Ok(value) = text.parse::<i64>() {
                return Literal::Int(value);
            }
        }
        // Integers that do not fit into `i64` end up here as well. Values that overflow
        // `f64` stay identifiers, since they have no finite representation.
        if FLOAT.is_match(text) {
            if let Ok(value) = text.parse::<f64>() {
                if value.is_finite() {
                    return Literal::Float(value);
                }
            }
        }
        Literal::Identifier(text.to_string())
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Literal::Identifier(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(true) => write!(f, "True"),
            Literal::Bool(false) => write!(f, "False"),
            Literal::Int(value) => write!(f, "{value}"),
            // Debug output keeps the decimal point, so the value reads back as a float.
            Literal::Float(value) => write!(f, "{value:?}"),
            Literal::Str(value) => {
                let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
                write!(f, "'{escaped}'")
            }
            Literal::Identifier(name) => write!(f, "{name}"),
        }
    }
}
