use crate::transformation::expression_parser::parse_expression_str;
use crate::transformation::{
    ExpressionNode, IncorrectExpression, InvalidTransformation, ParserOptions,
};
use crate::utils::take_if_not_blank;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// A new (or replaced) field computed by an expression: `"name: body"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldTransformation {
    /// Name of the destination field.
    pub name: String,
    /// Either a call tree, or a bare literal/alias when the body is not a function call.
    pub body: ExpressionNode,
}

impl FieldTransformation {
    pub fn new(name: &str, body: ExpressionNode) -> FieldTransformation {
        FieldTransformation {
            name: name.to_string(),
            body,
        }
    }
}

/// One compiled transformation statement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TransformationItem {
    /// A field copied from the input record unchanged.
    Field(String),
    Transformation(FieldTransformation),
}

impl TransformationItem {
    /// Name of the output column produced by this item.
    pub fn output_name(&self) -> &str {
        match self {
            TransformationItem::Field(name) => name.as_str(),
            TransformationItem::Transformation(transformation) => transformation.name.as_str(),
        }
    }

    pub fn as_transformation(&self) -> Option<&FieldTransformation> {
        match self {
            TransformationItem::Field(_) => None,
            TransformationItem::Transformation(transformation) => Some(transformation),
        }
    }
}

/// Ordered result of compiling a list of transformation statements. The order of items
/// follows the order of statements and determines the order of output columns.
///
/// Destination names are not checked for uniqueness.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpandedTransformationList {
    items: Vec<TransformationItem>,
}

impl ExpandedTransformationList {
    /// Compile `statements` using default [`ParserOptions`].
    pub fn compile<S: AsRef<str>>(
        statements: &[S],
    ) -> Result<ExpandedTransformationList, InvalidTransformation> {
        Self::compile_with_options(statements, &ParserOptions::default())
    }

    /// Compile transformation statements. Each statement is either a bare field name, or
    /// `"name: expression"`, split at the first `:`. Blank statements are skipped.
    pub fn compile_with_options<S: AsRef<str>>(
        statements: &[S],
        options: &ParserOptions,
    ) -> Result<ExpandedTransformationList, InvalidTransformation> {
        let mut items = Vec::with_capacity(statements.len());
        for statement in statements {
            let Some(statement) = take_if_not_blank(statement.as_ref()) else {
                continue;
            };
            let item = compile_statement(statement.as_str(), options)?;
            trace!("Compiled transformation statement into `{item:?}`.");
            items.push(item);
        }
        debug!("Compiled {} transformation statement(s).", items.len());
        Ok(ExpandedTransformationList { items })
    }

    pub fn items(&self) -> &[TransformationItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransformationItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Names of the output columns, in order.
    pub fn output_fields(&self) -> Vec<&str> {
        self.items.iter().map(TransformationItem::output_name).collect()
    }
}

impl From<Vec<TransformationItem>> for ExpandedTransformationList {
    fn from(items: Vec<TransformationItem>) -> Self {
        ExpandedTransformationList { items }
    }
}

impl IntoIterator for ExpandedTransformationList {
    type Item = TransformationItem;
    type IntoIter = std::vec::IntoIter<TransformationItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExpandedTransformationList {
    type Item = &'a TransformationItem;
    type IntoIter = std::slice::Iter<'a, TransformationItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Compile one trimmed, non-blank statement.
fn compile_statement(
    statement: &str,
    options: &ParserOptions,
) -> Result<TransformationItem, InvalidTransformation> {
    let Some((name, body)) = statement.split_once(':') else {
        return Ok(TransformationItem::Field(statement.to_string()));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(InvalidTransformation::MissingFieldName {
            statement: statement.to_string(),
        });
    }
    let body = body.trim();
    let body = parse_expression_str(body, options).map_err(|error| {
        InvalidTransformation::Expression {
            field: name.to_string(),
            source: IncorrectExpression::from_expression_error(error, body),
        }
    })?;
    Ok(TransformationItem::Transformation(FieldTransformation::new(
        name, body,
    )))
}
