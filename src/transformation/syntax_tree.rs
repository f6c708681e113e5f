use crate::transformation::Literal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// A function call node of a transformation expression: the `operation` name and its
/// positional arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyntaxTree {
    pub operation: String,
    pub children: Vec<ExpressionNode>,
}

/// A node of a transformation expression. Either a nested function call or a leaf [`Literal`].
///
/// A bare literal only appears at the top level when the whole expression is a constant or
/// an alias; inside a [`SyntaxTree`], it is an argument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ExpressionNode {
    Call(SyntaxTree),
    Literal(Literal),
}

impl SyntaxTree {
    pub fn new(operation: &str, children: Vec<ExpressionNode>) -> SyntaxTree {
        SyntaxTree {
            operation: operation.to_string(),
            children,
        }
    }

    /// Number of nested call levels, a single call has depth `1`.
    pub fn depth(&self) -> usize {
        let inner = self
            .children
            .iter()
            .map(ExpressionNode::depth)
            .max()
            .unwrap_or(0);
        inner + 1
    }

    /// Collect all identifiers (field references) used anywhere in this tree.
    pub fn referenced_fields(&self) -> BTreeSet<&str> {
        let mut result = BTreeSet::new();
        self.collect_identifiers(&mut result);
        result
    }

    fn collect_identifiers<'a>(&'a self, result: &mut BTreeSet<&'a str>) {
        for child in &self.children {
            match child {
                ExpressionNode::Call(tree) => tree.collect_identifiers(result),
                ExpressionNode::Literal(literal) => {
                    if let Some(name) = literal.as_identifier() {
                        result.insert(name);
                    }
                }
            }
        }
    }
}

/// Utility constructors, mostly useful in tests.
impl ExpressionNode {
    pub fn mk_call(operation: &str, children: Vec<ExpressionNode>) -> ExpressionNode {
        ExpressionNode::Call(SyntaxTree::new(operation, children))
    }

    pub fn mk_int(value: i64) -> ExpressionNode {
        ExpressionNode::Literal(Literal::Int(value))
    }

    pub fn mk_float(value: f64) -> ExpressionNode {
        ExpressionNode::Literal(Literal::Float(value))
    }

    pub fn mk_bool(value: bool) -> ExpressionNode {
        ExpressionNode::Literal(Literal::Bool(value))
    }

    pub fn mk_str(value: &str) -> ExpressionNode {
        ExpressionNode::Literal(Literal::Str(value.to_string()))
    }

    pub fn mk_identifier(name: &str) -> ExpressionNode {
        ExpressionNode::Literal(Literal::Identifier(name.to_string()))
    }
}

impl ExpressionNode {
    pub fn as_tree(&self) -> Option<&SyntaxTree> {
        match self {
            ExpressionNode::Call(tree) => Some(tree),
            ExpressionNode::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            ExpressionNode::Call(_) => None,
            ExpressionNode::Literal(literal) => Some(literal),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            ExpressionNode::Call(tree) => tree.depth(),
            ExpressionNode::Literal(_) => 0,
        }
    }

    pub fn referenced_fields(&self) -> BTreeSet<&str> {
        match self {
            ExpressionNode::Call(tree) => tree.referenced_fields(),
            ExpressionNode::Literal(literal) => literal.as_identifier().into_iter().collect(),
        }
    }
}

impl From<SyntaxTree> for ExpressionNode {
    fn from(value: SyntaxTree) -> Self {
        ExpressionNode::Call(value)
    }
}

impl From<Literal> for ExpressionNode {
    fn from(value: Literal) -> Self {
        ExpressionNode::Literal(value)
    }
}

impl Display for SyntaxTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.operation)?;
        if let Some(first) = self.children.first() {
            write!(f, "{first}")?;
        }
        for child in self.children.iter().skip(1) {
            write!(f, ", {child}")?;
        }
        write!(f, ")")
    }
}

impl Display for ExpressionNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpressionNode::Call(tree) => write!(f, "{tree}"),
            ExpressionNode::Literal(literal) => write!(f, "{literal}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::transformation::ExpressionNode;

    #[test]
    fn display_and_depth() {
        let node = ExpressionNode::mk_call(
            "minus",
            vec![
                ExpressionNode::mk_identifier("bytes"),
                ExpressionNode::mk_call(
                    "mult",
                    vec![ExpressionNode::mk_float(1.5), ExpressionNode::mk_str("x")],
                ),
            ],
        );
        assert_eq!(node.to_string(), "minus(bytes, mult(1.5, 'x'))");
        assert_eq!(node.depth(), 2);
        assert_eq!(ExpressionNode::mk_int(3).depth(), 0);
        assert_eq!(ExpressionNode::mk_call("now", vec![]).to_string(), "now()");
    }

    #[test]
    fn referenced_fields() {
        let node = ExpressionNode::mk_call(
            "div",
            vec![
                ExpressionNode::mk_identifier("total_bytes"),
                ExpressionNode::mk_call(
                    "sum",
                    vec![
                        ExpressionNode::mk_identifier("packets"),
                        ExpressionNode::mk_str("not_a_field"),
                        ExpressionNode::mk_identifier("total_bytes"),
                    ],
                ),
            ],
        );
        let fields = node.referenced_fields().into_iter().collect::<Vec<_>>();
        assert_eq!(fields, vec!["packets", "total_bytes"]);
        let alias = ExpressionNode::mk_identifier("dst_ip");
        assert_eq!(alias.referenced_fields().len(), 1);
    }
}
