use crate::aggregation::{AggregateFn, OperationType};
use crate::utils::format_name_set;
use std::collections::BTreeSet;
use thiserror::Error;

/// An error raised when an aggregation rule set is malformed, or does not fit the schema
/// of the aggregated records.
///
/// The messages are stable and can be matched on by callers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum NotValidAggregationExpression {
    /// The entry is not a `func(field)` call nor a key designator.
    #[error("Error in the field: {entry}")]
    MalformedEntry { entry: String },
    /// The entry contains more than one call, or something after a valid call.
    #[error("Error in the rule: {entry}")]
    AmbiguousEntry { entry: String },
    #[error("Invalid characters detected in rule: {entry}")]
    InvalidCharacters { entry: String },
    #[error(
        "The number of opening and closing parentheses does not match: {open} opening and {close} closing in `{entry}`"
    )]
    UnbalancedParentheses {
        entry: String,
        open: usize,
        close: usize,
    },
    /// More than one key designator, or any key designator where no key is allowed.
    #[error("Key field is not unique in rule for operation {operation}")]
    KeyNotUnique { operation: OperationType },
    #[error("The operation {operation} don't contain key field")]
    MissingKey { operation: OperationType },
    #[error("The operation {operation} is not supported by the aggregation compiler")]
    UnsupportedOperation { operation: String },
    #[error("Unsupported function(s): {}", format_name_set(.0))]
    UnsupportedFunctions(BTreeSet<String>),
    /// Fields referenced but missing in the schema, together with schema fields that are
    /// never referenced.
    #[error("Unsupported or unused field(s): {}", format_name_set(.0))]
    UnknownOrUnusedFields(BTreeSet<String>),
    #[error("Aggregate already aggregated field {field}")]
    AlreadyAggregated { field: String },
    #[error("Incorrect type of field {field} for function {function}")]
    IncorrectFieldType { field: String, function: AggregateFn },
}
