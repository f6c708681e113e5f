use crate::aggregation::{AggregateFn, OperationType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a compiled aggregation rule: either an aggregated value `func_name(input_field)`,
/// or a grouping key (`key = true`, no function).
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct AggregationRuleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub func_name: Option<String>,
    pub input_field: String,
    pub key: bool,
}

impl AggregationRuleEntry {
    /// Make a new key entry for the given field.
    pub fn mk_key(field: &str) -> Self {
        AggregationRuleEntry {
            func_name: None,
            input_field: field.to_string(),
            key: true,
        }
    }

    /// Make a new aggregation entry `function(field)`.
    pub fn mk_aggregation(function: &str, field: &str) -> Self {
        AggregationRuleEntry {
            func_name: Some(function.to_string()),
            input_field: field.to_string(),
            key: false,
        }
    }

    /// Resolve `func_name` into a supported [`AggregateFn`], if possible.
    pub fn function(&self) -> Option<AggregateFn> {
        self.func_name
            .as_deref()
            .and_then(|name| AggregateFn::try_from(name).ok())
    }
}

impl fmt::Display for AggregationRuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.key {
            return write!(f, "key: {}", self.input_field);
        }
        match &self.func_name {
            Some(function) => write!(f, "{}({})", function, self.input_field),
            None => write!(f, "{}", self.input_field),
        }
    }
}

/// Result of compiling an aggregation rule set: the operation type and the ordered entries.
///
/// Key entries keep the position of their designator, aggregation entries keep their
/// original order.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct CompiledAggregationRule {
    pub operation_type: OperationType,
    pub rule: Vec<AggregationRuleEntry>,
}

impl CompiledAggregationRule {
    pub fn new(operation_type: OperationType, rule: Vec<AggregationRuleEntry>) -> Self {
        CompiledAggregationRule {
            operation_type,
            rule,
        }
    }

    /// Names of the grouping key fields, in order.
    pub fn key_fields(&self) -> Vec<&str> {
        self.rule
            .iter()
            .filter(|entry| entry.key)
            .map(|entry| entry.input_field.as_str())
            .collect()
    }

    /// Entries that aggregate a value (i.e. are not keys), in order.
    pub fn aggregations(&self) -> impl Iterator<Item = &AggregationRuleEntry> {
        self.rule.iter().filter(|entry| !entry.key)
    }
}
