use crate::schema::FieldType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregation mode of a rule set.
///
/// Only [`OperationType::Reduce`] and [`OperationType::ReduceByKey`] can be compiled, other
/// modes are known but rejected by the compiler.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum OperationType {
    /// Aggregate all records into one; key fields are forbidden.
    #[serde(rename = "reduce")]
    Reduce,
    /// Group records by exactly one (possibly compound) key designator, then aggregate.
    #[serde(rename = "reduceByKey")]
    ReduceByKey,
    #[serde(rename = "groupBy")]
    GroupBy,
}

impl OperationType {
    pub fn requires_key(&self) -> bool {
        matches!(self, OperationType::ReduceByKey | OperationType::GroupBy)
    }
}

impl TryFrom<&str> for OperationType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "reduce" => Ok(OperationType::Reduce),
            "reduceByKey" => Ok(OperationType::ReduceByKey),
            "groupBy" => Ok(OperationType::GroupBy),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationType::Reduce => write!(f, "reduce"),
            OperationType::ReduceByKey => write!(f, "reduceByKey"),
            OperationType::GroupBy => write!(f, "groupBy"),
        }
    }
}

/// Aggregate functions supported in aggregation rules.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum AggregateFn {
    Sum,
    Min,
    Max,
    Count,
}

impl AggregateFn {
    /// Check if this function can be applied to a field of the given type.
    ///
    /// `sum` needs numbers, `min`/`max` also accept dates and timestamps, and `count`
    /// accepts anything.
    pub fn accepts(&self, field_type: FieldType) -> bool {
        match self {
            AggregateFn::Sum => field_type.is_numeric(),
            AggregateFn::Min | AggregateFn::Max => {
                field_type.is_numeric() || field_type.is_temporal()
            }
            AggregateFn::Count => true,
        }
    }
}

impl TryFrom<&str> for AggregateFn {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "sum" => Ok(AggregateFn::Sum),
            "min" => Ok(AggregateFn::Min),
            "max" => Ok(AggregateFn::Max),
            "count" => Ok(AggregateFn::Count),
            _ => Err(()),
        }
    }
}

impl fmt::Display for AggregateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateFn::Sum => write!(f, "sum"),
            AggregateFn::Min => write!(f, "min"),
            AggregateFn::Max => write!(f, "max"),
            AggregateFn::Count => write!(f, "count"),
        }
    }
}
