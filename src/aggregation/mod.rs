//! Compiler of aggregation rules.
//!
//! A rule set is a list of entries such as `["key: src_ip", "sum(bytes)", "count(packets)"]`
//! together with an operation type (`reduce` or `reduceByKey`). Compilation first parses the
//! entries into a [`CompiledAggregationRule`], then validates it against a [`Schema`].

mod _impl_validation;
mod aggregation_enums;
mod aggregation_error;
mod rule_entry;
mod rule_parser;

pub use aggregation_enums::{AggregateFn, OperationType};
pub use aggregation_error::NotValidAggregationExpression;
pub use rule_entry::{AggregationRuleEntry, CompiledAggregationRule};

use crate::ContextualValidation;
use crate::schema::Schema;
use log::debug;

impl CompiledAggregationRule {
    /// Parse and validate an aggregation rule set.
    ///
    /// Parsing problems are reported before any schema validation takes place. If the rule
    /// set violates several schema constraints, only the first one is returned; use
    /// [`ContextualValidation::validate`] on a parsed rule to obtain all of them.
    pub fn compile<S: AsRef<str>>(
        operation_type: &str,
        rules: &[S],
        schema: &Schema,
    ) -> Result<CompiledAggregationRule, NotValidAggregationExpression> {
        let compiled = CompiledAggregationRule::parse(operation_type, rules)?;
        compiled.check(schema)?;
        debug!(
            "Compiled `{}` aggregation with key field(s) {:?}.",
            compiled.operation_type,
            compiled.key_fields()
        );
        Ok(compiled)
    }
}

/// A utility function equivalent to [`CompiledAggregationRule::compile`].
pub fn compile_aggregation_rule<S: AsRef<str>>(
    operation_type: &str,
    rules: &[S],
    schema: &Schema,
) -> Result<CompiledAggregationRule, NotValidAggregationExpression> {
    CompiledAggregationRule::compile(operation_type, rules, schema)
}

#[cfg(test)]
mod tests {
    use crate::aggregation::{
        AggregationRuleEntry, CompiledAggregationRule, NotValidAggregationExpression,
        OperationType, compile_aggregation_rule,
    };
    use crate::schema::{FieldType, Schema};

    #[test]
    fn compile_reduce_by_key() {
        let schema = Schema::new([
            ("input_port", FieldType::Integer),
            ("field2", FieldType::String),
            ("field3", FieldType::Long),
        ])
        .unwrap();
        let rules = ["key: input_port", "count(field2)", "sum(field3)"];
        let result = compile_aggregation_rule("reduceByKey", &rules, &schema).unwrap();
        assert_eq!(
            result,
            CompiledAggregationRule::new(
                OperationType::ReduceByKey,
                vec![
                    AggregationRuleEntry::mk_key("input_port"),
                    AggregationRuleEntry::mk_aggregation("count", "field2"),
                    AggregationRuleEntry::mk_aggregation("sum", "field3"),
                ]
            )
        );
    }

    #[test]
    fn compile_reduce() {
        let schema = Schema::new([
            ("packet_size", FieldType::Long),
            ("timestamp", FieldType::Timestamp),
        ])
        .unwrap();
        let rules = ["sum(packet_size)", "max(timestamp)"];
        let result = compile_aggregation_rule("reduce", &rules, &schema).unwrap();
        assert_eq!(result.operation_type, OperationType::Reduce);
        assert!(result.key_fields().is_empty());
        assert_eq!(result.aggregations().count(), 2);
    }

    #[test]
    fn compile_compound_key() {
        let schema = Schema::new([
            ("src_ip", FieldType::String),
            ("dst_ip", FieldType::String),
            ("packet_size", FieldType::Long),
        ])
        .unwrap();
        let rules = ["key: (src_ip, dst_ip)", "sum(packet_size)"];
        let result = compile_aggregation_rule("reduceByKey", &rules, &schema).unwrap();
        assert_eq!(result.key_fields(), vec!["src_ip", "dst_ip"]);
    }

    #[test]
    fn compile_unsupported_function() {
        let schema = Schema::new([
            ("input_port", FieldType::Integer),
            ("in_vlan", FieldType::Integer),
            ("ip_size", FieldType::Integer),
        ])
        .unwrap();
        let rules = ["key: input_port", "sin(in_vlan)", "sum(ip_size)"];
        let error = compile_aggregation_rule("reduceByKey", &rules, &schema).unwrap_err();
        assert_eq!(error.to_string(), "Unsupported function(s): {'sin'}");
    }

    #[test]
    fn compile_unknown_field() {
        let schema = Schema::new([
            ("input_port", FieldType::Integer),
            ("in_vlan", FieldType::Integer),
            ("ip_size", FieldType::Integer),
        ])
        .unwrap();
        let rules = ["key: input_port", "min(in_vlan_bad)", "sum(ip_size)"];
        let error = compile_aggregation_rule("reduceByKey", &rules, &schema).unwrap_err();
        match error {
            NotValidAggregationExpression::UnknownOrUnusedFields(fields) => {
                assert!(fields.contains("in_vlan_bad"));
                assert!(fields.contains("in_vlan"));
                assert_eq!(fields.len(), 2);
            }
            other => panic!("Unexpected error: {other}"),
        }
    }

    #[test]
    fn compile_already_aggregated_field() {
        let schema = Schema::new([
            ("src_ip", FieldType::String),
            ("packet_size", FieldType::Long),
        ])
        .unwrap();
        let rules = ["key: src_ip", "max(packet_size)", "min(packet_size)"];
        let error = compile_aggregation_rule("reduceByKey", &rules, &schema).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Aggregate already aggregated field packet_size"
        );
    }

    #[test]
    fn compile_wrong_field_type() {
        let schema = Schema::new([
            ("input_port", FieldType::Integer),
            ("dst_mac", FieldType::String),
            ("ip_size", FieldType::Integer),
        ])
        .unwrap();
        let rules = ["key: input_port", "min(dst_mac)", "sum(ip_size)"];
        let error = compile_aggregation_rule("reduceByKey", &rules, &schema).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Incorrect type of field dst_mac for function min"
        );
    }

    #[test]
    fn parse_errors_come_before_schema_errors() {
        let schema = Schema::default();
        let rules = ["key: a", "key: b", "sin(c)"];
        let error = compile_aggregation_rule("reduceByKey", &rules, &schema).unwrap_err();
        assert_eq!(
            error,
            NotValidAggregationExpression::KeyNotUnique {
                operation: OperationType::ReduceByKey
            }
        );
    }
}
