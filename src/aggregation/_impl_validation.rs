use crate::aggregation::{AggregateFn, CompiledAggregationRule, NotValidAggregationExpression};
use crate::schema::Schema;
use crate::{ContextualValidation, ErrorReporter};
use std::collections::{BTreeMap, BTreeSet};

/// Validate a parsed rule set against the schema of the aggregated records.
///
/// Errors are reported in a fixed order: unsupported functions, unknown or unused fields,
/// fields aggregated more than once, and finally type mismatches.
impl ContextualValidation<Schema> for CompiledAggregationRule {
    type Error = NotValidAggregationExpression;

    fn validate_all<R: ErrorReporter<Self::Error>>(&self, schema: &Schema, reporter: &mut R) {
        // Every function must be in the supported catalog.

        let unsupported = self
            .aggregations()
            .filter(|entry| entry.function().is_none())
            .filter_map(|entry| entry.func_name.clone())
            .collect::<BTreeSet<_>>();
        if !unsupported.is_empty() {
            reporter.report(NotValidAggregationExpression::UnsupportedFunctions(
                unsupported,
            ));
        }

        // Referenced fields and schema fields must be the same set.

        let referenced = self
            .rule
            .iter()
            .map(|entry| entry.input_field.as_str())
            .collect::<BTreeSet<_>>();
        let known = schema.field_names().collect::<BTreeSet<_>>();
        let mismatched = referenced
            .symmetric_difference(&known)
            .map(|name| name.to_string())
            .collect::<BTreeSet<_>>();
        if !mismatched.is_empty() {
            reporter.report(NotValidAggregationExpression::UnknownOrUnusedFields(
                mismatched,
            ));
        }

        // Every aggregated field is aggregated by exactly one function.

        let mut usage: BTreeMap<&str, usize> = BTreeMap::new();
        for entry in self.aggregations() {
            *usage.entry(entry.input_field.as_str()).or_default() += 1;
        }
        for (field, count) in usage {
            if count > 1 {
                reporter.report(NotValidAggregationExpression::AlreadyAggregated {
                    field: field.to_string(),
                });
            }
        }

        // Function input types. Unknown functions and fields were reported above.

        for entry in self.aggregations() {
            let Some(function) = entry.function() else {
                continue;
            };
            let Some(field_type) = schema.field_type(entry.input_field.as_str()) else {
                continue;
            };
            if !function.accepts(field_type) {
                reporter.report(NotValidAggregationExpression::IncorrectFieldType {
                    field: entry.input_field.clone(),
                    function,
                });
            }
        }
    }
}

impl CompiledAggregationRule {
    /// Return the supported [`AggregateFn`] of every aggregation entry, in order.
    ///
    /// Only meaningful for a validated rule; unsupported functions are skipped.
    pub fn functions(&self) -> Vec<AggregateFn> {
        self.aggregations().filter_map(|entry| entry.function()).collect()
    }
}
