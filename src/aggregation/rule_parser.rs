use crate::aggregation::{
    AggregationRuleEntry, CompiledAggregationRule, NotValidAggregationExpression, OperationType,
};
use crate::utils::is_word;
use NotValidAggregationExpression::{
    AmbiguousEntry, InvalidCharacters, KeyNotUnique, MalformedEntry, MissingKey,
    UnbalancedParentheses, UnsupportedOperation,
};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// Anything except word characters, whitespace, parentheses, commas and colons.
static INVALID_CHARACTERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s(),:]").unwrap());
/// `key : <fields>`, where `<fields>` is captured.
static KEY_DESIGNATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^key\s*:(.*)$").unwrap());
/// `func(field)`, where both names are captured.
static FUNCTION_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)\s*\(\s*(\w+)\s*\)").unwrap());

impl CompiledAggregationRule {
    /// Parse raw rule strings into a [`CompiledAggregationRule`] without checking them
    /// against a schema (see [`CompiledAggregationRule::compile`] for the full pipeline).
    ///
    /// The following steps are performed, each failing with the first problem found:
    ///  1. Every rule is checked for characters outside of the permitted set.
    ///  2. `operation_type` must be `reduce` or `reduceByKey`.
    ///  3. Every rule is parsed either as a key designator (`key: field` or
    ///     `key: (field1, field2)`) or a single `func(field)` call.
    ///  4. `reduce` must not have a key designator, `reduceByKey` must have exactly one.
    pub fn parse<S: AsRef<str>>(
        operation_type: &str,
        rules: &[S],
    ) -> Result<CompiledAggregationRule, NotValidAggregationExpression> {
        for rule in rules {
            let rule = rule.as_ref();
            if INVALID_CHARACTERS.is_match(rule) {
                return Err(InvalidCharacters {
                    entry: rule.trim().to_string(),
                });
            }
        }

        let operation = match OperationType::try_from(operation_type.trim()) {
            Ok(operation @ (OperationType::Reduce | OperationType::ReduceByKey)) => operation,
            _ => {
                return Err(UnsupportedOperation {
                    operation: operation_type.to_string(),
                });
            }
        };

        let mut entries = Vec::new();
        let mut key_designators = 0usize;
        for rule in rules {
            let rule = rule.as_ref().trim();
            if let Some(captures) = KEY_DESIGNATOR.captures(rule) {
                key_designators += 1;
                let fields = captures.get(1).map_or("", |m| m.as_str());
                for field in parse_key_fields(fields, rule)? {
                    entries.push(AggregationRuleEntry::mk_key(field));
                }
            } else {
                entries.push(parse_function_call(rule)?);
            }
        }

        check_key_designators(operation, key_designators)?;

        debug!(
            "Parsed `{}` aggregation with {} entries ({} key designator(s)).",
            operation,
            entries.len(),
            key_designators
        );
        Ok(CompiledAggregationRule::new(operation, entries))
    }
}

/// Parse a single `func(field)` entry. The pattern must match exactly once and cover the
/// whole entry.
fn parse_function_call(
    entry: &str,
) -> Result<AggregationRuleEntry, NotValidAggregationExpression> {
    let entry = entry.trim();
    let matches = FUNCTION_CALL.captures_iter(entry).collect::<Vec<_>>();
    match matches.as_slice() {
        [] => Err(MalformedEntry {
            entry: entry.to_string(),
        }),
        [captures] => {
            let whole = captures.get(0).map_or("", |m| m.as_str());
            if whole.len() != entry.len() {
                // Something precedes or trails the call.
                return Err(AmbiguousEntry {
                    entry: entry.to_string(),
                });
            }
            let function = captures.get(1).map_or("", |m| m.as_str());
            let field = captures.get(2).map_or("", |m| m.as_str());
            Ok(AggregationRuleEntry::mk_aggregation(function, field))
        }
        _ => Err(AmbiguousEntry {
            entry: entry.to_string(),
        }),
    }
}

/// Parse the right-hand side of a key designator: either one field name, or a parenthesized,
/// comma separated tuple of field names.
fn parse_key_fields<'a>(
    fields: &'a str,
    entry: &str,
) -> Result<Vec<&'a str>, NotValidAggregationExpression> {
    let fields = fields.trim();
    let open = fields.matches('(').count();
    let close = fields.matches(')').count();
    if open != close {
        return Err(UnbalancedParentheses {
            entry: entry.to_string(),
            open,
            close,
        });
    }

    let names = match fields.strip_prefix('(').and_then(|f| f.strip_suffix(')')) {
        Some(inner) => inner.split(',').map(str::trim).collect::<Vec<_>>(),
        None => vec![fields],
    };
    if names.iter().all(|name| is_word(name)) {
        Ok(names)
    } else {
        Err(MalformedEntry {
            entry: entry.to_string(),
        })
    }
}

/// Check the number of key designators required by the `operation`.
fn check_key_designators(
    operation: OperationType,
    key_designators: usize,
) -> Result<(), NotValidAggregationExpression> {
    let allowed = usize::from(operation.requires_key());
    if key_designators > allowed {
        Err(KeyNotUnique { operation })
    } else if key_designators < allowed {
        Err(MissingKey { operation })
    } else {
        Ok(())
    }
}
