//! Rust library for compiling the declarative processing rules of a streaming pipeline.
//!
//! Two independent compilers are provided:
//!  - [`transformation`] turns statements such as `"traffic: mult(packet_size, rate)"` into
//!    an [`ExpandedTransformationList`] of field descriptors with expression trees.
//!  - [`aggregation`] turns rules such as `["key: src_ip", "sum(traffic)"]` into a
//!    [`CompiledAggregationRule`] validated against a [`Schema`].
//!
//! Neither compiler evaluates anything, they only produce validated descriptors for
//! a downstream job builder.

pub mod aggregation;
pub mod config;
pub mod schema;
pub mod transformation;

mod utils;
mod validation;

pub use aggregation::{
    AggregateFn, AggregationRuleEntry, CompiledAggregationRule, NotValidAggregationExpression,
    OperationType, compile_aggregation_rule,
};
pub use config::{AggregationConfig, CompiledPipeline, ConfigError, PipelineConfig};
pub use schema::{FieldType, Schema, SchemaError, SchemaField};
pub use transformation::{
    ExpandedTransformationList, ExpressionNode, FieldTransformation, IncorrectExpression,
    InvalidTransformation, Literal, ParserOptions, SyntaxTree, TransformationItem,
    compile_transformations, parse_expression,
};
pub use validation::{ContextualValidation, ErrorReporter, VecReporter};
