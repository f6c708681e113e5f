use crate::aggregation::{CompiledAggregationRule, NotValidAggregationExpression};
use crate::schema::{Schema, SchemaError};
use crate::transformation::{ExpandedTransformationList, InvalidTransformation, ParserOptions};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The part of a pipeline configuration document handled by this crate.
///
/// Other sections of the document (input, output, alerting, ...) are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub processing: ProcessingConfig,
}

/// The `processing` section: transformation statements and an optional aggregation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    #[serde(default)]
    pub transformation: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<AggregationConfig>,
    /// Overrides [`ParserOptions::max_depth`] for transformation expressions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_expression_depth: Option<usize>,
}

/// Raw aggregation settings: `{"operation_type": "reduceByKey", "rule": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationConfig {
    pub operation_type: String,
    #[serde(default)]
    pub rule: Vec<String>,
}

/// Everything compiled from one [`PipelineConfig`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompiledPipeline {
    pub transformations: ExpandedTransformationList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<CompiledAggregationRule>,
}

/// Errors raised while reading or compiling a [`PipelineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Transformation(#[from] InvalidTransformation),
    #[error(transparent)]
    Aggregation(#[from] NotValidAggregationExpression),
}

impl AggregationConfig {
    pub fn compile(
        &self,
        schema: &Schema,
    ) -> Result<CompiledAggregationRule, NotValidAggregationExpression> {
        CompiledAggregationRule::compile(self.operation_type.as_str(), &self.rule, schema)
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<PipelineConfig, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn parser_options(&self) -> ParserOptions {
        match self.processing.max_expression_depth {
            Some(max_depth) => ParserOptions { max_depth },
            None => ParserOptions::default(),
        }
    }

    /// Compile the transformation statements and, if configured, the aggregation rules.
    ///
    /// The aggregation is validated against `schema`. The two parts are independent, but
    /// transformations are compiled first, so their errors are reported first.
    pub fn compile(&self, schema: &Schema) -> Result<CompiledPipeline, ConfigError> {
        let transformations = ExpandedTransformationList::compile_with_options(
            &self.processing.transformation,
            &self.parser_options(),
        )?;
        let aggregation = self
            .processing
            .aggregations
            .as_ref()
            .map(|config| config.compile(schema))
            .transpose()?;
        debug!(
            "Compiled pipeline with {} transformation(s) and {} aggregation.",
            transformations.len(),
            if aggregation.is_some() { "an" } else { "no" }
        );
        Ok(CompiledPipeline {
            transformations,
            aggregation,
        })
    }
}
