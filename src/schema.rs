use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;

/// Semantic type of a record field.
///
/// The serialized names follow the data-structure documents used to describe input records
/// (`"IntegerType"`, `"StringType"`, ...).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "BooleanType")]
    Boolean,
    #[serde(rename = "ByteType")]
    Byte,
    #[serde(rename = "ShortType")]
    Short,
    #[serde(rename = "IntegerType")]
    Integer,
    #[serde(rename = "LongType")]
    Long,
    #[serde(rename = "FloatType")]
    Float,
    #[serde(rename = "DoubleType")]
    Double,
    #[serde(rename = "DecimalType")]
    Decimal,
    #[serde(rename = "StringType")]
    String,
    #[serde(rename = "BinaryType")]
    Binary,
    #[serde(rename = "DateType")]
    Date,
    #[serde(rename = "TimestampType")]
    Timestamp,
}

impl FieldType {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Byte
                | FieldType::Short
                | FieldType::Integer
                | FieldType::Long
                | FieldType::Float
                | FieldType::Double
                | FieldType::Decimal
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::Timestamp)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Boolean => "BooleanType",
            FieldType::Byte => "ByteType",
            FieldType::Short => "ShortType",
            FieldType::Integer => "IntegerType",
            FieldType::Long => "LongType",
            FieldType::Float => "FloatType",
            FieldType::Double => "DoubleType",
            FieldType::Decimal => "DecimalType",
            FieldType::String => "StringType",
            FieldType::Binary => "BinaryType",
            FieldType::Date => "DateType",
            FieldType::Timestamp => "TimestampType",
        };
        write!(f, "{name}")
    }
}

/// A single named field of a [`Schema`].
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub field_type: FieldType,
}

/// Ordered mapping of field names to their [`FieldType`].
///
/// The schema is owned by the caller; compilers only read it. Field names are unique.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<SchemaField>,
}

/// Entry of the data-structure document: `{"index": 0, "type": "IntegerType"}`.
#[derive(Deserialize)]
struct JsonSchemaEntry {
    index: u32,
    #[serde(rename = "type")]
    field_type: FieldType,
}

/// Errors raised while building a [`Schema`].
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Invalid data structure document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Field `{name}` is declared more than once")]
    DuplicateField { name: String },
    #[error("Fields `{first}` and `{second}` share the same index `{index}`")]
    DuplicateIndex {
        index: u32,
        first: String,
        second: String,
    },
}

impl Schema {
    /// Build a schema from `(name, type)` pairs, preserving their order.
    pub fn new<S: Into<String>>(
        fields: impl IntoIterator<Item = (S, FieldType)>,
    ) -> Result<Schema, SchemaError> {
        let mut schema = Schema::default();
        for (name, field_type) in fields {
            let name = name.into();
            if schema.contains(name.as_str()) {
                return Err(SchemaError::DuplicateField { name });
            }
            schema.fields.push(SchemaField { name, field_type });
        }
        Ok(schema)
    }

    /// Read a schema from a data-structure JSON document of the form
    /// `{"field": {"index": 0, "type": "IntegerType"}, ...}`.
    ///
    /// Fields are ordered by their `index`.
    pub fn from_json_str(json: &str) -> Result<Schema, SchemaError> {
        let entries: HashMap<String, JsonSchemaEntry> = serde_json::from_str(json)?;
        let mut by_index: BTreeMap<u32, (String, FieldType)> = BTreeMap::new();
        for (name, entry) in entries {
            if let Some((other, _)) = by_index.get(&entry.index) {
                // Report the pair in a stable order, independent of map iteration.
                let (first, second) = if *other < name {
                    (other.clone(), name)
                } else {
                    (name, other.clone())
                };
                return Err(SchemaError::DuplicateIndex {
                    index: entry.index,
                    first,
                    second,
                });
            }
            by_index.insert(entry.index, (name, entry.field_type));
        }
        Schema::new(by_index.into_values())
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.field_type)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field_type(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{FieldType, Schema, SchemaError};

    #[test]
    fn schema_preserves_order() {
        let schema = Schema::new([
            ("src_ip", FieldType::String),
            ("packet_size", FieldType::Long),
        ])
        .unwrap();
        let names = schema.field_names().collect::<Vec<_>>();
        assert_eq!(names, vec!["src_ip", "packet_size"]);
        assert_eq!(schema.field_type("packet_size"), Some(FieldType::Long));
        assert_eq!(schema.field_type("dst_ip"), None);
    }

    #[test]
    fn schema_rejects_duplicate_names() {
        let result = Schema::new([("a", FieldType::Long), ("a", FieldType::String)]);
        assert!(matches!(result, Err(SchemaError::DuplicateField { name }) if name == "a"));
    }

    #[test]
    fn schema_from_data_structure_document() {
        let json = r#"{
            "packet_size": {"index": 2, "type": "LongType"},
            "src_ip": {"index": 0, "type": "StringType"},
            "timestamp": {"index": 1, "type": "TimestampType"}
        }"#;
        let schema = Schema::from_json_str(json).unwrap();
        let names = schema.field_names().collect::<Vec<_>>();
        assert_eq!(names, vec!["src_ip", "timestamp", "packet_size"]);
        assert_eq!(schema.field_type("timestamp"), Some(FieldType::Timestamp));
    }

    #[test]
    fn schema_rejects_duplicate_index() {
        let json = r#"{
            "b": {"index": 0, "type": "LongType"},
            "a": {"index": 0, "type": "StringType"}
        }"#;
        let error = Schema::from_json_str(json).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Fields `a` and `b` share the same index `0`"
        );
    }

    #[test]
    fn schema_rejects_unknown_type() {
        let json = r#"{"a": {"index": 0, "type": "VoidType"}}"#;
        assert!(matches!(
            Schema::from_json_str(json),
            Err(SchemaError::Json(_))
        ));
    }

    #[test]
    fn type_classes() {
        assert!(FieldType::Decimal.is_numeric());
        assert!(!FieldType::String.is_numeric());
        assert!(FieldType::Date.is_temporal());
        assert!(!FieldType::Boolean.is_temporal());
        assert_eq!(FieldType::Integer.to_string(), "IntegerType");
    }
}
