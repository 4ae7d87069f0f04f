//! JSON Schema (draft-07) projection.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use indexmap::IndexMap as IndexMapRaw;
use serde::Serialize;

use super::number;
use crate::model::{Column, DatatypeKind, Table, ValueFormat};
use crate::sql::tree::DefaultValue;

type IndexMap<K, V> = IndexMapRaw<K, V, hashbrown::DefaultHashBuilder>;

const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Settings of the JSON Schema projection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JsonSchemaOptions {
    /// Put column schemas under `definitions` and point `properties` at them
    /// with `$ref`.
    pub use_ref: bool,
    /// Prefix of the `$id`, followed by the table name.
    pub id: Option<String>,
}

impl JsonSchemaOptions {
    /// Sets [`JsonSchemaOptions::use_ref`].
    #[must_use]
    pub fn with_use_ref(mut self, use_ref: bool) -> Self {
        self.use_ref = use_ref;
        self
    }

    /// Sets the `$id` prefix.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A JSON Schema primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    /// Whole number.
    Integer,
    /// Any number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// Text.
    String,
    /// Object.
    Object,
    /// `null`.
    Null,
}

/// The `type` keyword: one type, or a list when `null` is also accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum JsonTypes {
    /// A single type.
    One(JsonType),
    /// Any of the listed types.
    Many(Vec<JsonType>),
}

/// Schema of one column.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySchema {
    /// Accepted types. `None` accepts any JSON value.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub types: Option<JsonTypes>,
    /// Column comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Column default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    /// Lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<serde_json::Number>,
    /// Upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<serde_json::Number>,
    /// Format hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'static str>,
    /// Regular expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Maximum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Allowed values.
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
}

/// An entry of `properties`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Property {
    /// The column schema itself.
    Inline(PropertySchema),
    /// A pointer into `definitions`.
    Ref {
        /// JSON pointer.
        #[serde(rename = "$ref")]
        target: String,
    },
}

/// JSON Schema document describing one row of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchema {
    /// Draft identifier.
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    /// Document identifier.
    #[serde(rename = "$id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Table name.
    pub title: String,
    /// Table comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Always `object`.
    #[serde(rename = "type")]
    pub kind: JsonType,
    /// Column schemas referenced from `properties`.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, PropertySchema>,
    /// One entry per column, in column order.
    pub properties: IndexMap<String, Property>,
    /// Columns that cannot be `NULL`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Rejects keys that are not columns.
    pub additional_properties: bool,
}

fn base_type(kind: DatatypeKind) -> Option<JsonType> {
    match kind {
        DatatypeKind::Int | DatatypeKind::Bit => Some(JsonType::Integer),
        DatatypeKind::Decimal | DatatypeKind::Float | DatatypeKind::Double => {
            Some(JsonType::Number)
        }
        DatatypeKind::Boolean => Some(JsonType::Boolean),
        DatatypeKind::Json => None,
        DatatypeKind::Geometry
        | DatatypeKind::Point
        | DatatypeKind::Linestring
        | DatatypeKind::Polygon
        | DatatypeKind::Multipoint
        | DatatypeKind::Multilinestring
        | DatatypeKind::Multipolygon
        | DatatypeKind::Geometrycollection => Some(JsonType::Object),
        _ => Some(JsonType::String),
    }
}

fn property(column: &Column) -> PropertySchema {
    let projection = column.datatype.projection();
    let types = base_type(column.datatype.datatype).map(|kind| {
        if column.options.nullable {
            JsonTypes::Many(alloc::vec![kind, JsonType::Null])
        } else {
            JsonTypes::One(kind)
        }
    });

    PropertySchema {
        types,
        description: column.options.comment.clone(),
        default: column.options.default.clone(),
        minimum: projection.min.and_then(number),
        maximum: projection.max.and_then(number),
        format: projection.format.map(ValueFormat::as_str),
        pattern: projection.pattern,
        max_length: projection.max_length,
        allowed: projection.allowed,
    }
}

/// Projects a table into a draft-07 JSON Schema.
#[must_use]
pub fn to_json_schema(table: &Table, options: &JsonSchemaOptions) -> JsonSchema {
    let mut definitions = IndexMap::default();
    let mut properties = IndexMap::default();

    for column in table.columns() {
        let schema = property(column);
        if options.use_ref {
            definitions.insert(column.name.clone(), schema);
            properties.insert(
                column.name.clone(),
                Property::Ref {
                    target: format!("#/definitions/{}", column.name),
                },
            );
        } else {
            properties.insert(column.name.clone(), Property::Inline(schema));
        }
    }

    JsonSchema {
        schema: DRAFT_07,
        id: options
            .id
            .as_ref()
            .map(|prefix| format!("{prefix}{}", table.name())),
        title: table.name().into(),
        description: table.options().and_then(|o| o.comment.clone()),
        kind: JsonType::Object,
        definitions,
        properties,
        required: table
            .columns()
            .iter()
            .filter(|column| !column.options.nullable)
            .map(|column| column.name.clone())
            .collect(),
        additional_properties: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Catalog;

    fn schema(sql: &str, options: &JsonSchemaOptions) -> serde_json::Value {
        let catalog = Catalog::from_sql(sql).unwrap();
        let table = catalog.tables().next().unwrap();
        serde_json::to_value(to_json_schema(table, options)).unwrap()
    }

    #[test]
    fn test_inline_properties() {
        let value = schema(
            "CREATE TABLE t (id TINYINT UNSIGNED NOT NULL, price DECIMAL(4,2) DEFAULT 0, \
             born DATE, kind ENUM('a','b') NOT NULL) COMMENT 'things'",
            &JsonSchemaOptions::default(),
        );
        assert_eq!(
            value,
            serde_json::json!({
                "$schema": DRAFT_07,
                "title": "t",
                "description": "things",
                "type": "object",
                "properties": {
                    "id": {"type": "integer", "minimum": 0, "maximum": 256},
                    "price": {"type": ["number", "null"], "default": 0, "minimum": -99.99, "maximum": 99.99},
                    "born": {"type": ["string", "null"], "format": "date"},
                    "kind": {"type": "string", "enum": ["a", "b"]}
                },
                "required": ["id", "kind"],
                "additionalProperties": false
            })
        );
    }

    #[test]
    fn test_ref_definitions_and_id() {
        let options = JsonSchemaOptions::default()
            .with_use_ref(true)
            .with_id("https://example.com/schemas/");
        let value = schema("CREATE TABLE t (doc JSON, name VARCHAR(8))", &options);
        assert_eq!(value["$id"], "https://example.com/schemas/t");
        assert_eq!(value["properties"]["doc"], serde_json::json!({"$ref": "#/definitions/doc"}));
        assert_eq!(value["definitions"]["doc"], serde_json::json!({}));
        assert_eq!(value["definitions"]["name"]["maxLength"], 8);
        assert!(value.get("required").is_none());
    }
}
