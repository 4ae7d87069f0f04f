//! Document-database schema projection, in the shape of a mongoose model.
//!
//! Each column becomes a field carrying the constraints derived from its
//! data type plus the role it plays in the table's keys.

use alloc::string::String;
use alloc::vec::Vec;

use indexmap::IndexMap as IndexMapRaw;
use serde::Serialize;

use super::number;
use crate::model::{Column, DatatypeKind, KeyConstruct, Table, ValueFormat};
use crate::sql::tree::DefaultValue;

type IndexMap<K, V> = IndexMapRaw<K, V, hashbrown::DefaultHashBuilder>;

/// Field type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentType {
    /// Integers, fixed and floating point.
    Number,
    /// Booleans.
    Boolean,
    /// Dates and times of day.
    Date,
    /// Everything else.
    String,
}

impl DocumentType {
    fn of(kind: DatatypeKind) -> Self {
        match kind {
            DatatypeKind::Int
            | DatatypeKind::Decimal
            | DatatypeKind::Float
            | DatatypeKind::Double => Self::Number,
            DatatypeKind::Boolean => Self::Boolean,
            DatatypeKind::Date | DatatypeKind::Time | DatatypeKind::Datetime => Self::Date,
            _ => Self::String,
        }
    }
}

/// Population hint of a foreign key column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    /// Referenced table.
    #[serde(rename = "ref")]
    pub table: String,
    /// Local column.
    pub local_field: String,
    /// Referenced column.
    pub foreign_field: String,
}

/// One column of a [`DocumentSchema`].
///
/// Unset attributes are omitted from the output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentField {
    /// Field type.
    #[serde(rename = "type")]
    pub kind: DocumentType,
    /// Lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<serde_json::Number>,
    /// Upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<serde_json::Number>,
    /// Temporal format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'static str>,
    /// Regular expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Maximum length.
    #[serde(rename = "maxlength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Allowed values.
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
    /// Default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    /// Column comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Values are unique: the column is the primary key or a single-column
    /// unique key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    /// Part of the primary key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
    /// Table referenced through a foreign key.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference_table: Option<String>,
    /// Covered by a plain index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<bool>,
    /// Rejects missing values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Foreign key pairing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<FieldReference>,
    /// Generated by `AUTO_INCREMENT`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoincrement: Option<bool>,
}

impl DocumentField {
    fn from_column(column: &Column) -> Self {
        let projection = column.datatype.projection();
        Self {
            kind: DocumentType::of(column.datatype.datatype),
            min: projection.min.and_then(number),
            max: projection.max.and_then(number),
            format: projection.format.map(ValueFormat::as_str),
            pattern: projection.pattern,
            max_length: projection.max_length,
            allowed: projection.allowed,
            default: column.options.default.clone(),
            description: column.options.comment.clone(),
            unique: None,
            primary: None,
            reference_table: None,
            index: None,
            required: Some(!column.options.nullable),
            reference: None,
            autoincrement: Some(column.options.autoincrement),
        }
    }
}

/// Document schema of one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSchema {
    /// Table name.
    pub title: String,
    /// Table comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields by column name, in column order.
    pub columns: IndexMap<String, DocumentField>,
}

/// Projects a table into a document schema.
#[must_use]
pub fn to_document_schema(table: &Table) -> DocumentSchema {
    let mut columns: IndexMap<String, DocumentField> = table
        .columns()
        .iter()
        .map(|column| (column.name.clone(), DocumentField::from_column(column)))
        .collect();

    if let Some(key) = table.primary_key() {
        for part in key.columns() {
            if let Some(field) = columns.get_mut(&part.column) {
                field.unique = Some(true);
                field.primary = Some(true);
                field.required = Some(true);
            }
        }
    }

    for key in table.unique_keys() {
        if let [part] = key.columns() {
            if let Some(field) = columns.get_mut(&part.column) {
                field.unique = Some(true);
            }
        }
    }

    for key in table.foreign_keys() {
        for (part, foreign) in key.columns.iter().zip(&key.reference.columns) {
            if let Some(field) = columns.get_mut(&part.column) {
                field.reference_table = Some(key.reference.table.clone());
                field.reference = Some(FieldReference {
                    table: key.reference.table.clone(),
                    local_field: part.column.clone(),
                    foreign_field: foreign.column.clone(),
                });
            }
        }
    }

    for index in table.indexes() {
        for part in index.columns() {
            if let Some(field) = columns.get_mut(&part.column) {
                field.index = Some(true);
            }
        }
    }

    DocumentSchema {
        title: table.name().into(),
        description: table.options().and_then(|o| o.comment.clone()),
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Catalog;

    #[test]
    fn test_document_schema() {
        let catalog = Catalog::from_sql(
            "CREATE TABLE posts (\
                id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT, \
                author INT NOT NULL COMMENT 'writer', \
                title VARCHAR(120) DEFAULT '', \
                published DATETIME, \
                PRIMARY KEY (id), KEY by_title (title), \
                FOREIGN KEY (author) REFERENCES users (uid)\
             ) COMMENT = 'blog posts'",
        )
        .unwrap();
        let schema = to_document_schema(catalog.table("posts").unwrap());
        let value = serde_json::to_value(&schema).unwrap();

        assert_eq!(value["title"], "posts");
        assert_eq!(value["description"], "blog posts");
        assert_eq!(
            value["columns"]["id"],
            serde_json::json!({
                "type": "Number",
                "min": 0,
                "max": 18446744073709551616.0,
                "unique": true,
                "primary": true,
                "required": true,
                "autoincrement": true
            })
        );
        assert_eq!(
            value["columns"]["author"],
            serde_json::json!({
                "type": "Number",
                "min": -2147483648,
                "max": 2147483647,
                "description": "writer",
                "ref": "users",
                "required": true,
                "reference": {"ref": "users", "localField": "author", "foreignField": "uid"},
                "autoincrement": false
            })
        );
        assert_eq!(value["columns"]["title"]["maxlength"], 120);
        assert_eq!(value["columns"]["title"]["default"], "");
        assert_eq!(value["columns"]["title"]["index"], true);
        assert_eq!(value["columns"]["published"]["type"], "Date");
        assert!(value["columns"]["published"].get("unique").is_none());
        assert_eq!(value["columns"]["published"]["format"], "date-time");

        let keys: Vec<&String> = schema.columns.keys().collect();
        assert_eq!(keys, ["id", "author", "title", "published"]);
    }
}
