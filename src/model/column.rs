//! Columns and their inline constraint markers.

use alloc::string::String;

use serde::{Deserialize, Serialize};

use super::datatype::Datatype;
use super::keys::Reference;
use crate::sql::tree::{ColumnDef, DefaultValue, deserialize_present};

/// Column attributes other than the data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnOptions {
    /// Whether the column accepts `NULL`.
    #[serde(default = "nullable_by_default")]
    pub nullable: bool,
    /// Default value. `Some(DefaultValue::Null)` is an explicit `DEFAULT NULL`.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<DefaultValue>,
    /// Whether values are generated by `AUTO_INCREMENT`.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub autoincrement: bool,
    /// Column comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Character set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    /// Collation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collation: Option<String>,
    /// `ON UPDATE` expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
    /// `COLUMN_FORMAT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// `STORAGE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    /// Hidden from `SELECT *`.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub invisible: bool,
}

fn nullable_by_default() -> bool {
    true
}

impl Default for ColumnOptions {
    fn default() -> Self {
        Self {
            nullable: true,
            default: None,
            autoincrement: false,
            comment: None,
            charset: None,
            collation: None,
            on_update: None,
            format: None,
            storage: None,
            invisible: false,
        }
    }
}

/// Constraints declared inline with a column, waiting to be promoted to
/// table-level constructs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct InlineConstraints {
    primary_key: bool,
    unique_key: bool,
    reference: Option<Reference>,
}

/// A table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within the table.
    pub name: String,
    /// Data type.
    #[serde(rename = "type")]
    pub datatype: Datatype,
    /// Attributes.
    #[serde(default)]
    pub options: ColumnOptions,
    #[serde(skip)]
    pub(crate) inline: InlineConstraints,
}

impl Column {
    /// A nullable column with no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, datatype: Datatype) -> Self {
        Self {
            name: name.into(),
            datatype,
            options: ColumnOptions::default(),
            inline: InlineConstraints::default(),
        }
    }

    /// Builds the column from its parse-tree definition, recording any
    /// inline `PRIMARY KEY`, `UNIQUE` or `REFERENCES` clause.
    #[must_use]
    pub fn from_def(def: &ColumnDef) -> Self {
        let source = &def.options;
        let options = ColumnOptions {
            nullable: !source.primary_key && source.nullable.unwrap_or(true),
            default: source.default.clone(),
            autoincrement: source.auto_increment,
            comment: source.comment.clone(),
            charset: source.charset.clone(),
            collation: source.collation.clone(),
            on_update: source.on_update.clone(),
            format: source.format.clone(),
            storage: source.storage.clone(),
            invisible: source.invisible,
        };

        Self {
            name: def.name.clone(),
            datatype: Datatype::from_def(&def.datatype),
            options,
            inline: InlineConstraints {
                primary_key: source.primary_key,
                unique_key: source.unique,
                reference: source.reference.as_ref().map(Reference::from_def),
            },
        }
    }

    /// Marks the column as `NOT NULL`.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.options.nullable = false;
        self
    }

    /// Declares the column as the inline primary key.
    #[must_use]
    pub fn inline_primary_key(mut self) -> Self {
        self.options.nullable = false;
        self.inline.primary_key = true;
        self
    }

    /// Declares an inline unique key on the column.
    #[must_use]
    pub fn inline_unique_key(mut self) -> Self {
        self.inline.unique_key = true;
        self
    }

    /// Declares an inline foreign key on the column.
    #[must_use]
    pub fn inline_reference(mut self, reference: Reference) -> Self {
        self.inline.reference = Some(reference);
        self
    }

    /// Whether any inline constraint is still waiting to be promoted.
    #[must_use]
    pub fn has_inline_constraints(&self) -> bool {
        self.inline != InlineConstraints::default()
    }

    pub(crate) fn take_primary_key(&mut self) -> bool {
        core::mem::take(&mut self.inline.primary_key)
    }

    pub(crate) fn take_unique_key(&mut self) -> bool {
        core::mem::take(&mut self.inline.unique_key)
    }

    pub(crate) fn take_reference(&mut self) -> Option<Reference> {
        self.inline.reference.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DatatypeKind;
    use crate::sql::tree::{ColumnOptionsDef, DatatypeDef, KeyPart, ReferenceDef, TypeName};
    use alloc::vec;

    fn column_def(options: ColumnOptionsDef) -> ColumnDef {
        ColumnDef {
            name: "id".into(),
            datatype: DatatypeDef::new(TypeName::Int),
            options,
        }
    }

    #[test]
    fn test_from_def_records_inline_constraints() {
        let mut column = Column::from_def(&column_def(ColumnOptionsDef {
            primary_key: true,
            unique: true,
            reference: Some(ReferenceDef {
                table: "other".into(),
                columns: vec![KeyPart::new("id")],
                match_type: None,
                on_delete: None,
                on_update: None,
            }),
            ..ColumnOptionsDef::default()
        }));

        assert!(!column.options.nullable);
        assert!(column.has_inline_constraints());
        assert!(column.take_primary_key());
        assert!(!column.take_primary_key());
        assert!(column.take_unique_key());
        assert_eq!(column.take_reference().unwrap().table, "other");
        assert!(!column.has_inline_constraints());
    }

    #[test]
    fn test_serialized_shape() {
        let column = Column::from_def(&column_def(ColumnOptionsDef {
            nullable: Some(false),
            default: Some(DefaultValue::Integer(0)),
            auto_increment: true,
            primary_key: true,
            ..ColumnOptionsDef::default()
        }));
        let value = serde_json::to_value(&column).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "id",
                "type": {"datatype": "int", "width": 4},
                "options": {"nullable": false, "default": 0, "autoincrement": true}
            })
        );

        let back: Column = serde_json::from_value(value).unwrap();
        assert_eq!(back.datatype.datatype, DatatypeKind::Int);
        assert!(!back.has_inline_constraints());
    }

    #[test]
    fn test_explicit_null_default_survives_round_trip() {
        let column = Column::from_def(&column_def(ColumnOptionsDef {
            default: Some(DefaultValue::Null),
            ..ColumnOptionsDef::default()
        }));
        let json = serde_json::to_string(&column).unwrap();
        assert!(json.contains(r#""default":null"#));
        let back: Column = serde_json::from_str(&json).unwrap();
        assert_eq!(back.options.default, Some(DefaultValue::Null));
    }
}
