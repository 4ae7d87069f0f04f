//! Primary keys, unique keys, indexes and foreign keys.
//!
//! Every construct holds an ordered list of [`IndexColumn`] references to
//! columns of its owning table. The [`KeyConstruct`] trait is the seam used
//! by the table to cascade column renames and removals into all of them.

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::sql::tree::{
    ForeignKeyDef, IndexDef, IndexOptionsDef, IndexType, KeyPart, MatchType, ReferenceDef,
    ReferentialAction, SortOrder,
};

/// A column reference inside a key or index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexColumn {
    /// Referenced column.
    pub column: String,
    /// Indexed prefix length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_length: Option<u32>,
    /// Sort direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

impl IndexColumn {
    /// A reference to the whole column.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            prefix_length: None,
            order: None,
        }
    }
}

impl From<&KeyPart> for IndexColumn {
    fn from(part: &KeyPart) -> Self {
        Self {
            column: part.column.clone(),
            prefix_length: part.length,
            order: part.sort,
        }
    }
}

/// Options trailing an index definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexOptions {
    /// `KEY_BLOCK_SIZE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_block_size: Option<u64>,
    /// Fulltext parser plugin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,
    /// Index comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Whether the optimizer may use the index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl IndexOptions {
    /// Whether no option is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&IndexOptionsDef> for IndexOptions {
    fn from(def: &IndexOptionsDef) -> Self {
        Self {
            key_block_size: def.key_block_size,
            parser: def.parser.clone(),
            comment: def.comment.clone(),
            visible: def.visible,
        }
    }
}

/// Behaviour shared by every key and index construct.
pub trait KeyConstruct {
    /// The name identifying the construct in its collection: the index
    /// name, or the symbol of a foreign key.
    fn identifier(&self) -> Option<&str>;

    /// Referenced columns, in key order.
    fn columns(&self) -> &[IndexColumn];

    /// Mutable access to the referenced columns.
    fn columns_mut(&mut self) -> &mut Vec<IndexColumn>;

    /// Whether `column` is referenced.
    fn references(&self, column: &str) -> bool {
        self.columns().iter().any(|c| c.column == column)
    }

    /// Removes every reference to `column`, returning whether any was removed.
    fn drop_column(&mut self, column: &str) -> bool {
        let columns = self.columns_mut();
        let before = columns.len();
        columns.retain(|c| c.column != column);
        columns.len() != before
    }

    /// Renames references to `from`.
    fn rename_column(&mut self, from: &str, to: &str) {
        for c in self.columns_mut().iter_mut().filter(|c| c.column == from) {
            c.column = to.into();
        }
    }

    /// Whether no column is referenced any more.
    fn is_empty(&self) -> bool {
        self.columns().is_empty()
    }
}

macro_rules! index_construct {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            /// Name.
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub name: Option<String>,
            /// `USING` algorithm.
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub index_type: Option<IndexType>,
            /// Indexed columns.
            pub columns: Vec<IndexColumn>,
            /// Index options.
            #[serde(default, skip_serializing_if = "IndexOptions::is_empty")]
            pub options: IndexOptions,
        }

        impl $name {
            /// Builds the construct from its parse-tree definition.
            #[must_use]
            pub fn from_def(def: &IndexDef) -> Self {
                Self {
                    name: def.name.clone(),
                    index_type: def.index_type,
                    columns: def.columns.iter().map(IndexColumn::from).collect(),
                    options: IndexOptions::from(&def.options),
                }
            }

            /// An unnamed construct over whole columns.
            #[must_use]
            pub fn on_columns<I, S>(columns: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                Self {
                    name: None,
                    index_type: None,
                    columns: columns.into_iter().map(IndexColumn::new).collect(),
                    options: IndexOptions::default(),
                }
            }

            /// Sets the name.
            #[must_use]
            pub fn named(mut self, name: impl Into<String>) -> Self {
                self.name = Some(name.into());
                self
            }
        }

        impl KeyConstruct for $name {
            #[inline]
            fn identifier(&self) -> Option<&str> {
                self.name.as_deref()
            }

            #[inline]
            fn columns(&self) -> &[IndexColumn] {
                &self.columns
            }

            #[inline]
            fn columns_mut(&mut self) -> &mut Vec<IndexColumn> {
                &mut self.columns
            }
        }
    };
}

index_construct!(
    /// The primary key of a table.
    PrimaryKey
);
index_construct!(
    /// A `UNIQUE` key.
    UniqueKey
);
index_construct!(
    /// A plain `INDEX` / `KEY`.
    Index
);
index_construct!(
    /// A `FULLTEXT` index.
    FulltextIndex
);
index_construct!(
    /// A `SPATIAL` index.
    SpatialIndex
);

/// The referenced side of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Referenced table.
    pub table: String,
    /// Referenced columns, paired by position with the local columns.
    pub columns: Vec<IndexColumn>,
    /// `MATCH` clause.
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchType>,
    /// `ON DELETE` action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ReferentialAction>,
    /// `ON UPDATE` action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<ReferentialAction>,
}

impl Reference {
    /// A reference to `columns` of `table` with no actions.
    #[must_use]
    pub fn new<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            columns: columns.into_iter().map(IndexColumn::new).collect(),
            match_type: None,
            on_delete: None,
            on_update: None,
        }
    }

    /// Builds the reference from its parse-tree definition.
    #[must_use]
    pub fn from_def(def: &ReferenceDef) -> Self {
        Self {
            table: def.table.clone(),
            columns: def.columns.iter().map(|part| IndexColumn::new(part.column.clone())).collect(),
            match_type: def.match_type,
            on_delete: def.on_delete,
            on_update: def.on_update,
        }
    }
}

/// A foreign key constraint.
///
/// Local columns carry neither prefix length nor order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    /// Constraint symbol, identifying the key within the table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Index name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Local columns.
    pub columns: Vec<IndexColumn>,
    /// Referenced table and columns.
    pub reference: Reference,
}

impl ForeignKey {
    /// Builds the key from its parse-tree definition.
    #[must_use]
    pub fn from_def(def: &ForeignKeyDef) -> Self {
        Self {
            symbol: def.symbol.clone(),
            name: def.name.clone(),
            columns: def
                .columns
                .iter()
                .map(|part| IndexColumn::new(part.column.clone()))
                .collect(),
            reference: Reference::from_def(&def.reference),
        }
    }

    /// An unnamed foreign key from local `columns` to `reference`.
    #[must_use]
    pub fn on_columns<I, S>(columns: I, reference: Reference) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbol: None,
            name: None,
            columns: columns.into_iter().map(IndexColumn::new).collect(),
            reference,
        }
    }

    /// Sets the constraint symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

impl KeyConstruct for ForeignKey {
    #[inline]
    fn identifier(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    #[inline]
    fn columns(&self) -> &[IndexColumn] {
        &self.columns
    }

    #[inline]
    fn columns_mut(&mut self) -> &mut Vec<IndexColumn> {
        &mut self.columns
    }

    /// Removes the local column together with the referenced column paired
    /// with it.
    fn drop_column(&mut self, column: &str) -> bool {
        let mut dropped = false;
        while let Some(i) = self.columns.iter().position(|c| c.column == column) {
            self.columns.remove(i);
            if i < self.reference.columns.len() {
                self.reference.columns.remove(i);
            }
            dropped = true;
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_from_def_keeps_prefix_and_order() {
        let def = IndexDef {
            name: Some("idx".into()),
            index_type: Some(IndexType::Btree),
            columns: vec![
                KeyPart {
                    column: "a".into(),
                    length: Some(2),
                    sort: Some(SortOrder::Asc),
                },
                KeyPart::new("b"),
            ],
            options: IndexOptionsDef {
                key_block_size: Some(1024),
                ..IndexOptionsDef::default()
            },
        };
        let index = FulltextIndex::from_def(&def);
        assert_eq!(index.identifier(), Some("idx"));
        assert_eq!(index.columns[0].prefix_length, Some(2));
        assert_eq!(index.columns[0].order, Some(SortOrder::Asc));
        assert_eq!(index.options.key_block_size, Some(1024));
    }

    #[test]
    fn test_drop_and_rename_column() {
        let mut key = UniqueKey::on_columns(["a", "b"]).named("uk");
        assert!(key.references("a"));
        assert!(key.drop_column("a"));
        assert!(!key.drop_column("a"));
        assert!(!key.is_empty());
        key.rename_column("b", "c");
        assert_eq!(key.columns, [IndexColumn::new("c")]);
        assert!(key.drop_column("c"));
        assert!(key.is_empty());
    }

    #[test]
    fn test_foreign_key_drops_paired_reference_column() {
        let mut key = ForeignKey::on_columns(
            ["a", "b"],
            Reference::new("other", ["x", "y"]),
        )
        .with_symbol("fk");
        assert!(key.drop_column("a"));
        assert_eq!(key.columns, [IndexColumn::new("b")]);
        assert_eq!(key.reference.columns, [IndexColumn::new("y")]);
        assert_eq!(key.identifier(), Some("fk"));
    }

    #[test]
    fn test_serialized_shape() {
        let key = PrimaryKey::on_columns(["id"]);
        assert_eq!(
            serde_json::to_value(&key).unwrap(),
            serde_json::json!({"columns": [{"column": "id"}]})
        );

        let mut reference = Reference::new("people", ["id"]);
        reference.on_delete = Some(ReferentialAction::SetNull);
        let value = serde_json::to_value(ForeignKey::on_columns(["person_id"], reference)).unwrap();
        assert_eq!(value["reference"]["onDelete"], "set null");
    }
}
