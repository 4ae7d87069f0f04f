//! The table aggregate: columns plus every construct that references them.
//!
//! All mutations keep the following true:
//!
//! * every column named by a key or index exists in the table;
//! * no key or index is left without columns;
//! * there is at most one primary key.
//!
//! An operation that would break one of these returns a [`ReferenceError`]
//! and leaves the table exactly as it was.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use super::column::Column;
use super::keys::{
    ForeignKey, FulltextIndex, Index, IndexColumn, KeyConstruct, PrimaryKey, SpatialIndex,
    UniqueKey,
};
use super::table_options::TableOptions;
use crate::errors::{Error, ReferenceError};
use crate::policy::ReferencePolicy;
use crate::sql::tree::{CreateDefinition, DefaultValue, IndexKind, Position, TableOption};
use crate::sql::{NodeId, Statement};

/// Lookup of previously built tables by exact name.
pub trait TableRegistry {
    /// Returns the table called `name`, if any.
    fn table(&self, name: &str) -> Option<&Table>;
}

impl TableRegistry for [Table] {
    #[inline]
    fn table(&self, name: &str) -> Option<&Table> {
        self.iter().find(|table| table.name == name)
    }
}

impl TableRegistry for Vec<Table> {
    #[inline]
    fn table(&self, name: &str) -> Option<&Table> {
        self.as_slice().table(name)
    }
}

/// A borrowed named index, whichever collection holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexRef<'a> {
    /// A unique key.
    Unique(&'a UniqueKey),
    /// A plain index.
    Index(&'a Index),
    /// A fulltext index.
    Fulltext(&'a FulltextIndex),
    /// A spatial index.
    Spatial(&'a SpatialIndex),
}

impl IndexRef<'_> {
    /// Collection holding the index.
    #[must_use]
    pub fn kind(&self) -> IndexKind {
        match self {
            Self::Unique(_) => IndexKind::Unique,
            Self::Index(_) => IndexKind::Index,
            Self::Fulltext(_) => IndexKind::Fulltext,
            Self::Spatial(_) => IndexKind::Spatial,
        }
    }

    /// Indexed columns.
    #[must_use]
    pub fn columns(&self) -> &[IndexColumn] {
        match self {
            Self::Unique(key) => key.columns(),
            Self::Index(index) => index.columns(),
            Self::Fulltext(index) => index.columns(),
            Self::Spatial(index) => index.columns(),
        }
    }
}

/// A table definition.
///
/// Serializes to the compact canonical form: `name` and `columns` are always
/// present, every other field only when it holds something.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primary_key: Option<PrimaryKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    foreign_keys: Vec<ForeignKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    unique_keys: Vec<UniqueKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    indexes: Vec<Index>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    spatial_indexes: Vec<SpatialIndex>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fulltext_indexes: Vec<FulltextIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<TableOptions>,
}

/// Removes `column` from every construct of a collection, then drops the
/// constructs left without columns.
fn cascade_drop<K: KeyConstruct>(constructs: &mut Vec<K>, table: &str, column: &str) {
    constructs.retain_mut(|construct| {
        if !construct.drop_column(column) || !construct.is_empty() {
            return true;
        }
        tracing::trace!(
            table,
            column,
            construct = construct.identifier().unwrap_or_default(),
            "removed construct left without columns"
        );
        false
    });
}

fn cascade_rename<K: KeyConstruct>(constructs: &mut [K], from: &str, to: &str) {
    for construct in constructs {
        construct.rename_column(from, to);
    }
}

/// First referenced column missing from `columns`.
fn missing_column<K: KeyConstruct>(columns: &[Column], construct: &K) -> Option<String> {
    construct
        .columns()
        .iter()
        .find(|part| !columns.iter().any(|column| column.name == part.column))
        .map(|part| part.column.clone())
}

/// Removes the constructs naming a missing column, routing each miss through
/// the policy.
fn retain_resolved<K: KeyConstruct>(
    constructs: &mut Vec<K>,
    columns: &[Column],
    table: &str,
    policy: ReferencePolicy,
) -> Result<(), ReferenceError> {
    let mut outcome = Ok(());
    constructs.retain(|construct| {
        let Some(column) = missing_column(columns, construct) else {
            return true;
        };
        if outcome.is_ok() {
            outcome = policy.absorb(Err(ReferenceError::UnknownColumn {
                table: table.into(),
                column,
            }));
        }
        false
    });
    outcome
}

fn named<K: KeyConstruct>(constructs: &[K], name: &str) -> Option<usize> {
    constructs
        .iter()
        .position(|construct| construct.identifier() == Some(name))
}

impl Table {
    /// An empty table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            unique_keys: Vec::new(),
            indexes: Vec::new(),
            spatial_indexes: Vec::new(),
            fulltext_indexes: Vec::new(),
            options: None,
        }
    }

    /// Builds a table from a `P_CREATE_TABLE_COMMON` node under the lenient
    /// policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedNode`] for any other kind of node.
    pub fn from_common_def(node: &Statement) -> Result<Self, Error> {
        Self::from_common_def_with(node, ReferencePolicy::default())
    }

    /// Builds a table from a `P_CREATE_TABLE_COMMON` node.
    ///
    /// Entries are applied once, in declaration order, so inline and
    /// table-level keys keep their relative order and a later primary key
    /// replaces an earlier one. Key columns are resolved after the last
    /// entry, so keys written before the columns they cover still resolve.
    ///
    /// # Errors
    ///
    /// * [`Error::UnexpectedNode`] for any other kind of node.
    /// * [`Error::Reference`] for an unresolved reference under
    ///   [`ReferencePolicy::Strict`].
    pub fn from_common_def_with(node: &Statement, policy: ReferencePolicy) -> Result<Self, Error> {
        let Statement::CreateTable(def) = node else {
            return Err(Error::UnexpectedNode {
                expected: NodeId::CreateTableCommon,
                found: node.id(),
            });
        };

        let mut table = Self::new(def.table.clone());
        for definition in &def.columns_def {
            let result = match definition {
                CreateDefinition::Column(column) => {
                    table.add_column(Column::from_def(column), None)
                }
                CreateDefinition::PrimaryKey(key) => {
                    table.declare_primary_key(PrimaryKey::from_def(key))
                }
                CreateDefinition::ForeignKey(key) => {
                    table.declare_foreign_key(ForeignKey::from_def(key))
                }
                CreateDefinition::UniqueKey(key) => {
                    table.declare(UniqueKey::from_def(key), |t| &mut t.unique_keys)
                }
                CreateDefinition::Index(index) => {
                    table.declare(Index::from_def(index), |t| &mut t.indexes)
                }
                CreateDefinition::FulltextIndex(index) => {
                    table.declare(FulltextIndex::from_def(index), |t| &mut t.fulltext_indexes)
                }
                CreateDefinition::SpatialIndex(index) => {
                    table.declare(SpatialIndex::from_def(index), |t| &mut t.spatial_indexes)
                }
            };
            policy.absorb(result)?;
        }
        table.resolve_declared_keys(policy)?;

        if !def.table_options.is_empty() {
            table.merge_options(&def.table_options);
        }
        Ok(table)
    }

    /// Builds a table from a `P_CREATE_TABLE_LIKE` node by copying the
    /// registered source table.
    ///
    /// Returns `Ok(None)` when the registry has no table with the source
    /// name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedNode`] for any other kind of node.
    pub fn from_like_def<R>(node: &Statement, registry: &R) -> Result<Option<Self>, Error>
    where
        R: TableRegistry + ?Sized,
    {
        let Statement::CreateTableLike(def) = node else {
            return Err(Error::UnexpectedNode {
                expected: NodeId::CreateTableLike,
                found: node.id(),
            });
        };

        Ok(registry.table(&def.like).map(|source| {
            let mut table = source.clone();
            table.name.clone_from(&def.table);
            table
        }))
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the table.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Columns in table order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The primary key, if any.
    #[must_use]
    pub fn primary_key(&self) -> Option<&PrimaryKey> {
        self.primary_key.as_ref()
    }

    /// Foreign keys in insertion order.
    #[must_use]
    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Unique keys in insertion order.
    #[must_use]
    pub fn unique_keys(&self) -> &[UniqueKey] {
        &self.unique_keys
    }

    /// Plain indexes in insertion order.
    #[must_use]
    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    /// Fulltext indexes in insertion order.
    #[must_use]
    pub fn fulltext_indexes(&self) -> &[FulltextIndex] {
        &self.fulltext_indexes
    }

    /// Spatial indexes in insertion order.
    #[must_use]
    pub fn spatial_indexes(&self) -> &[SpatialIndex] {
        &self.spatial_indexes
    }

    /// Table options, if any was set.
    #[must_use]
    pub fn options(&self) -> Option<&TableOptions> {
        self.options.as_ref()
    }

    /// Looks a column up by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Looks a column up by name for in-place edits of its type or options.
    #[must_use]
    pub fn get_column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|column| column.name == name)
    }

    /// Looks a unique key, plain, fulltext or spatial index up by name.
    #[must_use]
    pub fn get_index(&self, name: &str) -> Option<IndexRef<'_>> {
        let lookup = Some(name);
        if let Some(key) = self.unique_keys.iter().find(|k| k.identifier() == lookup) {
            return Some(IndexRef::Unique(key));
        }
        if let Some(index) = self.indexes.iter().find(|i| i.identifier() == lookup) {
            return Some(IndexRef::Index(index));
        }
        if let Some(index) = self.fulltext_indexes.iter().find(|i| i.identifier() == lookup) {
            return Some(IndexRef::Fulltext(index));
        }
        self.spatial_indexes
            .iter()
            .find(|i| i.identifier() == lookup)
            .map(IndexRef::Spatial)
    }

    /// Looks a foreign key up by constraint symbol.
    #[must_use]
    pub fn get_foreign_key(&self, symbol: &str) -> Option<&ForeignKey> {
        self.foreign_keys
            .iter()
            .find(|key| key.identifier() == Some(symbol))
    }

    /// Where the column sits: `FIRST` for the first column, `None` for the
    /// last one, otherwise `AFTER` its predecessor.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::UnknownColumn`] if there is no such column.
    pub fn get_column_position(&self, name: &str) -> Result<Option<Position>, ReferenceError> {
        let index = self.column_index(name)?;
        if index == 0 {
            Ok(Some(Position::first()))
        } else if index + 1 == self.columns.len() {
            Ok(None)
        } else {
            Ok(Some(Position::after(self.columns[index - 1].name.clone())))
        }
    }

    /// Inserts a column, then promotes its inline constraints.
    ///
    /// # Arguments
    ///
    /// * `column` - The column to insert.
    /// * `position` - `None` appends, `FIRST` prepends, `AFTER c` inserts
    ///   right after `c`.
    ///
    /// # Errors
    ///
    /// * [`ReferenceError::DuplicateColumn`] if the name is taken.
    /// * [`ReferenceError::UnknownColumn`] if the `AFTER` target is missing.
    pub fn add_column(
        &mut self,
        column: Column,
        position: Option<&Position>,
    ) -> Result<(), ReferenceError> {
        if self.get_column(&column.name).is_some() {
            return Err(self.duplicate_column(&column.name));
        }
        let index = self.insertion_index(position)?;
        self.columns.insert(index, column);
        self.extract_column_features(index);
        Ok(())
    }

    /// Moves an existing column. The other columns keep their relative
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::UnknownColumn`] if either the column or the
    /// `AFTER` target is missing, including a column placed after itself.
    pub fn move_column(&mut self, name: &str, position: &Position) -> Result<(), ReferenceError> {
        let from = self.column_index(name)?;
        if let Some(after) = &position.after {
            self.column_index(after)?;
        }

        let column = self.columns.remove(from);
        match self.insertion_index(Some(position)) {
            Ok(to) => {
                self.columns.insert(to, column);
                Ok(())
            }
            Err(error) => {
                self.columns.insert(from, column);
                Err(error)
            }
        }
    }

    /// Removes a column and every reference to it.
    ///
    /// The reference is removed from the fulltext indexes, spatial indexes,
    /// plain indexes, unique keys, foreign keys and primary key, and any of
    /// them left without columns is deleted.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::UnknownColumn`] if there is no such column.
    pub fn drop_column(&mut self, name: &str) -> Result<Column, ReferenceError> {
        let index = self.column_index(name)?;
        let column = self.columns.remove(index);

        let table = self.name.as_str();
        cascade_drop(&mut self.fulltext_indexes, table, name);
        cascade_drop(&mut self.spatial_indexes, table, name);
        cascade_drop(&mut self.indexes, table, name);
        cascade_drop(&mut self.unique_keys, table, name);
        cascade_drop(&mut self.foreign_keys, table, name);
        if self
            .primary_key
            .as_mut()
            .is_some_and(|key| key.drop_column(name) && key.is_empty())
        {
            tracing::trace!(table, column = name, "removed primary key left without columns");
            self.primary_key = None;
        }
        Ok(column)
    }

    /// Renames a column and every key reference to it.
    ///
    /// # Errors
    ///
    /// * [`ReferenceError::UnknownColumn`] if there is no such column.
    /// * [`ReferenceError::DuplicateColumn`] if `to` is taken.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<(), ReferenceError> {
        let index = self.column_index(from)?;
        if from == to {
            return Ok(());
        }
        if self.get_column(to).is_some() {
            return Err(self.duplicate_column(to));
        }
        self.columns[index].name = to.to_string();
        self.rename_references(from, to);
        Ok(())
    }

    /// Replaces a column's definition, as `CHANGE` and `MODIFY` do.
    ///
    /// The column stays where it was unless `position` is given. When the
    /// name changes, key references follow it. Inline constraints of the new
    /// definition are promoted.
    ///
    /// # Errors
    ///
    /// * [`ReferenceError::UnknownColumn`] if the column or the `AFTER`
    ///   target is missing.
    /// * [`ReferenceError::DuplicateColumn`] if the new name is taken.
    pub fn replace_column(
        &mut self,
        name: &str,
        column: Column,
        position: Option<&Position>,
    ) -> Result<(), ReferenceError> {
        let index = self.column_index(name)?;
        if column.name != name && self.get_column(&column.name).is_some() {
            return Err(self.duplicate_column(&column.name));
        }
        let target = match position {
            Some(position) => {
                if let Some(after) = &position.after {
                    if after == name {
                        return Err(self.unknown_column(after));
                    }
                    self.column_index(after)?;
                }
                Some(position.clone())
            }
            None => self.get_column_position(name)?,
        };

        let renamed = column.name.clone();
        self.columns.remove(index);
        if renamed != name {
            self.rename_references(name, &renamed);
        }
        let slot = self
            .insertion_index(target.as_ref())
            .unwrap_or_else(|_| self.columns.len());
        self.columns.insert(slot, column);
        self.extract_column_features(slot);
        Ok(())
    }

    /// Sets or clears (`None`) a column default.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::UnknownColumn`] if there is no such column.
    pub fn set_column_default(
        &mut self,
        name: &str,
        value: Option<DefaultValue>,
    ) -> Result<(), ReferenceError> {
        let index = self.column_index(name)?;
        self.columns[index].options.default = value;
        Ok(())
    }

    /// Appends a plain index.
    ///
    /// # Errors
    ///
    /// * [`ReferenceError::EmptyKey`] or [`ReferenceError::UnknownColumn`]
    ///   if the columns do not resolve.
    /// * [`ReferenceError::DuplicateIndex`] if the name is taken.
    pub fn push_index(&mut self, index: Index) -> Result<(), ReferenceError> {
        self.check_index(&index)?;
        self.indexes.push(index);
        Ok(())
    }

    /// Appends a unique key.
    ///
    /// # Errors
    ///
    /// Same as [`Table::push_index`].
    pub fn push_unique_key(&mut self, key: UniqueKey) -> Result<(), ReferenceError> {
        self.check_index(&key)?;
        self.unique_keys.push(key);
        Ok(())
    }

    /// Appends a fulltext index.
    ///
    /// # Errors
    ///
    /// Same as [`Table::push_index`].
    pub fn push_fulltext_index(&mut self, index: FulltextIndex) -> Result<(), ReferenceError> {
        self.check_index(&index)?;
        self.fulltext_indexes.push(index);
        Ok(())
    }

    /// Appends a spatial index.
    ///
    /// # Errors
    ///
    /// Same as [`Table::push_index`].
    pub fn push_spatial_index(&mut self, index: SpatialIndex) -> Result<(), ReferenceError> {
        self.check_index(&index)?;
        self.spatial_indexes.push(index);
        Ok(())
    }

    /// Appends a foreign key. Only the local columns are checked; the
    /// referenced table may not exist yet.
    ///
    /// # Errors
    ///
    /// * [`ReferenceError::EmptyKey`] or [`ReferenceError::UnknownColumn`]
    ///   if the local columns do not resolve.
    /// * [`ReferenceError::DuplicateForeignKey`] if the symbol is taken.
    pub fn push_foreign_key(&mut self, key: ForeignKey) -> Result<(), ReferenceError> {
        self.check_columns(&key)?;
        if let Some(symbol) = key
            .identifier()
            .filter(|symbol| self.get_foreign_key(symbol).is_some())
        {
            return Err(ReferenceError::DuplicateForeignKey {
                table: self.name.clone(),
                symbol: symbol.to_string(),
            });
        }
        self.foreign_keys.push(key);
        Ok(())
    }

    /// Sets the primary key, failing if the table already has one.
    ///
    /// # Errors
    ///
    /// * [`ReferenceError::DuplicatePrimaryKey`] if a primary key exists.
    /// * [`ReferenceError::EmptyKey`] or [`ReferenceError::UnknownColumn`]
    ///   if the columns do not resolve.
    pub fn add_primary_key(&mut self, key: PrimaryKey) -> Result<(), ReferenceError> {
        if self.primary_key.is_some() {
            return Err(ReferenceError::DuplicatePrimaryKey {
                table: self.name.clone(),
            });
        }
        self.set_primary_key(key).map(|_| ())
    }

    /// Sets the primary key, replacing and returning the previous one. Its
    /// columns become `NOT NULL`.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::EmptyKey`] or
    /// [`ReferenceError::UnknownColumn`] if the columns do not resolve.
    pub fn set_primary_key(
        &mut self,
        key: PrimaryKey,
    ) -> Result<Option<PrimaryKey>, ReferenceError> {
        self.check_columns(&key)?;
        Ok(self.attach_primary_key(key))
    }

    /// Removes and returns the primary key.
    pub fn drop_primary_key(&mut self) -> Option<PrimaryKey> {
        self.primary_key.take()
    }

    /// Removes a foreign key by symbol. Columns are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::UnknownForeignKey`] if no key has the
    /// symbol.
    pub fn drop_foreign_key(&mut self, symbol: &str) -> Result<ForeignKey, ReferenceError> {
        named(&self.foreign_keys, symbol)
            .map(|i| self.foreign_keys.remove(i))
            .ok_or_else(|| ReferenceError::UnknownForeignKey {
                table: self.name.clone(),
                symbol: symbol.to_string(),
            })
    }

    /// Removes a unique key, plain, fulltext or spatial index by name.
    /// Columns are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::UnknownIndex`] if nothing has the name.
    pub fn drop_index(&mut self, name: &str) -> Result<IndexKind, ReferenceError> {
        let kind = self
            .get_index(name)
            .map(|index| index.kind())
            .ok_or_else(|| self.unknown_index(name))?;
        match kind {
            IndexKind::Unique => Self::remove_named(&mut self.unique_keys, name),
            IndexKind::Index => Self::remove_named(&mut self.indexes, name),
            IndexKind::Fulltext => Self::remove_named(&mut self.fulltext_indexes, name),
            IndexKind::Spatial => Self::remove_named(&mut self.spatial_indexes, name),
        }
        Ok(kind)
    }

    /// Renames a unique key, plain, fulltext or spatial index.
    ///
    /// # Errors
    ///
    /// * [`ReferenceError::UnknownIndex`] if nothing has the name `from`.
    /// * [`ReferenceError::DuplicateIndex`] if `to` is taken.
    pub fn rename_index(&mut self, from: &str, to: &str) -> Result<(), ReferenceError> {
        let kind = self
            .get_index(from)
            .map(|index| index.kind())
            .ok_or_else(|| self.unknown_index(from))?;
        if from == to {
            return Ok(());
        }
        if self.get_index(to).is_some() {
            return Err(ReferenceError::DuplicateIndex {
                table: self.name.clone(),
                index: to.to_string(),
            });
        }
        let name = Some(to.to_string());
        let slot = match kind {
            IndexKind::Unique => {
                named(&self.unique_keys, from).map(|i| &mut self.unique_keys[i].name)
            }
            IndexKind::Index => named(&self.indexes, from).map(|i| &mut self.indexes[i].name),
            IndexKind::Fulltext => {
                named(&self.fulltext_indexes, from).map(|i| &mut self.fulltext_indexes[i].name)
            }
            IndexKind::Spatial => {
                named(&self.spatial_indexes, from).map(|i| &mut self.spatial_indexes[i].name)
            }
        };
        if let Some(slot) = slot {
            *slot = name;
        }
        Ok(())
    }

    /// Applies table options on top of the current ones.
    pub fn merge_options(&mut self, options: &[TableOption]) {
        let merged = self.options.get_or_insert_with(TableOptions::default);
        merged.merge(options);
        if merged.is_empty() {
            self.options = None;
        }
    }

    /// Replaces the table options.
    pub fn set_options(&mut self, options: TableOptions) {
        self.options = (!options.is_empty()).then_some(options);
    }

    /// Checks that a decoded table satisfies the invariants mutations keep.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ReferenceError> {
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.name == column.name) {
                return Err(self.duplicate_column(&column.name));
            }
        }
        if let Some(key) = &self.primary_key {
            self.check_columns(key)?;
        }
        for key in &self.foreign_keys {
            self.check_columns(key)?;
        }

        for key in &self.unique_keys {
            self.check_columns(key)?;
        }
        for index in &self.indexes {
            self.check_columns(index)?;
        }
        for index in &self.fulltext_indexes {
            self.check_columns(index)?;
        }
        for index in &self.spatial_indexes {
            self.check_columns(index)?;
        }

        let names: Vec<&str> = self
            .unique_keys
            .iter()
            .map(KeyConstruct::identifier)
            .chain(self.indexes.iter().map(KeyConstruct::identifier))
            .chain(self.fulltext_indexes.iter().map(KeyConstruct::identifier))
            .chain(self.spatial_indexes.iter().map(KeyConstruct::identifier))
            .flatten()
            .collect();
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(self.duplicate_index(name));
            }
        }
        Ok(())
    }

    /// Promotes the inline constraints of the column at `index`: the primary
    /// key first, then the foreign key, then the unique key.
    fn extract_column_features(&mut self, index: usize) {
        let column = &mut self.columns[index];
        let primary = column.take_primary_key();
        let unique = column.take_unique_key();
        let reference = column.take_reference();
        let name = column.name.clone();

        if primary {
            let previous = self.attach_primary_key(PrimaryKey::on_columns([name.clone()]));
            if let Some(previous) = previous {
                tracing::trace!(
                    table = self.name.as_str(),
                    ?previous,
                    "inline primary key replaced"
                );
            }
        }
        if let Some(reference) = reference {
            self.foreign_keys
                .push(ForeignKey::on_columns([name.clone()], reference));
        }
        if unique {
            self.unique_keys.push(UniqueKey::on_columns([name]));
        }
    }

    fn attach_primary_key(&mut self, key: PrimaryKey) -> Option<PrimaryKey> {
        for part in &key.columns {
            if let Some(column) = self.get_column_mut(&part.column) {
                column.options.nullable = false;
            }
        }
        self.primary_key.replace(key)
    }

    fn rename_references(&mut self, from: &str, to: &str) {
        cascade_rename(&mut self.fulltext_indexes, from, to);
        cascade_rename(&mut self.spatial_indexes, from, to);
        cascade_rename(&mut self.indexes, from, to);
        cascade_rename(&mut self.unique_keys, from, to);
        cascade_rename(&mut self.foreign_keys, from, to);
        if let Some(key) = &mut self.primary_key {
            key.rename_column(from, to);
        }
    }

    fn remove_named<K: KeyConstruct>(constructs: &mut Vec<K>, name: &str) {
        if let Some(i) = named(constructs, name) {
            constructs.remove(i);
        }
    }

    fn check_columns<K: KeyConstruct>(&self, construct: &K) -> Result<(), ReferenceError> {
        if construct.is_empty() {
            return Err(ReferenceError::EmptyKey {
                table: self.name.clone(),
            });
        }
        for part in construct.columns() {
            self.column_index(&part.column)?;
        }
        Ok(())
    }

    fn check_index<K: KeyConstruct>(&self, construct: &K) -> Result<(), ReferenceError> {
        self.check_columns(construct)?;
        self.check_name(construct)
    }

    /// Index names are unique across the four named collections, so
    /// [`Table::get_index`] is never ambiguous.
    fn check_name<K: KeyConstruct>(&self, construct: &K) -> Result<(), ReferenceError> {
        if construct.is_empty() {
            return Err(ReferenceError::EmptyKey {
                table: self.name.clone(),
            });
        }
        match construct.identifier() {
            Some(name) if self.get_index(name).is_some() => Err(self.duplicate_index(name)),
            _ => Ok(()),
        }
    }

    /// Named index declared by `CREATE TABLE`. Its columns are resolved by
    /// [`Table::resolve_declared_keys`].
    fn declare<K: KeyConstruct>(
        &mut self,
        construct: K,
        collection: fn(&mut Self) -> &mut Vec<K>,
    ) -> Result<(), ReferenceError> {
        self.check_name(&construct)?;
        collection(self).push(construct);
        Ok(())
    }

    /// Primary key declared by `CREATE TABLE`, replacing any earlier one.
    /// Its columns are resolved by [`Table::resolve_declared_keys`].
    fn declare_primary_key(&mut self, key: PrimaryKey) -> Result<(), ReferenceError> {
        if key.is_empty() {
            return Err(ReferenceError::EmptyKey {
                table: self.name.clone(),
            });
        }
        if let Some(previous) = self.primary_key.replace(key) {
            tracing::trace!(
                table = self.name.as_str(),
                ?previous,
                "declared primary key replaced"
            );
        }
        Ok(())
    }

    /// Foreign key declared by `CREATE TABLE`. Its columns are resolved by
    /// [`Table::resolve_declared_keys`].
    fn declare_foreign_key(&mut self, key: ForeignKey) -> Result<(), ReferenceError> {
        if key.is_empty() {
            return Err(ReferenceError::EmptyKey {
                table: self.name.clone(),
            });
        }
        if let Some(symbol) = key
            .identifier()
            .filter(|symbol| self.get_foreign_key(symbol).is_some())
        {
            return Err(ReferenceError::DuplicateForeignKey {
                table: self.name.clone(),
                symbol: symbol.to_string(),
            });
        }
        self.foreign_keys.push(key);
        Ok(())
    }

    /// Drops the declared keys naming a column the table does not have, then
    /// makes the primary key columns `NOT NULL`.
    fn resolve_declared_keys(&mut self, policy: ReferencePolicy) -> Result<(), ReferenceError> {
        let table = self.name.as_str();
        let columns = self.columns.as_slice();
        retain_resolved(&mut self.fulltext_indexes, columns, table, policy)?;
        retain_resolved(&mut self.spatial_indexes, columns, table, policy)?;
        retain_resolved(&mut self.indexes, columns, table, policy)?;
        retain_resolved(&mut self.unique_keys, columns, table, policy)?;
        retain_resolved(&mut self.foreign_keys, columns, table, policy)?;

        let missing = self
            .primary_key
            .as_ref()
            .and_then(|key| missing_column(columns, key));
        if let Some(column) = missing {
            policy.absorb(Err(ReferenceError::UnknownColumn {
                table: self.name.clone(),
                column,
            }))?;
            self.primary_key = None;
        }
        if let Some(key) = &self.primary_key {
            for column in &mut self.columns {
                if key.references(&column.name) {
                    column.options.nullable = false;
                }
            }
        }
        Ok(())
    }

    fn insertion_index(&self, position: Option<&Position>) -> Result<usize, ReferenceError> {
        match position {
            None => Ok(self.columns.len()),
            Some(Position { after: None }) => Ok(0),
            Some(Position { after: Some(after) }) => self.column_index(after).map(|i| i + 1),
        }
    }

    fn column_index(&self, name: &str) -> Result<usize, ReferenceError> {
        self.columns
            .iter()
            .position(|column| column.name == name)
            .ok_or_else(|| self.unknown_column(name))
    }

    fn unknown_column(&self, column: &str) -> ReferenceError {
        ReferenceError::UnknownColumn {
            table: self.name.clone(),
            column: column.to_string(),
        }
    }

    fn duplicate_column(&self, column: &str) -> ReferenceError {
        ReferenceError::DuplicateColumn {
            table: self.name.clone(),
            column: column.to_string(),
        }
    }

    fn unknown_index(&self, index: &str) -> ReferenceError {
        ReferenceError::UnknownIndex {
            table: self.name.clone(),
            index: index.to_string(),
        }
    }

    fn duplicate_index(&self, index: &str) -> ReferenceError {
        ReferenceError::DuplicateIndex {
            table: self.name.clone(),
            index: index.to_string(),
        }
    }
}
