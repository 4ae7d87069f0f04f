//! Statement driver keeping every table built so far.
//!
//! The [`Catalog`] applies parsed DDL statements in order: `CREATE TABLE`
//! builds a [`Table`], `ALTER TABLE` mutates it, and the remaining
//! statements drop, rename or index registered tables. Unresolved references
//! are handled by the configured [`ReferencePolicy`].

use alloc::string::String;
use alloc::vec::Vec;

use indexmap::IndexMap as IndexMapRaw;
use serde::Deserialize;

use crate::errors::{Error, ReferenceError};
use crate::model::{
    Column, ForeignKey, FulltextIndex, Index, PrimaryKey, SpatialIndex, Table, TableRegistry,
    UniqueKey,
};
use crate::policy::ReferencePolicy;
use crate::sql::tree::{AlterSpec, IndexDef, IndexKind};
use crate::sql::{Statement, parse};

/// `IndexMap` alias using hashbrown's default hasher for `no_std` compatibility.
type IndexMap<K, V> = IndexMapRaw<K, V, hashbrown::DefaultHashBuilder>;

/// Name under which `DROP INDEX` addresses the primary key.
const PRIMARY_INDEX: &str = "PRIMARY";

/// Settings of a [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CatalogOptions {
    /// How unresolved references are handled.
    pub policy: ReferencePolicy,
}

impl CatalogOptions {
    /// Sets the reference policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ReferencePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// One node or a list of nodes, as accepted by [`Catalog::apply_json`].
#[derive(Deserialize)]
#[serde(untagged)]
enum Nodes {
    One(Statement),
    Many(Vec<Statement>),
}

/// Registry of tables, keyed by name in creation order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: IndexMap<String, Table>,
    options: CatalogOptions,
}

impl TableRegistry for Catalog {
    #[inline]
    fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }
}

impl Catalog {
    /// An empty catalog with the lenient policy.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty catalog with the given options.
    #[must_use]
    pub fn with_options(options: CatalogOptions) -> Self {
        Self {
            tables: IndexMap::default(),
            options,
        }
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> CatalogOptions {
        self.options
    }

    /// Builds a catalog from a DDL script under the lenient policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the script cannot be parsed.
    pub fn from_sql(sql: &str) -> Result<Self, Error> {
        let mut catalog = Self::new();
        catalog.feed(sql)?;
        Ok(catalog)
    }

    /// Parses a DDL script and applies every statement in order.
    ///
    /// Nothing is applied when the script fails to parse.
    ///
    /// # Errors
    ///
    /// * [`Error::Parse`] if the script cannot be parsed.
    /// * [`Error::Reference`] for an unresolved reference under
    ///   [`ReferencePolicy::Strict`]. Statements before the failing one
    ///   stay applied.
    pub fn feed(&mut self, sql: &str) -> Result<&mut Self, Error> {
        for statement in parse(sql)? {
            self.apply(&statement)?;
        }
        Ok(self)
    }

    /// Applies parse-tree nodes encoded as JSON: a single `{id, def}` node
    /// or an array of them.
    ///
    /// # Errors
    ///
    /// * [`Error::Json`] if the input does not decode to parse-tree nodes.
    /// * [`Error::Reference`] as for [`Catalog::apply`].
    pub fn apply_json(&mut self, json: &str) -> Result<&mut Self, Error> {
        match serde_json::from_str(json)? {
            Nodes::One(statement) => self.apply(&statement)?,
            Nodes::Many(statements) => {
                for statement in &statements {
                    self.apply(statement)?;
                }
            }
        }
        Ok(self)
    }

    /// Applies one statement. The catalog is left unchanged when the
    /// statement fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reference`] for an unresolved reference under
    /// [`ReferencePolicy::Strict`].
    pub fn apply(&mut self, statement: &Statement) -> Result<(), Error> {
        tracing::debug!(statement = %statement.id(), "applying statement");
        let policy = self.options.policy;

        match statement {
            Statement::CreateTable(def) => {
                if self.tables.contains_key(&def.table) {
                    return self.existing(&def.table, def.if_not_exists);
                }
                let table = Table::from_common_def_with(statement, policy)?;
                self.tables.insert(def.table.clone(), table);
            }
            Statement::CreateTableLike(def) => {
                if self.tables.contains_key(&def.table) {
                    return self.existing(&def.table, def.if_not_exists);
                }
                match Table::from_like_def(statement, self)? {
                    Some(table) => {
                        self.tables.insert(def.table.clone(), table);
                    }
                    None => policy.absorb(Err(unknown_table(&def.like)))?,
                }
            }
            Statement::AlterTable(def) => {
                let Some(current) = self.tables.get(&def.table) else {
                    return Ok(policy.absorb(Err(unknown_table(&def.table)))?);
                };
                let mut table = current.clone();
                for spec in &def.specs {
                    policy.absorb(self.alter(&mut table, spec))?;
                }
                self.commit(&def.table, table);
            }
            Statement::DropTable(def) => {
                for name in &def.tables {
                    if self.tables.shift_remove(name).is_none() && !def.if_exists {
                        policy.absorb(Err(unknown_table(name)))?;
                    }
                }
            }
            Statement::RenameTable(def) => {
                for rename in &def.renames {
                    policy.absorb(self.rename(&rename.from, &rename.to))?;
                }
            }
            Statement::CreateIndex(def) => {
                let result = match self.tables.get_mut(&def.table) {
                    Some(table) => add_index(table, def.kind, &def.index),
                    None => Err(unknown_table(&def.table)),
                };
                policy.absorb(result)?;
            }
            Statement::DropIndex(def) => {
                let result = match self.tables.get_mut(&def.table) {
                    Some(table) => drop_index(table, &def.index),
                    None => Err(unknown_table(&def.table)),
                };
                policy.absorb(result)?;
            }
        }
        Ok(())
    }

    /// Looks a table up by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Looks a table up by name for direct mutation.
    #[must_use]
    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Tables in creation order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> + '_ {
        self.tables.values()
    }

    /// Number of tables.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if the catalog holds no table.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Registers a table built elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::DuplicateTable`] if the name is taken.
    pub fn insert(&mut self, table: Table) -> Result<(), ReferenceError> {
        if self.tables.contains_key(table.name()) {
            return Err(ReferenceError::DuplicateTable {
                table: table.name().into(),
            });
        }
        self.tables.insert(table.name().into(), table);
        Ok(())
    }

    /// Compact JSON array of every table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_compact_json(&self) -> Result<String, Error> {
        let tables: Vec<&Table> = self.tables.values().collect();
        Ok(serde_json::to_string(&tables)?)
    }

    /// Rebuilds a catalog from the output of [`Catalog::to_compact_json`].
    ///
    /// # Errors
    ///
    /// * [`Error::Json`] if the input does not decode.
    /// * [`Error::Reference`] if a table breaks a model invariant or two
    ///   tables share a name.
    pub fn from_compact_json(json: &str) -> Result<Self, Error> {
        let tables: Vec<Table> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for table in tables {
            table.validate()?;
            catalog.insert(table)?;
        }
        Ok(catalog)
    }

    /// JSON Schema of every table, in creation order.
    #[cfg(feature = "json-schema")]
    #[must_use]
    pub fn json_schemas(
        &self,
        options: &crate::format::JsonSchemaOptions,
    ) -> Vec<crate::format::JsonSchema> {
        self.tables
            .values()
            .map(|table| crate::format::to_json_schema(table, options))
            .collect()
    }

    /// Document schema of every table, in creation order.
    #[cfg(feature = "document-schema")]
    #[must_use]
    pub fn document_schemas(&self) -> Vec<crate::format::DocumentSchema> {
        self.tables
            .values()
            .map(crate::format::to_document_schema)
            .collect()
    }

    fn existing(&self, table: &str, if_not_exists: bool) -> Result<(), Error> {
        if if_not_exists {
            tracing::debug!(table, "table exists, skipping");
            return Ok(());
        }
        Ok(self.options.policy.absorb(Err(ReferenceError::DuplicateTable {
            table: table.into(),
        }))?)
    }

    /// Applies one `ALTER TABLE` specification to a working copy.
    fn alter(&self, table: &mut Table, spec: &AlterSpec) -> Result<(), ReferenceError> {
        match spec {
            AlterSpec::AddColumn { column, position } => {
                table.add_column(Column::from_def(column), position.as_ref())
            }
            AlterSpec::AddColumns { columns } => columns
                .iter()
                .try_for_each(|column| table.add_column(Column::from_def(column), None)),
            AlterSpec::AddIndex { kind, index } => add_index(table, *kind, index),
            AlterSpec::AddPrimaryKey { key } => table.add_primary_key(PrimaryKey::from_def(key)),
            AlterSpec::AddForeignKey { key } => table.push_foreign_key(ForeignKey::from_def(key)),
            AlterSpec::SetDefault { column, value } => {
                table.set_column_default(column, Some(value.clone()))
            }
            AlterSpec::DropDefault { column } => table.set_column_default(column, None),
            AlterSpec::ChangeColumn {
                column,
                definition,
                position,
            } => table.replace_column(column, Column::from_def(definition), position.as_ref()),
            AlterSpec::ModifyColumn {
                definition,
                position,
            } => table.replace_column(
                &definition.name,
                Column::from_def(definition),
                position.as_ref(),
            ),
            AlterSpec::RenameColumn { column, to } => table.rename_column(column, to),
            AlterSpec::DropColumn { column } => table.drop_column(column).map(|_| ()),
            AlterSpec::DropIndex { index } => drop_index(table, index),
            AlterSpec::DropPrimaryKey => drop_primary_key(table),
            AlterSpec::DropForeignKey { symbol } => table.drop_foreign_key(symbol).map(|_| ()),
            AlterSpec::RenameIndex { index, to } => table.rename_index(index, to),
            AlterSpec::RenameTable { to } => {
                if to != table.name() && self.tables.contains_key(to) {
                    return Err(ReferenceError::DuplicateTable { table: to.clone() });
                }
                table.set_name(to.clone());
                Ok(())
            }
            AlterSpec::SetOptions { options } => {
                table.merge_options(options);
                Ok(())
            }
        }
    }

    /// Stores an altered table back in the slot of `previous`, re-keying it
    /// when the table was renamed.
    fn commit(&mut self, previous: &str, table: Table) {
        if table.name() == previous {
            self.tables.insert(table.name().into(), table);
            return;
        }
        if let Some((index, _, _)) = self.tables.shift_remove_full(previous) {
            self.tables.shift_insert(index, table.name().into(), table);
        }
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), ReferenceError> {
        if self.tables.contains_key(to) {
            return Err(ReferenceError::DuplicateTable { table: to.into() });
        }
        let Some((index, _, mut table)) = self.tables.shift_remove_full(from) else {
            return Err(unknown_table(from));
        };
        table.set_name(to);
        self.tables.shift_insert(index, to.into(), table);
        Ok(())
    }
}

fn unknown_table(table: &str) -> ReferenceError {
    ReferenceError::UnknownTable {
        table: table.into(),
    }
}

fn add_index(table: &mut Table, kind: IndexKind, def: &IndexDef) -> Result<(), ReferenceError> {
    match kind {
        IndexKind::Index => table.push_index(Index::from_def(def)),
        IndexKind::Unique => table.push_unique_key(UniqueKey::from_def(def)),
        IndexKind::Fulltext => table.push_fulltext_index(FulltextIndex::from_def(def)),
        IndexKind::Spatial => table.push_spatial_index(SpatialIndex::from_def(def)),
    }
}

fn drop_index(table: &mut Table, index: &str) -> Result<(), ReferenceError> {
    if index.eq_ignore_ascii_case(PRIMARY_INDEX) {
        drop_primary_key(table)
    } else {
        table.drop_index(index).map(|_| ())
    }
}

fn drop_primary_key(table: &mut Table) -> Result<(), ReferenceError> {
    table
        .drop_primary_key()
        .map(|_| ())
        .ok_or_else(|| ReferenceError::MissingPrimaryKey {
            table: table.name().into(),
        })
}
