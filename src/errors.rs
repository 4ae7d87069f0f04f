//! Submodule defining the errors used across the crate.

use alloc::string::String;

use crate::sql::{NodeId, ParseError};

/// A reference to a column, index, key or table that does not resolve, or
/// a name that collides with an existing one.
///
/// Table mutations return this error and leave the table untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
    /// The column does not exist in the table.
    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },
    /// No unique key, index, fulltext or spatial index has this name.
    #[error("Unknown index '{index}' in table '{table}'")]
    UnknownIndex {
        /// Table name.
        table: String,
        /// Index name.
        index: String,
    },
    /// No foreign key has this symbol.
    #[error("Unknown foreign key '{symbol}' in table '{table}'")]
    UnknownForeignKey {
        /// Table name.
        table: String,
        /// Constraint symbol.
        symbol: String,
    },
    /// The table is not registered.
    #[error("Unknown table '{table}'")]
    UnknownTable {
        /// Table name.
        table: String,
    },
    /// A column with this name already exists.
    #[error("Duplicate column '{column}' in table '{table}'")]
    DuplicateColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },
    /// An index with this name already exists in the same collection.
    #[error("Duplicate index '{index}' in table '{table}'")]
    DuplicateIndex {
        /// Table name.
        table: String,
        /// Index name.
        index: String,
    },
    /// A foreign key with this symbol already exists.
    #[error("Duplicate foreign key '{symbol}' in table '{table}'")]
    DuplicateForeignKey {
        /// Table name.
        table: String,
        /// Constraint symbol.
        symbol: String,
    },
    /// A table with this name is already registered.
    #[error("Table '{table}' already exists")]
    DuplicateTable {
        /// Table name.
        table: String,
    },
    /// The table already has a primary key.
    #[error("Table '{table}' already has a primary key")]
    DuplicatePrimaryKey {
        /// Table name.
        table: String,
    },
    /// A key or index would reference no column.
    #[error("Key or index on table '{table}' has no columns")]
    EmptyKey {
        /// Table name.
        table: String,
    },
    /// The table has no primary key to drop.
    #[error("Table '{table}' has no primary key")]
    MissingPrimaryKey {
        /// Table name.
        table: String,
    },
}

/// Errors that can occur while building or altering tables.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A construction entry point received a node of the wrong kind.
    #[error("Expected a {expected} node, found {found}")]
    UnexpectedNode {
        /// Discriminant accepted by the entry point.
        expected: NodeId,
        /// Discriminant of the supplied node.
        found: NodeId,
    },
    /// The SQL text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A referential miss surfaced under the strict policy.
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    /// A JSON parse tree or compact table could not be decoded.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
