//! Canonical table model.
//!
//! A [`Table`] owns its [`Column`]s and every key or index over them. It is
//! built from a parse-tree [`Statement`](crate::sql::Statement) and mutated
//! in place by `ALTER TABLE` operations.

mod column;
mod datatype;
mod keys;
mod table;
mod table_options;

pub use column::{Column, ColumnOptions};
pub use datatype::{Datatype, DatatypeKind, DatatypeProjection, ValueFormat};
pub use keys::{
    ForeignKey, FulltextIndex, Index, IndexColumn, IndexOptions, KeyConstruct, PrimaryKey,
    Reference, SpatialIndex, UniqueKey,
};
pub use table::{IndexRef, Table, TableRegistry};
pub use table_options::TableOptions;
