#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

pub mod catalog;
pub mod errors;
pub mod format;
pub mod model;
pub mod policy;
pub mod sql;

pub use catalog::{Catalog, CatalogOptions};
pub use errors::{Error, ReferenceError};
pub use model::{Column, Datatype, Table, TableRegistry};
pub use policy::ReferencePolicy;
pub use sql::{ParseError, Statement, parse};

#[cfg(feature = "document-schema")]
pub use format::to_document_schema;
#[cfg(feature = "json-schema")]
pub use format::{JsonSchemaOptions, to_json_schema};
