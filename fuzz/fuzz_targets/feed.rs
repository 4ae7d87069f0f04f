//! DDL feeding fuzzer for Catalog.
//!
//! Feeds arbitrary text to a lenient and a strict catalog. Parsing and
//! applying may fail, but must never panic, and every table left in either
//! catalog must satisfy the model invariants and project to both schema
//! formats.

use ddl_schema_rs::format::{JsonSchemaOptions, to_document_schema, to_json_schema};
use ddl_schema_rs::{Catalog, CatalogOptions, ReferencePolicy};
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let Ok(sql) = std::str::from_utf8(data) else {
                return;
            };

            let mut lenient = Catalog::new();
            let mut strict = Catalog::with_options(
                CatalogOptions::default().with_policy(ReferencePolicy::Strict),
            );
            let _ = lenient.feed(sql);
            let _ = strict.feed(sql);

            for table in lenient.tables().chain(strict.tables()) {
                assert_eq!(table.validate(), Ok(()), "{sql:?} broke {}", table.name());
                let _ = to_json_schema(table, &JsonSchemaOptions::default());
                let _ = to_document_schema(table);
            }
        });
    }
}
