//! Compact JSON round-trip fuzzer.
//!
//! Builds a catalog from arbitrary DDL and, when that succeeds, verifies the
//! compact JSON form decodes back to the same tables and re-encodes to the
//! same text.

use ddl_schema_rs::Catalog;
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let Ok(sql) = std::str::from_utf8(data) else {
                return;
            };
            let Ok(catalog) = Catalog::from_sql(sql) else {
                return;
            };

            let json = catalog.to_compact_json().expect("Failed to encode catalog");
            let decoded = Catalog::from_compact_json(&json).expect("Failed to decode catalog");
            assert_eq!(decoded.len(), catalog.len());
            for (left, right) in catalog.tables().zip(decoded.tables()) {
                assert_eq!(left, right);
            }
            assert_eq!(decoded.to_compact_json().expect("Failed to re-encode"), json);
        });
    }
}
