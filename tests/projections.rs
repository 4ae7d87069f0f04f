//! Tests for the compact, JSON Schema and document schema projections.

use ddl_schema_rs::format::{
    DocumentType, JsonSchemaOptions, from_compact_json, to_compact_json, to_document_schema,
    to_json_schema,
};
use ddl_schema_rs::{Catalog, Table};
use regex::Regex;

const SCHEMA: &str = "
    CREATE TABLE accounts (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
        handle VARCHAR(32) NOT NULL,
        flags SET('admin', 'staff', 'beta') NOT NULL DEFAULT '',
        tier ENUM('free', 'pro') DEFAULT 'free',
        balance DECIMAL(8,2) UNSIGNED,
        ratio FLOAT(6,3),
        joined YEAR,
        active BOOLEAN NOT NULL DEFAULT TRUE,
        bio TEXT,
        PRIMARY KEY (id),
        UNIQUE KEY uk_handle (handle)
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COMMENT='user accounts';

    CREATE TABLE sessions (
        id CHAR(36) NOT NULL PRIMARY KEY,
        account BIGINT UNSIGNED NOT NULL,
        started TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
        KEY idx_account (account),
        CONSTRAINT fk_account FOREIGN KEY (account) REFERENCES accounts (id) ON DELETE CASCADE
    );
";

fn catalog() -> Catalog {
    Catalog::from_sql(SCHEMA).expect("Failed to build catalog")
}

fn accounts(catalog: &Catalog) -> &Table {
    catalog.table("accounts").unwrap()
}

// =============================================================================
// Compact form
// =============================================================================

#[test]
fn test_compact_serialization_is_idempotent() {
    let catalog = catalog();
    for table in catalog.tables() {
        let first = to_compact_json(table).unwrap();
        let decoded = from_compact_json(&first).unwrap();
        let second = to_compact_json(&decoded).unwrap();
        assert_eq!(first, second);
    }

    let all = catalog.to_compact_json().unwrap();
    let rebuilt = Catalog::from_compact_json(&all).unwrap();
    assert_eq!(rebuilt.to_compact_json().unwrap(), all);
}

#[test]
fn test_compact_omits_empty_collections() {
    let catalog = catalog();
    let value: serde_json::Value =
        serde_json::from_str(&to_compact_json(accounts(&catalog)).unwrap()).unwrap();
    let object = value.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["columns", "name", "options", "primaryKey", "uniqueKeys"]);
    assert_eq!(value["options"]["engine"], "InnoDB");
    assert_eq!(value["options"]["charset"], "utf8mb4");

    let sessions: serde_json::Value =
        serde_json::to_value(catalog.table("sessions").unwrap()).unwrap();
    assert_eq!(
        sessions["foreignKeys"][0]["reference"],
        serde_json::json!({
            "table": "accounts",
            "columns": [{"column": "id"}],
            "onDelete": "cascade"
        })
    );
    assert_eq!(
        sessions["columns"][2]["options"]["default"],
        "CURRENT_TIMESTAMP(3)"
    );
}

// =============================================================================
// JSON Schema
// =============================================================================

#[test]
fn test_json_schema_bounds() {
    let catalog = catalog();
    let schema = to_json_schema(accounts(&catalog), &JsonSchemaOptions::default());
    let value = serde_json::to_value(&schema).unwrap();
    let properties = &value["properties"];

    assert_eq!(value["description"], "user accounts");
    assert_eq!(properties["id"]["minimum"], 0);
    assert_eq!(properties["handle"]["maxLength"], 32);
    assert_eq!(properties["balance"]["minimum"], 0);
    assert_eq!(properties["balance"]["maximum"], 999999.99);
    assert_eq!(properties["ratio"]["minimum"], -999.999);
    assert_eq!(properties["joined"]["pattern"], r"^\d{1,4}$");
    assert_eq!(properties["tier"]["enum"], serde_json::json!(["free", "pro"]));
    assert_eq!(properties["active"]["type"], "boolean");
    assert_eq!(properties["active"]["default"], true);
    assert_eq!(properties["bio"]["maxLength"], 65535);
    assert_eq!(
        schema.required,
        ["id", "handle", "flags", "active"]
    );
}

#[test]
fn test_set_pattern_accepts_ordered_subsets() {
    let catalog = catalog();
    let schema = to_json_schema(accounts(&catalog), &JsonSchemaOptions::default());
    let value = serde_json::to_value(&schema).unwrap();
    let pattern = Regex::new(value["properties"]["flags"]["pattern"].as_str().unwrap()).unwrap();

    for accepted in ["", "admin", "staff", "beta", "admin,staff", "admin,beta", "staff,beta", "admin,staff,beta"] {
        assert!(pattern.is_match(accepted), "{accepted:?} should match");
    }
    for rejected in ["staff,admin", "admin,admin", "admin,", ",admin", "root", "admin,staff,beta,beta"] {
        assert!(!pattern.is_match(rejected), "{rejected:?} should not match");
    }
}

#[test]
fn test_catalog_json_schemas_follow_table_order() {
    let catalog = catalog();
    let titles: Vec<String> = catalog
        .json_schemas(&JsonSchemaOptions::default().with_use_ref(true))
        .into_iter()
        .map(|schema| schema.title)
        .collect();
    assert_eq!(titles, ["accounts", "sessions"]);
}

// =============================================================================
// Document schema
// =============================================================================

#[test]
fn test_document_schema_roles() {
    let catalog = catalog();
    let sessions = to_document_schema(catalog.table("sessions").unwrap());

    let id = &sessions.columns["id"];
    assert_eq!(id.primary, Some(true));
    assert_eq!(id.unique, Some(true));
    assert_eq!(id.max_length, Some(36));

    let account = &sessions.columns["account"];
    assert_eq!(account.kind, DocumentType::Number);
    assert_eq!(account.reference_table.as_deref(), Some("accounts"));
    assert_eq!(account.index, Some(true));
    let reference = account.reference.as_ref().unwrap();
    assert_eq!(reference.local_field, "account");
    assert_eq!(reference.foreign_field, "id");

    let started = &sessions.columns["started"];
    assert_eq!(started.kind, DocumentType::String);
    assert_eq!(started.format, None);
    assert_eq!(started.pattern, None);

    let accounts = to_document_schema(accounts(&catalog));
    assert_eq!(accounts.description.as_deref(), Some("user accounts"));
    assert_eq!(accounts.columns["handle"].unique, Some(true));
    assert_eq!(accounts.columns["handle"].primary, None);
    assert_eq!(catalog.document_schemas().len(), 2);
}
