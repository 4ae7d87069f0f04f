//! End-to-end scenarios for table construction and mutation.
//!
//! Each scenario builds a table from DDL text, mutates it through the public
//! `Table` API and checks the resulting columns and keys.

use ddl_schema_rs::model::{Datatype, DatatypeKind, UniqueKey};
use ddl_schema_rs::sql::tree::Position;
use ddl_schema_rs::{
    Catalog, CatalogOptions, Column, Error, ReferenceError, ReferencePolicy, Table, parse,
};

// =============================================================================
// Helper functions
// =============================================================================

fn build(sql: &str) -> Table {
    let statements = parse(sql).expect("Failed to parse SQL");
    Table::from_common_def(&statements[0]).expect("Failed to build table")
}

fn column_names(table: &Table) -> Vec<&str> {
    table.columns().iter().map(|c| c.name.as_str()).collect()
}

fn key_columns(key: &UniqueKey) -> Vec<&str> {
    key.columns.iter().map(|c| c.column.as_str()).collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_inline_primary_key_only() {
    let table = build("CREATE TABLE t (id INT PRIMARY KEY, name VARCHAR(50))");

    let key = table.primary_key().expect("primary key");
    assert_eq!(key.columns.len(), 1);
    assert_eq!(key.columns[0].column, "id");
    assert!(table.foreign_keys().is_empty());
    assert!(table.unique_keys().is_empty());

    let name = table.get_column("name").unwrap();
    assert_eq!(name.datatype.datatype, DatatypeKind::Varchar);
    assert_eq!(name.datatype.length, Some(50));
}

#[test]
fn test_drop_primary_key_column() {
    let mut table = build("CREATE TABLE t (id INT PRIMARY KEY, name VARCHAR(50))");
    table.drop_column("id").unwrap();

    assert!(table.primary_key().is_none());
    assert_eq!(column_names(&table), ["name"]);
}

#[test]
fn test_drop_column_shrinks_composite_unique_key() {
    let mut table = build("CREATE TABLE t (a INT, b INT)");
    table
        .push_unique_key(UniqueKey::on_columns(["a", "b"]).named("uk_ab"))
        .unwrap();
    table.drop_column("a").unwrap();

    let key = table.unique_keys().first().expect("unique key kept");
    assert_eq!(key.name.as_deref(), Some("uk_ab"));
    assert_eq!(key_columns(key), ["b"]);
}

#[test]
fn test_drop_column_removes_emptied_unique_key() {
    let mut table = build("CREATE TABLE t (a INT, b INT)");
    table
        .push_unique_key(UniqueKey::on_columns(["a"]).named("uk_ab"))
        .unwrap();
    table.drop_column("a").unwrap();

    assert!(table.unique_keys().is_empty());
    assert!(table.get_index("uk_ab").is_none());
}

#[test]
fn test_add_column_after_unknown_is_a_no_op() {
    let mut table = build("CREATE TABLE t (a INT, b INT)");
    let before = table.clone();

    let result = table.add_column(
        Column::new("c", Datatype::int(4)),
        Some(&Position::after("nonexistent")),
    );
    assert_eq!(ReferencePolicy::Lenient.absorb(result), Ok(()));
    assert_eq!(table, before);

    let mut catalog = Catalog::new();
    catalog
        .feed("CREATE TABLE t (a INT, b INT); ALTER TABLE t ADD COLUMN c INT AFTER nonexistent;")
        .expect("lenient catalog absorbs the miss");
    assert_eq!(column_names(catalog.table("t").unwrap()), ["a", "b"]);
}

#[test]
fn test_like_without_source_produces_nothing() {
    let registry = vec![build("CREATE TABLE a (id INT)")];
    let statements = parse("CREATE TABLE b LIKE missing").unwrap();

    let table = Table::from_like_def(&statements[0], &registry).unwrap();
    assert!(table.is_none());
    assert_eq!(registry.len(), 1);
    assert_eq!(registry[0].name(), "a");
}

// =============================================================================
// Invariants
// =============================================================================

#[test]
fn test_no_dangling_references_after_drops() {
    let mut table = build(
        "CREATE TABLE orders (
            id INT NOT NULL,
            customer INT NOT NULL,
            placed DATETIME,
            note TEXT,
            shape GEOMETRY NOT NULL,
            PRIMARY KEY (id, customer),
            UNIQUE KEY uk_customer_placed (customer, placed),
            KEY idx_placed (placed),
            FULLTEXT KEY ft_note (note),
            SPATIAL KEY sp_shape (shape),
            CONSTRAINT fk_customer FOREIGN KEY (customer) REFERENCES customers (id)
        )",
    );

    for column in ["customer", "placed", "note", "shape"] {
        table.drop_column(column).unwrap();
        let remaining: Vec<&str> = column_names(&table);
        let referenced = table
            .primary_key()
            .into_iter()
            .flat_map(|k| k.columns.iter())
            .chain(table.unique_keys().iter().flat_map(|k| k.columns.iter()))
            .chain(table.indexes().iter().flat_map(|k| k.columns.iter()))
            .chain(table.fulltext_indexes().iter().flat_map(|k| k.columns.iter()))
            .chain(table.spatial_indexes().iter().flat_map(|k| k.columns.iter()))
            .chain(table.foreign_keys().iter().flat_map(|k| k.columns.iter()));
        for part in referenced {
            assert!(remaining.contains(&part.column.as_str()), "{} dangles", part.column);
        }
    }

    assert_eq!(column_names(&table), ["id"]);
    assert_eq!(table.primary_key().unwrap().columns.len(), 1);
    assert!(table.unique_keys().is_empty());
    assert!(table.indexes().is_empty());
    assert!(table.fulltext_indexes().is_empty());
    assert!(table.spatial_indexes().is_empty());
    assert!(table.foreign_keys().is_empty());
}

#[test]
fn test_inline_primary_key_replaces_previous() {
    let mut table = build("CREATE TABLE t (a INT PRIMARY KEY, b INT)");
    table
        .add_column(Column::new("c", Datatype::int(8)).inline_primary_key(), None)
        .unwrap();

    let key = table.primary_key().unwrap();
    assert_eq!(key.columns.len(), 1);
    assert_eq!(key.columns[0].column, "c");
}

#[test]
fn test_reposition_preserves_relative_order() {
    let mut table = build("CREATE TABLE t (a INT, b INT, c INT, d INT, e INT)");
    table.move_column("b", &Position::after("d")).unwrap();
    assert_eq!(column_names(&table), ["a", "c", "d", "b", "e"]);
    table.move_column("e", &Position::first()).unwrap();
    assert_eq!(column_names(&table), ["e", "a", "c", "d", "b"]);
}

#[test]
fn test_clone_is_independent() {
    let mut catalog = Catalog::new();
    catalog
        .feed(
            "CREATE TABLE a (id INT PRIMARY KEY, v INT, KEY k (v));
             CREATE TABLE b LIKE a;
             ALTER TABLE b DROP COLUMN v, ADD COLUMN w INT;",
        )
        .unwrap();

    let a = catalog.table("a").unwrap();
    let b = catalog.table("b").unwrap();
    assert_eq!(column_names(a), ["id", "v"]);
    assert_eq!(a.indexes().len(), 1);
    assert_eq!(column_names(b), ["id", "w"]);
    assert!(b.indexes().is_empty());
    assert_eq!(b.primary_key(), a.primary_key());
}

#[test]
fn test_strict_policy_surfaces_misses() {
    let mut catalog =
        Catalog::with_options(CatalogOptions::default().with_policy(ReferencePolicy::Strict));
    catalog.feed("CREATE TABLE t (a INT)").unwrap();

    let error = catalog
        .feed("ALTER TABLE t MODIFY a BIGINT AFTER ghost")
        .unwrap_err();
    assert!(matches!(
        error,
        Error::Reference(ReferenceError::UnknownColumn { ref column, .. }) if column == "ghost"
    ));
    assert_eq!(
        catalog.table("t").unwrap().get_column("a").unwrap().datatype.width,
        Some(4)
    );
}

#[test]
fn test_contract_violation_is_always_surfaced() {
    let statements = parse("ALTER TABLE t ADD COLUMN a INT").unwrap();
    assert!(matches!(
        Table::from_common_def(&statements[0]),
        Err(Error::UnexpectedNode { .. })
    ));
    assert!(matches!(
        Table::from_like_def(&statements[0], &Vec::<Table>::new()),
        Err(Error::UnexpectedNode { .. })
    ));
}
