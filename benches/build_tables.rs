//! Benchmark measuring parse and build throughput for DDL scripts.
//!
//! Three stages are timed separately on the same generated script:
//! 1. `parse`: SQL text to parse-tree statements
//! 2. `apply`: statements to a populated `Catalog`
//! 3. `project`: JSON Schema and document schema of every table
//!
//! Script sizes: 10, 100 and 500 tables, each followed by an `ALTER TABLE`.

use std::fmt::Write;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ddl_schema_rs::format::{JsonSchemaOptions, to_document_schema, to_json_schema};
use ddl_schema_rs::{Catalog, parse};

const SIZES: [usize; 3] = [10, 100, 500];

/// One `CREATE TABLE` plus one `ALTER TABLE` per table, each table pointing
/// a foreign key at the previous one.
fn script(tables: usize) -> String {
    let mut sql = String::new();
    for i in 0..tables {
        let parent = i.saturating_sub(1);
        write!(
            sql,
            "CREATE TABLE t{i} (
                id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
                parent_id BIGINT UNSIGNED,
                name VARCHAR(120) NOT NULL DEFAULT '',
                status ENUM('new', 'active', 'closed') NOT NULL,
                tags SET('a', 'b', 'c', 'd'),
                price DECIMAL(10,2) UNSIGNED,
                created DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                body TEXT,
                PRIMARY KEY (id),
                UNIQUE KEY uk_name (name),
                KEY idx_parent (parent_id),
                FULLTEXT KEY ft_body (body),
                CONSTRAINT fk_t{i}_parent FOREIGN KEY (parent_id) REFERENCES t{parent} (id) ON DELETE SET NULL
            ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;
            ALTER TABLE t{i} ADD COLUMN updated TIMESTAMP NULL AFTER created, DROP INDEX ft_body, MODIFY body MEDIUMTEXT;\n"
        )
        .unwrap();
    }
    sql
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for size in SIZES {
        let sql = script(size);
        group.throughput(Throughput::Bytes(sql.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &sql, |b, sql| {
            b.iter(|| parse(black_box(sql)).unwrap());
        });
    }
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");
    for size in SIZES {
        let statements = parse(&script(size)).unwrap();
        group.throughput(Throughput::Elements(statements.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &statements,
            |b, statements| {
                b.iter(|| {
                    let mut catalog = Catalog::new();
                    for statement in statements {
                        catalog.apply(black_box(statement)).unwrap();
                    }
                    catalog
                });
            },
        );
    }
    group.finish();
}

fn bench_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("project");
    let options = JsonSchemaOptions::default();
    for size in SIZES {
        let catalog = Catalog::from_sql(&script(size)).unwrap();
        group.throughput(Throughput::Elements(catalog.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &catalog, |b, catalog| {
            b.iter(|| {
                for table in catalog.tables() {
                    black_box(to_json_schema(table, &options));
                    black_box(to_document_schema(table));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_apply, bench_project);
criterion_main!(benches);
