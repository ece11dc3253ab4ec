//! Translation from declarative schemas to Postgres DDL.
//!
//! Every statement is CREATE ... IF NOT EXISTS, so provisioning stays
//! idempotent across runs.

use super::schema::{IndexSpec, TableSchema, TableTarget};

/// One definition clause per column, in declaration order. A primary-key
/// marker supersedes nullability; DEFAULT literals are emitted as given.
pub fn column_definitions(schema: &TableSchema) -> Vec<String> {
    schema
        .columns
        .iter()
        .map(|col| {
            let mut def = format!("{} {}", col.name, col.column_type);
            if col.primary_key {
                def.push_str(" PRIMARY KEY");
            } else if !col.nullable {
                def.push_str(" NOT NULL");
            }
            if let Some(default) = &col.default {
                def.push_str(" DEFAULT ");
                def.push_str(default);
            }
            def
        })
        .collect()
}

pub fn create_schema(layer: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {layer}")
}

pub fn create_table(target: &TableTarget, schema: &TableSchema) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {target} ({})",
        column_definitions(schema).join(", ")
    )
}

pub fn create_index(target: &TableTarget, index: &IndexSpec) -> String {
    format!(
        "CREATE INDEX IF NOT EXISTS {} ON {target} ({})",
        index.name,
        index.columns.join(", ")
    )
}
