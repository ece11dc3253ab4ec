use weathersink::db::ddl;
use weathersink::db::schema::{ColumnSpec, IndexSpec, TableSchema, TableTarget};

fn col(name: &str, ty: &str) -> ColumnSpec {
    ColumnSpec {
        name: name.to_string(),
        column_type: ty.to_string(),
        primary_key: false,
        nullable: true,
        default: None,
    }
}

#[test]
fn one_clause_per_column_in_declaration_order() {
    let schema = TableSchema {
        columns: vec![col("b", "VARCHAR"), col("a", "FLOAT"), col("c", "INT")],
        indexes: vec![],
    };
    let clauses = ddl::column_definitions(&schema);
    assert_eq!(clauses, vec!["b VARCHAR", "a FLOAT", "c INT"]);
}

#[test]
fn primary_key_supersedes_not_null() {
    let schema = TableSchema {
        columns: vec![ColumnSpec {
            nullable: false,
            primary_key: true,
            ..col("id", "SERIAL")
        }],
        indexes: vec![],
    };
    let clauses = ddl::column_definitions(&schema);
    assert_eq!(clauses, vec!["id SERIAL PRIMARY KEY"]);
    assert!(!clauses[0].contains("NOT NULL"));
}

#[test]
fn explicit_not_null_and_default_literal_verbatim() {
    let schema = TableSchema {
        columns: vec![
            ColumnSpec {
                nullable: false,
                ..col("retries", "INT")
            },
            ColumnSpec {
                default: Some("'unknown'".to_string()),
                ..col("source", "VARCHAR")
            },
        ],
        indexes: vec![],
    };
    let clauses = ddl::column_definitions(&schema);
    assert_eq!(clauses[0], "retries INT NOT NULL");
    assert_eq!(clauses[1], "source VARCHAR DEFAULT 'unknown'");
}

#[test]
fn create_table_joins_clauses_with_comma_space() {
    let target = TableTarget::new("source", "weather_data");
    let schema = TableSchema {
        columns: vec![col("a", "INT"), col("b", "VARCHAR")],
        indexes: vec![],
    };
    assert_eq!(
        ddl::create_table(&target, &schema),
        "CREATE TABLE IF NOT EXISTS source.weather_data (a INT, b VARCHAR)"
    );
}

#[test]
fn all_ddl_statements_are_create_if_not_exists() {
    let target = TableTarget::new("staging", "obs");
    let index = IndexSpec {
        name: "idx_obs_at".to_string(),
        columns: vec!["inserted_at".to_string(), "location_name".to_string()],
    };
    assert_eq!(
        ddl::create_schema("staging"),
        "CREATE SCHEMA IF NOT EXISTS staging"
    );
    assert_eq!(
        ddl::create_index(&target, &index),
        "CREATE INDEX IF NOT EXISTS idx_obs_at ON staging.obs (inserted_at, location_name)"
    );
}
