use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use weathersink::db::schema::{ColumnSpec, TableSchema, TableTarget};
use weathersink::error::SinkError;

fn temp_schema_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "weathersink-schema-{}-{}",
        std::process::id(),
        nanos
    ))
}

fn write_schema(dir: &Path, layer: &str, table: &str, contents: &str) {
    let layer_dir = dir.join(layer);
    fs::create_dir_all(&layer_dir).expect("failed to create schema dir");
    fs::write(layer_dir.join(format!("{table}.yaml")), contents).expect("failed to write schema");
}

#[test]
fn schema_file_roundtrip() {
    let dir = temp_schema_dir();
    write_schema(
        &dir,
        "source",
        "obs",
        r#"
columns:
  - name: id
    type: SERIAL
    primary_key: true
  - name: temp
    type: FLOAT
    nullable: false
  - name: note
    type: VARCHAR
    default: "'n/a'"
indexes:
  - name: idx_obs_temp
    columns: [temp]
"#,
    );

    let schema = TableSchema::load(&dir, &TableTarget::new("source", "obs")).unwrap();
    assert_eq!(schema.columns.len(), 3);
    assert_eq!(schema.columns[0].name, "id");
    assert!(schema.columns[0].primary_key);
    assert!(schema.columns[0].is_generated());
    assert!(!schema.columns[1].nullable);
    assert_eq!(schema.columns[2].default.as_deref(), Some("'n/a'"));
    assert_eq!(schema.indexes.len(), 1);
    assert_eq!(schema.indexes[0].columns, vec!["temp"]);
    assert_eq!(schema.insertable_columns(), vec!["temp", "note"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_columns_key_is_rejected() {
    let dir = temp_schema_dir();
    write_schema(&dir, "source", "empty", "indexes: []\n");

    let err = TableSchema::load(&dir, &TableTarget::new("source", "empty")).unwrap_err();
    assert!(matches!(err, SinkError::MissingKey { path } if path == "columns"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn absent_schema_file_is_an_io_error() {
    let dir = temp_schema_dir();
    let err = TableSchema::load(&dir, &TableTarget::new("source", "nowhere")).unwrap_err();
    assert!(matches!(err, SinkError::Io(_)));
}

#[test]
fn duplicate_column_names_are_rejected() {
    let dup = ColumnSpec {
        name: "a".to_string(),
        column_type: "INT".to_string(),
        primary_key: false,
        nullable: true,
        default: None,
    };
    let schema = TableSchema {
        columns: vec![dup.clone(), dup],
        indexes: vec![],
    };
    assert!(matches!(
        schema.validate(),
        Err(SinkError::InvalidSchema(_))
    ));
}

#[test]
fn shipped_weather_schema_loads() {
    let schema = TableSchema::load(
        Path::new("config/schemas"),
        &TableTarget::new("source", "weather_data"),
    )
    .unwrap();

    assert_eq!(schema.columns.len(), 46);
    assert_eq!(schema.columns[0].name, "id");
    assert!(schema.columns[0].is_generated());
    // Every flattened field has a column; id is the only generated one.
    assert_eq!(schema.insertable_columns().len(), 45);
    assert_eq!(schema.indexes.len(), 2);
}
