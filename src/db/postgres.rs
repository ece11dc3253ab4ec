//! Postgres boundary: connection lifecycle, idempotent provisioning, and
//! the transactional record writer.

use crate::config::Config;
use crate::db::ddl;
use crate::db::schema::{TableSchema, TableTarget};
use crate::error::SinkError;
use crate::types::record::{FieldValue, FlatRecord};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{Connection, PgConnection, Postgres};
use tracing::{error, info};

/// Open the run's exclusively-owned connection. Never pooled or shared;
/// the run coordinator closes it on every exit path.
pub async fn connect(cfg: &Config) -> Result<PgConnection, SinkError> {
    info!(
        host = %cfg.postgres_host,
        port = cfg.postgres_port,
        database = %cfg.postgres_db,
        "connecting to postgres"
    );
    PgConnection::connect(&cfg.database_url())
        .await
        .map_err(SinkError::Connection)
}

/// Ensure `target` exists with `schema`; safe to call on every run.
///
/// Namespace and table are created in one transaction, declared indexes in
/// a second with a single commit. A store error aborts the remaining DDL;
/// already-committed statements stay (IF NOT EXISTS makes re-runs safe).
pub async fn provision(
    conn: &mut PgConnection,
    target: &TableTarget,
    schema: &TableSchema,
) -> Result<(), SinkError> {
    info!(table = %target, "provisioning table");
    let ddl_err = |source: sqlx::Error| SinkError::Provisioning {
        target: target.to_string(),
        source,
    };

    let mut tx = conn.begin().await.map_err(ddl_err)?;
    sqlx::query(&ddl::create_schema(&target.layer))
        .execute(&mut *tx)
        .await
        .map_err(ddl_err)?;
    sqlx::query(&ddl::create_table(target, schema))
        .execute(&mut *tx)
        .await
        .map_err(ddl_err)?;
    tx.commit().await.map_err(ddl_err)?;

    if !schema.indexes.is_empty() {
        let mut tx = conn.begin().await.map_err(ddl_err)?;
        for index in &schema.indexes {
            sqlx::query(&ddl::create_index(target, index))
                .execute(&mut *tx)
                .await
                .map_err(ddl_err)?;
        }
        tx.commit().await.map_err(ddl_err)?;
        info!(table = %target, indexes = schema.indexes.len(), "indexes ensured");
    }

    info!(table = %target, "table provisioned");
    Ok(())
}

/// Build the insert statement and its positionally aligned values.
///
/// A single walk over the schema's insertable columns fixes both the column
/// list and the value order, so `columns[i]` always lines up with `$i+1`.
/// Record keys absent from the schema are ignored; a record sharing no
/// columns with the schema is rejected before the store is touched.
pub fn build_insert<'r>(
    target: &TableTarget,
    schema: &'r TableSchema,
    record: &'r FlatRecord,
) -> Result<(String, Vec<&'r FieldValue>), SinkError> {
    let mut columns = Vec::new();
    let mut values = Vec::new();
    for name in schema.insertable_columns() {
        if let Some(value) = record.get(name) {
            columns.push(name);
            values.push(value);
        }
    }
    if columns.is_empty() {
        return Err(SinkError::NoValidColumns {
            target: target.to_string(),
        });
    }

    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("${i}")).collect();
    let sql = format!(
        "INSERT INTO {target} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );
    Ok((sql, values))
}

/// Insert one flat record into `target` inside a transaction.
pub async fn insert_record(
    conn: &mut PgConnection,
    target: &TableTarget,
    schema: &TableSchema,
    record: &FlatRecord,
) -> Result<(), SinkError> {
    let (sql, values) = build_insert(target, schema, record)?;
    info!(table = %target, columns = values.len(), "inserting record");

    let mut tx = conn
        .begin()
        .await
        .map_err(|e| insert_error(target, schema, record, e))?;

    let mut query = sqlx::query(&sql);
    for value in &values {
        query = bind_value(query, value);
    }

    match query.execute(&mut *tx).await {
        Ok(_) => {
            tx.commit()
                .await
                .map_err(|e| insert_error(target, schema, record, e))?;
            info!(table = %target, "record inserted");
            Ok(())
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!(error = %rollback_err, "rollback failed after insert error");
            }
            Err(insert_error(target, schema, record, e))
        }
    }
}

fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &'q FieldValue,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        FieldValue::Text(s) => query.bind(s.as_str()),
        FieldValue::Float(v) => query.bind(*v),
        FieldValue::Int(v) => query.bind(*v),
        FieldValue::Timestamp(ts) => query.bind(*ts),
        FieldValue::Null => query.bind(Option::<String>::None),
    }
}

fn insert_error(
    target: &TableTarget,
    schema: &TableSchema,
    record: &FlatRecord,
    source: sqlx::Error,
) -> SinkError {
    let record_keys = record.keys().collect::<Vec<_>>().join(", ");
    let schema_columns = schema
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    error!(
        table = %target,
        error = %source,
        record_keys = %record_keys,
        schema_columns = %schema_columns,
        "insert failed, transaction rolled back"
    );
    SinkError::Insert {
        target: target.to_string(),
        record_keys,
        schema_columns,
        source,
    }
}
