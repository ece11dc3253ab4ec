//! Store boundary: declarative schemas, DDL translation, and the Postgres
//! provisioner/writer.
//!
//! Layout:
//! - `schema.rs`: schema file definitions, loading, and validation
//! - `ddl.rs`: schema -> CREATE statement translation
//! - `postgres.rs`: connection lifecycle, provisioning, record writer

pub mod ddl;
pub mod postgres;
pub mod schema;

pub use schema::{ColumnSpec, IndexSpec, TableSchema, TableTarget};
