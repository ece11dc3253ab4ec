//! Declarative table schemas loaded from YAML files.
//!
//! One file per (layer, table), with a required ordered `columns` list and
//! an optional ordered `indexes` list. Schemas are constructed once from
//! configuration and read-only thereafter.

use crate::error::SinkError;
use figment::Figment;
use figment::providers::{Format, Yaml};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// (layer, table) pair identifying one relation. `layer` is the namespace
/// grouping tables by medallion stage (source, staging, mart).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableTarget {
    pub layer: String,
    pub table: String,
}

impl TableTarget {
    pub fn new(layer: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            layer: layer.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.layer, self.table)
    }
}

/// One column as declared in a schema file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Emitted verbatim into the DEFAULT clause; the schema author supplies
    /// a store-safe literal.
    #[serde(default)]
    pub default: Option<String>,
}

fn default_nullable() -> bool {
    true
}

impl ColumnSpec {
    /// SERIAL-family columns are store-populated and never bound explicitly.
    pub fn is_generated(&self) -> bool {
        matches!(
            self.column_type.to_ascii_uppercase().as_str(),
            "SERIAL" | "SMALLSERIAL" | "BIGSERIAL"
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndexSpec {
    pub name: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub indexes: Vec<IndexSpec>,
}

impl TableSchema {
    /// Load `<dir>/<layer>/<table>.yaml` and validate it.
    pub fn load(dir: &Path, target: &TableTarget) -> Result<Self, SinkError> {
        let path = dir
            .join(&target.layer)
            .join(format!("{}.yaml", target.table));
        if !path.is_file() {
            return Err(SinkError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("schema file {} not found", path.display()),
            )));
        }
        let schema: TableSchema = Figment::from(Yaml::file(&path)).extract()?;
        schema.validate()?;
        Ok(schema)
    }

    /// Reject schemas without a `columns` list or with duplicate names.
    pub fn validate(&self) -> Result<(), SinkError> {
        if self.columns.is_empty() {
            return Err(SinkError::missing("columns"));
        }
        let mut seen = HashSet::new();
        for col in &self.columns {
            if !seen.insert(col.name.as_str()) {
                return Err(SinkError::InvalidSchema(format!(
                    "duplicate column `{}`",
                    col.name
                )));
            }
        }
        Ok(())
    }

    /// Ordered names of the columns a writer may bind explicitly.
    pub fn insertable_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| !c.is_generated())
            .map(|c| c.name.as_str())
            .collect()
    }
}
