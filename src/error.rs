use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SinkError {
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("missing expected field `{path}`")]
    MissingKey { path: String },

    #[error("failed to connect to the store: {0}")]
    Connection(#[source] SqlxError),

    #[error("provisioning {target} failed: {source}")]
    Provisioning {
        target: String,
        #[source]
        source: SqlxError,
    },

    #[error("record shares no columns with the schema of {target}")]
    NoValidColumns { target: String },

    #[error(
        "insert into {target} failed (record keys: [{record_keys}], schema columns: [{schema_columns}]): {source}"
    )]
    Insert {
        target: String,
        record_keys: String,
        schema_columns: String,
        #[source]
        source: SqlxError,
    },

    #[error("weather fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("step `{step}` exceeded its {seconds}s timeout")]
    StepTimeout { step: &'static str, seconds: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SinkError {
    /// Build a `MissingKey` for the given dotted path.
    pub fn missing(path: impl Into<String>) -> Self {
        SinkError::MissingKey { path: path.into() }
    }
}
