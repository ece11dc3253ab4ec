use crate::error::SinkError;
use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;
use url::Url;

/// Which fetch path a run uses. Selected by configuration before the run
/// starts, never as a runtime fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    Live,
    Mock,
}

impl FetchMode {
    /// Tag written into every row's `data_source` column.
    pub fn data_source(self) -> &'static str {
        match self {
            FetchMode::Live => "weatherstack_api",
            FetchMode::Mock => "mock_api",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub postgres_host: String,
    pub postgres_db: String,
    pub postgres_user: String,
    pub postgres_password: String,
    pub postgres_port: u16,

    /// Access credential for the live weather API; required when
    /// `fetch_mode` is `live`.
    pub weather_api_key: Option<String>,
    pub weather_api_url: Url,
    pub weather_query: String,
    pub fetch_mode: FetchMode,

    pub layer: String,
    pub table: String,
    /// Root of the schema files; one `<layer>/<table>.yaml` per target.
    pub schema_dir: PathBuf,

    pub fetch_timeout_secs: u64,
    /// Pipeline step policy. Retries default to zero because the external
    /// scheduler owns retry; see service::pipeline.
    pub step_timeout_secs: u64,
    pub step_retries: usize,

    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            postgres_host: "db".to_string(),
            postgres_db: "db".to_string(),
            postgres_user: "user".to_string(),
            postgres_password: "password".to_string(),
            postgres_port: 5432,
            weather_api_key: None,
            weather_api_url: Url::parse("http://api.weatherstack.com/current")
                .expect("default weather API URL must parse"),
            weather_query: "New York".to_string(),
            fetch_mode: FetchMode::Live,
            layer: "source".to_string(),
            table: "weather_data".to_string(),
            schema_dir: PathBuf::from("config/schemas"),
            fetch_timeout_secs: 10,
            step_timeout_secs: 900,
            step_retries: 0,
            loglevel: "info".to_string(),
        }
    }
}

impl Config {
    /// Resolve the configuration from process environment variables merged
    /// over the documented defaults.
    pub fn from_env() -> Result<Self, SinkError> {
        let cfg = Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(&[
                "postgres_host",
                "postgres_db",
                "postgres_user",
                "postgres_password",
                "postgres_port",
                "weather_api_key",
                "weather_api_url",
                "weather_query",
                "fetch_mode",
                "layer",
                "table",
                "schema_dir",
                "fetch_timeout_secs",
                "step_timeout_secs",
                "step_retries",
                "loglevel",
            ]))
            .extract()?;
        Ok(cfg)
    }

    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.postgres_user,
            self.postgres_password,
            self.postgres_host,
            self.postgres_port,
            self.postgres_db
        )
    }

    /// Live fetch requires an access credential.
    pub fn require_api_key(&self) -> Result<&str, SinkError> {
        self.weather_api_key.as_deref().ok_or_else(|| {
            SinkError::Config(figment::Error::from(
                "WEATHER_API_KEY is required when FETCH_MODE=live".to_string(),
            ))
        })
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().unwrap_or_else(|e| panic!("FATAL: invalid configuration: {e}"))
});
