use std::path::Path;
use weathersink::config::{Config, FetchMode};

#[test]
fn defaults_match_the_documented_values() {
    let cfg = Config::default();
    assert_eq!(cfg.postgres_host, "db");
    assert_eq!(cfg.postgres_db, "db");
    assert_eq!(cfg.postgres_user, "user");
    assert_eq!(cfg.postgres_password, "password");
    assert_eq!(cfg.postgres_port, 5432);
    assert_eq!(cfg.layer, "source");
    assert_eq!(cfg.table, "weather_data");
    assert_eq!(cfg.schema_dir, Path::new("config/schemas"));
    assert_eq!(cfg.fetch_timeout_secs, 10);
    assert_eq!(cfg.step_timeout_secs, 900);
    assert_eq!(cfg.step_retries, 0);
    assert_eq!(cfg.fetch_mode, FetchMode::Live);
    assert!(cfg.weather_api_key.is_none());
}

#[test]
fn database_url_renders_the_connection_string() {
    let cfg = Config::default();
    assert_eq!(cfg.database_url(), "postgres://user:password@db:5432/db");
}

#[test]
fn live_mode_without_an_api_key_is_a_config_error() {
    let cfg = Config::default();
    assert!(cfg.require_api_key().is_err());

    let cfg = Config {
        weather_api_key: Some("k3y".to_string()),
        ..Config::default()
    };
    assert_eq!(cfg.require_api_key().unwrap(), "k3y");
}

#[test]
fn data_source_tag_follows_the_fetch_mode() {
    assert_eq!(FetchMode::Live.data_source(), "weatherstack_api");
    assert_eq!(FetchMode::Mock.data_source(), "mock_api");
}
