//! Run coordinator: an ordered pipeline of named steps, each executed under
//! its own timeout/retry policy. This replaces the external scheduler's
//! task chain for local runs; scheduled deployments keep retries at zero
//! and let the scheduler re-invoke the whole run.

use crate::api::weatherstack::{self, WeatherApi};
use crate::config::{Config, FetchMode};
use crate::db::postgres;
use crate::db::schema::{TableSchema, TableTarget};
use crate::error::SinkError;
use crate::service::flatten;
use crate::types::record::FlatRecord;
use backon::{BackoffBuilder, ExponentialBuilder};
use chrono::Utc;
use sqlx::{Connection, PgConnection};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Per-step execution policy.
#[derive(Debug, Clone, Copy)]
pub struct StepPolicy {
    pub timeout: Duration,
    pub retries: usize,
}

impl StepPolicy {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(cfg.step_timeout_secs),
            retries: cfg.step_retries,
        }
    }
}

/// Run `op` under `policy`. Each attempt is bounded by the step timeout;
/// exhausting the retry budget propagates the last error.
pub async fn run_step<T, F>(
    name: &'static str,
    policy: StepPolicy,
    mut op: F,
) -> Result<T, SinkError>
where
    F: AsyncFnMut() -> Result<T, SinkError>,
{
    let mut delays = ExponentialBuilder::default()
        .with_min_delay(Duration::from_secs(1))
        .with_max_delay(Duration::from_secs(60))
        .with_max_times(policy.retries)
        .with_jitter()
        .build();
    let started = Instant::now();
    let mut attempt = 0usize;
    loop {
        attempt += 1;
        let outcome = match tokio::time::timeout(policy.timeout, op()).await {
            Ok(result) => result,
            Err(_) => Err(SinkError::StepTimeout {
                step: name,
                seconds: policy.timeout.as_secs(),
            }),
        };
        match outcome {
            Ok(value) => {
                info!(
                    step = name,
                    attempt,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "step completed"
                );
                return Ok(value);
            }
            Err(err) => match delays.next() {
                Some(delay) => {
                    warn!(step = name, attempt, error = %err, "step failed, retrying in {:?}", delay);
                    tokio::time::sleep(delay).await;
                }
                None => {
                    error!(
                        step = name,
                        attempt,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        error = %err,
                        "step failed"
                    );
                    return Err(err);
                }
            },
        }
    }
}

/// One complete ingestion run: fetch -> flatten -> provision -> write,
/// strictly in sequence. The store connection is opened once, owned by the
/// run, and closed on every exit path before the outcome propagates.
pub async fn run(cfg: &Config) -> Result<(), SinkError> {
    let target = TableTarget::new(&cfg.layer, &cfg.table);
    let policy = StepPolicy::from_config(cfg);
    info!(table = %target, mode = ?cfg.fetch_mode, "starting ingestion run");

    let schema = TableSchema::load(&cfg.schema_dir, &target)?;

    let api = match cfg.fetch_mode {
        FetchMode::Live => Some(WeatherApi::new(cfg)?),
        FetchMode::Mock => None,
    };
    let payload = run_step("fetch", policy, async || match &api {
        Some(api) => api.fetch_current().await,
        None => Ok(weatherstack::mock_observation()),
    })
    .await?;

    let record = run_step("flatten", policy, async || {
        flatten::flatten(&payload, Utc::now(), cfg.fetch_mode.data_source())
    })
    .await?;

    let mut conn = postgres::connect(cfg).await?;
    let outcome = store_steps(&mut conn, policy, &target, &schema, &record).await;
    if let Err(e) = conn.close().await {
        warn!(error = %e, "closing store connection failed");
    } else {
        info!("store connection closed");
    }
    outcome?;

    info!(table = %target, "ingestion run complete");
    Ok(())
}

async fn store_steps(
    conn: &mut PgConnection,
    policy: StepPolicy,
    target: &TableTarget,
    schema: &TableSchema,
    record: &FlatRecord,
) -> Result<(), SinkError> {
    run_step("provision", policy, async || {
        postgres::provision(&mut *conn, target, schema).await
    })
    .await?;
    run_step("write", policy, async || {
        postgres::insert_record(&mut *conn, target, schema, record).await
    })
    .await
}
