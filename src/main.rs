use mimalloc::MiMalloc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &*weathersink::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        layer = %cfg.layer,
        table = %cfg.table,
        mode = ?cfg.fetch_mode,
        host = %cfg.postgres_host,
        database = %cfg.postgres_db,
        loglevel = %cfg.loglevel,
        "weathersink starting"
    );

    // A nonzero exit is how the external scheduler observes run failure.
    if let Err(e) = weathersink::service::pipeline::run(cfg).await {
        error!(error = %e, "ingestion run failed");
        return Err(e.into());
    }
    Ok(())
}
