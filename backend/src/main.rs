//! Backend entry-point: loads settings, prepares the database and serves the
//! places API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroizing;

use places_backend::inbound::http::health::HealthState;
use places_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use places_backend::settings::AppSettings;
use server::{ServerConfig, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("loading settings")?;
    let bind_addr = settings.bind_addr()?;
    let database_url = settings.require_database_url()?;

    let secret_path = settings.token_secret_file();
    let token_secret = Zeroizing::new(
        std::fs::read(secret_path)
            .wrap_err_with(|| format!("reading token secret at {}", secret_path.display()))?,
    );

    let applied = run_pending_migrations(database_url)
        .await
        .wrap_err("applying database migrations")?;
    info!(applied, "database schema up to date");

    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .wrap_err("building database pool")?;

    let http_state = build_http_state(&settings, &pool, &token_secret)?;
    let config = ServerConfig::new(bind_addr, settings.upload_dir().to_path_buf(), http_state);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)
        .wrap_err_with(|| format!("binding {bind_addr}"))?;
    info!(%bind_addr, "places API listening");

    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}
