//! Backend entry-point: loads settings, picks the entity store and serves
//! the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::WrapErr;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServerSettings, create_server};
use taskboard::inbound::http::health::HealthState;
use taskboard::inbound::http::session_config::{BuildMode, SessionSettings};
use taskboard::outbound::persistence::{DbPool, run_migrations};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().wrap_err("loading server settings")?;
    let session = SessionSettings::from_env(&DefaultEnv::new(), BuildMode::current())
        .wrap_err("loading session settings")?;
    let bind_addr = settings.bind_addr().wrap_err("parsing TASKBOARD_BIND_ADDR")?;
    let mut config = ServerConfig::new(session, bind_addr);

    if let Some(pool_config) = settings.pool_config() {
        if settings.run_migrations() {
            run_migrations(pool_config.database_url())
                .await
                .wrap_err("running database migrations")?;
        }
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("creating database pool")?;
        config = config.with_db_pool(pool);
    } else {
        warn!("TASKBOARD_DATABASE_URL not set; using the in-memory store");
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, &config)?;
    info!(addr = %config.bind_addr(), "listening");
    server.await?;
    Ok(())
}
