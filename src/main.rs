use std::{path::Path, sync::Arc};

use anyhow::Context;
use migration::MigratorTrait;
use sea_orm::Database;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt::SubscriberBuilder, prelude::*};

use yoga_progress::{
    YogaProgressResult, config::Config, engine::ProgressEngine, run_poem, storage::SeaOrmStore,
};

#[tokio::main]
async fn main() -> YogaProgressResult<()> {
    // Load environment variables from .env files
    if Path::new(".env.local").exists() {
        dotenvy::from_filename(".env.local")?;
    } else if Path::new(".env").exists() {
        dotenvy::from_filename(".env")?;
    };
    // Respect RUST_LOG if set, default to info for our crate and warn for deps.
    let default_filter = format!(
        "{}=info,poem=info,sea_orm=warn,sqlx=warn",
        env!("CARGO_CRATE_NAME")
    );
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .with_level(true)
        .pretty()
        .finish()
        .with(ErrorLayer::default())
        .init();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting yoga progress service"
    );
    let config = Config::load()?;
    if let Err(e) = config.validate() {
        return Err(anyhow::anyhow!(e));
    }

    let db_conn = Database::connect(&config.db_connection_string)
        .await
        .with_context(|| "Failed to connect to database")?;

    migration::Migrator::up(&db_conn, None)
        .await
        .with_context(|| "Failed to run database migrations")?;

    let store = Arc::new(SeaOrmStore::new(db_conn));
    let engine = ProgressEngine::new(store.clone(), store, config.transition_policy);
    tracing::info!(policy = ?config.transition_policy, "configured progress engine");

    run_poem(Arc::new(engine), Arc::new(config)).await?;
    Ok(())
}
