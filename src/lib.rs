//! Per-user progress tracking for yoga programs, lessons, practices and shorts.

pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod storage;

use std::sync::Arc;

use poem::{Server, listener::TcpListener};

use config::Config;
use engine::ProgressEngine;

pub type YogaProgressResult<T> = anyhow::Result<T>;

pub async fn run_poem(engine: Arc<ProgressEngine>, config: Arc<Config>) -> YogaProgressResult<()> {
    let bind_addr = config.bind_addr.clone();
    let route = api::build_route(engine, config);

    tracing::info!(%bind_addr, "starting HTTP server");
    Server::new(TcpListener::bind(bind_addr)).run(route).await?;
    Ok(())
}
