use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod middleware;
mod modules;
mod routes;
mod state;
mod workers;

use crate::config::settings::AppConfig;
use crate::infrastructure::db::pool::connect_to_db;
use crate::infrastructure::mail::provider::ResendProvider;
use crate::infrastructure::mail::service::MailService;
use crate::infrastructure::queue::redis::RedisDelayedQueue;
use crate::infrastructure::redis::client::RedisService;
use crate::infrastructure::storage::s3::StorageService;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    info!("Starting server...");
    modules::health::handler::mark_started();

    let config = AppConfig::new()?;

    let db = connect_to_db(&config.database_url).await?;
    let redis = RedisService::new(&config.redis_url).await?;
    let storage = StorageService::new(
        &config.storage_endpoint,
        &config.storage_bucket,
        &config.storage_access_key,
        &config.storage_secret_key,
    )
    .await;

    let queue = Arc::new(RedisDelayedQueue::new(redis.clone()));
    let provider = Arc::new(ResendProvider::new(config.resend_api_key.clone()));
    let mailer = MailService::new(
        provider,
        config.mail_from.clone(),
        config.frontend_url.clone(),
    );

    let state = AppState::new(config, db, redis, storage, queue, mailer);

    tokio::spawn(workers::mailer::start_mailer_worker(state.clone()));

    let app = app::create_app(state.clone()).await;

    let addr = format!("0.0.0.0:{}", state.config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
