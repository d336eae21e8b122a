use crate::config::env::{self, EnvKey};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub redis_url: String,
    pub storage_endpoint: String,
    pub storage_bucket: String,
    pub storage_access_key: String,
    pub storage_secret_key: String,
    pub jwt_secret: String,
    /// Missing key means mail runs in mock mode (log only).
    pub resend_api_key: Option<String>,
    pub mail_from: String,
    pub frontend_url: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            database_url: env::get(EnvKey::DatabaseUrl)?,
            redis_url: env::get(EnvKey::RedisUrl)?,
            storage_endpoint: env::get(EnvKey::StorageEndpoint)?,
            storage_bucket: env::get(EnvKey::StorageBucket)?,
            storage_access_key: env::get(EnvKey::StorageAccessKey)?,
            storage_secret_key: env::get(EnvKey::StorageSecretKey)?,
            jwt_secret: env::get(EnvKey::JwtSecret)?,
            resend_api_key: env::get_opt(EnvKey::ResendApiKey),
            mail_from: env::get_or(EnvKey::MailFrom, "onboarding@resend.dev"),
            frontend_url: env::get_or(EnvKey::FrontendUrl, "http://localhost:3000"),
        })
    }
}
