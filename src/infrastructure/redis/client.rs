use redis::{Client, aio::MultiplexedConnection};
use tracing::info;

/// Shared Redis handle. Sessions, the token blocklist and the delayed-job
/// queue all go through here; connections are multiplexed, so handing out
/// one per call site is cheap.
#[derive(Clone)]
pub struct RedisService {
    client: Client,
}

impl RedisService {
    /// Opens the client and round-trips one connection so a bad URL fails
    /// at startup rather than on the first request.
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = Client::open(connection_string)?;
        let _conn = client.get_multiplexed_async_connection().await?;

        info!("✅ Connected to Redis");
        Ok(Self { client })
    }

    pub async fn get_conn(&self) -> Result<MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }
}
