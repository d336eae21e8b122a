use anyhow::Result;
use redis::AsyncCommands;
use uuid::Uuid;

/// Redis-backed session state: refresh tokens and the access-token blocklist.
pub struct AuthRepository;

impl AuthRepository {
    pub async fn store_refresh_token(
        redis: &mut redis::aio::MultiplexedConnection,
        user_id: Uuid,
        refresh_token: &str,
        ttl_seconds: u64,
    ) -> Result<()> {
        let key = format!("refresh_token:{}", user_id);
        let _: () = redis.set_ex(key, refresh_token, ttl_seconds).await?;
        Ok(())
    }

    pub async fn get_refresh_token(
        redis: &mut redis::aio::MultiplexedConnection,
        user_id: Uuid,
    ) -> Result<Option<String>> {
        let key = format!("refresh_token:{}", user_id);
        let token: Option<String> = redis.get(key).await?;
        Ok(token)
    }

    pub async fn delete_refresh_token(
        redis: &mut redis::aio::MultiplexedConnection,
        user_id: Uuid,
    ) -> Result<()> {
        let key = format!("refresh_token:{}", user_id);
        let _: () = redis.del(key).await?;
        Ok(())
    }

    pub async fn block_token(
        redis: &mut redis::aio::MultiplexedConnection,
        token: &str,
        ttl_seconds: u64,
    ) -> Result<()> {
        let key = format!("blocked_token:{}", token);
        let _: () = redis.set_ex(key, "blocked", ttl_seconds).await?;
        Ok(())
    }

    pub async fn is_token_blocked(
        redis: &mut redis::aio::MultiplexedConnection,
        token: &str,
    ) -> Result<bool> {
        let blocked: bool = redis.exists(format!("blocked_token:{}", token)).await?;
        Ok(blocked)
    }
}
