use super::job::{JobState, NewJob, QueuedJob};
use super::{CLAIM_TIMEOUT_MS, DelayedQueue, now_unix_ms};
use crate::infrastructure::redis::client::RedisService;
use anyhow::Result;
use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{error, warn};

/// Failed-final jobs are kept around for inspection before expiring.
const FAILED_JOB_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Redis-backed delayed queue.
///
/// Layout per queue: a sorted set `queue:{name}:delayed` scored by the
/// eligibility time in unix millis, a sorted set `queue:{name}:processing`
/// scored by the claim's visibility deadline, plus one JSON record per job
/// under `queue:{name}:job:{id}`. Claiming races on ZREM, so a due job goes
/// to exactly one consumer even with several dispatcher instances; claims
/// whose deadline lapses are swept back into the delayed set.
#[derive(Clone)]
pub struct RedisDelayedQueue {
    redis: RedisService,
}

impl RedisDelayedQueue {
    pub fn new(redis: RedisService) -> Self {
        Self { redis }
    }

    fn delayed_key(queue: &str) -> String {
        format!("queue:{}:delayed", queue)
    }

    fn processing_key(queue: &str) -> String {
        format!("queue:{}:processing", queue)
    }

    fn job_key(queue: &str, job_id: &str) -> String {
        format!("queue:{}:job:{}", queue, job_id)
    }
}

#[async_trait]
impl DelayedQueue for RedisDelayedQueue {
    async fn enqueue(&self, queue: &str, job: NewJob) -> Result<()> {
        let now = now_unix_ms();
        let record = QueuedJob {
            id: job.id,
            name: job.name,
            payload: job.payload,
            state: JobState::Delayed,
            attempts_made: 0,
            max_attempts: job.max_attempts,
            backoff_base_ms: job.backoff_base_ms,
            scheduled_at_ms: now + job.delay_ms as i64,
            created_at_ms: now,
        };
        let raw = serde_json::to_string(&record)?;

        let mut conn = self.redis.get_conn().await?;
        // Reusing an id replaces the old job: SET overwrites, ZADD rescores.
        let _: () = conn.set(Self::job_key(queue, &record.id), raw).await?;
        let _: () = conn
            .zadd(Self::delayed_key(queue), &record.id, record.scheduled_at_ms)
            .await?;
        Ok(())
    }

    async fn get_job(&self, queue: &str, job_id: &str) -> Result<Option<QueuedJob>> {
        let mut conn = self.redis.get_conn().await?;
        let raw: Option<String> = conn.get(Self::job_key(queue, job_id)).await?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn remove(&self, queue: &str, job_id: &str) -> Result<bool> {
        let mut conn = self.redis.get_conn().await?;
        let dequeued: i64 = conn.zrem(Self::delayed_key(queue), job_id).await?;
        let unclaimed: i64 = conn.zrem(Self::processing_key(queue), job_id).await?;
        let deleted: i64 = conn.del(Self::job_key(queue, job_id)).await?;
        Ok(dequeued > 0 || unclaimed > 0 || deleted > 0)
    }

    async fn claim_due(&self, queue: &str, now_ms: i64, limit: usize) -> Result<Vec<QueuedJob>> {
        let mut conn = self.redis.get_conn().await?;
        let delayed_key = Self::delayed_key(queue);
        let processing_key = Self::processing_key(queue);

        // Claims past their visibility deadline belong to a consumer that
        // died mid-dispatch; put them back in line before claiming.
        let stalled: Vec<String> = conn.zrangebyscore(&processing_key, "-inf", now_ms).await?;
        for id in stalled {
            let released: i64 = conn.zrem(&processing_key, &id).await?;
            if released == 0 {
                continue;
            }

            let job_key = Self::job_key(queue, &id);
            let raw: Option<String> = conn.get(&job_key).await?;
            let Some(raw) = raw else { continue };
            match serde_json::from_str::<QueuedJob>(&raw) {
                Ok(mut job) => {
                    job.state = JobState::Delayed;
                    job.scheduled_at_ms = now_ms;
                    let _: () = conn.set(&job_key, serde_json::to_string(&job)?).await?;
                    let _: () = conn.zadd(&delayed_key, &id, now_ms).await?;
                    warn!(job_id = %id, "Reclaimed stalled job from dead consumer");
                }
                Err(e) => {
                    error!(job_id = %id, "Dropping undecodable stalled job: {}", e);
                    let _: () = conn.del(&job_key).await?;
                }
            }
        }

        let ids: Vec<String> = conn
            .zrangebyscore_limit(&delayed_key, "-inf", now_ms, 0, limit as isize)
            .await?;

        let mut claimed = Vec::new();
        for id in ids {
            // The ZREM winner owns the job.
            let won: i64 = conn.zrem(&delayed_key, &id).await?;
            if won == 0 {
                continue;
            }

            let job_key = Self::job_key(queue, &id);
            let raw: Option<String> = conn.get(&job_key).await?;
            let Some(raw) = raw else {
                // Removed between ZREM and GET, nothing to run.
                continue;
            };
            let mut job: QueuedJob = match serde_json::from_str(&raw) {
                Ok(job) => job,
                Err(e) => {
                    error!(job_id = %id, "Dropping undecodable job record: {}", e);
                    let _: () = conn.del(&job_key).await?;
                    continue;
                }
            };

            job.state = JobState::Active;
            job.attempts_made += 1;
            let _: () = conn.set(&job_key, serde_json::to_string(&job)?).await?;
            let _: () = conn
                .zadd(&processing_key, &id, now_ms + CLAIM_TIMEOUT_MS)
                .await?;
            claimed.push(job);
        }

        Ok(claimed)
    }

    async fn complete(&self, queue: &str, job_id: &str) -> Result<()> {
        let mut conn = self.redis.get_conn().await?;
        let _: i64 = conn.zrem(Self::processing_key(queue), job_id).await?;
        let _: i64 = conn.del(Self::job_key(queue, job_id)).await?;
        Ok(())
    }

    async fn fail(&self, queue: &str, job: &QueuedJob) -> Result<()> {
        let mut conn = self.redis.get_conn().await?;
        let _: i64 = conn.zrem(Self::processing_key(queue), &job.id).await?;
        let mut job = job.clone();

        if job.attempts_made < job.max_attempts {
            let backoff = job.next_backoff_ms();
            job.state = JobState::Delayed;
            job.scheduled_at_ms = now_unix_ms() + backoff as i64;

            let _: () = conn
                .set(Self::job_key(queue, &job.id), serde_json::to_string(&job)?)
                .await?;
            let _: () = conn
                .zadd(Self::delayed_key(queue), &job.id, job.scheduled_at_ms)
                .await?;
            warn!(
                job_id = %job.id,
                attempt = job.attempts_made,
                backoff_ms = backoff,
                "Job attempt failed, retry scheduled"
            );
        } else {
            job.state = JobState::Failed;
            let _: () = conn
                .set_ex(
                    Self::job_key(queue, &job.id),
                    serde_json::to_string(&job)?,
                    FAILED_JOB_TTL_SECS,
                )
                .await?;
            error!(
                job_id = %job.id,
                attempts = job.attempts_made,
                "Job failed permanently, attempts exhausted"
            );
        }

        Ok(())
    }
}
