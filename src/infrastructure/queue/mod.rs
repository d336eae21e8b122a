pub mod job;
#[cfg(test)]
pub mod memory;
pub mod redis;

pub use job::{JobState, NewJob, QueuedJob};

use anyhow::Result;
use async_trait::async_trait;

/// Queue consumed by the release-reminder dispatcher.
pub const MOVIE_EMAILS_QUEUE: &str = "movie-emails";

/// How long a claimed job may stay unacknowledged before it is treated as
/// stalled and offered to consumers again.
pub const CLAIM_TIMEOUT_MS: i64 = 30_000;

/// Durable, time-ordered job store with delayed execution, retry with
/// backoff and cancellation by caller-supplied id.
///
/// Enqueueing an id that already exists replaces the previous job, so a
/// deterministic id doubles as a uniqueness constraint.
#[async_trait]
pub trait DelayedQueue: Send + Sync {
    async fn enqueue(&self, queue: &str, job: NewJob) -> Result<()>;

    async fn get_job(&self, queue: &str, job_id: &str) -> Result<Option<QueuedJob>>;

    /// Removes a job in any state. Returns false when nothing was there.
    async fn remove(&self, queue: &str, job_id: &str) -> Result<bool>;

    /// Claims up to `limit` jobs whose eligibility time has passed. Each due
    /// job is handed to at most one caller; claimed jobs come back in the
    /// `Active` state with the attempt counter already bumped.
    ///
    /// A claim carries a visibility deadline of [`CLAIM_TIMEOUT_MS`]: a job
    /// neither completed nor failed by then is presumed orphaned by a dead
    /// consumer and becomes claimable again, so delivery is at-least-once
    /// across consumer crashes.
    async fn claim_due(&self, queue: &str, now_ms: i64, limit: usize) -> Result<Vec<QueuedJob>>;

    /// Terminal success: the job record is deleted.
    async fn complete(&self, queue: &str, job_id: &str) -> Result<()>;

    /// Records a failed attempt for a claimed job: re-delays with exponential
    /// backoff while attempts remain, otherwise marks the job failed-final.
    async fn fail(&self, queue: &str, job: &QueuedJob) -> Result<()>;
}

pub fn now_unix_ms() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
