//! In-memory queue used by tests in place of the Redis backend.

use super::job::{JobState, NewJob, QueuedJob};
use super::{CLAIM_TIMEOUT_MS, DelayedQueue, now_unix_ms};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    jobs: HashMap<String, QueuedJob>,
    /// Visibility deadline per claimed key.
    deadlines: HashMap<String, i64>,
}

#[derive(Default)]
pub struct InMemoryQueue {
    inner: Mutex<Inner>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(queue: &str, job_id: &str) -> String {
        format!("{}/{}", queue, job_id)
    }

    pub fn job_count(&self, queue: &str) -> usize {
        let prefix = format!("{}/", queue);
        self.inner
            .lock()
            .unwrap()
            .jobs
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .count()
    }
}

#[async_trait]
impl DelayedQueue for InMemoryQueue {
    async fn enqueue(&self, queue: &str, job: NewJob) -> Result<()> {
        let now = now_unix_ms();
        let record = QueuedJob {
            id: job.id.clone(),
            name: job.name,
            payload: job.payload,
            state: JobState::Delayed,
            attempts_made: 0,
            max_attempts: job.max_attempts,
            backoff_base_ms: job.backoff_base_ms,
            scheduled_at_ms: now + job.delay_ms as i64,
            created_at_ms: now,
        };
        let mut inner = self.inner.lock().unwrap();
        let key = Self::key(queue, &job.id);
        inner.deadlines.remove(&key);
        inner.jobs.insert(key, record);
        Ok(())
    }

    async fn get_job(&self, queue: &str, job_id: &str) -> Result<Option<QueuedJob>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .jobs
            .get(&Self::key(queue, job_id))
            .cloned())
    }

    async fn remove(&self, queue: &str, job_id: &str) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        let key = Self::key(queue, job_id);
        inner.deadlines.remove(&key);
        Ok(inner.jobs.remove(&key).is_some())
    }

    async fn claim_due(&self, queue: &str, now_ms: i64, limit: usize) -> Result<Vec<QueuedJob>> {
        let mut inner = self.inner.lock().unwrap();
        let prefix = format!("{}/", queue);

        // Lapsed claims come back first, as if the consumer died.
        let stalled: Vec<String> = inner
            .deadlines
            .iter()
            .filter(|(key, deadline)| key.starts_with(&prefix) && **deadline <= now_ms)
            .map(|(key, _)| key.clone())
            .collect();
        for key in stalled {
            inner.deadlines.remove(&key);
            if let Some(job) = inner.jobs.get_mut(&key) {
                job.state = JobState::Delayed;
                job.scheduled_at_ms = now_ms;
            }
        }

        let mut due: Vec<String> = inner
            .jobs
            .iter()
            .filter(|(key, job)| {
                key.starts_with(&prefix)
                    && job.state == JobState::Delayed
                    && job.scheduled_at_ms <= now_ms
            })
            .map(|(key, _)| key.clone())
            .collect();
        due.sort_by_key(|key| inner.jobs[key].scheduled_at_ms);
        due.truncate(limit);

        let mut claimed = Vec::new();
        for key in due {
            let job = inner.jobs.get_mut(&key).unwrap();
            job.state = JobState::Active;
            job.attempts_made += 1;
            claimed.push(job.clone());
            inner.deadlines.insert(key, now_ms + CLAIM_TIMEOUT_MS);
        }
        Ok(claimed)
    }

    async fn complete(&self, queue: &str, job_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let key = Self::key(queue, job_id);
        inner.deadlines.remove(&key);
        inner.jobs.remove(&key);
        Ok(())
    }

    async fn fail(&self, queue: &str, job: &QueuedJob) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let key = Self::key(queue, &job.id);
        inner.deadlines.remove(&key);
        let Some(stored) = inner.jobs.get_mut(&key) else {
            return Ok(());
        };

        stored.attempts_made = job.attempts_made;
        if job.attempts_made < job.max_attempts {
            stored.state = JobState::Delayed;
            stored.scheduled_at_ms = now_unix_ms() + job.next_backoff_ms() as i64;
        } else {
            stored.state = JobState::Failed;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job(id: &str, delay_ms: u64) -> NewJob {
        NewJob {
            id: id.to_string(),
            name: "send-release-reminder".to_string(),
            payload: json!({"movie_id": id}),
            delay_ms,
            max_attempts: 3,
            backoff_base_ms: 60_000,
        }
    }

    #[tokio::test]
    async fn job_invisible_until_due() {
        let queue = InMemoryQueue::new();
        queue.enqueue("q", job("a", 5_000)).await.unwrap();

        let now = now_unix_ms();
        assert!(queue.claim_due("q", now, 10).await.unwrap().is_empty());

        let claimed = queue.claim_due("q", now + 6_000, 10).await.unwrap();
        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].state, JobState::Active);
        assert_eq!(claimed[0].attempts_made, 1);

        // Already claimed, no second consumer gets it.
        assert!(queue.claim_due("q", now + 6_000, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn enqueue_same_id_replaces() {
        let queue = InMemoryQueue::new();
        queue.enqueue("q", job("a", 1_000)).await.unwrap();
        queue.enqueue("q", job("a", 90_000)).await.unwrap();

        let stored = queue.get_job("q", "a").await.unwrap().unwrap();
        let expected = now_unix_ms() + 90_000;
        assert!((stored.scheduled_at_ms - expected).abs() < 2_000);
        assert!(queue.claim_due("q", now_unix_ms(), 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let queue = InMemoryQueue::new();
        queue.enqueue("q", job("a", 1_000)).await.unwrap();

        assert!(queue.remove("q", "a").await.unwrap());
        assert!(!queue.remove("q", "a").await.unwrap());
        assert!(queue.get_job("q", "a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stalled_claim_is_redelivered() {
        let queue = InMemoryQueue::new();
        queue.enqueue("q", job("a", 0)).await.unwrap();

        let now = now_unix_ms();
        let claimed = queue.claim_due("q", now + 1, 10).await.unwrap();
        assert_eq!(claimed[0].attempts_made, 1);

        // Within the visibility window the claim is exclusive.
        assert!(
            queue
                .claim_due("q", now + CLAIM_TIMEOUT_MS - 1, 10)
                .await
                .unwrap()
                .is_empty()
        );

        // Consumer never acked; past the deadline the job comes back.
        let reclaimed = queue
            .claim_due("q", now + CLAIM_TIMEOUT_MS + 2, 10)
            .await
            .unwrap();
        assert_eq!(reclaimed.len(), 1);
        assert_eq!(reclaimed[0].attempts_made, 2);
        assert_eq!(reclaimed[0].state, JobState::Active);
    }

    #[tokio::test]
    async fn acked_claim_is_not_redelivered() {
        let queue = InMemoryQueue::new();
        queue.enqueue("q", job("a", 0)).await.unwrap();

        let now = now_unix_ms();
        let claimed = queue.claim_due("q", now + 1, 10).await.unwrap();
        queue.complete("q", &claimed[0].id).await.unwrap();

        assert!(
            queue
                .claim_due("q", now + CLAIM_TIMEOUT_MS + 2, 10)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(queue.get_job("q", "a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_attempts_backoff_then_fail_final() {
        let queue = InMemoryQueue::new();
        queue.enqueue("q", job("a", 0)).await.unwrap();

        // Attempt 1 fails: retry delayed by the 60s base.
        let claimed = queue.claim_due("q", now_unix_ms() + 1, 10).await.unwrap();
        queue.fail("q", &claimed[0]).await.unwrap();
        let stored = queue.get_job("q", "a").await.unwrap().unwrap();
        assert_eq!(stored.state, JobState::Delayed);
        let first_retry = stored.scheduled_at_ms - now_unix_ms();
        assert!((59_000..=61_000).contains(&first_retry));

        // Attempt 2 fails: backoff doubles.
        let claimed = queue
            .claim_due("q", stored.scheduled_at_ms + 1, 10)
            .await
            .unwrap();
        assert_eq!(claimed[0].attempts_made, 2);
        queue.fail("q", &claimed[0]).await.unwrap();
        let stored = queue.get_job("q", "a").await.unwrap().unwrap();
        let second_retry = stored.scheduled_at_ms - now_unix_ms();
        assert!((119_000..=121_000).contains(&second_retry));

        // Attempt 3 fails: attempts exhausted, failed-final.
        let claimed = queue
            .claim_due("q", stored.scheduled_at_ms + 1, 10)
            .await
            .unwrap();
        assert_eq!(claimed[0].attempts_made, 3);
        queue.fail("q", &claimed[0]).await.unwrap();
        let stored = queue.get_job("q", "a").await.unwrap().unwrap();
        assert_eq!(stored.state, JobState::Failed);
        assert!(
            queue
                .claim_due("q", now_unix_ms() + 600_000, 10)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
