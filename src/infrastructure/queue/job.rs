use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Delayed,
    Active,
    Failed,
}

/// A job as held by the queue backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedJob {
    pub id: String,
    pub name: String,
    pub payload: Value,
    pub state: JobState,
    pub attempts_made: u32,
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    /// Absolute time (unix millis) the job becomes eligible for execution.
    pub scheduled_at_ms: i64,
    pub created_at_ms: i64,
}

impl QueuedJob {
    /// Exponential backoff: base * 2^(attempts_made - 1).
    pub fn next_backoff_ms(&self) -> u64 {
        let exp = self.attempts_made.saturating_sub(1).min(32);
        self.backoff_base_ms.saturating_mul(1u64 << exp)
    }
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub id: String,
    pub name: String,
    pub payload: Value,
    pub delay_ms: u64,
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
}
