use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Payload of a scheduled release-reminder job. Title and date are carried
/// for logging only; the dispatcher re-reads both from the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseReminderJob {
    pub movie_id: Uuid,
    pub user_id: Uuid,
    pub movie_title: String,
    #[serde(with = "time::serde::iso8601")]
    pub release_date: OffsetDateTime,
}
