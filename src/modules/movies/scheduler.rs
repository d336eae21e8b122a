use super::events::ReleaseReminderJob;
use super::model::Movie;
use crate::infrastructure::queue::{DelayedQueue, MOVIE_EMAILS_QUEUE, NewJob};
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

pub const RELEASE_REMINDER_JOB: &str = "send-release-reminder";
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_MS: u64 = 60_000;

/// Keeps at most one pending release reminder per movie. Queue failures are
/// logged and swallowed so a flaky broker never fails the owning CRUD call.
#[derive(Clone)]
pub struct ReleaseScheduler {
    queue: Arc<dyn DelayedQueue>,
}

pub fn release_job_id(movie_id: Uuid) -> String {
    format!("movie-release-{}", movie_id)
}

impl ReleaseScheduler {
    pub fn new(queue: Arc<dyn DelayedQueue>) -> Self {
        Self { queue }
    }

    /// Queues a reminder due at the movie's release date. Movies already
    /// released are skipped; scheduling again for the same movie replaces
    /// the earlier job.
    pub async fn schedule_release_notification(&self, movie: &Movie) {
        let now = OffsetDateTime::now_utc();
        if movie.release_date <= now {
            tracing::warn!(
                movie_id = %movie.id,
                "Release date already passed, not scheduling a reminder"
            );
            return;
        }

        let delay_ms = ((movie.release_date - now).whole_milliseconds()).max(0) as u64;
        let payload = ReleaseReminderJob {
            movie_id: movie.id,
            user_id: movie.user_id,
            movie_title: movie.title.clone(),
            release_date: movie.release_date,
        };

        let payload = match serde_json::to_value(&payload) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("❌ Failed to serialize release reminder for movie {}: {}", movie.id, e);
                return;
            }
        };

        let job = NewJob {
            id: release_job_id(movie.id),
            name: RELEASE_REMINDER_JOB.to_string(),
            payload,
            delay_ms,
            max_attempts: MAX_ATTEMPTS,
            backoff_base_ms: BACKOFF_BASE_MS,
        };

        match self.queue.enqueue(MOVIE_EMAILS_QUEUE, job).await {
            Ok(()) => tracing::info!(
                "📅 Scheduled release reminder for movie {} in {}s",
                movie.id,
                delay_ms / 1000
            ),
            Err(e) => tracing::error!(
                "❌ Failed to schedule release reminder for movie {}: {}",
                movie.id,
                e
            ),
        }
    }

    /// Removes the pending reminder, if any. Safe to call for movies that
    /// never had one.
    pub async fn cancel_release_notification(&self, movie_id: Uuid) {
        match self
            .queue
            .remove(MOVIE_EMAILS_QUEUE, &release_job_id(movie_id))
            .await
        {
            Ok(true) => tracing::info!("🗑️ Cancelled release reminder for movie {}", movie_id),
            Ok(false) => {}
            Err(e) => tracing::error!(
                "❌ Failed to cancel release reminder for movie {}: {}",
                movie_id,
                e
            ),
        }
    }

    /// Cancel-then-schedule, recomputing the delay from the movie's current
    /// release date.
    pub async fn reschedule_release_notification(&self, movie: &Movie) {
        self.cancel_release_notification(movie.id).await;
        self.schedule_release_notification(movie).await;
    }

    /// Applies a movie edit to its pending reminder. Only a changed release
    /// date touches the queue; any other edit keeps the existing job and
    /// its delay (the dispatcher reads the fresh title from the database).
    pub async fn sync_after_update(&self, movie: &Movie, release_date_changed: bool) {
        if release_date_changed {
            self.reschedule_release_notification(movie).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::queue::memory::InMemoryQueue;
    use crate::infrastructure::queue::now_unix_ms;
    use time::Duration;

    fn movie_releasing_in(delta: Duration) -> Movie {
        let now = OffsetDateTime::now_utc();
        Movie {
            id: Uuid::new_v4(),
            title: "Arrival".to_string(),
            original_title: None,
            subtitle: None,
            description: "A linguist decodes an alien language.".to_string(),
            release_date: now + delta,
            duration: 116,
            status: None,
            age_rating: None,
            budget: None,
            revenue: None,
            profit: None,
            poster_url: None,
            backdrop_url: None,
            trailer_url: None,
            genres: vec!["Sci-Fi".to_string()],
            production_companies: vec![],
            spoken_languages: vec![],
            vote_average: None,
            vote_count: None,
            popularity: None,
            user_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    fn scheduler() -> (ReleaseScheduler, Arc<InMemoryQueue>) {
        let queue = Arc::new(InMemoryQueue::new());
        (ReleaseScheduler::new(queue.clone()), queue)
    }

    #[tokio::test]
    async fn schedules_with_delay_matching_release_date() {
        let (scheduler, queue) = scheduler();
        let movie = movie_releasing_in(Duration::minutes(3));

        scheduler.schedule_release_notification(&movie).await;

        let job = queue
            .get_job(MOVIE_EMAILS_QUEUE, &release_job_id(movie.id))
            .await
            .unwrap()
            .expect("job should be queued");
        assert_eq!(job.name, RELEASE_REMINDER_JOB);
        assert_eq!(job.max_attempts, 3);
        assert_eq!(job.backoff_base_ms, 60_000);

        let eta_s = (job.scheduled_at_ms - now_unix_ms()) / 1000;
        assert!((175..=181).contains(&eta_s), "eta was {}s", eta_s);

        let payload: ReleaseReminderJob = serde_json::from_value(job.payload).unwrap();
        assert_eq!(payload.movie_id, movie.id);
        assert_eq!(payload.user_id, movie.user_id);
    }

    #[tokio::test]
    async fn skips_movies_already_released() {
        let (scheduler, queue) = scheduler();
        let movie = movie_releasing_in(Duration::hours(-1));

        scheduler.schedule_release_notification(&movie).await;

        let job = queue
            .get_job(MOVIE_EMAILS_QUEUE, &release_job_id(movie.id))
            .await
            .unwrap();
        assert!(job.is_none());
    }

    #[tokio::test]
    async fn scheduling_twice_keeps_a_single_job() {
        let (scheduler, queue) = scheduler();
        let mut movie = movie_releasing_in(Duration::days(1));

        scheduler.schedule_release_notification(&movie).await;
        movie.release_date = OffsetDateTime::now_utc() + Duration::days(2);
        scheduler.schedule_release_notification(&movie).await;

        assert_eq!(queue.job_count(MOVIE_EMAILS_QUEUE), 1);
        let job = queue
            .get_job(MOVIE_EMAILS_QUEUE, &release_job_id(movie.id))
            .await
            .unwrap()
            .unwrap();
        let eta_s = (job.scheduled_at_ms - now_unix_ms()) / 1000;
        assert!(eta_s > 86_400, "replacement should carry the later date");
    }

    #[tokio::test]
    async fn cancel_removes_job_and_tolerates_absence() {
        let (scheduler, queue) = scheduler();
        let movie = movie_releasing_in(Duration::days(1));

        scheduler.schedule_release_notification(&movie).await;
        scheduler.cancel_release_notification(movie.id).await;

        assert_eq!(queue.job_count(MOVIE_EMAILS_QUEUE), 0);

        // Nothing pending; must not panic or error.
        scheduler.cancel_release_notification(movie.id).await;
        scheduler.cancel_release_notification(Uuid::new_v4()).await;
    }

    #[tokio::test]
    async fn reschedule_recomputes_delay() {
        let (scheduler, queue) = scheduler();
        let mut movie = movie_releasing_in(Duration::days(7));

        scheduler.schedule_release_notification(&movie).await;
        movie.release_date = OffsetDateTime::now_utc() + Duration::minutes(3);
        scheduler.reschedule_release_notification(&movie).await;

        assert_eq!(queue.job_count(MOVIE_EMAILS_QUEUE), 1);
        let job = queue
            .get_job(MOVIE_EMAILS_QUEUE, &release_job_id(movie.id))
            .await
            .unwrap()
            .unwrap();
        let eta_s = (job.scheduled_at_ms - now_unix_ms()) / 1000;
        assert!((175..=181).contains(&eta_s), "eta was {}s", eta_s);
    }

    #[tokio::test]
    async fn title_only_edit_keeps_job_and_delay() {
        let (scheduler, queue) = scheduler();
        let mut movie = movie_releasing_in(Duration::days(1));

        scheduler.schedule_release_notification(&movie).await;
        let before = queue
            .get_job(MOVIE_EMAILS_QUEUE, &release_job_id(movie.id))
            .await
            .unwrap()
            .unwrap();

        movie.title = "Arrival (Director's Cut)".to_string();
        scheduler.sync_after_update(&movie, false).await;

        assert_eq!(queue.job_count(MOVIE_EMAILS_QUEUE), 1);
        let after = queue
            .get_job(MOVIE_EMAILS_QUEUE, &release_job_id(movie.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.scheduled_at_ms, before.scheduled_at_ms);
        assert_eq!(after.payload, before.payload);
    }

    #[tokio::test]
    async fn date_edit_recomputes_delay() {
        let (scheduler, queue) = scheduler();
        let mut movie = movie_releasing_in(Duration::days(1));

        scheduler.schedule_release_notification(&movie).await;
        movie.release_date = OffsetDateTime::now_utc() + Duration::days(2);
        scheduler.sync_after_update(&movie, true).await;

        let job = queue
            .get_job(MOVIE_EMAILS_QUEUE, &release_job_id(movie.id))
            .await
            .unwrap()
            .unwrap();
        let eta_s = (job.scheduled_at_ms - now_unix_ms()) / 1000;
        assert!(eta_s > 86_400, "delay should track the new date");
    }

    #[tokio::test]
    async fn reschedule_to_past_date_leaves_nothing_queued() {
        let (scheduler, queue) = scheduler();
        let mut movie = movie_releasing_in(Duration::days(7));

        scheduler.schedule_release_notification(&movie).await;
        movie.release_date = OffsetDateTime::now_utc() - Duration::days(1);
        scheduler.reschedule_release_notification(&movie).await;

        assert_eq!(queue.job_count(MOVIE_EMAILS_QUEUE), 0);
    }
}
