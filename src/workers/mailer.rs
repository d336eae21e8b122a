use crate::infrastructure::mail::service::MailService;
use crate::infrastructure::queue::{DelayedQueue, MOVIE_EMAILS_QUEUE, QueuedJob, now_unix_ms};
use crate::modules::movies::events::ReleaseReminderJob;
use crate::modules::movies::model::Movie;
use crate::modules::movies::repository::MovieRepository;
use crate::modules::users::model::User;
use crate::modules::users::repository::UserRepository;
use crate::state::AppState;
use anyhow::Result;
use std::time::Duration;
use tracing::{error, info, warn};

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const CLAIM_BATCH: usize = 10;

pub async fn start_mailer_worker(state: AppState) {
    info!("📬 Starting Mailer Worker...");

    loop {
        let claimed = state
            .queue
            .claim_due(MOVIE_EMAILS_QUEUE, now_unix_ms(), CLAIM_BATCH)
            .await;

        match claimed {
            Ok(jobs) => {
                for job in jobs {
                    handle_job(&state, job).await;
                }
            }
            Err(e) => error!("❌ Failed to claim due jobs: {}", e),
        }

        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

async fn handle_job(state: &AppState, job: QueuedJob) {
    match process_job(state, &job).await {
        Ok(()) => {
            if let Err(e) = state.queue.complete(MOVIE_EMAILS_QUEUE, &job.id).await {
                error!(job_id = %job.id, "Failed to mark job complete: {}", e);
            } else {
                info!(job_id = %job.id, "✅ Job completed successfully");
            }
        }
        Err(e) => {
            error!(
                job_id = %job.id,
                attempt = job.attempts_made,
                "❌ Failed to process job: {}",
                e
            );
            if let Err(e) = state.queue.fail(MOVIE_EMAILS_QUEUE, &job).await {
                error!(job_id = %job.id, "Failed to record job failure: {}", e);
            }
        }
    }
}

async fn process_job(state: &AppState, job: &QueuedJob) -> Result<()> {
    let payload: ReleaseReminderJob = serde_json::from_value(job.payload.clone())?;

    // The payload may be days old; the database is the source of truth for
    // both the movie and the recipient.
    let movie = MovieRepository::find_by_id(&state.db, payload.movie_id).await?;
    let user = UserRepository::find_by_id(&state.db, payload.user_id).await?;

    dispatch(&state.mailer, movie, user).await
}

/// Sends the reminder for a claimed job. A movie or user deleted since
/// scheduling ends the job cleanly; a mail transport error bubbles up so the
/// queue can retry.
pub async fn dispatch(mailer: &MailService, movie: Option<Movie>, user: Option<User>) -> Result<()> {
    let Some(movie) = movie else {
        warn!("Movie deleted before its release reminder fired, skipping");
        return Ok(());
    };
    let Some(user) = user else {
        warn!(movie_id = %movie.id, "Owner deleted before release reminder fired, skipping");
        return Ok(());
    };

    mailer
        .send_release_reminder(&user.email, &movie.title, movie.release_date)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mail::provider::RecordingProvider;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn mail_service() -> (MailService, Arc<RecordingProvider>) {
        let provider = Arc::new(RecordingProvider::new());
        let mail = MailService::new(
            provider.clone(),
            "noreply@cinehub.dev".to_string(),
            "http://localhost:3000".to_string(),
        );
        (mail, provider)
    }

    fn movie(title: &str) -> Movie {
        let now = OffsetDateTime::now_utc();
        Movie {
            id: Uuid::new_v4(),
            title: title.to_string(),
            original_title: None,
            subtitle: None,
            description: "A heist inside layered dreams.".to_string(),
            release_date: now,
            duration: 148,
            status: None,
            age_rating: None,
            budget: None,
            revenue: None,
            profit: None,
            poster_url: None,
            backdrop_url: None,
            trailer_url: None,
            genres: vec![],
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

    fn user(email: &str) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: email.to_string(),
            password_hash: "argon2-hash".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn sends_reminder_with_current_title() {
        let (mail, provider) = mail_service();

        dispatch(&mail, Some(movie("Inception")), Some(user("ada@example.com")))
            .await
            .unwrap();

        let sent = provider.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ada@example.com");
        assert_eq!(sent[0].subject, "Inception - Releasing Today!");
    }

    #[tokio::test]
    async fn deleted_movie_completes_without_sending() {
        let (mail, provider) = mail_service();

        dispatch(&mail, None, Some(user("ada@example.com")))
            .await
            .unwrap();

        assert!(provider.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleted_owner_completes_without_sending() {
        let (mail, provider) = mail_service();

        dispatch(&mail, Some(movie("Inception")), None).await.unwrap();

        assert!(provider.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn transport_error_propagates_for_retry() {
        let (mail, provider) = mail_service();
        provider.fail.store(true, Ordering::SeqCst);

        let result = dispatch(&mail, Some(movie("Inception")), Some(user("ada@example.com"))).await;

        assert!(result.is_err());
        assert!(provider.sent.lock().unwrap().is_empty());
    }
}
