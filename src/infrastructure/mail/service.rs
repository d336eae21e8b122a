use super::provider::{EmailMessage, MailProvider};
use anyhow::Result;
use std::sync::Arc;
use time::OffsetDateTime;
use time::macros::format_description;

#[derive(Clone)]
pub struct MailService {
    provider: Arc<dyn MailProvider>,
    from: String,
    frontend_url: String,
}

impl MailService {
    pub fn new(provider: Arc<dyn MailProvider>, from: String, frontend_url: String) -> Self {
        Self {
            provider,
            from,
            frontend_url,
        }
    }

    pub async fn send_welcome_email(&self, to: &str, name: &str) -> Result<()> {
        let html = format!(
            "<h1>Welcome to CineHub, {name}!</h1>\
             <p>Your personal movie collection is ready. Add movies, upload \
             posters and get reminded the day a release hits.</p>\
             <p><a href=\"{url}\">Get started</a></p>",
            name = name,
            url = self.frontend_url,
        );
        let text = format!(
            "Welcome to CineHub, {}! Your movie collection is ready: {}",
            name, self.frontend_url
        );

        self.provider
            .send(&EmailMessage {
                from: self.from.clone(),
                to: to.to_string(),
                subject: "Welcome to CineHub!".to_string(),
                html,
                text,
            })
            .await
    }

    pub async fn send_release_reminder(
        &self,
        to: &str,
        movie_title: &str,
        release_date: OffsetDateTime,
    ) -> Result<()> {
        let date = release_date
            .format(format_description!("[month repr:long] [day], [year]"))
            .unwrap_or_else(|_| release_date.to_string());

        let html = format!(
            "<h1>Release reminder</h1>\
             <p>The big day is here: <strong>{title}</strong> is releasing \
             today ({date})!</p>\
             <p><a href=\"{url}/movies\">See your collection</a></p>",
            title = movie_title,
            date = date,
            url = self.frontend_url,
        );
        let text = format!(
            "Reminder: \"{}\" is releasing today ({})! See your collection: {}/movies",
            movie_title, date, self.frontend_url
        );

        self.provider
            .send(&EmailMessage {
                from: self.from.clone(),
                to: to.to_string(),
                subject: format!("{} - Releasing Today!", movie_title),
                html,
                text,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mail::provider::RecordingProvider;
    use time::macros::datetime;

    #[tokio::test]
    async fn reminder_uses_current_title_and_address() {
        let provider = Arc::new(RecordingProvider::new());
        let mail = MailService::new(
            provider.clone(),
            "noreply@cinehub.dev".to_string(),
            "http://localhost:3000".to_string(),
        );

        mail.send_release_reminder("user@example.com", "Dune", datetime!(2026-10-01 0:00 UTC))
            .await
            .unwrap();

        let sent = provider.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "user@example.com");
        assert_eq!(sent[0].subject, "Dune - Releasing Today!");
        assert!(sent[0].text.contains("October 01, 2026"));
    }
}
