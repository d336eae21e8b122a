use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[async_trait]
pub trait MailProvider: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Resend HTTP API transport. Without an API key it degrades to logging the
/// send instead of performing it (dev mode).
pub struct ResendProvider {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl ResendProvider {
    const API_URL: &'static str = "https://api.resend.com/emails";

    pub fn new(api_key: Option<String>) -> Self {
        if api_key.is_none() {
            warn!("RESEND_API_KEY not set - emails will be mocked");
        }
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl MailProvider for ResendProvider {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let Some(api_key) = &self.api_key else {
            info!(to = %message.to, subject = %message.subject, "[MOCK] Email sent");
            return Ok(());
        };

        let body = serde_json::json!({
            "from": message.from,
            "to": [message.to],
            "subject": message.subject,
            "html": message.html,
            "text": message.text,
        });

        let response = self
            .http
            .post(Self::API_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("Resend error {}: {}", status, detail));
        }

        info!(to = %message.to, "Email sent successfully");
        Ok(())
    }
}

#[cfg(test)]
pub struct RecordingProvider {
    pub sent: std::sync::Mutex<Vec<EmailMessage>>,
    pub fail: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl RecordingProvider {
    pub fn new() -> Self {
        Self {
            sent: std::sync::Mutex::new(Vec::new()),
            fail: std::sync::atomic::AtomicBool::new(false),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl MailProvider for RecordingProvider {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(anyhow!("smtp unavailable"));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
