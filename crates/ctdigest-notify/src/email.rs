use std::time::Duration;

use async_trait::async_trait;
use ctdigest_models::{CanonicalTrade, NotifyConfig};
use tracing::info;

use crate::digest::{digest_body, digest_subject};
use crate::error::NotifyError;

/// Sends one digest message per run. Mockable for testing.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a digest covering the whole batch. Invoked at most once per
    /// run, and only with a non-empty batch.
    async fn notify(&self, batch: &[CanonicalTrade]) -> Result<(), NotifyError>;
}

/// Notifier backed by a REST email API (`POST /emails`).
pub struct EmailNotifier {
    api_url: String,
    api_key: String,
    from: String,
    to: String,
    max_lines: usize,
    client: reqwest::Client,
}

impl EmailNotifier {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        max_lines: usize,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ctdigest/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            from: from.into(),
            to: to.into(),
            max_lines,
            client,
        })
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, batch: &[CanonicalTrade]) -> Result<(), NotifyError> {
        let subject = digest_subject(batch.len(), chrono::Utc::now().date_naive());
        let text = digest_body(batch, self.max_lines);

        let response = self
            .client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "from": self.from,
                "to": self.to,
                "subject": subject,
                "text": text,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!(count = batch.len(), "Digest email accepted by channel");
        Ok(())
    }
}

/// Fallback when the email channel is unconfigured: logs the digest instead
/// of failing, mirroring the store's graceful-degradation policy.
pub struct ConsoleNotifier {
    max_lines: usize,
}

impl ConsoleNotifier {
    pub fn new(max_lines: usize) -> Self {
        Self { max_lines }
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, batch: &[CanonicalTrade]) -> Result<(), NotifyError> {
        let subject = digest_subject(batch.len(), chrono::Utc::now().date_naive());
        let body = digest_body(batch, self.max_lines);
        info!(count = batch.len(), %subject, "Email channel unconfigured; digest follows\n{body}");
        Ok(())
    }
}

/// Build a notifier from config: email when both recipient and key are
/// present, console otherwise.
pub fn build_notifier(
    config: &NotifyConfig,
    timeout: Duration,
) -> Result<Box<dyn Notifier>, NotifyError> {
    match (&config.to, &config.api_key) {
        (Some(to), Some(key)) => {
            let notifier = EmailNotifier::new(
                config.api_url.clone(),
                key.clone(),
                config.from.clone(),
                to.clone(),
                config.digest_max_lines,
                timeout,
            )?;
            Ok(Box::new(notifier))
        }
        _ => {
            info!("Email channel unconfigured; digests will be logged to the console");
            Ok(Box::new(ConsoleNotifier::new(config.digest_max_lines)))
        }
    }
}
