use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Notification delivery failure. Logged by callers; never affects the
/// evaluation report that produced the alerts.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport error: {0}")]
    Transport(String),

    #[error("notification rejected with status {status}")]
    Rejected { status: u16 },
}

pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + 'a>>;

/// Outbound alert delivery seam.
pub trait Notifier: Send + Sync {
    /// Deliver one batch of alert lines to a recipient.
    fn send<'a>(&'a self, subject: &'a str, recipient: &'a str, lines: &'a [String])
        -> SendFuture<'a>;
}

/// HTTP notifier: POSTs the alert batch as JSON to a mail-gateway or webhook
/// URL. The payload shape matches `send(subject, recipient, body)`.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Serialize)]
struct NotifyPayload<'a> {
    subject: &'a str,
    recipient: &'a str,
    body: &'a [String],
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            url: url.into(),
        }
    }
}

impl Notifier for WebhookNotifier {
    fn send<'a>(
        &'a self,
        subject: &'a str,
        recipient: &'a str,
        lines: &'a [String],
    ) -> SendFuture<'a> {
        Box::pin(async move {
            let payload = NotifyPayload {
                subject,
                recipient,
                body: lines,
            };

            let response = self
                .client
                .post(&self.url)
                .json(&payload)
                .send()
                .await
                .map_err(|error| {
                    warn!("notification post failed: {error}");
                    NotifyError::Transport(error.to_string())
                })?;

            let status = response.status();
            if !status.is_success() {
                warn!(%status, "notification endpoint rejected alert batch");
                return Err(NotifyError::Rejected {
                    status: status.as_u16(),
                });
            }

            Ok(())
        })
    }
}
