use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::EmailConfig;

/// One reply, fanned out to every recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Sends a single plain-text message. Returns the provider's status code.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<u16>;
}

/// Send `email` to each recipient in order, one call each.
///
/// The first failure aborts the loop; earlier recipients have already been mailed.
pub async fn dispatch(
    sender: &dyn EmailSender,
    email: &OutboundEmail,
) -> Result<(), DispatchError> {
    for recipient in &email.recipients {
        let status = sender
            .send(recipient, &email.subject, &email.body)
            .await
            .map_err(|source| DispatchError {
                recipient: recipient.clone(),
                source,
            })?;
        info!("Email ➜ {} status {}", recipient, status);
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
#[error("failed to send email to {recipient}")]
pub struct DispatchError {
    pub recipient: String,
    #[source]
    pub source: anyhow::Error,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

pub struct SendGridClient {
    client: reqwest::Client,
    config: EmailConfig,
}

impl SendGridClient {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn build_request<'a>(
        &'a self,
        to: &'a str,
        subject: &'a str,
        body: &'a str,
    ) -> MailRequest<'a> {
        MailRequest {
            personalizations: vec![Personalization {
                to: vec![Address { email: to }],
            }],
            from: Address {
                email: &self.config.from_email,
            },
            subject,
            content: vec![Content {
                content_type: "text/plain",
                value: body,
            }],
        }
    }
}

#[async_trait]
impl EmailSender for SendGridClient {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<u16> {
        let url = format!("{}/mail/send", self.config.base_url);
        debug!("Sending email to {} via {}", to, url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&self.build_request(to, subject, body))
            .send()
            .await
            .context("Failed to send request to email API")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Email API error ({}): {}", status, error_body);
        }

        Ok(status.as_u16())
    }
}
