//! In-memory stand-ins for the completion and email providers.

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::Config;
use crate::email::EmailSender;
use crate::llm::CompletionProvider;

/// Admin-review config with three recipients, in send order.
pub fn review_config() -> Config {
    let mut config = Config::default();
    config.delivery.admin_emails = vec![
        "review-one@example.com".to_string(),
        "review-two@example.com".to_string(),
        "review-three@example.com".to_string(),
    ];
    config
}

pub struct FakeCompletion {
    reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeCompletion {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for FakeCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Some(reply) => Ok(reply.trim().to_string()),
            None => anyhow::bail!("Completion API error (503 Service Unavailable): overloaded"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct FakeMailer {
    fail_on: Option<usize>,
    pub sent: Mutex<Vec<SentEmail>>,
}

impl FakeMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails on the given 1-based attempt; that attempt is still recorded.
    pub fn failing_on(attempt: usize) -> Self {
        Self {
            fail_on: Some(attempt),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn attempts(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for FakeMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<u16> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        if self.fail_on == Some(sent.len()) {
            anyhow::bail!("Email API error (401 Unauthorized): bad key");
        }
        Ok(202)
    }
}
