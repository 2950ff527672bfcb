mod config;
mod email;
mod llm;
mod prompt;
mod server;
mod webhook;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::email::SendGridClient;
use crate::llm::LlmClient;
use crate::server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tfd_webhook=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Optional TOML override file; compiled defaults otherwise
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    if let Some(path) = &config_path {
        info!("Loading configuration overrides from: {}", path.display());
    }
    let config = Config::from_env_and_args(config_path.as_deref())
        .context("Failed to load configuration")?;

    info!("Configuration loaded successfully");
    info!("  Model: {}", config.llm.model);
    info!("  Sender: {}", config.email.from_email);
    if config.delivery.send_to_customer {
        info!("  Delivery: customer");
    } else {
        info!("  Delivery: admin review {:?}", config.delivery.admin_emails);
    }
    if config.llm.api_key.is_empty() {
        warn!("OPENAI_API_KEY is not set; completion requests will fail");
    }
    if config.email.api_key.is_empty() {
        warn!("SENDGRID_API_KEY is not set; email sends will fail");
    }

    let state = AppState {
        llm: Arc::new(LlmClient::new(config.llm.clone())),
        mailer: Arc::new(SendGridClient::new(config.email.clone())),
        config: Arc::new(config),
    };

    server::serve(state).await
}
