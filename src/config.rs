use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_llm_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            system_prompt: default_system_prompt(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_email_base_url")]
    pub base_url: String,
    /// Verified sender address on the SendGrid account.
    #[serde(default = "default_from_email")]
    pub from_email: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_email_base_url(),
            from_email: default_from_email(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeliveryConfig {
    /// true: reply goes straight to the customer. false: QA copy to the admin list.
    #[serde(default)]
    pub send_to_customer: bool,
    /// Review recipients, in send order. No compiled-in default; operators set it.
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            send_to_customer: false,
            admin_emails: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    350
}

fn default_system_prompt() -> String {
    "You are a helpful assistant.".to_string()
}

fn default_email_base_url() -> String {
    "https://api.sendgrid.com/v3".to_string()
}

fn default_from_email() -> String {
    "support@titlefrauddefender.com".to_string()
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Parse a TOML override file. Fields it leaves out keep their compiled defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `OPENAI_API_KEY`, `SENDGRID_API_KEY` and `PORT` on top of the file/defaults.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = key;
        }
        if let Some(key) = lookup("SENDGRID_API_KEY") {
            self.email.api_key = key;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value: {port:?}"))?;
        }
        Ok(())
    }

    /// Compiled defaults, optionally overlaid by a TOML file, then by the environment.
    pub fn from_env_and_args(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Admin review mode needs an explicit, non-blank recipient list.
    pub fn validate(&self) -> Result<()> {
        if self.delivery.send_to_customer {
            return Ok(());
        }
        if self.delivery.admin_emails.is_empty() {
            anyhow::bail!(
                "[delivery] admin_emails must be set when send_to_customer is false"
            );
        }
        if self.delivery.admin_emails.iter().any(|a| a.trim().is_empty()) {
            anyhow::bail!("[delivery] admin_emails contains a blank address");
        }
        Ok(())
    }

    /// Addresses a reply goes to for a given customer.
    pub fn recipients_for(&self, customer_email: &str) -> Vec<String> {
        if self.delivery.send_to_customer {
            vec![customer_email.to_string()]
        } else {
            self.delivery.admin_emails.clone()
        }
    }
}
