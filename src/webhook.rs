//! The request pipeline: payload → validated request → reply → email.
//!
//! Nothing here knows about HTTP; the server module maps the result onto status codes.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::Config;
use crate::email::{self, DispatchError, EmailSender, OutboundEmail};
use crate::llm::CompletionProvider;
use crate::prompt::PromptContext;

/// Greeting name used when the payload carries no usable name.
pub const FALLBACK_FIRST_NAME: &str = "there";

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Missing body or email")]
    MissingField,
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("completion provider failed")]
    Completion(#[source] anyhow::Error),
    #[error(transparent)]
    Email(#[from] DispatchError),
}

impl PipelineError {
    /// Stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::MissingField => "missing_field",
            PipelineError::MalformedPayload(_) => "malformed_payload",
            PipelineError::Completion(_) => "completion",
            PipelineError::Email(_) => "email",
        }
    }
}

/// Recognized fields of an inbound webhook, all optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundPayload {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub body: Option<String>,
}

/// Lenient body parse: invalid JSON becomes an empty object.
pub fn parse_payload(raw: &[u8]) -> Value {
    serde_json::from_slice(raw).unwrap_or_else(|_| Value::Object(Map::new()))
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Text of a JSON value as it reads in a prompt or email: strings bare, anything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A present, truthy field rendered as text. Falsy values count as absent.
fn truthy_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .filter(|value| !is_falsy(value))
        .map(display_value)
}

/// Name parts join as text whatever their JSON type; only `null` is skipped.
fn name_part(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .filter(|value| !value.is_null())
        .map(display_value)
}

/// `full_name` is split on whitespace later, so a truthy non-string cannot be used.
fn full_name_field(map: &Map<String, Value>) -> Result<Option<String>, PipelineError> {
    match map.get("full_name") {
        Some(Value::String(s)) if !s.is_empty() => Ok(Some(s.clone())),
        Some(value) if !is_falsy(value) => Err(PipelineError::MalformedPayload(format!(
            "field `full_name` must be a string, got {value}"
        ))),
        _ => Ok(None),
    }
}

impl InboundPayload {
    pub fn from_value(value: &Value) -> Result<Self, PipelineError> {
        if is_falsy(value) {
            return Ok(Self::default());
        }
        let map = value.as_object().ok_or_else(|| {
            PipelineError::MalformedPayload("payload is not a JSON object".to_string())
        })?;

        let body = match map.get("message") {
            None => None,
            Some(Value::Object(message)) => truthy_field(message, "body"),
            Some(other) => {
                return Err(PipelineError::MalformedPayload(format!(
                    "field `message` must be an object, got {other}"
                )))
            }
        };

        Ok(Self {
            email: truthy_field(map, "email"),
            full_name: full_name_field(map)?,
            first_name: name_part(map, "first_name"),
            last_name: name_part(map, "last_name"),
            body,
        })
    }

    /// `full_name` if non-empty, else `first_name last_name` trimmed.
    pub fn contact_name(&self) -> String {
        match self.full_name.as_deref() {
            Some(full) if !full.is_empty() => full.to_string(),
            _ => format!(
                "{} {}",
                self.first_name.as_deref().unwrap_or_default(),
                self.last_name.as_deref().unwrap_or_default()
            )
            .trim()
            .to_string(),
        }
    }
}

/// First whitespace-delimited token of the contact name, or "there".
pub fn derive_first_name(contact_name: &str) -> String {
    contact_name
        .split_whitespace()
        .next()
        .unwrap_or(FALLBACK_FIRST_NAME)
        .to_string()
}

/// A payload that passed the presence checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRequest {
    pub customer_email: String,
    pub first_name: String,
    pub message: String,
}

impl WebhookRequest {
    pub fn validate(payload: InboundPayload) -> Result<Self, PipelineError> {
        let first_name = derive_first_name(&payload.contact_name());
        match (payload.body, payload.email) {
            (Some(message), Some(customer_email))
                if !message.is_empty() && !customer_email.is_empty() =>
            {
                Ok(Self {
                    customer_email,
                    first_name,
                    message,
                })
            }
            _ => Err(PipelineError::MissingField),
        }
    }

    pub fn prompt(&self) -> PromptContext {
        PromptContext::new(self.first_name.as_str(), self.message.as_str())
    }

    pub fn subject(&self) -> String {
        format!("Title Fraud Defender Response for {}", self.first_name)
    }
}

/// Customer mode sends the reply as-is; admin mode wraps it with the original message.
pub fn compose_email(config: &Config, request: &WebhookRequest, reply: &str) -> OutboundEmail {
    let body = if config.delivery.send_to_customer {
        reply.to_string()
    } else {
        format!(
            "=== AI Generated Reply ===\n\n{}\n\n--- Original Message ---\n{}\n",
            reply, request.message
        )
    };

    OutboundEmail {
        recipients: config.recipients_for(&request.customer_email),
        subject: request.subject(),
        body,
    }
}

/// Outcome of a fully delivered webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub recipients: Vec<String>,
}

/// Run one webhook end to end. No retries; the first failure ends the request.
pub async fn process(
    config: &Config,
    llm: &dyn CompletionProvider,
    mailer: &dyn EmailSender,
    raw: &[u8],
) -> Result<Delivery, PipelineError> {
    let value = parse_payload(raw);
    debug!("RAW PAYLOAD: {}", value);

    let request = WebhookRequest::validate(InboundPayload::from_value(&value)?)?;
    info!(
        "Webhook from {} (first name {:?})",
        request.customer_email, request.first_name
    );

    let reply = llm
        .complete(&request.prompt().render())
        .await
        .map_err(PipelineError::Completion)?;

    let outbound = compose_email(config, &request, &reply);
    email::dispatch(mailer, &outbound).await?;

    Ok(Delivery {
        recipients: outbound.recipients,
    })
}
