//! Contact form submission
//!
//! [`ContactSubmitter`] validates a message and sends it to the configured
//! backend with a single POST. [`ContactForm`] wraps it with the form's
//! visible state: field values, the alert box and the submit control.

mod form;

pub use form::{Alert, AlertKind, ContactForm};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{ApiClient, FetchError};
use crate::config::{ContactEncoding, SiteConfig};

/// Shown when a required field is empty
pub const VALIDATION_MESSAGE: &str = "Please fill name, email and message.";
/// Shown after the backend accepted the message
pub const SUCCESS_MESSAGE: &str = "Thanks! Your message has been sent.";
/// Shown when sending failed
pub const FAILURE_MESSAGE: &str = "Sorry, failed to send your message. Please try again.";

/// Contact form values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactMessage {
    /// Copy with every field trimmed
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    /// Trim and check the required fields
    pub fn validate(&self) -> Result<Self, ContactError> {
        let trimmed = self.trimmed();
        if trimmed.name.is_empty() || trimmed.email.is_empty() || trimmed.message.is_empty() {
            return Err(ContactError::Validation(VALIDATION_MESSAGE.to_string()));
        }
        Ok(trimmed)
    }

    /// True when every field is empty
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.email.is_empty()
            && self.subject.is_empty()
            && self.message.is_empty()
    }
}

/// Why a message was not sent
#[derive(Error, Debug)]
pub enum ContactError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to send message: {0}")]
    Failed(#[from] FetchError),
}

impl ContactError {
    /// Text to show the visitor
    pub fn user_message(&self) -> &str {
        match self {
            ContactError::Validation(msg) => msg,
            ContactError::Failed(_) => FAILURE_MESSAGE,
        }
    }
}

/// Sends contact messages to one endpoint
#[derive(Debug, Clone)]
pub struct ContactSubmitter {
    endpoint: String,
    encoding: ContactEncoding,
    client: ApiClient,
}

impl ContactSubmitter {
    pub fn new(endpoint: impl Into<String>, encoding: ContactEncoding, client: ApiClient) -> Self {
        Self {
            endpoint: endpoint.into(),
            encoding,
            client,
        }
    }

    /// Build from the site config.
    ///
    /// Uses `contact.endpoint` when set, otherwise `{api.base}/api/contact/`.
    /// Returns `None` when neither is configured.
    pub fn from_config(config: &SiteConfig, client: ApiClient) -> Option<Self> {
        let endpoint = config
            .contact
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(String::from)
            .or_else(|| {
                config
                    .api
                    .base_url()
                    .map(|base| format!("{}/api/contact/", base))
            })?;
        Some(Self::new(endpoint, config.contact.encoding, client))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Validate and send one message. Never retries.
    pub async fn submit(&self, message: &ContactMessage) -> Result<(), ContactError> {
        let message = message.validate()?;

        let result = match self.encoding {
            ContactEncoding::Json => self.client.post_json(&self.endpoint, &message).await,
            ContactEncoding::Multipart => {
                let fields = [
                    ("name", message.name.as_str()),
                    ("email", message.email.as_str()),
                    ("subject", message.subject.as_str()),
                    ("message", message.message.as_str()),
                ];
                self.client.post_form(&self.endpoint, &fields).await
            }
        };

        match result {
            Ok(()) => {
                tracing::info!("Contact message from {} sent", message.email);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Contact submission to {} failed: {}", self.endpoint, e);
                Err(ContactError::Failed(e))
            }
        }
    }
}
