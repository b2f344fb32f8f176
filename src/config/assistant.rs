//! Assistant provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Assistant provider configuration.
///
/// The API credential and assistant profile are required and checked once at
/// startup, so a missing credential fails fast instead of on the first chat
/// request.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Provider API key
    pub api_key: Option<Secret<String>>,

    /// Assistant profile to run every turn against
    pub assistant_id: Option<String>,

    /// Base URL for the provider API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-call HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Interval between run status polls, in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Maximum number of status polls before a run is declared stuck
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

impl AssistantConfig {
    /// Get the HTTP timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Check if an assistant profile is configured
    pub fn has_assistant_id(&self) -> bool {
        self.assistant_id.as_ref().is_some_and(|id| !id.is_empty())
    }

    /// Validate assistant configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired(
                "GARDEN_SAGE__ASSISTANT__API_KEY",
            ));
        }
        if !self.has_assistant_id() {
            return Err(ValidationError::MissingRequired(
                "GARDEN_SAGE__ASSISTANT__ASSISTANT_ID",
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.poll_interval_ms == 0 {
            return Err(ValidationError::InvalidPollInterval);
        }
        if self.max_poll_attempts == 0 {
            return Err(ValidationError::InvalidPollBudget);
        }
        Ok(())
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            assistant_id: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            poll_interval_ms: default_poll_interval(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_poll_interval() -> u64 {
    500
}

// ~2 minutes at the default poll interval.
fn default_max_poll_attempts() -> u32 {
    240
}
