//! Assistant Provider Port - Interface to the external assistant service.
//!
//! The provider owns all conversation state (threads, messages, runs); the
//! relay is a stateless driver of this interface. The run model is
//! asynchronous on the provider side: a submitted run must be polled until it
//! reaches a terminal status.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::conversation::{Role, ThreadId};

/// Port for assistant provider interactions.
///
/// Implementations connect to the external assistant service and translate
/// between the provider's wire format and our domain types.
#[async_trait]
pub trait AssistantProvider: Send + Sync {
    /// Creates a new conversation thread and returns its token.
    async fn create_thread(&self) -> Result<ThreadId, ProviderError>;

    /// Appends a user message to an existing thread.
    async fn add_user_message(
        &self,
        thread_id: &ThreadId,
        content: &str,
    ) -> Result<(), ProviderError>;

    /// Starts a run of the given assistant profile against a thread.
    async fn create_run(
        &self,
        thread_id: &ThreadId,
        assistant_id: &str,
    ) -> Result<RunId, ProviderError>;

    /// Fetches the current status of a run.
    async fn run_status(
        &self,
        thread_id: &ThreadId,
        run_id: &RunId,
    ) -> Result<RunStatus, ProviderError>;

    /// Lists all messages on a thread.
    async fn list_messages(
        &self,
        thread_id: &ThreadId,
    ) -> Result<Vec<ProviderMessage>, ProviderError>;
}

/// Opaque identifier for a run, scoped to a thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Creates a run id from a provider-issued token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a run.
///
/// `Queued` and `InProgress` are the only non-terminal states; everything
/// else ends the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
    Cancelled,
    RequiresAction,
    Expired,
}

impl RunStatus {
    /// Returns true once no further progress will occur without a new run.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Queued | Self::InProgress)
    }

    /// Returns the wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::RequiresAction => "requires_action",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message as reported by the provider when listing a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMessage {
    /// Who authored the message.
    pub role: Role,
    /// Provider-side creation time.
    pub created_at: DateTime<Utc>,
    /// Primary text content, if the message has any.
    pub text: Option<String>,
}

/// Assistant provider errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// Network/connectivity failure reaching the provider.
    #[error("provider transport error: {0}")]
    Transport(String),

    /// The provider rejected the request.
    #[error("provider returned {status}: {message}")]
    Api {
        /// HTTP status returned by the provider.
        status: u16,
        /// Error message from the provider body, or the raw body.
        message: String,
    },

    /// The provider response could not be decoded.
    #[error("failed to decode provider response: {0}")]
    Decode(String),
}
