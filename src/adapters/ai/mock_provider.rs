//! Mock assistant provider for testing.
//!
//! Scripted implementation of the AssistantProvider port, allowing the relay
//! to be exercised without calling the real API.
//!
//! # Features
//!
//! - Scripted run status sequences (consumed one per poll)
//! - Pre-seeded thread messages
//! - Error injection per operation
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAssistantProvider::new()
//!     .with_run_statuses([RunStatus::InProgress, RunStatus::Completed])
//!     .with_assistant_reply("Loamy soil.");
//! ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::conversation::{Role, ThreadId};
use crate::ports::{AssistantProvider, ProviderError, ProviderMessage, RunId, RunStatus};

/// Mock assistant provider with scripted behavior.
#[derive(Debug, Clone, Default)]
pub struct MockAssistantProvider {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    threads_created: u32,
    runs_created: u32,
    statuses: VecDeque<RunStatus>,
    messages: Vec<ProviderMessage>,
    create_thread_error: Option<ProviderError>,
    add_message_error: Option<ProviderError>,
    create_run_error: Option<ProviderError>,
    run_status_error: Option<ProviderError>,
    list_messages_error: Option<ProviderError>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAssistantProvider {
    /// Creates a mock with no scripted statuses (every run completes
    /// immediately) and no messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the sequence of statuses returned by successive polls.
    ///
    /// Once the script is exhausted further polls return `Completed`.
    pub fn with_run_statuses(self, statuses: impl IntoIterator<Item = RunStatus>) -> Self {
        self.inner.lock().unwrap().statuses.extend(statuses);
        self
    }

    /// Seeds an assistant message dated now, as the reply the run produced.
    pub fn with_assistant_reply(self, text: impl Into<String>) -> Self {
        self.inner.lock().unwrap().messages.push(ProviderMessage {
            role: Role::Assistant,
            created_at: Utc::now(),
            text: Some(text.into()),
        });
        self
    }

    /// Seeds an arbitrary thread message.
    pub fn with_message(
        self,
        role: Role,
        text: Option<&str>,
        created_at: chrono::DateTime<Utc>,
    ) -> Self {
        self.inner.lock().unwrap().messages.push(ProviderMessage {
            role,
            created_at,
            text: text.map(str::to_string),
        });
        self
    }

    /// Injects an error for `create_thread`.
    pub fn with_create_thread_error(self, error: ProviderError) -> Self {
        self.inner.lock().unwrap().create_thread_error = Some(error);
        self
    }

    /// Injects an error for `add_user_message`.
    pub fn with_add_message_error(self, error: ProviderError) -> Self {
        self.inner.lock().unwrap().add_message_error = Some(error);
        self
    }

    /// Injects an error for `create_run`.
    pub fn with_create_run_error(self, error: ProviderError) -> Self {
        self.inner.lock().unwrap().create_run_error = Some(error);
        self
    }

    /// Injects an error for `run_status`.
    pub fn with_run_status_error(self, error: ProviderError) -> Self {
        self.inner.lock().unwrap().run_status_error = Some(error);
        self
    }

    /// Injects an error for `list_messages`.
    pub fn with_list_messages_error(self, error: ProviderError) -> Self {
        self.inner.lock().unwrap().list_messages_error = Some(error);
        self
    }

    /// Returns a handle to the call log for verification.
    ///
    /// Entries are `"operation"` or `"operation:arg"` strings in call order.
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.inner.lock().unwrap().calls)
    }

    fn record(&self, call: String) {
        self.inner.lock().unwrap().calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AssistantProvider for MockAssistantProvider {
    async fn create_thread(&self) -> Result<ThreadId, ProviderError> {
        self.record("create_thread".to_string());
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.create_thread_error.clone() {
            return Err(error);
        }
        inner.threads_created += 1;
        Ok(ThreadId::new(format!("thread_mock_{}", inner.threads_created)))
    }

    async fn add_user_message(
        &self,
        thread_id: &ThreadId,
        content: &str,
    ) -> Result<(), ProviderError> {
        self.record(format!("add_user_message:{thread_id}:{content}"));
        if let Some(error) = self.inner.lock().unwrap().add_message_error.clone() {
            return Err(error);
        }
        Ok(())
    }

    async fn create_run(
        &self,
        thread_id: &ThreadId,
        assistant_id: &str,
    ) -> Result<RunId, ProviderError> {
        self.record(format!("create_run:{thread_id}:{assistant_id}"));
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.create_run_error.clone() {
            return Err(error);
        }
        inner.runs_created += 1;
        Ok(RunId::new(format!("run_mock_{}", inner.runs_created)))
    }

    async fn run_status(
        &self,
        thread_id: &ThreadId,
        run_id: &RunId,
    ) -> Result<RunStatus, ProviderError> {
        self.record(format!("run_status:{thread_id}:{run_id}"));
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.run_status_error.clone() {
            return Err(error);
        }
        Ok(inner.statuses.pop_front().unwrap_or(RunStatus::Completed))
    }

    async fn list_messages(
        &self,
        thread_id: &ThreadId,
    ) -> Result<Vec<ProviderMessage>, ProviderError> {
        self.record(format!("list_messages:{thread_id}"));
        let inner = self.inner.lock().unwrap();
        if let Some(error) = inner.list_messages_error.clone() {
            return Err(error);
        }
        Ok(inner.messages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn statuses_are_consumed_in_order_then_complete() {
        let provider = MockAssistantProvider::new()
            .with_run_statuses([RunStatus::Queued, RunStatus::InProgress]);
        let thread = provider.create_thread().await.unwrap();
        let run = provider.create_run(&thread, "asst_x").await.unwrap();

        assert_eq!(provider.run_status(&thread, &run).await.unwrap(), RunStatus::Queued);
        assert_eq!(
            provider.run_status(&thread, &run).await.unwrap(),
            RunStatus::InProgress
        );
        assert_eq!(
            provider.run_status(&thread, &run).await.unwrap(),
            RunStatus::Completed
        );
    }

    #[tokio::test]
    async fn injected_error_is_returned() {
        let provider = MockAssistantProvider::new()
            .with_create_thread_error(ProviderError::Transport("down".to_string()));
        assert!(provider.create_thread().await.is_err());
    }

    #[tokio::test]
    async fn calls_are_tracked_in_order() {
        let provider = MockAssistantProvider::new();
        let calls = provider.calls();

        let thread = provider.create_thread().await.unwrap();
        provider.add_user_message(&thread, "hi").await.unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0], "create_thread");
        assert_eq!(calls[1], "add_user_message:thread_mock_1:hi");
    }

    #[tokio::test]
    async fn thread_ids_are_sequential() {
        let provider = MockAssistantProvider::new();
        assert_eq!(
            provider.create_thread().await.unwrap(),
            ThreadId::new("thread_mock_1")
        );
        assert_eq!(
            provider.create_thread().await.unwrap(),
            ThreadId::new("thread_mock_2")
        );
    }
}
