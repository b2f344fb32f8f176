//! Assistant provider adapters.

mod mock_provider;
mod openai_assistants;

pub use mock_provider::MockAssistantProvider;
pub use openai_assistants::{OpenAiAssistants, OpenAiAssistantsConfig};
