//! Ports - trait interfaces between the application core and the outside.

mod assistant_provider;
mod turn_relay;

pub use assistant_provider::{
    AssistantProvider, ProviderError, ProviderMessage, RunId, RunStatus,
};
pub use turn_relay::{RelayCallError, TurnRelay, TurnReply};
