//! Relay service - server-side turn orchestration.

mod submit_turn;

pub use submit_turn::{
    RelayError, SubmitTurnHandler, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL,
};
