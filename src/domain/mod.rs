//! Domain layer - conversation state and invariants.

pub mod conversation;
