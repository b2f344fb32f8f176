//! Garden Sage - Conversational Gardening Assistant
//!
//! This crate relays user messages to a preconfigured assistant profile and
//! renders the resulting dialogue: a stateless HTTP relay service on the
//! server side, and a conversation client that owns the transcript, thread
//! continuity, and failure recovery.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
