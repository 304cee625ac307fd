//! Shared domain types for the sprint bot.
//!
//! This crate contains the types exchanged between the sprint engine, the
//! dice roller and the transport adapters: chat identities, message
//! references, sprint status and outcomes, dice roll specifications,
//! configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod dice;
pub mod error;
pub mod sprint;
