//! Business logic for the sprint bot.
//!
//! This crate defines the [`transport::ChatTransport`] port that transport
//! adapters implement, and everything that runs on top of it: the per-chat
//! sprint engine, the dice roller, and the numeral/text helpers used for
//! rendering. It depends only on `sprintbot-types` -- never on
//! `sprintbot-infra` or any network crate.

pub mod clock;
pub mod dice;
pub mod numeral;
pub mod sprint;
pub mod text_stats;
pub mod transport;
