//! Observability setup for the sprint bot.

pub mod tracing_setup;
