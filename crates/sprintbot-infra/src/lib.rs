//! Infrastructure for the sprint bot: configuration on disk and a console
//! implementation of the chat transport.

pub mod config;
pub mod console;
