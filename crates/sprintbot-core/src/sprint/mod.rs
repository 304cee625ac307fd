//! Writing sprints.
//!
//! A sprint is planned in a chat, starts after a delay, runs for a fixed
//! number of minutes and then publishes a summary. Participants join and
//! leave through inline buttons on the sprint's live message, which is
//! re-rendered on every tick.
//!
//! [`state::Sprint`] is the pure state machine, [`render()`] turns it into
//! message content, and [`service::SprintService`] runs one actor per chat
//! that performs the transport calls.

mod actor;
pub mod callback;
pub mod registry;
pub mod render;
pub mod service;
pub mod state;
pub mod timer;

#[cfg(test)]
mod testing;

pub use callback::{CallbackAction, RepeatDefaults};
pub use registry::SprintRegistry;
pub use render::render;
pub use service::SprintService;
pub use state::Sprint;
pub use timer::TickHandle;
