//! Chat-to-sprint registry.
//!
//! At most one active sprint per chat. Reservation goes through the map's
//! entry API so the conflict check and the insert happen under one shard lock.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use sprintbot_types::chat::ChatId;
use sprintbot_types::error::SprintError;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use super::actor::SprintCommand;
use super::timer::TickHandle;

/// Route to a running sprint actor.
#[derive(Clone)]
pub(crate) struct SprintEntry {
    sprint_id: Uuid,
    sender: mpsc::Sender<SprintCommand>,
    timer: TickHandle,
}

impl SprintEntry {
    pub(crate) fn new(sprint_id: Uuid, sender: mpsc::Sender<SprintCommand>, timer: TickHandle) -> Self {
        Self {
            sprint_id,
            sender,
            timer,
        }
    }
}

#[derive(Clone, Default)]
pub struct SprintRegistry {
    entries: Arc<DashMap<ChatId, SprintEntry>>,
}

impl SprintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the chat for a new sprint.
    ///
    /// An entry whose actor has gone away (closed mailbox) is treated as free.
    pub(crate) fn reserve(&self, chat_id: ChatId, entry: SprintEntry) -> Result<(), SprintError> {
        match self.entries.entry(chat_id) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().sender.is_closed() {
                    debug!(%chat_id, stale = %occupied.get().sprint_id, "replacing stale sprint entry");
                    occupied.insert(entry);
                    Ok(())
                } else {
                    Err(SprintError::AlreadyActive)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
                Ok(())
            }
        }
    }

    /// Remove the chat's entry if it still belongs to `sprint_id`.
    pub(crate) fn release(&self, chat_id: ChatId, sprint_id: Uuid) -> bool {
        self.entries
            .remove_if(&chat_id, |_, entry| entry.sprint_id == sprint_id)
            .is_some()
    }

    pub(crate) fn sender(&self, chat_id: ChatId) -> Option<mpsc::Sender<SprintCommand>> {
        self.entries.get(&chat_id).map(|entry| entry.sender.clone())
    }

    pub fn is_active(&self, chat_id: ChatId) -> bool {
        self.entries.contains_key(&chat_id)
    }

    pub fn active_chats(&self) -> Vec<ChatId> {
        self.entries.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retire every sprint timer. Actors observe this and stop.
    ///
    /// Returns the number of timers that were still live.
    pub fn shutdown(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.timer.retire())
            .count()
    }
}
