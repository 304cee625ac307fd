//! In-memory transport double for sprint tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use sprintbot_types::chat::{ChatId, MessageId, MessageRef, UserId};
use sprintbot_types::error::TransportError;
use sprintbot_types::sprint::RenderedMessage;

use crate::transport::ChatTransport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send { message: MessageRef, reply_to: Option<MessageId> },
    Edit(MessageRef),
    Delete(MessageRef),
    Pin(MessageRef),
    Unpin(MessageRef),
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    messages: HashMap<MessageRef, RenderedMessage>,
    calls: Vec<Call>,
}

/// Records every call and keeps the latest content of each message.
///
/// Edits with identical content fail with `NotModified`, like the real
/// platform. Pinning can be made to fail to exercise the optional-rights path.
#[derive(Default)]
pub struct RecordingTransport {
    inner: Mutex<Inner>,
    admins: Vec<UserId>,
    deny_pin: bool,
    edit_latency: Option<Duration>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_admins(mut self, admins: &[i64]) -> Self {
        self.admins = admins.iter().copied().map(UserId).collect();
        self
    }

    pub fn denying_pin(mut self) -> Self {
        self.deny_pin = true;
        self
    }

    pub fn with_edit_latency(mut self, latency: Duration) -> Self {
        self.edit_latency = Some(latency);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn content(&self, message: &MessageRef) -> Option<RenderedMessage> {
        self.inner.lock().unwrap().messages.get(message).cloned()
    }

    pub fn sent_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Send { .. }))
            .count()
    }
}

impl ChatTransport for RecordingTransport {
    async fn send_message(
        &self,
        chat_id: ChatId,
        reply_to: Option<&MessageRef>,
        content: &RenderedMessage,
    ) -> Result<MessageRef, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let message = MessageRef::new(chat_id, MessageId(inner.next_id));
        inner.messages.insert(message, content.clone());
        inner.calls.push(Call::Send {
            message,
            reply_to: reply_to.map(|m| m.message_id),
        });
        Ok(message)
    }

    async fn edit_message(
        &self,
        message: &MessageRef,
        content: &RenderedMessage,
    ) -> Result<(), TransportError> {
        if let Some(latency) = self.edit_latency {
            tokio::time::sleep(latency).await;
        }
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Edit(*message));
        match inner.messages.get_mut(message) {
            None => Err(TransportError::BadRequest("message to edit not found".into())),
            Some(existing) if existing == content => Err(TransportError::NotModified),
            Some(existing) => {
                *existing = content.clone();
                Ok(())
            }
        }
    }

    async fn delete_message(&self, message: &MessageRef) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Delete(*message));
        inner
            .messages
            .remove(message)
            .map(|_| ())
            .ok_or_else(|| TransportError::BadRequest("message to delete not found".into()))
    }

    async fn pin_message(&self, message: &MessageRef, _silent: bool) -> Result<(), TransportError> {
        if self.deny_pin {
            return Err(TransportError::BadRequest("not enough rights to pin".into()));
        }
        self.inner.lock().unwrap().calls.push(Call::Pin(*message));
        Ok(())
    }

    async fn unpin_message(&self, message: &MessageRef) -> Result<(), TransportError> {
        if self.deny_pin {
            return Err(TransportError::BadRequest("not enough rights to unpin".into()));
        }
        self.inner.lock().unwrap().calls.push(Call::Unpin(*message));
        Ok(())
    }

    async fn chat_administrators(&self, _chat_id: ChatId) -> Result<Vec<UserId>, TransportError> {
        Ok(self.admins.clone())
    }
}
