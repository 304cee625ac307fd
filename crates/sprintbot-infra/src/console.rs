//! In-process chat transport.
//!
//! `ConsoleTransport` keeps published messages in memory, broadcasts every
//! operation as a [`TransportEvent`] and logs it at `debug`. The CLI
//! subscribes to print a sprint as it unfolds; nothing leaves the process.

use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;
use sprintbot_core::transport::ChatTransport;
use sprintbot_types::chat::{ChatId, MessageId, MessageRef, UserId};
use sprintbot_types::error::TransportError;
use sprintbot_types::sprint::RenderedMessage;
use tokio::sync::broadcast;
use tracing::debug;

/// One transport operation, as seen by subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Sent {
        message: MessageRef,
        reply_to: Option<MessageId>,
        content: RenderedMessage,
    },
    Edited {
        message: MessageRef,
        content: RenderedMessage,
    },
    Deleted(MessageRef),
    Pinned {
        message: MessageRef,
        silent: bool,
    },
    Unpinned(MessageRef),
}

pub struct ConsoleTransport {
    next_id: AtomicI64,
    messages: DashMap<MessageRef, RenderedMessage>,
    admins: Vec<UserId>,
    events: broadcast::Sender<TransportEvent>,
}

impl ConsoleTransport {
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        Self {
            next_id: AtomicI64::new(0),
            messages: DashMap::new(),
            admins: Vec::new(),
            events,
        }
    }

    pub fn with_admins(mut self, admins: impl IntoIterator<Item = UserId>) -> Self {
        self.admins = admins.into_iter().collect();
        self
    }

    /// Receive every future operation.
    pub fn subscribe(&self) -> broadcast::Receiver<TransportEvent> {
        self.events.subscribe()
    }

    /// Current content of a message that has not been deleted.
    pub fn content(&self, message: &MessageRef) -> Option<RenderedMessage> {
        self.messages.get(message).map(|entry| entry.value().clone())
    }

    fn publish(&self, event: TransportEvent) {
        let _ = self.events.send(event);
    }
}

impl std::fmt::Debug for ConsoleTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleTransport")
            .field("messages", &self.messages.len())
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl ChatTransport for ConsoleTransport {
    async fn send_message(
        &self,
        chat_id: ChatId,
        reply_to: Option<&MessageRef>,
        content: &RenderedMessage,
    ) -> Result<MessageRef, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let message = MessageRef::new(chat_id, MessageId(id));
        self.messages.insert(message, content.clone());
        debug!(%chat_id, message_id = id, reply = reply_to.is_some(), "console message sent");
        self.publish(TransportEvent::Sent {
            message,
            reply_to: reply_to.map(|m| m.message_id),
            content: content.clone(),
        });
        Ok(message)
    }

    async fn edit_message(
        &self,
        message: &MessageRef,
        content: &RenderedMessage,
    ) -> Result<(), TransportError> {
        {
            let mut existing = self
                .messages
                .get_mut(message)
                .ok_or_else(|| TransportError::BadRequest("message to edit not found".into()))?;
            if *existing == *content {
                return Err(TransportError::NotModified);
            }
            *existing = content.clone();
        }
        debug!(chat_id = %message.chat_id, message_id = message.message_id.0, "console message edited");
        self.publish(TransportEvent::Edited {
            message: *message,
            content: content.clone(),
        });
        Ok(())
    }

    async fn delete_message(&self, message: &MessageRef) -> Result<(), TransportError> {
        self.messages
            .remove(message)
            .ok_or_else(|| TransportError::BadRequest("message to delete not found".into()))?;
        debug!(chat_id = %message.chat_id, message_id = message.message_id.0, "console message deleted");
        self.publish(TransportEvent::Deleted(*message));
        Ok(())
    }

    async fn pin_message(&self, message: &MessageRef, silent: bool) -> Result<(), TransportError> {
        if !self.messages.contains_key(message) {
            return Err(TransportError::BadRequest("message to pin not found".into()));
        }
        debug!(chat_id = %message.chat_id, message_id = message.message_id.0, silent, "console message pinned");
        self.publish(TransportEvent::Pinned {
            message: *message,
            silent,
        });
        Ok(())
    }

    async fn unpin_message(&self, message: &MessageRef) -> Result<(), TransportError> {
        debug!(chat_id = %message.chat_id, message_id = message.message_id.0, "console message unpinned");
        self.publish(TransportEvent::Unpinned(*message));
        Ok(())
    }

    async fn chat_administrators(&self, _chat_id: ChatId) -> Result<Vec<UserId>, TransportError> {
        Ok(self.admins.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat() -> ChatId {
        ChatId(-100)
    }

    #[tokio::test]
    async fn send_assigns_increasing_ids_and_broadcasts() {
        let transport = ConsoleTransport::new(16);
        let mut rx = transport.subscribe();

        let first = transport
            .send_message(chat(), None, &RenderedMessage::text("one"))
            .await
            .unwrap();
        let second = transport
            .send_message(chat(), Some(&first), &RenderedMessage::text("two"))
            .await
            .unwrap();
        assert!(second.message_id.0 > first.message_id.0);

        assert!(matches!(rx.recv().await.unwrap(), TransportEvent::Sent { reply_to: None, .. }));
        match rx.recv().await.unwrap() {
            TransportEvent::Sent {
                message, reply_to, ..
            } => {
                assert_eq!(message, second);
                assert_eq!(reply_to, Some(first.message_id));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn identical_edit_is_not_modified() {
        let transport = ConsoleTransport::new(16);
        let message = transport
            .send_message(chat(), None, &RenderedMessage::text("same"))
            .await
            .unwrap();

        let err = transport
            .edit_message(&message, &RenderedMessage::text("same"))
            .await
            .unwrap_err();
        assert!(err.is_not_modified());

        transport
            .edit_message(&message, &RenderedMessage::text("changed"))
            .await
            .unwrap();
        assert_eq!(transport.content(&message).unwrap().text, "changed");
    }

    #[tokio::test]
    async fn deleted_message_cannot_be_edited() {
        let transport = ConsoleTransport::new(16);
        let message = transport
            .send_message(chat(), None, &RenderedMessage::text("bye"))
            .await
            .unwrap();
        transport.delete_message(&message).await.unwrap();

        let err = transport
            .edit_message(&message, &RenderedMessage::text("again"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::BadRequest(_)));
        assert!(transport.delete_message(&message).await.is_err());
    }

    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn every_call_is_logged_at_debug() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let transport = ConsoleTransport::new(16);
        let message = transport
            .send_message(chat(), None, &RenderedMessage::text("hi"))
            .await
            .unwrap();
        transport
            .edit_message(&message, &RenderedMessage::text("hello"))
            .await
            .unwrap();
        transport.pin_message(&message, true).await.unwrap();
        transport.unpin_message(&message).await.unwrap();
        transport.delete_message(&message).await.unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        for line in [
            "console message sent",
            "console message edited",
            "console message pinned",
            "console message unpinned",
            "console message deleted",
        ] {
            assert!(output.contains(line), "missing {line:?} in {output}");
        }
        assert!(output.contains("chat_id=-100"));
    }

    #[tokio::test]
    async fn admins_are_reported() {
        let transport = ConsoleTransport::new(4).with_admins([UserId(5), UserId(6)]);
        let admins = transport.chat_administrators(chat()).await.unwrap();
        assert_eq!(admins, vec![UserId(5), UserId(6)]);
    }
}
