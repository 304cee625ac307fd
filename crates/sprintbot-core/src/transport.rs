//! Messaging transport port.
//!
//! Implementations live outside this crate (e.g. `ConsoleTransport` in
//! sprintbot-infra, a platform API client in a deployment). Uses native async
//! fn in traits (Rust 2024 edition, no async_trait macro).

use sprintbot_types::chat::{ChatId, MessageRef, UserId};
use sprintbot_types::error::TransportError;
use sprintbot_types::sprint::RenderedMessage;

/// Operations the sprint engine needs from the messaging platform.
pub trait ChatTransport: Send + Sync + 'static {
    /// Publish a new message, optionally as a reply. Returns its reference.
    fn send_message(
        &self,
        chat_id: ChatId,
        reply_to: Option<&MessageRef>,
        content: &RenderedMessage,
    ) -> impl std::future::Future<Output = Result<MessageRef, TransportError>> + Send;

    /// Replace the text and keyboard of an existing message.
    ///
    /// Fails with [`TransportError::NotModified`] when nothing would change.
    fn edit_message(
        &self,
        message: &MessageRef,
        content: &RenderedMessage,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;

    fn delete_message(
        &self,
        message: &MessageRef,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;

    /// Pin a message. `silent` suppresses the pin notification.
    fn pin_message(
        &self,
        message: &MessageRef,
        silent: bool,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;

    fn unpin_message(
        &self,
        message: &MessageRef,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;

    /// Users holding administrator rights in the chat.
    fn chat_administrators(
        &self,
        chat_id: ChatId,
    ) -> impl std::future::Future<Output = Result<Vec<UserId>, TransportError>> + Send;
}

/// Treat "message not modified" as success.
pub fn ignore_not_modified(result: Result<(), TransportError>) -> Result<(), TransportError> {
    match result {
        Err(err) if err.is_not_modified() => Ok(()),
        other => other,
    }
}
