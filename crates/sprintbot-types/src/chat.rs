use serde::{Deserialize, Serialize};

use std::fmt;

/// Identifier of a chat on the messaging platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user on the messaging platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a message, unique within its chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chat participant as seen by the bot.
///
/// Equality is by `id` only: display names change, identities don't.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatUser {
    pub id: UserId,
    /// Display name shown in mentions.
    pub name: String,
}

impl ChatUser {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            name: name.into(),
        }
    }

    /// Clickable HTML mention of this user.
    pub fn mention_html(&self) -> String {
        format!(
            "<a href=\"tg://user?id={}\">{}</a>",
            self.id,
            escape_html(&self.name)
        )
    }
}

impl PartialEq for ChatUser {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ChatUser {}

/// Reference to a message already published in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl MessageRef {
    pub fn new(chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            chat_id,
            message_id,
        }
    }
}

/// A button press on an inline keyboard, delivered by the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackEvent {
    /// Chat the button was pressed in.
    pub chat_id: ChatId,
    /// The message carrying the keyboard, if the platform still knows it.
    pub message: Option<MessageRef>,
    /// Who pressed the button.
    pub from: ChatUser,
    /// Opaque callback payload attached to the button.
    pub data: String,
}

/// Escape the characters that are significant in the platform's HTML subset.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}
