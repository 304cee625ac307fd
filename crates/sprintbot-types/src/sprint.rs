use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

use crate::chat::{ChatId, ChatUser, MessageRef};

/// Callback payload of the "join" button.
pub const JOIN_CALLBACK: &str = "join_sprint";

/// Callback payload of the "leave or cancel" button.
pub const LEAVE_OR_CANCEL_CALLBACK: &str = "leave_or_cancel_sprint";

/// Prefix of the "repeat" button payload: `repeat_last_sprint_<duration>[_<delay>]`.
pub const REPEAT_CALLBACK_PREFIX: &str = "repeat_last_sprint";

/// Sprint lifecycle states.
///
/// - Initialized: created, not yet announced
/// - Planned: announced, waiting for its start time
/// - Running: in progress
/// - Finished: ran to completion
/// - Cancelled: stopped while running
/// - CancelledWhilePlanned: stopped before it started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintStatus {
    Initialized,
    Planned,
    Running,
    Finished,
    Cancelled,
    CancelledWhilePlanned,
}

impl SprintStatus {
    /// Planned or running: users may join, leave, or cancel.
    pub fn is_active(self) -> bool {
        matches!(self, SprintStatus::Planned | SprintStatus::Running)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SprintStatus::Finished | SprintStatus::Cancelled | SprintStatus::CancelledWhilePlanned
        )
    }

    pub fn is_cancelled(self) -> bool {
        matches!(
            self,
            SprintStatus::Cancelled | SprintStatus::CancelledWhilePlanned
        )
    }

    /// Status phrase completing "Спринт ..." in the sprint message heading.
    pub fn heading(self) -> &'static str {
        match self {
            SprintStatus::Initialized => "створено",
            SprintStatus::Planned => "почнеться за ",
            SprintStatus::Running => "розпочався",
            SprintStatus::Finished => "завершено",
            SprintStatus::Cancelled => "скасовано",
            SprintStatus::CancelledWhilePlanned => "скасовано до його початку",
        }
    }

    /// "Write" in the tense matching this status.
    pub fn write_verb(self) -> &'static str {
        match self {
            SprintStatus::Initialized | SprintStatus::Planned => "Писатимемо",
            SprintStatus::Running => "Пишемо",
            SprintStatus::Finished => "Писали",
            SprintStatus::Cancelled => "Писали всього",
            SprintStatus::CancelledWhilePlanned => "Не писали",
        }
    }
}

impl fmt::Display for SprintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SprintStatus::Initialized => write!(f, "initialized"),
            SprintStatus::Planned => write!(f, "planned"),
            SprintStatus::Running => write!(f, "running"),
            SprintStatus::Finished => write!(f, "finished"),
            SprintStatus::Cancelled => write!(f, "cancelled"),
            SprintStatus::CancelledWhilePlanned => write!(f, "cancelled_while_planned"),
        }
    }
}

/// One inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardButton {
    pub label: String,
    pub callback_data: String,
}

impl KeyboardButton {
    pub fn new(label: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// HTML text plus an optional single-row inline keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub text: String,
    pub keyboard: Option<Vec<KeyboardButton>>,
}

impl RenderedMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }
}

/// Result of a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinOutcome {
    Added,
    AlreadyJoined,
    /// The sprint is not planned or running.
    NotJoinable,
}

impl JoinOutcome {
    pub fn notice(self) -> &'static str {
        match self {
            JoinOutcome::Added => "Додано до спринту!",
            JoinOutcome::AlreadyJoined => "Ви вже у спринті!",
            JoinOutcome::NotJoinable => "Ви не можете додатися до цього спринту.",
        }
    }
}

/// Result of the combined leave/cancel action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveOutcome {
    /// The requester left; others keep writing.
    Removed,
    /// The whole sprint was cancelled.
    Cancelled,
    /// Neither a participant who may leave nor a chat administrator.
    NotAuthorized,
    /// The sprint is no longer planned or running.
    Inactive,
}

impl LeaveOutcome {
    pub fn notice(self) -> &'static str {
        match self {
            LeaveOutcome::Removed => "Вас вилучено зі спринту",
            LeaveOutcome::Cancelled => "Спринт скасовано",
            LeaveOutcome::NotAuthorized => "Ви не маєте права скасувати спринт",
            LeaveOutcome::Inactive => "Цей спринт вже не активний.",
        }
    }
}

/// Duration and delay carried by a "repeat" button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatRequest {
    pub duration: u32,
    pub delay: u32,
}

/// Point-in-time copy of a sprint's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintSnapshot {
    pub id: Uuid,
    pub chat_id: ChatId,
    pub status: SprintStatus,
    pub original_duration: u32,
    pub duration: u32,
    pub delay: u32,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub users: Vec<ChatUser>,
    pub message: Option<MessageRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(SprintStatus::Planned.is_active());
        assert!(SprintStatus::Running.is_active());
        assert!(!SprintStatus::Initialized.is_active());
        assert!(!SprintStatus::Initialized.is_terminal());

        for status in [
            SprintStatus::Finished,
            SprintStatus::Cancelled,
            SprintStatus::CancelledWhilePlanned,
        ] {
            assert!(status.is_terminal());
            assert!(!status.is_active());
        }

        assert!(SprintStatus::Cancelled.is_cancelled());
        assert!(!SprintStatus::Finished.is_cancelled());
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&SprintStatus::CancelledWhilePlanned).unwrap();
        assert_eq!(json, "\"cancelled_while_planned\"");
        assert_eq!(SprintStatus::CancelledWhilePlanned.to_string(), "cancelled_while_planned");
    }

    #[test]
    fn test_notices_are_distinct() {
        let notices = [
            LeaveOutcome::Removed.notice(),
            LeaveOutcome::Cancelled.notice(),
            LeaveOutcome::NotAuthorized.notice(),
            LeaveOutcome::Inactive.notice(),
        ];
        for (i, a) in notices.iter().enumerate() {
            for b in &notices[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_ne!(JoinOutcome::Added.notice(), JoinOutcome::AlreadyJoined.notice());
    }
}
