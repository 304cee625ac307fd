//! The sprint state machine.
//!
//! `Sprint` holds one chat's session: status, timing, roster and the live
//! message. Transitions here are pure; the actor performs the matching
//! transport calls around them.

use chrono::{DateTime, Duration, Utc};
use sprintbot_types::chat::{ChatId, ChatUser, MessageRef, UserId};
use sprintbot_types::error::SprintError;
use sprintbot_types::sprint::{JoinOutcome, SprintSnapshot, SprintStatus};
use uuid::Uuid;

use super::timer::TickHandle;

/// A timed, chat-scoped writing session.
#[derive(Debug)]
pub struct Sprint {
    id: Uuid,
    chat_id: ChatId,
    status: SprintStatus,
    /// Requested length in minutes.
    original_duration: u32,
    /// Actual length in minutes; shrinks to the elapsed time on cancel.
    duration: u32,
    delay: u32,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    users: Vec<ChatUser>,
    message: Option<MessageRef>,
    timer: TickHandle,
}

impl Sprint {
    pub fn new(chat_id: ChatId, duration: u32, delay: u32) -> Self {
        Self {
            id: Uuid::now_v7(),
            chat_id,
            status: SprintStatus::Initialized,
            original_duration: duration,
            duration,
            delay,
            start_date: None,
            end_date: None,
            users: Vec::new(),
            message: None,
            timer: TickHandle::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn status(&self) -> SprintStatus {
        self.status
    }

    pub fn original_duration(&self) -> u32 {
        self.original_duration
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    pub fn users(&self) -> &[ChatUser] {
        &self.users
    }

    pub fn has_user(&self, user_id: UserId) -> bool {
        self.users.iter().any(|u| u.id == user_id)
    }

    pub fn message(&self) -> Option<&MessageRef> {
        self.message.as_ref()
    }

    /// Swap in a newly published message. Returns the previous one.
    pub fn replace_message(&mut self, message: MessageRef) -> Option<MessageRef> {
        self.message.replace(message)
    }

    pub fn timer(&self) -> &TickHandle {
        &self.timer
    }

    /// Initialized -> Planned: fix the schedule and seed the roster.
    pub fn plan(&mut self, initiator: ChatUser, now: DateTime<Utc>) -> Result<(), SprintError> {
        self.expect_status(SprintStatus::Initialized, "plan")?;
        let start = now + Duration::minutes(i64::from(self.delay));
        self.start_date = Some(start);
        self.end_date = Some(start + Duration::minutes(i64::from(self.duration)));
        self.users = vec![initiator];
        self.status = SprintStatus::Planned;
        Ok(())
    }

    pub fn is_due_to_start(&self, now: DateTime<Utc>) -> bool {
        self.status == SprintStatus::Planned && self.start_date.is_some_and(|start| now >= start)
    }

    /// Running with fewer than `threshold_secs` seconds left.
    pub fn is_due_to_finish(&self, now: DateTime<Utc>, threshold_secs: i64) -> bool {
        self.status == SprintStatus::Running
            && self
                .end_date
                .is_some_and(|end| (end - now).num_seconds() < threshold_secs)
    }

    /// Planned -> Running.
    pub fn start(&mut self) -> Result<(), SprintError> {
        self.expect_status(SprintStatus::Planned, "start")?;
        self.status = SprintStatus::Running;
        Ok(())
    }

    /// Running -> Finished. Retires the timer.
    ///
    /// Finishing a sprint that never started is a logic error.
    pub fn finish(&mut self) -> Result<(), SprintError> {
        self.expect_status(SprintStatus::Running, "finish")?;
        self.status = SprintStatus::Finished;
        self.timer.retire();
        Ok(())
    }

    /// Planned -> CancelledWhilePlanned, or Running -> Cancelled with the
    /// duration cut to the whole minutes actually written. Retires the timer.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), SprintError> {
        match self.status {
            SprintStatus::Planned => {
                self.status = SprintStatus::CancelledWhilePlanned;
            }
            SprintStatus::Running => {
                let start = self.start_date.unwrap_or(now);
                let end = now.max(start);
                self.duration = u32::try_from((end - start).num_minutes()).unwrap_or(0);
                self.end_date = Some(end);
                self.status = SprintStatus::Cancelled;
            }
            other => {
                return Err(SprintError::InvalidTransition {
                    from: other.to_string(),
                    action: "cancel",
                });
            }
        }
        self.timer.retire();
        Ok(())
    }

    /// Append `user` to the roster unless already present.
    pub fn add_user(&mut self, user: ChatUser) -> JoinOutcome {
        if !self.status.is_active() {
            return JoinOutcome::NotJoinable;
        }
        if self.has_user(user.id) {
            return JoinOutcome::AlreadyJoined;
        }
        self.users.push(user);
        JoinOutcome::Added
    }

    /// Remove `user_id` from the roster. Never empties an active roster:
    /// the last participant leaving is a cancel, not a removal.
    pub fn remove_user(&mut self, user_id: UserId) -> bool {
        if !self.status.is_active() || self.users.len() <= 1 {
            return false;
        }
        let before = self.users.len();
        self.users.retain(|u| u.id != user_id);
        self.users.len() != before
    }

    /// Whole minutes elapsed since the start, clamped to `[0, duration]`.
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> u32 {
        let Some(start) = self.start_date else {
            return 0;
        };
        let elapsed = u32::try_from((now - start).num_minutes()).unwrap_or(0);
        elapsed.min(self.duration)
    }

    pub fn snapshot(&self) -> SprintSnapshot {
        SprintSnapshot {
            id: self.id,
            chat_id: self.chat_id,
            status: self.status,
            original_duration: self.original_duration,
            duration: self.duration,
            delay: self.delay,
            start_date: self.start_date,
            end_date: self.end_date,
            users: self.users.clone(),
            message: self.message,
        }
    }

    fn expect_status(&self, expected: SprintStatus, action: &'static str) -> Result<(), SprintError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(SprintError::InvalidTransition {
                from: self.status.to_string(),
                action,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> ChatUser {
        ChatUser::new(id, format!("user{id}"))
    }

    fn planned(duration: u32, delay: u32, now: DateTime<Utc>) -> Sprint {
        let mut sprint = Sprint::new(ChatId(1), duration, delay);
        sprint.plan(user(1), now).unwrap();
        sprint
    }

    #[test]
    fn test_plan_sets_schedule_and_roster() {
        let now = Utc::now();
        for (duration, delay) in [(1, 0), (30, 2), (120, 60), (45, 7)] {
            let sprint = planned(duration, delay, now);
            let start = sprint.start_date().unwrap();
            let end = sprint.end_date().unwrap();
            assert_eq!(sprint.status(), SprintStatus::Planned);
            assert_eq!(end - start, Duration::minutes(i64::from(duration)));
            assert_eq!(start - now, Duration::minutes(i64::from(delay)));
            assert_eq!(sprint.users(), &[user(1)]);
        }
    }

    #[test]
    fn test_plan_twice_is_rejected() {
        let now = Utc::now();
        let mut sprint = planned(30, 2, now);
        let err = sprint.plan(user(2), now).unwrap_err();
        assert!(matches!(err, SprintError::InvalidTransition { action: "plan", .. }));
        assert_eq!(sprint.users(), &[user(1)]);
    }

    #[test]
    fn test_due_to_start() {
        let now = Utc::now();
        let sprint = planned(30, 2, now);
        assert!(!sprint.is_due_to_start(now));
        assert!(!sprint.is_due_to_start(now + Duration::seconds(119)));
        assert!(sprint.is_due_to_start(now + Duration::minutes(2)));
    }

    #[test]
    fn test_due_to_finish_threshold() {
        let now = Utc::now();
        let mut sprint = planned(10, 0, now);
        sprint.start().unwrap();
        let end = sprint.end_date().unwrap();
        assert!(!sprint.is_due_to_finish(end - Duration::seconds(30), 30));
        assert!(sprint.is_due_to_finish(end - Duration::seconds(29), 30));
        assert!(sprint.is_due_to_finish(end + Duration::seconds(5), 30));
    }

    #[test]
    fn test_finish_before_start_is_error() {
        let mut sprint = planned(30, 2, Utc::now());
        let err = sprint.finish().unwrap_err();
        assert!(matches!(err, SprintError::InvalidTransition { action: "finish", .. }));
        assert_eq!(sprint.status(), SprintStatus::Planned);
        assert!(!sprint.timer().is_retired());
    }

    #[test]
    fn test_finish_retires_timer() {
        let mut sprint = planned(30, 0, Utc::now());
        sprint.start().unwrap();
        sprint.finish().unwrap();
        assert_eq!(sprint.status(), SprintStatus::Finished);
        assert!(sprint.timer().is_retired());
    }

    #[test]
    fn test_cancel_while_planned() {
        let now = Utc::now();
        let mut sprint = planned(30, 2, now);
        sprint.cancel(now).unwrap();
        assert_eq!(sprint.status(), SprintStatus::CancelledWhilePlanned);
        assert_eq!(sprint.duration(), 30);
        assert!(sprint.timer().is_retired());
    }

    #[test]
    fn test_cancel_while_running_snapshots_elapsed() {
        let now = Utc::now();
        let mut sprint = planned(30, 0, now);
        sprint.start().unwrap();
        let cancel_at = now + Duration::seconds(7 * 60 + 45);
        sprint.cancel(cancel_at).unwrap();
        assert_eq!(sprint.status(), SprintStatus::Cancelled);
        assert_eq!(sprint.duration(), 7);
        assert_eq!(sprint.original_duration(), 30);
        assert_eq!(sprint.end_date(), Some(cancel_at));
        assert!(sprint.end_date() >= sprint.start_date());
    }

    #[test]
    fn test_cancel_terminal_is_error() {
        let now = Utc::now();
        let mut sprint = planned(30, 2, now);
        sprint.cancel(now).unwrap();
        assert!(sprint.cancel(now).is_err());
        // The timer stays retired; a second cancel attempt must not panic.
        assert!(!sprint.timer().retire());
    }

    #[test]
    fn test_add_user_dedupes_and_keeps_order() {
        let mut sprint = planned(30, 2, Utc::now());
        assert_eq!(sprint.add_user(user(2)), JoinOutcome::Added);
        assert_eq!(sprint.add_user(user(3)), JoinOutcome::Added);
        assert_eq!(sprint.add_user(user(2)), JoinOutcome::AlreadyJoined);
        let ids: Vec<i64> = sprint.users().iter().map(|u| u.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_add_user_after_cancel_is_rejected() {
        let now = Utc::now();
        let mut sprint = planned(30, 2, now);
        sprint.cancel(now).unwrap();
        assert_eq!(sprint.add_user(user(2)), JoinOutcome::NotJoinable);
        assert_eq!(sprint.users(), &[user(1)]);
    }

    #[test]
    fn test_remove_user_never_empties_roster() {
        let mut sprint = planned(30, 2, Utc::now());
        assert!(!sprint.remove_user(UserId(1)));
        sprint.add_user(user(2));
        assert!(sprint.remove_user(UserId(1)));
        assert_eq!(sprint.users(), &[user(2)]);
        assert!(!sprint.remove_user(UserId(99)));
    }

    #[test]
    fn test_elapsed_minutes_is_clamped() {
        let now = Utc::now();
        let mut sprint = planned(10, 0, now);
        sprint.start().unwrap();
        assert_eq!(sprint.elapsed_minutes(now - Duration::minutes(1)), 0);
        assert_eq!(sprint.elapsed_minutes(now + Duration::seconds(150)), 2);
        assert_eq!(sprint.elapsed_minutes(now + Duration::minutes(60)), 10);
    }

    #[test]
    fn test_replace_message_returns_previous() {
        let mut sprint = planned(30, 2, Utc::now());
        let first = MessageRef::new(ChatId(1), sprintbot_types::chat::MessageId(10));
        let second = MessageRef::new(ChatId(1), sprintbot_types::chat::MessageId(11));
        assert_eq!(sprint.replace_message(first), None);
        assert_eq!(sprint.replace_message(second), Some(first));
        assert_eq!(sprint.message(), Some(&second));
    }
}
