//! Sprint service: the entry point the bot's handlers call.
//!
//! Planning spawns one actor per chat; every later operation is routed to
//! that actor through the registry and answered over a oneshot channel.

use std::sync::Arc;
use std::time::Duration;

use sprintbot_types::chat::{CallbackEvent, ChatId, ChatUser, MessageRef};
use sprintbot_types::config::SprintConfig;
use sprintbot_types::error::SprintError;
use sprintbot_types::sprint::{JoinOutcome, LeaveOutcome, RepeatRequest, SprintSnapshot};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use super::actor::{SprintActor, SprintCommand, with_timeout};
use super::callback::CallbackAction;
use super::registry::{SprintEntry, SprintRegistry};
use super::render::{render, repeat_defaults};
use super::state::Sprint;
use crate::clock::Clock;
use crate::transport::ChatTransport;

const MAILBOX_BUFFER: usize = 32;

/// Reply shown after a repeat button re-plans a sprint.
pub const REPEAT_NOTICE: &str = "Спринт заплановано!";

pub struct SprintService<T: ChatTransport> {
    transport: Arc<T>,
    clock: Arc<dyn Clock>,
    config: Arc<SprintConfig>,
    registry: SprintRegistry,
}

impl<T: ChatTransport> SprintService<T> {
    pub fn new(transport: Arc<T>, clock: Arc<dyn Clock>, config: Arc<SprintConfig>) -> Self {
        Self {
            transport,
            clock,
            config,
            registry: SprintRegistry::new(),
        }
    }

    pub fn config(&self) -> &SprintConfig {
        &self.config
    }

    pub fn registry(&self) -> &SprintRegistry {
        &self.registry
    }

    /// Check duration and delay against the configured bounds.
    pub fn validate(&self, duration: u32, delay: u32) -> Result<(), SprintError> {
        let config = &self.config;
        if !(config.min_duration..=config.max_duration).contains(&duration) {
            return Err(SprintError::DurationOutOfRange {
                min: config.min_duration,
                max: config.max_duration,
            });
        }
        if !(config.min_delay..=config.max_delay).contains(&delay) {
            return Err(SprintError::DelayOutOfRange {
                min: config.min_delay,
                max: config.max_delay,
            });
        }
        Ok(())
    }

    /// Plan a sprint in the trigger's chat and publish its message as a reply.
    pub async fn plan_sprint(
        &self,
        trigger: &MessageRef,
        initiator: ChatUser,
        duration: u32,
        delay: u32,
    ) -> Result<SprintSnapshot, SprintError> {
        self.plan_in(trigger.chat_id, Some(trigger), initiator, duration, delay)
            .await
    }

    async fn plan_in(
        &self,
        chat_id: ChatId,
        reply_to: Option<&MessageRef>,
        initiator: ChatUser,
        duration: u32,
        delay: u32,
    ) -> Result<SprintSnapshot, SprintError> {
        self.validate(duration, delay)?;

        let mut sprint = Sprint::new(chat_id, duration, delay);
        let (sender, mailbox) = mpsc::channel(MAILBOX_BUFFER);
        self.registry.reserve(
            chat_id,
            SprintEntry::new(sprint.id(), sender, sprint.timer().clone()),
        )?;

        let now = self.clock.now();
        let published = match sprint.plan(initiator, now) {
            Ok(()) => {
                let rendered = render(&sprint, now, &self.config);
                with_timeout(
                    Duration::from_secs(self.config.tick_timeout_secs),
                    self.transport.send_message(chat_id, reply_to, &rendered),
                )
                .await
                .map_err(SprintError::from)
            }
            Err(err) => Err(err),
        };

        let message = match published {
            Ok(message) => message,
            Err(err) => {
                sprint.timer().retire();
                self.registry.release(chat_id, sprint.id());
                return Err(err);
            }
        };
        sprint.replace_message(message);

        let snapshot = sprint.snapshot();
        SprintActor::new(
            sprint,
            Arc::clone(&self.transport),
            Arc::clone(&self.clock),
            Arc::clone(&self.config),
            self.registry.clone(),
        )
        .spawn(mailbox);

        info!(%chat_id, sprint_id = %snapshot.id, duration, delay, "sprint planned");
        Ok(snapshot)
    }

    /// Advance the chat's sprint now instead of waiting for its timer.
    pub async fn tick(&self, chat_id: ChatId) -> Result<SprintSnapshot, SprintError> {
        self.request(chat_id, |reply| SprintCommand::Tick { reply })
            .await?
    }

    pub async fn add_user(&self, event: &CallbackEvent) -> Result<JoinOutcome, SprintError> {
        let user = event.from.clone();
        self.request(event.chat_id, |reply| SprintCommand::Join { user, reply })
            .await?
    }

    pub async fn leave_or_cancel(&self, event: &CallbackEvent) -> Result<LeaveOutcome, SprintError> {
        let user = event.from.clone();
        self.request(event.chat_id, |reply| SprintCommand::LeaveOrCancel { user, reply })
            .await?
    }

    /// Plan a new sprint from a repeat button, replying to the button's message.
    pub async fn repeat(
        &self,
        event: &CallbackEvent,
        request: RepeatRequest,
    ) -> Result<SprintSnapshot, SprintError> {
        self.plan_in(
            event.chat_id,
            event.message.as_ref(),
            event.from.clone(),
            request.duration,
            request.delay,
        )
        .await
    }

    /// Dispatch a button press and return the short notice for the presser.
    pub async fn handle_callback(&self, event: &CallbackEvent) -> Result<String, SprintError> {
        match CallbackAction::parse(&event.data, repeat_defaults(&self.config)) {
            CallbackAction::Join => Ok(self.add_user(event).await?.notice().to_string()),
            CallbackAction::LeaveOrCancel => {
                Ok(self.leave_or_cancel(event).await?.notice().to_string())
            }
            CallbackAction::Repeat(request) => {
                self.repeat(event, request).await?;
                Ok(REPEAT_NOTICE.to_string())
            }
            CallbackAction::Unknown(data) => Err(SprintError::UnknownAction(data)),
        }
    }

    pub async fn snapshot(&self, chat_id: ChatId) -> Result<SprintSnapshot, SprintError> {
        self.request(chat_id, |reply| SprintCommand::Snapshot { reply })
            .await
    }

    pub fn active_chats(&self) -> Vec<ChatId> {
        self.registry.active_chats()
    }

    /// Stop every sprint timer. Returns how many were running.
    pub fn shutdown(&self) -> usize {
        let stopped = self.registry.shutdown();
        info!(stopped, "sprint service shut down");
        stopped
    }

    async fn request<R>(
        &self,
        chat_id: ChatId,
        command: impl FnOnce(oneshot::Sender<R>) -> SprintCommand,
    ) -> Result<R, SprintError> {
        let sender = self.registry.sender(chat_id).ok_or(SprintError::NotFound)?;
        let (reply, response) = oneshot::channel();
        sender
            .send(command(reply))
            .await
            .map_err(|_| SprintError::NotFound)?;
        response.await.map_err(|_| SprintError::NotFound)
    }
}
