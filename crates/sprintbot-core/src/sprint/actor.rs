//! Per-chat sprint actor.
//!
//! Each planned sprint runs as one tokio task that exclusively owns the
//! [`Sprint`]. Ticks from its own timer and commands from the mailbox are
//! handled one at a time, so a chat's roster and status are never mutated
//! concurrently while different chats proceed in parallel.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sprintbot_types::chat::{ChatUser, MessageRef, UserId};
use sprintbot_types::config::SprintConfig;
use sprintbot_types::error::{SprintError, TransportError};
use sprintbot_types::sprint::{JoinOutcome, LeaveOutcome, SprintSnapshot};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::registry::SprintRegistry;
use super::render::render;
use super::state::Sprint;
use crate::clock::Clock;
use crate::transport::{ChatTransport, ignore_not_modified};

/// Requests routed to a sprint actor.
pub(crate) enum SprintCommand {
    Tick {
        reply: oneshot::Sender<Result<SprintSnapshot, SprintError>>,
    },
    Join {
        user: ChatUser,
        reply: oneshot::Sender<Result<JoinOutcome, SprintError>>,
    },
    LeaveOrCancel {
        user: ChatUser,
        reply: oneshot::Sender<Result<LeaveOutcome, SprintError>>,
    },
    Snapshot {
        reply: oneshot::Sender<SprintSnapshot>,
    },
}

/// Run a transport call with an upper time bound.
pub(crate) async fn with_timeout<R>(
    limit: Duration,
    call: impl Future<Output = Result<R, TransportError>>,
) -> Result<R, TransportError> {
    time::timeout(limit, call)
        .await
        .unwrap_or(Err(TransportError::Timeout))
}

pub(crate) struct SprintActor<T: ChatTransport> {
    sprint: Sprint,
    transport: Arc<T>,
    clock: Arc<dyn Clock>,
    config: Arc<SprintConfig>,
    registry: SprintRegistry,
}

impl<T: ChatTransport> SprintActor<T> {
    pub(crate) fn new(
        sprint: Sprint,
        transport: Arc<T>,
        clock: Arc<dyn Clock>,
        config: Arc<SprintConfig>,
        registry: SprintRegistry,
    ) -> Self {
        Self {
            sprint,
            transport,
            clock,
            config,
            registry,
        }
    }

    pub(crate) fn spawn(self, mailbox: mpsc::Receiver<SprintCommand>) -> JoinHandle<()> {
        tokio::spawn(self.run(mailbox))
    }

    /// Tick on a fixed cadence, plus once just after the planned start so the
    /// sprint begins promptly instead of up to a full period late.
    async fn run(mut self, mut mailbox: mpsc::Receiver<SprintCommand>) {
        let chat_id = self.sprint.chat_id();
        let sprint_id = self.sprint.id();
        let timer = self.sprint.timer().clone();

        let period = Duration::from_secs(self.config.tick_interval_secs);
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let early_tick = time::sleep(Duration::from_secs(u64::from(self.sprint.delay()) * 60 + 1));
        tokio::pin!(early_tick);
        let mut early_pending = true;

        debug!(%chat_id, %sprint_id, "sprint actor started");

        loop {
            tokio::select! {
                _ = timer.retired() => break,
                _ = &mut early_tick, if early_pending => {
                    early_pending = false;
                    self.on_timer().await;
                }
                _ = interval.tick() => self.on_timer().await,
                command = mailbox.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => break,
                },
            }

            if self.sprint.status().is_terminal() {
                break;
            }
        }

        timer.retire();
        self.registry.release(chat_id, sprint_id);
        info!(%chat_id, %sprint_id, status = %self.sprint.status(), "sprint actor stopped");
    }

    async fn on_timer(&mut self) {
        if let Err(err) = self.tick().await {
            let chat_id = self.sprint.chat_id();
            match err {
                SprintError::InvalidTransition { .. } => {
                    error!(%chat_id, %err, "sprint tick hit an invalid transition");
                }
                other => warn!(%chat_id, err = %other, "sprint tick failed"),
            }
        }
    }

    async fn handle(&mut self, command: SprintCommand) {
        match command {
            SprintCommand::Tick { reply } => {
                let result = self.tick().await.map(|()| self.sprint.snapshot());
                let _ = reply.send(result);
            }
            SprintCommand::Join { user, reply } => {
                let _ = reply.send(self.add_user(user).await);
            }
            SprintCommand::LeaveOrCancel { user, reply } => {
                let _ = reply.send(self.leave_or_cancel(user).await);
            }
            SprintCommand::Snapshot { reply } => {
                let _ = reply.send(self.sprint.snapshot());
            }
        }
    }

    fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.config.tick_timeout_secs)
    }

    /// Start if due, finish if due, then refresh the live message.
    ///
    /// Calling this when nothing is due only refreshes the message.
    async fn tick(&mut self) -> Result<(), SprintError> {
        let now = self.clock.now();
        if self.sprint.is_due_to_start(now) {
            self.start().await?;
        }
        if self
            .sprint
            .is_due_to_finish(now, self.config.finish_threshold_secs)
        {
            self.finish().await?;
        }
        self.refresh().await
    }

    /// Publish the running message as a new reply, drop the planning one and pin.
    async fn start(&mut self) -> Result<(), SprintError> {
        self.sprint.start()?;
        let chat_id = self.sprint.chat_id();
        let limit = self.call_timeout();
        let rendered = render(&self.sprint, self.clock.now(), &self.config);
        let previous = self.sprint.message().copied();

        let message = with_timeout(
            limit,
            self.transport
                .send_message(chat_id, previous.as_ref(), &rendered),
        )
        .await?;
        self.sprint.replace_message(message);

        if let Some(previous) = previous {
            if let Err(err) = with_timeout(limit, self.transport.delete_message(&previous)).await {
                warn!(%chat_id, %err, "failed to delete planning message");
            }
        }
        if let Err(err) = with_timeout(limit, self.transport.pin_message(&message, true)).await {
            debug!(%chat_id, %err, "could not pin sprint message");
        }

        info!(%chat_id, users = self.sprint.users().len(), "sprint started");
        Ok(())
    }

    /// Show final progress, mark finished, unpin and publish the summary.
    async fn finish(&mut self) -> Result<(), SprintError> {
        let chat_id = self.sprint.chat_id();
        let limit = self.call_timeout();

        if let Err(err) = self.refresh().await {
            warn!(%chat_id, %err, "failed to show final sprint progress");
        }
        self.sprint.finish()?;

        let current = self.sprint.message().copied();
        if let Some(current) = &current {
            self.unpin(current).await;
        }

        let rendered = render(&self.sprint, self.clock.now(), &self.config);
        let summary = with_timeout(
            limit,
            self.transport
                .send_message(chat_id, current.as_ref(), &rendered),
        )
        .await?;
        self.sprint.replace_message(summary);

        info!(%chat_id, duration = self.sprint.duration(), users = self.sprint.users().len(), "sprint finished");
        Ok(())
    }

    async fn cancel(&mut self) -> Result<(), SprintError> {
        let chat_id = self.sprint.chat_id();
        self.sprint.cancel(self.clock.now())?;

        self.refresh_roster("cancellation").await;
        if let Some(current) = self.sprint.message().copied() {
            self.unpin(&current).await;
        }

        info!(%chat_id, status = %self.sprint.status(), duration = self.sprint.duration(), "sprint cancelled");
        Ok(())
    }

    async fn add_user(&mut self, user: ChatUser) -> Result<JoinOutcome, SprintError> {
        let user_id = user.id;
        let outcome = self.sprint.add_user(user);
        if outcome == JoinOutcome::Added {
            debug!(chat_id = %self.sprint.chat_id(), %user_id, "user joined sprint");
            self.refresh_roster("join").await;
        }
        Ok(outcome)
    }

    /// Leave if others remain; cancel if last or an administrator; refuse otherwise.
    async fn leave_or_cancel(&mut self, user: ChatUser) -> Result<LeaveOutcome, SprintError> {
        if !self.sprint.status().is_active() {
            return Ok(LeaveOutcome::Inactive);
        }

        let is_participant = self.sprint.has_user(user.id);
        if is_participant && self.sprint.users().len() > 1 {
            self.sprint.remove_user(user.id);
            debug!(chat_id = %self.sprint.chat_id(), user_id = %user.id, "user left sprint");
            self.refresh_roster("leave").await;
            return Ok(LeaveOutcome::Removed);
        }

        if is_participant || self.is_admin(user.id).await? {
            self.cancel().await?;
            Ok(LeaveOutcome::Cancelled)
        } else {
            Ok(LeaveOutcome::NotAuthorized)
        }
    }

    async fn is_admin(&self, user_id: UserId) -> Result<bool, SprintError> {
        let admins = with_timeout(
            self.call_timeout(),
            self.transport.chat_administrators(self.sprint.chat_id()),
        )
        .await?;
        Ok(admins.contains(&user_id))
    }

    /// Refresh after the roster or status already changed. The change stands
    /// even when the edit fails; the next tick shows it.
    async fn refresh_roster(&mut self, reason: &'static str) {
        if let Err(err) = self.refresh().await {
            warn!(chat_id = %self.sprint.chat_id(), %err, reason, "failed to refresh sprint message");
        }
    }

    /// Edit the live message in place. Unchanged content is not an error.
    async fn refresh(&mut self) -> Result<(), SprintError> {
        let Some(message) = self.sprint.message().copied() else {
            return Ok(());
        };
        let rendered = render(&self.sprint, self.clock.now(), &self.config);
        let result = with_timeout(
            self.call_timeout(),
            self.transport.edit_message(&message, &rendered),
        )
        .await;
        ignore_not_modified(result)?;
        Ok(())
    }

    /// Unpinning needs rights the bot may lack; failures are only logged.
    async fn unpin(&self, message: &MessageRef) {
        if let Err(err) = with_timeout(self.call_timeout(), self.transport.unpin_message(message)).await {
            debug!(chat_id = %message.chat_id, %err, "could not unpin sprint message");
        }
    }
}
