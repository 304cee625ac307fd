//! `sprintbot sprint`: plan a sprint in a console chat and watch it run.
//!
//! By default the clock is fast-forwarded one minute per step, so a full
//! sprint prints in an instant. `--live` uses the system clock and the
//! actor's own timers instead.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use chrono::Utc;
use console::style;
use sprintbot_core::clock::{ManualClock, SystemClock};
use sprintbot_infra::console::{ConsoleTransport, TransportEvent};
use sprintbot_types::chat::{CallbackEvent, ChatId, ChatUser, MessageId, MessageRef, UserId};
use sprintbot_types::error::SprintError;
use sprintbot_types::sprint::{JOIN_CALLBACK, LEAVE_OR_CANCEL_CALLBACK, RenderedMessage};
use tokio::sync::broadcast;

use super::render::{html_to_plain, html_to_terminal};
use crate::state::{AppState, ConcreteSprintService};

const CONSOLE_CHAT: ChatId = ChatId(1);
const MODERATOR: UserId = UserId(99);
const EVENT_CAPACITY: usize = 256;

pub struct SprintOptions {
    pub duration: Option<u32>,
    pub delay: Option<u32>,
    pub initiator: String,
    pub joiners: Vec<String>,
    pub cancel_after: Option<u32>,
    pub live: bool,
}

pub async fn run(state: &AppState, options: SprintOptions, json: bool) -> Result<()> {
    let transport = Arc::new(ConsoleTransport::new(EVENT_CAPACITY).with_admins([MODERATOR]));
    let mut events = transport.subscribe();

    if options.live {
        let service = state.sprint_service(Arc::clone(&transport), Arc::new(SystemClock));
        start(state, &service, &options, &mut events, json).await?;
        watch_live(&service, &options, &mut events, json).await
    } else {
        let clock = ManualClock::new(Utc::now());
        let service = state.sprint_service(Arc::clone(&transport), Arc::new(clock.clone()));
        start(state, &service, &options, &mut events, json).await?;
        fast_forward(&service, &clock, &options, &mut events, json).await
    }
}

/// Plan the sprint and add the requested participants.
async fn start(
    state: &AppState,
    service: &ConcreteSprintService,
    options: &SprintOptions,
    events: &mut broadcast::Receiver<TransportEvent>,
    json: bool,
) -> Result<()> {
    let duration = options.duration.unwrap_or(state.config.default_duration);
    let delay = options.delay.unwrap_or(state.config.default_delay);
    let trigger = MessageRef::new(CONSOLE_CHAT, MessageId(0));
    let initiator = ChatUser::new(1, options.initiator.clone());

    service
        .plan_sprint(&trigger, initiator, duration, delay)
        .await
        .map_err(user_facing)?;
    drain(events, json);

    for (user, name) in (2..).zip(&options.joiners) {
        let notice = service
            .handle_callback(&press(ChatUser::new(user, name.clone()), JOIN_CALLBACK))
            .await
            .map_err(user_facing)?;
        print_notice(name, &notice, json);
        drain(events, json);
    }
    Ok(())
}

/// Step the manual clock a minute at a time until the sprint ends.
async fn fast_forward(
    service: &ConcreteSprintService,
    clock: &ManualClock,
    options: &SprintOptions,
    events: &mut broadcast::Receiver<TransportEvent>,
    json: bool,
) -> Result<()> {
    let config = service.config();
    let horizon = config.max_delay + config.max_duration + 2;

    for minute in 1..=horizon {
        clock.advance(chrono::Duration::minutes(1));

        let result = if options.cancel_after == Some(minute) {
            cancel(service, json).await
        } else {
            service.tick(CONSOLE_CHAT).await.map(|_| ())
        };
        drain(events, json);

        match result {
            Ok(()) => {}
            Err(SprintError::NotFound) => break,
            Err(err) => return Err(user_facing(err)),
        }
    }

    service.shutdown();
    Ok(())
}

/// Follow the running actor on real time until it stops or Ctrl+C.
async fn watch_live(
    service: &ConcreteSprintService,
    options: &SprintOptions,
    events: &mut broadcast::Receiver<TransportEvent>,
    json: bool,
) -> Result<()> {
    let mut poll = tokio::time::interval(Duration::from_secs(1));
    let cancel_at = tokio::time::sleep(Duration::from_secs(
        u64::from(options.cancel_after.unwrap_or(0)) * 60,
    ));
    tokio::pin!(cancel_at);
    let mut cancel_pending = options.cancel_after.is_some();

    if !json {
        println!("  {}", style("Press Ctrl+C to stop").dim());
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => print_event(&event, json),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "console output fell behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = &mut cancel_at, if cancel_pending => {
                cancel_pending = false;
                cancel(service, json).await.map_err(user_facing)?;
            }
            _ = poll.tick() => {
                if !service.registry().is_active(CONSOLE_CHAT) {
                    break;
                }
            }
            _ = crate::shutdown_signal() => {
                let stopped = service.shutdown();
                tracing::info!(stopped, "stopping on signal");
                break;
            }
        }
    }

    drain(events, json);
    Ok(())
}

/// A moderator presses "leave/cancel", which cancels for everyone.
async fn cancel(service: &ConcreteSprintService, json: bool) -> Result<(), SprintError> {
    let moderator = ChatUser::new(MODERATOR.0, "Moderator");
    let notice = service
        .handle_callback(&press(moderator, LEAVE_OR_CANCEL_CALLBACK))
        .await?;
    print_notice("Moderator", &notice, json);
    Ok(())
}

fn press(from: ChatUser, data: &str) -> CallbackEvent {
    CallbackEvent {
        chat_id: CONSOLE_CHAT,
        message: None,
        from,
        data: data.to_string(),
    }
}

fn user_facing(err: SprintError) -> anyhow::Error {
    tracing::debug!(error = %err, "sprint command failed");
    anyhow!(err.user_message())
}

fn drain(events: &mut broadcast::Receiver<TransportEvent>, json: bool) {
    while let Ok(event) = events.try_recv() {
        print_event(&event, json);
    }
}

fn print_notice(name: &str, notice: &str, json: bool) {
    if json {
        println!("{}", serde_json::json!({ "event": "notice", "user": name, "text": notice }));
    } else {
        println!("  {} {}: {}", style("•").yellow(), style(name).bold(), notice);
    }
}

fn print_event(event: &TransportEvent, json: bool) {
    if json {
        println!("{}", event_json(event));
        return;
    }

    match event {
        TransportEvent::Sent {
            message,
            reply_to,
            content,
        } => {
            let reply = reply_to
                .map(|id| format!(" (reply to #{id})"))
                .unwrap_or_default();
            println!();
            println!("  {} message #{}{reply}", style("→").green(), message.message_id);
            print_content(content);
        }
        TransportEvent::Edited { message, content } => {
            println!();
            println!("  {} message #{}", style("✎").cyan(), message.message_id);
            print_content(content);
        }
        TransportEvent::Deleted(message) => {
            println!("  {} deleted #{}", style("✗").red(), message.message_id);
        }
        TransportEvent::Pinned { message, .. } => {
            println!("  {} pinned #{}", style("📌").bold(), message.message_id);
        }
        TransportEvent::Unpinned(message) => {
            println!("  {} unpinned #{}", style("·").dim(), message.message_id);
        }
    }
}

fn print_content(content: &RenderedMessage) {
    for line in html_to_terminal(&content.text).lines() {
        println!("    {line}");
    }
    if let Some(buttons) = &content.keyboard {
        let labels = buttons
            .iter()
            .map(|b| format!("[{}]", b.label))
            .collect::<Vec<_>>()
            .join(" ");
        println!("    {}", style(labels).dim());
    }
}

fn event_json(event: &TransportEvent) -> serde_json::Value {
    let content_json = |content: &RenderedMessage| {
        serde_json::json!({
            "text": html_to_plain(&content.text),
            "buttons": content.keyboard.as_ref().map(|buttons| {
                buttons.iter().map(|b| b.callback_data.clone()).collect::<Vec<_>>()
            }),
        })
    };

    match event {
        TransportEvent::Sent {
            message,
            reply_to,
            content,
        } => serde_json::json!({
            "event": "sent",
            "message_id": message.message_id.0,
            "reply_to": reply_to.map(|id| id.0),
            "content": content_json(content),
        }),
        TransportEvent::Edited { message, content } => serde_json::json!({
            "event": "edited",
            "message_id": message.message_id.0,
            "content": content_json(content),
        }),
        TransportEvent::Deleted(message) => {
            serde_json::json!({ "event": "deleted", "message_id": message.message_id.0 })
        }
        TransportEvent::Pinned { message, silent } => serde_json::json!({
            "event": "pinned",
            "message_id": message.message_id.0,
            "silent": silent,
        }),
        TransportEvent::Unpinned(message) => {
            serde_json::json!({ "event": "unpinned", "message_id": message.message_id.0 })
        }
    }
}
