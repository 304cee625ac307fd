//! Sprint message rendering.
//!
//! Rendering is a pure function of the sprint state and the current time.

use chrono::{DateTime, FixedOffset, Utc};
use sprintbot_types::config::SprintConfig;
use sprintbot_types::sprint::{
    JOIN_CALLBACK, KeyboardButton, LEAVE_OR_CANCEL_CALLBACK, RenderedMessage, RepeatRequest,
    SprintStatus,
};

use super::callback::{RepeatDefaults, encode_repeat};
use super::state::Sprint;
use crate::numeral::{MINUTES, format_count};

/// Partial-block glyphs, from empty to seven eighths.
const BAR_EIGHTHS: [char; 8] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];
const BAR_FULL: char = '█';

/// Render the sprint's live message.
pub fn render(sprint: &Sprint, now: DateTime<Utc>, config: &SprintConfig) -> RenderedMessage {
    let status = sprint.status();
    let offset = display_offset(config);
    let start = sprint.start_date().unwrap_or(now);
    let end = sprint.end_date().unwrap_or(start);

    let planned_in = if status == SprintStatus::Planned {
        format_count(u64::from(sprint.delay()), MINUTES)
    } else {
        String::new()
    };

    let mentions = sprint
        .users()
        .iter()
        .map(|u| u.mention_html())
        .collect::<Vec<_>>()
        .join(", ");

    let mut text = format!(
        "<b>Спринт {}{planned_in}</b>!\n\n{} <b>{}</b>, з <b>{}</b> до <b>{}</b>.\n\n<b>Учасники: </b>{mentions}",
        status.heading(),
        status.write_verb(),
        format_count(u64::from(sprint.duration()), MINUTES),
        start.with_timezone(&offset).format("%H:%M"),
        end.with_timezone(&offset).format("%H:%M"),
    );

    if status == SprintStatus::Running {
        let elapsed = sprint.elapsed_minutes(now);
        let duration = sprint.duration();
        let fraction = if duration == 0 {
            1.0
        } else {
            f64::from(elapsed) / f64::from(duration)
        };
        text.push_str(&format!(
            "\n{:2.0}%<code>|{}|</code> ще {} хв.",
            fraction * 100.0,
            progress_bar(fraction, config.progress_bar_width),
            duration - elapsed
        ));
    }

    RenderedMessage {
        text,
        keyboard: keyboard(sprint, config),
    }
}

fn keyboard(sprint: &Sprint, config: &SprintConfig) -> Option<Vec<KeyboardButton>> {
    let status = sprint.status();
    if status.is_active() {
        Some(vec![
            KeyboardButton::new("Долучитися", JOIN_CALLBACK),
            KeyboardButton::new("Вийти/скасувати", LEAVE_OR_CANCEL_CALLBACK),
        ])
    } else if status.is_cancelled() {
        let request = RepeatRequest {
            duration: sprint.original_duration(),
            delay: sprint.delay(),
        };
        Some(vec![KeyboardButton::new(
            "Повторити",
            encode_repeat(request, repeat_defaults(config)),
        )])
    } else {
        None
    }
}

/// Repeat payload defaults taken from the configuration.
pub fn repeat_defaults(config: &SprintConfig) -> RepeatDefaults {
    RepeatDefaults {
        duration: config.default_duration,
        delay: config.default_delay,
    }
}

/// Fixed-width text bar with eighth-block resolution.
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let eighths = (fraction * width as f64 * 8.0) as usize;
    let full = (eighths / 8).min(width);
    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat_n(BAR_FULL, full));
    if full < width {
        bar.push(BAR_EIGHTHS[eighths % 8]);
        bar.extend(std::iter::repeat_n(' ', width - full - 1));
    }
    bar
}

fn display_offset(config: &SprintConfig) -> FixedOffset {
    FixedOffset::east_opt(config.display_utc_offset_minutes * 60)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"))
}
