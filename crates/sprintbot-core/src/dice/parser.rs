//! Roll expression parsing.
//!
//! Shape (case-insensitive): `[N]d<M>[mi<F>][adv|dis][b<K>|m<K>][caption]`.
//! `д` and `к` are accepted as the die marker alongside `d`; `+`/`-` work as
//! bonus signs alongside `b`/`m`. The expression may appear anywhere in the
//! text. Out-of-range numbers fall back to defaults instead of failing.

use std::sync::LazyLock;

use regex::Regex;
use sprintbot_types::dice::{DEFAULT_ROLL_CAPTION, DiceRollSpec, RerollMode};

/// Most dice in one pool.
pub const MAX_DICE: u64 = 500;

/// Face count used when the requested one is out of range.
pub const DEFAULT_FACES: i64 = 20;

/// Faces must stay below this bound.
const FACES_LIMIT: i64 = 1 << 31;

/// Largest bonus magnitude; anything above counts as no bonus.
pub const MAX_BONUS: i64 = 1_000_000_000;

static ROLL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d*)[dдк](\d+)(mi-?\d+)?(adv|dis)?([bm+\-]\d+)?(.*)")
        .expect("invalid roll regex")
});

/// Extract a roll from `text`. `None` when there is no dice expression.
pub fn parse(text: &str) -> Option<DiceRollSpec> {
    let caps = ROLL_PATTERN.captures(text)?;

    let raw_count = caps.get(1).map_or("", |m| m.as_str());
    let raw_faces = caps.get(2).map_or("", |m| m.as_str());
    let raw_floor = caps.get(3).map(|m| m.as_str());
    let raw_bonus = caps.get(5).map(|m| m.as_str());

    let count = match raw_count.parse::<u64>() {
        Ok(n) if (1..=MAX_DICE).contains(&n) => n as u32,
        _ => 1,
    };

    let faces = match raw_faces.parse::<i64>() {
        Ok(m) if (1..FACES_LIMIT).contains(&m) => m,
        _ => DEFAULT_FACES,
    };

    // "mi" is two ASCII letters, so byte slicing is safe
    let floor = match raw_floor.map(|f| f[2..].parse::<i64>()) {
        Some(Ok(f)) if (-faces..=faces).contains(&f) => f,
        _ => 1,
    };

    let reroll = caps
        .get(4)
        .and_then(|m| m.as_str().parse::<RerollMode>().ok())
        .unwrap_or_default();

    let bonus = raw_bonus.map_or(0, parse_bonus);

    let caption = caps.get(6).map_or("", |m| m.as_str()).trim();
    let caption = if caption.is_empty() {
        DEFAULT_ROLL_CAPTION.to_string()
    } else {
        caption.to_string()
    };

    let notation = format!(
        "{raw_count}d{raw_faces}{}{}",
        raw_floor.unwrap_or(""),
        raw_bonus.unwrap_or("")
    );

    Some(DiceRollSpec {
        count,
        faces,
        floor,
        reroll,
        bonus,
        caption,
        notation,
    })
}

/// `b3`/`+3` -> 3, `m3`/`-3` -> -3. Unparsable or out-of-range magnitudes
/// count as no bonus.
fn parse_bonus(raw: &str) -> i64 {
    let mut chars = raw.chars();
    let negative = matches!(chars.next(), Some('m' | 'M' | '-'));
    let magnitude = match chars.as_str().parse::<i64>() {
        Ok(k) if k <= MAX_BONUS => k,
        _ => 0,
    };
    if negative { -magnitude } else { magnitude }
}
