//! Inline keyboard callback payloads.
//!
//! Payloads are short strings attached to buttons:
//! `join_sprint`, `leave_or_cancel_sprint`, and
//! `repeat_last_sprint_<duration>[_<delay>]`.

use sprintbot_types::sprint::{
    JOIN_CALLBACK, LEAVE_OR_CANCEL_CALLBACK, REPEAT_CALLBACK_PREFIX, RepeatRequest,
};

/// Decoded button action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Join,
    LeaveOrCancel,
    Repeat(RepeatRequest),
    Unknown(String),
}

/// Defaults for repeat payloads with missing or malformed components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatDefaults {
    pub duration: u32,
    pub delay: u32,
}

impl Default for RepeatDefaults {
    fn default() -> Self {
        Self {
            duration: 30,
            delay: 2,
        }
    }
}

impl CallbackAction {
    pub fn parse(data: &str, defaults: RepeatDefaults) -> Self {
        match data {
            JOIN_CALLBACK => CallbackAction::Join,
            LEAVE_OR_CANCEL_CALLBACK => CallbackAction::LeaveOrCancel,
            other if other.starts_with(REPEAT_CALLBACK_PREFIX) => {
                CallbackAction::Repeat(decode_repeat(other, defaults))
            }
            other => CallbackAction::Unknown(other.to_string()),
        }
    }
}

/// Payload for the repeat button.
///
/// The delay component is written only when it differs from the default
/// delay, so decoding restores both values exactly.
pub fn encode_repeat(request: RepeatRequest, defaults: RepeatDefaults) -> String {
    if request.delay == defaults.delay {
        format!("{REPEAT_CALLBACK_PREFIX}_{}", request.duration)
    } else {
        format!(
            "{REPEAT_CALLBACK_PREFIX}_{}_{}",
            request.duration, request.delay
        )
    }
}

/// Inverse of [`encode_repeat`]. Each missing or unparsable component falls
/// back to its default independently.
pub fn decode_repeat(data: &str, defaults: RepeatDefaults) -> RepeatRequest {
    let rest = data
        .strip_prefix(REPEAT_CALLBACK_PREFIX)
        .unwrap_or_default();
    let mut parts = rest.strip_prefix('_').unwrap_or(rest).split('_');

    let duration = parts
        .next()
        .and_then(|d| d.parse::<u32>().ok())
        .unwrap_or(defaults.duration);
    let delay = parts
        .next()
        .and_then(|d| d.parse::<u32>().ok())
        .unwrap_or(defaults.delay);

    RepeatRequest { duration, delay }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> RepeatDefaults {
        RepeatDefaults::default()
    }

    #[test]
    fn test_parse_fixed_actions() {
        assert_eq!(CallbackAction::parse("join_sprint", defaults()), CallbackAction::Join);
        assert_eq!(
            CallbackAction::parse("leave_or_cancel_sprint", defaults()),
            CallbackAction::LeaveOrCancel
        );
        assert_eq!(
            CallbackAction::parse("vote_42", defaults()),
            CallbackAction::Unknown("vote_42".to_string())
        );
    }

    #[test]
    fn test_repeat_roundtrip() {
        for duration in [1, 15, 30, 120] {
            for delay in [0, 1, 2, 5, 60] {
                let request = RepeatRequest { duration, delay };
                let data = encode_repeat(request, defaults());
                assert_eq!(
                    CallbackAction::parse(&data, defaults()),
                    CallbackAction::Repeat(request)
                );
            }
        }
    }

    #[test]
    fn test_encode_shapes() {
        let d = defaults();
        assert_eq!(
            encode_repeat(RepeatRequest { duration: 45, delay: 2 }, d),
            "repeat_last_sprint_45"
        );
        assert_eq!(
            encode_repeat(RepeatRequest { duration: 45, delay: 0 }, d),
            "repeat_last_sprint_45_0"
        );
    }

    #[test]
    fn test_decode_malformed_falls_back_to_defaults() {
        let d = defaults();
        let fallback = RepeatRequest { duration: 30, delay: 2 };
        assert_eq!(decode_repeat("repeat_last_sprint", d), fallback);
        assert_eq!(decode_repeat("repeat_last_sprint_", d), fallback);
        assert_eq!(decode_repeat("repeat_last_sprint_abc", d), fallback);
        assert_eq!(decode_repeat("repeat_last_sprint_abc_xyz", d), fallback);
        assert_eq!(
            decode_repeat("repeat_last_sprint_15_x", d),
            RepeatRequest { duration: 15, delay: 2 }
        );
        assert_eq!(
            decode_repeat("repeat_last_sprint_x_5", d),
            RepeatRequest { duration: 30, delay: 5 }
        );
    }

    #[test]
    fn test_decode_legacy_duration_only() {
        assert_eq!(
            decode_repeat("repeat_last_sprint_20", defaults()),
            RepeatRequest { duration: 20, delay: 2 }
        );
    }
}
