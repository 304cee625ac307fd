use thiserror::Error;

/// Errors reported by the messaging transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// An edit was rejected because the content is identical to what is shown.
    #[error("message is not modified")]
    NotModified,

    /// The platform refused the request (missing rights, deleted message, ...).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The call did not complete within the allotted time.
    #[error("transport call timed out")]
    Timeout,
}

impl TransportError {
    /// An edit that changed nothing. Always safe to ignore.
    pub fn is_not_modified(&self) -> bool {
        matches!(self, TransportError::NotModified)
    }
}

/// Errors related to sprint operations.
#[derive(Debug, Error)]
pub enum SprintError {
    #[error("sprint duration must be between {min} and {max} minutes")]
    DurationOutOfRange { min: u32, max: u32 },

    #[error("sprint delay must be between {min} and {max} minutes")]
    DelayOutOfRange { min: u32, max: u32 },

    #[error("a sprint is already active in this chat")]
    AlreadyActive,

    #[error("no active sprint in this chat")]
    NotFound,

    #[error("cannot {action} a sprint that is {from}")]
    InvalidTransition { from: String, action: &'static str },

    #[error("unknown callback action: '{0}'")]
    UnknownAction(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl SprintError {
    /// Short localized text safe to show in the chat.
    ///
    /// Internal failures collapse into one generic line so no identifiers or
    /// error details reach users.
    pub fn user_message(&self) -> String {
        match self {
            SprintError::DurationOutOfRange { min, max } => {
                format!("Тривалість спринту має бути від {min} до {max} хв.")
            }
            SprintError::DelayOutOfRange { min, max } => {
                format!("Затримка перед спринтом має бути від {min} до {max} хв.")
            }
            SprintError::AlreadyActive => "У цьому чаті вже є активний спринт!".to_string(),
            SprintError::NotFound => "У цьому чаті немає активного спринту.".to_string(),
            SprintError::UnknownAction(_) => "Невідома дія.".to_string(),
            SprintError::InvalidTransition { .. } | SprintError::Transport(_) => {
                "Щось пішло не так, спробуйте ще раз.".to_string()
            }
        }
    }
}
