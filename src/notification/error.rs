use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotificationError {
    #[error("Invalid volunteer application: {0}")]
    InvalidApplication(String),
    #[error("Email transport error: {0}")]
    Transport(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl NotificationError {
    /// Status code reported to HTTP callers.
    pub fn http_status(&self) -> u16 {
        match self {
            NotificationError::InvalidApplication(_) => 400,
            NotificationError::Transport(_) | NotificationError::ActorCommunicationError(_) => 500,
        }
    }
}
