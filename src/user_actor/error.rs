use thiserror::Error;
use uuid::Uuid;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during user profile operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Permission denied: {0}")]
    Forbidden(String),
    #[error("User validation error: {0}")]
    ValidationError(String),
    #[error("User repository error: {0}")]
    Repository(String),
}

impl From<FrameworkError<UserError>> for UserError {
    fn from(err: FrameworkError<UserError>) -> Self {
        match err {
            FrameworkError::Entity(inner) => inner,
            FrameworkError::NotFound(id) => match Uuid::parse_str(&id) {
                Ok(id) => UserError::NotFound(id),
                Err(_) => UserError::Repository(format!("unknown user id {id}")),
            },
            other => UserError::Repository(other.to_string()),
        }
    }
}
