use thiserror::Error;
use uuid::Uuid;

use crate::actor_framework::FrameworkError;
use crate::domain::DonationStatus;

/// A rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self { field, reason: reason.into() }
    }
}

/// Errors surfaced by donation operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DonationError {
    #[error("Donation validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Permission denied: {0}")]
    Forbidden(String),
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: DonationStatus, to: DonationStatus },
    #[error("Donation {id} changed concurrently: expected {expected}, found {actual}; refresh and retry")]
    Conflict {
        id: Uuid,
        expected: DonationStatus,
        actual: DonationStatus,
    },
    #[error("Donation not found: {0}")]
    NotFound(Uuid),
    #[error("Donation repository error: {0}")]
    Repository(String),
}

impl From<FrameworkError<DonationError>> for DonationError {
    fn from(err: FrameworkError<DonationError>) -> Self {
        match err {
            FrameworkError::Entity(inner) => inner,
            FrameworkError::NotFound(id) => match Uuid::parse_str(&id) {
                Ok(id) => DonationError::NotFound(id),
                Err(_) => DonationError::Repository(format!("unknown donation id {id}")),
            },
            other => DonationError::Repository(other.to_string()),
        }
    }
}
